//! Artifact storage
//!
//! Inputs are read from CSV tables located through [`resolve_first_existing`].
//! Build artifacts go through the [`ArtifactStore`] trait, backed either by a
//! directory of CSV files ([`CsvStore`]) or by SQLite ([`SqliteStore`]).

pub mod csv_store;
mod paths;
mod sqlite;
mod traits;

pub use csv_store::CsvStore;
pub use paths::{input_candidates, resolve_first_existing, resolve_input, search_roots, DATA_ROOT_ENV};
pub use sqlite::SqliteStore;
pub use traits::{ArtifactStore, BuildArtifacts, OpenStore, StorageError, StorageResult};
