//! Attack-graph: who attacks whom in political advertising
//!
//! Turns raw entity mentions extracted from political ads into a cleaned
//! directed graph of sponsors and the entities they attack, then serves that
//! graph to an interactive explorer.
//!
//! # Layers
//!
//! - **Pipeline**: alias resolution, quality filtering, target
//!   classification and edge/node aggregation, with a metrics stream
//! - **Graph**: tagged sponsor/target nodes, seeded spring layout, components
//! - **Query**: party and threshold filters, click selection, highlighting
//! - **Render**: figure descriptions and status lines
//! - **Storage**: CSV tables and a SQLite artifact store
//!
//! # Example
//!
//! ```
//! use attack_graph::{CleaningPipeline, Mention};
//!
//! let mentions = vec![Mention::new("ad-1", "meta", "Acme PAC", "Jane Smith", "PERSON")
//!     .with_tone("NEGATIVE")
//!     .with_context("Jane Smith is corrupt")];
//! let output = CleaningPipeline::default().run(mentions, &[]).unwrap();
//! assert_eq!(output.mentions.len(), 1);
//! assert!(output.mentions[0].is_target);
//! ```

pub mod config;
pub mod error;
pub mod explorer;
pub mod graph;
pub mod model;
pub mod normalize;
pub mod pipeline;
pub mod query;
pub mod render;
pub mod storage;

pub use config::AppConfig;
pub use error::{Error, Result};
pub use explorer::{run_session, Explorer, ExplorerEvent, Frame};
pub use graph::{AttackGraph, GraphRuntime, LayoutSettings, NodeType};
pub use model::{AliasEntry, CleanedMention, EdgeRow, Mention, NodeRow, SpendRow};
pub use pipeline::{CleaningPipeline, PipelineOutput, PipelineSettings};
pub use query::{ClickEvent, GraphFilter, InteractionMode, SelectionState, Seed};
pub use render::{render_static, render_view, Figure, RenderOutcome};
pub use storage::{ArtifactStore, CsvStore, OpenStore, SqliteStore, StorageError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
