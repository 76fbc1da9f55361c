//! Storage trait definitions

use crate::model::{CleanedMention, EdgeRow, MetricsLog, NodeRow};
use crate::pipeline::PipelineOutput;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("None of the candidate input paths exist:\n{}", list_paths(.attempted))]
    MissingInput { attempted: Vec<PathBuf> },

    #[error("{table} table missing required columns: {}", .missing.join(", "))]
    MissingColumns { table: String, missing: Vec<String> },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt stored value: {0}")]
    Corrupt(String),

    #[error("Storage lock poisoned")]
    LockPoisoned,
}

fn list_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| format!("- {}", p.display()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// The tables the explorer needs from one build
#[derive(Debug, Clone, Default)]
pub struct BuildArtifacts {
    pub build_version: String,
    pub mentions: Vec<CleanedMention>,
    pub edges: Vec<EdgeRow>,
    pub nodes: Vec<NodeRow>,
    pub metrics: MetricsLog,
}

impl From<&PipelineOutput> for BuildArtifacts {
    fn from(output: &PipelineOutput) -> Self {
        Self {
            build_version: output.build_version.clone(),
            mentions: output.mentions.iter().map(CleanedMention::from).collect(),
            edges: output.edges.clone(),
            nodes: output.nodes.clone(),
            metrics: output.metrics.clone(),
        }
    }
}

/// Trait for build artifact backends
pub trait ArtifactStore {
    /// Persist one build; saving an existing version replaces it
    fn save_build(&self, output: &PipelineOutput) -> StorageResult<()>;

    /// Load a build by version
    fn load_build(&self, build_version: &str) -> StorageResult<Option<BuildArtifacts>>;

    /// List stored build versions
    fn list_builds(&self) -> StorageResult<Vec<String>>;
}

/// Extension trait for opening stores from paths
pub trait OpenStore: ArtifactStore + Sized {
    /// Open or create a store at the given path
    fn open(path: impl AsRef<Path>) -> StorageResult<Self>;

    /// Create an in-memory store (useful for testing)
    fn open_in_memory() -> StorageResult<Self>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_input_lists_every_attempt() {
        let err = StorageError::MissingInput {
            attempted: vec![PathBuf::from("/a/edges.csv"), PathBuf::from("/b/edges.csv")],
        };
        assert_eq!(
            err.to_string(),
            "None of the candidate input paths exist:\n- /a/edges.csv\n- /b/edges.csv"
        );
    }

    #[test]
    fn missing_columns_are_named() {
        let err = StorageError::MissingColumns {
            table: "alias".into(),
            missing: vec!["canonical_final".into(), "entity_label".into()],
        };
        assert_eq!(
            err.to_string(),
            "alias table missing required columns: canonical_final, entity_label"
        );
    }
}
