//! Top-level error type

use crate::config::ConfigError;
use crate::explorer::ExplorerError;
use crate::pipeline::PipelineError;
use crate::render::RenderError;
use crate::storage::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Explorer(#[from] ExplorerError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no stored build {0:?}")]
    UnknownBuild(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Process exit code: 1 missing input or IO, 2 schema, 3 validation,
    /// 4 render, 5 config
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Storage(StorageError::MissingColumns { .. }) => 2,
            Error::Storage(_) | Error::Explorer(_) | Error::Io(_) | Error::Json(_) => 1,
            Error::UnknownBuild(_) => 1,
            Error::Pipeline(PipelineError::Validation(_)) => 3,
            Error::Pipeline(PipelineError::NoMentions) => 3,
            Error::Render(_) => 4,
            Error::Config(_) => 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::ValidationFailure;
    use std::path::PathBuf;

    #[test]
    fn exit_codes_follow_error_class() {
        let missing: Error = StorageError::MissingInput {
            attempted: vec![PathBuf::from("/a.csv")],
        }
        .into();
        assert_eq!(missing.exit_code(), 1);

        let schema: Error = StorageError::MissingColumns {
            table: "mentions".into(),
            missing: vec!["ad_id".into()],
        }
        .into();
        assert_eq!(schema.exit_code(), 2);

        let validation: Error = PipelineError::from(ValidationFailure::GenericTokenInNodes("PAC".into())).into();
        assert_eq!(validation.exit_code(), 3);

        assert_eq!(Error::from(RenderError::EmptyGraph).exit_code(), 4);
    }

    #[test]
    fn storage_message_passes_through() {
        let err: Error = StorageError::MissingInput {
            attempted: vec![PathBuf::from("/a.csv"), PathBuf::from("/b.csv")],
        }
        .into();
        assert_eq!(
            err.to_string(),
            "None of the candidate input paths exist:\n- /a.csv\n- /b.csv"
        );
    }
}
