//! Reviewed alias map entries

use serde::{Deserialize, Serialize};
use std::fmt;

/// Review state of an alias entry, or of a mention's alias lookup
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ReviewStatus {
    /// Reviewed and approved; the only state that overrides canonicalization
    Locked,
    /// Awaiting review (also the default when the alias table has no status column)
    Pending,
    /// The mention had no alias entry at all
    Unmapped,
    /// Any other reviewer-assigned state, kept verbatim
    Other(String),
}

impl ReviewStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Locked => "LOCKED",
            Self::Pending => "PENDING",
            Self::Unmapped => "UNMAPPED",
            Self::Other(s) => s,
        }
    }

    pub fn is_locked(&self) -> bool {
        matches!(self, Self::Locked)
    }
}

impl From<String> for ReviewStatus {
    fn from(s: String) -> Self {
        match s.trim() {
            "LOCKED" => Self::Locked,
            "" | "PENDING" => Self::Pending,
            "UNMAPPED" => Self::Unmapped,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<ReviewStatus> for String {
    fn from(status: ReviewStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the alias table: `entity_text, entity_label, canonical_final[, review_status]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AliasEntry {
    pub entity_text: Option<String>,
    pub entity_label: String,
    pub canonical_final: Option<String>,
    #[serde(default)]
    pub review_status: Option<ReviewStatus>,
}

impl AliasEntry {
    pub fn new(
        entity_text: impl Into<String>,
        entity_label: impl Into<String>,
        canonical_final: impl Into<String>,
        review_status: ReviewStatus,
    ) -> Self {
        Self {
            entity_text: Some(entity_text.into()),
            entity_label: entity_label.into(),
            canonical_final: Some(canonical_final.into()),
            review_status: Some(review_status),
        }
    }

    /// Status with the table default applied
    pub fn status(&self) -> ReviewStatus {
        self.review_status.clone().unwrap_or(ReviewStatus::Pending)
    }
}
