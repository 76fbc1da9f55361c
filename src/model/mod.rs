//! Tabular data model shared by the pipeline, graph and storage layers

mod alias;
mod mention;
mod metrics;
mod rows;
mod stats;

pub use alias::{AliasEntry, ReviewStatus};
pub use mention::{CleanedMention, Confidence, DropReason, LabeledMention, Mention, QualityFlag};
pub use metrics::{MetricRow, MetricValue, MetricsLog};
pub use rows::{EdgeRow, NodeRow, SpendRow};
pub use stats::{mode_or, top_counts_string, value_counts};

/// Placeholder for a missing categorical value (party, tone, label)
pub const UNKNOWN: &str = "UNKNOWN";

/// Version tag stamped on every edge and node row of a conservative build
pub const BUILD_VERSION: &str = "v1.1_conservative";
