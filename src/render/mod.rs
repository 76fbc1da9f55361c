//! Visual encoding of attack graphs
//!
//! [`render_view`] turns a filtered graph plus the current selection into a
//! [`Figure`] and status line for the explorer. [`render_static`] produces
//! the one-shot largest-component figure from the edge and node tables.

mod batch;
mod figure;
pub mod format;
pub mod palette;
mod view;

pub use batch::{render_static, StaticOptions};
pub use figure::{EdgeTrace, Figure, MarkerSymbol, NodePoint, NodeTrace, Segment, Stroke};
pub use view::{render_view, ViewModes, EMPTY_STATUS, EMPTY_TITLE};

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("graph is empty after filtering and component pruning")]
    EmptyGraph,
}

pub type RenderResult<T> = std::result::Result<T, RenderError>;

/// How node colour is chosen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorMode {
    /// Sponsor party or inferred target party
    #[default]
    Party,
    /// Dominant entity label
    EntityLabel,
}

impl ColorMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorMode::Party => "party",
            ColorMode::EntityLabel => "entity_label",
        }
    }
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which raw metric drives node size
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeMode {
    /// Out-degree for sponsors, in-degree for targets, within the visible graph
    #[default]
    Topology,
    /// Attack spend for sponsors, received spend for targets
    Money,
}

impl SizeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SizeMode::Topology => "topology",
            SizeMode::Money => "money",
        }
    }
}

impl fmt::Display for SizeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one interactive render
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RenderOutcome {
    Figure { figure: Figure, status: String },
    /// Nothing survived the filters; carries a placeholder figure
    Empty { figure: Figure, status: String },
}

impl RenderOutcome {
    pub fn figure(&self) -> &Figure {
        match self {
            RenderOutcome::Figure { figure, .. } | RenderOutcome::Empty { figure, .. } => figure,
        }
    }

    pub fn status(&self) -> &str {
        match self {
            RenderOutcome::Figure { status, .. } | RenderOutcome::Empty { status, .. } => status,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, RenderOutcome::Empty { .. })
    }
}

/// Linearly map `values` into `[lo, hi]`; all-equal input maps to the midpoint
pub fn scale_sizes(values: &[f64], lo: f64, hi: f64) -> Vec<f64> {
    let Some(min) = values.iter().copied().reduce(f64::min) else {
        return Vec::new();
    };
    let max = values.iter().copied().fold(min, f64::max);
    if max == min {
        return vec![(lo + hi) / 2.0; values.len()];
    }
    values
        .iter()
        .map(|v| lo + (v - min) * (hi - lo) / (max - min))
        .collect()
}
