//! Selection and visibility types

use crate::graph::NodeType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A clicked node anchoring the current selection
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Seed {
    pub name: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
}

impl Seed {
    pub fn new(name: impl Into<String>, node_type: NodeType) -> Self {
        Self {
            name: name.into(),
            node_type,
        }
    }

    pub fn sponsor(name: impl Into<String>) -> Self {
        Self::new(name, NodeType::Sponsor)
    }

    pub fn target(name: impl Into<String>) -> Self {
        Self::new(name, NodeType::Target)
    }
}

impl fmt::Display for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.node_type)
    }
}

/// How clicks change the seed set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionMode {
    /// Single seed; clicking it again clears
    #[default]
    Highlight,
    /// Seeds toggle in and out of a growing set
    Accumulate,
}

impl InteractionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Highlight => "highlight",
            Self::Accumulate => "accumulate",
        }
    }
}

impl fmt::Display for InteractionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which node roles survive filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeVisibility {
    pub sponsors: bool,
    pub targets: bool,
}

impl Default for NodeVisibility {
    fn default() -> Self {
        Self {
            sponsors: true,
            targets: true,
        }
    }
}

impl NodeVisibility {
    pub fn shows(&self, node_type: NodeType) -> bool {
        match node_type {
            NodeType::Sponsor => self.sponsors,
            NodeType::Target => self.targets,
        }
    }

    pub fn shows_all(&self) -> bool {
        self.sponsors && self.targets
    }
}

/// A raw click; either field may be missing when the click hit no node
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClickEvent {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "type")]
    pub node_type: Option<NodeType>,
}

impl ClickEvent {
    pub fn on(seed: &Seed) -> Self {
        Self {
            name: Some(seed.name.clone()),
            node_type: Some(seed.node_type),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// The identified node, if the click carries both name and type
    pub fn seed(&self) -> Option<Seed> {
        match (&self.name, self.node_type) {
            (Some(name), Some(node_type)) if !name.is_empty() => Some(Seed::new(name.clone(), node_type)),
            _ => None,
        }
    }
}
