//! Tagged sponsor/target nodes

use crate::model::UNKNOWN;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Role of a node in the sponsor → target graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    Sponsor,
    Target,
}

impl NodeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sponsor => "sponsor",
            Self::Target => "target",
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for NodeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sponsor" => Ok(Self::Sponsor),
            "target" => Ok(Self::Target),
            other => Err(format!("unknown node type: {}", other)),
        }
    }
}

/// Attributes of an ad sponsor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SponsorInfo {
    pub party: String,
    pub attack_spend: f64,
}

impl Default for SponsorInfo {
    fn default() -> Self {
        Self {
            party: UNKNOWN.to_string(),
            attack_spend: 0.0,
        }
    }
}

/// Attributes of an attacked entity, taken from the nodes table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetInfo {
    pub label_mode: String,
    pub inferred_party: String,
    pub mention_count: u64,
    pub ad_count: u64,
    pub sponsor_count: u64,
    pub platform_count: u64,
    pub received_spend: f64,
}

impl Default for TargetInfo {
    fn default() -> Self {
        Self {
            label_mode: UNKNOWN.to_string(),
            inferred_party: UNKNOWN.to_string(),
            mention_count: 0,
            ad_count: 0,
            sponsor_count: 0,
            platform_count: 0,
            received_spend: 0.0,
        }
    }
}

/// Role-specific node attributes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "node_type", rename_all = "lowercase")]
pub enum NodeKind {
    Sponsor(SponsorInfo),
    Target(TargetInfo),
}

/// A named node in the attack graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub name: String,
    #[serde(flatten)]
    pub kind: NodeKind,
}

impl GraphNode {
    pub fn sponsor(name: impl Into<String>, info: SponsorInfo) -> Self {
        Self {
            name: name.into(),
            kind: NodeKind::Sponsor(info),
        }
    }

    pub fn target(name: impl Into<String>, info: TargetInfo) -> Self {
        Self {
            name: name.into(),
            kind: NodeKind::Target(info),
        }
    }

    pub fn node_type(&self) -> NodeType {
        match self.kind {
            NodeKind::Sponsor(_) => NodeType::Sponsor,
            NodeKind::Target(_) => NodeType::Target,
        }
    }

    pub fn is_sponsor(&self) -> bool {
        matches!(self.kind, NodeKind::Sponsor(_))
    }

    /// Sponsor party, or the inferred party of a target
    pub fn party(&self) -> &str {
        match &self.kind {
            NodeKind::Sponsor(s) => &s.party,
            NodeKind::Target(t) => &t.inferred_party,
        }
    }

    /// Dominant entity label; sponsors are labelled `SPONSOR`
    pub fn label(&self) -> &str {
        match &self.kind {
            NodeKind::Sponsor(_) => "SPONSOR",
            NodeKind::Target(t) => &t.label_mode,
        }
    }

    /// Attack spend of a sponsor or spend received by a target
    pub fn spend(&self) -> f64 {
        match &self.kind {
            NodeKind::Sponsor(s) => s.attack_spend,
            NodeKind::Target(t) => t.received_spend,
        }
    }

    pub fn as_target(&self) -> Option<&TargetInfo> {
        match &self.kind {
            NodeKind::Target(t) => Some(t),
            NodeKind::Sponsor(_) => None,
        }
    }
}
