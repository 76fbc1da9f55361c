//! Serialisable figure description consumed by whatever draws the graph

use crate::graph::{NodeType, Position};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerSymbol {
    Square,
    Circle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub width: f64,
    pub color: String,
}

impl Stroke {
    pub fn new(width: f64, color: impl Into<String>) -> Self {
        Self {
            width,
            color: color.into(),
        }
    }
}

/// One drawn edge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub source: String,
    pub target: String,
    pub from: Position,
    pub to: Position,
}

/// Edges sharing one stroke style
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeTrace {
    pub name: String,
    pub line: Stroke,
    pub segments: Vec<Segment>,
}

impl EdgeTrace {
    pub fn new(name: impl Into<String>, line: Stroke) -> Self {
        Self {
            name: name.into(),
            line,
            segments: Vec::new(),
        }
    }

    pub fn contains(&self, source: &str, target: &str) -> bool {
        self.segments
            .iter()
            .any(|s| s.source == source && s.target == target)
    }
}

/// One drawn node marker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodePoint {
    pub name: String,
    /// Role carried back on click; absent in the static render
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_type: Option<NodeType>,
    pub position: Position,
    pub size: f64,
    pub color: String,
    pub opacity: f64,
    pub hover: String,
}

/// Node markers sharing one symbol and outline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeTrace {
    pub name: String,
    pub symbol: MarkerSymbol,
    pub line: Stroke,
    pub points: Vec<NodePoint>,
}

impl NodeTrace {
    pub fn new(name: impl Into<String>, symbol: MarkerSymbol, line: Stroke) -> Self {
        Self {
            name: name.into(),
            symbol,
            line,
            points: Vec::new(),
        }
    }

    pub fn point(&self, name: &str) -> Option<&NodePoint> {
        self.points.iter().find(|p| p.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Figure {
    pub title: String,
    pub edge_traces: Vec<EdgeTrace>,
    pub node_traces: Vec<NodeTrace>,
}

impl Figure {
    /// A figure with a title and nothing to draw
    pub fn empty(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            edge_traces: Vec::new(),
            node_traces: Vec::new(),
        }
    }

    pub fn node_count(&self) -> usize {
        self.node_traces.iter().map(|t| t.points.len()).sum()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_traces.iter().map(|t| t.segments.len()).sum()
    }

    /// Find a node marker across all traces
    pub fn point(&self, name: &str) -> Option<&NodePoint> {
        self.node_traces.iter().find_map(|t| t.point(name))
    }

    pub fn edge_trace(&self, name: &str) -> Option<&EdgeTrace> {
        self.edge_traces.iter().find(|t| t.name == name)
    }
}
