//! Edge filter pipeline over the base graph

use super::types::NodeVisibility;
use crate::graph::{AttackGraph, GraphEdge, GraphRuntime};
use std::collections::HashSet;

/// Query producing the visible subgraph.
///
/// Steps run in a fixed order: minimum mentions, sponsor party, target
/// party, sort by mentions descending, top-N, build the graph of the
/// remaining edges, then drop hidden node roles. Party sets are matched
/// literally, so an empty set matches no edge.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphFilter {
    pub min_edge_mentions: u64,
    pub sponsor_parties: HashSet<String>,
    pub target_parties: HashSet<String>,
    pub top_n_edges: usize,
    pub visibility: NodeVisibility,
}

impl GraphFilter {
    /// All parties offered by the runtime, default thresholds
    pub fn for_runtime(runtime: &GraphRuntime) -> Self {
        Self {
            min_edge_mentions: 2,
            sponsor_parties: runtime.sponsor_parties().iter().cloned().collect(),
            target_parties: runtime.target_parties().iter().cloned().collect(),
            top_n_edges: 900,
            visibility: NodeVisibility::default(),
        }
    }

    pub fn min_mentions(mut self, min: u64) -> Self {
        self.min_edge_mentions = min;
        self
    }

    pub fn top_n(mut self, n: usize) -> Self {
        self.top_n_edges = n;
        self
    }

    pub fn with_sponsor_parties<I, S>(mut self, parties: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sponsor_parties = parties.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_target_parties<I, S>(mut self, parties: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.target_parties = parties.into_iter().map(Into::into).collect();
        self
    }

    pub fn visibility(mut self, visibility: NodeVisibility) -> Self {
        self.visibility = visibility;
        self
    }

    fn edge_matches(&self, edge: &GraphEdge) -> bool {
        edge.mention_count >= self.min_edge_mentions
            && self.sponsor_parties.contains(&edge.sponsor_party)
            && self.target_parties.contains(&edge.target_party_inferred)
    }

    /// Run the filter; the result may be empty
    pub fn execute(&self, runtime: &GraphRuntime) -> AttackGraph {
        let mut kept: Vec<&GraphEdge> = runtime.edges().iter().filter(|e| self.edge_matches(e)).collect();
        kept.sort_by(|a, b| b.mention_count.cmp(&a.mention_count));
        kept.truncate(self.top_n_edges);

        let base = runtime.graph();
        let mut graph = AttackGraph::new();
        for edge in kept {
            graph.add_edge(edge.clone());
        }
        let names: Vec<String> = graph.nodes().iter().map(|n| n.name.clone()).collect();
        for name in names {
            if let Some(node) = base.node(&name) {
                graph.add_node(node.clone());
            }
        }

        if !self.visibility.shows_all() {
            graph = graph.retain_nodes(|n| self.visibility.shows(n.node_type()));
        }

        tracing::debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "filtered graph"
        );
        graph
    }
}
