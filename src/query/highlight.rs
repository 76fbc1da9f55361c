//! Neighbourhood highlighting around selected seeds

use super::types::Seed;
use crate::graph::{AttackGraph, NodeType};
use std::collections::HashSet;

/// Highlighted subset of a filtered graph
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Highlight {
    pub nodes: HashSet<String>,
    pub edges: HashSet<(String, String)>,
    /// Seeds that were present in the graph
    pub active_seeds: usize,
}

impl Highlight {
    pub fn contains_node(&self, name: &str) -> bool {
        self.nodes.contains(name)
    }

    pub fn contains_edge(&self, source: &str, target: &str) -> bool {
        self.edges.contains(&(source.to_string(), target.to_string()))
    }
}

/// Union over seeds of the seed and its direct neighbours.
///
/// Sponsor seeds pull in their successors, target seeds their
/// predecessors. Seeds absent from `graph` are skipped; `None` means no
/// seed was present and nothing is highlighted.
pub fn highlight(graph: &AttackGraph, seeds: &[Seed]) -> Option<Highlight> {
    let mut out = Highlight::default();

    for seed in seeds {
        if !graph.contains(&seed.name) {
            continue;
        }
        out.active_seeds += 1;
        out.nodes.insert(seed.name.clone());

        match seed.node_type {
            NodeType::Sponsor => {
                for n in graph.successors(&seed.name) {
                    out.nodes.insert(n.to_string());
                    out.edges.insert((seed.name.clone(), n.to_string()));
                }
            }
            NodeType::Target => {
                for n in graph.predecessors(&seed.name) {
                    out.nodes.insert(n.to_string());
                    out.edges.insert((n.to_string(), seed.name.clone()));
                }
            }
        }
    }

    (out.active_seeds > 0).then_some(out)
}
