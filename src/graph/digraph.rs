//! Directed attack graph with insertion-ordered nodes

use super::edge::GraphEdge;
use super::node::{GraphNode, NodeType, SponsorInfo, TargetInfo};
use std::collections::{HashMap, HashSet};

/// A directed sponsor → target graph.
///
/// Nodes are kept in first-insertion order and addressed by name. At most
/// one edge exists per `(source, target)` pair; re-adding a pair replaces
/// its attributes in place.
#[derive(Debug, Clone, Default)]
pub struct AttackGraph {
    nodes: Vec<GraphNode>,
    index: HashMap<String, usize>,
    edges: Vec<GraphEdge>,
    edge_index: HashMap<(usize, usize), usize>,
    outgoing: Vec<Vec<usize>>,
    incoming: Vec<Vec<usize>>,
}

impl AttackGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node, or replace the attributes of an existing one
    pub fn add_node(&mut self, node: GraphNode) -> usize {
        if let Some(&i) = self.index.get(&node.name) {
            self.nodes[i] = node;
            return i;
        }
        let i = self.nodes.len();
        self.index.insert(node.name.clone(), i);
        self.nodes.push(node);
        self.outgoing.push(Vec::new());
        self.incoming.push(Vec::new());
        i
    }

    fn ensure_node(&mut self, name: &str, node_type: NodeType) -> usize {
        match self.index.get(name) {
            Some(&i) => i,
            None => self.add_node(match node_type {
                NodeType::Sponsor => GraphNode::sponsor(name, SponsorInfo::default()),
                NodeType::Target => GraphNode::target(name, TargetInfo::default()),
            }),
        }
    }

    /// Add an edge, creating missing endpoints with default attributes
    pub fn add_edge(&mut self, edge: GraphEdge) {
        let s = self.ensure_node(&edge.source, NodeType::Sponsor);
        let t = self.ensure_node(&edge.target, NodeType::Target);
        match self.edge_index.get(&(s, t)) {
            Some(&e) => self.edges[e] = edge,
            None => {
                self.edge_index.insert((s, t), self.edges.len());
                self.edges.push(edge);
                self.outgoing[s].push(t);
                self.incoming[t].push(s);
            }
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    pub fn node(&self, name: &str) -> Option<&GraphNode> {
        self.index.get(name).map(|&i| &self.nodes[i])
    }

    pub fn node_mut(&mut self, name: &str) -> Option<&mut GraphNode> {
        match self.index.get(name) {
            Some(&i) => Some(&mut self.nodes[i]),
            None => None,
        }
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn has_edge(&self, source: &str, target: &str) -> bool {
        self.edge(source, target).is_some()
    }

    pub fn edge(&self, source: &str, target: &str) -> Option<&GraphEdge> {
        let s = self.index_of(source)?;
        let t = self.index_of(target)?;
        self.edge_index.get(&(s, t)).map(|&e| &self.edges[e])
    }

    /// Nodes `name` points to, in edge insertion order
    pub fn successors(&self, name: &str) -> Vec<&str> {
        self.index_of(name)
            .map(|i| self.outgoing[i].iter().map(|&t| self.nodes[t].name.as_str()).collect())
            .unwrap_or_default()
    }

    /// Nodes pointing to `name`, in edge insertion order
    pub fn predecessors(&self, name: &str) -> Vec<&str> {
        self.index_of(name)
            .map(|i| self.incoming[i].iter().map(|&s| self.nodes[s].name.as_str()).collect())
            .unwrap_or_default()
    }

    pub fn out_degree(&self, name: &str) -> usize {
        self.index_of(name).map(|i| self.outgoing[i].len()).unwrap_or(0)
    }

    pub fn in_degree(&self, name: &str) -> usize {
        self.index_of(name).map(|i| self.incoming[i].len()).unwrap_or(0)
    }

    /// Undirected neighbour indices of node `i`
    pub(crate) fn undirected_neighbors(&self, i: usize) -> impl Iterator<Item = usize> + '_ {
        self.outgoing[i].iter().chain(self.incoming[i].iter()).copied()
    }

    /// `(source, target)` index pairs in edge order
    pub(crate) fn edge_pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.edges.iter().filter_map(move |e| {
            Some((self.index_of(&e.source)?, self.index_of(&e.target)?))
        })
    }

    /// Induced subgraph on the nodes accepted by `keep`.
    ///
    /// Node order and edge order follow this graph.
    pub fn retain_nodes<F>(&self, mut keep: F) -> AttackGraph
    where
        F: FnMut(&GraphNode) -> bool,
    {
        let kept: HashSet<&str> = self
            .nodes
            .iter()
            .filter(|&n| keep(n))
            .map(|n| n.name.as_str())
            .collect();
        self.induced_subgraph(&kept)
    }

    /// Induced subgraph on `names`; unknown names are ignored
    pub fn induced_subgraph(&self, names: &HashSet<&str>) -> AttackGraph {
        let mut sub = AttackGraph::new();
        for node in self.nodes.iter().filter(|n| names.contains(n.name.as_str())) {
            sub.add_node(node.clone());
        }
        for edge in &self.edges {
            if names.contains(edge.source.as_str()) && names.contains(edge.target.as_str()) {
                sub.add_edge(edge.clone());
            }
        }
        sub
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(source: &str, target: &str, mentions: u64) -> GraphEdge {
        GraphEdge {
            source: source.into(),
            target: target.into(),
            mention_count: mentions,
            ad_count: mentions,
            party_mode: "REP".into(),
            tone_mode: "NEGATIVE".into(),
            sponsor_party: "REP".into(),
            target_party_inferred: "REP".into(),
            edge_attack_spend: 0.0,
        }
    }

    #[test]
    fn endpoints_created_in_first_seen_order() {
        let mut g = AttackGraph::new();
        g.add_edge(edge("A", "t1", 2));
        g.add_edge(edge("B", "t1", 2));
        g.add_edge(edge("A", "t2", 2));

        let names: Vec<&str> = g.nodes().iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["A", "t1", "B", "t2"]);
        assert_eq!(g.node("A").unwrap().node_type(), NodeType::Sponsor);
        assert_eq!(g.node("t1").unwrap().node_type(), NodeType::Target);
    }

    #[test]
    fn duplicate_edge_replaces_attributes() {
        let mut g = AttackGraph::new();
        g.add_edge(edge("A", "t1", 2));
        g.add_edge(edge("A", "t1", 5));

        assert_eq!(g.edge_count(), 1);
        assert_eq!(g.edge("A", "t1").unwrap().mention_count, 5);
        assert_eq!(g.out_degree("A"), 1);
    }

    #[test]
    fn neighbourhood_queries() {
        let mut g = AttackGraph::new();
        g.add_edge(edge("A", "t1", 2));
        g.add_edge(edge("A", "t2", 2));
        g.add_edge(edge("B", "t2", 2));

        assert_eq!(g.successors("A"), vec!["t1", "t2"]);
        assert_eq!(g.predecessors("t2"), vec!["A", "B"]);
        assert_eq!(g.in_degree("t2"), 2);
        assert!(g.successors("missing").is_empty());
        assert!(g.has_edge("B", "t2"));
        assert!(!g.has_edge("t2", "B"));
    }

    #[test]
    fn add_node_replaces_kind() {
        let mut g = AttackGraph::new();
        g.add_edge(edge("A", "t1", 2));
        g.add_node(GraphNode::target(
            "t1",
            TargetInfo {
                label_mode: "PERSON".into(),
                ..TargetInfo::default()
            },
        ));
        assert_eq!(g.node_count(), 2);
        assert_eq!(g.node("t1").unwrap().label(), "PERSON");
    }

    #[test]
    fn induced_subgraph_keeps_internal_edges_only() {
        let mut g = AttackGraph::new();
        g.add_edge(edge("A", "t1", 2));
        g.add_edge(edge("B", "t1", 2));
        g.add_edge(edge("B", "t2", 2));

        let sub = g.retain_nodes(|n| n.name != "B");
        assert_eq!(sub.node_count(), 3);
        assert_eq!(sub.edge_count(), 1);
        assert!(sub.has_edge("A", "t1"));
        assert_eq!(sub.in_degree("t2"), 0);
    }
}
