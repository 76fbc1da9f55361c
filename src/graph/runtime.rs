//! Immutable base graph shared by every interactive recomputation

use super::digraph::AttackGraph;
use super::edge::GraphEdge;
use super::layout::{spring_layout, Layout, LayoutSettings};
use super::node::{GraphNode, NodeType, SponsorInfo, TargetInfo};
use crate::model::{mode_or, CleanedMention, EdgeRow, NodeRow, SpendRow, UNKNOWN};
use crate::pipeline::{enrich, Enrichment};
use std::collections::{BTreeSet, HashMap};

/// Base graph, node positions and filter options, computed once at startup
#[derive(Debug, Clone)]
pub struct GraphRuntime {
    edges: Vec<GraphEdge>,
    graph: AttackGraph,
    layout: Layout,
    sponsor_parties: Vec<String>,
    target_parties: Vec<String>,
}

impl GraphRuntime {
    /// Enrich raw tables and build the runtime
    pub fn from_tables(
        edges: &[EdgeRow],
        nodes: &[NodeRow],
        mentions: &[CleanedMention],
        spend: &[SpendRow],
        layout: &LayoutSettings,
    ) -> Self {
        Self::build(&enrich(edges, mentions, spend), nodes, layout)
    }

    /// Names present in the nodes table are targets; every other endpoint is a sponsor
    pub fn build(enrichment: &Enrichment, nodes: &[NodeRow], layout: &LayoutSettings) -> Self {
        let edges: Vec<GraphEdge> = enrichment.edges.iter().map(GraphEdge::from).collect();
        let targets = target_meta(nodes);

        let mut graph = AttackGraph::new();
        for edge in &edges {
            graph.add_edge(edge.clone());
        }

        let names: Vec<String> = graph.nodes().iter().map(|n| n.name.clone()).collect();
        for name in names {
            let node = match targets.get(name.as_str()) {
                Some(meta) => GraphNode::target(
                    name.as_str(),
                    TargetInfo {
                        inferred_party: lookup_or_unknown(&enrichment.target_party, &name),
                        received_spend: enrichment.spend.target_spend(&name),
                        ..meta.clone()
                    },
                ),
                None => GraphNode::sponsor(
                    name.as_str(),
                    SponsorInfo {
                        party: lookup_or_unknown(&enrichment.sponsor_party, &name),
                        attack_spend: enrichment.spend.sponsor_spend(&name),
                    },
                ),
            };
            graph.add_node(node);
        }

        let sponsor_parties = sorted_distinct(edges.iter().map(|e| e.sponsor_party.as_str()));
        let target_parties = sorted_distinct(edges.iter().map(|e| e.target_party_inferred.as_str()));
        let layout = spring_layout(&graph, layout);

        tracing::info!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "built base graph"
        );

        Self {
            edges,
            graph,
            layout,
            sponsor_parties,
            target_parties,
        }
    }

    /// Enriched edge rows in table order
    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    pub fn graph(&self) -> &AttackGraph {
        &self.graph
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Sorted distinct sponsor parties across edges
    pub fn sponsor_parties(&self) -> &[String] {
        &self.sponsor_parties
    }

    /// Sorted distinct inferred target parties across edges
    pub fn target_parties(&self) -> &[String] {
        &self.target_parties
    }

    pub fn node(&self, name: &str) -> Option<&GraphNode> {
        self.graph.node(name)
    }

    pub fn node_type(&self, name: &str) -> Option<NodeType> {
        self.graph.node(name).map(GraphNode::node_type)
    }
}

fn lookup_or_unknown(map: &HashMap<String, String>, key: &str) -> String {
    map.get(key).cloned().unwrap_or_else(|| UNKNOWN.to_string())
}

fn sorted_distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    values
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(String::from)
        .collect()
}

/// One metadata record per canonical target; repeated rows keep the
/// largest counts and the most common label
pub(crate) fn target_meta(nodes: &[NodeRow]) -> HashMap<&str, TargetInfo> {
    let mut grouped: HashMap<&str, Vec<&NodeRow>> = HashMap::new();
    for n in nodes {
        grouped.entry(n.canonical_entity.as_str()).or_default().push(n);
    }
    grouped
        .into_iter()
        .map(|(name, rows)| {
            let max = |f: fn(&NodeRow) -> u64| rows.iter().map(|r| f(*r)).max().unwrap_or(0);
            let info = TargetInfo {
                label_mode: mode_or(rows.iter().map(|r| r.label_mode.as_str()), UNKNOWN),
                inferred_party: UNKNOWN.to_string(),
                mention_count: max(|r| r.mention_count),
                ad_count: max(|r| r.ad_count),
                sponsor_count: max(|r| r.sponsor_count),
                platform_count: max(|r| r.platform_count),
                received_spend: 0.0,
            };
            (name, info)
        })
        .collect()
}
