//! One-shot figure of the strongest edges, coloured by entity label

use super::figure::{EdgeTrace, Figure, MarkerSymbol, NodePoint, NodeTrace, Segment, Stroke};
use super::format::thousands;
use super::palette::static_label_color;
use super::{scale_sizes, RenderError, RenderResult};
use crate::graph::{
    largest_component, spring_layout, target_meta, AttackGraph, GraphEdge, GraphNode, LayoutSettings,
    NodeKind, SponsorInfo,
};
use crate::model::{EdgeRow, NodeRow};
use serde::{Deserialize, Serialize};

const UNMAPPED_LABEL: &str = "SPONSOR_OR_UNMAPPED";
const SIZE_RANGE: (f64, f64) = (8.0, 42.0);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaticOptions {
    pub min_edge_mentions: u64,
    pub top_n_edges: usize,
    pub keep_largest_component: bool,
    #[serde(skip)]
    pub layout: LayoutSettings,
}

impl Default for StaticOptions {
    fn default() -> Self {
        Self {
            min_edge_mentions: 2,
            top_n_edges: 700,
            keep_largest_component: true,
            layout: LayoutSettings::default(),
        }
    }
}

/// Label and counts shown for a node; names missing from the nodes table get
/// the unmapped label and unit counts
struct StaticMeta<'a> {
    label: &'a str,
    mentions: u64,
    ads: u64,
    sponsors: u64,
    platforms: u64,
}

impl<'a> StaticMeta<'a> {
    fn of(node: &'a GraphNode) -> Self {
        match &node.kind {
            NodeKind::Target(t) => Self {
                label: &t.label_mode,
                mentions: t.mention_count,
                ads: t.ad_count,
                sponsors: t.sponsor_count,
                platforms: t.platform_count,
            },
            NodeKind::Sponsor(_) => Self {
                label: UNMAPPED_LABEL,
                mentions: 1,
                ads: 1,
                sponsors: 1,
                platforms: 1,
            },
        }
    }

    fn hover(&self, name: &str) -> String {
        format!(
            "node={}<br>label={}<br>mentions={}<br>ads={}<br>sponsors={}<br>platforms={}",
            name,
            self.label,
            thousands(self.mentions),
            thousands(self.ads),
            thousands(self.sponsors),
            thousands(self.platforms),
        )
    }
}

fn build_graph(edges: &[EdgeRow], nodes: &[NodeRow], options: &StaticOptions) -> AttackGraph {
    let mut kept: Vec<&EdgeRow> = edges
        .iter()
        .filter(|e| e.mention_count >= options.min_edge_mentions)
        .collect();
    kept.sort_by(|a, b| b.mention_count.cmp(&a.mention_count));
    kept.truncate(options.top_n_edges);

    let mut graph = AttackGraph::new();
    for edge in kept {
        graph.add_edge(GraphEdge::from(edge));
    }

    let meta = target_meta(nodes);
    let names: Vec<String> = graph.nodes().iter().map(|n| n.name.clone()).collect();
    for name in names {
        let node = match meta.get(name.as_str()) {
            Some(info) => GraphNode::target(name.as_str(), info.clone()),
            None => GraphNode::sponsor(name.as_str(), SponsorInfo::default()),
        };
        graph.add_node(node);
    }
    graph
}

/// Filter, prune and lay out the edge table into a static figure.
///
/// Fails with [`RenderError::EmptyGraph`] when nothing is left to draw.
pub fn render_static(edges: &[EdgeRow], nodes: &[NodeRow], options: &StaticOptions) -> RenderResult<Figure> {
    let mut graph = build_graph(edges, nodes, options);
    if options.keep_largest_component && !graph.is_empty() {
        graph = largest_component(&graph);
    }
    if graph.is_empty() {
        return Err(RenderError::EmptyGraph);
    }

    tracing::info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "rendering static graph"
    );

    let layout = spring_layout(&graph, &options.layout);

    let mut edge_trace = EdgeTrace::new("edges", Stroke::new(0.7, "rgba(120,120,120,0.35)"));
    for edge in graph.edges() {
        edge_trace.segments.push(Segment {
            source: edge.source.clone(),
            target: edge.target.clone(),
            from: layout.position_or_origin(&edge.source),
            to: layout.position_or_origin(&edge.target),
        });
    }

    let metas: Vec<StaticMeta<'_>> = graph.nodes().iter().map(StaticMeta::of).collect();
    let raw: Vec<f64> = metas.iter().map(|m| m.mentions as f64).collect();
    let sizes = scale_sizes(&raw, SIZE_RANGE.0, SIZE_RANGE.1);

    let mut node_trace = NodeTrace::new(
        "Nodes",
        MarkerSymbol::Circle,
        Stroke::new(0.8, "rgba(255,255,255,0.85)"),
    );
    for ((node, meta), size) in graph.nodes().iter().zip(&metas).zip(sizes) {
        node_trace.points.push(NodePoint {
            name: node.name.clone(),
            node_type: None,
            position: layout.position_or_origin(&node.name),
            size,
            color: static_label_color(meta.label).to_string(),
            opacity: 0.95,
            hover: meta.hover(&node.name),
        });
    }

    Ok(Figure {
        title: format!(
            "Attack-Target Graph v1.1: {} nodes, {} edges",
            thousands(graph.node_count() as u64),
            thousands(graph.edge_count() as u64),
        ),
        edge_traces: vec![edge_trace],
        node_traces: vec![node_trace],
    })
}
