//! Explorer figure for the currently filtered graph

use super::figure::{EdgeTrace, Figure, MarkerSymbol, NodePoint, NodeTrace, Segment, Stroke};
use super::format::{hover_text, status_line, thousands, SelectionSummary};
use super::palette::{label_color, sponsor_party_color, target_party_color};
use super::{scale_sizes, ColorMode, RenderOutcome, SizeMode};
use crate::graph::{AttackGraph, GraphNode, Layout, NodeKind};
use crate::query::{highlight, InteractionMode, SelectionState};
use serde::{Deserialize, Serialize};

pub const EMPTY_TITLE: &str = "No nodes match current filters";
pub const EMPTY_STATUS: &str = "No visible nodes. Relax filters.";

const SIZE_RANGE: (f64, f64) = (10.0, 46.0);
const OPACITY_FULL: f64 = 0.98;
const OPACITY_DIMMED: f64 = 0.14;
const DIM_EDGE: (f64, &str) = (0.6, "rgba(120,120,120,0.08)");
const HIGHLIGHT_EDGE: (f64, &str) = (0.9, "rgba(120,120,120,0.42)");

/// Colour, size and interaction selectors
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewModes {
    pub color: ColorMode,
    pub size: SizeMode,
    pub interaction: InteractionMode,
}

fn node_color(node: &GraphNode, mode: ColorMode) -> &'static str {
    match (mode, &node.kind) {
        (ColorMode::Party, NodeKind::Sponsor(s)) => sponsor_party_color(&s.party),
        (ColorMode::Party, NodeKind::Target(t)) => target_party_color(&t.inferred_party),
        (ColorMode::EntityLabel, _) => label_color(node.label()),
    }
}

fn raw_size(graph: &AttackGraph, node: &GraphNode, mode: SizeMode) -> f64 {
    match (mode, &node.kind) {
        (SizeMode::Topology, NodeKind::Sponsor(_)) => graph.out_degree(&node.name) as f64,
        (SizeMode::Topology, NodeKind::Target(_)) => graph.in_degree(&node.name) as f64,
        (SizeMode::Money, _) => node.spend(),
    }
}

/// Render `graph` with positions from the base `layout`.
///
/// With an active selection, edges and nodes outside the highlighted
/// neighbourhood are drawn dimmed instead of removed.
pub fn render_view(
    graph: &AttackGraph,
    layout: &Layout,
    modes: &ViewModes,
    selection: &SelectionState,
) -> RenderOutcome {
    if graph.is_empty() {
        return RenderOutcome::Empty {
            figure: Figure::empty(EMPTY_TITLE),
            status: EMPTY_STATUS.to_string(),
        };
    }

    let seeds = selection.active_seeds(modes.interaction);
    let selected = highlight(graph, seeds);

    let mut dim = EdgeTrace::new("dimmed", Stroke::new(DIM_EDGE.0, DIM_EDGE.1));
    let mut hi = EdgeTrace::new("highlighted", Stroke::new(HIGHLIGHT_EDGE.0, HIGHLIGHT_EDGE.1));
    for edge in graph.edges() {
        let segment = Segment {
            source: edge.source.clone(),
            target: edge.target.clone(),
            from: layout.position_or_origin(&edge.source),
            to: layout.position_or_origin(&edge.target),
        };
        match &selected {
            Some(h) if !h.contains_edge(&edge.source, &edge.target) => dim.segments.push(segment),
            _ => hi.segments.push(segment),
        }
    }

    let raw: Vec<f64> = graph
        .nodes()
        .iter()
        .map(|n| raw_size(graph, n, modes.size))
        .collect();
    let sizes = scale_sizes(&raw, SIZE_RANGE.0, SIZE_RANGE.1);

    let mut sponsors = NodeTrace::new("Sponsors", MarkerSymbol::Square, Stroke::new(1.6, "#111111"));
    let mut targets = NodeTrace::new("Targets", MarkerSymbol::Circle, Stroke::new(0.9, "#ffffff"));
    for (node, size) in graph.nodes().iter().zip(sizes) {
        let opacity = match &selected {
            Some(h) if !h.contains_node(&node.name) => OPACITY_DIMMED,
            _ => OPACITY_FULL,
        };
        let point = NodePoint {
            name: node.name.clone(),
            node_type: Some(node.node_type()),
            position: layout.position_or_origin(&node.name),
            size,
            color: node_color(node, modes.color).to_string(),
            opacity,
            hover: hover_text(graph, node),
        };
        if node.is_sponsor() {
            sponsors.points.push(point);
        } else {
            targets.points.push(point);
        }
    }

    let summary = match (&selected, modes.interaction) {
        (None, _) => SelectionSummary::None,
        (Some(h), InteractionMode::Accumulate) => SelectionSummary::Accumulated(h.active_seeds),
        (Some(_), InteractionMode::Highlight) => match seeds.first() {
            Some(seed) => SelectionSummary::Highlighted(seed),
            None => SelectionSummary::None,
        },
    };
    let status = status_line(graph, modes.color, modes.size, modes.interaction, summary);

    let figure = Figure {
        title: format!(
            "Attack-Target Interactive Graph ({} nodes, {} edges)",
            thousands(graph.node_count() as u64),
            thousands(graph.edge_count() as u64),
        ),
        edge_traces: vec![dim, hi],
        node_traces: vec![sponsors, targets],
    };

    RenderOutcome::Figure { figure, status }
}
