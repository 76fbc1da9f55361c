//! Number formatting and text for hover labels and the status line

use super::{ColorMode, SizeMode};
use crate::graph::{AttackGraph, GraphNode, NodeKind};
use crate::query::{InteractionMode, Seed};

fn group_digits(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// `1234567` → `1,234,567`
pub fn thousands(n: u64) -> String {
    group_digits(&n.to_string())
}

/// Two decimals with thousands separators: `1234.5` → `1,234.50`
pub fn money(v: f64) -> String {
    let fixed = format!("{:.2}", v.abs());
    let (whole, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let sign = if v < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{}{}.{}", sign, group_digits(whole), frac)
}

/// Hover text for a node of `graph`
pub fn hover_text(graph: &AttackGraph, node: &GraphNode) -> String {
    match &node.kind {
        NodeKind::Sponsor(s) => format!(
            "sponsor={}<br>party={}<br>outgoing_edges={}<br>attack_spend_total=${}",
            node.name,
            s.party,
            thousands(graph.out_degree(&node.name) as u64),
            money(s.attack_spend),
        ),
        NodeKind::Target(t) => format!(
            "target={}<br>label={}<br>inferred_party={}<br>incoming_edges={}<br>received_attack_spend=${}",
            node.name,
            t.label_mode,
            t.inferred_party,
            thousands(graph.in_degree(&node.name) as u64),
            money(t.received_spend),
        ),
    }
}

/// Selection summary appended to the status line
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionSummary<'a> {
    None,
    Accumulated(usize),
    Highlighted(&'a Seed),
}

pub fn status_line(
    graph: &AttackGraph,
    color: ColorMode,
    size: SizeMode,
    interaction: InteractionMode,
    selection: SelectionSummary<'_>,
) -> String {
    let mut status = format!(
        "Visible: {} nodes, {} edges | Mode: color={}, size={}, interaction={}",
        thousands(graph.node_count() as u64),
        thousands(graph.edge_count() as u64),
        color,
        size,
        interaction,
    );
    match selection {
        SelectionSummary::None => {}
        SelectionSummary::Accumulated(n) => status.push_str(&format!(" | Active seed nodes: {}", n)),
        SelectionSummary::Highlighted(seed) => {
            status.push_str(&format!(" | Highlight selection: {}", seed))
        }
    }
    status
}
