//! Weakly-connected components

use super::digraph::AttackGraph;
use std::collections::HashSet;

/// Components ignoring edge direction, as node names.
///
/// Components are discovered in node order, and each component lists its
/// nodes in node order.
pub fn weakly_connected_components(graph: &AttackGraph) -> Vec<Vec<&str>> {
    let n = graph.node_count();
    let mut component_of: Vec<Option<usize>> = vec![None; n];
    let mut count = 0;

    for start in 0..n {
        if component_of[start].is_some() {
            continue;
        }
        let mut stack = vec![start];
        while let Some(current) = stack.pop() {
            if component_of[current].is_some() {
                continue;
            }
            component_of[current] = Some(count);
            for neighbor in graph.undirected_neighbors(current) {
                if component_of[neighbor].is_none() {
                    stack.push(neighbor);
                }
            }
        }
        count += 1;
    }

    let mut components: Vec<Vec<&str>> = vec![Vec::new(); count];
    for (i, node) in graph.nodes().iter().enumerate() {
        if let Some(c) = component_of[i] {
            components[c].push(node.name.as_str());
        }
    }
    components
}

/// Induced subgraph on the largest weakly-connected component.
///
/// Among equally large components the first discovered wins. An empty
/// graph yields an empty graph.
pub fn largest_component(graph: &AttackGraph) -> AttackGraph {
    let components = weakly_connected_components(graph);
    let mut best: Option<&Vec<&str>> = None;
    for c in &components {
        if best.map_or(true, |b| c.len() > b.len()) {
            best = Some(c);
        }
    }
    match best {
        Some(c) => {
            let names: HashSet<&str> = c.iter().copied().collect();
            graph.induced_subgraph(&names)
        }
        None => AttackGraph::new(),
    }
}
