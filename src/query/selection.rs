//! Click-driven selection state machine

use super::types::{ClickEvent, InteractionMode, Seed};
use crate::graph::AttackGraph;

/// Current seed list; empty means no selection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    seeds: Vec<Seed>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seeds(&self) -> &[Seed] {
        &self.seeds
    }

    pub fn has_seeds(&self) -> bool {
        !self.seeds.is_empty()
    }

    /// Seeds that drive highlighting under `mode`; highlight mode uses only the first
    pub fn active_seeds(&self, mode: InteractionMode) -> &[Seed] {
        match mode {
            InteractionMode::Highlight => &self.seeds[..self.seeds.len().min(1)],
            InteractionMode::Accumulate => &self.seeds,
        }
    }

    /// Apply one click against the currently filtered graph.
    ///
    /// Returns whether the seed list changed. Clicks without an identified
    /// node, or on a node not in `graph`, leave the state unchanged.
    pub fn apply_click(&mut self, mode: InteractionMode, click: &ClickEvent, graph: &AttackGraph) -> bool {
        let Some(seed) = click.seed() else {
            return false;
        };
        if !graph.contains(&seed.name) {
            return false;
        }

        match mode {
            InteractionMode::Accumulate => {
                if let Some(pos) = self.seeds.iter().position(|s| *s == seed) {
                    self.seeds.remove(pos);
                } else {
                    self.seeds.push(seed);
                }
            }
            InteractionMode::Highlight => {
                if self.seeds.first() == Some(&seed) {
                    self.seeds.clear();
                } else {
                    self.seeds = vec![seed];
                }
            }
        }
        true
    }

    /// Reset to no selection; returns whether anything was selected
    pub fn clear(&mut self) -> bool {
        let had = self.has_seeds();
        self.seeds.clear();
        had
    }
}

/// A stateful click source that only reports a click when it differs from
/// the last one it delivered.
///
/// Every click handed to the selection machine must be followed by a re-arm,
/// applied or not, otherwise the next click on the same node is swallowed.
#[derive(Debug, Clone, Default)]
pub struct ClickSource {
    last: Option<ClickEvent>,
}

impl ClickSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pass a raw click through; repeats of the last delivered click yield `None`
    pub fn deliver(&mut self, raw: ClickEvent) -> Option<ClickEvent> {
        if self.last.as_ref() == Some(&raw) {
            return None;
        }
        self.last = Some(raw.clone());
        Some(raw)
    }

    /// Forget the last click so the next one is always delivered
    pub fn rearm(&mut self) {
        self.last = None;
    }

    pub fn is_armed(&self) -> bool {
        self.last.is_none()
    }
}
