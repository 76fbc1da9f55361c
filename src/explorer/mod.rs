//! Interactive exploration session
//!
//! An [`Explorer`] owns the immutable [`GraphRuntime`] plus the small mutable
//! view state: filters, modes, seeds and the click source. Each
//! [`ExplorerEvent`] is applied synchronously and answered with one
//! [`Frame`]. [`run_session`] drives the same loop over newline-delimited
//! JSON.

mod event;

pub use event::{ExplorerEvent, FilterUpdate, ModeUpdate};

use crate::config::ExplorerConfig;
use crate::graph::{AttackGraph, GraphRuntime, NodeType};
use crate::query::{ClickEvent, ClickSource, GraphFilter, NodeVisibility, SelectionState};
use crate::render::{render_view, RenderOutcome, ViewModes};
use serde::Serialize;
use std::io::{BufRead, Write};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExplorerError {
    #[error("malformed event: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ExplorerResult<T> = Result<T, ExplorerError>;

/// Response to one event: the recomputed view and whether the event changed anything
#[derive(Debug, Clone, Serialize)]
pub struct Frame {
    pub applied: bool,
    #[serde(flatten)]
    pub view: RenderOutcome,
}

impl Frame {
    pub fn status(&self) -> &str {
        self.view.status()
    }
}

/// One interactive session over a fixed base graph
pub struct Explorer {
    runtime: GraphRuntime,
    filter: GraphFilter,
    modes: ViewModes,
    selection: SelectionState,
    clicks: ClickSource,
}

impl Explorer {
    /// Start with every party selected and the configured thresholds and modes
    pub fn new(runtime: GraphRuntime, config: &ExplorerConfig) -> Self {
        let filter = GraphFilter::for_runtime(&runtime)
            .min_mentions(config.min_edge_mentions)
            .top_n(config.top_n_edges);
        Self {
            runtime,
            filter,
            modes: config.modes(),
            selection: SelectionState::new(),
            clicks: ClickSource::new(),
        }
    }

    pub fn runtime(&self) -> &GraphRuntime {
        &self.runtime
    }

    pub fn filter(&self) -> &GraphFilter {
        &self.filter
    }

    pub fn modes(&self) -> ViewModes {
        self.modes
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    /// The currently visible subgraph
    pub fn visible_graph(&self) -> AttackGraph {
        self.filter.execute(&self.runtime)
    }

    /// Render the current state without changing it
    pub fn frame(&self) -> Frame {
        let graph = self.visible_graph();
        self.render(&graph, true)
    }

    fn render(&self, graph: &AttackGraph, applied: bool) -> Frame {
        Frame {
            applied,
            view: render_view(graph, self.runtime.layout(), &self.modes, &self.selection),
        }
    }

    /// Apply one event and recompute the view
    pub fn dispatch(&mut self, event: ExplorerEvent) -> Frame {
        let applied = match event {
            ExplorerEvent::SetFilters(update) => {
                self.apply_filters(update);
                true
            }
            ExplorerEvent::SetModes(update) => {
                self.apply_modes(update);
                true
            }
            ExplorerEvent::Click(click) => return self.click(click),
            ExplorerEvent::Clear => {
                let had = self.selection.clear();
                self.clicks.rearm();
                tracing::debug!(had_selection = had, "selection cleared");
                true
            }
        };
        self.frame_with(applied)
    }

    fn frame_with(&self, applied: bool) -> Frame {
        let graph = self.visible_graph();
        self.render(&graph, applied)
    }

    fn click(&mut self, raw: ClickEvent) -> Frame {
        let graph = self.visible_graph();
        let Some(click) = self.clicks.deliver(raw) else {
            tracing::debug!("repeated click suppressed");
            return self.render(&graph, false);
        };

        let changed = self.selection.apply_click(self.modes.interaction, &click, &graph);
        self.clicks.rearm();
        if changed {
            tracing::debug!(seeds = self.selection.seeds().len(), "selection updated");
        } else {
            tracing::debug!(name = ?click.name, "click ignored");
        }
        self.render(&graph, changed)
    }

    fn apply_filters(&mut self, update: FilterUpdate) {
        let mut filter = self.filter.clone();
        if let Some(parties) = update.sponsor_parties {
            filter = filter.with_sponsor_parties(parties);
        }
        if let Some(parties) = update.target_parties {
            filter = filter.with_target_parties(parties);
        }
        if let Some(min) = update.min_edge_mentions {
            filter = filter.min_mentions(min);
        }
        if let Some(n) = update.top_n_edges {
            filter = filter.top_n(n);
        }
        if let Some(types) = update.node_types {
            filter = filter.visibility(NodeVisibility {
                sponsors: types.contains(&NodeType::Sponsor),
                targets: types.contains(&NodeType::Target),
            });
        }
        self.filter = filter;
        tracing::debug!("filters updated");
    }

    fn apply_modes(&mut self, update: ModeUpdate) {
        if let Some(color) = update.color {
            self.modes.color = color;
        }
        if let Some(size) = update.size {
            self.modes.size = size;
        }
        if let Some(interaction) = update.interaction {
            self.modes.interaction = interaction;
        }
        tracing::debug!(
            color = %self.modes.color,
            size = %self.modes.size,
            interaction = %self.modes.interaction,
            "modes updated"
        );
    }
}

#[derive(Serialize)]
struct ErrorLine {
    error: String,
}

/// Read one JSON event per line and write one JSON frame per line.
///
/// The initial frame is written before any input is read. Malformed lines
/// are answered with an `{"error": ...}` line and skipped; blank lines are
/// ignored.
pub fn run_session<R: BufRead, W: Write>(explorer: &mut Explorer, input: R, mut output: W) -> ExplorerResult<usize> {
    serde_json::to_writer(&mut output, &explorer.frame())?;
    writeln!(output)?;

    let mut handled = 0;
    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<ExplorerEvent>(&line) {
            Ok(event) => {
                let frame = explorer.dispatch(event);
                serde_json::to_writer(&mut output, &frame)?;
                handled += 1;
            }
            Err(e) => {
                tracing::warn!(error = %e, "skipping malformed event");
                let err = ExplorerError::from(e);
                serde_json::to_writer(&mut output, &ErrorLine { error: err.to_string() })?;
            }
        }
        writeln!(output)?;
        output.flush()?;
    }

    tracing::info!(events = handled, "explorer session finished");
    Ok(handled)
}
