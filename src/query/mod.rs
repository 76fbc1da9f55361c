//! Interactive queries over the attack graph
//!
//! Filtering produces the visible subgraph, the selection state machine
//! turns clicks into seeds, and highlighting derives the emphasised
//! neighbourhood of those seeds.

mod filter;
mod highlight;
mod selection;
mod types;

pub use filter::GraphFilter;
pub use highlight::{highlight, Highlight};
pub use selection::{ClickSource, SelectionState};
pub use types::{ClickEvent, InteractionMode, NodeVisibility, Seed};
