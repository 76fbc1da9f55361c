//! Sponsor → target graph structures

mod components;
mod digraph;
mod edge;
mod layout;
mod node;
mod runtime;


pub use components::{largest_component, weakly_connected_components};
pub use digraph::AttackGraph;
pub use edge::GraphEdge;
pub use layout::{spring_layout, Layout, LayoutSettings, Position};
pub use node::{GraphNode, NodeKind, NodeType, SponsorInfo, TargetInfo};
pub use runtime::GraphRuntime;
pub(crate) use runtime::target_meta;
