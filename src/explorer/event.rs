//! Events accepted by an explorer session

use crate::graph::NodeType;
use crate::query::{ClickEvent, InteractionMode};
use crate::render::{ColorMode, SizeMode};
use serde::{Deserialize, Serialize};

/// One user interaction, tagged by `event` on the wire:
///
/// ```json
/// {"event": "set_filters", "sponsor_parties": ["REP"], "top_n_edges": 200}
/// {"event": "click", "name": "Acme PAC", "type": "sponsor"}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ExplorerEvent {
    SetFilters(FilterUpdate),
    SetModes(ModeUpdate),
    Click(ClickEvent),
    Clear,
}

/// Filter fields to replace; absent fields keep their current value
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterUpdate {
    pub sponsor_parties: Option<Vec<String>>,
    pub target_parties: Option<Vec<String>>,
    pub min_edge_mentions: Option<u64>,
    pub top_n_edges: Option<usize>,
    pub node_types: Option<Vec<NodeType>>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModeUpdate {
    pub color: Option<ColorMode>,
    pub size: Option<SizeMode>,
    pub interaction: Option<InteractionMode>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn click_without_node_parses() {
        let event: ExplorerEvent = serde_json::from_str(r#"{"event":"click"}"#).unwrap();
        assert_eq!(event, ExplorerEvent::Click(ClickEvent::empty()));
    }

    #[test]
    fn partial_filter_update() {
        let event: ExplorerEvent =
            serde_json::from_str(r#"{"event":"set_filters","node_types":["target"],"top_n_edges":50}"#).unwrap();
        let ExplorerEvent::SetFilters(update) = event else {
            panic!("expected set_filters");
        };
        assert_eq!(update.node_types, Some(vec![NodeType::Target]));
        assert_eq!(update.top_n_edges, Some(50));
        assert!(update.sponsor_parties.is_none());
    }

    #[test]
    fn unknown_event_is_rejected() {
        assert!(serde_json::from_str::<ExplorerEvent>(r#"{"event":"zoom"}"#).is_err());
    }
}
