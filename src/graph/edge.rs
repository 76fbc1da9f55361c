//! Directed sponsor → target edges

use crate::model::{EdgeRow, UNKNOWN};
use crate::pipeline::EnrichedEdge;
use serde::{Deserialize, Serialize};

/// Edge attributes carried into the graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    pub mention_count: u64,
    pub ad_count: u64,
    pub party_mode: String,
    pub tone_mode: String,
    pub sponsor_party: String,
    pub target_party_inferred: String,
    pub edge_attack_spend: f64,
}

impl GraphEdge {
    pub fn key(&self) -> (&str, &str) {
        (&self.source, &self.target)
    }
}

impl From<&EnrichedEdge> for GraphEdge {
    fn from(e: &EnrichedEdge) -> Self {
        Self {
            source: e.edge.sponsor_name.clone(),
            target: e.edge.canonical_entity.clone(),
            mention_count: e.edge.mention_count,
            ad_count: e.edge.ad_count,
            party_mode: e.edge.party_mode.clone(),
            tone_mode: e.edge.tone_mode.clone(),
            sponsor_party: e.sponsor_party.clone(),
            target_party_inferred: e.target_party_inferred.clone(),
            edge_attack_spend: e.edge_attack_spend,
        }
    }
}

/// Unenriched edge: parties unknown, no spend
impl From<&EdgeRow> for GraphEdge {
    fn from(e: &EdgeRow) -> Self {
        Self {
            source: e.sponsor_name.clone(),
            target: e.canonical_entity.clone(),
            mention_count: e.mention_count,
            ad_count: e.ad_count,
            party_mode: e.party_mode.clone(),
            tone_mode: e.tone_mode.clone(),
            sponsor_party: UNKNOWN.to_string(),
            target_party_inferred: UNKNOWN.to_string(),
            edge_attack_spend: 0.0,
        }
    }
}
