//! Aggregate rows: edges, nodes and the external spend signal

use super::mention::Confidence;
use serde::{Deserialize, Deserializer, Serialize};

/// Directed sponsor → target relation aggregated over target mentions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRow {
    pub sponsor_name: String,
    #[serde(alias = "canonical_entity_v1_1")]
    pub canonical_entity: String,
    pub mention_count: u64,
    pub ad_count: u64,
    pub platform_count: u64,
    pub party_mode: String,
    pub tone_mode: String,
    pub high_confidence_mentions: u64,
    #[serde(default = "default_edge_confidence")]
    pub edge_confidence: Confidence,
    pub build_version: String,
}

fn default_edge_confidence() -> Confidence {
    Confidence::Medium
}

impl EdgeRow {
    /// Column order of the edges table
    pub const COLUMNS: [&'static str; 10] = [
        "sponsor_name",
        "canonical_entity",
        "mention_count",
        "ad_count",
        "platform_count",
        "party_mode",
        "tone_mode",
        "high_confidence_mentions",
        "edge_confidence",
        "build_version",
    ];

    pub fn key(&self) -> (&str, &str) {
        (&self.sponsor_name, &self.canonical_entity)
    }
}

/// Summary of a target entity that appears in at least one retained edge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRow {
    #[serde(alias = "canonical_entity_v1_1")]
    pub canonical_entity: String,
    pub mention_count: u64,
    pub ad_count: u64,
    pub sponsor_count: u64,
    pub platform_count: u64,
    pub label_mode: String,
    pub high_confidence_mentions: u64,
    pub build_version: String,
}

impl NodeRow {
    /// Column order of the nodes table
    pub const COLUMNS: [&'static str; 8] = [
        "canonical_entity",
        "mention_count",
        "ad_count",
        "sponsor_count",
        "platform_count",
        "label_mode",
        "high_confidence_mentions",
        "build_version",
    ];
}

/// Per-ad spend proxy keyed by `(platform, ad_id)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpendRow {
    pub platform: String,
    pub ad_id: String,
    #[serde(deserialize_with = "lenient_f64")]
    pub spend_proxy: f64,
}

impl SpendRow {
    pub fn new(platform: impl Into<String>, ad_id: impl Into<String>, spend_proxy: f64) -> Self {
        Self {
            platform: platform.into(),
            ad_id: ad_id.into(),
            spend_proxy,
        }
    }
}

/// Non-numeric or missing spend values coerce to 0
fn lenient_f64<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    let raw = Option::<String>::deserialize(d)?;
    Ok(raw
        .and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(0.0))
}
