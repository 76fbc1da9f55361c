//! Edge and node aggregation over target-flagged mentions

use crate::model::{mode_or, Confidence, EdgeRow, LabeledMention, NodeRow, UNKNOWN};
use std::collections::{HashMap, HashSet};

/// Minimum support an aggregated edge needs to be retained
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SupportThreshold {
    pub min_mentions: u64,
    pub min_ads: u64,
}

impl Default for SupportThreshold {
    fn default() -> Self {
        Self {
            min_mentions: 2,
            min_ads: 2,
        }
    }
}

impl SupportThreshold {
    pub fn admits(&self, mention_count: u64, ad_count: u64) -> bool {
        mention_count >= self.min_mentions && ad_count >= self.min_ads
    }
}

/// `high` when high-confidence mentions reach `max(3, half the mentions)`
pub fn edge_confidence(high_confidence_mentions: u64, mention_count: u64) -> Confidence {
    let floor = (0.5 * mention_count as f64).max(3.0);
    if high_confidence_mentions as f64 >= floor {
        Confidence::High
    } else {
        Confidence::Medium
    }
}

/// Group rows by key, preserving first-seen group order
fn group_by<'a, K, F>(rows: impl Iterator<Item = &'a LabeledMention>, key: F) -> Vec<(K, Vec<&'a LabeledMention>)>
where
    K: Eq + std::hash::Hash + Clone,
    F: Fn(&LabeledMention) -> K,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(K, Vec<&LabeledMention>)> = Vec::new();
    for row in rows {
        let k = key(row);
        match index.get(&k) {
            Some(&i) => groups[i].1.push(row),
            None => {
                index.insert(k.clone(), groups.len());
                groups.push((k, vec![row]));
            }
        }
    }
    groups
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> u64 {
    values.collect::<HashSet<_>>().len() as u64
}

fn high_count(rows: &[&LabeledMention]) -> u64 {
    rows.iter()
        .filter(|r| r.target_confidence == Confidence::High)
        .count() as u64
}

/// Aggregate target rows into sponsor → target edges, most-mentioned first.
/// Pairs below the support threshold are not retained.
pub fn build_edges(rows: &[LabeledMention], threshold: SupportThreshold, build_version: &str) -> Vec<EdgeRow> {
    let groups = group_by(rows.iter().filter(|r| r.is_target), |r| {
        (r.mention.sponsor_name.clone(), r.canonical_entity.clone())
    });

    let mut edges: Vec<EdgeRow> = groups
        .into_iter()
        .map(|((sponsor_name, canonical_entity), members)| {
            let mention_count = members.len() as u64;
            let high_confidence_mentions = high_count(&members);
            EdgeRow {
                sponsor_name,
                canonical_entity,
                mention_count,
                ad_count: distinct(members.iter().map(|r| r.mention.ad_id.as_str())),
                platform_count: distinct(members.iter().map(|r| r.mention.platform.as_str())),
                party_mode: mode_or(members.iter().filter_map(|r| r.mention.party_std.as_deref()), UNKNOWN),
                tone_mode: mode_or(members.iter().filter_map(|r| r.mention.tone_std.as_deref()), UNKNOWN),
                high_confidence_mentions,
                edge_confidence: edge_confidence(high_confidence_mentions, mention_count),
                build_version: build_version.to_string(),
            }
        })
        .filter(|e| threshold.admits(e.mention_count, e.ad_count))
        .collect();

    edges.sort_by(|a, b| b.mention_count.cmp(&a.mention_count));
    edges
}

/// Summaries for every canonical target present in `edges`
pub fn build_nodes(rows: &[LabeledMention], edges: &[EdgeRow], build_version: &str) -> Vec<NodeRow> {
    let targets: HashSet<&str> = edges.iter().map(|e| e.canonical_entity.as_str()).collect();
    if targets.is_empty() {
        return Vec::new();
    }

    let universe = rows
        .iter()
        .filter(|r| r.is_target && targets.contains(r.canonical_entity.as_str()));
    let groups = group_by(universe, |r| r.canonical_entity.clone());

    let mut nodes: Vec<NodeRow> = groups
        .into_iter()
        .map(|(canonical_entity, members)| NodeRow {
            canonical_entity,
            mention_count: members.len() as u64,
            ad_count: distinct(members.iter().map(|r| r.mention.ad_id.as_str())),
            sponsor_count: distinct(members.iter().map(|r| r.mention.sponsor_name.as_str())),
            platform_count: distinct(members.iter().map(|r| r.mention.platform.as_str())),
            label_mode: mode_or(members.iter().map(|r| r.mention.entity_label.as_str()), UNKNOWN),
            high_confidence_mentions: high_count(&members),
            build_version: build_version.to_string(),
        })
        .collect();

    nodes.sort_by(|a, b| b.mention_count.cmp(&a.mention_count));
    nodes
}
