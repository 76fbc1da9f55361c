//! Party and attack-spend enrichment of the retained edges

use crate::model::{mode_or, CleanedMention, EdgeRow, SpendRow, UNKNOWN};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// An edge row with sponsor party, inferred target party and edge spend attached
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedEdge {
    #[serde(flatten)]
    pub edge: EdgeRow,
    pub sponsor_party: String,
    pub target_party_inferred: String,
    pub edge_attack_spend: f64,
}

/// Deduplicated spend sums at sponsor, target and edge level
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpendTotals {
    pub sponsor: HashMap<String, f64>,
    pub target: HashMap<String, f64>,
    pub edge: HashMap<(String, String), f64>,
}

impl SpendTotals {
    pub fn sponsor_spend(&self, sponsor: &str) -> f64 {
        self.sponsor.get(sponsor).copied().unwrap_or(0.0)
    }

    pub fn target_spend(&self, target: &str) -> f64 {
        self.target.get(target).copied().unwrap_or(0.0)
    }

    pub fn edge_spend(&self, sponsor: &str, target: &str) -> f64 {
        self.edge
            .get(&(sponsor.to_string(), target.to_string()))
            .copied()
            .unwrap_or(0.0)
    }
}

/// Everything enrichment derives from edges, cleaned mentions and spend
#[derive(Debug, Clone, Default)]
pub struct Enrichment {
    pub edges: Vec<EnrichedEdge>,
    pub sponsor_party: HashMap<String, String>,
    pub target_party: HashMap<String, String>,
    pub spend: SpendTotals,
}

/// Dominant `party_std` per sponsor over all of its mentions
pub fn sponsor_parties(mentions: &[CleanedMention]) -> HashMap<String, String> {
    let mut by_sponsor: HashMap<&str, Vec<&str>> = HashMap::new();
    for m in mentions {
        let parties = by_sponsor.entry(m.sponsor_name.as_str()).or_default();
        if let Some(p) = m.party_std.as_deref() {
            parties.push(p);
        }
    }
    by_sponsor
        .into_iter()
        .map(|(sponsor, parties)| (sponsor.to_string(), mode_or(parties, UNKNOWN)))
        .collect()
}

/// Party whose sponsors mention each target the most, summed over edges.
///
/// A tie for the top total yields `UNKNOWN`.
pub fn infer_target_parties<'a, I>(edges: I) -> HashMap<String, String>
where
    I: IntoIterator<Item = (&'a str, &'a str, u64)>,
{
    let mut totals: HashMap<&str, HashMap<&str, u64>> = HashMap::new();
    for (target, sponsor_party, mention_count) in edges {
        *totals.entry(target).or_default().entry(sponsor_party).or_default() += mention_count;
    }

    totals
        .into_iter()
        .map(|(target, by_party)| {
            let top = by_party.values().copied().max().unwrap_or(0);
            let winners: Vec<&str> = by_party
                .iter()
                .filter(|(_, &count)| count == top)
                .map(|(party, _)| *party)
                .collect();
            let party = match winners.as_slice() {
                [only] => only.to_string(),
                _ => UNKNOWN.to_string(),
            };
            (target.to_string(), party)
        })
        .collect()
}

/// Spend sums over target mentions.
///
/// Each level is deduplicated on its own key plus `(platform, ad_id)`, so an
/// entity named several times in one ad counts that ad's spend once. Spend
/// rows are keyed by `(platform, ad_id)`; the first row for a key wins and
/// missing keys contribute 0.
pub fn attack_spend(mentions: &[CleanedMention], spend: &[SpendRow]) -> SpendTotals {
    let mut lookup: HashMap<(&str, &str), f64> = HashMap::new();
    for row in spend {
        lookup
            .entry((row.platform.as_str(), row.ad_id.as_str()))
            .or_insert(row.spend_proxy);
    }

    let mut seen_sponsor = HashSet::new();
    let mut seen_target = HashSet::new();
    let mut seen_edge = HashSet::new();
    let mut totals = SpendTotals::default();

    for m in mentions.iter().filter(|m| m.is_target) {
        let ad = (m.platform.as_str(), m.ad_id.as_str());
        let value = lookup.get(&ad).copied().unwrap_or(0.0);

        if seen_sponsor.insert((m.sponsor_name.as_str(), ad)) {
            *totals.sponsor.entry(m.sponsor_name.clone()).or_default() += value;
        }
        if seen_target.insert((m.canonical_entity.as_str(), ad)) {
            *totals.target.entry(m.canonical_entity.clone()).or_default() += value;
        }
        if seen_edge.insert((m.sponsor_name.as_str(), m.canonical_entity.as_str(), ad)) {
            *totals
                .edge
                .entry((m.sponsor_name.clone(), m.canonical_entity.clone()))
                .or_default() += value;
        }
    }
    totals
}

/// Attach parties and spend to every retained edge
pub fn enrich(edges: &[EdgeRow], mentions: &[CleanedMention], spend: &[SpendRow]) -> Enrichment {
    let sponsor_party = sponsor_parties(mentions);
    let party_of = |sponsor: &str| {
        sponsor_party
            .get(sponsor)
            .cloned()
            .unwrap_or_else(|| UNKNOWN.to_string())
    };

    let sponsor_party_per_edge: Vec<String> = edges.iter().map(|e| party_of(&e.sponsor_name)).collect();
    let target_party = infer_target_parties(
        edges
            .iter()
            .zip(&sponsor_party_per_edge)
            .map(|(e, p)| (e.canonical_entity.as_str(), p.as_str(), e.mention_count)),
    );
    let spend = attack_spend(mentions, spend);

    let enriched = edges
        .iter()
        .zip(sponsor_party_per_edge)
        .map(|(e, sponsor_party)| EnrichedEdge {
            target_party_inferred: target_party
                .get(&e.canonical_entity)
                .cloned()
                .unwrap_or_else(|| UNKNOWN.to_string()),
            edge_attack_spend: spend.edge_spend(&e.sponsor_name, &e.canonical_entity),
            sponsor_party,
            edge: e.clone(),
        })
        .collect();

    Enrichment {
        edges: enriched,
        sponsor_party,
        target_party,
        spend,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Confidence;

    fn cm(platform: &str, ad: &str, sponsor: &str, target: &str, party: Option<&str>, is_target: bool) -> CleanedMention {
        CleanedMention {
            platform: platform.into(),
            ad_id: ad.into(),
            sponsor_name: sponsor.into(),
            canonical_entity: target.into(),
            party_std: party.map(String::from),
            is_target,
        }
    }

    fn edge(sponsor: &str, target: &str, mentions: u64) -> EdgeRow {
        EdgeRow {
            sponsor_name: sponsor.into(),
            canonical_entity: target.into(),
            mention_count: mentions,
            ad_count: mentions,
            platform_count: 1,
            party_mode: UNKNOWN.into(),
            tone_mode: UNKNOWN.into(),
            high_confidence_mentions: mentions,
            edge_confidence: Confidence::Medium,
            build_version: "v".into(),
        }
    }

    #[test]
    fn sponsor_party_is_mode_over_all_mentions() {
        let mentions = vec![
            cm("meta", "1", "Freedom PAC", "acme", Some("REP"), true),
            cm("meta", "2", "Freedom PAC", "acme", Some("REP"), false),
            cm("meta", "3", "Freedom PAC", "acme", Some("DEM"), false),
            cm("meta", "4", "Quiet Fund", "acme", None, false),
        ];
        let parties = sponsor_parties(&mentions);
        assert_eq!(parties["Freedom PAC"], "REP");
        assert_eq!(parties["Quiet Fund"], UNKNOWN);
    }

    #[test]
    fn tied_target_party_is_unknown() {
        let parties = infer_target_parties([
            ("acme", "REP", 3),
            ("acme", "DEM", 3),
            ("globex", "REP", 2),
            ("globex", "DEM", 1),
            ("globex", "REP", 1),
        ]);
        assert_eq!(parties["acme"], UNKNOWN);
        assert_eq!(parties["globex"], "REP");
    }

    #[test]
    fn spend_is_deduplicated_per_level() {
        let mentions = vec![
            // acme named twice in ad 1
            cm("meta", "1", "Freedom PAC", "acme", Some("REP"), true),
            cm("meta", "1", "Freedom PAC", "acme", Some("REP"), true),
            cm("meta", "1", "Freedom PAC", "globex", Some("REP"), true),
            cm("meta", "2", "Freedom PAC", "acme", Some("REP"), true),
            // not a target, spend ignored
            cm("meta", "3", "Freedom PAC", "acme", Some("REP"), false),
            // no spend row
            cm("google", "9", "Freedom PAC", "acme", Some("REP"), true),
        ];
        let spend = vec![
            SpendRow::new("meta", "1", 100.0),
            SpendRow::new("meta", "2", 10.0),
            SpendRow::new("meta", "3", 1000.0),
            SpendRow::new("meta", "1", 5.0),
        ];
        let totals = attack_spend(&mentions, &spend);

        assert_eq!(totals.sponsor_spend("Freedom PAC"), 110.0);
        assert_eq!(totals.target_spend("acme"), 110.0);
        assert_eq!(totals.target_spend("globex"), 100.0);
        assert_eq!(totals.edge_spend("Freedom PAC", "acme"), 110.0);
        assert_eq!(totals.edge_spend("Freedom PAC", "globex"), 100.0);
        assert_eq!(totals.edge_spend("Nobody", "acme"), 0.0);
    }

    #[test]
    fn same_ad_id_on_other_platform_is_a_different_ad() {
        let mentions = vec![
            cm("meta", "1", "Freedom PAC", "acme", None, true),
            cm("google", "1", "Freedom PAC", "acme", None, true),
        ];
        let spend = vec![SpendRow::new("meta", "1", 4.0), SpendRow::new("google", "1", 6.0)];
        assert_eq!(attack_spend(&mentions, &spend).sponsor_spend("Freedom PAC"), 10.0);
    }

    #[test]
    fn enrich_attaches_parties_and_spend() {
        let mentions = vec![
            cm("meta", "1", "Freedom PAC", "acme", Some("REP"), true),
            cm("meta", "2", "Freedom PAC", "acme", Some("REP"), true),
            cm("meta", "3", "Liberty Fund", "acme", Some("DEM"), true),
            cm("meta", "4", "Liberty Fund", "acme", Some("DEM"), true),
        ];
        let edges = vec![edge("Freedom PAC", "acme", 2), edge("Liberty Fund", "acme", 2)];
        let spend = vec![SpendRow::new("meta", "1", 1.5), SpendRow::new("meta", "2", 2.5)];

        let out = enrich(&edges, &mentions, &spend);
        assert_eq!(out.edges.len(), 2);
        assert_eq!(out.edges[0].sponsor_party, "REP");
        assert_eq!(out.edges[1].sponsor_party, "DEM");
        assert_eq!(out.edges[0].target_party_inferred, UNKNOWN);
        assert_eq!(out.edges[0].edge_attack_spend, 4.0);
        assert_eq!(out.edges[1].edge_attack_spend, 0.0);
    }
}
