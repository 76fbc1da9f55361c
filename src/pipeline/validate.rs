//! Post-pipeline invariant checks
//!
//! Violations are fatal and stop the run before anything is written.
//! Warnings are returned for the metrics stream.

use super::aggregate::SupportThreshold;
use super::classify::{is_not_self_mention, ClassifierMode};
use super::quality::{is_generic, is_numeric_only, is_too_short};
use crate::model::{EdgeRow, LabeledMention, NodeRow};
use std::collections::{BTreeMap, HashSet};
use thiserror::Error;

/// A broken post-pipeline invariant
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationFailure {
    #[error("duplicate edge key: {sponsor} -> {target}")]
    DuplicateEdgeKeys { sponsor: String, target: String },

    #[error("kept rows contain a blank canonical entity ({count} rows)")]
    BlankKeptCanonical { count: usize },

    #[error("edge {sponsor} -> {target} is below the support threshold (mentions={mention_count}, ads={ad_count})")]
    EdgeBelowSupport {
        sponsor: String,
        target: String,
        mention_count: u64,
        ad_count: u64,
    },

    #[error("generic stoplist token in final nodes: {0}")]
    GenericTokenInNodes(String),

    #[error("numeric-only entity in final nodes: {0}")]
    NumericTokenInNodes(String),

    #[error("too-short entity in final nodes: {0}")]
    TooShortTokenInNodes(String),

    #[error("target row where {target:?} is part of sponsor name {sponsor:?}")]
    SelfMentionTarget { sponsor: String, target: String },
}

/// Number of edges whose `(sponsor, target)` key was already seen
pub fn duplicate_edge_keys(edges: &[EdgeRow]) -> usize {
    let mut seen = HashSet::new();
    edges.iter().filter(|e| !seen.insert(e.key())).count()
}

/// Check the cleaned mentions, edges and nodes of one build
///
/// Node token checks apply only to classifiers that honour the quality flag.
pub fn run_validation(
    mentions: &[LabeledMention],
    edges: &[EdgeRow],
    nodes: &[NodeRow],
    threshold: SupportThreshold,
    mode: ClassifierMode,
) -> Result<Vec<String>, ValidationFailure> {
    let mut seen = HashSet::new();
    for e in edges {
        if !seen.insert(e.key()) {
            return Err(ValidationFailure::DuplicateEdgeKeys {
                sponsor: e.sponsor_name.clone(),
                target: e.canonical_entity.clone(),
            });
        }
    }

    let blank = mentions
        .iter()
        .filter(|r| r.is_kept() && r.canonical_entity.trim().is_empty())
        .count();
    if blank > 0 {
        return Err(ValidationFailure::BlankKeptCanonical { count: blank });
    }

    if let Some(e) = edges
        .iter()
        .find(|e| !threshold.admits(e.mention_count, e.ad_count))
    {
        return Err(ValidationFailure::EdgeBelowSupport {
            sponsor: e.sponsor_name.clone(),
            target: e.canonical_entity.clone(),
            mention_count: e.mention_count,
            ad_count: e.ad_count,
        });
    }

    let mut warnings = Vec::new();
    let mut targets_per_platform: BTreeMap<&str, usize> = BTreeMap::new();
    for r in mentions {
        *targets_per_platform.entry(r.mention.platform.as_str()).or_default() += r.is_target as usize;
    }
    for (platform, count) in targets_per_platform {
        if count == 0 {
            warnings.push(format!("warning: zero targets retained for platform={}", platform));
        }
    }

    let checked_nodes = if mode.honours_quality_flag() { nodes } else { &[] };
    for n in checked_nodes {
        let entity = n.canonical_entity.as_str();
        if is_generic(entity) {
            return Err(ValidationFailure::GenericTokenInNodes(entity.to_string()));
        }
        if is_numeric_only(entity) {
            return Err(ValidationFailure::NumericTokenInNodes(entity.to_string()));
        }
        if is_too_short(entity) {
            return Err(ValidationFailure::TooShortTokenInNodes(entity.to_string()));
        }
    }

    if let Some(r) = mentions
        .iter()
        .filter(|r| r.is_target)
        .find(|r| !is_not_self_mention(&r.mention.sponsor_name, &r.canonical_entity))
    {
        return Err(ValidationFailure::SelfMentionTarget {
            sponsor: r.mention.sponsor_name.clone(),
            target: r.canonical_entity.clone(),
        });
    }

    Ok(warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Confidence, Mention, ReviewStatus};

    fn edge(sponsor: &str, target: &str, mentions: u64, ads: u64) -> EdgeRow {
        EdgeRow {
            sponsor_name: sponsor.into(),
            canonical_entity: target.into(),
            mention_count: mentions,
            ad_count: ads,
            platform_count: 1,
            party_mode: "REP".into(),
            tone_mode: "NEGATIVE".into(),
            high_confidence_mentions: mentions,
            edge_confidence: Confidence::Medium,
            build_version: "v".into(),
        }
    }

    fn check(
        mentions: &[LabeledMention],
        edges: &[EdgeRow],
        nodes: &[NodeRow],
    ) -> Result<Vec<String>, ValidationFailure> {
        run_validation(mentions, edges, nodes, SupportThreshold::default(), ClassifierMode::Conservative)
    }

    fn node(target: &str) -> NodeRow {
        NodeRow {
            canonical_entity: target.into(),
            mention_count: 2,
            ad_count: 2,
            sponsor_count: 1,
            platform_count: 1,
            label_mode: "ORG".into(),
            high_confidence_mentions: 2,
            build_version: "v".into(),
        }
    }

    fn mention(platform: &str, sponsor: &str, target: &str, is_target: bool) -> LabeledMention {
        let m = Mention::new("ad1", platform, sponsor, target, "ORG");
        let mut r = LabeledMention::resolved(m, target.into(), target.into(), ReviewStatus::Unmapped);
        r.is_target = is_target;
        r
    }

    #[test]
    fn clean_build_passes_with_platform_warning() {
        let mentions = vec![
            mention("meta", "Freedom PAC", "acme", true),
            mention("google", "Freedom PAC", "globex", false),
        ];
        let warnings = run_validation(
            &mentions,
            &[edge("Freedom PAC", "acme", 2, 2)],
            &[node("acme")],
            SupportThreshold::default(),
            ClassifierMode::default(),
        )
        .unwrap();
        assert_eq!(warnings, vec!["warning: zero targets retained for platform=google"]);
    }

    #[test]
    fn duplicate_edges_fail() {
        let edges = vec![edge("Freedom PAC", "acme", 2, 2), edge("Freedom PAC", "acme", 3, 3)];
        assert_eq!(duplicate_edge_keys(&edges), 1);
        let err = check(&[], &edges, &[]).unwrap_err();
        assert!(matches!(err, ValidationFailure::DuplicateEdgeKeys { .. }));
    }

    #[test]
    fn blank_kept_canonical_fails() {
        let rows = vec![mention("meta", "Freedom PAC", "", false)];
        let err = check(&rows, &[], &[]).unwrap_err();
        assert_eq!(err, ValidationFailure::BlankKeptCanonical { count: 1 });
    }

    #[test]
    fn weak_edge_fails() {
        let err = check(&[], &[edge("Freedom PAC", "acme", 2, 1)], &[]).unwrap_err();
        assert!(matches!(err, ValidationFailure::EdgeBelowSupport { ad_count: 1, .. }));
    }

    #[test]
    fn bad_node_tokens_fail() {
        assert!(matches!(
            check(&[], &[], &[node("congress")]),
            Err(ValidationFailure::GenericTokenInNodes(_))
        ));
        assert!(matches!(
            check(&[], &[], &[node("2024")]),
            Err(ValidationFailure::NumericTokenInNodes(_))
        ));
        assert!(matches!(
            check(&[], &[], &[node("ab")]),
            Err(ValidationFailure::TooShortTokenInNodes(_))
        ));
    }

    #[test]
    fn legacy_builds_skip_node_token_checks() {
        let nodes = [node("congress"), node("2024"), node("ab")];
        let warnings =
            run_validation(&[], &[], &nodes, SupportThreshold::default(), ClassifierMode::Legacy).unwrap();
        assert!(warnings.is_empty());
    }

    #[test]
    fn self_mention_target_fails() {
        let rows = vec![mention("meta", "Acme Action Fund", "acme", true)];
        let err = check(&rows, &[], &[]).unwrap_err();
        assert!(matches!(err, ValidationFailure::SelfMentionTarget { .. }));
    }
}
