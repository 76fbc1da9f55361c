//! Attack/target classification
//!
//! Signals are computed once per row; a pluggable classifier turns them into
//! a confidence tier. `Conservative` is the authoritative classifier.
//! `Legacy` reproduces the earlier looser heuristic with a `medium` tier and
//! is only used for baseline comparison.

use crate::model::{Confidence, LabeledMention};
use crate::normalize::normalize_for_match;
use serde::{Deserialize, Serialize};

/// Tones that count as negative
pub const TARGET_TONES: &[&str] = &["NEGATIVE", "CONTRAST"];

/// Entity labels eligible to be targets
pub const TARGET_LABELS: &[&str] = &["PERSON", "ORG"];

/// Attack vocabulary matched as substrings of the lowercased context window
pub const ATTACK_TERMS: &[&str] = &[
    "failed",
    "failure",
    "dangerous",
    "corrupt",
    "lies",
    "lying",
    "radical",
    "extreme",
    "crime",
    "criminal",
    "inflation",
    "border",
    "illegal",
    "tax",
];

/// True unless the canonical target is a non-empty substring of the sponsor name
pub fn is_not_self_mention(sponsor_name: &str, canonical_entity: &str) -> bool {
    let sponsor = normalize_for_match(sponsor_name);
    let canon = normalize_for_match(canonical_entity);
    canon.is_empty() || !sponsor.contains(&canon)
}

pub fn is_negative_tone(tone: &str) -> bool {
    TARGET_TONES.contains(&tone)
}

pub fn has_attack_term(context: &str) -> bool {
    let lowered = context.to_lowercase();
    ATTACK_TERMS.iter().any(|term| lowered.contains(term))
}

/// Populate the per-row signal columns
pub fn mark_signals(row: &mut LabeledMention) {
    row.not_self_mention = is_not_self_mention(&row.mention.sponsor_name, &row.canonical_entity);
    row.negative_tone = is_negative_tone(row.mention.tone());
    row.context_has_attack_term =
        has_attack_term(row.mention.context_window.as_deref().unwrap_or(""));
}

/// Turns row signals into a confidence tier
pub trait TargetClassifier: Send + Sync {
    fn confidence(&self, row: &LabeledMention) -> Confidence;

    /// Rows at or above this tier are targets
    fn target_floor(&self) -> Confidence;

    /// Mark signals, confidence and target flag on every row
    fn classify(&self, rows: &mut [LabeledMention]) {
        for row in rows.iter_mut() {
            mark_signals(row);
            row.target_confidence = self.confidence(row);
            row.is_target = row.target_confidence >= self.target_floor();
        }
    }
}

/// Authoritative classifier: all conditions or nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct Conservative;

impl TargetClassifier for Conservative {
    fn confidence(&self, row: &LabeledMention) -> Confidence {
        let high = row.is_kept()
            && row.not_self_mention
            && row.negative_tone
            && row.context_has_attack_term
            && TARGET_LABELS.contains(&row.mention.entity_label.as_str());
        if high {
            Confidence::High
        } else {
            Confidence::Low
        }
    }

    fn target_floor(&self) -> Confidence {
        Confidence::High
    }
}

/// Earlier heuristic: one of tone/context is enough for `medium`
#[derive(Debug, Clone, Copy, Default)]
pub struct Legacy;

impl TargetClassifier for Legacy {
    fn confidence(&self, row: &LabeledMention) -> Confidence {
        if !row.not_self_mention {
            return Confidence::Low;
        }
        match (row.negative_tone, row.context_has_attack_term) {
            (true, true) => Confidence::High,
            (true, false) | (false, true) => Confidence::Medium,
            (false, false) => Confidence::Low,
        }
    }

    fn target_floor(&self) -> Confidence {
        Confidence::Medium
    }
}

/// Selectable classifier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassifierMode {
    #[default]
    Conservative,
    Legacy,
}

impl ClassifierMode {
    pub fn classifier(&self) -> Box<dyn TargetClassifier> {
        match self {
            Self::Conservative => Box::new(Conservative),
            Self::Legacy => Box::new(Legacy),
        }
    }

    /// Whether dropped rows are kept out of the targets
    pub fn honours_quality_flag(&self) -> bool {
        matches!(self, Self::Conservative)
    }
}

impl std::str::FromStr for ClassifierMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "conservative" => Ok(Self::Conservative),
            "legacy" => Ok(Self::Legacy),
            other => Err(format!("unknown classifier: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DropReason, Mention, ReviewStatus};

    fn row(sponsor: &str, canonical: &str, label: &str, tone: &str, context: &str) -> LabeledMention {
        let m = Mention::new("ad1", "meta", sponsor, canonical, label)
            .with_tone(tone)
            .with_context(context);
        LabeledMention::resolved(m, canonical.into(), canonical.into(), ReviewStatus::Unmapped)
    }

    fn classify_one(classifier: &dyn TargetClassifier, mut r: LabeledMention) -> LabeledMention {
        classifier.classify(std::slice::from_mut(&mut r));
        r
    }

    #[test]
    fn conservative_high_when_all_conditions_hold() {
        let r = row("Freedom PAC", "acme", "ORG", "NEGATIVE", "Acme is CORRUPT");
        let r = classify_one(&Conservative, r);

        assert!(r.is_target);
        assert_eq!(r.target_confidence, Confidence::High);
    }

    #[test]
    fn self_mention_is_never_a_target() {
        let r = row("Acme Action Fund", "acme", "ORG", "NEGATIVE", "corrupt failed radical");
        let r = classify_one(&Conservative, r);

        assert!(!r.not_self_mention);
        assert!(!r.is_target);
        assert_eq!(r.target_confidence, Confidence::Low);
    }

    #[test]
    fn conservative_requires_each_condition() {
        let cases = [
            row("Freedom PAC", "acme", "ORG", "POSITIVE", "corrupt"),
            row("Freedom PAC", "acme", "ORG", "CONTRAST", "great record"),
            row("Freedom PAC", "ohio", "GPE", "NEGATIVE", "corrupt"),
        ];
        for r in cases {
            assert!(!classify_one(&Conservative, r).is_target);
        }
        let contrast = row("Freedom PAC", "acme", "ORG", "CONTRAST", "illegal");
        assert!(classify_one(&Conservative, contrast).is_target);
    }

    #[test]
    fn conservative_skips_dropped_rows() {
        let mut r = row("Freedom PAC", "acme", "ORG", "NEGATIVE", "corrupt");
        r.drop_with(DropReason::LabelConflict);
        assert!(!classify_one(&Conservative, r).is_target);
    }

    #[test]
    fn legacy_uses_medium_tier() {
        let tone_only = row("Freedom PAC", "ohio", "GPE", "NEGATIVE", "great record");
        let r = classify_one(&Legacy, tone_only);
        assert_eq!(r.target_confidence, Confidence::Medium);
        assert!(r.is_target);

        let neither = row("Freedom PAC", "acme", "ORG", "POSITIVE", "great record");
        let r = classify_one(&Legacy, neither);
        assert_eq!(r.target_confidence, Confidence::Low);
        assert!(!r.is_target);

        let both = row("Freedom PAC", "acme", "ORG", "NEGATIVE", "taxes");
        assert_eq!(classify_one(&Legacy, both).target_confidence, Confidence::High);
    }

    #[test]
    fn missing_tone_and_context_are_not_signals() {
        let m = Mention::new("ad1", "meta", "Freedom PAC", "acme", "ORG");
        let mut r = LabeledMention::resolved(m, "acme".into(), "acme".into(), ReviewStatus::Unmapped);
        mark_signals(&mut r);
        assert!(!r.negative_tone);
        assert!(!r.context_has_attack_term);
        assert!(r.not_self_mention);
    }

    #[test]
    fn mode_selects_classifier() {
        let r = row("Freedom PAC", "ohio", "GPE", "NEGATIVE", "");
        let legacy = ClassifierMode::Legacy.classifier();
        let conservative = ClassifierMode::Conservative.classifier();
        assert!(classify_one(legacy.as_ref(), r.clone()).is_target);
        assert!(!classify_one(conservative.as_ref(), r).is_target);
    }
}
