//! Entity quality filter
//!
//! First pass assigns each row at most one drop reason, first matching rule
//! wins. Second pass is a single label-consistency guard over the rows that
//! survived the first pass.

use crate::model::{mode_or, DropReason, LabeledMention, UNKNOWN};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{HashMap, HashSet};

/// Words too generic to identify an attack target
pub const GENERIC_STOPLIST: &[&str] = &[
    "vote",
    "votes",
    "voting",
    "senate",
    "congress",
    "america",
    "country",
    "state",
    "states",
    "people",
    "children",
    "taxpayer",
    "taxpayers",
];

/// Bare organization suffixes
pub const ORG_SUFFIX_ONLY: &[&str] = &["pac", "inc", "llc", "committee"];

static NUMERIC_ONLY: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+$").unwrap());

pub fn is_numeric_only(canonical: &str) -> bool {
    NUMERIC_ONLY.is_match(canonical)
}

pub fn is_too_short(canonical: &str) -> bool {
    canonical.chars().count() <= 2
}

pub fn is_generic(canonical: &str) -> bool {
    GENERIC_STOPLIST.contains(&canonical)
}

/// First-pass drop reason for a canonical entity with the given label
pub fn initial_drop_reason(canonical: &str, label: &str) -> Option<DropReason> {
    if canonical.is_empty() {
        Some(DropReason::EmptyOrNullEntity)
    } else if is_numeric_only(canonical) {
        Some(DropReason::NumericOnly)
    } else if is_too_short(canonical) {
        Some(DropReason::TooShort)
    } else if label == "PERSON" && canonical.split_whitespace().count() == 1 {
        Some(DropReason::SingleTokenPersonAmbiguous)
    } else if is_generic(canonical) {
        Some(DropReason::GenericTokenStoplist)
    } else if ORG_SUFFIX_ONLY.contains(&canonical) {
        Some(DropReason::OrganizationSuffixOnly)
    } else {
        None
    }
}

/// Applies both filter passes in place
#[derive(Debug, Clone, Copy, Default)]
pub struct QualityFilter;

impl QualityFilter {
    pub fn new() -> Self {
        Self
    }

    pub fn apply(&self, rows: &mut [LabeledMention]) {
        for row in rows.iter_mut() {
            if let Some(reason) = initial_drop_reason(&row.canonical_entity, &row.mention.entity_label) {
                row.drop_with(reason);
            }
        }
        self.guard_label_consistency(rows);
    }

    /// Among kept rows, an entity seen under several labels keeps only the
    /// rows carrying its dominant label; the rest become `label_conflict`.
    fn guard_label_consistency(&self, rows: &mut [LabeledMention]) {
        let mut labels_by_entity: HashMap<&str, Vec<&str>> = HashMap::new();
        for row in rows.iter().filter(|r| r.is_kept()) {
            labels_by_entity
                .entry(row.canonical_entity.as_str())
                .or_default()
                .push(row.mention.entity_label.as_str());
        }

        let dominant: HashMap<String, String> = labels_by_entity
            .into_iter()
            .filter(|(_, labels)| labels.iter().collect::<HashSet<_>>().len() > 1)
            .map(|(entity, labels)| (entity.to_string(), mode_or(labels, UNKNOWN)))
            .collect();

        if dominant.is_empty() {
            return;
        }

        for row in rows.iter_mut().filter(|r| r.is_kept()) {
            if let Some(label) = dominant.get(&row.canonical_entity) {
                if &row.mention.entity_label != label {
                    row.drop_with(DropReason::LabelConflict);
                }
            }
        }
    }
}
