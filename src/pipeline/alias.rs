//! Alias resolution: raw entity text → reviewed canonical name

use crate::model::{AliasEntry, LabeledMention, Mention, ReviewStatus};
use crate::normalize::{normalize_for_match, normalize_opt};
use std::collections::HashMap;

/// Resolved alias target for one `(entity_text_norm, entity_label)` key
#[derive(Debug, Clone, PartialEq)]
struct AliasTarget {
    canonical_final_norm: String,
    review_status: ReviewStatus,
}

/// Lookup table keyed by `(entity_text_norm, entity_label)`.
///
/// Duplicate keys keep the first entry. Only `LOCKED` entries with a
/// non-empty canonical value change a mention's canonical entity; every
/// other match only contributes its review status.
#[derive(Debug, Clone, Default)]
pub struct AliasResolver {
    table: HashMap<(String, String), AliasTarget>,
}

impl AliasResolver {
    pub fn new(entries: &[AliasEntry]) -> Self {
        let mut table = HashMap::new();
        for entry in entries {
            let key = (normalize_opt(entry.entity_text.as_deref()), entry.entity_label.clone());
            table.entry(key).or_insert_with(|| AliasTarget {
                canonical_final_norm: normalize_opt(entry.canonical_final.as_deref()),
                review_status: entry.status(),
            });
        }
        Self { table }
    }

    /// Number of distinct alias keys
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Resolve one mention into a labeled row with canonical entity and review status
    pub fn resolve(&self, mention: Mention) -> LabeledMention {
        let entity_text_norm = normalize_opt(mention.entity_text.as_deref());
        let key = (entity_text_norm.clone(), mention.entity_label.clone());

        let (canonical, status) = match self.table.get(&key) {
            Some(target) => {
                let canonical = if target.review_status.is_locked()
                    && !target.canonical_final_norm.is_empty()
                {
                    target.canonical_final_norm.clone()
                } else {
                    entity_text_norm.clone()
                };
                (canonical, target.review_status.clone())
            }
            None => (entity_text_norm.clone(), ReviewStatus::Unmapped),
        };

        LabeledMention::resolved(
            mention,
            entity_text_norm,
            normalize_for_match(&canonical),
            status,
        )
    }

    pub fn resolve_all(&self, mentions: Vec<Mention>) -> Vec<LabeledMention> {
        mentions.into_iter().map(|m| self.resolve(m)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn acme_mention(text: &str) -> Mention {
        Mention::new("ad1", "meta", "Freedom PAC", text, "ORG")
    }

    #[test]
    fn locked_alias_overrides_canonical() {
        let resolver = AliasResolver::new(&[AliasEntry::new(
            "Acme Corp",
            "ORG",
            "Acme",
            ReviewStatus::Locked,
        )]);
        let row = resolver.resolve(acme_mention("ACME   corp."));

        assert_eq!(row.entity_text_norm, "acme corp");
        assert_eq!(row.canonical_entity, "acme");
        assert_eq!(row.review_status, ReviewStatus::Locked);
    }

    #[test]
    fn pending_alias_does_not_override() {
        let resolver = AliasResolver::new(&[AliasEntry::new(
            "Acme Corp",
            "ORG",
            "Acme",
            ReviewStatus::Pending,
        )]);
        let row = resolver.resolve(acme_mention("Acme Corp"));

        assert_eq!(row.canonical_entity, "acme corp");
        assert_eq!(row.review_status, ReviewStatus::Pending);
    }

    #[test]
    fn label_is_part_of_the_key() {
        let resolver = AliasResolver::new(&[AliasEntry::new(
            "Acme Corp",
            "PERSON",
            "Acme",
            ReviewStatus::Locked,
        )]);
        let row = resolver.resolve(acme_mention("Acme Corp"));

        assert_eq!(row.canonical_entity, "acme corp");
        assert_eq!(row.review_status, ReviewStatus::Unmapped);
    }

    #[test]
    fn locked_alias_with_blank_canonical_falls_back() {
        let mut entry = AliasEntry::new("Acme Corp", "ORG", "", ReviewStatus::Locked);
        entry.canonical_final = None;
        let resolver = AliasResolver::new(&[entry]);
        let row = resolver.resolve(acme_mention("acme corp"));

        assert_eq!(row.canonical_entity, "acme corp");
        assert_eq!(row.review_status, ReviewStatus::Locked);
    }

    #[test]
    fn duplicate_keys_keep_first_entry() {
        let resolver = AliasResolver::new(&[
            AliasEntry::new("Acme Corp", "ORG", "Acme", ReviewStatus::Locked),
            AliasEntry::new("ACME CORP!", "ORG", "Acme Holdings", ReviewStatus::Locked),
        ]);
        assert_eq!(resolver.len(), 1);
        assert_eq!(resolver.resolve(acme_mention("acme corp")).canonical_entity, "acme");
    }

    #[test]
    fn missing_entity_text_resolves_to_empty() {
        let resolver = AliasResolver::default();
        let mut mention = acme_mention("x");
        mention.entity_text = None;
        let row = resolver.resolve(mention);

        assert_eq!(row.entity_text_norm, "");
        assert_eq!(row.canonical_entity, "");
        assert_eq!(row.review_status, ReviewStatus::Unmapped);
    }
}
