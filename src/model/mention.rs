//! Mention rows: raw input and the labeled output of the cleaning pipeline

use super::alias::ReviewStatus;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One (ad, sponsor, entity-text) observation as produced by upstream extraction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mention {
    pub ad_id: String,
    pub platform: String,
    pub sponsor_name: String,
    pub entity_text: Option<String>,
    pub entity_label: String,
    pub tone_std: Option<String>,
    pub context_window: Option<String>,
    pub party_std: Option<String>,
}

impl Mention {
    pub fn new(
        ad_id: impl Into<String>,
        platform: impl Into<String>,
        sponsor_name: impl Into<String>,
        entity_text: impl Into<String>,
        entity_label: impl Into<String>,
    ) -> Self {
        Self {
            ad_id: ad_id.into(),
            platform: platform.into(),
            sponsor_name: sponsor_name.into(),
            entity_text: Some(entity_text.into()),
            entity_label: entity_label.into(),
            tone_std: None,
            context_window: None,
            party_std: None,
        }
    }

    pub fn with_tone(mut self, tone: impl Into<String>) -> Self {
        self.tone_std = Some(tone.into());
        self
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context_window = Some(context.into());
        self
    }

    pub fn with_party(mut self, party: impl Into<String>) -> Self {
        self.party_std = Some(party.into());
        self
    }

    /// Tone with missing values mapped to `UNKNOWN`
    pub fn tone(&self) -> &str {
        self.tone_std.as_deref().unwrap_or(super::UNKNOWN)
    }
}

/// Quality-filter rejection code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    EmptyOrNullEntity,
    NumericOnly,
    TooShort,
    SingleTokenPersonAmbiguous,
    GenericTokenStoplist,
    OrganizationSuffixOnly,
    LabelConflict,
}

impl DropReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EmptyOrNullEntity => "empty_or_null_entity",
            Self::NumericOnly => "numeric_only",
            Self::TooShort => "too_short",
            Self::SingleTokenPersonAmbiguous => "single_token_person_ambiguous",
            Self::GenericTokenStoplist => "generic_token_stoplist",
            Self::OrganizationSuffixOnly => "organization_suffix_only",
            Self::LabelConflict => "label_conflict",
        }
    }
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Keep/drop decision of the quality filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityFlag {
    Keep,
    Drop,
}

/// Strength tier of classification evidence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Confidence {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(format!("unknown confidence tier: {}", other)),
        }
    }
}

/// A mention after alias resolution, quality filtering and classification.
///
/// Serialized column names match the cleaned mentions table, so the
/// conservative-build columns carry the `_v1_1` suffix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledMention {
    #[serde(flatten)]
    pub mention: Mention,
    pub entity_text_norm: String,
    #[serde(rename = "canonical_entity_v1_1")]
    pub canonical_entity: String,
    pub review_status: ReviewStatus,
    #[serde(with = "drop_reason_column")]
    pub drop_reason: Option<DropReason>,
    pub entity_quality_flag: QualityFlag,
    pub not_self_mention: bool,
    pub negative_tone: bool,
    pub context_has_attack_term: bool,
    #[serde(rename = "target_confidence_v1_1")]
    pub target_confidence: Confidence,
    #[serde(rename = "is_target_v1_1")]
    pub is_target: bool,
}

impl LabeledMention {
    /// Wrap a resolved mention; every downstream field starts at its neutral value
    pub fn resolved(
        mention: Mention,
        entity_text_norm: String,
        canonical_entity: String,
        review_status: ReviewStatus,
    ) -> Self {
        Self {
            mention,
            entity_text_norm,
            canonical_entity,
            review_status,
            drop_reason: None,
            entity_quality_flag: QualityFlag::Keep,
            not_self_mention: true,
            negative_tone: false,
            context_has_attack_term: false,
            target_confidence: Confidence::Low,
            is_target: false,
        }
    }

    /// Column order of the cleaned mentions table
    pub const COLUMNS: [&'static str; 19] = [
        "ad_id",
        "platform",
        "sponsor_name",
        "entity_text",
        "entity_label",
        "tone_std",
        "context_window",
        "party_std",
        "entity_text_norm",
        "canonical_entity_v1_1",
        "review_status",
        "drop_reason",
        "entity_quality_flag",
        "not_self_mention",
        "negative_tone",
        "context_has_attack_term",
        "target_confidence_v1_1",
        "is_target_v1_1",
        "build_version",
    ];

    /// Flat record in `COLUMNS` order
    pub fn to_record(&self, build_version: &str) -> Vec<String> {
        let m = &self.mention;
        let opt = |v: &Option<String>| v.clone().unwrap_or_default();
        let flag = match self.entity_quality_flag {
            QualityFlag::Keep => "keep",
            QualityFlag::Drop => "drop",
        };
        vec![
            m.ad_id.clone(),
            m.platform.clone(),
            m.sponsor_name.clone(),
            opt(&m.entity_text),
            m.entity_label.clone(),
            opt(&m.tone_std),
            opt(&m.context_window),
            opt(&m.party_std),
            self.entity_text_norm.clone(),
            self.canonical_entity.clone(),
            self.review_status.to_string(),
            self.drop_reason.map(|r| r.as_str()).unwrap_or("").to_string(),
            flag.to_string(),
            bool_cell(self.not_self_mention),
            bool_cell(self.negative_tone),
            bool_cell(self.context_has_attack_term),
            self.target_confidence.to_string(),
            bool_cell(self.is_target),
            build_version.to_string(),
        ]
    }

    pub fn is_kept(&self) -> bool {
        self.entity_quality_flag == QualityFlag::Keep
    }

    /// Reject the row with the given reason
    pub fn drop_with(&mut self, reason: DropReason) {
        self.drop_reason = Some(reason);
        self.entity_quality_flag = QualityFlag::Drop;
    }
}

fn bool_cell(v: bool) -> String {
    if v { "True" } else { "False" }.to_string()
}

/// The columns of the cleaned mentions table that spend and party
/// enrichment reads back
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanedMention {
    pub platform: String,
    pub ad_id: String,
    pub sponsor_name: String,
    #[serde(rename = "canonical_entity_v1_1")]
    pub canonical_entity: String,
    #[serde(default)]
    pub party_std: Option<String>,
    #[serde(rename = "is_target_v1_1", deserialize_with = "lenient_bool")]
    pub is_target: bool,
}

impl From<&LabeledMention> for CleanedMention {
    fn from(row: &LabeledMention) -> Self {
        Self {
            platform: row.mention.platform.clone(),
            ad_id: row.mention.ad_id.clone(),
            sponsor_name: row.mention.sponsor_name.clone(),
            canonical_entity: row.canonical_entity.clone(),
            party_std: row.mention.party_std.clone(),
            is_target: row.is_target,
        }
    }
}

/// Accepts `True`/`true`/`1` as well as JSON booleans
fn lenient_bool<'de, D: serde::Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Bool(bool),
        Int(i64),
        Text(String),
    }
    Ok(match Raw::deserialize(d)? {
        Raw::Bool(b) => b,
        Raw::Int(i) => i == 1,
        Raw::Text(s) => matches!(s.trim().to_ascii_lowercase().as_str(), "true" | "1"),
    })
}

/// The drop reason column is an empty string for kept rows
mod drop_reason_column {
    use super::DropReason;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(v: &Option<DropReason>, s: S) -> Result<S::Ok, S::Error> {
        match v {
            Some(reason) => reason.serialize(s),
            None => s.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<DropReason>, D::Error> {
        let raw = Option::<String>::deserialize(d)?.unwrap_or_default();
        if raw.is_empty() {
            return Ok(None);
        }
        DropReason::deserialize(serde::de::value::StrDeserializer::<D::Error>::new(&raw)).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drop_reason_codes_are_snake_case() {
        let json = serde_json::to_string(&DropReason::SingleTokenPersonAmbiguous).unwrap();
        assert_eq!(json, "\"single_token_person_ambiguous\"");
        assert_eq!(DropReason::LabelConflict.as_str(), "label_conflict");
    }

    #[test]
    fn labeled_mention_uses_versioned_column_names() {
        let m = Mention::new("ad1", "meta", "Freedom PAC", "Acme", "ORG");
        let row = LabeledMention::resolved(m, "acme".into(), "acme".into(), ReviewStatus::Unmapped);
        let json = serde_json::to_value(&row).unwrap();

        assert_eq!(json["canonical_entity_v1_1"], "acme");
        assert_eq!(json["is_target_v1_1"], false);
        assert_eq!(json["target_confidence_v1_1"], "low");
        assert_eq!(json["drop_reason"], "");
        assert_eq!(json["entity_quality_flag"], "keep");
        assert_eq!(json["review_status"], "UNMAPPED");
        assert_eq!(json["sponsor_name"], "Freedom PAC");
    }

    #[test]
    fn record_matches_column_layout() {
        let m = Mention::new("ad1", "meta", "Freedom PAC", "Acme", "ORG").with_tone("NEGATIVE");
        let row = LabeledMention::resolved(m, "acme".into(), "acme".into(), ReviewStatus::Locked);
        let record = row.to_record("v-test");

        assert_eq!(record.len(), LabeledMention::COLUMNS.len());
        assert_eq!(record[5], "NEGATIVE");
        assert_eq!(record[6], "");
        assert_eq!(record[10], "LOCKED");
        assert_eq!(record[17], "False");
        assert_eq!(record[18], "v-test");
    }

    #[test]
    fn drop_with_flags_row() {
        let m = Mention::new("ad1", "meta", "Freedom PAC", "42", "PERSON");
        let mut row = LabeledMention::resolved(m, "42".into(), "42".into(), ReviewStatus::Unmapped);
        row.drop_with(DropReason::NumericOnly);
        assert!(!row.is_kept());
        assert_eq!(row.drop_reason, Some(DropReason::NumericOnly));
    }

    #[test]
    fn cleaned_mention_reads_csv_style_booleans() {
        let row: CleanedMention = serde_json::from_value(serde_json::json!({
            "platform": "meta",
            "ad_id": "ad1",
            "sponsor_name": "Freedom PAC",
            "canonical_entity_v1_1": "acme",
            "party_std": "REP",
            "is_target_v1_1": "True"
        }))
        .unwrap();
        assert!(row.is_target);
        assert_eq!(row.canonical_entity, "acme");
    }

    #[test]
    fn confidence_orders_low_to_high() {
        assert!(Confidence::Low < Confidence::Medium);
        assert!(Confidence::Medium < Confidence::High);
    }
}
