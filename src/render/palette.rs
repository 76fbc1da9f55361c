//! Fixed colour tables

/// Sponsor colour by party
pub const PARTY_COLORS: &[(&str, &str)] = &[
    ("REP", "#d62728"),
    ("DEM", "#1f77b4"),
    ("IND", "#2ca02c"),
    ("OTHER", "#7f7f7f"),
    ("UNKNOWN", "#9e9e9e"),
];

/// Target colour by inferred party; REP and DEM are swapped relative to
/// sponsors so a target reads as the camp opposing its attackers
pub const TARGET_PARTY_COLORS: &[(&str, &str)] = &[
    ("REP", "#1f77b4"),
    ("DEM", "#d62728"),
    ("IND", "#2ca02c"),
    ("OTHER", "#7f7f7f"),
    ("UNKNOWN", "#9e9e9e"),
];

/// Colour by dominant entity label
pub const LABEL_COLORS: &[(&str, &str)] = &[
    ("PERSON", "#1f77b4"),
    ("ORG", "#d62728"),
    ("GPE", "#2ca02c"),
    ("SPONSOR", "#636363"),
    ("UNKNOWN", "#9e9e9e"),
];

/// Label colours of the static render, where sponsors and unmapped nodes share a label
pub const STATIC_LABEL_COLORS: &[(&str, &str)] = &[
    ("PERSON", "#1f77b4"),
    ("ORG", "#d62728"),
    ("GPE", "#2ca02c"),
    ("SPONSOR_OR_UNMAPPED", "#7f7f7f"),
];

pub const FALLBACK_GRAY: &str = "#9e9e9e";
pub const STATIC_FALLBACK_GRAY: &str = "#7f7f7f";

fn lookup(table: &[(&str, &'static str)], key: &str, fallback: &'static str) -> &'static str {
    table
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, c)| *c)
        .unwrap_or(fallback)
}

pub fn sponsor_party_color(party: &str) -> &'static str {
    lookup(PARTY_COLORS, party, FALLBACK_GRAY)
}

pub fn target_party_color(party: &str) -> &'static str {
    lookup(TARGET_PARTY_COLORS, party, FALLBACK_GRAY)
}

pub fn label_color(label: &str) -> &'static str {
    lookup(LABEL_COLORS, label, FALLBACK_GRAY)
}

pub fn static_label_color(label: &str) -> &'static str {
    lookup(STATIC_LABEL_COLORS, label, STATIC_FALLBACK_GRAY)
}
