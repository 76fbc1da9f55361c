//! Free-text canonicalization for entity matching
//!
//! Two levels are provided. `normalize_text` only folds case and
//! whitespace; `normalize_for_match` additionally strips everything outside
//! `[a-z0-9 ]` and is the key used for alias lookups, self-mention checks
//! and canonical entity names.

use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static NON_MATCH_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9\s]").unwrap());

/// Trim, lowercase and collapse internal whitespace runs to one space.
pub fn normalize_text(s: &str) -> String {
    let lowered = s.trim().to_lowercase();
    WHITESPACE_RUN.replace_all(&lowered, " ").into_owned()
}

/// Normalize for matching: `normalize_text`, drop characters outside
/// `[a-z0-9 ]`, collapse whitespace again and trim.
///
/// Idempotent. Non-ASCII letters are dropped, not transliterated.
pub fn normalize_for_match(s: &str) -> String {
    let text = normalize_text(s);
    let stripped = NON_MATCH_CHARS.replace_all(&text, "");
    WHITESPACE_RUN
        .replace_all(&stripped, " ")
        .trim()
        .to_string()
}

/// Null-aware variant: a missing value normalizes to the empty string.
pub fn normalize_opt(s: Option<&str>) -> String {
    s.map(normalize_for_match).unwrap_or_default()
}
