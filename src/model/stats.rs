//! Frequency helpers with deterministic tie-breaking
//!
//! The statistical mode picks the most frequent value; among values with
//! equal counts the one encountered first in input order wins. Missing and
//! empty values are ignored, and an all-missing input yields the caller's
//! default.

use std::collections::HashMap;

/// `(value, count)` pairs sorted by count descending, ties in first-seen order
pub fn value_counts<'a, I>(values: I) -> Vec<(&'a str, usize)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut index: HashMap<&'a str, usize> = HashMap::new();
    let mut counts: Vec<(&'a str, usize)> = Vec::new();

    for v in values {
        if v.trim().is_empty() {
            continue;
        }
        match index.get(v) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(v, counts.len());
                counts.push((v, 1));
            }
        }
    }

    // Stable sort keeps first-seen order among equal counts
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

/// Most frequent non-empty value, or `default` when there is none
pub fn mode_or<'a, I>(values: I, default: &str) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    value_counts(values)
        .first()
        .map(|(v, _)| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// `name:count|name:count…` for the `n` most frequent values
pub fn top_counts_string<'a, I>(values: I, n: usize) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    value_counts(values)
        .into_iter()
        .take(n)
        .map(|(v, c)| format!("{}:{}", v, c))
        .collect::<Vec<_>>()
        .join("|")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_picks_most_frequent() {
        assert_eq!(mode_or(["DEM", "REP", "REP"], "UNKNOWN"), "REP");
    }

    #[test]
    fn mode_ties_resolve_to_first_encountered() {
        assert_eq!(mode_or(["REP", "DEM", "DEM", "REP"], "UNKNOWN"), "REP");
        assert_eq!(mode_or(["ORG", "PERSON"], "UNKNOWN"), "ORG");
        assert_eq!(mode_or(["PERSON", "ORG"], "UNKNOWN"), "PERSON");
    }

    #[test]
    fn mode_ignores_missing_and_defaults() {
        assert_eq!(mode_or(Vec::<&str>::new(), "UNKNOWN"), "UNKNOWN");
        assert_eq!(mode_or(["", "  "], "UNKNOWN"), "UNKNOWN");
        assert_eq!(mode_or(["", "", "IND"], "UNKNOWN"), "IND");
    }

    #[test]
    fn top_counts_formats_pairs() {
        let s = top_counts_string(["b", "a", "a", "c", "b", "a"], 2);
        assert_eq!(s, "a:3|b:2");
        assert_eq!(top_counts_string(Vec::<&str>::new(), 25), "");
    }
}
