//! Shared fixtures for integration tests
//!
//! A small synthetic ad corpus: two sponsors that attack three targets often
//! enough to clear the support threshold, one sponsor that does not, and a
//! handful of rows each quality rule should drop.

#![allow(dead_code)]

use attack_graph::model::{AliasEntry, Mention, ReviewStatus, SpendRow};
use serde::Serialize;
use std::path::{Path, PathBuf};

pub const ACME: &str = "Acme Action Fund";
pub const BLUE: &str = "Blue Future PAC";
pub const CITIZENS: &str = "Citizens for Progress";

fn attack(ad: &str, sponsor: &str, text: &str, label: &str, party: &str) -> Mention {
    Mention::new(ad, "meta", sponsor, text, label)
        .with_tone("NEGATIVE")
        .with_context(format!("{} has a record of corrupt deals", text))
        .with_party(party)
}

/// Mentions whose conservative build has four edges over three targets
pub fn mentions() -> Vec<Mention> {
    vec![
        attack("a1", ACME, "Jane Smith", "PERSON", "REP"),
        attack("a2", ACME, "Sen. Jane Smith", "PERSON", "REP"),
        attack("a3", ACME, "Jane Smith", "PERSON", "REP"),
        attack("a1", ACME, "Mega Corp", "ORG", "REP"),
        attack("a2", ACME, "MEGA CORP", "ORG", "REP"),
        attack("b1", BLUE, "John Doe", "PERSON", "DEM"),
        attack("b2", BLUE, "John Doe", "PERSON", "DEM"),
        attack("b1", BLUE, "Mega Corp", "ORG", "DEM"),
        attack("b3", BLUE, "Mega Corp!", "ORG", "DEM"),
        // single ad: below the support threshold
        attack("c1", CITIZENS, "John Doe", "PERSON", "DEM"),
        // dropped by the quality filter
        attack("a4", ACME, "Vote", "ORG", "REP"),
        attack("b4", BLUE, "Smith", "PERSON", "DEM"),
        attack("b5", BLUE, "42", "ORG", "DEM"),
        // self mention
        attack("a5", ACME, "Acme", "ORG", "REP"),
        // not negative
        Mention::new("a6", "meta", ACME, "John Doe", "PERSON")
            .with_tone("POSITIVE")
            .with_context("John Doe supports local schools")
            .with_party("REP"),
    ]
}

pub fn aliases() -> Vec<AliasEntry> {
    vec![
        AliasEntry::new("Sen. Jane Smith", "PERSON", "Jane Smith", ReviewStatus::Locked),
        AliasEntry::new("John Doe", "PERSON", "Johnny Doe", ReviewStatus::Pending),
    ]
}

pub fn spend() -> Vec<SpendRow> {
    vec![
        SpendRow::new("meta", "a1", 100.0),
        SpendRow::new("meta", "a2", 50.0),
        SpendRow::new("meta", "a3", 25.0),
        SpendRow::new("meta", "b1", 10.0),
        SpendRow::new("meta", "b2", 20.0),
        SpendRow::new("meta", "b3", 5.0),
        SpendRow::new("meta", "c1", 1.0),
    ]
}

/// Paths of the input tables written by [`write_inputs`]
pub struct InputPaths {
    pub mentions: PathBuf,
    pub aliases: PathBuf,
    pub spend: PathBuf,
}

fn write_csv<T: Serialize>(path: &Path, rows: &[T]) {
    let mut writer = csv::Writer::from_path(path).expect("create csv");
    for row in rows {
        writer.serialize(row).expect("write row");
    }
    writer.flush().expect("flush csv");
}

/// Write the fixture corpus as CSV tables under `dir`
pub fn write_inputs(dir: &Path) -> InputPaths {
    let paths = InputPaths {
        mentions: dir.join("entity_mentions_labeled.csv"),
        aliases: dir.join("entity_alias_map.csv"),
        spend: dir.join("harmonized_ads.csv"),
    };
    write_csv(&paths.mentions, &mentions());
    write_csv(&paths.aliases, &aliases());
    write_csv(&paths.spend, &spend());
    paths
}
