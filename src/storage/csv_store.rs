//! CSV tables: pipeline inputs and build artifacts in a directory

use super::traits::{ArtifactStore, BuildArtifacts, StorageError, StorageResult};
use crate::model::{
    AliasEntry, CleanedMention, EdgeRow, LabeledMention, Mention, MetricRow, MetricsLog, NodeRow, SpendRow,
};
use crate::pipeline::PipelineOutput;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

pub const MENTIONS_FILE: &str = "entity_mentions_cleaned.csv";
pub const EDGES_FILE: &str = "attack_target_edges.csv";
pub const NODES_FILE: &str = "attack_target_nodes.csv";
pub const METRICS_FILE: &str = "cleaning_metrics.csv";

/// A required column; any of the listed names satisfies it
type Column = &'static [&'static str];

const MENTION_COLUMNS: &[Column] = &[
    &["ad_id"],
    &["platform"],
    &["sponsor_name"],
    &["entity_text"],
    &["entity_label"],
    &["tone_std"],
    &["context_window"],
    &["party_std"],
];
const ALIAS_COLUMNS: &[Column] = &[&["entity_text"], &["entity_label"], &["canonical_final"]];
const SPEND_COLUMNS: &[Column] = &[&["platform"], &["ad_id"], &["spend_proxy"]];
const CLEANED_COLUMNS: &[Column] = &[
    &["platform"],
    &["ad_id"],
    &["sponsor_name"],
    &["canonical_entity_v1_1"],
    &["is_target_v1_1"],
];
const EDGE_COLUMNS: &[Column] = &[
    &["sponsor_name"],
    &["canonical_entity", "canonical_entity_v1_1"],
    &["mention_count"],
    &["ad_count"],
    &["platform_count"],
    &["party_mode"],
    &["tone_mode"],
    &["high_confidence_mentions"],
    &["build_version"],
];
const NODE_COLUMNS: &[Column] = &[
    &["canonical_entity", "canonical_entity_v1_1"],
    &["mention_count"],
    &["ad_count"],
    &["sponsor_count"],
    &["platform_count"],
    &["label_mode"],
    &["high_confidence_mentions"],
    &["build_version"],
];
const METRIC_COLUMNS: &[Column] = &[&["stage"], &["metric"], &["value"]];

fn read_table<T: DeserializeOwned>(path: &Path, table: &str, required: &[Column]) -> StorageResult<Vec<T>> {
    if !path.exists() {
        return Err(StorageError::MissingInput {
            attempted: vec![path.to_path_buf()],
        });
    }

    let mut reader = csv::Reader::from_path(path)?;
    let headers: BTreeSet<String> = reader.headers()?.iter().map(|h| h.trim().to_string()).collect();
    let mut missing: Vec<String> = required
        .iter()
        .filter(|names| !names.iter().any(|n| headers.contains(*n)))
        .map(|names| names[0].to_string())
        .collect();
    if !missing.is_empty() {
        missing.sort();
        return Err(StorageError::MissingColumns {
            table: table.to_string(),
            missing,
        });
    }

    let rows = reader.deserialize().collect::<Result<Vec<T>, _>>()?;
    tracing::debug!(table, rows = rows.len(), path = %path.display(), "read table");
    Ok(rows)
}

/// Header is always written, so empty tables stay readable
fn write_table<T: Serialize>(path: &Path, header: &[&str], rows: &[T]) -> StorageResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_path(path)?;
    writer.write_record(header)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn read_mentions(path: &Path) -> StorageResult<Vec<Mention>> {
    read_table(path, "mentions", MENTION_COLUMNS)
}

pub fn read_aliases(path: &Path) -> StorageResult<Vec<AliasEntry>> {
    read_table(path, "alias", ALIAS_COLUMNS)
}

pub fn read_spend(path: &Path) -> StorageResult<Vec<SpendRow>> {
    read_table(path, "spend", SPEND_COLUMNS)
}

pub fn read_cleaned_mentions(path: &Path) -> StorageResult<Vec<CleanedMention>> {
    read_table(path, "cleaned mentions", CLEANED_COLUMNS)
}

pub fn read_edges(path: &Path) -> StorageResult<Vec<EdgeRow>> {
    read_table(path, "edges", EDGE_COLUMNS)
}

pub fn read_nodes(path: &Path) -> StorageResult<Vec<NodeRow>> {
    read_table(path, "nodes", NODE_COLUMNS)
}

pub fn read_metrics(path: &Path) -> StorageResult<MetricsLog> {
    read_table::<MetricRow>(path, "metrics", METRIC_COLUMNS).map(MetricsLog::from)
}

/// A directory holding one build's CSV artifacts
#[derive(Debug, Clone)]
pub struct CsvStore {
    dir: PathBuf,
}

impl CsvStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self, file: &str) -> PathBuf {
        self.dir.join(file)
    }

    pub fn write_mentions(&self, rows: &[LabeledMention], build_version: &str) -> StorageResult<PathBuf> {
        let path = self.path(MENTIONS_FILE);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut writer = csv::Writer::from_path(&path)?;
        writer.write_record(LabeledMention::COLUMNS)?;
        for row in rows {
            writer.write_record(row.to_record(build_version))?;
        }
        writer.flush()?;
        Ok(path)
    }

    pub fn write_edges(&self, rows: &[EdgeRow]) -> StorageResult<PathBuf> {
        let path = self.path(EDGES_FILE);
        write_table(&path, &EdgeRow::COLUMNS, rows)?;
        Ok(path)
    }

    pub fn write_nodes(&self, rows: &[NodeRow]) -> StorageResult<PathBuf> {
        let path = self.path(NODES_FILE);
        write_table(&path, &NodeRow::COLUMNS, rows)?;
        Ok(path)
    }

    pub fn write_metrics(&self, metrics: &MetricsLog) -> StorageResult<PathBuf> {
        let path = self.path(METRICS_FILE);
        write_table(&path, &MetricRow::COLUMNS, metrics.rows())?;
        Ok(path)
    }
}

impl ArtifactStore for CsvStore {
    fn save_build(&self, output: &PipelineOutput) -> StorageResult<()> {
        let written = [
            self.write_mentions(&output.mentions, &output.build_version)?,
            self.write_edges(&output.edges)?,
            self.write_nodes(&output.nodes)?,
            self.write_metrics(&output.metrics)?,
        ];
        for path in &written {
            tracing::info!(path = %path.display(), "wrote artifact");
        }
        Ok(())
    }

    /// The directory holds a single build; any other version is absent
    fn load_build(&self, build_version: &str) -> StorageResult<Option<BuildArtifacts>> {
        let edges_path = self.path(EDGES_FILE);
        if !edges_path.exists() {
            return Ok(None);
        }
        let edges = read_edges(&edges_path)?;
        if edges.iter().any(|e| e.build_version != build_version) {
            return Ok(None);
        }

        let metrics_path = self.path(METRICS_FILE);
        let metrics = if metrics_path.exists() {
            read_metrics(&metrics_path)?
        } else {
            MetricsLog::new()
        };

        Ok(Some(BuildArtifacts {
            build_version: build_version.to_string(),
            mentions: read_cleaned_mentions(&self.path(MENTIONS_FILE))?,
            edges,
            nodes: read_nodes(&self.path(NODES_FILE))?,
            metrics,
        }))
    }

    fn list_builds(&self) -> StorageResult<Vec<String>> {
        let edges_path = self.path(EDGES_FILE);
        if !edges_path.exists() {
            return Ok(Vec::new());
        }
        let versions: BTreeSet<String> = read_edges(&edges_path)?
            .into_iter()
            .map(|e| e.build_version)
            .collect();
        Ok(versions.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Confidence, MetricValue, ReviewStatus};

    fn write(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn reads_mentions_with_blank_cells() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            dir.path(),
            "mentions.csv",
            "ad_id,platform,sponsor_name,entity_text,entity_label,tone_std,context_window,party_std,extra\n\
             ad1,meta,Freedom PAC,Jane Smith,PERSON,NEGATIVE,,REP,x\n",
        );
        let rows = read_mentions(&path).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].entity_text.as_deref(), Some("Jane Smith"));
        assert_eq!(rows[0].context_window, None);
        assert_eq!(rows[0].party_std.as_deref(), Some("REP"));
    }

    #[test]
    fn schema_violation_names_sorted_missing_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "alias.csv", "entity_text,review_status\nAcme,LOCKED\n");
        match read_aliases(&path).unwrap_err() {
            StorageError::MissingColumns { table, missing } => {
                assert_eq!(table, "alias");
                assert_eq!(missing, vec!["canonical_final", "entity_label"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn alias_status_column_is_optional() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            dir.path(),
            "alias.csv",
            "entity_text,entity_label,canonical_final\nAcme Corp,ORG,Acme\n",
        );
        let rows = read_aliases(&path).unwrap();
        assert_eq!(rows[0].review_status, None);

        let path = write(
            dir.path(),
            "alias2.csv",
            "entity_text,entity_label,canonical_final,review_status\nAcme Corp,ORG,Acme,LOCKED\n",
        );
        assert_eq!(read_aliases(&path).unwrap()[0].review_status, Some(ReviewStatus::Locked));
    }

    #[test]
    fn non_numeric_spend_is_zero() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            dir.path(),
            "spend.csv",
            "platform,ad_id,spend_proxy\nmeta,ad1,12.5\nmeta,ad2,n/a\ngoogle,ad3,\n",
        );
        let spend: Vec<f64> = read_spend(&path).unwrap().iter().map(|s| s.spend_proxy).collect();
        assert_eq!(spend, vec![12.5, 0.0, 0.0]);
    }

    #[test]
    fn missing_file_is_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_edges(&dir.path().join("nope.csv")).unwrap_err();
        assert!(matches!(err, StorageError::MissingInput { .. }));
    }

    #[test]
    fn edges_and_metrics_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvStore::new(dir.path().join("out"));
        let edges = vec![EdgeRow {
            sponsor_name: "Freedom PAC".into(),
            canonical_entity: "jane smith".into(),
            mention_count: 4,
            ad_count: 3,
            platform_count: 2,
            party_mode: "REP".into(),
            tone_mode: "NEGATIVE".into(),
            high_confidence_mentions: 4,
            edge_confidence: Confidence::High,
            build_version: "v-test".into(),
        }];
        let mut metrics = MetricsLog::new();
        metrics.add("baseline", "rows_total", 10usize);
        metrics.add("baseline", "is_target_rate_v1", 0.25);
        metrics.add("baseline", "top25_targets_v1", "jane smith:4");

        let edges_path = store.write_edges(&edges).unwrap();
        let metrics_path = store.write_metrics(&metrics).unwrap();

        assert_eq!(read_edges(&edges_path).unwrap(), edges);
        let back = read_metrics(&metrics_path).unwrap();
        assert_eq!(back.get("baseline", "rows_total"), Some(&MetricValue::Int(10)));
        assert_eq!(back.get("baseline", "is_target_rate_v1"), Some(&MetricValue::Float(0.25)));
        assert_eq!(
            back.get("baseline", "top25_targets_v1"),
            Some(&MetricValue::Text("jane smith:4".into()))
        );
    }

    #[test]
    fn empty_tables_keep_their_header() {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvStore::new(dir.path());
        let path = store.write_nodes(&[]).unwrap();
        assert!(read_nodes(&path).unwrap().is_empty());
    }
}
