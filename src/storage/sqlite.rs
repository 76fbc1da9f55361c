//! SQLite storage backend for build artifacts

use super::traits::{ArtifactStore, BuildArtifacts, OpenStore, StorageError, StorageResult};
use crate::model::{CleanedMention, Confidence, EdgeRow, MetricRow, MetricValue, MetricsLog, NodeRow};
use crate::pipeline::PipelineOutput;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// SQLite-backed artifact store
///
/// Every table is keyed by `build_version`; rows carry a `seq` column so
/// loads return them in the order they were produced. Deleting a build
/// cascades to its rows.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    fn init_schema(conn: &Connection) -> StorageResult<()> {
        conn.execute_batch(
            r#"
            PRAGMA foreign_keys = ON;

            CREATE TABLE IF NOT EXISTS builds (
                build_version TEXT PRIMARY KEY,
                created_at TEXT NOT NULL,
                warnings_json TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS edges (
                build_version TEXT NOT NULL,
                seq INTEGER NOT NULL,
                sponsor_name TEXT NOT NULL,
                canonical_entity TEXT NOT NULL,
                mention_count INTEGER NOT NULL,
                ad_count INTEGER NOT NULL,
                platform_count INTEGER NOT NULL,
                party_mode TEXT NOT NULL,
                tone_mode TEXT NOT NULL,
                high_confidence_mentions INTEGER NOT NULL,
                edge_confidence TEXT NOT NULL,
                PRIMARY KEY (build_version, seq),
                FOREIGN KEY (build_version) REFERENCES builds(build_version) ON DELETE CASCADE
            );

            CREATE INDEX IF NOT EXISTS idx_edges_key
                ON edges(build_version, sponsor_name, canonical_entity);

            CREATE TABLE IF NOT EXISTS nodes (
                build_version TEXT NOT NULL,
                seq INTEGER NOT NULL,
                canonical_entity TEXT NOT NULL,
                mention_count INTEGER NOT NULL,
                ad_count INTEGER NOT NULL,
                sponsor_count INTEGER NOT NULL,
                platform_count INTEGER NOT NULL,
                label_mode TEXT NOT NULL,
                high_confidence_mentions INTEGER NOT NULL,
                PRIMARY KEY (build_version, seq),
                FOREIGN KEY (build_version) REFERENCES builds(build_version) ON DELETE CASCADE
            );

            CREATE TABLE IF NOT EXISTS metrics (
                build_version TEXT NOT NULL,
                seq INTEGER NOT NULL,
                stage TEXT NOT NULL,
                metric TEXT NOT NULL,
                value_json TEXT NOT NULL,
                PRIMARY KEY (build_version, seq),
                FOREIGN KEY (build_version) REFERENCES builds(build_version) ON DELETE CASCADE
            );

            CREATE TABLE IF NOT EXISTS mentions (
                build_version TEXT NOT NULL,
                seq INTEGER NOT NULL,
                platform TEXT NOT NULL,
                ad_id TEXT NOT NULL,
                sponsor_name TEXT NOT NULL,
                canonical_entity TEXT NOT NULL,
                party_std TEXT,
                is_target INTEGER NOT NULL,
                PRIMARY KEY (build_version, seq),
                FOREIGN KEY (build_version) REFERENCES builds(build_version) ON DELETE CASCADE
            );
            "#,
        )?;
        Ok(())
    }

    fn conn(&self) -> StorageResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StorageError::LockPoisoned)
    }

    /// Remove a build and all of its rows
    pub fn delete_build(&self, build_version: &str) -> StorageResult<bool> {
        let conn = self.conn()?;
        let deleted = conn.execute("DELETE FROM builds WHERE build_version = ?1", params![build_version])?;
        Ok(deleted > 0)
    }

    /// Validation warnings recorded with a build
    pub fn load_warnings(&self, build_version: &str) -> StorageResult<Vec<String>> {
        let conn = self.conn()?;
        let json: Option<String> = conn
            .query_row(
                "SELECT warnings_json FROM builds WHERE build_version = ?1",
                params![build_version],
                |row| row.get(0),
            )
            .optional()?;
        match json {
            Some(j) => Ok(serde_json::from_str(&j)?),
            None => Ok(Vec::new()),
        }
    }

    /// Most recently saved build version
    pub fn latest_build(&self) -> StorageResult<Option<String>> {
        let conn = self.conn()?;
        Ok(conn
            .query_row(
                "SELECT build_version FROM builds ORDER BY created_at DESC, rowid DESC LIMIT 1",
                [],
                |row| row.get(0),
            )
            .optional()?)
    }

    fn load_edges(conn: &Connection, build_version: &str) -> StorageResult<Vec<EdgeRow>> {
        let mut stmt = conn.prepare(
            "SELECT sponsor_name, canonical_entity, mention_count, ad_count, platform_count,
                    party_mode, tone_mode, high_confidence_mentions, edge_confidence
             FROM edges WHERE build_version = ?1 ORDER BY seq",
        )?;
        let rows = stmt.query_map(params![build_version], |row| {
            Ok((
                EdgeRow {
                    sponsor_name: row.get(0)?,
                    canonical_entity: row.get(1)?,
                    mention_count: row.get::<_, i64>(2)? as u64,
                    ad_count: row.get::<_, i64>(3)? as u64,
                    platform_count: row.get::<_, i64>(4)? as u64,
                    party_mode: row.get(5)?,
                    tone_mode: row.get(6)?,
                    high_confidence_mentions: row.get::<_, i64>(7)? as u64,
                    edge_confidence: Confidence::Medium,
                    build_version: build_version.to_string(),
                },
                row.get::<_, String>(8)?,
            ))
        })?;

        let mut edges = Vec::new();
        for row in rows {
            let (mut edge, confidence) = row?;
            edge.edge_confidence = confidence.parse().map_err(StorageError::Corrupt)?;
            edges.push(edge);
        }
        Ok(edges)
    }

    fn load_nodes(conn: &Connection, build_version: &str) -> StorageResult<Vec<NodeRow>> {
        let mut stmt = conn.prepare(
            "SELECT canonical_entity, mention_count, ad_count, sponsor_count, platform_count,
                    label_mode, high_confidence_mentions
             FROM nodes WHERE build_version = ?1 ORDER BY seq",
        )?;
        let rows = stmt.query_map(params![build_version], |row| {
            Ok(NodeRow {
                canonical_entity: row.get(0)?,
                mention_count: row.get::<_, i64>(1)? as u64,
                ad_count: row.get::<_, i64>(2)? as u64,
                sponsor_count: row.get::<_, i64>(3)? as u64,
                platform_count: row.get::<_, i64>(4)? as u64,
                label_mode: row.get(5)?,
                high_confidence_mentions: row.get::<_, i64>(6)? as u64,
                build_version: build_version.to_string(),
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn load_metrics(conn: &Connection, build_version: &str) -> StorageResult<MetricsLog> {
        let mut stmt = conn.prepare(
            "SELECT stage, metric, value_json FROM metrics WHERE build_version = ?1 ORDER BY seq",
        )?;
        let rows = stmt.query_map(params![build_version], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?, row.get::<_, String>(2)?))
        })?;

        let mut out = Vec::new();
        for row in rows {
            let (stage, metric, value_json) = row?;
            let value: MetricValue = serde_json::from_str(&value_json)?;
            out.push(MetricRow { stage, metric, value });
        }
        Ok(MetricsLog::from(out))
    }

    fn load_mentions(conn: &Connection, build_version: &str) -> StorageResult<Vec<CleanedMention>> {
        let mut stmt = conn.prepare(
            "SELECT platform, ad_id, sponsor_name, canonical_entity, party_std, is_target
             FROM mentions WHERE build_version = ?1 ORDER BY seq",
        )?;
        let rows = stmt.query_map(params![build_version], |row| {
            Ok(CleanedMention {
                platform: row.get(0)?,
                ad_id: row.get(1)?,
                sponsor_name: row.get(2)?,
                canonical_entity: row.get(3)?,
                party_std: row.get(4)?,
                is_target: row.get::<_, i64>(5)? != 0,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }
}

impl OpenStore for SqliteStore {
    fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        Self::init_schema(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn open_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_schema(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

impl ArtifactStore for SqliteStore {
    fn save_build(&self, output: &PipelineOutput) -> StorageResult<()> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        let version = output.build_version.as_str();

        tx.execute("DELETE FROM builds WHERE build_version = ?1", params![version])?;
        tx.execute(
            "INSERT INTO builds (build_version, created_at, warnings_json) VALUES (?1, ?2, ?3)",
            params![
                version,
                chrono::Utc::now().to_rfc3339(),
                serde_json::to_string(&output.warnings)?
            ],
        )?;

        {
            let mut stmt = tx.prepare(
                "INSERT INTO edges (build_version, seq, sponsor_name, canonical_entity, mention_count,
                    ad_count, platform_count, party_mode, tone_mode, high_confidence_mentions, edge_confidence)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            )?;
            for (seq, e) in output.edges.iter().enumerate() {
                stmt.execute(params![
                    version,
                    seq as i64,
                    e.sponsor_name,
                    e.canonical_entity,
                    e.mention_count as i64,
                    e.ad_count as i64,
                    e.platform_count as i64,
                    e.party_mode,
                    e.tone_mode,
                    e.high_confidence_mentions as i64,
                    e.edge_confidence.as_str(),
                ])?;
            }

            let mut stmt = tx.prepare(
                "INSERT INTO nodes (build_version, seq, canonical_entity, mention_count, ad_count,
                    sponsor_count, platform_count, label_mode, high_confidence_mentions)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            )?;
            for (seq, n) in output.nodes.iter().enumerate() {
                stmt.execute(params![
                    version,
                    seq as i64,
                    n.canonical_entity,
                    n.mention_count as i64,
                    n.ad_count as i64,
                    n.sponsor_count as i64,
                    n.platform_count as i64,
                    n.label_mode,
                    n.high_confidence_mentions as i64,
                ])?;
            }

            let mut stmt = tx.prepare(
                "INSERT INTO metrics (build_version, seq, stage, metric, value_json)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for (seq, m) in output.metrics.rows().iter().enumerate() {
                stmt.execute(params![
                    version,
                    seq as i64,
                    m.stage,
                    m.metric,
                    serde_json::to_string(&m.value)?,
                ])?;
            }

            let mut stmt = tx.prepare(
                "INSERT INTO mentions (build_version, seq, platform, ad_id, sponsor_name,
                    canonical_entity, party_std, is_target)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            )?;
            for (seq, m) in output.mentions.iter().enumerate() {
                let slim = CleanedMention::from(m);
                stmt.execute(params![
                    version,
                    seq as i64,
                    slim.platform,
                    slim.ad_id,
                    slim.sponsor_name,
                    slim.canonical_entity,
                    slim.party_std,
                    slim.is_target as i64,
                ])?;
            }
        }

        tx.commit()?;
        tracing::info!(
            build_version = version,
            edges = output.edges.len(),
            nodes = output.nodes.len(),
            "saved build to sqlite"
        );
        Ok(())
    }

    fn load_build(&self, build_version: &str) -> StorageResult<Option<BuildArtifacts>> {
        let conn = self.conn()?;
        let exists: Option<String> = conn
            .query_row(
                "SELECT build_version FROM builds WHERE build_version = ?1",
                params![build_version],
                |row| row.get(0),
            )
            .optional()?;
        if exists.is_none() {
            return Ok(None);
        }

        Ok(Some(BuildArtifacts {
            build_version: build_version.to_string(),
            mentions: Self::load_mentions(&conn, build_version)?,
            edges: Self::load_edges(&conn, build_version)?,
            nodes: Self::load_nodes(&conn, build_version)?,
            metrics: Self::load_metrics(&conn, build_version)?,
        }))
    }

    fn list_builds(&self) -> StorageResult<Vec<String>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT build_version FROM builds ORDER BY build_version")?;
        let versions = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(versions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LabeledMention, Mention, ReviewStatus};

    fn create_test_store() -> SqliteStore {
        SqliteStore::open_in_memory().unwrap()
    }

    fn edge(sponsor: &str, target: &str, mentions: u64, version: &str) -> EdgeRow {
        EdgeRow {
            sponsor_name: sponsor.into(),
            canonical_entity: target.into(),
            mention_count: mentions,
            ad_count: mentions,
            platform_count: 1,
            party_mode: "REP".into(),
            tone_mode: "NEGATIVE".into(),
            high_confidence_mentions: mentions,
            edge_confidence: Confidence::High,
            build_version: version.into(),
        }
    }

    fn node(target: &str, version: &str) -> NodeRow {
        NodeRow {
            canonical_entity: target.into(),
            mention_count: 5,
            ad_count: 4,
            sponsor_count: 2,
            platform_count: 1,
            label_mode: "PERSON".into(),
            high_confidence_mentions: 5,
            build_version: version.into(),
        }
    }

    fn output(version: &str) -> PipelineOutput {
        let mut metrics = MetricsLog::new();
        metrics.add("final_edges_nodes", "edge_count_v1_1", 2usize);
        metrics.add("final_edges_nodes", "warning", "warning: zero targets retained for platform=tiktok");

        let mut mention = LabeledMention::resolved(
            Mention::new("ad1", "meta", "Freedom PAC", "Jane Smith", "PERSON").with_party("REP"),
            "jane smith".into(),
            "jane smith".into(),
            ReviewStatus::Unmapped,
        );
        mention.is_target = true;

        PipelineOutput {
            build_version: version.into(),
            mentions: vec![mention],
            edges: vec![edge("Freedom PAC", "jane smith", 5, version), edge("Liberty PAC", "ohio", 2, version)],
            nodes: vec![node("jane smith", version), node("ohio", version)],
            metrics,
            warnings: vec!["warning: zero targets retained for platform=tiktok".into()],
        }
    }

    #[test]
    fn test_save_and_load_build() {
        let store = create_test_store();
        let out = output("v1.1_conservative");
        store.save_build(&out).unwrap();

        let loaded = store.load_build("v1.1_conservative").unwrap().unwrap();
        assert_eq!(loaded.edges, out.edges);
        assert_eq!(loaded.nodes, out.nodes);
        assert_eq!(loaded.metrics.rows(), out.metrics.rows());
        assert_eq!(loaded.mentions.len(), 1);
        assert!(loaded.mentions[0].is_target);
        assert_eq!(loaded.mentions[0].party_std.as_deref(), Some("REP"));
    }

    #[test]
    fn test_missing_build_is_none() {
        let store = create_test_store();
        assert!(store.load_build("nope").unwrap().is_none());
        assert!(store.list_builds().unwrap().is_empty());
    }

    #[test]
    fn test_resave_replaces_build() {
        let store = create_test_store();
        store.save_build(&output("v1")).unwrap();

        let mut smaller = output("v1");
        smaller.edges.truncate(1);
        store.save_build(&smaller).unwrap();

        let loaded = store.load_build("v1").unwrap().unwrap();
        assert_eq!(loaded.edges.len(), 1);
        assert_eq!(store.list_builds().unwrap(), vec!["v1".to_string()]);
    }

    #[test]
    fn test_builds_are_isolated_by_version() {
        let store = create_test_store();
        store.save_build(&output("v1")).unwrap();
        store.save_build(&output("v2")).unwrap();

        assert_eq!(store.list_builds().unwrap(), vec!["v1".to_string(), "v2".to_string()]);
        assert!(store.delete_build("v1").unwrap());
        assert!(store.load_build("v1").unwrap().is_none());
        assert_eq!(store.load_build("v2").unwrap().unwrap().edges.len(), 2);
        assert_eq!(store.latest_build().unwrap(), Some("v2".to_string()));
    }

    #[test]
    fn test_warnings_persist() {
        let store = create_test_store();
        store.save_build(&output("v1")).unwrap();
        assert_eq!(
            store.load_warnings("v1").unwrap(),
            vec!["warning: zero targets retained for platform=tiktok".to_string()]
        );
    }

    #[test]
    fn test_file_backed_store_reopens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("builds.db");
        {
            let store = SqliteStore::open(&path).unwrap();
            store.save_build(&output("v1")).unwrap();
        }
        let store = SqliteStore::open(&path).unwrap();
        assert_eq!(store.load_build("v1").unwrap().unwrap().nodes.len(), 2);
    }
}
