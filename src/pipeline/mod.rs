//! Entity-resolution and attack/target cleaning pipeline
//!
//! Stages run in a fixed order over the mention rows:
//!
//! 1. alias resolution ([`AliasResolver`])
//! 2. quality filtering ([`QualityFilter`])
//! 3. target classification ([`TargetClassifier`])
//! 4. edge and node aggregation
//! 5. validation
//!
//! Each stage appends its counts to a [`MetricsLog`]. Enrichment with party
//! and spend is a separate step ([`enrich`]) because spend is an external
//! input that the cleaning build does not need.

mod aggregate;
mod alias;
mod classify;
mod enrich;
mod quality;
mod validate;

pub use aggregate::{build_edges, build_nodes, edge_confidence, SupportThreshold};
pub use alias::AliasResolver;
pub use classify::{
    has_attack_term, is_negative_tone, is_not_self_mention, mark_signals, ClassifierMode, Conservative,
    Legacy, TargetClassifier, ATTACK_TERMS, TARGET_LABELS, TARGET_TONES,
};
pub use enrich::{
    attack_spend, enrich, infer_target_parties, sponsor_parties, EnrichedEdge, Enrichment, SpendTotals,
};
pub use quality::{initial_drop_reason, QualityFilter, GENERIC_STOPLIST, ORG_SUFFIX_ONLY};
pub use validate::{duplicate_edge_keys, run_validation, ValidationFailure};

use crate::model::{
    top_counts_string, value_counts, AliasEntry, Confidence, EdgeRow, LabeledMention, Mention, MetricsLog,
    NodeRow, BUILD_VERSION,
};
use std::collections::HashSet;
use thiserror::Error;

/// Metric stage names, in emission order
pub mod stage {
    pub const BASELINE: &str = "baseline";
    pub const POST_FILTER: &str = "post_filter_mentions";
    pub const POST_RECLASS: &str = "post_target_reclass";
    pub const FINAL: &str = "final_edges_nodes";
}

/// Errors raised while building a cleaned artifact set
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationFailure),

    #[error("no mention rows to process")]
    NoMentions,
}

pub type PipelineResult<T> = Result<T, PipelineError>;

/// Tunables of one cleaning build
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineSettings {
    pub build_version: String,
    pub threshold: SupportThreshold,
    pub classifier: ClassifierMode,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            build_version: BUILD_VERSION.to_string(),
            threshold: SupportThreshold::default(),
            classifier: ClassifierMode::default(),
        }
    }
}

/// Artifacts of a successful build
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub build_version: String,
    pub mentions: Vec<LabeledMention>,
    pub edges: Vec<EdgeRow>,
    pub nodes: Vec<NodeRow>,
    pub metrics: MetricsLog,
    pub warnings: Vec<String>,
}

/// Runs every cleaning stage and collects the metrics stream
#[derive(Debug, Clone, Default)]
pub struct CleaningPipeline {
    settings: PipelineSettings,
}

fn rate(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64
    }
}

impl CleaningPipeline {
    pub fn new(settings: PipelineSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    pub fn run(&self, mentions: Vec<Mention>, aliases: &[AliasEntry]) -> PipelineResult<PipelineOutput> {
        if mentions.is_empty() {
            return Err(PipelineError::NoMentions);
        }
        let version = self.settings.build_version.as_str();
        let mut metrics = MetricsLog::new();

        let resolver = AliasResolver::new(aliases);
        let mut rows = resolver.resolve_all(mentions);
        tracing::info!(rows = rows.len(), aliases = resolver.len(), "resolved aliases");

        self.record_baseline(&rows, &mut metrics);

        QualityFilter::new().apply(&mut rows);
        self.record_post_filter(&rows, &mut metrics);

        self.settings.classifier.classifier().classify(&mut rows);
        self.record_post_reclass(&rows, &mut metrics);

        let edges = build_edges(&rows, self.settings.threshold, version);
        let nodes = build_nodes(&rows, &edges, version);
        self.record_final(&edges, &nodes, &mut metrics);
        tracing::info!(edges = edges.len(), nodes = nodes.len(), "aggregated graph tables");

        let warnings = run_validation(
            &rows,
            &edges,
            &nodes,
            self.settings.threshold,
            self.settings.classifier,
        )?;
        for w in &warnings {
            tracing::warn!("{}", w);
            metrics.add(stage::FINAL, "warning", w.as_str());
        }

        Ok(PipelineOutput {
            build_version: version.to_string(),
            mentions: rows,
            edges,
            nodes,
            metrics,
            warnings,
        })
    }

    /// Counts of the legacy classifier over the alias-resolved rows
    fn record_baseline(&self, rows: &[LabeledMention], metrics: &mut MetricsLog) {
        let mut legacy = rows.to_vec();
        Legacy.classify(&mut legacy);

        let targets = legacy.iter().filter(|r| r.is_target).count();
        let sponsors: HashSet<&str> = legacy.iter().map(|r| r.mention.sponsor_name.as_str()).collect();
        let canonicals = legacy.iter().map(|r| r.canonical_entity.as_str());

        metrics.add(stage::BASELINE, "rows_total", legacy.len());
        metrics.add(stage::BASELINE, "is_target_rate_v1", rate(targets, legacy.len()));
        metrics.add(stage::BASELINE, "unique_sponsors_v1", sponsors.len());
        metrics.add(stage::BASELINE, "unique_targets_v1", value_counts(canonicals.clone()).len());
        metrics.add(stage::BASELINE, "top25_targets_v1", top_counts_string(canonicals, 25));
        tracing::debug!(targets, "baseline legacy pass");
    }

    fn record_post_filter(&self, rows: &[LabeledMention], metrics: &mut MetricsLog) {
        let kept = rows.iter().filter(|r| r.is_kept()).count();
        let dropped = rows.len() - kept;

        metrics.add(stage::POST_FILTER, "rows_total", rows.len());
        metrics.add(stage::POST_FILTER, "kept_rows", kept);
        metrics.add(stage::POST_FILTER, "dropped_rows", dropped);
        metrics.add(stage::POST_FILTER, "keep_rate", rate(kept, rows.len()));

        let reasons = value_counts(rows.iter().filter_map(|r| r.drop_reason.map(|d| d.as_str())));
        for (reason, count) in reasons {
            tracing::debug!(reason, count, "dropped");
            metrics.add(stage::POST_FILTER, format!("dropped_reason::{}", reason), count);
        }
        tracing::info!(kept, dropped, "quality filter applied");
    }

    fn record_post_reclass(&self, rows: &[LabeledMention], metrics: &mut MetricsLog) {
        let targets: Vec<&LabeledMention> = rows.iter().filter(|r| r.is_target).collect();
        let high = targets
            .iter()
            .filter(|r| r.target_confidence == Confidence::High)
            .count();

        metrics.add(stage::POST_RECLASS, "rows_total", rows.len());
        metrics.add(stage::POST_RECLASS, "target_rows_v1_1", targets.len());
        metrics.add(stage::POST_RECLASS, "target_rate_v1_1", rate(targets.len(), rows.len()));
        metrics.add(
            stage::POST_RECLASS,
            "high_conf_share_among_targets_v1_1",
            rate(high, targets.len()),
        );
        tracing::info!(targets = targets.len(), "targets classified");
    }

    fn record_final(&self, edges: &[EdgeRow], nodes: &[NodeRow], metrics: &mut MetricsLog) {
        let sponsors: HashSet<&str> = edges.iter().map(|e| e.sponsor_name.as_str()).collect();
        let targets: HashSet<&str> = nodes.iter().map(|n| n.canonical_entity.as_str()).collect();

        // Nodes are already sorted by mention count
        let top25 = nodes
            .iter()
            .take(25)
            .map(|n| format!("{}:{}", n.canonical_entity, n.mention_count))
            .collect::<Vec<_>>()
            .join("|");

        metrics.add(stage::FINAL, "edge_count_v1_1", edges.len());
        metrics.add(stage::FINAL, "node_count_v1_1", nodes.len());
        metrics.add(stage::FINAL, "unique_sponsors_v1_1", sponsors.len());
        metrics.add(stage::FINAL, "unique_targets_v1_1", targets.len());
        metrics.add(stage::FINAL, "top25_targets_v1_1", top25);
        metrics.add(stage::FINAL, "edge_key_duplicates", duplicate_edge_keys(edges));
    }
}
