//! Flat audit log of pipeline counts and rates

use serde::{Deserialize, Serialize};
use std::fmt;

/// Typed metric value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{}", v),
            Self::Float(v) => write!(f, "{}", v),
            Self::Text(v) => f.write_str(v),
        }
    }
}

impl From<usize> for MetricValue {
    fn from(v: usize) -> Self {
        Self::Int(v as i64)
    }
}

impl From<u64> for MetricValue {
    fn from(v: u64) -> Self {
        Self::Int(v as i64)
    }
}

impl From<f64> for MetricValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<String> for MetricValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<&str> for MetricValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

/// One `(stage, metric, value)` row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRow {
    pub stage: String,
    pub metric: String,
    pub value: MetricValue,
}

impl MetricRow {
    pub const COLUMNS: [&'static str; 3] = ["stage", "metric", "value"];
}

/// Append-only metrics stream
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetricsLog {
    rows: Vec<MetricRow>,
}

impl MetricsLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, stage: &str, metric: impl Into<String>, value: impl Into<MetricValue>) {
        self.rows.push(MetricRow {
            stage: stage.to_string(),
            metric: metric.into(),
            value: value.into(),
        });
    }

    pub fn rows(&self) -> &[MetricRow] {
        &self.rows
    }

    /// First value recorded for `(stage, metric)`
    pub fn get(&self, stage: &str, metric: &str) -> Option<&MetricValue> {
        self.rows
            .iter()
            .find(|r| r.stage == stage && r.metric == metric)
            .map(|r| &r.value)
    }

    /// All values recorded for `(stage, metric)`, e.g. repeated warnings
    pub fn all(&self, stage: &str, metric: &str) -> Vec<&MetricValue> {
        self.rows
            .iter()
            .filter(|r| r.stage == stage && r.metric == metric)
            .map(|r| &r.value)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl From<Vec<MetricRow>> for MetricsLog {
    fn from(rows: Vec<MetricRow>) -> Self {
        Self { rows }
    }
}
