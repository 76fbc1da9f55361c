//! Application configuration
//!
//! Loaded from a YAML file; every field has a default, so a missing file or
//! a partial file is fine. The file is taken from `--config`, then from
//! `ATTACK_GRAPH_CONFIG`.

use crate::graph::LayoutSettings;
use crate::model::BUILD_VERSION;
use crate::pipeline::{ClassifierMode, PipelineSettings, SupportThreshold};
use crate::query::InteractionMode;
use crate::render::{ColorMode, SizeMode, StaticOptions, ViewModes};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CONFIG_ENV: &str = "ATTACK_GRAPH_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Input and output locations; relative inputs are searched across roots
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub data_root: Option<PathBuf>,
    pub mentions: PathBuf,
    pub aliases: PathBuf,
    pub spend: PathBuf,
    pub out_dir: PathBuf,
    /// SQLite artifact store; CSV only when unset
    pub store: Option<PathBuf>,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            data_root: None,
            mentions: PathBuf::from("outputs/entity_mentions_labeled.csv"),
            aliases: PathBuf::from("outputs/entity_alias_map.csv"),
            spend: PathBuf::from("outputs/harmonized_ads.csv"),
            out_dir: PathBuf::from("outputs/attack_graph"),
            store: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub build_version: String,
    pub min_edge_mentions: u64,
    pub min_edge_ads: u64,
    pub classifier: ClassifierMode,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            build_version: BUILD_VERSION.to_string(),
            min_edge_mentions: 2,
            min_edge_ads: 2,
            classifier: ClassifierMode::default(),
        }
    }
}

impl PipelineConfig {
    pub fn settings(&self) -> PipelineSettings {
        PipelineSettings {
            build_version: self.build_version.clone(),
            threshold: SupportThreshold {
                min_mentions: self.min_edge_mentions,
                min_ads: self.min_edge_ads,
            },
            classifier: self.classifier,
        }
    }
}

/// Initial explorer filters and modes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
    pub min_edge_mentions: u64,
    pub top_n_edges: usize,
    pub color_mode: ColorMode,
    pub size_mode: SizeMode,
    pub interaction_mode: InteractionMode,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            min_edge_mentions: 2,
            top_n_edges: 900,
            color_mode: ColorMode::Party,
            size_mode: SizeMode::Topology,
            interaction_mode: InteractionMode::Highlight,
        }
    }
}

impl ExplorerConfig {
    pub fn modes(&self) -> ViewModes {
        ViewModes {
            color: self.color_mode,
            size: self.size_mode,
            interaction: self.interaction_mode,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub paths: PathsConfig,
    pub pipeline: PipelineConfig,
    pub layout: LayoutSettings,
    pub explorer: ExplorerConfig,
    pub render: StaticOptions,
}

impl AppConfig {
    /// Load configuration from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml(yaml: &str) -> ConfigResult<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Explicit path, else `ATTACK_GRAPH_CONFIG`, else defaults
    pub fn discover(explicit: Option<&Path>) -> ConfigResult<Self> {
        let from_env = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        match explicit.map(Path::to_path_buf).or(from_env) {
            Some(path) => {
                tracing::debug!(path = %path.display(), "loading config");
                Self::load(path)
            }
            None => Ok(Self::default()),
        }
    }

    /// Batch render options with the shared layout settings applied
    pub fn static_options(&self) -> StaticOptions {
        StaticOptions {
            layout: self.layout,
            ..self.render.clone()
        }
    }
}
