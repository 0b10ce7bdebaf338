//! Optional `cisrank.toml` project configuration.
//!
//! Every field has a built-in default, so a missing file (or a file that
//! only sets a couple of keys) is always valid:
//!
//! ```toml
//! [scoring]
//! alpha = 1.0
//! beta = 0.5
//! gamma = 2.0
//! top_percent = 20.0
//!
//! [betweenness]
//! samples = 0      # exact
//! seed = 7
//!
//! [pagerank]
//! damping = 0.85
//! max_iter = 50
//! tolerance = 1e-8
//! ```
//!
//! CLI flags take precedence over file values.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// File name looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "cisrank.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub betweenness: BetweennessConfig,
    #[serde(default)]
    pub pagerank: PageRankSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Weight of normalized in-degree.
    #[serde(default = "default_weight")]
    pub alpha: f64,
    /// Weight of normalized out-degree.
    #[serde(default = "default_weight")]
    pub beta: f64,
    /// Weight of normalized betweenness.
    #[serde(default = "default_weight")]
    pub gamma: f64,
    #[serde(default = "default_top_percent")]
    pub top_percent: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            alpha: default_weight(),
            beta: default_weight(),
            gamma: default_weight(),
            top_percent: default_top_percent(),
        }
    }
}

/// Betweenness sampling: `0` exact, `> 0` sampled sources, `< 0` disabled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BetweennessConfig {
    #[serde(default = "default_samples")]
    pub samples: i64,
    #[serde(default)]
    pub seed: u64,
}

impl Default for BetweennessConfig {
    fn default() -> Self {
        Self {
            samples: default_samples(),
            seed: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageRankSettings {
    #[serde(default = "default_damping")]
    pub damping: f64,
    #[serde(default = "default_max_iter")]
    pub max_iter: usize,
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
}

impl Default for PageRankSettings {
    fn default() -> Self {
        Self {
            damping: default_damping(),
            max_iter: default_max_iter(),
            tolerance: default_tolerance(),
        }
    }
}

/// Load configuration.
///
/// With an explicit `path` the file must exist. Without one,
/// `<dir>/cisrank.toml` is used when present and defaults otherwise.
///
/// # Errors
///
/// Returns an error if an explicit file is missing, or if any file that is
/// read fails to parse.
pub fn load_project_config(path: Option<&Path>, dir: &Path) -> Result<ProjectConfig> {
    let path: PathBuf = match path {
        Some(explicit) => {
            if !explicit.exists() {
                anyhow::bail!("config file {} does not exist", explicit.display());
            }
            explicit.to_path_buf()
        }
        None => {
            let candidate = dir.join(DEFAULT_CONFIG_FILE);
            if !candidate.exists() {
                return Ok(ProjectConfig::default());
            }
            candidate
        }
    };

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let config = toml::from_str::<ProjectConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    debug!(path = %path.display(), "loaded project config");
    Ok(config)
}

const fn default_weight() -> f64 {
    1.0
}

const fn default_top_percent() -> f64 {
    100.0
}

const fn default_samples() -> i64 {
    200
}

const fn default_damping() -> f64 {
    0.85
}

const fn default_max_iter() -> usize {
    50
}

const fn default_tolerance() -> f64 {
    1e-8
}
