//! Engine configuration.
//!
//! Every knob except the shard directory has a default. Configuration is
//! read from a JSON file and may be overridden from the environment:
//!
//! | Variable            | Field              |
//! |---------------------|--------------------|
//! | `SHARDCAT_DIR`      | `shard_dir`        |
//! | `SHARDCAT_PREFIX`   | `shard_prefix`     |
//! | `SHARDCAT_SUFFIX`   | `shard_suffix`     |
//! | `SHARDCAT_PER_PAGE` | `results_per_page` |

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, Result};

// ── Scan Limits ────────────────────────────────────────────────────

/// Dual cap for a bounded scan: stop after `max_shards` shards or
/// `max_matches` matches, whichever trips first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanLimits {
    pub max_shards: u32,
    pub max_matches: usize,
}

impl ScanLimits {
    pub const fn new(max_shards: u32, max_matches: usize) -> Self {
        Self { max_shards, max_matches }
    }

    fn validate(&self, name: &str) -> Result<()> {
        if self.max_shards == 0 || self.max_matches == 0 {
            return Err(CatalogError::InvalidConfig(format!(
                "{name}: max_shards and max_matches must be > 0"
            )));
        }
        Ok(())
    }
}

// ── Sampler Config ─────────────────────────────────────────────────

/// Startup facet sampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerConfig {
    /// Number of leading shards read at startup.
    pub shard_cap: u32,
    pub category_limit: usize,
    pub performer_limit: usize,
    pub tag_limit: usize,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            shard_cap: 50,
            category_limit: 50,
            performer_limit: 100,
            tag_limit: 100,
        }
    }
}

// ── Engine Config ──────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Directory holding the shard files.
    pub shard_dir: PathBuf,
    #[serde(default = "default_prefix")]
    pub shard_prefix: String,
    #[serde(default = "default_suffix")]
    pub shard_suffix: String,
    /// Separator inside joined list fields (tags, categories, ...).
    #[serde(default = "default_delimiter")]
    pub list_delimiter: char,
    /// Page size for search and filter results.
    #[serde(default = "default_results_per_page")]
    pub results_per_page: usize,
    #[serde(default)]
    pub sampler: SamplerConfig,
    #[serde(default = "default_search_limits")]
    pub search: ScanLimits,
    #[serde(default = "default_category_limits")]
    pub category_filter: ScanLimits,
    #[serde(default = "default_performer_limits")]
    pub performer_filter: ScanLimits,
    #[serde(default = "default_tag_limits")]
    pub tag_filter: ScanLimits,
}

fn default_prefix() -> String {
    "videos_".to_string()
}

fn default_suffix() -> String {
    ".json".to_string()
}

fn default_delimiter() -> char {
    ';'
}

fn default_results_per_page() -> usize {
    20
}

fn default_search_limits() -> ScanLimits {
    ScanLimits::new(20, 100)
}

fn default_category_limits() -> ScanLimits {
    ScanLimits::new(30, 200)
}

fn default_performer_limits() -> ScanLimits {
    ScanLimits::new(30, 100)
}

fn default_tag_limits() -> ScanLimits {
    ScanLimits::new(30, 200)
}

impl EngineConfig {
    /// Config with default caps for the given shard directory.
    pub fn new(shard_dir: impl Into<PathBuf>) -> Self {
        Self {
            shard_dir: shard_dir.into(),
            shard_prefix: default_prefix(),
            shard_suffix: default_suffix(),
            list_delimiter: default_delimiter(),
            results_per_page: default_results_per_page(),
            sampler: SamplerConfig::default(),
            search: default_search_limits(),
            category_filter: default_category_limits(),
            performer_filter: default_performer_limits(),
            tag_filter: default_tag_limits(),
        }
    }

    /// Read config from a JSON file.
    pub fn read_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        Ok(config)
    }

    /// Override fields from `SHARDCAT_*` environment variables.
    pub fn apply_env(mut self) -> Self {
        if let Ok(dir) = std::env::var("SHARDCAT_DIR") {
            self.shard_dir = PathBuf::from(dir);
        }
        if let Ok(prefix) = std::env::var("SHARDCAT_PREFIX") {
            self.shard_prefix = prefix;
        }
        if let Ok(suffix) = std::env::var("SHARDCAT_SUFFIX") {
            self.shard_suffix = suffix;
        }
        if let Some(per_page) = std::env::var("SHARDCAT_PER_PAGE")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            self.results_per_page = per_page;
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.shard_suffix.is_empty() {
            return Err(CatalogError::InvalidConfig(
                "shard_suffix must not be empty".to_string(),
            ));
        }
        if self.results_per_page == 0 {
            return Err(CatalogError::InvalidConfig(
                "results_per_page must be > 0".to_string(),
            ));
        }
        if self.sampler.shard_cap == 0 {
            return Err(CatalogError::InvalidConfig(
                "sampler.shard_cap must be > 0".to_string(),
            ));
        }
        self.search.validate("search")?;
        self.category_filter.validate("category_filter")?;
        self.performer_filter.validate("performer_filter")?;
        self.tag_filter.validate("tag_filter")?;
        Ok(())
    }
}
