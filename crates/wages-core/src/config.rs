//! Configuration loading from TOML files
//!
//! The config file is selected via:
//! 1. an explicit path (the `--config` flag)
//! 2. the `WAGES_CONFIG` environment variable
//! 3. `wages.toml` in the working directory, when present
//! 4. built-in defaults
//!
//! `WAGES_SOURCE` overrides `source.path` in every case.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;
use wages_parser::ReportLayout;

pub const CONFIG_ENV: &str = "WAGES_CONFIG";
pub const SOURCE_ENV: &str = "WAGES_SOURCE";
pub const DEFAULT_CONFIG_FILE: &str = "wages.toml";
pub const DEFAULT_SOURCE_FILE: &str = "average_daily_wages_of_informal_sector_.csv";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub path: PathBuf,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_SOURCE_FILE),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Number of job categories listed in the top-paying breakdown
    pub top_jobs: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self { top_jobs: 10 }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct WagesConfig {
    pub source: SourceConfig,
    pub layout: ReportLayout,
    pub report: ReportConfig,
}

impl WagesConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str::<WagesConfig>(content).context("failed to parse wages config TOML")
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("invalid config file {}", path.display()))
    }

    /// Resolves and loads the configuration, then applies environment overrides.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        dotenvy::dotenv().ok();

        let env_path = env::var(CONFIG_ENV).ok();
        let fallback = Path::new(DEFAULT_CONFIG_FILE);
        let mut config = match resolve_config_path(explicit, env_path.as_deref(), fallback) {
            Some(path) => {
                debug!(path = %path.display(), "loading config file");
                Self::from_file(&path)?
            }
            None => {
                debug!("no config file found, using defaults");
                Self::default()
            }
        };

        if let Ok(source) = env::var(SOURCE_ENV) {
            config = config.with_source_path(source);
        }
        Ok(config)
    }

    pub fn with_source_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.source.path = path.into();
        self
    }

    pub fn source_path(&self) -> &Path {
        &self.source.path
    }
}

/// Picks the config file to read. An explicit path or an environment path is returned
/// even if it does not exist, so that a typo surfaces as an error. The fallback is only
/// used when it exists.
pub fn resolve_config_path(
    explicit: Option<&Path>,
    env_path: Option<&str>,
    fallback: &Path,
) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    if let Some(path) = env_path.filter(|value| !value.trim().is_empty()) {
        return Some(PathBuf::from(path));
    }
    fallback.exists().then(|| fallback.to_path_buf())
}
