//! Tracker settings loaded from a TOML file.

use crate::Result;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Currency settings used only when presenting amounts.
///
/// Analysis is always done in the transactions' own cents; `exchange_rate` is
/// a scalar a presentation layer multiplies amounts by.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayCurrency {
    pub currency_sign: String,
    pub exchange_rate: f64,
}

impl Default for DisplayCurrency {
    fn default() -> Self {
        Self {
            currency_sign: "$".to_string(),
            exchange_rate: 1.0,
        }
    }
}

/// Tracker configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Snapshot JSON file to analyze
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot_file: Option<PathBuf>,
    /// `tracing` filter directive, e.g. `info` or `tracker_core=debug`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_filter: Option<String>,
    pub display: DisplayCurrency,
}

impl TrackerConfig {
    /// Get the default config file path.
    ///
    /// Default path: `~/.tracker/config.toml`
    /// Can be overridden with `TRACKER_CONFIG_FILE` environment variable.
    pub fn default_path() -> PathBuf {
        if let Ok(path) = env::var("TRACKER_CONFIG_FILE") {
            return PathBuf::from(path);
        }

        directories::BaseDirs::new()
            .map(|dirs| dirs.home_dir().join(".tracker/config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }

    /// Load from the default path.
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::default_path())
    }

    /// Load from a specific path. A missing file gives the defaults.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Snapshot file to analyze.
    ///
    /// `snapshot_file` if set, else `TRACKER_SNAPSHOT_FILE`, else
    /// `~/.tracker/snapshot.json`.
    pub fn snapshot_path(&self) -> PathBuf {
        if let Some(path) = &self.snapshot_file {
            return path.clone();
        }

        if let Ok(path) = env::var("TRACKER_SNAPSHOT_FILE") {
            return PathBuf::from(path);
        }

        directories::BaseDirs::new()
            .map(|dirs| dirs.home_dir().join(".tracker/snapshot.json"))
            .unwrap_or_else(|| PathBuf::from("snapshot.json"))
    }
}
