//! Application configuration.
//!
//! Loaded from `config.toml` in the platform data directory; a missing file
//! yields the defaults.

use crate::load::WeeklyAggregator;
use crate::metrics::{CalculatorConfig, MetricsCalculator, RiskClassifier, RiskThresholds};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// SQLite database file
    pub database_path: PathBuf,
    /// Rolling window sizes
    pub calculator: CalculatorConfig,
    /// Risk band thresholds
    pub thresholds: RiskThresholds,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: get_data_dir().join("loadrisk.db"),
            calculator: CalculatorConfig::default(),
            thresholds: RiskThresholds::default(),
        }
    }
}

impl AppConfig {
    /// Build the aggregator described by this configuration.
    pub fn aggregator(&self) -> WeeklyAggregator {
        WeeklyAggregator::with_parts(
            MetricsCalculator::with_config(self.calculator),
            RiskClassifier::with_thresholds(self.thresholds),
        )
    }
}

/// Get the application data directory.
pub fn get_data_dir() -> PathBuf {
    directories::ProjectDirs::from("com", "loadrisk", "LoadRisk")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Get the configuration file path.
pub fn get_config_path() -> PathBuf {
    get_data_dir().join("config.toml")
}

/// Load application configuration from the default location.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from(&get_config_path())
}

/// Load application configuration from `path`, or defaults if it is missing.
pub fn load_config_from(path: &Path) -> Result<AppConfig, ConfigError> {
    if !path.exists() {
        tracing::debug!("No config at {}, using defaults", path.display());
        return Ok(AppConfig::default());
    }

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;

    toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Save application configuration to `path`.
pub fn save_config_to(config: &AppConfig, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ConfigError::IoError(e.to_string()))?;
    }

    let content =
        toml::to_string_pretty(config).map_err(|e| ConfigError::SerializeError(e.to_string()))?;

    std::fs::write(path, content).map_err(|e| ConfigError::IoError(e.to_string()))?;

    Ok(())
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),
}
