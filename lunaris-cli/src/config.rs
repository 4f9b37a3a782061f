//! CLI configuration file.
//!
//! Looked up at `<config_dir>/lunaris/config.toml` unless `--config` points
//! elsewhere. A missing file yields the defaults.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use lunaris_core::error::CoreError;
use lunaris_core::types::{ExportSettings, NotificationSettings};
use serde::{Deserialize, Serialize};

const APP_DIR: &str = "lunaris";
const CONFIG_FILE_NAME: &str = "config.toml";
const DATABASE_FILE_NAME: &str = "lunaris.db";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// SQLite file holding notifications. Falls back to the platform data dir.
    pub database_path: Option<PathBuf>,
    pub notifications: NotificationSettings,
    pub export: ExportSettings,
}

impl Config {
    /// Default location of the config file, if the platform has one.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE_NAME))
    }

    /// Load from `explicit`, or from the default location.
    ///
    /// An explicitly named file must exist; the default one may be absent.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        match Self::default_path() {
            Some(path) if path.exists() => Self::from_file(&path),
            _ => {
                tracing::debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::parse(&raw)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        toml::from_str(raw).map_err(|e| CoreError::ConfigError(e.to_string()))
    }

    /// Resolved database path.
    pub fn database_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.database_path {
            return Ok(path.clone());
        }
        dirs::data_local_dir()
            .map(|dir| dir.join(APP_DIR).join(DATABASE_FILE_NAME))
            .context("Failed to determine data directory, set `database_path` in the config")
    }
}
