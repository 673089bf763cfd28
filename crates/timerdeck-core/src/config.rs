//! TOML-based application configuration.
//!
//! Stored at `~/.config/timerdeck/config.toml`. Every field has a serde
//! default, so a missing or partial file always yields a usable config.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Alert configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertsConfig {
    /// Emit desktop notifications on completion.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Ring the audible alarm on completion.
    #[serde(default = "default_true")]
    pub bell: bool,
    /// Path to a custom alarm sound file (optional).
    /// If set, this file is played instead of the default alarm.
    #[serde(default)]
    pub custom_sound: Option<String>,
}

impl Default for AlertsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            bell: true,
            custom_sound: None,
        }
    }
}

/// Remote store configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Name of the remote collection holding the timer documents.
    #[serde(default = "default_collection")]
    pub collection: String,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            collection: default_collection(),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub alerts: AlertsConfig,
    #[serde(default)]
    pub sync: SyncConfig,
}

fn default_true() -> bool {
    true
}

fn default_collection() -> String {
    "timers".to_string()
}

impl Config {
    /// Resolve the platform config file path.
    pub fn path() -> Result<PathBuf> {
        let dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(dir.join("timerdeck").join("config.toml"))
    }

    /// Load from the default location; a missing file yields defaults.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(toml::from_str(&content).map_err(|e| ConfigError::ParseFailed(e.to_string()))?)
    }

    /// Save to the default location, creating parent directories.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let save_err = |e: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| save_err(e.to_string()))?;
        }
        let content = toml::to_string_pretty(self).map_err(|e| save_err(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_err(e.to_string()))?;
        Ok(())
    }
}
