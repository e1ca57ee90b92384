//! Configuration file management for Haplea.
//!
//! Supports reading service settings from `~/.config/haplea/config.toml`.

use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

use haplea_core::config::EngineConfig;
use haplea_core::error::{HapleaError, Result};

/// Root configuration structure for config.toml
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceConfig {
    #[serde(default)]
    pub nlu: Option<NluConfig>,
    #[serde(default)]
    pub backend: Option<BackendConfig>,
    /// Engine timing overrides; defaults apply field by field.
    #[serde(default)]
    pub engine: EngineConfig,
}

/// NLU classifier configuration
#[derive(Debug, Clone, Deserialize)]
pub struct NluConfig {
    pub token: String,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub api_version: Option<String>,
}

/// Ledger backend configuration
#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    pub base_url: String,
}

impl ServiceConfig {
    /// Loads the configuration file from ~/.config/haplea/config.toml
    pub fn load() -> Result<Self> {
        Self::load_from(config_path()?)
    }

    /// Loads a configuration file from an explicit path.
    pub fn load_from(path: PathBuf) -> Result<Self> {
        if !path.exists() {
            return Err(HapleaError::config(format!(
                "configuration file not found at: {}",
                path.display()
            )));
        }

        let content = fs::read_to_string(&path).map_err(|e| {
            HapleaError::config(format!(
                "failed to read configuration file at {}: {}",
                path.display(),
                e
            ))
        })?;

        Ok(toml::from_str(&content)?)
    }
}

/// Returns the path to the configuration file: ~/.config/haplea/config.toml
fn config_path() -> Result<PathBuf> {
    let home =
        dirs::home_dir().ok_or_else(|| HapleaError::config("could not determine home directory"))?;
    Ok(home.join(".config").join("haplea").join("config.toml"))
}
