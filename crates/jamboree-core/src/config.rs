//! Application configuration management.
//!
//! Holds the backend base URL and the scout page gate hash. Stored at
//! `~/.config/jamboree/config.json`; missing file means defaults.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::api::client::DEFAULT_BASE_URL;

/// Application name used for config/cache directory paths
const APP_NAME: &str = "jamboree";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Environment variable overriding the configured base URL
pub const BASE_URL_ENV: &str = "JAMBOREE_API_URL";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub api_base_url: Option<String>,
    /// Argon2 PHC string for the scout page password
    #[serde(default)]
    pub scout_gate_hash: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            serde_json::from_str(&contents).context("Failed to parse config file")
        } else {
            Ok(Self::default())
        }
    }

    fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Store a new scout page hash, keeping the other settings.
    /// An unreadable config file is left untouched.
    pub fn store_scout_gate_hash(hash: String) -> Result<PathBuf> {
        let path = Self::config_path()?;
        Self::store_scout_gate_hash_at(&path, hash)?;
        Ok(path)
    }

    fn store_scout_gate_hash_at(path: &Path, hash: String) -> Result<()> {
        let mut config = Self::load_from(path)
            .context("Failed to read existing config; fix or remove it first")?;
        config.scout_gate_hash = Some(hash);
        config.save_to(path).context("Failed to save config")
    }

    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    pub fn cache_dir(&self) -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }

    /// Base URL from the environment, then the config file, then the default.
    pub fn resolved_base_url(&self) -> String {
        resolve_base_url(std::env::var(BASE_URL_ENV).ok(), self.api_base_url.as_deref())
    }
}

fn resolve_base_url(from_env: Option<String>, configured: Option<&str>) -> String {
    from_env
        .filter(|url| !url.trim().is_empty())
        .or_else(|| configured.filter(|url| !url.trim().is_empty()).map(str::to_string))
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
}
