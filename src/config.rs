//! Application configuration management.
//!
//! This module handles loading and saving the cache configuration: the
//! application origin, optional overrides for the cache version tag and the
//! backend host, and the location of the on-disk stores.
//!
//! Configuration is stored at `~/.config/budgetcache/config.json`.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::manifest::{BACKEND_API_HOST, CACHE_VERSION_TAG};

/// Application name used for config/cache directory paths
const APP_NAME: &str = "budgetcache";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Default application origin relative manifest entries resolve against
const DEFAULT_ORIGIN: &str = "http://127.0.0.1:4173/";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Application origin; defaults to a local preview server.
    pub origin: Option<String>,
    /// Override for the compiled-in cache version tag, so a release process
    /// can bump the tag without rebuilding.
    pub cache_version: Option<String>,
    /// Override for the backend host substring that bypasses the cache.
    pub backend_host: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            Ok(serde_json::from_str(&contents)?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    pub fn cache_dir(&self) -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }

    pub fn origin(&self) -> &str {
        self.origin.as_deref().unwrap_or(DEFAULT_ORIGIN)
    }

    pub fn version_tag(&self) -> &str {
        self.cache_version.as_deref().unwrap_or(CACHE_VERSION_TAG)
    }

    pub fn backend_host(&self) -> &str {
        self.backend_host.as_deref().unwrap_or(BACKEND_API_HOST)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.origin(), DEFAULT_ORIGIN);
        assert_eq!(config.version_tag(), CACHE_VERSION_TAG);
        assert_eq!(config.backend_host(), BACKEND_API_HOST);
    }

    #[test]
    fn test_overrides() {
        let config = Config {
            origin: Some("https://budget.example.com/".to_string()),
            cache_version: Some("go-budgeting-v1.0.2".to_string()),
            backend_host: None,
        };
        assert_eq!(config.origin(), "https://budget.example.com/");
        assert_eq!(config.version_tag(), "go-budgeting-v1.0.2");
        assert_eq!(config.backend_host(), BACKEND_API_HOST);
    }
}
