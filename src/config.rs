//! Client configuration management.
//!
//! This module handles loading and saving the client configuration, which
//! holds optional overrides for the API base URL, the cache TTL, and the
//! request timeout. Anything left unset falls back to the built-in
//! defaults.
//!
//! Configuration is stored at `~/.config/hubcache/config.json`.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Application name used for the config directory path
const APP_NAME: &str = "hubcache";

/// Config file name
const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub api_base_url: Option<String>,
    pub cache_ttl_secs: Option<i64>,
    pub request_timeout_secs: Option<u64>,
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
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_leave_everything_unset() {
        let config = Config::default();
        assert!(config.api_base_url.is_none());
        assert!(config.cache_ttl_secs.is_none());
        assert!(config.request_timeout_secs.is_none());
    }

    #[test]
    fn partial_file_fills_missing_fields_with_none() {
        let config: Config = serde_json::from_str(r#"{"cache_ttl_secs": 60}"#)
            .expect("partial config should parse");
        assert_eq!(config.cache_ttl_secs, Some(60));
        assert!(config.api_base_url.is_none());
    }

    #[test]
    fn roundtrips_through_json() {
        let config = Config {
            api_base_url: Some("http://localhost:8080".to_string()),
            cache_ttl_secs: Some(120),
            request_timeout_secs: Some(5),
        };
        let json = serde_json::to_string(&config).expect("config should serialize");
        let parsed: Config = serde_json::from_str(&json).expect("config should parse back");
        assert_eq!(parsed.api_base_url.as_deref(), Some("http://localhost:8080"));
        assert_eq!(parsed.cache_ttl_secs, Some(120));
        assert_eq!(parsed.request_timeout_secs, Some(5));
    }
}
