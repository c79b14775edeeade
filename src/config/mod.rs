//! Configuration management for trawl.
//!
//! Handles:
//! - Remote endpoint and credentials
//! - Display preferences for one-shot output
//! - Result-browser preferences

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, TrawlError};
use crate::util::atomic_write;

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Remote endpoint settings.
    #[serde(default)]
    pub remote: RemoteConfig,
    /// Display options.
    #[serde(default)]
    pub display: DisplayConfig,
    /// Result-browser settings.
    #[serde(default)]
    pub browser: BrowserConfig,
}

impl Config {
    /// Load configuration from the default location.
    pub fn load() -> Result<Self> {
        let config_path = default_config_path()?;
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            TrawlError::io(format!("Failed to read config file: {}", path.display()), e)
        })?;

        toml::from_str(&content).map_err(|e| TrawlError::ConfigError {
            message: e.to_string(),
        })
    }

    /// Save configuration to the default location.
    pub fn save(&self) -> Result<()> {
        let config_path = default_config_path()?;
        self.save_to(&config_path)
    }

    /// Save configuration to a specific path.
    ///
    /// The config is written to a temporary file first, then atomically
    /// renamed to the target path.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| TrawlError::ConfigError {
            message: format!("Failed to serialize config: {e}"),
        })?;

        atomic_write(path, content.as_bytes())?;

        Ok(())
    }
}

/// Remote endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Base URL of the remote indexer, e.g. `https://logs.example.com`.
    #[serde(default)]
    pub url: Option<String>,
    /// Bearer token attached to every request.
    #[serde(default)]
    pub token: Option<String>,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            url: None,
            token: None,
            timeout_secs: default_timeout(),
        }
    }
}

/// Display configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Truncate long result lines at this length.
    #[serde(default = "default_truncate")]
    pub truncate_at: usize,
    /// Shell color theme ("dark" or "light").
    #[serde(default = "default_theme")]
    pub theme: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            truncate_at: default_truncate(),
            theme: default_theme(),
        }
    }
}

/// Result-browser configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    /// Result lines per page.
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Show the tab bar on entry.
    #[serde(default = "default_true")]
    pub show_tab_bar: bool,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            show_tab_bar: true,
        }
    }
}

// Default value functions for serde
fn default_true() -> bool {
    true
}

fn default_timeout() -> u64 {
    30
}

fn default_theme() -> String {
    "dark".to_string()
}

fn default_truncate() -> usize {
    2048
}

fn default_page_size() -> usize {
    100
}

/// Get the default configuration path.
pub fn default_config_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir().ok_or_else(|| TrawlError::ConfigError {
        message: "could not determine the platform config directory".to_string(),
    })?;

    Ok(config_dir.join("trawl").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.remote.url.is_none());
        assert_eq!(config.remote.timeout_secs, 30);
        assert_eq!(config.browser.page_size, 100);
        assert!(config.browser.show_tab_bar);
    }

    #[test]
    fn test_config_roundtrip() {
        let mut config = Config::default();
        config.remote.url = Some("https://logs.example.com".to_string());
        config.browser.page_size = 25;

        let toml = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.remote.url.as_deref(), Some("https://logs.example.com"));
        assert_eq!(parsed.browser.page_size, 25);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.remote.token = Some("secret".to_string());
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.remote.token.as_deref(), Some("secret"));
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let parsed: Config = toml::from_str("[remote]\nurl = \"http://x\"\n").unwrap();
        assert_eq!(parsed.remote.url.as_deref(), Some("http://x"));
        assert_eq!(parsed.remote.timeout_secs, 30);
        assert_eq!(parsed.display.truncate_at, 2048);
    }
}
