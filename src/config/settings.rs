//! Configuration settings for Gleaner.

use crate::error::{GleanerError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub search: SearchSettings,
    pub scrape: ScrapeSettings,
    pub storage: StorageSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Directory for storing application data.
    pub data_dir: String,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            data_dir: "~/.gleaner".to_string(),
            log_level: "warn".to_string(),
        }
    }
}

/// Web search provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Search provider (tavily).
    pub provider: String,
    /// Base URL of the provider API.
    pub base_url: String,
    /// API key. Takes precedence over `api_key_env` when set.
    pub api_key: Option<String>,
    /// Environment variable holding the API key.
    pub api_key_env: String,
    /// Search depth requested from the provider.
    pub search_depth: String,
    /// Default number of results per query.
    pub max_results: u32,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            provider: "tavily".to_string(),
            base_url: "https://api.tavily.com".to_string(),
            api_key: None,
            api_key_env: "TAVILY_API_KEY".to_string(),
            search_depth: "advanced".to_string(),
            max_results: 5,
            timeout_seconds: 30,
        }
    }
}

impl SearchSettings {
    /// Resolve the provider API key at call time.
    ///
    /// An explicit `api_key` wins; otherwise the configured environment
    /// variable is read. Empty values count as missing.
    pub fn resolve_api_key(&self) -> Result<String> {
        if let Some(key) = self.api_key.as_ref().filter(|k| !k.trim().is_empty()) {
            return Ok(key.clone());
        }

        match std::env::var(&self.api_key_env) {
            Ok(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(GleanerError::MissingCredential(self.api_key_env.clone())),
        }
    }
}

/// Page fetching settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrapeSettings {
    /// User-Agent header sent with every page request.
    pub user_agent: String,
    /// Per-page timeout in seconds.
    pub timeout_seconds: u64,
}

impl Default for ScrapeSettings {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36"
                .to_string(),
            timeout_seconds: 10,
        }
    }
}

/// Persistence settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Directory that relative export filenames resolve against.
    pub output_dir: String,
    /// Path to the SQLite database used by the sqlite format and retrieval.
    pub db_path: String,
    /// Default table name.
    pub table_name: String,
    /// Default save format tag (csv, excel, pdf, sqlite).
    pub default_format: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            output_dir: ".".to_string(),
            db_path: "~/.gleaner/education_data.db".to_string(),
            table_name: "articles".to_string(),
            default_format: "csv".to_string(),
        }
    }
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| GleanerError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("gleaner")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded data directory path.
    pub fn data_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.data_dir)
    }

    /// Get the expanded SQLite database path.
    pub fn db_path(&self) -> PathBuf {
        Self::expand_path(&self.storage.db_path)
    }

    /// Resolve an export filename (without extension) against the output directory.
    pub fn output_path(&self, filename: &str) -> PathBuf {
        let expanded = Self::expand_path(filename);
        if expanded.is_absolute() {
            expanded
        } else {
            Self::expand_path(&self.storage.output_dir).join(expanded)
        }
    }
}
