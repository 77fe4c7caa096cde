//! Configuration management for newswatch.
//!
//! Configuration is read from `~/.config/newswatch/config.toml` at startup.
//! If the file doesn't exist, a default configuration with comments is created.

use serde::Deserialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration struct.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub storage: StorageConfig,
    pub scan: ScanConfig,
    pub feed: FeedConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path of the JSON data document (default: `<data_dir>/newswatch/data.json`)
    pub data_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Pause between consecutive keyword searches in milliseconds (default: 500)
    pub keyword_spacing_ms: u64,

    /// Upper bound for one keyword search in seconds (default: 15)
    pub fetch_timeout_secs: u64,

    /// Entries considered per keyword search (default: 50)
    pub max_entries_per_keyword: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            keyword_spacing_ms: 500,
            fetch_timeout_secs: 15,
            max_entries_per_keyword: 50,
        }
    }
}

impl ScanConfig {
    pub fn keyword_spacing(&self) -> Duration {
        Duration::from_millis(self.keyword_spacing_ms)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs.max(1))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Search endpoint returning RSS
    pub endpoint: String,

    /// Interface language (`hl`)
    pub language: String,

    /// Country edition (`gl`)
    pub region: String,

    pub user_agent: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://news.google.com/rss/search".to_string(),
            language: "tr".to_string(),
            region: "TR".to_string(),
            user_agent: format!("newswatch/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Config {
    /// Load configuration from the default path.
    ///
    /// If the config file doesn't exist, creates a default one with comments.
    /// Missing fields in the config file will use default values.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::default_config_path()?;
        Self::load_from(&config_path)
    }

    /// Load configuration from an explicit path, creating it when absent.
    pub fn load_from(config_path: &Path) -> Result<Self, ConfigError> {
        if !config_path.exists() {
            Self::create_default_config(config_path)?;
            return Ok(Self::default());
        }

        let content = fs::read_to_string(config_path).map_err(|e| ConfigError::Io {
            path: config_path.to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: config_path.to_path_buf(),
            source: e,
        })?;

        Ok(config)
    }

    /// Get the default config file path: `~/.config/newswatch/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("newswatch").join("config.toml"))
    }

    /// Resolve the data document path, falling back to the platform data dir.
    pub fn data_file(&self) -> Result<PathBuf, ConfigError> {
        if let Some(ref path) = self.storage.data_file {
            return Ok(path.clone());
        }
        let data_dir = dirs::data_dir().ok_or(ConfigError::NoDataDir)?;
        Ok(data_dir.join("newswatch").join("data.json"))
    }

    fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        file.write_all(Self::default_config_content().as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

        Ok(())
    }

    /// Generate the default config file content with comments.
    fn default_config_content() -> String {
        r##"# newswatch configuration
#
# Scan settings (auto scan on/off, interval) are stored in the data file and
# changed with `newswatch settings`.

[storage]
# Location of the JSON data document. Defaults to the platform data directory.
# data_file = "/var/lib/newswatch/data.json"

[scan]
# Pause between keyword searches, to stay under the source's rate limits
keyword_spacing_ms = 500

# A keyword search taking longer than this counts as failed for that scan
fetch_timeout_secs = 15

# Entries considered per keyword search
max_entries_per_keyword = 50

[feed]
endpoint = "https://news.google.com/rss/search"
language = "tr"
region = "TR"
"##
        .to_string()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Could not determine data directory")]
    NoDataDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}
