//! Persisted configuration and the autoupload registry.
//!
//! One JSON document under the platform config directory holds the API
//! credentials, the poll bounds, the logging settings, and the list of
//! directories flagged for automatic indexing. The document is loaded
//! once at startup and rewritten wholesale on every mutation.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const CONFIG_FILE: &str = "config.json";
const APP_QUALIFIER: &str = "dev";
const APP_ORGANIZATION: &str = "repodex";
const APP_NAME: &str = "repodex";

/// Environment variables consulted when the persisted tokens are empty.
const API_TOKEN_ENV: &str = "REPODEX_API_TOKEN";
const GITHUB_TOKEN_ENV: &str = "GITHUB_TOKEN";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub poll: PollConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    /// Directories flagged for automatic indexing, in insertion order.
    #[serde(default)]
    pub autoupload: Vec<AutouploadEntry>,
}

/// Connection settings for the indexing service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// API root; endpoint paths are derived from it.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Bearer token for the indexing service.
    #[serde(default)]
    pub api_token: String,

    /// Source-control access token forwarded on every call.
    #[serde(default)]
    pub github_token: String,

    /// Client-wide request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_token: String::new(),
            github_token: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.repodex.dev/v2".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

/// Bounds for progress monitoring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollConfig {
    /// Seconds between status fetches.
    #[serde(default = "default_poll_interval_secs")]
    pub interval_secs: u64,

    /// Maximum number of status fetches before giving up
    /// (None = poll until completion).
    #[serde(default)]
    pub max_checks: Option<u64>,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_poll_interval_secs(),
            max_checks: None,
        }
    }
}

fn default_poll_interval_secs() -> u64 {
    4
}

/// Logging settings. File logging is off by default; stderr is on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable rolling file output.
    #[serde(default)]
    pub enabled: bool,

    /// Mirror logs to stderr.
    #[serde(default = "default_true")]
    pub stderr: bool,

    /// File log level: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log directory; relative paths resolve under the platform data dir.
    #[serde(default = "default_log_directory")]
    pub directory: PathBuf,

    /// Prefix for rotated log file names.
    #[serde(default = "default_log_prefix")]
    pub file_prefix: String,

    /// Rotation strategy: hourly, daily, minutely, never.
    #[serde(default = "default_log_rotation")]
    pub rotation: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            stderr: default_true(),
            level: default_log_level(),
            directory: default_log_directory(),
            file_prefix: default_log_prefix(),
            rotation: default_log_rotation(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_directory() -> PathBuf {
    PathBuf::from("logs")
}

fn default_log_prefix() -> String {
    "repodex.log".to_string()
}

fn default_log_rotation() -> String {
    "daily".to_string()
}

/// A directory flagged for automatic indexing. Keyed by path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutouploadEntry {
    pub path: String,
    pub status: String,
    pub added_at: DateTime<Utc>,
}

impl AutouploadEntry {
    pub fn new(path: String) -> Self {
        Self {
            path,
            status: "enabled".to_string(),
            added_at: Utc::now(),
        }
    }
}

impl Config {
    /// Platform config directory for repodex.
    pub fn config_dir() -> Result<PathBuf> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.config_dir().to_path_buf())
            .ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))
    }

    /// Platform data directory, used for log files.
    pub fn data_dir() -> Result<PathBuf> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.data_dir().to_path_buf())
            .ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))
    }

    /// Path to the persisted configuration document.
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE))
    }

    /// Load the configuration from its fixed home location, or defaults if
    /// the file does not exist yet. Call `fill_tokens_from_env` once
    /// logging is up so missing-token warnings are not lost.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Fill empty tokens from the process environment.
    pub fn fill_tokens_from_env(&mut self) {
        self.fill_tokens(|name| std::env::var(name).ok());
    }

    /// Load the document at `path`, or defaults if it is absent.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {:?}", path))?;

            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config from {:?}", path))
        } else {
            debug!("No existing config found, using defaults");
            Ok(Self::default())
        }
    }

    /// Save the whole document to its fixed home location.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save the whole document to `path` using atomic file operations.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {:?}", parent))?;
        }

        let content =
            serde_json::to_string_pretty(self).with_context(|| "Failed to serialize config")?;

        // Write to a temporary file first, then rename for atomicity
        let temp_path = path.with_extension("json.tmp");

        let mut file = fs::File::create(&temp_path)
            .with_context(|| format!("Failed to create temp file {:?}", temp_path))?;

        file.write_all(content.as_bytes())
            .with_context(|| "Failed to write config content")?;

        file.sync_all().with_context(|| "Failed to sync config file")?;

        fs::rename(&temp_path, path)
            .with_context(|| format!("Failed to rename temp file to {:?}", path))?;

        debug!("Saved config to {:?}", path);
        Ok(())
    }

    /// Fill empty tokens from the given environment lookup, warning when a
    /// token is missing from both the document and the environment. The
    /// request still goes out with an empty token and the service rejects
    /// it; nothing is substituted silently.
    pub fn fill_tokens<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if self.api_token_missing() {
            if let Some(token) = lookup(API_TOKEN_ENV) {
                self.api.api_token = token;
            }
        }
        if self.api.github_token.is_empty() {
            if let Some(token) = lookup(GITHUB_TOKEN_ENV) {
                self.api.github_token = token;
            }
        }

        if self.api_token_missing() {
            warn!(
                "no API token configured; set {} or add it to the config file",
                API_TOKEN_ENV
            );
        }
        if self.api.github_token.is_empty() {
            warn!(
                "no source-control token configured; set {} or add it to the config file",
                GITHUB_TOKEN_ENV
            );
        }
    }

    fn api_token_missing(&self) -> bool {
        self.api.api_token.is_empty()
    }

    /// Flag a directory for automatic indexing. Returns false without
    /// touching the list if the path is already present.
    pub fn autoupload_add(&mut self, path: String) -> bool {
        if self.autoupload.iter().any(|entry| entry.path == path) {
            return false;
        }
        self.autoupload.push(AutouploadEntry::new(path));
        true
    }

    /// Unflag a directory. Returns the removed entry if it existed.
    pub fn autoupload_remove(&mut self, path: &str) -> Option<AutouploadEntry> {
        let index = self.autoupload.iter().position(|entry| entry.path == path)?;
        Some(self.autoupload.remove(index))
    }

    /// Flagged directory paths in insertion order.
    pub fn autoupload_paths(&self) -> impl Iterator<Item = &str> {
        self.autoupload.iter().map(|entry| entry.path.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn default_config_points_at_the_service() {
        let config = Config::default();
        assert_eq!(config.api.base_url, "https://api.repodex.dev/v2");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.poll.interval_secs, 4);
        assert_eq!(config.poll.max_checks, None);
        assert!(config.autoupload.is_empty());
        assert!(!config.logging.enabled);
        assert!(config.logging.stderr);
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = Config::default();
        config.api.api_token = "secret".to_string();
        config.autoupload_add("/home/dev/widgets".to_string());
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.api.api_token, "secret");
        assert_eq!(loaded.autoupload.len(), 1);
        assert_eq!(loaded.autoupload[0].path, "/home/dev/widgets");
        assert_eq!(loaded.autoupload[0].status, "enabled");
    }

    #[test]
    fn loading_a_missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("missing.json")).unwrap();
        assert_eq!(config.api.base_url, "https://api.repodex.dev/v2");
    }

    #[test]
    fn partial_documents_fill_in_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"api": {"api_token": "abc"}}"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.api.api_token, "abc");
        assert_eq!(config.api.base_url, "https://api.repodex.dev/v2");
        assert_eq!(config.poll.interval_secs, 4);
    }

    #[test]
    fn empty_tokens_fill_from_the_environment_lookup() {
        let mut config = Config::default();
        config.fill_tokens(|name| match name {
            "REPODEX_API_TOKEN" => Some("from-env".to_string()),
            "GITHUB_TOKEN" => Some("gh-from-env".to_string()),
            _ => None,
        });

        assert_eq!(config.api.api_token, "from-env");
        assert_eq!(config.api.github_token, "gh-from-env");
    }

    #[test]
    fn configured_tokens_are_not_overwritten() {
        let mut config = Config::default();
        config.api.api_token = "persisted".to_string();
        config.fill_tokens(|_| Some("from-env".to_string()));

        assert_eq!(config.api.api_token, "persisted");
        assert_eq!(config.api.github_token, "from-env");
    }

    #[test]
    fn autoupload_add_is_idempotent() {
        let mut config = Config::default();
        assert!(config.autoupload_add("/a".to_string()));
        assert!(!config.autoupload_add("/a".to_string()));
        assert_eq!(config.autoupload.len(), 1);
    }

    #[test]
    fn autoupload_remove_of_absent_path_is_a_noop() {
        let mut config = Config::default();
        config.autoupload_add("/a".to_string());

        assert!(config.autoupload_remove("/b").is_none());
        assert_eq!(config.autoupload.len(), 1);

        let removed = config.autoupload_remove("/a").unwrap();
        assert_eq!(removed.path, "/a");
        assert!(config.autoupload.is_empty());
    }

    #[test]
    fn autoupload_listing_preserves_insertion_order() {
        let mut config = Config::default();
        config.autoupload_add("/b".to_string());
        config.autoupload_add("/a".to_string());
        config.autoupload_add("/c".to_string());

        let paths: Vec<_> = config.autoupload_paths().collect();
        assert_eq!(paths, vec!["/b", "/a", "/c"]);
    }
}
