//! Configuration management
//!
//! This module provides YAML-based configuration management with support for:
//! - Environment variable overrides
//! - Multiple configuration file locations
//! - Default values for all settings

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main application configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HRMS backend connection configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    /// Base URL every request path is appended to
    #[serde(default = "default_base_url", alias = "url")]
    pub base_url: String,
    /// Request timeout in seconds; unset means requests never time out
    #[serde(default, alias = "timeout")]
    pub timeout_secs: Option<u64>,
    /// Value of the User-Agent header
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_base_url() -> String {
    "http://localhost:5000/api".to_string()
}

fn default_user_agent() -> String {
    format!("hrms-portal/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: None,
            user_agent: default_user_agent(),
        }
    }
}

/// Persisted session configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionConfig {
    /// File holding the persisted client state (the `token` key)
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,
    /// Read the stored token back on start-up
    #[serde(default = "default_restore_on_start")]
    pub restore_on_start: bool,
}

fn default_store_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("hrms-portal")
        .join("storage.json")
}

fn default_restore_on_start() -> bool {
    true
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            store_path: default_store_path(),
            restore_on_start: default_restore_on_start(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: LogFormat,
    /// Log output target (console or file)
    #[serde(default = "default_log_target")]
    pub target: LogTarget,
    /// Directory for log files (used when target is "file")
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,
    /// Log file name prefix (default: "hrms-portal")
    #[serde(default = "default_log_prefix")]
    pub log_prefix: String,
    /// Enable daily log rotation
    #[serde(default = "default_log_rotation")]
    pub daily_rotation: bool,
}

/// Log output target
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogTarget {
    /// Log to the terminal (stderr)
    #[default]
    Console,
    /// Log to file with optional rotation
    File,
    /// Log to both console and file
    Both,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
    Compact,
}

fn default_log_level() -> String {
    // Notifications are the primary output, keep the log quiet by default
    "warn".to_string()
}

fn default_log_format() -> LogFormat {
    LogFormat::Compact
}

fn default_log_target() -> LogTarget {
    LogTarget::Console
}

fn default_log_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("hrms-portal")
        .join("logs")
}

fn default_log_prefix() -> String {
    "hrms-portal".to_string()
}

fn default_log_rotation() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            target: default_log_target(),
            log_dir: default_log_dir(),
            log_prefix: default_log_prefix(),
            daily_rotation: default_log_rotation(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values
    /// 2. Configuration file (YAML)
    /// 3. Environment variables (prefixed with HRMS_)
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration, preferring an explicit file path over the search list
    pub fn load_from(explicit: Option<PathBuf>) -> Result<Self> {
        // Try to load .env file if it exists
        let _ = dotenvy::dotenv();

        let config_path = explicit
            .or_else(|| std::env::var("HRMS_CONFIG").map(PathBuf::from).ok())
            .or_else(Self::find_config_file);

        let mut config = match config_path {
            Some(ref path) if path.exists() => Self::from_file(path)?,
            Some(ref path) => {
                anyhow::bail!("Configuration file not found: {:?}", path);
            }
            None => AppConfig::default(),
        };

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Parse a YAML configuration file
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        serde_norway::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    /// Find the configuration file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        let paths = [
            // Current directory
            PathBuf::from("config.yaml"),
            PathBuf::from("config/config.yaml"),
            // System config directory
            PathBuf::from("/etc/hrms-portal/config.yaml"),
            // User config directory
            dirs::config_dir()
                .map(|p| p.join("hrms-portal/config.yaml"))
                .unwrap_or_default(),
        ];

        paths
            .into_iter()
            .find(|p| !p.as_os_str().is_empty() && p.exists())
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        // API overrides
        if let Ok(url) = std::env::var("HRMS_API_URL") {
            self.api.base_url = url;
        }
        if let Ok(timeout) = std::env::var("HRMS_API_TIMEOUT") {
            if let Ok(t) = timeout.parse() {
                self.api.timeout_secs = Some(t);
            }
        }

        // Session overrides
        if let Ok(path) = std::env::var("HRMS_TOKEN_STORE") {
            self.session.store_path = PathBuf::from(path);
        }

        // Logging overrides
        if let Ok(level) = std::env::var("RUST_LOG") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("HRMS_LOG_FORMAT") {
            self.logging.format = match format.to_lowercase().as_str() {
                "json" => LogFormat::Json,
                "pretty" => LogFormat::Pretty,
                _ => LogFormat::Compact,
            };
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let url = self.api.base_url.trim();
        if url.is_empty() {
            anyhow::bail!("API base URL cannot be empty");
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            anyhow::bail!(
                "Invalid API base URL: {}. Must start with http:// or https://",
                url
            );
        }

        if self.api.timeout_secs == Some(0) {
            anyhow::bail!("API timeout must be greater than 0 seconds");
        }

        if self.session.store_path.as_os_str().is_empty() {
            anyhow::bail!("Session store path cannot be empty");
        }

        Ok(())
    }
}
