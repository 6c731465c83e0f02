//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::client::TransportConfig;
use crate::session::{ReconnectPolicy, ReconnectStrategy};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub http: HttpConfig,

    #[serde(default)]
    pub reconnect: ReconnectConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Chat server location
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_base_uri")]
    pub base_uri: String,
}

fn default_base_uri() -> String {
    "http://localhost:8080/".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_uri: default_base_uri(),
        }
    }
}

/// HTTP client settings
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HttpConfig {
    /// Per-request timeout; unset means a poll may hang indefinitely
    pub request_timeout_secs: Option<u64>,
}

/// Poll loop reconnect settings
#[derive(Debug, Clone, Deserialize)]
pub struct ReconnectConfig {
    #[serde(default)]
    pub strategy: ReconnectStrategy,

    #[serde(default = "default_initial_backoff")]
    pub initial_backoff_ms: u64,

    #[serde(default = "default_max_backoff")]
    pub max_backoff_ms: u64,
}

fn default_initial_backoff() -> u64 {
    500
}

fn default_max_backoff() -> u64 {
    30_000 // 30 seconds
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            strategy: ReconnectStrategy::default(),
            initial_backoff_ms: default_initial_backoff(),
            max_backoff_ms: default_max_backoff(),
        }
    }
}

impl ReconnectConfig {
    /// Policy the poll loop should run with
    pub fn policy(&self) -> ReconnectPolicy {
        match self.strategy {
            ReconnectStrategy::Immediate => ReconnectPolicy::Immediate,
            ReconnectStrategy::Backoff => ReconnectPolicy::backoff(
                Duration::from_millis(self.initial_backoff_ms),
                Duration::from_millis(self.max_backoff_ms),
            ),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("chatpoll").join("config.toml")),
            Some(PathBuf::from("./chatpoll.toml")),
        ];

        for path in config_paths.iter().flatten() {
            if path.exists() {
                match Self::load_with_env(path) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Transport settings derived from `server` and `http`
    pub fn transport(&self) -> TransportConfig {
        TransportConfig {
            base_uri: self.server.base_uri.clone(),
            request_timeout: self.http.request_timeout_secs.map(Duration::from_secs),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.base_uri.trim().is_empty() {
            return Err(ConfigError::Invalid("server.base_uri is empty".to_string()));
        }
        if self.reconnect.initial_backoff_ms > self.reconnect.max_backoff_ms {
            return Err(ConfigError::Invalid(
                "reconnect.initial_backoff_ms exceeds max_backoff_ms".to_string(),
            ));
        }
        Ok(())
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        if let Ok(uri) = std::env::var("CHATPOLL_SERVER_URI") {
            self.server.base_uri = uri;
        }

        if let Ok(strategy) = std::env::var("CHATPOLL_RECONNECT") {
            match strategy.parse() {
                Ok(s) => self.reconnect.strategy = s,
                Err(e) => tracing::warn!("Ignoring CHATPOLL_RECONNECT: {}", e),
            }
        }

        if let Ok(level) = std::env::var("CHATPOLL_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("CHATPOLL_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Chatpoll Configuration
#
# Environment variables override these settings:
# - CHATPOLL_SERVER_URI
# - CHATPOLL_RECONNECT
# - CHATPOLL_LOG_LEVEL
# - CHATPOLL_LOG_FORMAT

[server]
# Chat server base URI; endpoint names are appended to it
base_uri = "http://localhost:8080/"

[http]
# Per-request timeout in seconds. Leave unset to let long polls
# wait as long as the server holds them open.
# request_timeout_secs = 60

[reconnect]
# immediate: re-poll as soon as a poll completes, even after errors
# backoff: wait initial_backoff_ms, doubling up to max_backoff_ms,
#          after consecutive failed polls
strategy = "immediate"
initial_backoff_ms = 500
max_backoff_ms = 30000

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.base_uri, "http://localhost:8080/");
        assert!(config.http.request_timeout_secs.is_none());
        assert_eq!(config.reconnect.policy(), ReconnectPolicy::Immediate);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_generated_config_parses_to_defaults() {
        let config: Config = toml::from_str(&generate_default_config()).unwrap();
        assert_eq!(config.server.base_uri, "http://localhost:8080/");
        assert_eq!(config.reconnect.strategy, ReconnectStrategy::Immediate);
        assert_eq!(config.reconnect.initial_backoff_ms, 500);
        assert_eq!(config.reconnect.max_backoff_ms, 30_000);
        assert!(config.http.request_timeout_secs.is_none());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[server]
base_uri = "http://10.0.1.114:8080/"

[http]
request_timeout_secs = 90

[reconnect]
strategy = "backoff"
initial_backoff_ms = 250
"#
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.server.base_uri, "http://10.0.1.114:8080/");
        assert_eq!(
            config.reconnect.policy(),
            ReconnectPolicy::backoff(Duration::from_millis(250), Duration::from_millis(30_000))
        );

        let transport = config.transport();
        assert_eq!(transport.request_timeout, Some(Duration::from_secs(90)));
    }

    #[test]
    fn test_load_rejects_bad_backoff() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[reconnect]\ninitial_backoff_ms = 5000\nmax_backoff_ms = 100"
        )
        .unwrap();

        let err = Config::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_load_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[reconnect]\nstrategy = \"sometimes\"").unwrap();

        let err = Config::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load(Path::new("/nonexistent/chatpoll.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
