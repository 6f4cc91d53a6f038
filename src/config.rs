//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::client::DEFAULT_API_BASE;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub dev_server: DevServerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Backend API client configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_base_url() -> String {
    DEFAULT_API_BASE.to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

/// Development server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DevServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Fail instead of trying the next port when `port` is taken
    #[serde(default)]
    pub strict_port: bool,

    /// Path the application is served under
    #[serde(default = "default_base_path")]
    pub base_path: String,

    #[serde(default)]
    pub proxy: ProxyConfig,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5174
}

fn default_base_path() -> String {
    "/".to_string()
}

impl Default for DevServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            strict_port: false,
            base_path: default_base_path(),
            proxy: ProxyConfig::default(),
        }
    }
}

/// `/api` reverse proxy configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ProxyConfig {
    /// Path prefix forwarded to the backend
    #[serde(default = "default_proxy_prefix")]
    pub prefix: String,

    /// Backend origin
    #[serde(default = "default_proxy_target")]
    pub target: String,

    /// Rewrite the `Host` header to the target's authority
    #[serde(default = "default_change_origin")]
    pub change_origin: bool,
}

fn default_proxy_prefix() -> String {
    "/api".to_string()
}

fn default_proxy_target() -> String {
    "http://127.0.0.1:5000".to_string()
}

fn default_change_origin() -> bool {
    true
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            prefix: default_proxy_prefix(),
            target: default_proxy_target(),
            change_origin: default_change_origin(),
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

        Self::parse(&content).map_err(|error| ConfigError::Parse {
            path: path.to_path_buf(),
            error,
        })
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
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
            dirs::config_dir().map(|p| p.join("survey-runner").join("config.toml")),
            Some(PathBuf::from("/etc/survey-runner/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from any key lookup
    ///
    /// Recognized keys:
    /// - `SURVEY_RUNNER_API_URL`
    /// - `SURVEY_RUNNER_HOST`
    /// - `SURVEY_RUNNER_PORT` (falls back to `PORT`)
    /// - `SURVEY_RUNNER_STRICT_PORT`
    /// - `SURVEY_RUNNER_BASE_PATH`
    /// - `SURVEY_RUNNER_PROXY_TARGET`
    /// - `SURVEY_RUNNER_LOG_LEVEL`
    /// - `SURVEY_RUNNER_LOG_FORMAT`
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        // API overrides
        if let Some(url) = lookup("SURVEY_RUNNER_API_URL") {
            self.api.base_url = url;
        }

        // Dev server overrides
        if let Some(host) = lookup("SURVEY_RUNNER_HOST") {
            self.dev_server.host = host;
        }
        if let Some(port) = lookup("SURVEY_RUNNER_PORT").or_else(|| lookup("PORT")) {
            if let Ok(p) = port.parse() {
                self.dev_server.port = p;
            }
        }
        if let Some(strict) = lookup("SURVEY_RUNNER_STRICT_PORT") {
            self.dev_server.strict_port = strict.to_lowercase() != "false" && strict != "0";
        }
        if let Some(base_path) = lookup("SURVEY_RUNNER_BASE_PATH") {
            self.dev_server.base_path = base_path;
        }
        if let Some(target) = lookup("SURVEY_RUNNER_PROXY_TARGET") {
            self.dev_server.proxy.target = target;
        }

        // Logging overrides
        if let Some(level) = lookup("SURVEY_RUNNER_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("SURVEY_RUNNER_LOG_FORMAT") {
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
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Survey Runner Configuration
#
# Environment variables override these settings:
# - SURVEY_RUNNER_API_URL
# - SURVEY_RUNNER_HOST
# - SURVEY_RUNNER_PORT (or PORT)
# - SURVEY_RUNNER_STRICT_PORT
# - SURVEY_RUNNER_BASE_PATH
# - SURVEY_RUNNER_PROXY_TARGET
# - SURVEY_RUNNER_LOG_LEVEL
# - SURVEY_RUNNER_LOG_FORMAT

[api]
# Backend API base URL used by the client and the views
base_url = "http://localhost:5000/api"

[dev_server]
# Development server host
host = "0.0.0.0"

# Preferred port; the next free port is used when it is taken
port = 5174

# Fail instead of falling back to another port
strict_port = false

# Path the application is served under
base_path = "/"

[dev_server.proxy]
# Requests under this prefix are forwarded to the backend
prefix = "/api"

# Backend origin
target = "http://127.0.0.1:5000"

# Rewrite the Host header to the backend origin
change_origin = true

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
    use std::collections::HashMap;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api.base_url, "http://localhost:5000/api");
        assert_eq!(config.dev_server.port, 5174);
        assert!(!config.dev_server.strict_port);
        assert_eq!(config.dev_server.proxy.prefix, "/api");
        assert_eq!(config.dev_server.proxy.target, "http://127.0.0.1:5000");
        assert!(config.dev_server.proxy.change_origin);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_generated_config_matches_defaults() {
        let config = Config::parse(&generate_default_config()).unwrap();
        let defaults = Config::default();
        assert_eq!(config.api.base_url, defaults.api.base_url);
        assert_eq!(config.dev_server.port, defaults.dev_server.port);
        assert_eq!(config.dev_server.proxy.target, defaults.dev_server.proxy.target);
        assert_eq!(config.logging.level, defaults.logging.level);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[dev_server]\nport = 8000\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.dev_server.port, 8000);
        assert_eq!(config.dev_server.host, "0.0.0.0");
        assert_eq!(config.api.base_url, DEFAULT_API_BASE);
    }

    #[test]
    fn test_load_errors() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        assert!(matches!(Config::load(&missing), Err(ConfigError::Io { .. })));

        let bad = dir.path().join("bad.toml");
        std::fs::write(&bad, "[dev_server\nport = ").unwrap();
        assert!(matches!(Config::load(&bad), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("SURVEY_RUNNER_API_URL", "http://backend:5000/api"),
            ("PORT", "6000"),
            ("SURVEY_RUNNER_STRICT_PORT", "true"),
            ("SURVEY_RUNNER_PROXY_TARGET", "http://backend:5000"),
            ("SURVEY_RUNNER_LOG_FORMAT", "json"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.api.base_url, "http://backend:5000/api");
        assert_eq!(config.dev_server.port, 6000);
        assert!(config.dev_server.strict_port);
        assert_eq!(config.dev_server.proxy.target, "http://backend:5000");
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn test_specific_port_wins_over_generic() {
        let mut config = Config::default();
        config.apply_overrides(|key| match key {
            "SURVEY_RUNNER_PORT" => Some("7000".to_string()),
            "PORT" => Some("6000".to_string()),
            _ => None,
        });
        assert_eq!(config.dev_server.port, 7000);
    }

    #[test]
    fn test_invalid_port_is_ignored() {
        let mut config = Config::default();
        config.apply_overrides(|key| (key == "PORT").then(|| "not-a-port".to_string()));
        assert_eq!(config.dev_server.port, 5174);
    }
}
