//! Configuration module for finkube
//!
//! Provides layered configuration loading from files, environment variables, and defaults.
//!
//! # Configuration Precedence
//!
//! 1. CLI arguments (highest priority)
//! 2. Environment variables (`FINKUBE_*`)
//! 3. Configuration file (TOML)
//! 4. Default values (lowest priority)
//!
//! # Example
//!
//! ```rust
//! use finkube::config::FinkubeConfig;
//!
//! let config = FinkubeConfig::default();
//! assert_eq!(config.api.request_timeout_seconds, 10);
//!
//! let toml = r#"
//! [channel]
//! url = "wss://finops.example.com/ws"
//! "#;
//! let config: FinkubeConfig = toml::from_str(toml).unwrap();
//! assert_eq!(config.channel.url, "wss://finops.example.com/ws");
//! assert_eq!(config.channel.max_reconnect_attempts, 10);
//! ```

pub mod error;
pub mod logging;

pub use error::ConfigError;
pub use logging::{LogFormat, LoggingConfig};

pub use crate::channel::ChannelConfig;
pub use crate::client::ClientConfig;

use crate::channel::{MAX_HEARTBEAT_INTERVAL_SECONDS, MAX_RECONNECT_BASE_DELAY_MS};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Unified configuration for the dashboard client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct FinkubeConfig {
    /// Request client settings
    pub api: ClientConfig,
    /// Live channel settings
    pub channel: ChannelConfig,
    pub logging: LoggingConfig,
}

impl FinkubeConfig {
    /// Load configuration from a TOML file
    ///
    /// If path is None, returns default configuration.
    /// If path doesn't exist, returns NotFound error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => {
                if !p.exists() {
                    return Err(ConfigError::NotFound(p.to_path_buf()));
                }
                let content = std::fs::read_to_string(p)?;
                toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
            }
            None => Ok(Self::default()),
        }
    }

    /// Apply `FINKUBE_*` environment variable overrides.
    ///
    /// Invalid values are ignored and the current value is kept.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var("FINKUBE_API_URL") {
            if !url.is_empty() {
                self.api.base_url = url;
            }
        }
        if let Ok(url) = std::env::var("FINKUBE_WS_URL") {
            if !url.is_empty() {
                self.channel.url = url;
            }
        }
        if let Ok(timeout) = std::env::var("FINKUBE_REQUEST_TIMEOUT") {
            if let Ok(seconds) = timeout.parse() {
                self.api.request_timeout_seconds = seconds;
            }
        }

        if let Ok(level) = std::env::var("FINKUBE_LOG_LEVEL") {
            if logging::is_known_level(&level) {
                self.logging.level = level;
            }
        }
        if let Ok(format) = std::env::var("FINKUBE_LOG_FORMAT") {
            if let Ok(f) = format.parse() {
                self.logging.format = f;
            }
        }

        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let base_url = self.api.base_url.trim();
        if base_url.is_empty() {
            return Err(ConfigError::invalid("api.base_url", "URL cannot be empty"));
        }
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::invalid(
                "api.base_url",
                "must start with http:// or https://",
            ));
        }
        if self.api.request_timeout_seconds == 0 {
            return Err(ConfigError::invalid(
                "api.request_timeout_seconds",
                "timeout must be non-zero",
            ));
        }

        let ws_url = self.channel.url.trim();
        if ws_url.is_empty() {
            return Err(ConfigError::invalid("channel.url", "URL cannot be empty"));
        }
        if !(ws_url.starts_with("ws://") || ws_url.starts_with("wss://")) {
            return Err(ConfigError::invalid(
                "channel.url",
                "must start with ws:// or wss://",
            ));
        }
        if self.channel.heartbeat_interval_seconds == 0 {
            return Err(ConfigError::invalid(
                "channel.heartbeat_interval_seconds",
                "interval must be non-zero",
            ));
        }
        if self.channel.heartbeat_interval_seconds > MAX_HEARTBEAT_INTERVAL_SECONDS {
            return Err(ConfigError::invalid(
                "channel.heartbeat_interval_seconds",
                format!("interval must be at most {}", MAX_HEARTBEAT_INTERVAL_SECONDS),
            ));
        }
        if self.channel.reconnect_base_delay_ms == 0 {
            return Err(ConfigError::invalid(
                "channel.reconnect_base_delay_ms",
                "delay must be non-zero",
            ));
        }
        if self.channel.reconnect_base_delay_ms > MAX_RECONNECT_BASE_DELAY_MS {
            return Err(ConfigError::invalid(
                "channel.reconnect_base_delay_ms",
                format!("delay must be at most {}", MAX_RECONNECT_BASE_DELAY_MS),
            ));
        }
        if self.channel.max_backoff_multiplier == 0 {
            return Err(ConfigError::invalid(
                "channel.max_backoff_multiplier",
                "multiplier must be non-zero",
            ));
        }

        if !logging::is_known_level(&self.logging.level) {
            return Err(ConfigError::invalid(
                "logging.level",
                format!("expected one of {}", logging::LOG_LEVELS.join(", ")),
            ));
        }
        if let Some(ref components) = self.logging.component_levels {
            for (component, level) in components {
                if !logging::is_known_level(level) {
                    return Err(ConfigError::invalid(
                        &format!("logging.component_levels.{}", component),
                        format!("unknown level '{}'", level),
                    ));
                }
            }
        }

        Ok(())
    }
}
