//! Application Configuration
//!
//! Layered with the `config` crate: built-in defaults, then an optional
//! `aquawatch.toml` (or the file named by `AQUAWATCH_CONFIG`), then
//! `AQUAWATCH__SECTION__KEY` environment variables. SMTP credentials belong
//! in the environment layer.

use alerting::EmailConfig;
use ::config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::rate_limit::RateLimitConfig;

/// Environment variable naming the configuration file
pub const CONFIG_PATH_VAR: &str = "AQUAWATCH_CONFIG";

const DEFAULT_CONFIG_NAME: &str = "aquawatch";

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    /// SMTP settings; alerts are reported as undelivered when absent
    pub notifications: Option<EmailConfig>,
    pub rate_limit: RateLimitConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// CSV history file
    pub path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: "dados_aquaponia.csv".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Max level: trace, debug, info, warn, error
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Load from the file named by `AQUAWATCH_CONFIG` (default `aquawatch`)
    /// plus the environment
    pub fn load() -> Result<Self, ConfigError> {
        let path =
            std::env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_NAME.to_string());
        Self::load_from(&path)
    }

    /// Load from `path` (extension optional, file optional) plus the environment
    pub fn load_from(path: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix("AQUAWATCH")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}
