//! Configuration management for the resource server.
//!
//! This module provides a centralized configuration structure that can be
//! populated from environment variables (optionally via a `.env` file) or
//! defaults.

use serde::{Deserialize, Serialize};

use super::error::{Error, Result};
use crate::domains::resources::{IdStrategy, Status};

#[cfg(feature = "http")]
use super::transport::HttpConfig;

/// Main configuration structure for the resource server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Resource store configuration.
    pub resources: ResourcesConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// HTTP listener configuration.
    #[cfg(feature = "http")]
    pub http: HttpConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Configuration for the resource store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourcesConfig {
    /// Status given to resources created without one.
    /// `None` makes status mandatory on create.
    pub default_status: Option<Status>,

    /// How new resource ids are generated.
    pub id_strategy: IdStrategy,

    /// Create the two demo resources at start-up.
    pub seed_demo_data: bool,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,

    /// Whether to include timestamps in log output.
    pub with_timestamps: bool,
}

impl Default for ResourcesConfig {
    fn default() -> Self {
        Self {
            default_status: Some(Status::Active),
            id_strategy: IdStrategy::default(),
            seed_demo_data: false,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "crude-server".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            resources: ResourcesConfig::default(),
            logging: LoggingConfig {
                level: "info".to_string(),
                with_timestamps: true,
            },
            #[cfg(feature = "http")]
            http: HttpConfig::default(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    ///
    /// Environment variables are expected to be prefixed with `CRUDE_`.
    /// For example: `CRUDE_SERVER_NAME`, `CRUDE_LOG_LEVEL`.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Some(name) = env_var("CRUDE_SERVER_NAME") {
            config.server.name = name;
        }

        if let Some(level) = env_var("CRUDE_LOG_LEVEL") {
            config.logging.level = level;
        }

        if let Some(value) = env_var("CRUDE_LOG_TIMESTAMPS") {
            config.logging.with_timestamps = parse_bool("CRUDE_LOG_TIMESTAMPS", &value)?;
        }

        if let Some(value) = env_var("CRUDE_DEFAULT_STATUS") {
            config.resources.default_status = match value.to_lowercase().as_str() {
                "none" => None,
                other => Some(other.parse().map_err(|_| {
                    Error::config(format!(
                        "CRUDE_DEFAULT_STATUS must be active, inactive or none, got '{}'",
                        value
                    ))
                })?),
            };
        }

        if let Some(value) = env_var("CRUDE_ID_STRATEGY") {
            config.resources.id_strategy = value
                .parse()
                .map_err(|e| Error::config(format!("CRUDE_ID_STRATEGY: {}", e)))?;
        }

        if let Some(value) = env_var("CRUDE_SEED_DEMO") {
            config.resources.seed_demo_data = parse_bool("CRUDE_SEED_DEMO", &value)?;
        }

        #[cfg(feature = "http")]
        {
            config.http = HttpConfig::from_env()?;
        }

        Ok(config)
    }
}

/// Read a variable, treating empty values as unset.
pub(crate) fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

pub(crate) fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(Error::config(format!(
            "{} must be a boolean, got '{}'",
            key, value
        ))),
    }
}
