//! Transport configuration types.

use serde::{Deserialize, Serialize};

use crate::core::config::{env_var, parse_bool};
use crate::core::error::{Error, Result};

/// HTTP transport configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Port number to listen on.
    pub port: u16,

    /// Host address to bind to.
    #[serde(default = "default_host")]
    pub host: String,

    /// Enable CORS for browser clients.
    #[serde(default = "default_cors")]
    pub enable_cors: bool,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_cors() -> bool {
    true
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: default_host(),
            enable_cors: default_cors(),
        }
    }
}

impl HttpConfig {
    /// Create an HTTP config for the given address.
    pub fn new(port: u16, host: impl Into<String>) -> Self {
        Self {
            port,
            host: host.into(),
            ..Default::default()
        }
    }

    /// Load HTTP config from environment variables.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Some(port) = env_var("CRUDE_HTTP_PORT") {
            config.port = port.trim().parse().map_err(|_| {
                Error::config(format!("CRUDE_HTTP_PORT must be a port number, got '{}'", port))
            })?;
        }

        if let Some(host) = env_var("CRUDE_HTTP_HOST") {
            config.host = host;
        }

        if let Some(cors) = env_var("CRUDE_HTTP_CORS") {
            config.enable_cors = parse_bool("CRUDE_HTTP_CORS", &cors)?;
        }

        Ok(config)
    }

    /// Get the bind address.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get a description of this transport for logging.
    pub fn description(&self) -> String {
        format!("HTTP on {}", self.address())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::tests::ENV_TEST_LOCK;

    #[test]
    fn test_default_address() {
        assert_eq!(HttpConfig::default().address(), "127.0.0.1:3000");
        assert_eq!(HttpConfig::new(8080, "0.0.0.0").address(), "0.0.0.0:8080");
    }

    #[test]
    fn test_from_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("CRUDE_HTTP_PORT", "4100");
            std::env::set_var("CRUDE_HTTP_CORS", "false");
        }

        let config = HttpConfig::from_env().unwrap();
        assert_eq!(config.port, 4100);
        assert!(!config.enable_cors);

        unsafe {
            std::env::set_var("CRUDE_HTTP_PORT", "not-a-port");
        }
        assert!(matches!(HttpConfig::from_env(), Err(Error::Config(_))));

        unsafe {
            std::env::remove_var("CRUDE_HTTP_PORT");
            std::env::remove_var("CRUDE_HTTP_CORS");
        }
    }
}
