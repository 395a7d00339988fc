//! HTTP Server Configuration
//!
//! Bind/CORS settings plus the environment-sourced application config
//! (blob service endpoint and the WebDAV credential pair).

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to (default: "0.0.0.0")
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind to (default: 8080)
    #[serde(default = "default_port")]
    pub port: u16,

    /// CORS allowed origins (empty = permissive)
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
        }
    }
}

impl ServerConfig {
    /// Create a new config with specified port
    pub fn with_port(port: u16) -> Self {
        Self {
            port,
            ..Default::default()
        }
    }

    /// Get the socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),
}

/// The WebDAV credential pair. Injected into the server constructor,
/// never read from ambient globals past startup.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Environment-sourced application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub credentials: Credentials,
    pub blob_api_url: String,
    pub blob_token: String,
    /// Mount prefix for the WebDAV view (default `/blob`).
    pub mount: String,
}

fn require(name: &'static str) -> Result<String, ConfigError> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::MissingVar(name))
}

impl AppConfig {
    /// Read configuration from the environment once at startup.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            credentials: Credentials {
                username: require("WEBDAV_USERNAME")?,
                password: require("WEBDAV_PASSWORD")?,
            },
            blob_api_url: require("BLOB_API_URL")?,
            blob_token: require("BLOB_READ_WRITE_TOKEN")?,
            mount: std::env::var("BLOBDAV_MOUNT").unwrap_or_else(|_| "/blob".to_string()),
        })
    }
}
