//! Configuration for the Auth API service.

use std::time::Duration;

use vigil_auth_core::AuthConfig;

/// Auth API configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub http_port: u16,

    /// Database URL
    pub database_url: String,

    /// Webhook URL for anomaly notifications
    pub webhook_url: String,

    /// Buffer size of the anomaly notification channel
    pub notify_buffer: usize,

    /// Lifecycle manager configuration
    pub auth: AuthConfig,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url =
            std::env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;

        let webhook_url =
            std::env::var("WEBHOOK_URL").map_err(|_| ConfigError::Missing("WEBHOOK_URL"))?;

        let http_port = std::env::var("HTTP_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("HTTP_PORT"))?;

        // Signing key (minimum 32 bytes, validated by the core config)
        let signing_key =
            std::env::var("SIGNING_KEY").map_err(|_| ConfigError::Missing("SIGNING_KEY"))?;

        // Access credential lifetime (default 15 minutes)
        let access_token_ttl_secs: u64 = std::env::var("ACCESS_TOKEN_TTL_SECS")
            .unwrap_or_else(|_| "900".to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("ACCESS_TOKEN_TTL_SECS"))?;

        // Bound on storage calls (default 5 seconds)
        let store_timeout_secs: u64 = std::env::var("STORE_TIMEOUT_SECS")
            .unwrap_or_else(|_| "5".to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("STORE_TIMEOUT_SECS"))?;

        let notify_buffer: usize = std::env::var("NOTIFY_BUFFER")
            .unwrap_or_else(|_| "64".to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("NOTIFY_BUFFER"))?;

        let auth = AuthConfig::try_new(&signing_key)
            .map_err(|e| ConfigError::Auth(e.to_string()))?
            .with_access_token_ttl(Duration::from_secs(access_token_ttl_secs))
            .with_store_timeout(Duration::from_secs(store_timeout_secs));

        Ok(Self {
            http_port,
            database_url,
            webhook_url,
            notify_buffer,
            auth,
        })
    }
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),

    #[error("Auth config error: {0}")]
    Auth(String),
}
