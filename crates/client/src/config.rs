//! Gateway client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `MEDICART_GATEWAY_URL` - Base URL of the API gateway (default: `http://localhost:8080`)
//! - `MEDICART_TIMEOUT_SECS` - Per-request timeout in seconds (default: 30)
//! - `MEDICART_SESSION_FILE` - Path for the persisted session (default: `.medicart/session.json`)
//! - `MEDICART_LOG_FILE` - Path for the persisted request log (default: `.medicart/medicart_logs.json`)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Default gateway base URL (the gateway routes to the microservices).
const DEFAULT_GATEWAY_URL: &str = "http://localhost:8080";

/// Default per-request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// MediCart gateway client configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Base URL of the API gateway.
    pub base_url: Url,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Path of the persisted session file.
    pub session_file: PathBuf,
    /// Path of the persisted request log file.
    pub log_file: PathBuf,
}

impl GatewayConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let base_url = get_env_or_default("MEDICART_GATEWAY_URL", DEFAULT_GATEWAY_URL)
            .parse::<Url>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("MEDICART_GATEWAY_URL".to_string(), e.to_string())
            })?;
        let timeout_secs = get_env_or_default(
            "MEDICART_TIMEOUT_SECS",
            &DEFAULT_TIMEOUT_SECS.to_string(),
        )
        .parse::<u64>()
        .map_err(|e| {
            ConfigError::InvalidEnvVar("MEDICART_TIMEOUT_SECS".to_string(), e.to_string())
        })?;

        let session_file = get_optional_env("MEDICART_SESSION_FILE")
            .map_or_else(|| PathBuf::from(".medicart/session.json"), PathBuf::from);
        let log_file = get_optional_env("MEDICART_LOG_FILE")
            .map_or_else(|| PathBuf::from(".medicart/medicart_logs.json"), PathBuf::from);

        Ok(Self {
            base_url,
            timeout: Duration::from_secs(timeout_secs),
            session_file,
            log_file,
        })
    }

    /// Build a configuration against an explicit base URL with defaults for
    /// everything else. Used by tests and by callers that already know their
    /// gateway.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `base_url` is not a valid URL.
    pub fn for_base_url(base_url: &str) -> Result<Self, ConfigError> {
        let base_url = base_url.parse::<Url>().map_err(|e| {
            ConfigError::InvalidEnvVar("MEDICART_GATEWAY_URL".to_string(), e.to_string())
        })?;
        Ok(Self {
            base_url,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            session_file: PathBuf::from(".medicart/session.json"),
            log_file: PathBuf::from(".medicart/medicart_logs.json"),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_for_base_url() {
        let config = GatewayConfig::for_base_url("http://gateway.internal:8080").unwrap();
        assert_eq!(config.base_url.as_str(), "http://gateway.internal:8080/");
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_for_base_url_invalid() {
        let result = GatewayConfig::for_base_url("not a url");
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar(_, _))));
    }
}
