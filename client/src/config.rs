//! # Client Configuration
//!
//! Settings loaded from environment variables (optionally from a `.env`
//! file, which the binary loads through `dotenvy`). Values are validated on
//! startup so a bad deployment fails fast.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `MARKET_API_BASE_URL` | `http://127.0.0.1:5000/api` |
//! | `MARKET_HTTP_TIMEOUT_SECS` | `10` |
//! | `MARKET_SESSION_FILE` | `.market/session.json` |
//! | `MARKET_MAX_RETRIES` | `3` |
//! | `MARKET_RETRY_DELAY_MS` | `1000` |
//! | `MARKET_BATCH_CONCURRENCY` | `5` |
//!
//! ## Global Config Access
//!
//! ```rust,no_run
//! use market_client::config::{client_config, init_config};
//!
//! init_config().expect("invalid configuration");
//! let base = &client_config().api_base_url;
//! ```

use lib_utils::envs::{get_env_or, get_env_parse_or};
use std::path::PathBuf;
use std::sync::OnceLock;
use std::time::Duration;

use crate::core::error::{ClientError, Result};
use crate::services::http::retry::RetryConfig;

pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:5000/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_SESSION_FILE: &str = ".market/session.json";
pub const DEFAULT_BATCH_CONCURRENCY: usize = 5;

/// Upper bound for `MARKET_MAX_RETRIES`; beyond this the backoff runs for minutes.
const MAX_RETRIES_LIMIT: u32 = 10;

#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Backend root, without a trailing slash (`http://host:5000/api`)
    pub api_base_url: String,

    /// Per-request timeout applied by the shared HTTP client
    pub timeout: Duration,

    /// Where the session token is persisted between runs
    pub session_file: PathBuf,

    /// Retry/backoff policy for idempotent requests
    pub retry: RetryConfig,

    /// In-flight limit for batch requests
    pub batch_concurrency: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            session_file: PathBuf::from(DEFAULT_SESSION_FILE),
            retry: RetryConfig::default(),
            batch_concurrency: DEFAULT_BATCH_CONCURRENCY,
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let defaults = RetryConfig::default();

        let api_base_url = get_env_or("MARKET_API_BASE_URL", DEFAULT_API_BASE_URL)
            .trim()
            .trim_end_matches('/')
            .to_string();
        let timeout_secs = get_env_parse_or("MARKET_HTTP_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;
        let session_file = PathBuf::from(get_env_or("MARKET_SESSION_FILE", DEFAULT_SESSION_FILE));
        let max_retries = get_env_parse_or("MARKET_MAX_RETRIES", defaults.max_retries)?;
        let retry_delay_ms = get_env_parse_or(
            "MARKET_RETRY_DELAY_MS",
            defaults.retry_delay.as_millis() as u64,
        )?;
        let batch_concurrency = get_env_parse_or("MARKET_BATCH_CONCURRENCY", DEFAULT_BATCH_CONCURRENCY)?;

        Ok(Self {
            api_base_url,
            timeout: Duration::from_secs(timeout_secs),
            session_file,
            retry: RetryConfig {
                max_retries,
                retry_delay: Duration::from_millis(retry_delay_ms),
                ..defaults
            },
            batch_concurrency,
        })
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        if self.api_base_url.is_empty() {
            return Err(ClientError::Config("MARKET_API_BASE_URL cannot be empty".to_string()));
        }

        if !(self.api_base_url.starts_with("http://") || self.api_base_url.starts_with("https://")) {
            return Err(ClientError::Config(format!(
                "MARKET_API_BASE_URL must start with http:// or https://, got {}",
                self.api_base_url
            )));
        }

        if self.timeout.is_zero() {
            return Err(ClientError::Config("MARKET_HTTP_TIMEOUT_SECS must be greater than 0".to_string()));
        }

        if self.batch_concurrency == 0 {
            return Err(ClientError::Config("MARKET_BATCH_CONCURRENCY must be at least 1".to_string()));
        }

        if self.retry.max_retries > MAX_RETRIES_LIMIT {
            return Err(ClientError::Config(format!(
                "MARKET_MAX_RETRIES must be at most {}",
                MAX_RETRIES_LIMIT
            )));
        }

        Ok(())
    }
}

/// Global configuration instance (initialized once at startup).
static CONFIG: OnceLock<ClientConfig> = OnceLock::new();

/// Load, validate and install the global configuration.
///
/// # Errors
///
/// Returns an error if variables are malformed, validation fails, or the
/// config has already been initialized.
pub fn init_config() -> Result<&'static ClientConfig> {
    let config = ClientConfig::from_env()?;
    config.validate()?;

    CONFIG
        .set(config)
        .map_err(|_| ClientError::Config("Config has already been initialized".to_string()))?;
    Ok(client_config())
}

/// Get a reference to the global configuration.
///
/// # Panics
///
/// Panics if [`init_config()`] has not been called yet.
pub fn client_config() -> &'static ClientConfig {
    CONFIG.get().expect("Config must be initialized with init_config() before use")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: [&str; 6] = [
        "MARKET_API_BASE_URL",
        "MARKET_HTTP_TIMEOUT_SECS",
        "MARKET_SESSION_FILE",
        "MARKET_MAX_RETRIES",
        "MARKET_RETRY_DELAY_MS",
        "MARKET_BATCH_CONCURRENCY",
    ];

    fn clear_env() {
        for var in VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        clear_env();
        let config = ClientConfig::from_env().unwrap();
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.retry.max_retries, 3);
        assert_eq!(config.retry.retry_delay, Duration::from_millis(1000));
        assert_eq!(config.batch_concurrency, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        clear_env();
        std::env::set_var("MARKET_API_BASE_URL", "https://market.example.edu/api/");
        std::env::set_var("MARKET_MAX_RETRIES", "5");
        std::env::set_var("MARKET_RETRY_DELAY_MS", "250");
        let config = ClientConfig::from_env().unwrap();
        clear_env();

        assert_eq!(config.api_base_url, "https://market.example.edu/api");
        assert_eq!(config.retry.max_retries, 5);
        assert_eq!(config.retry.retry_delay, Duration::from_millis(250));
    }

    #[test]
    #[serial]
    fn test_from_env_rejects_malformed_numbers() {
        clear_env();
        std::env::set_var("MARKET_HTTP_TIMEOUT_SECS", "ten");
        let result = ClientConfig::from_env();
        clear_env();

        assert!(matches!(result, Err(ClientError::Config(_))));
    }

    #[test]
    fn test_validate_rules() {
        let mut config = ClientConfig::default();
        config.api_base_url = "ftp://host".into();
        assert!(config.validate().is_err());

        let mut config = ClientConfig::default();
        config.timeout = Duration::ZERO;
        assert!(config.validate().is_err());

        let mut config = ClientConfig::default();
        config.batch_concurrency = 0;
        assert!(config.validate().is_err());

        let mut config = ClientConfig::default();
        config.retry.max_retries = 11;
        assert!(config.validate().is_err());
    }
}
