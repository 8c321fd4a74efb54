//! Logging configuration from environment variables

use lib_utils::envs::get_env_or;
use std::path::PathBuf;

pub const DEFAULT_LOG_FILTER: &str = "market_client=info,warn";
pub const LOG_FILE_NAME: &str = "market-client.log";

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Directory for the daily-rotated log file
    pub log_dir: PathBuf,
    /// Filter directive (e.g., "market_client=debug,info")
    pub log_level: String,
    /// Mirror log lines to stdout
    pub log_to_stdout: bool,
    /// Write the file log as JSON lines
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from("logs"),
            log_level: DEFAULT_LOG_FILTER.to_string(),
            log_to_stdout: false,
            json: false,
        }
    }
}

impl LogConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            log_dir: PathBuf::from(get_env_or("MARKET_LOG_DIR", "logs")),
            log_level: get_env_or("RUST_LOG", DEFAULT_LOG_FILTER),
            log_to_stdout: get_env_or("MARKET_LOG_STDOUT", "0") == "1",
            json: get_env_or("MARKET_LOG_JSON", "0") == "1",
        }
    }

    pub fn log_file(&self) -> PathBuf {
        self.log_dir.join(LOG_FILE_NAME)
    }

    /// Check if debug logging is enabled
    pub fn is_debug_enabled(&self) -> bool {
        self.log_level.contains("debug") || self.log_level.contains("trace")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_from_env() {
        std::env::remove_var("RUST_LOG");
        std::env::set_var("MARKET_LOG_DIR", "/tmp/market-logs");
        std::env::set_var("MARKET_LOG_STDOUT", "1");
        let config = LogConfig::from_env();
        std::env::remove_var("MARKET_LOG_DIR");
        std::env::remove_var("MARKET_LOG_STDOUT");

        assert_eq!(config.log_dir, PathBuf::from("/tmp/market-logs"));
        assert_eq!(config.log_level, DEFAULT_LOG_FILTER);
        assert!(config.log_to_stdout);
        assert!(!config.json);
        assert_eq!(config.log_file(), PathBuf::from("/tmp/market-logs/market-client.log"));
        assert!(!config.is_debug_enabled());
    }
}
