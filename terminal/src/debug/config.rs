//! Logging configuration from environment variables

use lib_utils::get_env_opt;
use std::path::PathBuf;

const DEFAULT_LOG_LEVEL: &str = "lib_chain=info,terminal=info";
const DEFAULT_LOG_DIR: &str = "logs";

/// Log file base name; the daily appender adds a date suffix.
pub const LOG_FILE_NAME: &str = "wallet-terminal.log";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Directory holding the rotated log files
    pub log_dir: PathBuf,
    /// Filter directives (e.g. "lib_chain=debug,terminal=info")
    pub log_level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl LogConfig {
    /// Load configuration from `LOG_DIR` and `RUST_LOG`
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            log_dir: get_env_opt("LOG_DIR").map(PathBuf::from).unwrap_or(defaults.log_dir),
            log_level: get_env_opt("RUST_LOG").unwrap_or(defaults.log_level),
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
