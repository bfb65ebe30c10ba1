//! # Utilities Library
//!
//! Shared helpers for environment variables, input validation and time.

pub mod envs;
pub mod time;
pub mod validation;

// Re-export commonly used functions
pub use envs::{get_env_opt, get_env_parse_or};
pub use time::{format_unix, now_unix};
pub use validation::{validate_http_url, validate_not_empty, validate_range};
