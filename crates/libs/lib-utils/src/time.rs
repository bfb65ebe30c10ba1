//! # Time Utilities
//!
//! Clock and formatting helpers using chrono.

use chrono::{DateTime, Utc};

/// Current time as seconds since the Unix epoch.
pub fn now_unix() -> u64 {
    u64::try_from(Utc::now().timestamp()).unwrap_or(0)
}

/// Format a Unix timestamp as `YYYY-MM-DD HH:MM:SS UTC`.
pub fn format_unix(secs: u64) -> Result<String, Error> {
    i64::try_from(secs)
        .ok()
        .and_then(|s| DateTime::<Utc>::from_timestamp(s, 0))
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .ok_or(Error::OutOfRange(secs))
}

// region:    --- Error
#[derive(Debug)]
pub enum Error {
    OutOfRange(u64),
}

impl std::fmt::Display for Error {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(fmt, "{self:?}")
    }
}

impl std::error::Error for Error {}
// endregion: --- Error
