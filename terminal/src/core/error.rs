//! # Terminal Error Type
//!
//! Errors that end the terminal session. Chain failures met while handling a
//! command are rendered inline and do not stop the loop; only startup and
//! I/O problems reach `main` as an [`AppError`].
//!
//! ## Error Categories
//!
//! - **Config**: environment variables missing or invalid
//! - **Io**: reading commands from stdin failed

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;
