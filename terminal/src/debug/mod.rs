//! Logging setup for the terminal binary.

pub mod config;
pub mod logger;
