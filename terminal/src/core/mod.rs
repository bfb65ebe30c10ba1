//! Core types shared by the terminal modules.

pub mod error;
