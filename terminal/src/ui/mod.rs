//! Plain-text rendering of the dashboard.

pub mod dashboard;
