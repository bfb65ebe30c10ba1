//! Session state exposed to the page.

pub mod dashboard;
pub mod options;
