//! External integrations available in the browser.

pub mod provider;
