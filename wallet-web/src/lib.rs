//! Browser bridge for the wallet dashboard.
//!
//! Compiled to wasm and loaded by the dashboard page. The page renders; this
//! crate owns the session and talks to the injected `window.ethereum`
//! provider.
//!
//! ```text
//! page (JS) ──► WalletDashboard ──► SessionController ──► window.ethereum
//!                                          │
//!                                          └──► history / chain-info HTTP
//! ```

use wasm_bindgen::prelude::*;

pub mod services;
pub mod state;

pub use state::dashboard::WalletDashboard;

#[wasm_bindgen(start)]
pub fn main() {
    // Set up panic hook for better error messages in WASM
    console_error_panic_hook::set_once();

    // Route `log` (and `tracing` through its log feature) to the console
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("wallet dashboard module loaded");

    if !services::provider::is_provider_installed() {
        web_sys::console::warn_1(&"No injected wallet provider found (window.ethereum)".into());
    }
}
