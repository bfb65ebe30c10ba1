//! # Wallet Terminal - Library Root
//!
//! Line-oriented dashboard for an EVM account: native and token balances,
//! recent history and explorer links. Talks JSON-RPC to a node in place of a
//! browser wallet.
//!
//! ```text
//! ┌────────────────────────────────────────┐
//! │        terminal (this crate)           │
//! │  app      - command execution          │
//! │  ui       - text rendering             │
//! │  debug    - tracing setup              │
//! └────────────────────────────────────────┘
//!          │
//!          ▼
//! ┌────────────────────────────────────────┐
//! │  lib-chain: session, aggregator,       │
//! │  provider, indexer, chain-info         │
//! └────────────────────────────────────────┘
//!     │ JSON-RPC          │ HTTP
//!     ▼                   ▼
//!   node            indexer / chain-info
//! ```

pub mod app;
pub mod core;
pub mod debug;
pub mod ui;
