//! # Chain Library
//!
//! EVM wallet dashboard core: provider abstraction, balance and history
//! aggregation, and the connection session shared by the terminal and the
//! browser bridge.
//!
//! ## Modules
//!
//! - [`provider`] - EIP-1193 transport trait, typed client, HTTP JSON-RPC transport
//! - [`aggregator`] - native, token and history lookups for one account
//! - [`session`] - connection lifecycle and snapshot state
//! - [`history`] - Etherscan-compatible indexer client and record normalization
//! - [`chain_info`] - optional chain-info service client
//! - [`network`] - chain id registry and explorer links
//! - [`erc20`] - token catalog and `balanceOf` encoding
//! - [`units`] - base-unit / display-decimal conversion

pub mod aggregator;
pub mod chain_info;
pub mod config;
pub mod erc20;
pub mod error;
pub mod history;
pub mod network;
pub mod provider;
pub mod runtime;
pub mod session;
pub mod units;

// Re-export commonly used types from root for convenience
pub use aggregator::{AccountAccess, ChainAggregator};
pub use chain_info::ChainInfoClient;
pub use config::{DashboardConfig, Timeouts};
pub use error::{Error, Result};
pub use history::{EtherscanClient, TransactionIndexer};
pub use network::ExplorerKind;
pub use provider::{Eip1193Client, Eip1193Transport, HttpTransport, WalletProvider};
pub use session::SessionController;
