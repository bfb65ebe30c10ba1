//! # Data Transfer Objects (DTOs)
//!
//! Data structures exchanged between the chain-data core and its front ends.
//!
//! ## Module Organization
//!
//! - [`address`] - Validated `0x`-prefixed account / contract address
//! - [`wallet`] - Session, token balances, transaction history, snapshot
//! - [`chain_info`] - Chain-info service responses (`?action=info`, `?action=balance`)
//!
//! ## Serialization Format
//!
//! - **Field naming**: snake_case (default serde behavior)
//! - **Optional fields**: Omitted when `None` using `#[serde(skip_serializing_if = "Option::is_none")]`
//! - **Enums**: Serialize to lowercase strings using `#[serde(rename_all = "lowercase")]`
//! - **Decimals**: Serialize as strings, keeping their display scale
//!
//! ## Example Snapshot
//!
//! ```text
//! {
//!   "status": "connected",
//!   "session": {
//!     "connected": true,
//!     "address": "0xDEAD00000000000000000000000000000000BEEF",
//!     "native_balance": "1.000000",
//!     "network_name": "Ethereum Mainnet",
//!     "chain_id": 1,
//!     "loading": false
//!   },
//!   "tokens": [{ "symbol": "USDC", "contract_address": "0xA0b8...", "decimals": 6, "amount": "12.50" }],
//!   "transactions": [],
//!   "refreshing": false
//! }
//! ```

pub mod address;
pub mod chain_info;
pub mod wallet;

pub use address::*;
pub use chain_info::*;
pub use wallet::*;
