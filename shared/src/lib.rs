//! # Shared Wallet Dashboard Types
//!
//! This library defines the contract between the chain-data core (`lib-chain`)
//! and its front ends (the native `terminal` and the browser `wallet-web` bridge).
//! Everything here is plain data with `serde` support so snapshots can cross the
//! wasm boundary or be written to logs unchanged.
//!
//! ## Structure
//!
//! - **[`dto`]**: Data Transfer Objects
//!   - **[`dto::address`]**: validated EVM [`Address`](dto::address::Address)
//!   - **[`dto::wallet`]**: session, token balance and transaction records
//!   - **[`dto::chain_info`]**: response shapes of the chain-info service
//! - **[`utils`]**: display helpers
//!   - **[`utils::format_address`]**: shorten an address for display
//!   - **[`utils::truncate_address`]**: `0x1234...abcd` style shortening
//!
//! ## Wire Format
//!
//! - Field names are **snake_case** unless a type mirrors an external API
//!   (the chain-info types use the service's camelCase names)
//! - Decimal amounts serialize as strings (`"1.000000"`) so the display
//!   precision survives the round trip
//! - Optional fields are omitted when `None`
//!
//! ## Usage
//!
//! ```rust
//! use shared::dto::address::Address;
//! use shared::utils::truncate_address;
//!
//! let address: Address = "0xDEAD00000000000000000000000000000000BEEF".parse().unwrap();
//! assert_eq!(truncate_address(address.as_str()), "0xDEAD...BEEF");
//! ```

pub mod dto;
pub mod utils;

pub use dto::*;
pub use utils::*;
