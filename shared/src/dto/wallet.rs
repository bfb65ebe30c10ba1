//! Session, balance and history records.

use super::address::Address;
use super::chain_info::ChainInfo;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Outcome of a historical transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxStatus {
    Success,
    Pending,
    Failed,
}

/// One fungible-token holding of the active account, in display units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenBalance {
    pub symbol: String,
    pub contract_address: Address,
    pub decimals: u8,
    pub amount: Decimal,
}

/// One entry of the recent transaction history.
///
/// `to` is `None` for contract creations. `placeholder` marks synthetic
/// records substituted while the indexing service is unavailable; they carry
/// no chain data and must not be presented as real history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub hash: String,
    pub from: Address,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<Address>,
    pub value_eth: Decimal,
    pub gas_used: u64,
    pub gas_price_gwei: Decimal,
    pub block_number: u64,
    pub timestamp_unix: u64,
    pub status: TxStatus,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub placeholder: bool,
}

impl TransactionRecord {
    /// Block time as a UTC date, if the timestamp is representable.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        i64::try_from(self.timestamp_unix)
            .ok()
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
    }

    pub fn is_contract_creation(&self) -> bool {
        self.to.is_none()
    }
}

/// The connection record exposed to front ends.
///
/// `address`, `native_balance`, `network_name` and `chain_id` are either all
/// set (with `connected == true`) or all `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WalletSession {
    pub connected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub native_balance: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<u64>,
    pub loading: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl WalletSession {
    /// A fully populated, connected session.
    pub fn connected(address: Address, native_balance: Decimal, network_name: String, chain_id: u64) -> Self {
        Self {
            connected: true,
            address: Some(address),
            native_balance: Some(native_balance),
            network_name: Some(network_name),
            chain_id: Some(chain_id),
            loading: false,
            error: None,
        }
    }

    /// A disconnected session carrying a failure message.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::default()
        }
    }
}

/// Connection lifecycle state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    #[default]
    Disconnected,
    Connecting,
    Connected,
    Error,
}

impl ConnectionStatus {
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionStatus::Connected)
    }
}

/// Everything a front end needs to render the dashboard at one instant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub status: ConnectionStatus,
    pub session: WalletSession,
    pub tokens: Vec<TokenBalance>,
    pub transactions: Vec<TransactionRecord>,
    pub refreshing: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market: Option<ChainInfo>,
}

impl SessionSnapshot {
    /// True while the visible history is a synthetic stand-in.
    pub fn history_degraded(&self) -> bool {
        self.transactions.iter().any(|tx| tx.placeholder)
    }
}
