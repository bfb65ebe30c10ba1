//! # Transaction History
//!
//! Recent transactions come from an Etherscan-compatible indexer (the V2
//! multichain API by default). Raw records are normalized into
//! [`TransactionRecord`]s, newest first.
//!
//! History is best-effort: when the indexer cannot be reached or returns
//! something unreadable, callers substitute [`placeholder_history`], one
//! synthetic record flagged with `placeholder: true`.

use crate::error::{Error, Result};
use crate::runtime::with_timeout;
use crate::units::{parse_dec_quantity, to_gwei, to_native_display};
use async_trait::async_trait;
use lib_utils::now_unix;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use shared::{Address, TransactionRecord, TxStatus};
use std::time::Duration;

pub const DEFAULT_HISTORY_API: &str = "https://api.etherscan.io/v2/api";
/// Maximum number of records kept for display.
pub const HISTORY_LIMIT: usize = 10;
/// Gas used by a plain value transfer.
pub const TRANSFER_GAS: u64 = 21_000;

const ZERO_HASH: &str = "0x0000000000000000000000000000000000000000000000000000000000000000";

/// One transaction as reported by the indexer. Every numeric field is a
/// base-10 string; `to` is empty for contract creations.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTransaction {
    pub hash: String,
    pub from: String,
    #[serde(default)]
    pub to: String,
    pub value: String,
    pub gas_used: String,
    pub gas_price: String,
    pub block_number: String,
    pub time_stamp: String,
    #[serde(default)]
    pub is_error: String,
}

/// Source of recent transactions for an account.
#[async_trait(?Send)]
pub trait TransactionIndexer {
    async fn recent_transactions(&self, address: &Address, chain_id: u64, limit: usize) -> Result<Vec<RawTransaction>>;
}

/// Etherscan-compatible `account/txlist` client.
pub struct EtherscanClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    timeout: Duration,
}

#[derive(Deserialize)]
struct IndexerResponse {
    status: String,
    #[serde(default)]
    message: String,
    result: Value,
}

impl EtherscanClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            api_key: None,
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn fetch(&self, address: &Address, chain_id: u64, limit: usize) -> Result<Vec<RawTransaction>> {
        let mut query: Vec<(&str, String)> = vec![
            ("chainid", chain_id.to_string()),
            ("module", "account".to_string()),
            ("action", "txlist".to_string()),
            ("address", address.to_string()),
            ("startblock", "0".to_string()),
            ("endblock", "99999999".to_string()),
            ("page", "1".to_string()),
            ("offset", limit.to_string()),
            ("sort", "desc".to_string()),
        ];
        if let Some(key) = &self.api_key {
            query.push(("apikey", key.clone()));
        }

        let response = self
            .client
            .get(&self.base_url)
            .query(&query)
            .send()
            .await
            .map_err(|e| Error::NetworkUnreachable(format!("history service: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::NetworkUnreachable(format!("history service returned {}", status)));
        }

        let body: IndexerResponse = response
            .json()
            .await
            .map_err(|e| Error::malformed(format!("history response: {}", e)))?;

        match body.result {
            Value::Array(items) if body.status == "1" || items.is_empty() => items
                .into_iter()
                .map(|item| serde_json::from_value(item).map_err(Error::from))
                .collect(),
            other => Err(Error::malformed(format!(
                "history service error: {} ({})",
                body.message,
                other.as_str().unwrap_or("no detail")
            ))),
        }
    }
}

#[async_trait(?Send)]
impl TransactionIndexer for EtherscanClient {
    async fn recent_transactions(&self, address: &Address, chain_id: u64, limit: usize) -> Result<Vec<RawTransaction>> {
        with_timeout("history request", self.timeout, self.fetch(address, chain_id, limit)).await
    }
}

/// Normalize one indexer record.
pub fn normalize(raw: &RawTransaction) -> Result<TransactionRecord> {
    let to = match raw.to.trim() {
        "" => None,
        text => Some(Address::parse(text)?),
    };

    let gas_used = u64::try_from(parse_dec_quantity(&raw.gas_used)?)
        .map_err(|_| Error::malformed(format!("gasUsed '{}' out of range", raw.gas_used)))?;
    let block_number = u64::try_from(parse_dec_quantity(&raw.block_number)?)
        .map_err(|_| Error::malformed(format!("blockNumber '{}' out of range", raw.block_number)))?;
    let timestamp_unix = u64::try_from(parse_dec_quantity(&raw.time_stamp)?)
        .map_err(|_| Error::malformed(format!("timeStamp '{}' out of range", raw.time_stamp)))?;

    let status = match raw.is_error.trim() {
        "" | "0" => TxStatus::Success,
        _ => TxStatus::Failed,
    };

    Ok(TransactionRecord {
        hash: raw.hash.clone(),
        from: Address::parse(&raw.from)?,
        to,
        value_eth: to_native_display(parse_dec_quantity(&raw.value)?),
        gas_used,
        gas_price_gwei: to_gwei(parse_dec_quantity(&raw.gas_price)?),
        block_number,
        timestamp_unix,
        status,
        placeholder: false,
    })
}

/// Normalize a batch, newest first, keeping at most `limit` records.
/// A single unreadable record fails the whole batch.
pub fn normalize_history(raw: &[RawTransaction], limit: usize) -> Result<Vec<TransactionRecord>> {
    let mut records = raw.iter().map(normalize).collect::<Result<Vec<_>>>()?;
    records.sort_by(|a, b| {
        (b.block_number, b.timestamp_unix).cmp(&(a.block_number, a.timestamp_unix))
    });
    records.truncate(limit);
    Ok(records)
}

/// The single synthetic record shown while history is unavailable.
pub fn placeholder_history(address: &Address) -> Vec<TransactionRecord> {
    vec![TransactionRecord {
        hash: ZERO_HASH.to_string(),
        from: address.clone(),
        to: Some(address.clone()),
        value_eth: Decimal::ZERO,
        gas_used: TRANSFER_GAS,
        gas_price_gwei: Decimal::ZERO,
        block_number: 0,
        timestamp_unix: now_unix(),
        status: TxStatus::Success,
        placeholder: true,
    }]
}
