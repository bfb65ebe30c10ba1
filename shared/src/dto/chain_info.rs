//! Chain-info service responses.
//!
//! The service answers `GET ?action=info` with network-wide figures and
//! `GET ?action=balance&address=<addr>` with one account's holdings. Numeric
//! fields arrive either as JSON numbers or as numeric strings depending on the
//! deployment, so they are read leniently.

use serde::{Deserialize, Deserializer, Serialize};

/// Network-wide figures (`?action=info`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainInfo {
    /// Gas price in Gwei.
    #[serde(deserialize_with = "f64_lenient")]
    pub gas_price: f64,
    #[serde(deserialize_with = "u64_lenient")]
    pub block_number: u64,
    pub network: String,
    #[serde(deserialize_with = "u64_lenient")]
    pub chain_id: u64,
    /// Native currency price in USD.
    #[serde(deserialize_with = "f64_lenient")]
    pub eth_price: f64,
}

/// One account's holdings (`?action=balance`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountBalance {
    pub address: String,
    #[serde(deserialize_with = "f64_lenient")]
    pub balance: f64,
    #[serde(deserialize_with = "f64_lenient")]
    pub usd_value: f64,
    #[serde(default)]
    pub tokens: Vec<TokenHolding>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenHolding {
    pub symbol: String,
    #[serde(deserialize_with = "f64_lenient")]
    pub balance: f64,
    #[serde(deserialize_with = "f64_lenient")]
    pub usd_value: f64,
    pub contract_address: String,
}

/// Error body returned with 4xx/5xx statuses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceError {
    pub error: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(serde_json::Number),
    String(String),
}

fn f64_lenient<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => n
            .as_f64()
            .ok_or_else(|| serde::de::Error::custom("number out of range")),
        NumberOrString::String(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

fn u64_lenient<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => n
            .as_u64()
            .ok_or_else(|| serde::de::Error::custom("expected a non-negative integer")),
        NumberOrString::String(s) => {
            let s = s.trim();
            match s.strip_prefix("0x") {
                Some(hex) => u64::from_str_radix(hex, 16).map_err(serde::de::Error::custom),
                None => s.parse().map_err(serde::de::Error::custom),
            }
        }
    }
}
