//! # Chain-Info Service Client
//!
//! Optional HTTP service that reports network-wide figures (gas price, block
//! height, native price) and per-account holdings.
//!
//! | Status      | Mapped to            |
//! |-------------|----------------------|
//! | 2xx         | parsed body          |
//! | 400         | `InvalidAddress`     |
//! | 5xx / other | `NetworkUnreachable` |

use crate::error::{Error, Result};
use crate::runtime::with_timeout;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use shared::{AccountBalance, Address, ChainInfo, ServiceError};
use std::time::Duration;

pub struct ChainInfoClient {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl ChainInfoClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// `GET ?action=info`
    pub async fn info(&self) -> Result<ChainInfo> {
        with_timeout("chain info request", self.timeout, self.get_json(&[("action", "info")])).await
    }

    /// `GET ?action=balance&address=<address>`
    ///
    /// The address is validated locally before any request is made.
    pub async fn account_balance(&self, address: &str) -> Result<AccountBalance> {
        let address = Address::parse(address)?;
        with_timeout(
            "account balance request",
            self.timeout,
            self.get_json(&[("action", "balance"), ("address", address.as_str())]),
        )
        .await
    }

    async fn get_json<T: DeserializeOwned>(&self, query: &[(&str, &str)]) -> Result<T> {
        let response = self
            .client
            .get(&self.base_url)
            .query(query)
            .send()
            .await
            .map_err(|e| Error::NetworkUnreachable(format!("chain-info service: {}", e)))?;

        let status = response.status();
        if status.is_success() {
            return response
                .json::<T>()
                .await
                .map_err(|e| Error::malformed(format!("chain-info response: {}", e)));
        }

        let detail = response
            .json::<ServiceError>()
            .await
            .map(|body| body.error)
            .unwrap_or_else(|_| status.to_string());

        match status {
            StatusCode::BAD_REQUEST => Err(Error::InvalidAddress(detail)),
            _ => Err(Error::NetworkUnreachable(format!("chain-info service returned {}: {}", status, detail))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::spawn_server;
    use axum::{extract::Query, http::StatusCode, routing::get, Json, Router};
    use serde_json::{json, Value};
    use std::collections::HashMap;

    async fn service(Query(params): Query<HashMap<String, String>>) -> (StatusCode, Json<Value>) {
        match params.get("action").map(String::as_str) {
            Some("info") => (
                StatusCode::OK,
                Json(json!({
                    "gasPrice": "21.4",
                    "blockNumber": 19500000,
                    "network": "Ethereum Mainnet",
                    "chainId": 1,
                    "ethPrice": "3050.10"
                })),
            ),
            Some("balance") => match params.get("address").map(String::as_str) {
                Some("0x0000000000000000000000000000000000000000") => (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": "Address is blocked" })),
                ),
                Some(address) => (
                    StatusCode::OK,
                    Json(json!({
                        "address": address,
                        "balance": 2.5,
                        "usdValue": 7625.25,
                        "tokens": [{
                            "symbol": "USDC",
                            "balance": "100.00",
                            "usdValue": "100.00",
                            "contractAddress": "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48"
                        }]
                    })),
                ),
                None => (StatusCode::BAD_REQUEST, Json(json!({ "error": "Address required" }))),
            },
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Unknown action" })),
            ),
        }
    }

    async fn client() -> ChainInfoClient {
        let url = spawn_server(Router::new().route("/", get(service))).await;
        ChainInfoClient::new(url)
    }

    #[tokio::test]
    async fn test_info() {
        let info = client().await.info().await.unwrap();
        assert_eq!(info.chain_id, 1);
        assert_eq!(info.block_number, 19_500_000);
        assert_eq!(info.gas_price, 21.4);
    }

    #[tokio::test]
    async fn test_account_balance() {
        let balance = client()
            .await
            .account_balance("0xDEAD00000000000000000000000000000000BEEF")
            .await
            .unwrap();
        assert_eq!(balance.balance, 2.5);
        assert_eq!(balance.tokens.len(), 1);
        assert_eq!(balance.tokens[0].symbol, "USDC");
    }

    #[tokio::test]
    async fn test_invalid_address_rejected_locally() {
        let err = client().await.account_balance("not-an-address").await.unwrap_err();
        assert!(matches!(err, Error::InvalidAddress(_)));
    }

    #[tokio::test]
    async fn test_bad_request_maps_to_invalid_address() {
        let err = client()
            .await
            .account_balance("0x0000000000000000000000000000000000000000")
            .await
            .unwrap_err();
        assert_eq!(err, Error::InvalidAddress("Address is blocked".to_string()));
    }

    #[tokio::test]
    async fn test_server_error_maps_to_network() {
        let router = Router::new().route(
            "/",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": "upstream down" }))) }),
        );
        let url = spawn_server(router).await;
        let err = ChainInfoClient::new(url).info().await.unwrap_err();
        assert!(matches!(err, Error::NetworkUnreachable(ref m) if m.contains("upstream down")));
    }

    #[tokio::test]
    async fn test_unreadable_body_is_malformed() {
        let router = Router::new().route("/", get(|| async { "<html>maintenance</html>" }));
        let url = spawn_server(router).await;
        let err = ChainInfoClient::new(url).info().await.unwrap_err();
        assert!(matches!(err, Error::MalformedResponse(_)));
    }
}
