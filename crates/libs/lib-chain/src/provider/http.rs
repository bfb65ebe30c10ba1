//! JSON-RPC 2.0 over HTTP.
//!
//! Stands in for an injected wallet when running natively. A plain node has
//! no approval prompt, so `eth_requestAccounts` is sent as `eth_accounts`;
//! when a watch address is configured both account methods answer with it
//! locally.

use super::Eip1193Transport;
use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use shared::Address;
use std::sync::atomic::{AtomicU64, Ordering};

pub struct HttpTransport {
    client: Client,
    url: String,
    watch_address: Option<Address>,
    next_id: AtomicU64,
}

#[derive(Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Value,
}

#[derive(Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcError>,
}

#[derive(Deserialize)]
struct RpcError {
    code: i64,
    message: String,
}

impl HttpTransport {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
            watch_address: None,
            next_id: AtomicU64::new(1),
        }
    }

    /// Report `address` as the only account instead of asking the node.
    pub fn with_watch_address(mut self, address: Option<Address>) -> Self {
        self.watch_address = address;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait(?Send)]
impl Eip1193Transport for HttpTransport {
    async fn request(&self, method: &str, params: Value) -> Result<Value> {
        let method = match method {
            "eth_requestAccounts" | "eth_accounts" => {
                if let Some(address) = &self.watch_address {
                    return Ok(json!([address.as_str()]));
                }
                "eth_accounts"
            }
            other => other,
        };

        let body = RpcRequest {
            jsonrpc: "2.0",
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            method,
            params,
        };

        let response = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::NetworkUnreachable(format!("{}: {}", self.url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::NetworkUnreachable(format!(
                "RPC endpoint {} returned {}",
                self.url, status
            )));
        }

        let payload: RpcResponse = response
            .json()
            .await
            .map_err(|e| Error::malformed(format!("invalid JSON-RPC response: {}", e)))?;

        if let Some(err) = payload.error {
            return Err(Error::from_rpc(err.code, err.message));
        }
        payload
            .result
            .ok_or_else(|| Error::malformed(format!("{} response has no result", method)))
    }
}
