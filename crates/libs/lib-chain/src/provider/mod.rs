//! # Wallet Provider
//!
//! Abstraction over an EIP-1193 wallet provider: one `request(method, params)`
//! entry point, wrapped by [`Eip1193Client`] into the typed operations the
//! dashboard needs.
//!
//! Two transports implement [`Eip1193Transport`]:
//!
//! - the injected browser provider (`window.ethereum`), in the `wallet-web` crate
//! - [`HttpTransport`], a plain JSON-RPC endpoint used by the native terminal
//!
//! Futures are `?Send` because the browser transport awaits JavaScript promises.

pub mod http;

pub use http::HttpTransport;

use crate::config::Timeouts;
use crate::error::{Error, Result};
use crate::runtime::with_timeout;
use crate::units::parse_hex_quantity;
use async_trait::async_trait;
use serde_json::{json, Value};
use shared::Address;
use std::time::Duration;

/// Raw EIP-1193 request channel.
#[async_trait(?Send)]
pub trait Eip1193Transport {
    /// Issue `method` with positional `params`, returning the `result` value.
    async fn request(&self, method: &str, params: Value) -> Result<Value>;
}

/// Typed wallet operations used by the aggregator.
#[async_trait(?Send)]
pub trait WalletProvider {
    /// Ask for account access; may open an approval prompt.
    async fn request_accounts(&self) -> Result<Vec<Address>>;

    /// Accounts already authorized for this origin, without prompting.
    async fn accounts(&self) -> Result<Vec<Address>>;

    async fn chain_id(&self) -> Result<u64>;

    /// Native balance in wei at the latest block.
    async fn get_balance(&self, address: &Address) -> Result<u128>;

    /// Read-only contract call at the latest block, returning raw output bytes.
    async fn call_contract(&self, to: &Address, data: &[u8]) -> Result<Vec<u8>>;
}

/// [`WalletProvider`] over any [`Eip1193Transport`], with per-call deadlines.
pub struct Eip1193Client<T> {
    transport: T,
    timeouts: Timeouts,
}

impl<T: Eip1193Transport> Eip1193Client<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            timeouts: Timeouts::default(),
        }
    }

    pub fn with_timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    async fn call(&self, method: &'static str, params: Value, limit: Duration) -> Result<Value> {
        tracing::debug!(method, "provider request");
        with_timeout(method, limit, self.transport.request(method, params)).await
    }
}

#[async_trait(?Send)]
impl<T: Eip1193Transport> WalletProvider for Eip1193Client<T> {
    async fn request_accounts(&self) -> Result<Vec<Address>> {
        let value = self.call("eth_requestAccounts", json!([]), self.timeouts.prompt).await?;
        parse_accounts(value)
    }

    async fn accounts(&self) -> Result<Vec<Address>> {
        let value = self.call("eth_accounts", json!([]), self.timeouts.request).await?;
        parse_accounts(value)
    }

    async fn chain_id(&self) -> Result<u64> {
        let value = self.call("eth_chainId", json!([]), self.timeouts.request).await?;
        let raw = match &value {
            Value::String(s) => parse_hex_quantity(s)?,
            Value::Number(n) => n
                .as_u64()
                .map(u128::from)
                .ok_or_else(|| Error::malformed(format!("chain id {} is not an integer", n)))?,
            other => return Err(Error::malformed(format!("unexpected chain id {}", other))),
        };
        u64::try_from(raw).map_err(|_| Error::malformed(format!("chain id {} out of range", raw)))
    }

    async fn get_balance(&self, address: &Address) -> Result<u128> {
        let value = self
            .call("eth_getBalance", json!([address.as_str(), "latest"]), self.timeouts.request)
            .await?;
        parse_hex_quantity(expect_str(&value, "eth_getBalance")?)
    }

    async fn call_contract(&self, to: &Address, data: &[u8]) -> Result<Vec<u8>> {
        let params = json!([
            { "to": to.as_str(), "data": format!("0x{}", hex::encode(data)) },
            "latest"
        ]);
        let value = self.call("eth_call", params, self.timeouts.request).await?;
        let text = expect_str(&value, "eth_call")?;
        let digits = text
            .strip_prefix("0x")
            .ok_or_else(|| Error::malformed(format!("eth_call result '{}' is not 0x-prefixed", text)))?;
        hex::decode(digits).map_err(|e| Error::malformed(format!("eth_call result is not hex: {}", e)))
    }
}

fn expect_str<'a>(value: &'a Value, method: &str) -> Result<&'a str> {
    value
        .as_str()
        .ok_or_else(|| Error::malformed(format!("{} returned {}, expected a string", method, value)))
}

fn parse_accounts(value: Value) -> Result<Vec<Address>> {
    let Value::Array(items) = value else {
        return Err(Error::malformed(format!("expected an account list, got {}", value)));
    };
    items
        .iter()
        .map(|item| {
            let text = item
                .as_str()
                .ok_or_else(|| Error::malformed(format!("account entry {} is not a string", item)))?;
            Ok(Address::parse(text)?)
        })
        .collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::collections::HashMap;

    /// Transport returning canned results per method and recording calls.
    #[derive(Default)]
    pub(crate) struct ScriptedTransport {
        responses: HashMap<&'static str, Result<Value>>,
        pub(crate) calls: Mutex<Vec<(String, Value)>>,
    }

    impl ScriptedTransport {
        pub(crate) fn respond(mut self, method: &'static str, response: Result<Value>) -> Self {
            self.responses.insert(method, response);
            self
        }
    }

    #[async_trait(?Send)]
    impl Eip1193Transport for ScriptedTransport {
        async fn request(&self, method: &str, params: Value) -> Result<Value> {
            self.calls.lock().push((method.to_string(), params));
            self.responses
                .get(method)
                .cloned()
                .unwrap_or_else(|| Err(Error::Rpc {
                    code: -32601,
                    message: format!("method {} not scripted", method),
                }))
        }
    }

    struct StalledTransport;

    #[async_trait(?Send)]
    impl Eip1193Transport for StalledTransport {
        async fn request(&self, _method: &str, _params: Value) -> Result<Value> {
            futures::future::pending().await
        }
    }

    const OWNER: &str = "0xDEAD00000000000000000000000000000000BEEF";

    #[tokio::test]
    async fn test_request_accounts_parses_addresses() {
        let client = Eip1193Client::new(
            ScriptedTransport::default().respond("eth_requestAccounts", Ok(json!([OWNER]))),
        );
        let accounts = client.request_accounts().await.unwrap();
        assert_eq!(accounts, vec![Address::parse(OWNER).unwrap()]);
    }

    #[tokio::test]
    async fn test_rejected_prompt_surfaces_as_user_rejected() {
        let client = Eip1193Client::new(ScriptedTransport::default().respond(
            "eth_requestAccounts",
            Err(Error::from_rpc(4001, "User rejected the request.")),
        ));
        assert!(matches!(
            client.request_accounts().await,
            Err(Error::UserRejected(_))
        ));
    }

    #[tokio::test]
    async fn test_invalid_account_entry() {
        let client =
            Eip1193Client::new(ScriptedTransport::default().respond("eth_accounts", Ok(json!(["0x12"]))));
        assert!(matches!(client.accounts().await, Err(Error::InvalidAddress(_))));
    }

    #[tokio::test]
    async fn test_chain_id_hex_and_number() {
        let client = Eip1193Client::new(ScriptedTransport::default().respond("eth_chainId", Ok(json!("0x89"))));
        assert_eq!(client.chain_id().await.unwrap(), 137);

        let client = Eip1193Client::new(ScriptedTransport::default().respond("eth_chainId", Ok(json!(8453))));
        assert_eq!(client.chain_id().await.unwrap(), 8453);
    }

    #[tokio::test]
    async fn test_get_balance_sends_latest_tag() {
        let transport = ScriptedTransport::default().respond("eth_getBalance", Ok(json!("0xDE0B6B3A7640000")));
        let client = Eip1193Client::new(transport);
        let owner = Address::parse(OWNER).unwrap();

        assert_eq!(client.get_balance(&owner).await.unwrap(), 1_000_000_000_000_000_000);

        let calls = client.transport().calls.lock();
        assert_eq!(calls[0].1, json!([OWNER, "latest"]));
    }

    #[tokio::test]
    async fn test_call_contract_hex_encodes_data() {
        let word = format!("0x{:064x}", 1_500_000u64);
        let client = Eip1193Client::new(ScriptedTransport::default().respond("eth_call", Ok(json!(word))));
        let token = Address::parse("0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48").unwrap();

        let output = client.call_contract(&token, &[0x70, 0xa0, 0x82, 0x31]).await.unwrap();
        assert_eq!(output.len(), 32);

        let calls = client.transport().calls.lock();
        assert_eq!(calls[0].0, "eth_call");
        assert_eq!(calls[0].1[0]["data"], "0x70a08231");
        assert_eq!(calls[0].1[1], "latest");
    }

    #[tokio::test]
    async fn test_empty_call_result_decodes_to_no_bytes() {
        let client = Eip1193Client::new(ScriptedTransport::default().respond("eth_call", Ok(json!("0x"))));
        let token = Address::parse(OWNER).unwrap();
        assert!(client.call_contract(&token, &[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_prompt_deadline() {
        let client = Eip1193Client::new(StalledTransport).with_timeouts(Timeouts {
            prompt: Duration::from_millis(20),
            ..Timeouts::default()
        });
        assert!(matches!(
            client.request_accounts().await,
            Err(Error::Timeout {
                operation: "eth_requestAccounts",
                ..
            })
        ));
    }
}
