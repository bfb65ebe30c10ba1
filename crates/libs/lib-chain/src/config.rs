//! # Dashboard Configuration
//!
//! Endpoints, credentials and deadlines, loaded from environment variables by
//! the native terminal. The browser build starts from [`DashboardConfig::default`]
//! and overrides individual fields from JavaScript.
//!
//! | Variable                        | Default                            |
//! |---------------------------------|------------------------------------|
//! | `WALLET_RPC_URL`                | `http://127.0.0.1:8545`            |
//! | `WALLET_WATCH_ADDRESS`          | unset                              |
//! | `HISTORY_API_URL`               | `https://api.etherscan.io/v2/api`  |
//! | `HISTORY_API_KEY`               | unset                              |
//! | `CHAIN_INFO_URL`                | unset                              |
//! | `PROVIDER_PROMPT_TIMEOUT_SECS`  | `120`                              |
//! | `PROVIDER_REQUEST_TIMEOUT_SECS` | `30`                               |
//! | `HTTP_TIMEOUT_SECS`             | `10`                               |

use crate::chain_info::ChainInfoClient;
use crate::history::{EtherscanClient, DEFAULT_HISTORY_API};
use lib_utils::{get_env_opt, get_env_parse_or, validate_http_url, validate_range};
use shared::Address;
use std::time::Duration;

pub const DEFAULT_RPC_URL: &str = "http://127.0.0.1:8545";

const DEFAULT_PROMPT_TIMEOUT_SECS: u64 = 120;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

/// Deadlines applied to provider and HTTP calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    /// Account requests that may open a wallet approval prompt.
    pub prompt: Duration,
    /// Every other provider request.
    pub request: Duration,
    /// Indexer and chain-info HTTP calls.
    pub http: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            prompt: Duration::from_secs(DEFAULT_PROMPT_TIMEOUT_SECS),
            request: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            http: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    /// JSON-RPC endpoint used by the native terminal in place of an injected wallet.
    pub rpc_url: String,
    /// Read-only account to show when the endpoint exposes no accounts.
    pub watch_address: Option<Address>,
    pub history_api_url: String,
    pub history_api_key: Option<String>,
    /// Optional chain-info service (`?action=info`, `?action=balance`).
    pub chain_info_url: Option<String>,
    pub prompt_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub http_timeout_secs: u64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.to_string(),
            watch_address: None,
            history_api_url: DEFAULT_HISTORY_API.to_string(),
            history_api_key: None,
            chain_info_url: None,
            prompt_timeout_secs: DEFAULT_PROMPT_TIMEOUT_SECS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
        }
    }
}

impl DashboardConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, String> {
        let defaults = Self::default();

        let watch_address = get_env_opt("WALLET_WATCH_ADDRESS")
            .map(|value| Address::parse(&value))
            .transpose()
            .map_err(|e| format!("WALLET_WATCH_ADDRESS is invalid: {}", e))?;

        let prompt_timeout_secs = get_env_parse_or("PROVIDER_PROMPT_TIMEOUT_SECS", defaults.prompt_timeout_secs)
            .map_err(|_| "PROVIDER_PROMPT_TIMEOUT_SECS must be a whole number of seconds".to_string())?;
        let request_timeout_secs = get_env_parse_or("PROVIDER_REQUEST_TIMEOUT_SECS", defaults.request_timeout_secs)
            .map_err(|_| "PROVIDER_REQUEST_TIMEOUT_SECS must be a whole number of seconds".to_string())?;
        let http_timeout_secs = get_env_parse_or("HTTP_TIMEOUT_SECS", defaults.http_timeout_secs)
            .map_err(|_| "HTTP_TIMEOUT_SECS must be a whole number of seconds".to_string())?;

        Ok(Self {
            rpc_url: get_env_opt("WALLET_RPC_URL").unwrap_or(defaults.rpc_url),
            watch_address,
            history_api_url: get_env_opt("HISTORY_API_URL").unwrap_or(defaults.history_api_url),
            history_api_key: get_env_opt("HISTORY_API_KEY"),
            chain_info_url: get_env_opt("CHAIN_INFO_URL"),
            prompt_timeout_secs,
            request_timeout_secs,
            http_timeout_secs,
        })
    }

    /// Validate URLs and deadline ranges.
    pub fn validate(&self) -> Result<(), String> {
        validate_http_url(&self.rpc_url, "WALLET_RPC_URL")?;
        validate_http_url(&self.history_api_url, "HISTORY_API_URL")?;
        if let Some(url) = &self.chain_info_url {
            validate_http_url(url, "CHAIN_INFO_URL")?;
        }
        validate_range(self.prompt_timeout_secs, 1, 3600, "PROVIDER_PROMPT_TIMEOUT_SECS")?;
        validate_range(self.request_timeout_secs, 1, 600, "PROVIDER_REQUEST_TIMEOUT_SECS")?;
        validate_range(self.http_timeout_secs, 1, 600, "HTTP_TIMEOUT_SECS")?;
        Ok(())
    }

    pub fn timeouts(&self) -> Timeouts {
        Timeouts {
            prompt: Duration::from_secs(self.prompt_timeout_secs),
            request: Duration::from_secs(self.request_timeout_secs),
            http: Duration::from_secs(self.http_timeout_secs),
        }
    }

    /// Transaction indexer client for the configured history API.
    pub fn history_client(&self) -> EtherscanClient {
        EtherscanClient::new(&self.history_api_url)
            .with_api_key(self.history_api_key.clone())
            .with_timeout(self.timeouts().http)
    }

    /// Chain-info client, when a service URL is configured.
    pub fn chain_info_client(&self) -> Option<ChainInfoClient> {
        self.chain_info_url
            .as_ref()
            .map(|url| ChainInfoClient::new(url).with_timeout(self.timeouts().http))
    }
}
