//! Settings the page passes to the `WalletDashboard` constructor.

use lib_chain::{DashboardConfig, ExplorerKind};
use serde::Deserialize;

/// Page-supplied overrides; unset fields keep [`DashboardConfig::default`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardOptions {
    pub history_api_url: Option<String>,
    pub history_api_key: Option<String>,
    pub chain_info_url: Option<String>,
    pub prompt_timeout_secs: Option<u64>,
    pub request_timeout_secs: Option<u64>,
    pub http_timeout_secs: Option<u64>,
}

impl DashboardOptions {
    /// Apply the overrides and validate the result.
    pub fn into_config(self) -> Result<DashboardConfig, String> {
        let mut config = DashboardConfig::default();
        if let Some(url) = self.history_api_url {
            config.history_api_url = url;
        }
        config.history_api_key = self.history_api_key.filter(|key| !key.trim().is_empty());
        config.chain_info_url = self.chain_info_url.filter(|url| !url.trim().is_empty());
        if let Some(secs) = self.prompt_timeout_secs {
            config.prompt_timeout_secs = secs;
        }
        if let Some(secs) = self.request_timeout_secs {
            config.request_timeout_secs = secs;
        }
        if let Some(secs) = self.http_timeout_secs {
            config.http_timeout_secs = secs;
        }
        config.validate()?;
        Ok(config)
    }
}

/// `"address"` or `"tx"` / `"transaction"`.
pub fn parse_explorer_kind(kind: &str) -> Result<ExplorerKind, String> {
    match kind.trim().to_ascii_lowercase().as_str() {
        "address" => Ok(ExplorerKind::Address),
        "tx" | "transaction" => Ok(ExplorerKind::Transaction),
        other => Err(format!("unknown explorer link kind '{}'", other)),
    }
}
