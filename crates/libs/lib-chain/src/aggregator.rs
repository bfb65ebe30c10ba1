//! # Chain Data Aggregator
//!
//! Turns provider, indexer and chain-info calls into the account view the
//! session stores: address, network, native balance, token balances and
//! recent history.
//!
//! Failure policy:
//!
//! - account, chain id or native balance failures fail the whole operation
//! - a failing token lookup drops that token only
//! - a failing history lookup yields [`placeholder_history`]
//! - a failing chain-info lookup leaves `market` empty

use crate::chain_info::ChainInfoClient;
use crate::config::DashboardConfig;
use crate::erc20::{self, TokenSpec};
use crate::error::{Error, Result};
use crate::history::{normalize_history, placeholder_history, TransactionIndexer, HISTORY_LIMIT};
use crate::network;
use crate::provider::WalletProvider;
use crate::units::{to_native_display, to_token_display};
use futures::future::join_all;
use rust_decimal::Decimal;
use shared::{Address, ChainInfo, TokenBalance, TransactionRecord, WalletSession};
use tracing::{debug, info, warn};

/// How accounts are obtained when connecting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountAccess {
    /// `eth_requestAccounts`; the wallet may prompt the holder.
    Prompt,
    /// `eth_accounts`; only already-authorized accounts, never a prompt.
    Silent,
}

/// Everything fetched for a freshly connected account.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountSnapshot {
    pub session: WalletSession,
    pub tokens: Vec<TokenBalance>,
    pub transactions: Vec<TransactionRecord>,
    pub market: Option<ChainInfo>,
}

/// Data re-fetched for an already connected account.
#[derive(Debug, Clone, PartialEq)]
pub struct RefreshData {
    pub native_balance: Decimal,
    pub tokens: Vec<TokenBalance>,
    pub transactions: Vec<TransactionRecord>,
    pub market: Option<ChainInfo>,
}

pub struct ChainAggregator<P> {
    provider: P,
    indexer: Box<dyn TransactionIndexer>,
    chain_info: Option<ChainInfoClient>,
    catalog: Vec<TokenSpec>,
}

impl<P: WalletProvider> ChainAggregator<P> {
    pub fn new(provider: P, indexer: impl TransactionIndexer + 'static) -> Self {
        Self {
            provider,
            indexer: Box::new(indexer),
            chain_info: None,
            catalog: erc20::default_catalog(),
        }
    }

    /// Aggregator wired to the indexer and chain-info service from `config`.
    pub fn from_config(provider: P, config: &DashboardConfig) -> Self {
        Self::new(provider, config.history_client()).with_chain_info(config.chain_info_client())
    }

    pub fn with_catalog(mut self, catalog: Vec<TokenSpec>) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn with_chain_info(mut self, client: Option<ChainInfoClient>) -> Self {
        self.chain_info = client;
        self
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn catalog(&self) -> &[TokenSpec] {
        &self.catalog
    }

    pub fn chain_info(&self) -> Option<&ChainInfoClient> {
        self.chain_info.as_ref()
    }

    /// Resolve the active account and load its full view.
    pub async fn connect(&self, access: AccountAccess) -> Result<AccountSnapshot> {
        let accounts = match access {
            AccountAccess::Prompt => self.provider.request_accounts().await?,
            AccountAccess::Silent => self.provider.accounts().await?,
        };
        let address = accounts.into_iter().next().ok_or_else(Error::no_accounts)?;

        let chain_id = self.provider.chain_id().await?;
        let native_balance = to_native_display(self.provider.get_balance(&address).await?);
        let network_name = network::name_for(chain_id);

        info!(
            address = %address,
            chain_id,
            network = %network_name,
            balance = %native_balance,
            "account resolved"
        );

        let (tokens, transactions, market) = futures::join!(
            self.token_balances(&address),
            self.transaction_history(&address, chain_id),
            self.market_info(),
        );

        Ok(AccountSnapshot {
            session: WalletSession::connected(address, native_balance, network_name, chain_id),
            tokens,
            transactions,
            market,
        })
    }

    /// Re-fetch balances and history for a connected account.
    pub async fn refresh(&self, address: &Address, chain_id: u64) -> Result<RefreshData> {
        let native_balance = to_native_display(self.provider.get_balance(address).await?);

        let (tokens, transactions, market) = futures::join!(
            self.token_balances(address),
            self.transaction_history(address, chain_id),
            self.market_info(),
        );

        debug!(address = %address, tokens = tokens.len(), transactions = transactions.len(), "account refreshed");

        Ok(RefreshData {
            native_balance,
            tokens,
            transactions,
            market,
        })
    }

    /// Balances above zero (at display precision) for every catalog token that answered.
    pub async fn token_balances(&self, owner: &Address) -> Vec<TokenBalance> {
        let lookups = self.catalog.iter().map(|token| self.token_balance(owner, token));
        let results = join_all(lookups).await;

        self.catalog
            .iter()
            .zip(results)
            .filter_map(|(token, result)| match result {
                Ok(balance) => balance,
                Err(err) => {
                    warn!(
                        symbol = %token.symbol,
                        contract = %token.address,
                        error = %err,
                        "token balance lookup failed; omitting token"
                    );
                    None
                }
            })
            .collect()
    }

    async fn token_balance(&self, owner: &Address, token: &TokenSpec) -> Result<Option<TokenBalance>> {
        let calldata = erc20::encode_balance_of(owner)?;
        let output = self.provider.call_contract(&token.address, &calldata).await?;
        let amount = to_token_display(erc20::decode_uint256(&output)?, token.decimals);

        // dust below display precision counts as no holding
        if amount.is_zero() {
            return Ok(None);
        }

        Ok(Some(TokenBalance {
            symbol: token.symbol.clone(),
            contract_address: token.address.clone(),
            decimals: token.decimals,
            amount,
        }))
    }

    /// Recent history, or the placeholder record when the indexer fails.
    pub async fn transaction_history(&self, address: &Address, chain_id: u64) -> Vec<TransactionRecord> {
        let fetched = match self.indexer.recent_transactions(address, chain_id, HISTORY_LIMIT).await {
            Ok(raw) => normalize_history(&raw, HISTORY_LIMIT),
            Err(err) => Err(err),
        };

        match fetched {
            Ok(records) => records,
            Err(err) => {
                warn!(
                    address = %address,
                    chain_id,
                    error = %err,
                    "transaction history unavailable; showing placeholder"
                );
                placeholder_history(address)
            }
        }
    }

    async fn market_info(&self) -> Option<ChainInfo> {
        let client = self.chain_info.as_ref()?;
        match client.info().await {
            Ok(info) => Some(info),
            Err(err) => {
                warn!(error = %err, "chain info unavailable");
                None
            }
        }
    }
}
