//! # Wallet Session
//!
//! [`SessionController`] owns the dashboard's single session and drives its
//! lifecycle:
//!
//! ```text
//! Disconnected --connect--> Connecting --ok--> Connected --disconnect--> Disconnected
//!                               |                  |
//!                               +--fail--> Error   +--refresh (stays Connected)
//! ```
//!
//! Only one connect or refresh runs at a time; a second one is refused with
//! [`Error::Busy`]. Provider events that land while one is running are
//! deferred: the running operation discards its result and reloads the
//! account silently once it finishes. `disconnect` is always accepted. Operations still in
//! flight when it happens finish with [`Error::Cancelled`] and leave the
//! state untouched.
//!
//! The state lock is never held across an `.await`.

use crate::aggregator::{AccountAccess, ChainAggregator};
use crate::error::{Error, Result};
use crate::network::{self, ExplorerKind};
use crate::provider::WalletProvider;
use parking_lot::RwLock;
use shared::{Address, ConnectionStatus, SessionSnapshot, WalletSession};
use tracing::{debug, info, warn};

#[derive(Debug, Default)]
struct SessionState {
    snapshot: SessionSnapshot,
    /// Bumped by every disconnect; results from older generations are dropped.
    generation: u64,
    /// A provider event arrived while busy; reload when the operation ends.
    reload_pending: bool,
}

impl SessionState {
    fn is_busy(&self) -> bool {
        self.snapshot.session.loading || self.snapshot.refreshing
    }

    /// Enter `Connecting`, keeping whatever is currently displayed.
    fn begin_connect(&mut self) -> u64 {
        self.snapshot.status = ConnectionStatus::Connecting;
        self.snapshot.session.loading = true;
        self.snapshot.session.error = None;
        self.generation
    }
}

/// Clears in-flight flags if an operation's future is dropped before it
/// records its outcome.
struct InFlight<'a> {
    state: &'a RwLock<SessionState>,
    generation: u64,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let mut state = self.state.write();
        if state.generation != self.generation || !state.is_busy() {
            return;
        }
        warn!("wallet operation abandoned before completion");
        state.reload_pending = false;
        if state.snapshot.status == ConnectionStatus::Connecting {
            state.snapshot = SessionSnapshot::default();
        } else {
            state.snapshot.session.loading = false;
            state.snapshot.refreshing = false;
        }
    }
}

pub struct SessionController<P> {
    aggregator: ChainAggregator<P>,
    state: RwLock<SessionState>,
}

impl<P: WalletProvider> SessionController<P> {
    pub fn new(aggregator: ChainAggregator<P>) -> Self {
        Self {
            aggregator,
            state: RwLock::new(SessionState::default()),
        }
    }

    pub fn aggregator(&self) -> &ChainAggregator<P> {
        &self.aggregator
    }

    /// Copy of the current state for rendering.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.state.read().snapshot.clone()
    }

    pub fn status(&self) -> ConnectionStatus {
        self.state.read().snapshot.status
    }

    /// Explorer link on the connected chain (Ethereum mainnet's explorer
    /// when no chain is known).
    pub fn explorer_url(&self, kind: ExplorerKind, value: &str) -> String {
        let chain_id = self.state.read().snapshot.session.chain_id.unwrap_or(1);
        network::explorer_url_for(chain_id, kind, value)
    }

    /// Reconnect silently when the provider already authorized an account.
    ///
    /// Returns `Ok(false)` without touching the state when there is nothing
    /// to restore or the provider cannot be queried.
    pub async fn restore(&self) -> Result<bool> {
        match self.aggregator.provider().accounts().await {
            Ok(accounts) if !accounts.is_empty() => {
                info!("previously authorized account found, restoring session");
                self.establish(AccountAccess::Silent).await.map(|_| true)
            }
            Ok(_) => {
                debug!("no previously authorized account");
                Ok(false)
            }
            Err(err) => {
                debug!(error = %err, "session restore skipped");
                Ok(false)
            }
        }
    }

    /// Request account access and load the account. A no-op when already
    /// connected.
    pub async fn connect(&self) -> Result<()> {
        if self.status().is_connected() {
            debug!("connect ignored, already connected");
            return Ok(());
        }
        self.establish(AccountAccess::Prompt).await
    }

    /// Re-fetch balances and history for the connected account.
    ///
    /// On failure the previous data stays visible, the status stays
    /// `Connected` and the message is stored in `session.error`.
    pub async fn refresh(&self) -> Result<()> {
        let (address, chain_id, generation) = {
            let mut state = self.state.write();
            if state.is_busy() {
                return Err(Error::Busy);
            }
            if !state.snapshot.status.is_connected() {
                return Err(Error::NotConnected);
            }
            let session = &state.snapshot.session;
            let (Some(address), Some(chain_id)) = (session.address.clone(), session.chain_id) else {
                return Err(Error::NotConnected);
            };
            state.snapshot.refreshing = true;
            (address, chain_id, state.generation)
        };
        let _in_flight = InFlight {
            state: &self.state,
            generation,
        };

        let result = self.aggregator.refresh(&address, chain_id).await;

        let mut state = self.state.write();
        if state.generation != generation {
            debug!("refresh result discarded after disconnect");
            return Err(Error::Cancelled);
        }
        state.snapshot.refreshing = false;

        if state.reload_pending {
            state.reload_pending = false;
            info!("provider changed during refresh, reloading account");
            let generation = state.begin_connect();
            drop(state);
            return self.load(AccountAccess::Silent, generation).await;
        }

        match result {
            Ok(data) => {
                let snapshot = &mut state.snapshot;
                snapshot.session.native_balance = Some(data.native_balance);
                snapshot.session.error = None;
                snapshot.tokens = data.tokens;
                snapshot.transactions = data.transactions;
                snapshot.market = data.market;
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "refresh failed");
                state.snapshot.session.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Forget the session. Always accepted, even mid-operation.
    pub fn disconnect(&self) {
        let mut state = self.state.write();
        state.generation = state.generation.wrapping_add(1);
        state.reload_pending = false;
        state.snapshot = SessionSnapshot::default();
        info!("wallet disconnected");
    }

    /// Provider `accountsChanged` event.
    pub async fn on_accounts_changed(&self, accounts: Vec<Address>) -> Result<()> {
        let Some(first) = accounts.into_iter().next() else {
            if self.status() != ConnectionStatus::Disconnected {
                info!("wallet revoked all accounts");
                self.disconnect();
            }
            return Ok(());
        };

        {
            let state = self.state.read();
            if !state.is_busy() && state.snapshot.session.address.as_ref() == Some(&first) {
                return Ok(());
            }
        }

        info!(address = %first, "active account changed");
        self.reload().await
    }

    /// Provider `chainChanged` event.
    pub async fn on_chain_changed(&self) -> Result<()> {
        info!("network changed");
        self.reload().await
    }

    /// Silent reconnect after a provider event. Deferred to the end of the
    /// running operation when busy; ignored unless a session exists.
    async fn reload(&self) -> Result<()> {
        let generation = {
            let mut state = self.state.write();
            if state.is_busy() {
                debug!("wallet operation in flight, reload deferred");
                state.reload_pending = true;
                return Ok(());
            }
            if !state.snapshot.status.is_connected() {
                return Ok(());
            }
            state.begin_connect()
        };
        self.load(AccountAccess::Silent, generation).await
    }

    async fn establish(&self, access: AccountAccess) -> Result<()> {
        let generation = {
            let mut state = self.state.write();
            if state.is_busy() {
                return Err(Error::Busy);
            }
            state.begin_connect()
        };
        self.load(access, generation).await
    }

    /// Run the account load started by `begin_connect` and record the
    /// outcome. Repeats silently while provider events keep arriving.
    async fn load(&self, mut access: AccountAccess, generation: u64) -> Result<()> {
        let _in_flight = InFlight {
            state: &self.state,
            generation,
        };

        loop {
            info!(?access, "connecting wallet");
            let result = self.aggregator.connect(access).await;

            let mut state = self.state.write();
            if state.generation != generation {
                debug!("connect result discarded after disconnect");
                return Err(Error::Cancelled);
            }
            if state.reload_pending {
                state.reload_pending = false;
                debug!("provider changed during connect, loading again");
                access = AccountAccess::Silent;
                continue;
            }

            return match result {
                Ok(account) => {
                    state.snapshot = SessionSnapshot {
                        status: ConnectionStatus::Connected,
                        session: account.session,
                        tokens: account.tokens,
                        transactions: account.transactions,
                        refreshing: false,
                        market: account.market,
                    };
                    Ok(())
                }
                Err(err) => {
                    warn!(error = %err, "wallet connection failed");
                    state.snapshot = SessionSnapshot {
                        status: ConnectionStatus::Error,
                        session: WalletSession::failed(err.to_string()),
                        ..SessionSnapshot::default()
                    };
                    Err(err)
                }
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::tests::{raw_tx, FakeIndexer, FakeProvider, OTHER, OWNER};
    use crate::erc20;
    use crate::history::RawTransaction;
    use async_trait::async_trait;
    use futures::FutureExt;
    use std::cell::Cell;
    use std::rc::Rc;

    fn controller(provider: FakeProvider) -> SessionController<FakeProvider> {
        controller_with_history(provider, Ok(vec![raw_tx("0x01", 7)]))
    }

    fn controller_with_history(
        provider: FakeProvider,
        history: Result<Vec<RawTransaction>>,
    ) -> SessionController<FakeProvider> {
        SessionController::new(ChainAggregator::new(provider, FakeIndexer(history)))
    }

    #[tokio::test]
    async fn test_connect_success() {
        let usdc = erc20::default_catalog()[1].address.to_string();
        let session = controller(FakeProvider::new().with_token(&usdc, Ok(12_500_000)));

        session.connect().await.unwrap();

        let snapshot = session.snapshot();
        assert_eq!(snapshot.status, ConnectionStatus::Connected);
        assert!(snapshot.session.connected);
        assert!(!snapshot.session.loading);
        assert_eq!(snapshot.session.native_balance.unwrap().to_string(), "1.000000");
        assert_eq!(snapshot.tokens.len(), 1);
        assert_eq!(snapshot.transactions.len(), 1);
        assert!(!snapshot.history_degraded());
    }

    #[tokio::test]
    async fn test_connect_rejected() {
        let provider = FakeProvider::new();
        *provider.accounts.lock() = Err(Error::from_rpc(4001, "User rejected the request."));
        let session = controller(provider);

        let err = session.connect().await.unwrap_err();
        assert!(matches!(err, Error::UserRejected(_)));

        let snapshot = session.snapshot();
        assert_eq!(snapshot.status, ConnectionStatus::Error);
        assert!(!snapshot.session.connected);
        assert!(snapshot.session.address.is_none());
        assert!(snapshot.session.native_balance.is_none());
        assert!(!snapshot.session.loading);
        assert_eq!(snapshot.session.error.as_deref(), Some("User rejected the request."));
        assert!(snapshot.tokens.is_empty());
    }

    #[tokio::test]
    async fn test_zero_accounts_is_an_error() {
        let provider = FakeProvider::new();
        *provider.accounts.lock() = Ok(Vec::new());
        let session = controller(provider);

        assert!(session.connect().await.is_err());
        let snapshot = session.snapshot();
        assert_eq!(snapshot.status, ConnectionStatus::Error);
        assert_eq!(snapshot.session.error.as_deref(), Some("No accounts found"));
    }

    #[tokio::test]
    async fn test_history_outage_shows_placeholder() {
        let session = controller_with_history(
            FakeProvider::new(),
            Err(Error::NetworkUnreachable("indexer down".to_string())),
        );
        session.connect().await.unwrap();

        let snapshot = session.snapshot();
        assert_eq!(snapshot.status, ConnectionStatus::Connected);
        assert_eq!(snapshot.transactions.len(), 1);
        assert!(snapshot.history_degraded());
    }

    #[tokio::test]
    async fn test_disconnect_resets_everything() {
        let session = controller(FakeProvider::new());
        session.connect().await.unwrap();

        session.disconnect();
        assert_eq!(session.snapshot(), SessionSnapshot::default());
    }

    #[tokio::test]
    async fn test_connect_while_connected_is_noop() {
        let session = controller(FakeProvider::new());
        session.connect().await.unwrap();
        *session.aggregator().provider().balance.lock() = Ok(5);

        session.connect().await.unwrap();
        assert_eq!(
            session.snapshot().session.native_balance.unwrap().to_string(),
            "1.000000"
        );
    }

    #[tokio::test]
    async fn test_refresh_requires_connection() {
        let session = controller(FakeProvider::new());
        assert_eq!(session.refresh().await.unwrap_err(), Error::NotConnected);
    }

    #[tokio::test]
    async fn test_refresh_updates_balance() {
        let session = controller(FakeProvider::new());
        session.connect().await.unwrap();
        *session.aggregator().provider().balance.lock() = Ok(3_000_000_000_000_000_000);

        session.refresh().await.unwrap();
        let snapshot = session.snapshot();
        assert_eq!(snapshot.session.native_balance.unwrap().to_string(), "3.000000");
        assert!(!snapshot.refreshing);
    }

    #[tokio::test]
    async fn test_refresh_failure_keeps_previous_data() {
        let session = controller(FakeProvider::new());
        session.connect().await.unwrap();
        *session.aggregator().provider().balance.lock() =
            Err(Error::NetworkUnreachable("connection reset".to_string()));

        assert!(session.refresh().await.is_err());

        let snapshot = session.snapshot();
        assert_eq!(snapshot.status, ConnectionStatus::Connected);
        assert!(!snapshot.refreshing);
        assert_eq!(snapshot.session.native_balance.unwrap().to_string(), "1.000000");
        assert_eq!(snapshot.transactions.len(), 1);
        assert!(snapshot.session.error.unwrap().contains("connection reset"));
    }

    #[tokio::test]
    async fn test_restore_without_authorization() {
        let provider = FakeProvider::new();
        *provider.accounts.lock() = Ok(Vec::new());
        let session = controller(provider);

        assert!(!session.restore().await.unwrap());
        assert_eq!(session.status(), ConnectionStatus::Disconnected);
    }

    #[tokio::test]
    async fn test_restore_reconnects_silently() {
        let session = controller(FakeProvider::new());
        assert!(session.restore().await.unwrap());
        assert_eq!(session.status(), ConnectionStatus::Connected);
    }

    #[tokio::test]
    async fn test_accounts_changed_empty_disconnects() {
        let session = controller(FakeProvider::new());
        session.connect().await.unwrap();

        session.on_accounts_changed(Vec::new()).await.unwrap();
        assert_eq!(session.snapshot(), SessionSnapshot::default());
    }

    #[tokio::test]
    async fn test_accounts_changed_switches_account() {
        let session = controller(FakeProvider::new());
        session.connect().await.unwrap();

        let other = Address::parse(OTHER).unwrap();
        *session.aggregator().provider().accounts.lock() = Ok(vec![other.clone()]);
        session.on_accounts_changed(vec![other.clone()]).await.unwrap();

        assert_eq!(session.snapshot().session.address, Some(other));
    }

    #[tokio::test]
    async fn test_accounts_changed_same_account_is_ignored() {
        let session = controller(FakeProvider::new());
        session.connect().await.unwrap();
        *session.aggregator().provider().balance.lock() = Ok(0);

        let same = Address::parse(&OWNER.to_lowercase()).unwrap();
        session.on_accounts_changed(vec![same]).await.unwrap();
        assert_eq!(
            session.snapshot().session.native_balance.unwrap().to_string(),
            "1.000000"
        );
    }

    #[tokio::test]
    async fn test_chain_changed_reloads() {
        let session = controller(FakeProvider::new());
        session.connect().await.unwrap();
        *session.aggregator().provider().chain_id.lock() = 137;

        session.on_chain_changed().await.unwrap();
        let snapshot = session.snapshot();
        assert_eq!(snapshot.session.chain_id, Some(137));
        assert_eq!(snapshot.session.network_name.as_deref(), Some("Polygon Mainnet"));
        assert_eq!(
            session.explorer_url(ExplorerKind::Address, OWNER),
            format!("https://polygonscan.com/address/{}", OWNER)
        );
    }

    #[tokio::test]
    async fn test_chain_changed_while_disconnected_is_ignored() {
        let session = controller(FakeProvider::new());
        session.on_chain_changed().await.unwrap();
        assert_eq!(session.status(), ConnectionStatus::Disconnected);
    }

    /// Provider whose account request and balance query wait until the test
    /// releases them.
    struct GatedProvider {
        inner: FakeProvider,
        open: Rc<Cell<bool>>,
        balance_open: Rc<Cell<bool>>,
    }

    async fn wait_for(gate: &Cell<bool>) {
        while !gate.get() {
            tokio::task::yield_now().await;
        }
    }

    #[async_trait(?Send)]
    impl WalletProvider for GatedProvider {
        async fn request_accounts(&self) -> Result<Vec<Address>> {
            wait_for(&self.open).await;
            self.inner.request_accounts().await
        }

        async fn accounts(&self) -> Result<Vec<Address>> {
            self.inner.accounts().await
        }

        async fn chain_id(&self) -> Result<u64> {
            self.inner.chain_id().await
        }

        async fn get_balance(&self, address: &Address) -> Result<u128> {
            wait_for(&self.balance_open).await;
            self.inner.get_balance(address).await
        }

        async fn call_contract(&self, to: &Address, data: &[u8]) -> Result<Vec<u8>> {
            self.inner.call_contract(to, data).await
        }
    }

    fn gated() -> (SessionController<GatedProvider>, Rc<Cell<bool>>) {
        let open = Rc::new(Cell::new(false));
        let provider = GatedProvider {
            inner: FakeProvider::new(),
            open: open.clone(),
            balance_open: Rc::new(Cell::new(true)),
        };
        let session = SessionController::new(ChainAggregator::new(provider, FakeIndexer(Ok(Vec::new()))));
        (session, open)
    }

    #[tokio::test]
    async fn test_second_connect_is_busy() {
        let (session, open) = gated();

        let mut first = Box::pin(session.connect());
        assert!((&mut first).now_or_never().is_none());
        assert_eq!(session.status(), ConnectionStatus::Connecting);
        assert!(session.snapshot().session.loading);

        assert_eq!(session.connect().await.unwrap_err(), Error::Busy);

        open.set(true);
        first.await.unwrap();
        assert_eq!(session.status(), ConnectionStatus::Connected);
    }

    #[tokio::test]
    async fn test_disconnect_during_connect_discards_result() {
        let (session, open) = gated();

        let mut pending = Box::pin(session.connect());
        assert!((&mut pending).now_or_never().is_none());

        session.disconnect();
        assert_eq!(session.snapshot(), SessionSnapshot::default());

        open.set(true);
        assert_eq!(pending.await.unwrap_err(), Error::Cancelled);
        assert_eq!(session.snapshot(), SessionSnapshot::default());
    }

    #[tokio::test]
    async fn test_abandoned_connect_clears_loading() {
        let (session, _open) = gated();

        let mut pending = Box::pin(session.connect());
        assert!((&mut pending).now_or_never().is_none());
        drop(pending);

        let snapshot = session.snapshot();
        assert_eq!(snapshot.status, ConnectionStatus::Disconnected);
        assert!(!snapshot.session.loading);
    }

    /// Connected session whose next balance query blocks until released.
    async fn connected_with_held_balance() -> (SessionController<GatedProvider>, Rc<Cell<bool>>) {
        let balance_open = Rc::new(Cell::new(true));
        let provider = GatedProvider {
            inner: FakeProvider::new(),
            open: Rc::new(Cell::new(true)),
            balance_open: balance_open.clone(),
        };
        let session = SessionController::new(ChainAggregator::new(provider, FakeIndexer(Ok(Vec::new()))));
        session.connect().await.unwrap();
        balance_open.set(false);
        (session, balance_open)
    }

    #[tokio::test]
    async fn test_chain_change_during_refresh_reloads_afterwards() {
        let (session, balance_open) = connected_with_held_balance().await;

        let mut refresh = Box::pin(session.refresh());
        assert!((&mut refresh).now_or_never().is_none());
        assert!(session.snapshot().refreshing);

        let wallet = &session.aggregator().provider().inner;
        *wallet.chain_id.lock() = 137;
        *wallet.balance.lock() = Ok(7_000_000_000_000_000_000);
        session.on_chain_changed().await.unwrap();

        balance_open.set(true);
        refresh.await.unwrap();

        let snapshot = session.snapshot();
        assert_eq!(snapshot.status, ConnectionStatus::Connected);
        assert_eq!(snapshot.session.chain_id, Some(137));
        assert_eq!(snapshot.session.network_name.as_deref(), Some("Polygon Mainnet"));
        assert_eq!(snapshot.session.native_balance.unwrap().to_string(), "7.000000");
        assert!(!snapshot.refreshing);
        assert!(!snapshot.session.loading);
    }

    #[tokio::test]
    async fn test_account_change_during_refresh_reloads_afterwards() {
        let (session, balance_open) = connected_with_held_balance().await;

        let mut refresh = Box::pin(session.refresh());
        assert!((&mut refresh).now_or_never().is_none());

        let other = Address::parse(OTHER).unwrap();
        *session.aggregator().provider().inner.accounts.lock() = Ok(vec![other.clone()]);
        session.on_accounts_changed(vec![other.clone()]).await.unwrap();

        balance_open.set(true);
        refresh.await.unwrap();

        let snapshot = session.snapshot();
        assert_eq!(snapshot.status, ConnectionStatus::Connected);
        assert_eq!(snapshot.session.address, Some(other));
    }

    #[tokio::test]
    async fn test_disconnect_during_refresh_drops_deferred_reload() {
        let (session, balance_open) = connected_with_held_balance().await;

        let mut refresh = Box::pin(session.refresh());
        assert!((&mut refresh).now_or_never().is_none());
        session.on_chain_changed().await.unwrap();
        session.disconnect();

        balance_open.set(true);
        assert_eq!(refresh.await.unwrap_err(), Error::Cancelled);
        assert_eq!(session.snapshot(), SessionSnapshot::default());
    }

    #[tokio::test]
    async fn test_disconnect_from_error_state_resets() {
        let provider = FakeProvider::new();
        *provider.accounts.lock() = Err(Error::from_rpc(4001, "User rejected the request."));
        let session = controller(provider);
        assert!(session.connect().await.is_err());
        assert_eq!(session.status(), ConnectionStatus::Error);

        session.disconnect();
        assert_eq!(session.snapshot(), SessionSnapshot::default());
    }
}
