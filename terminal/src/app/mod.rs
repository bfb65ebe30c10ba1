//! # Terminal Application
//!
//! Executes parsed [`Command`]s against the wallet session and returns the
//! text to print. Chain failures are reported inline; the loop keeps going.

pub mod commands;

use crate::ui::dashboard::{render_account_balance, render_market, render_snapshot};
use commands::{explorer_target, Command, HELP};
use lib_chain::{ChainAggregator, DashboardConfig, Eip1193Client, HttpTransport, SessionController, WalletProvider};
use tracing::{info, warn};

/// What the loop should do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flow {
    Continue(String),
    Quit,
}

pub struct App<P> {
    session: SessionController<P>,
    /// Launch the system browser for `open`.
    launch_browser: bool,
}

impl App<Eip1193Client<HttpTransport>> {
    /// App talking to the configured JSON-RPC endpoint.
    pub fn from_config(config: &DashboardConfig) -> Self {
        let transport = HttpTransport::new(config.rpc_url.clone()).with_watch_address(config.watch_address.clone());
        let provider = Eip1193Client::new(transport).with_timeouts(config.timeouts());
        Self::new(SessionController::new(ChainAggregator::from_config(provider, config)))
    }
}

impl<P: WalletProvider> App<P> {
    pub fn new(session: SessionController<P>) -> Self {
        Self {
            session,
            launch_browser: true,
        }
    }

    pub fn with_browser(mut self, launch_browser: bool) -> Self {
        self.launch_browser = launch_browser;
        self
    }

    pub fn session(&self) -> &SessionController<P> {
        &self.session
    }

    /// Startup probe: reconnect if the endpoint already exposes an account.
    pub async fn restore(&self) -> String {
        match self.session.restore().await {
            Ok(true) => render_snapshot(&self.session.snapshot()),
            Ok(false) => "No authorized account found. Type `connect` to request one.".to_string(),
            Err(err) => format!("Could not restore the previous session: {}", err),
        }
    }

    pub async fn execute(&self, command: Command) -> Flow {
        let output = match command {
            Command::Connect => match self.session.connect().await {
                Ok(()) => render_snapshot(&self.session.snapshot()),
                Err(err) => format!("Connection failed: {}", err),
            },
            Command::Refresh => match self.session.refresh().await {
                Ok(()) => render_snapshot(&self.session.snapshot()),
                Err(err) => format!("Refresh failed: {}", err),
            },
            Command::Disconnect => {
                self.session.disconnect();
                "Disconnected.".to_string()
            }
            Command::Status => render_snapshot(&self.session.snapshot()),
            Command::Market => self.market().await,
            Command::Lookup(address) => self.lookup(&address).await,
            Command::Open(target) => self.open(&target),
            Command::Help => HELP.to_string(),
            Command::Quit => return Flow::Quit,
            Command::Unknown(input) => format!("Unknown command `{}`. Type `help` for the list.", input),
        };
        Flow::Continue(output)
    }

    async fn market(&self) -> String {
        let Some(client) = self.session.aggregator().chain_info() else {
            return "Chain-info service not configured (set CHAIN_INFO_URL).".to_string();
        };
        match client.info().await {
            Ok(info) => render_market(&info),
            Err(err) => format!("Market data unavailable: {}", err),
        }
    }

    async fn lookup(&self, address: &str) -> String {
        let Some(client) = self.session.aggregator().chain_info() else {
            return "Chain-info service not configured (set CHAIN_INFO_URL).".to_string();
        };
        match client.account_balance(address).await {
            Ok(balance) => render_account_balance(&balance),
            Err(err) => format!("Lookup failed: {}", err),
        }
    }

    fn open(&self, target: &str) -> String {
        let kind = match explorer_target(target) {
            Ok(kind) => kind,
            Err(message) => return message,
        };
        let url = self.session.explorer_url(kind, target.trim());
        if !self.launch_browser {
            return url;
        }
        match open::that_detached(&url) {
            Ok(()) => {
                info!(url = %url, "opened explorer link");
                format!("Opened {}", url)
            }
            Err(err) => {
                warn!(url = %url, error = %err, "could not launch browser");
                format!("Open this link manually: {}", url)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use lib_chain::history::{RawTransaction, TransactionIndexer};
    use lib_chain::Result;
    use parking_lot::Mutex;
    use shared::{Address, ConnectionStatus};

    const OWNER: &str = "0xDEAD00000000000000000000000000000000BEEF";

    struct StubProvider {
        accounts: Mutex<Vec<Address>>,
    }

    #[async_trait(?Send)]
    impl WalletProvider for StubProvider {
        async fn request_accounts(&self) -> Result<Vec<Address>> {
            Ok(self.accounts.lock().clone())
        }

        async fn accounts(&self) -> Result<Vec<Address>> {
            Ok(self.accounts.lock().clone())
        }

        async fn chain_id(&self) -> Result<u64> {
            Ok(8453)
        }

        async fn get_balance(&self, _address: &Address) -> Result<u128> {
            Ok(1_000_000_000_000_000_000)
        }

        async fn call_contract(&self, _to: &Address, _data: &[u8]) -> Result<Vec<u8>> {
            Ok(vec![0u8; 32])
        }
    }

    struct OfflineIndexer;

    #[async_trait(?Send)]
    impl TransactionIndexer for OfflineIndexer {
        async fn recent_transactions(&self, _address: &Address, _chain_id: u64, _limit: usize) -> Result<Vec<RawTransaction>> {
            Err(lib_chain::Error::NetworkUnreachable("offline".to_string()))
        }
    }

    fn app(accounts: Vec<Address>) -> App<StubProvider> {
        let provider = StubProvider {
            accounts: Mutex::new(accounts),
        };
        App::new(SessionController::new(ChainAggregator::new(provider, OfflineIndexer))).with_browser(false)
    }

    fn owner() -> Address {
        Address::parse(OWNER).unwrap()
    }

    fn text(flow: Flow) -> String {
        match flow {
            Flow::Continue(text) => text,
            Flow::Quit => panic!("unexpected quit"),
        }
    }

    #[tokio::test]
    async fn test_connect_renders_dashboard() {
        let app = app(vec![owner()]);
        let output = text(app.execute(Command::Connect).await);
        assert!(output.contains("Status:   connected"));
        assert!(output.contains("Base (chain 8453)"));
        assert!(output.contains("1.000000 ETH"));
        assert!(output.contains("placeholder"));
    }

    #[tokio::test]
    async fn test_connect_without_accounts() {
        let app = app(Vec::new());
        let output = text(app.execute(Command::Connect).await);
        assert_eq!(output, "Connection failed: No accounts found");
        assert_eq!(app.session().status(), ConnectionStatus::Error);
    }

    #[tokio::test]
    async fn test_refresh_before_connect() {
        let app = app(vec![owner()]);
        let output = text(app.execute(Command::Refresh).await);
        assert_eq!(output, "Refresh failed: Wallet is not connected");
    }

    #[tokio::test]
    async fn test_disconnect_then_status() {
        let app = app(vec![owner()]);
        app.execute(Command::Connect).await;
        assert_eq!(text(app.execute(Command::Disconnect).await), "Disconnected.");
        assert!(text(app.execute(Command::Status).await).starts_with("Status:   disconnected"));
    }

    #[tokio::test]
    async fn test_restore_probe() {
        assert!(app(vec![owner()]).restore().await.contains("Status:   connected"));
        assert!(app(Vec::new()).restore().await.starts_with("No authorized account"));
    }

    #[tokio::test]
    async fn test_open_uses_connected_chain_explorer() {
        let app = app(vec![owner()]);
        app.execute(Command::Connect).await;
        let output = text(app.execute(Command::Open(OWNER.to_string())).await);
        assert_eq!(output, format!("https://basescan.org/address/{}", OWNER));
    }

    #[tokio::test]
    async fn test_market_without_service() {
        let output = text(app(vec![owner()]).execute(Command::Market).await);
        assert!(output.contains("CHAIN_INFO_URL"));
    }

    #[tokio::test]
    async fn test_quit() {
        assert_eq!(app(Vec::new()).execute(Command::Quit).await, Flow::Quit);
    }
}
