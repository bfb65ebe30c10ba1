//! # WalletDashboard
//!
//! The object the page constructs. Every session operation returns a
//! `Promise` resolving to the new snapshot (a plain object mirroring
//! `shared::SessionSnapshot`) or rejecting with an `Error` carrying the
//! user-facing message.
//!
//! ```text
//! const dashboard = new WalletDashboard({ historyApiKey: "..." });
//! dashboard.onChange(render);
//! await dashboard.restore();
//! ```
//!
//! Provider `accountsChanged` / `chainChanged` events are handled here and
//! reported through the `onChange` callback.

use crate::services::provider::{self, InjectedTransport};
use crate::state::options::{parse_explorer_kind, DashboardOptions};
use js_sys::{Function, Promise};
use lib_chain::{ChainAggregator, Eip1193Client, SessionController};
use serde::Serialize;
use shared::Address;
use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{future_to_promise, spawn_local};

type Session = SessionController<Eip1193Client<InjectedTransport>>;
type Listener = Rc<RefCell<Option<Function>>>;

#[wasm_bindgen]
pub struct WalletDashboard {
    session: Rc<Session>,
    listener: Listener,
}

#[wasm_bindgen]
impl WalletDashboard {
    /// Build the dashboard. `options` may be `undefined`.
    #[wasm_bindgen(constructor)]
    pub fn new(options: JsValue) -> Result<WalletDashboard, JsValue> {
        let options: DashboardOptions = if options.is_undefined() || options.is_null() {
            DashboardOptions::default()
        } else {
            serde_wasm_bindgen::from_value(options).map_err(|e| js_error(format!("invalid options: {}", e)))?
        };
        let config = options.into_config().map_err(js_error)?;

        let provider = Eip1193Client::new(InjectedTransport).with_timeouts(config.timeouts());
        let session = SessionController::new(ChainAggregator::from_config(provider, &config));

        let dashboard = Self {
            session: Rc::new(session),
            listener: Rc::default(),
        };
        dashboard.subscribe_provider_events();

        log::info!(
            "dashboard ready (history: {}, chain info: {})",
            config.history_api_url,
            config.chain_info_url.as_deref().unwrap_or("disabled")
        );
        Ok(dashboard)
    }

    #[wasm_bindgen(js_name = isProviderInstalled)]
    pub fn is_provider_installed() -> bool {
        provider::is_provider_installed()
    }

    pub fn snapshot(&self) -> Result<JsValue, JsValue> {
        to_js(&self.session.snapshot())
    }

    /// Register the callback invoked with each new snapshot.
    #[wasm_bindgen(js_name = onChange)]
    pub fn on_change(&self, callback: Function) {
        *self.listener.borrow_mut() = Some(callback);
    }

    /// Reconnect without prompting if the wallet already authorized this page.
    pub fn restore(&self) -> Promise {
        self.run(|session| async move { session.restore().await.map(|_| ()) })
    }

    pub fn connect(&self) -> Promise {
        self.run(|session| async move { session.connect().await })
    }

    pub fn refresh(&self) -> Promise {
        self.run(|session| async move { session.refresh().await })
    }

    pub fn disconnect(&self) {
        self.session.disconnect();
        notify(&self.session, &self.listener);
    }

    /// Explorer link for an address (`"address"`) or transaction (`"tx"`).
    #[wasm_bindgen(js_name = explorerUrl)]
    pub fn explorer_url(&self, kind: &str, value: &str) -> Result<String, JsValue> {
        let kind = parse_explorer_kind(kind).map_err(js_error)?;
        Ok(self.session.explorer_url(kind, value))
    }
}

impl WalletDashboard {
    fn run<F, Fut>(&self, operation: F) -> Promise
    where
        F: FnOnce(Rc<Session>) -> Fut,
        Fut: Future<Output = lib_chain::Result<()>> + 'static,
    {
        let session = self.session.clone();
        let listener = self.listener.clone();
        let pending = operation(session.clone());

        future_to_promise(async move {
            let result = pending.await;
            notify(&session, &listener);
            match result {
                Ok(()) => to_js(&session.snapshot()),
                Err(err) => {
                    log::warn!("wallet operation failed: {}", err);
                    Err(js_error(err.to_string()))
                }
            }
        })
    }

    fn subscribe_provider_events(&self) {
        let session = self.session.clone();
        let listener = self.listener.clone();
        let accounts_changed = Closure::<dyn FnMut(JsValue)>::new(move |value: JsValue| {
            let Some(accounts) = parse_accounts(value) else {
                log::warn!("ignoring accountsChanged event with unreadable payload");
                return;
            };
            let session = session.clone();
            let listener = listener.clone();
            spawn_local(async move {
                if let Err(err) = session.on_accounts_changed(accounts).await {
                    log::warn!("accountsChanged handling failed: {}", err);
                }
                notify(&session, &listener);
            });
        });

        let session = self.session.clone();
        let listener = self.listener.clone();
        let chain_changed = Closure::<dyn FnMut(JsValue)>::new(move |_chain_id: JsValue| {
            let session = session.clone();
            let listener = listener.clone();
            spawn_local(async move {
                if let Err(err) = session.on_chain_changed().await {
                    log::warn!("chainChanged handling failed: {}", err);
                }
                notify(&session, &listener);
            });
        });

        let accounts_registered = provider::subscribe("accountsChanged", accounts_changed);
        let chain_registered = provider::subscribe("chainChanged", chain_changed);
        if !(accounts_registered && chain_registered) {
            log::warn!("provider does not emit events; account and network switches need a manual refresh");
        }
    }
}

fn parse_accounts(value: JsValue) -> Option<Vec<Address>> {
    let raw: Vec<String> = serde_wasm_bindgen::from_value(value).ok()?;
    raw.iter().map(|text| Address::parse(text).ok()).collect()
}

fn notify(session: &Session, listener: &Listener) {
    let Some(callback) = listener.borrow().clone() else {
        return;
    };
    match to_js(&session.snapshot()) {
        Ok(snapshot) => {
            if let Err(err) = callback.call1(&JsValue::NULL, &snapshot) {
                log::warn!("onChange callback threw: {:?}", err);
            }
        }
        Err(err) => log::warn!("snapshot conversion failed: {:?}", err),
    }
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| js_error(e.to_string()))
}

fn js_error(message: impl AsRef<str>) -> JsValue {
    js_sys::Error::new(message.as_ref()).into()
}
