//! Injected EIP-1193 provider (`window.ethereum`) via wasm-bindgen.

use async_trait::async_trait;
use lib_chain::{Eip1193Transport, Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

/// JSON-RPC "internal error", used when the provider throws something that
/// is not an EIP-1193 error object.
const CODE_INTERNAL: i64 = -32603;

#[wasm_bindgen(inline_js = "
export async function providerRequest(method, params) {
    return await window.ethereum.request({ method: method, params: params });
}

export function onProviderEvent(event, handler) {
    const provider = window.ethereum;
    if (provider && typeof provider.on === 'function') {
        provider.on(event, handler);
        return true;
    }
    return false;
}
")]
extern "C" {
    /// Forward a request to `window.ethereum.request`
    #[wasm_bindgen(catch)]
    async fn providerRequest(method: &str, params: JsValue) -> std::result::Result<JsValue, JsValue>;

    /// Register a provider event listener
    fn onProviderEvent(event: &str, handler: &Closure<dyn FnMut(JsValue)>) -> bool;
}

/// Whether the page has an injected provider.
pub fn is_provider_installed() -> bool {
    web_sys::window()
        .and_then(|window| js_sys::Reflect::get(&window, &JsValue::from_str("ethereum")).ok())
        .map(|provider| !provider.is_undefined() && !provider.is_null())
        .unwrap_or(false)
}

/// Subscribe `handler` to a provider event. The closure is leaked so it
/// lives as long as the page.
pub fn subscribe(event: &str, handler: Closure<dyn FnMut(JsValue)>) -> bool {
    let registered = onProviderEvent(event, &handler);
    handler.forget();
    registered
}

/// Error object thrown by EIP-1193 providers.
#[derive(Debug, Deserialize)]
pub struct ProviderRpcError {
    pub code: i64,
    #[serde(default)]
    pub message: String,
}

impl From<ProviderRpcError> for Error {
    fn from(err: ProviderRpcError) -> Self {
        Error::from_rpc(err.code, err.message)
    }
}

/// Map a thrown JS value onto the error taxonomy.
fn provider_error(value: JsValue) -> Error {
    if let Ok(err) = serde_wasm_bindgen::from_value::<ProviderRpcError>(value.clone()) {
        return err.into();
    }
    let message = value
        .dyn_ref::<js_sys::Error>()
        .map(|e| String::from(e.message()))
        .or_else(|| value.as_string())
        .unwrap_or_else(|| "provider request failed".to_string());
    Error::Rpc {
        code: CODE_INTERNAL,
        message,
    }
}

/// [`Eip1193Transport`] backed by `window.ethereum`.
#[derive(Debug, Default, Clone, Copy)]
pub struct InjectedTransport;

#[async_trait(?Send)]
impl Eip1193Transport for InjectedTransport {
    async fn request(&self, method: &str, params: Value) -> Result<Value> {
        if !is_provider_installed() {
            return Err(Error::ProviderUnavailable);
        }

        let params = params
            .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
            .map_err(|e| Error::malformed(format!("cannot encode params: {}", e)))?;

        let result = providerRequest(method, params).await.map_err(provider_error)?;

        serde_wasm_bindgen::from_value(result)
            .map_err(|e| Error::malformed(format!("{} returned an unreadable value: {}", method, e)))
    }
}
