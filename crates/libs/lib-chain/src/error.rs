//! # Chain Errors
//!
//! One error type for every wallet, RPC and HTTP failure the dashboard can
//! surface. The `Display` text of each variant is what front ends show in
//! `WalletSession::error`.
//!
//! ## Error Categories
//!
//! - **ProviderUnavailable**: no injected wallet, or the wallet reports it is disconnected
//! - **UserRejected**: the holder declined a prompt, or no account was returned
//! - **InvalidAddress**: an address failed validation locally or at a remote service
//! - **NetworkUnreachable**: transport failures and non-success HTTP statuses
//! - **MalformedResponse**: a payload arrived but could not be interpreted
//!
//! The remaining variants cover provider error objects with unmapped codes,
//! deadlines, and session-level refusals (`Busy`, `NotConnected`, `Cancelled`).

use shared::AddressError;
use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// EIP-1193: the holder rejected the request.
pub const CODE_USER_REJECTED: i64 = 4001;
/// EIP-1193: the method or account has not been authorized.
pub const CODE_UNAUTHORIZED: i64 = 4100;
/// EIP-1193: the provider is disconnected from all chains.
pub const CODE_DISCONNECTED: i64 = 4900;
/// EIP-1193: the provider is not connected to the requested chain.
pub const CODE_CHAIN_DISCONNECTED: i64 = 4901;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("No wallet provider detected. Install a browser wallet extension and reload.")]
    ProviderUnavailable,

    #[error("{0}")]
    UserRejected(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Provider error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("{operation} timed out after {seconds}s")]
    Timeout { operation: &'static str, seconds: u64 },

    #[error("Another wallet operation is already in progress")]
    Busy,

    #[error("Wallet is not connected")]
    NotConnected,

    #[error("Operation superseded by disconnect")]
    Cancelled,
}

impl Error {
    /// Map a provider error object (`{ code, message }`) onto the taxonomy.
    pub fn from_rpc(code: i64, message: impl Into<String>) -> Self {
        let message = message.into();
        match code {
            CODE_USER_REJECTED | CODE_UNAUTHORIZED => Error::UserRejected(message),
            CODE_DISCONNECTED | CODE_CHAIN_DISCONNECTED => Error::ProviderUnavailable,
            _ => Error::Rpc { code, message },
        }
    }

    /// The account request succeeded but returned an empty list.
    pub fn no_accounts() -> Self {
        Error::UserRejected("No accounts found".to_string())
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Error::MalformedResponse(message.into())
    }
}

impl From<AddressError> for Error {
    fn from(err: AddressError) -> Self {
        Error::InvalidAddress(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::MalformedResponse(err.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Error::MalformedResponse(err.to_string())
        } else {
            Error::NetworkUnreachable(err.to_string())
        }
    }
}
