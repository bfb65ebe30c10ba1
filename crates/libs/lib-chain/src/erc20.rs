//! # ERC-20 Balance Lookups
//!
//! Token catalog plus the minimal ABI work needed for `balanceOf(address)`:
//! calldata encoding and decoding of the single `uint256` return word.

use crate::error::{Error, Result};
use shared::Address;

/// `keccak256("balanceOf(address)")[..4]`
pub const BALANCE_OF_SELECTOR: [u8; 4] = [0x70, 0xa0, 0x82, 0x31];

const WORD_LEN: usize = 32;

/// A token the dashboard queries for every connected account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSpec {
    pub symbol: String,
    pub decimals: u8,
    pub address: Address,
}

impl TokenSpec {
    pub fn new(symbol: impl Into<String>, decimals: u8, address: &str) -> Result<Self> {
        Ok(Self {
            symbol: symbol.into(),
            decimals,
            address: Address::parse(address)?,
        })
    }
}

const DEFAULT_TOKENS: &[(&str, u8, &str)] = &[
    ("USDT", 6, "0xdAC17F958D2ee523a2206206994597C13D831ec7"),
    ("USDC", 6, "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48"),
    ("DAI", 18, "0x6B175474E89094C44Da98b954EedeAC495271d0F"),
];

/// USDT, USDC and DAI at their Ethereum mainnet addresses.
pub fn default_catalog() -> Vec<TokenSpec> {
    DEFAULT_TOKENS
        .iter()
        .filter_map(|(symbol, decimals, address)| TokenSpec::new(*symbol, *decimals, address).ok())
        .collect()
}

/// `balanceOf(owner)` calldata: selector followed by the owner left-padded to 32 bytes.
pub fn encode_balance_of(owner: &Address) -> Result<Vec<u8>> {
    let owner_bytes = hex::decode(owner.hex_body()).map_err(|e| Error::InvalidAddress(e.to_string()))?;

    let mut data = Vec::with_capacity(BALANCE_OF_SELECTOR.len() + WORD_LEN);
    data.extend_from_slice(&BALANCE_OF_SELECTOR);
    data.resize(BALANCE_OF_SELECTOR.len() + WORD_LEN - owner_bytes.len(), 0);
    data.extend_from_slice(&owner_bytes);
    Ok(data)
}

/// Decode the leading `uint256` word of a call result.
///
/// Empty output (a call to an address with no code) and values above
/// `u128::MAX` are rejected as malformed.
pub fn decode_uint256(data: &[u8]) -> Result<u128> {
    if data.is_empty() {
        return Err(Error::malformed("empty return data"));
    }
    if data.len() < WORD_LEN {
        return Err(Error::malformed(format!(
            "return data is {} bytes, expected {}",
            data.len(),
            WORD_LEN
        )));
    }

    let (high, low) = data[..WORD_LEN].split_at(WORD_LEN - 16);
    if high.iter().any(|b| *b != 0) {
        return Err(Error::malformed("uint256 value exceeds 128 bits"));
    }

    let mut buf = [0u8; 16];
    buf.copy_from_slice(low);
    Ok(u128::from_be_bytes(buf))
}
