//! Validated EVM address.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A 20-byte account or contract address in `0x`-prefixed hex form.
///
/// The original casing is preserved for display (checksummed addresses stay
/// checksummed), while comparisons ignore case.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(String);

impl Address {
    /// Length of the textual form, `0x` included.
    pub const TEXT_LEN: usize = 42;

    /// Parse and validate an address string.
    pub fn parse(value: &str) -> Result<Self, AddressError> {
        let trimmed = value.trim();
        let body = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .ok_or_else(|| AddressError::MissingPrefix(trimmed.to_string()))?;

        if body.len() != Self::TEXT_LEN - 2 {
            return Err(AddressError::WrongLength(trimmed.to_string()));
        }
        if !body.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(AddressError::NotHex(trimmed.to_string()));
        }

        Ok(Self(format!("0x{}", body)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The 40 lowercase hex characters without the `0x` prefix.
    pub fn hex_body(&self) -> String {
        self.0[2..].to_ascii_lowercase()
    }
}

impl PartialEq for Address {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl Eq for Address {}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Address {
    type Error = AddressError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.0
    }
}

// region:    --- Error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    MissingPrefix(String),
    WrongLength(String),
    NotHex(String),
}

impl fmt::Display for AddressError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressError::MissingPrefix(value) => write!(f, "address '{}' must start with 0x", value),
            AddressError::WrongLength(value) => write!(f, "address '{}' must have 40 hex digits", value),
            AddressError::NotHex(value) => write!(f, "address '{}' contains non-hex characters", value),
        }
    }
}

impl std::error::Error for AddressError {}
// endregion: --- Error
