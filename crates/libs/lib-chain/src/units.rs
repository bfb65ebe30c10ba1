//! # Unit Conversion
//!
//! Integer base units (wei, token base units) to fixed-precision display
//! decimals and back. All arithmetic is done on `u128` so no precision is lost
//! before the final rounding step.
//!
//! | Quantity      | Base decimals  | Display precision |
//! |---------------|----------------|-------------------|
//! | Native coin   | 18             | 6                 |
//! | ERC-20 token  | per contract   | 2                 |
//! | Gas price     | 9 (wei → Gwei) | 2                 |
//!
//! Rounding is half-up. Values too large for [`Decimal`] saturate at
//! [`Decimal::MAX`].

use crate::error::{Error, Result};
use rust_decimal::Decimal;

pub const NATIVE_DECIMALS: u8 = 18;
pub const GWEI_DECIMALS: u8 = 9;

pub const NATIVE_PRECISION: u32 = 6;
pub const TOKEN_PRECISION: u32 = 2;
pub const GAS_PRICE_PRECISION: u32 = 2;

const MAX_SCALE: u32 = 28;

/// Convert `raw` base units with `decimals` places into a decimal rounded
/// half-up to `precision` places. The result keeps its scale, so
/// `to_display(10^18, 18, 6)` prints as `1.000000`.
pub fn to_display(raw: u128, decimals: u8, precision: u32) -> Decimal {
    let precision = precision.min(MAX_SCALE);
    let decimals = u32::from(decimals);

    let scaled = if decimals >= precision {
        match 10u128.checked_pow(decimals - precision) {
            Some(divisor) => {
                let quotient = raw / divisor;
                let remainder = raw % divisor;
                // remainder >= divisor / 2, rounded up
                if divisor > 1 && remainder >= divisor - divisor / 2 {
                    quotient + 1
                } else {
                    quotient
                }
            }
            // divisor exceeds u128, so raw / divisor < 0.5
            None => 0,
        }
    } else {
        10u128
            .checked_pow(precision - decimals)
            .and_then(|factor| raw.checked_mul(factor))
            .unwrap_or(u128::MAX)
    };

    i128::try_from(scaled)
        .ok()
        .and_then(|mantissa| Decimal::try_from_i128_with_scale(mantissa, precision).ok())
        .unwrap_or(Decimal::MAX)
}

/// Wei to native coin, 6 places.
pub fn to_native_display(wei: u128) -> Decimal {
    to_display(wei, NATIVE_DECIMALS, NATIVE_PRECISION)
}

/// Token base units to token amount, 2 places.
pub fn to_token_display(raw: u128, decimals: u8) -> Decimal {
    to_display(raw, decimals, TOKEN_PRECISION)
}

/// Wei to Gwei, 2 places.
pub fn to_gwei(wei: u128) -> Decimal {
    to_display(wei, GWEI_DECIMALS, GAS_PRICE_PRECISION)
}

/// Inverse of [`to_display`]: a display amount back to base units.
///
/// Digits beyond `decimals` places are truncated. Returns `None` for negative
/// amounts and for results that do not fit in `u128`.
pub fn to_base_units(amount: Decimal, decimals: u8) -> Option<u128> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return None;
    }
    let mantissa = amount.mantissa().unsigned_abs();
    let scale = amount.scale();
    let decimals = u32::from(decimals);

    if decimals >= scale {
        10u128
            .checked_pow(decimals - scale)
            .and_then(|factor| mantissa.checked_mul(factor))
    } else {
        Some(
            10u128
                .checked_pow(scale - decimals)
                .map(|divisor| mantissa / divisor)
                .unwrap_or(0),
        )
    }
}

/// Parse a JSON-RPC hex quantity (`0x`-prefixed, e.g. `0xde0b6b3a7640000`).
pub fn parse_hex_quantity(value: &str) -> Result<u128> {
    let trimmed = value.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .ok_or_else(|| Error::malformed(format!("quantity '{}' is not 0x-prefixed", trimmed)))?;

    if digits.is_empty() {
        return Err(Error::malformed(format!("quantity '{}' has no digits", trimmed)));
    }

    u128::from_str_radix(digits, 16)
        .map_err(|e| Error::malformed(format!("invalid hex quantity '{}': {}", trimmed, e)))
}

/// Parse a base-10 integer quantity as returned by indexing services.
pub fn parse_dec_quantity(value: &str) -> Result<u128> {
    let trimmed = value.trim();
    trimmed
        .parse::<u128>()
        .map_err(|e| Error::malformed(format!("invalid decimal quantity '{}': {}", trimmed, e)))
}
