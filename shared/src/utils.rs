//! # Shared Utility Functions
//!
//! Display helpers used by the terminal and the browser bridge.
//!
//! ## Address Formatting
//!
//! - [`format_address`] - Format address with ellipsis (first N and last M characters)
//! - [`truncate_address`] - `format_address` with the EVM defaults (`0x` + 4, last 4)
//!
//! ## Usage
//!
//! ```rust
//! use shared::utils::format_address;
//!
//! let address = "0xDEAD00000000000000000000000000000000BEEF";
//! assert_eq!(format_address(address, 6, 4), "0xDEAD...BEEF");
//! ```

/// Format an address by showing the first `prefix_len` and last `suffix_len` characters.
///
/// If the address is shorter than `prefix_len + suffix_len`, it is returned as-is.
///
/// # Examples
///
/// ```rust
/// use shared::utils::format_address;
///
/// let addr = "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48";
/// assert_eq!(format_address(addr, 6, 4), "0xA0b8...eB48");
/// assert_eq!(format_address(addr, 10, 6), "0xA0b86991...06eB48");
/// assert_eq!(format_address("0x1234", 6, 4), "0x1234");
/// ```
pub fn format_address(address: &str, prefix_len: usize, suffix_len: usize) -> String {
    let address_len = address.len();

    if !address.is_ascii()
        || address_len <= prefix_len + suffix_len
        || prefix_len >= address_len
        || suffix_len >= address_len
    {
        return address.to_string();
    }

    let prefix = &address[..prefix_len];
    let suffix = &address[address_len - suffix_len..];

    format!("{}...{}", prefix, suffix)
}

/// Format an address as `0x` plus four leading and four trailing hex digits.
///
/// ```rust
/// use shared::utils::truncate_address;
///
/// assert_eq!(truncate_address("0xDEAD00000000000000000000000000000000BEEF"), "0xDEAD...BEEF");
/// ```
pub fn truncate_address(address: &str) -> String {
    format_address(address, 6, 4)
}

/// Shorten a transaction hash the same way (`0x1a2b3c...9f8e`).
pub fn truncate_hash(hash: &str) -> String {
    format_address(hash, 8, 4)
}
