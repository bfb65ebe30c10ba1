//! # Network Registry
//!
//! Static table of known EVM chains: display name, block-explorer base URL and
//! native currency symbol. Chains missing from the table are still usable; they
//! are shown as `Unknown Network (Chain ID: <id>)` and link to the Ethereum mainnet explorer.

/// Explorer used when a chain has no entry.
pub const DEFAULT_EXPLORER: &str = "https://etherscan.io";
/// Native symbol used when a chain has no entry.
pub const DEFAULT_NATIVE_SYMBOL: &str = "ETH";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkDescriptor {
    pub chain_id: u64,
    pub name: &'static str,
    pub explorer_base: &'static str,
    pub native_symbol: &'static str,
}

const fn network(
    chain_id: u64,
    name: &'static str,
    explorer_base: &'static str,
    native_symbol: &'static str,
) -> NetworkDescriptor {
    NetworkDescriptor {
        chain_id,
        name,
        explorer_base,
        native_symbol,
    }
}

static NETWORKS: &[NetworkDescriptor] = &[
    network(1, "Ethereum Mainnet", "https://etherscan.io", "ETH"),
    network(11155111, "Sepolia Testnet", "https://sepolia.etherscan.io", "ETH"),
    network(17000, "Holesky Testnet", "https://holesky.etherscan.io", "ETH"),
    network(137, "Polygon Mainnet", "https://polygonscan.com", "POL"),
    network(80002, "Polygon Amoy Testnet", "https://amoy.polygonscan.com", "POL"),
    network(56, "BNB Smart Chain", "https://bscscan.com", "BNB"),
    network(97, "BNB Smart Chain Testnet", "https://testnet.bscscan.com", "tBNB"),
    network(42161, "Arbitrum One", "https://arbiscan.io", "ETH"),
    network(10, "Optimism", "https://optimistic.etherscan.io", "ETH"),
    network(8453, "Base", "https://basescan.org", "ETH"),
    network(43114, "Avalanche C-Chain", "https://snowtrace.io", "AVAX"),
];

/// What an explorer link points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExplorerKind {
    Address,
    Transaction,
}

impl ExplorerKind {
    fn path_segment(self) -> &'static str {
        match self {
            ExplorerKind::Address => "address",
            ExplorerKind::Transaction => "tx",
        }
    }
}

/// Every registered network.
pub fn networks() -> &'static [NetworkDescriptor] {
    NETWORKS
}

pub fn lookup(chain_id: u64) -> Option<&'static NetworkDescriptor> {
    NETWORKS.iter().find(|n| n.chain_id == chain_id)
}

/// Display name for `chain_id`, with a fallback naming the raw id.
pub fn name_for(chain_id: u64) -> String {
    match lookup(chain_id) {
        Some(network) => network.name.to_string(),
        None => format!("Unknown Network (Chain ID: {})", chain_id),
    }
}

pub fn native_symbol_for(chain_id: u64) -> &'static str {
    lookup(chain_id)
        .map(|n| n.native_symbol)
        .unwrap_or(DEFAULT_NATIVE_SYMBOL)
}

/// Explorer link for an address or transaction hash on `chain_id`.
pub fn explorer_url_for(chain_id: u64, kind: ExplorerKind, value: &str) -> String {
    let base = lookup(chain_id)
        .map(|n| n.explorer_base)
        .unwrap_or(DEFAULT_EXPLORER);
    format!("{}/{}/{}", base, kind.path_segment(), value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_known_networks() {
        assert_eq!(name_for(1), "Ethereum Mainnet");
        assert_eq!(name_for(137), "Polygon Mainnet");
        assert_eq!(native_symbol_for(43114), "AVAX");
    }

    #[test]
    fn test_unknown_network_falls_back() {
        assert_eq!(name_for(999_999), "Unknown Network (Chain ID: 999999)");
        assert_eq!(native_symbol_for(999_999), "ETH");
        assert_eq!(
            explorer_url_for(999_999, ExplorerKind::Transaction, "0xabc"),
            "https://etherscan.io/tx/0xabc"
        );
    }

    #[test]
    fn test_explorer_paths() {
        assert_eq!(
            explorer_url_for(8453, ExplorerKind::Address, "0xDEAD00000000000000000000000000000000BEEF"),
            "https://basescan.org/address/0xDEAD00000000000000000000000000000000BEEF"
        );
        assert_eq!(
            explorer_url_for(10, ExplorerKind::Transaction, "0x01"),
            "https://optimistic.etherscan.io/tx/0x01"
        );
    }

    #[test]
    fn test_chain_ids_unique() {
        let ids: HashSet<u64> = networks().iter().map(|n| n.chain_id).collect();
        assert_eq!(ids.len(), networks().len());
    }
}
