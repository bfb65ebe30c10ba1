//! Command-line parsing for the interactive loop.

use lib_chain::ExplorerKind;
use shared::Address;

/// Length of a `0x`-prefixed 32-byte transaction hash.
const TX_HASH_LEN: usize = 66;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Connect,
    Refresh,
    Disconnect,
    Status,
    Market,
    /// Chain-info holdings for any address.
    Lookup(String),
    /// Open an explorer page for a transaction hash or an address.
    Open(String),
    Help,
    Quit,
    Unknown(String),
}

impl Command {
    /// Parse one input line. Blank lines yield `None`.
    pub fn parse(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace();
        let word = parts.next()?.to_ascii_lowercase();
        let arg = parts.next().map(str::to_string);

        let command = match (word.as_str(), arg) {
            ("connect" | "c", _) => Command::Connect,
            ("refresh" | "r", _) => Command::Refresh,
            ("disconnect" | "d", _) => Command::Disconnect,
            ("status" | "s", _) => Command::Status,
            ("market" | "m", _) => Command::Market,
            ("lookup" | "balance", Some(address)) => Command::Lookup(address),
            ("open" | "o", Some(target)) => Command::Open(target),
            ("help" | "h" | "?", _) => Command::Help,
            ("quit" | "exit" | "q", _) => Command::Quit,
            _ => Command::Unknown(line.trim().to_string()),
        };
        Some(command)
    }
}

/// Decide whether `value` names a transaction or an address.
pub fn explorer_target(value: &str) -> Result<ExplorerKind, String> {
    let value = value.trim();
    let is_hex = value
        .strip_prefix("0x")
        .map(|digits| !digits.is_empty() && digits.chars().all(|c| c.is_ascii_hexdigit()))
        .unwrap_or(false);

    if is_hex && value.len() == TX_HASH_LEN {
        Ok(ExplorerKind::Transaction)
    } else if Address::parse(value).is_ok() {
        Ok(ExplorerKind::Address)
    } else {
        Err(format!("'{}' is neither a transaction hash nor an address", value))
    }
}

pub const HELP: &str = "\
Commands:
  connect            connect the wallet account
  refresh            reload balances and history
  disconnect         forget the session
  status             show the dashboard again
  market             network figures from the chain-info service
  lookup <address>   holdings of any address from the chain-info service
  open <hash|addr>   open an explorer page in the browser
  help               this text
  quit               leave";
