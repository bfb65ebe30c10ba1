//! # Dashboard Rendering
//!
//! Turns a [`SessionSnapshot`] (and the optional chain-info responses) into
//! the text printed after each command.

use lib_chain::network;
use lib_utils::format_unix;
use shared::{
    truncate_address, truncate_hash, AccountBalance, ChainInfo, ConnectionStatus, SessionSnapshot,
    TransactionRecord, TxStatus,
};

pub fn render_snapshot(snapshot: &SessionSnapshot) -> String {
    let session = &snapshot.session;
    let mut lines = vec![format!("Status:   {}", status_label(snapshot))];

    if let Some(error) = &session.error {
        lines.push(format!("Error:    {}", error));
    }

    let (Some(address), Some(chain_id)) = (&session.address, session.chain_id) else {
        if snapshot.status == ConnectionStatus::Disconnected {
            lines.push("Type `connect` to load the wallet account.".to_string());
        }
        return lines.join("\n");
    };

    let symbol = network::native_symbol_for(chain_id);
    lines.push(format!("Account:  {}", address));
    lines.push(format!(
        "Network:  {} (chain {})",
        session.network_name.as_deref().unwrap_or("unknown"),
        chain_id
    ));
    if let Some(balance) = session.native_balance {
        lines.push(format!("Balance:  {} {}", balance, symbol));
    }

    lines.push(String::new());
    if snapshot.tokens.is_empty() {
        lines.push("Tokens:   none".to_string());
    } else {
        lines.push("Tokens:".to_string());
        for token in &snapshot.tokens {
            lines.push(format!(
                "  {:<6} {:>16}  {}",
                token.symbol,
                token.amount.to_string(),
                truncate_address(token.contract_address.as_str())
            ));
        }
    }

    lines.push(String::new());
    if snapshot.transactions.is_empty() {
        lines.push("Recent transactions: none".to_string());
    } else {
        lines.push("Recent transactions:".to_string());
        for tx in &snapshot.transactions {
            lines.push(format!("  {}", render_transaction(tx, address, symbol)));
        }
        if snapshot.history_degraded() {
            lines.push("  (history service unavailable; placeholder shown)".to_string());
        }
    }

    if let Some(market) = &snapshot.market {
        lines.push(String::new());
        lines.push(render_market(market));
    }

    lines.join("\n")
}

fn status_label(snapshot: &SessionSnapshot) -> &'static str {
    if snapshot.refreshing {
        return "refreshing";
    }
    match snapshot.status {
        ConnectionStatus::Disconnected => "disconnected",
        ConnectionStatus::Connecting => "connecting",
        ConnectionStatus::Connected => "connected",
        ConnectionStatus::Error => "error",
    }
}

/// One history line: hash, direction, value, block, time, status.
pub fn render_transaction(tx: &TransactionRecord, account: &shared::Address, symbol: &str) -> String {
    if tx.placeholder {
        return format!("{}  (placeholder)", truncate_hash(&tx.hash));
    }

    let direction = if tx.is_contract_creation() {
        "create"
    } else if &tx.from == account {
        "out"
    } else {
        "in"
    };
    let status = match tx.status {
        TxStatus::Success => "success",
        TxStatus::Pending => "pending",
        TxStatus::Failed => "failed",
    };
    let when = format_unix(tx.timestamp_unix).unwrap_or_else(|_| tx.timestamp_unix.to_string());

    format!(
        "{}  {:<6} {} {}  {} gwei  block {}  {}  {}",
        truncate_hash(&tx.hash),
        direction,
        tx.value_eth,
        symbol,
        tx.gas_price_gwei,
        tx.block_number,
        when,
        status
    )
}

pub fn render_market(info: &ChainInfo) -> String {
    format!(
        "Market:   {} | gas {:.2} gwei | block {} | price ${:.2}",
        info.network, info.gas_price, info.block_number, info.eth_price
    )
}

pub fn render_account_balance(balance: &AccountBalance) -> String {
    let mut lines = vec![format!(
        "{}: {:.6} (${:.2})",
        truncate_address(&balance.address),
        balance.balance,
        balance.usd_value
    )];
    for token in &balance.tokens {
        lines.push(format!(
            "  {:<6} {:>16.2}  ${:.2}",
            token.symbol, token.balance, token.usd_value
        ));
    }
    lines.join("\n")
}
