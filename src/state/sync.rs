//! Boot-time reconciliation between the local snapshot and server state.
//!
//! Precedence:
//! - thresholds: server settings overwrite the snapshot when they load;
//! - coins: a non-empty local snapshot wins, otherwise the server's saved
//!   selection is replayed (or the configured default when it has none);
//! - sound flag: always from the server.

use super::normalize_symbol;
use crate::api::RemotePrefs;
use crate::storage::Snapshot;

/// Whether the server's coin selection should be replayed after boot.
pub fn should_replay_prefs(local: Option<&Snapshot>) -> bool {
    local.is_none_or(|s| s.active_coins.is_empty())
}

/// Coins to subscribe to from the server's preferences.
pub fn coins_to_replay(prefs: &RemotePrefs, default_selection: &[String]) -> Vec<String> {
    let saved = prefs
        .selected_coins
        .as_deref()
        .unwrap_or(default_selection);

    let mut coins: Vec<String> = Vec::with_capacity(saved.len());
    for symbol in saved.iter().map(|s| normalize_symbol(s)) {
        if !symbol.is_empty() && !coins.contains(&symbol) {
            coins.push(symbol);
        }
    }
    coins
}
