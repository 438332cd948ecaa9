//! Thresholds and active coin subscriptions.

use crate::api::{Analysis, SignalHistory};
use crate::storage::{CoinSnapshot, Snapshot};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// Normalize a user- or server-provided symbol.
pub fn normalize_symbol(symbol: &str) -> String {
    symbol.trim().to_uppercase()
}

/// One tracked coin and everything shown on its card.
#[derive(Debug, Clone, PartialEq)]
pub struct CoinState {
    /// Symbol, e.g. "BTC".
    pub symbol: String,
    /// Entry price of the open position, if any.
    pub last_buy_price: Option<Decimal>,
    /// Latest price.
    pub price: Option<Decimal>,
    /// When the price was last updated.
    pub price_updated: Option<DateTime<Utc>>,
    /// Text of the most recent signal.
    pub last_signal: Option<String>,
    /// Realized profit across closed positions.
    pub total_profit: Decimal,
    /// Signal history lines, newest first.
    pub history: Vec<String>,
    /// Latest multi-timeframe analysis.
    pub analysis: Option<Analysis>,
}

impl CoinState {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            last_buy_price: None,
            price: None,
            price_updated: None,
            last_signal: None,
            total_profit: Decimal::ZERO,
            history: Vec::new(),
            analysis: None,
        }
    }

    /// Display pair, e.g. "BTC/USDT".
    pub fn pair(&self) -> String {
        format!("{}/USDT", self.symbol)
    }

    pub fn has_open_position(&self) -> bool {
        self.last_buy_price.is_some()
    }

    pub fn is_profitable(&self) -> bool {
        self.total_profit >= Decimal::ZERO
    }
}

/// Thresholds plus the ordered list of active coins.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// Buy threshold in percent.
    pub buy_threshold_percent: Decimal,
    /// Sell threshold in percent.
    pub sell_threshold_percent: Decimal,
    /// Active coins in subscription order.
    pub coins: Vec<CoinState>,
    /// Highlighted card.
    pub selected_index: Option<usize>,
}

impl DashboardState {
    pub fn new(buy_threshold_percent: Decimal, sell_threshold_percent: Decimal) -> Self {
        Self {
            buy_threshold_percent,
            sell_threshold_percent,
            coins: Vec::new(),
            selected_index: None,
        }
    }

    pub fn is_active(&self, symbol: &str) -> bool {
        self.coins.iter().any(|c| c.symbol == symbol)
    }

    pub fn coin(&self, symbol: &str) -> Option<&CoinState> {
        self.coins.iter().find(|c| c.symbol == symbol)
    }

    pub fn coin_mut(&mut self, symbol: &str) -> Option<&mut CoinState> {
        self.coins.iter_mut().find(|c| c.symbol == symbol)
    }

    /// Active symbols in subscription order.
    pub fn symbols(&self) -> Vec<String> {
        self.coins.iter().map(|c| c.symbol.clone()).collect()
    }

    /// Subscribe to a coin. Returns false if it was already active.
    pub fn add_coin(&mut self, symbol: &str) -> bool {
        if self.is_active(symbol) {
            return false;
        }
        self.coins.push(CoinState::new(symbol));
        if self.selected_index.is_none() {
            self.selected_index = Some(0);
        }
        true
    }

    /// Unsubscribe from a coin. Returns false if it was not active.
    pub fn remove_coin(&mut self, symbol: &str) -> bool {
        let before = self.coins.len();
        self.coins.retain(|c| c.symbol != symbol);
        if self.coins.len() == before {
            return false;
        }
        self.selected_index = match self.selected_index {
            _ if self.coins.is_empty() => None,
            Some(i) => Some(i.min(self.coins.len() - 1)),
            None => None,
        };
        true
    }

    pub fn selected_coin(&self) -> Option<&CoinState> {
        self.selected_index.and_then(|i| self.coins.get(i))
    }

    /// Apply a signal history response to an active coin.
    pub fn apply_signals(&mut self, symbol: &str, history: SignalHistory, max_lines: usize) {
        let Some(coin) = self.coin_mut(symbol) else {
            return;
        };
        coin.last_buy_price = history.last_open_buy;
        coin.total_profit = history.total_profit;
        coin.last_signal = history.signals.first().map(|s| s.summary());
        coin.history = history
            .signals
            .iter()
            .take(max_lines)
            .map(|s| s.history_line())
            .collect();
    }

    /// Persistable view of the thresholds and coins.
    pub fn to_snapshot(&self) -> Snapshot {
        Snapshot {
            buy_threshold_percent: self.buy_threshold_percent,
            sell_threshold_percent: self.sell_threshold_percent,
            active_coins: self
                .coins
                .iter()
                .map(|c| {
                    (
                        c.symbol.clone(),
                        CoinSnapshot {
                            last_buy_price: c.last_buy_price,
                        },
                    )
                })
                .collect(),
        }
    }

    /// Replace thresholds and coins with a restored snapshot.
    pub fn apply_snapshot(&mut self, snapshot: Snapshot) {
        self.buy_threshold_percent = snapshot.buy_threshold_percent;
        self.sell_threshold_percent = snapshot.sell_threshold_percent;
        self.coins = snapshot
            .active_coins
            .into_iter()
            .map(|(symbol, saved)| {
                let mut coin = CoinState::new(normalize_symbol(&symbol));
                coin.last_buy_price = saved.last_buy_price;
                coin
            })
            .collect();
        self.selected_index = if self.coins.is_empty() { None } else { Some(0) };
    }

    /// Drop every coin and restore the given thresholds.
    pub fn reset(&mut self, buy_threshold_percent: Decimal, sell_threshold_percent: Decimal) {
        *self = Self::new(buy_threshold_percent, sell_threshold_percent);
    }
}
