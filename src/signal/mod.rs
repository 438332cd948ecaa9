//! Client-side buy/sell signal heuristic.
//!
//! Entry is randomized: a coin with no open position opens one on any tick
//! where the [`EntryPolicy`] fires. Exit is deterministic: the position is
//! closed once the price reaches the sell threshold above the entry.

mod detector;

pub use detector::{EntryPolicy, RandomEntry, SignalDetector, should_sell};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Direction of a recorded signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalKind {
    Buy,
    Sell,
}

impl SignalKind {
    /// Emoji used in notification and history text.
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Buy => "📈",
            Self::Sell => "📉",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Buy => "Buy",
            Self::Sell => "Sell",
        }
    }
}

impl std::fmt::Display for SignalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Buy => write!(f, "buy"),
            Self::Sell => write!(f, "sell"),
        }
    }
}

/// A signal emitted by the detector for one coin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignalEvent {
    pub symbol: String,
    pub kind: SignalKind,
    pub price: Decimal,
}

impl SignalEvent {
    /// Notification text, e.g. `📈 Buy signal BTC at 50000.00 $`.
    pub fn message(&self) -> String {
        format!(
            "{} {} signal {} at {:.2} $",
            self.kind.icon(),
            self.kind.label(),
            self.symbol,
            self.price
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_signal_kind_wire_format() {
        assert_eq!(serde_json::to_string(&SignalKind::Buy).unwrap(), "\"buy\"");
        let kind: SignalKind = serde_json::from_str("\"sell\"").unwrap();
        assert_eq!(kind, SignalKind::Sell);
    }

    #[test]
    fn test_event_message_rounds_price() {
        let event = SignalEvent {
            symbol: "ETH".to_string(),
            kind: SignalKind::Sell,
            price: dec!(3012.456),
        };
        assert_eq!(event.message(), "📉 Sell signal ETH at 3012.46 $");
    }
}
