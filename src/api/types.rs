//! Request and response bodies of the dashboard API.

use crate::signal::SignalKind;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// `GET /settings` response.
///
/// Older servers report the entry threshold as `first_buy_threshold`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RemoteSettings {
    #[serde(default, alias = "first_buy_threshold")]
    pub buy_threshold: Option<Decimal>,
    #[serde(default)]
    pub sell_threshold: Option<Decimal>,
}

/// `POST /settings` body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SettingsUpdate {
    #[serde(with = "rust_decimal::serde::float")]
    pub buy_threshold: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub sell_threshold: Decimal,
}

/// `GET /prefs` response.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RemotePrefs {
    #[serde(default)]
    pub selected_coins: Option<Vec<String>>,
    #[serde(default)]
    pub notif_sound: Option<bool>,
}

/// `POST /prefs` body; only the present fields are updated server-side.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PrefsUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_coins: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notif_sound: Option<bool>,
}

impl PrefsUpdate {
    pub fn coins(coins: Vec<String>) -> Self {
        Self {
            selected_coins: Some(coins),
            notif_sound: None,
        }
    }

    pub fn sound(enabled: bool) -> Self {
        Self {
            selected_coins: None,
            notif_sound: Some(enabled),
        }
    }
}

/// `GET /price/{symbol}` response.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PriceQuote {
    #[serde(default)]
    pub price: Option<Decimal>,
}

impl PriceQuote {
    /// The price, if present and non-zero.
    pub fn usable(&self) -> Option<Decimal> {
        self.price.filter(|p| !p.is_zero())
    }
}

/// One recorded buy/sell event.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SignalRecord {
    #[serde(rename = "type")]
    pub kind: SignalKind,
    pub price: Decimal,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub profit: Decimal,
}

impl SignalRecord {
    /// One history line, e.g. `📉 Sell at 101.5 $ - 2024-01-01 10:00:00 (P/L: 1.5 $)`.
    pub fn history_line(&self) -> String {
        let profit = if self.kind == SignalKind::Sell && !self.profit.is_zero() {
            format!(" (P/L: {} $)", self.profit)
        } else {
            String::new()
        };
        format!(
            "{} {} at {} $ - {}{}",
            self.kind.icon(),
            self.kind.label(),
            self.price,
            self.time,
            profit
        )
    }

    /// Short summary shown as a card's last signal.
    pub fn summary(&self) -> String {
        format!("{} {} at {} $", self.kind.icon(), self.kind.label(), self.price)
    }
}

/// `GET /signals/{symbol}` response, newest record first.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SignalHistory {
    #[serde(default)]
    pub signals: Vec<SignalRecord>,
    #[serde(default)]
    pub total_profit: Decimal,
    #[serde(default)]
    pub last_open_buy: Option<Decimal>,
}

/// `POST /signals/{symbol}` body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignalUpdate {
    #[serde(rename = "type")]
    pub kind: SignalKind,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

/// Per-timeframe trend verdict from the analysis endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendSignal {
    Buy,
    Sell,
    Neutral,
    #[serde(other)]
    Unknown,
}

impl TrendSignal {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Buy => "Buy",
            Self::Sell => "Sell",
            Self::Neutral => "Neutral",
            Self::Unknown => "—",
        }
    }
}

/// Latest indicator values for one timeframe.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TimeframeAnalysis {
    #[serde(default)]
    pub close: Option<Decimal>,
    #[serde(default)]
    pub ema20: Option<Decimal>,
    #[serde(default)]
    pub ema50: Option<Decimal>,
    #[serde(default)]
    pub rsi14: Option<Decimal>,
    #[serde(default)]
    pub signal: Option<TrendSignal>,
    #[serde(default)]
    pub error: Option<String>,
}

/// `GET /analysis/{symbol}` response.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Analysis {
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub timeframes: HashMap<String, TimeframeAnalysis>,
    #[serde(default)]
    pub confidence: Decimal,
}

impl Analysis {
    pub fn timeframe(&self, interval: &str) -> Option<&TimeframeAnalysis> {
        self.timeframes.get(interval)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_settings_accepts_legacy_field() {
        let settings: RemoteSettings =
            serde_json::from_value(json!({"first_buy_threshold": 0.8, "sell_threshold": 2}))
                .unwrap();
        assert_eq!(settings.buy_threshold, Some(dec!(0.8)));
        assert_eq!(settings.sell_threshold, Some(dec!(2)));
    }

    #[test]
    fn test_settings_update_sends_numbers() {
        let body = serde_json::to_value(SettingsUpdate {
            buy_threshold: dec!(1.0),
            sell_threshold: dec!(1.5),
        })
        .unwrap();
        assert_eq!(body, json!({"buy_threshold": 1.0, "sell_threshold": 1.5}));
    }

    #[test]
    fn test_prefs_update_omits_absent_fields() {
        let body = serde_json::to_value(PrefsUpdate::sound(false)).unwrap();
        assert_eq!(body, json!({"notif_sound": false}));
    }

    #[test]
    fn test_price_zero_is_unusable() {
        let quote: PriceQuote = serde_json::from_value(json!({"price": 0})).unwrap();
        assert_eq!(quote.usable(), None);
        let quote: PriceQuote = serde_json::from_value(json!({})).unwrap();
        assert_eq!(quote.usable(), None);
    }

    #[test]
    fn test_signal_history_decodes() {
        let history: SignalHistory = serde_json::from_value(json!({
            "symbol": "BTC",
            "signals": [
                {"type": "sell", "price": 101.5, "time": "2024-01-01 10:05:00", "profit": 1.5},
                {"type": "buy", "price": 100, "time": "2024-01-01 10:00:00", "profit": 0}
            ],
            "total_profit": 1.5,
            "last_open_buy": null
        }))
        .unwrap();

        assert_eq!(history.signals.len(), 2);
        assert_eq!(history.last_open_buy, None);
        assert_eq!(
            history.signals[0].history_line(),
            "📉 Sell at 101.5 $ - 2024-01-01 10:05:00 (P/L: 1.5 $)"
        );
        assert_eq!(history.signals[1].summary(), "📈 Buy at 100 $");
    }

    #[test]
    fn test_analysis_tolerates_failed_timeframe() {
        let analysis: Analysis = serde_json::from_value(json!({
            "symbol": "ETH",
            "timeframes": {
                "5m": {"close": 3000.5, "ema20": 2990, "ema50": 2980, "rsi14": 61.2, "signal": "buy"},
                "1h": {"error": "upstream timeout"}
            },
            "confidence": 67
        }))
        .unwrap();

        assert_eq!(analysis.confidence, dec!(67));
        assert_eq!(
            analysis.timeframe("5m").and_then(|t| t.signal),
            Some(TrendSignal::Buy)
        );
        assert_eq!(
            analysis.timeframe("1h").and_then(|t| t.error.as_deref()),
            Some("upstream timeout")
        );
        assert!(analysis.timeframe("15m").is_none());
    }
}
