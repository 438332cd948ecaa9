//! Signal detection over price ticks.

use super::{SignalEvent, SignalKind};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use std::fmt::Debug;

/// Decides whether a coin with no open position should open one.
pub trait EntryPolicy: Send + Debug {
    fn should_enter(&mut self, symbol: &str, price: Decimal) -> bool;
}

/// Opens a position with a fixed probability per tick.
#[derive(Debug)]
pub struct RandomEntry {
    probability: f64,
    rng: StdRng,
}

impl RandomEntry {
    /// Create a policy seeded from OS entropy.
    pub fn new(probability: f64) -> Self {
        Self {
            probability: probability.clamp(0.0, 1.0),
            rng: StdRng::from_entropy(),
        }
    }

    /// Create a reproducible policy.
    pub fn with_seed(probability: f64, seed: u64) -> Self {
        Self {
            probability: probability.clamp(0.0, 1.0),
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl EntryPolicy for RandomEntry {
    fn should_enter(&mut self, _symbol: &str, _price: Decimal) -> bool {
        self.rng.gen_bool(self.probability)
    }
}

/// True when `price` has reached `sell_threshold` percent above `last_buy`.
pub fn should_sell(price: Decimal, last_buy: Decimal, sell_threshold: Decimal) -> bool {
    price >= last_buy * (Decimal::ONE + sell_threshold / Decimal::ONE_HUNDRED)
}

/// Applies the entry policy and the threshold exit to each price tick.
#[derive(Debug)]
pub struct SignalDetector {
    entry: Box<dyn EntryPolicy>,
}

impl SignalDetector {
    pub fn new(entry: impl EntryPolicy + 'static) -> Self {
        Self {
            entry: Box::new(entry),
        }
    }

    /// Evaluate one price for one coin, updating its open position in place.
    ///
    /// Entry and exit are checked in sequence, so a position opened on this
    /// tick is closed immediately when the threshold is not positive.
    pub fn evaluate(
        &mut self,
        symbol: &str,
        price: Decimal,
        last_buy: &mut Option<Decimal>,
        sell_threshold: Decimal,
    ) -> Vec<SignalEvent> {
        let mut events = Vec::new();

        if last_buy.is_none() && self.entry.should_enter(symbol, price) {
            *last_buy = Some(price);
            events.push(SignalEvent {
                symbol: symbol.to_string(),
                kind: SignalKind::Buy,
                price,
            });
        }

        if let Some(entry) = *last_buy {
            if should_sell(price, entry, sell_threshold) {
                *last_buy = None;
                events.push(SignalEvent {
                    symbol: symbol.to_string(),
                    kind: SignalKind::Sell,
                    price,
                });
            }
        }

        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[derive(Debug)]
    struct Fixed(bool);

    impl EntryPolicy for Fixed {
        fn should_enter(&mut self, _symbol: &str, _price: Decimal) -> bool {
            self.0
        }
    }

    #[test]
    fn test_should_sell_boundary() {
        // 100 * (1 + 1.5/100) = 101.5
        assert!(should_sell(dec!(101.5), dec!(100), dec!(1.5)));
        assert!(should_sell(dec!(102), dec!(100), dec!(1.5)));
        assert!(!should_sell(dec!(101.49), dec!(100), dec!(1.5)));
    }

    #[test]
    fn test_entry_opens_position() {
        let mut detector = SignalDetector::new(Fixed(true));
        let mut last_buy = None;

        let events = detector.evaluate("BTC", dec!(50000), &mut last_buy, dec!(1.5));

        assert_eq!(last_buy, Some(dec!(50000)));
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, SignalKind::Buy);
        assert_eq!(events[0].price, dec!(50000));
    }

    #[test]
    fn test_no_entry_when_policy_declines() {
        let mut detector = SignalDetector::new(Fixed(false));
        let mut last_buy = None;

        assert!(detector.evaluate("BTC", dec!(50000), &mut last_buy, dec!(1.5)).is_empty());
        assert_eq!(last_buy, None);
    }

    #[test]
    fn test_open_position_is_not_reentered() {
        let mut detector = SignalDetector::new(Fixed(true));
        let mut last_buy = Some(dec!(100));

        let events = detector.evaluate("ETH", dec!(100.5), &mut last_buy, dec!(1.5));

        assert!(events.is_empty());
        assert_eq!(last_buy, Some(dec!(100)));
    }

    #[test]
    fn test_exit_closes_position() {
        let mut detector = SignalDetector::new(Fixed(false));
        let mut last_buy = Some(dec!(100));

        let events = detector.evaluate("ETH", dec!(101.5), &mut last_buy, dec!(1.5));

        assert_eq!(last_buy, None);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, SignalKind::Sell);
    }

    #[test]
    fn test_non_positive_threshold_closes_same_tick() {
        let mut detector = SignalDetector::new(Fixed(true));
        let mut last_buy = None;

        let events = detector.evaluate("SOL", dec!(20), &mut last_buy, Decimal::ZERO);

        let kinds: Vec<_> = events.iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![SignalKind::Buy, SignalKind::Sell]);
        assert_eq!(last_buy, None);
    }

    #[test]
    fn test_random_entry_extremes() {
        let mut never = RandomEntry::with_seed(0.0, 7);
        let mut always = RandomEntry::with_seed(1.0, 7);
        for _ in 0..100 {
            assert!(!never.should_enter("BTC", dec!(1)));
            assert!(always.should_enter("BTC", dec!(1)));
        }
    }
}
