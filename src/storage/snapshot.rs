//! Persisted dashboard snapshot.

use super::LocalStorage;
use crate::error::Result;
use rust_decimal::Decimal;
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use tracing::warn;

/// Thresholds and active coins as stored between runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub buy_threshold_percent: Decimal,
    pub sell_threshold_percent: Decimal,
    #[serde(default)]
    pub active_coins: ActiveCoins,
}

/// Per-coin persisted state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoinSnapshot {
    #[serde(default)]
    pub last_buy_price: Option<Decimal>,
}

/// Active coins in subscription order, stored as a JSON object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActiveCoins(Vec<(String, CoinSnapshot)>);

impl ActiveCoins {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, symbol: &str) -> Option<&CoinSnapshot> {
        self.0.iter().find(|(s, _)| s == symbol).map(|(_, c)| c)
    }

    /// Insert a coin at the end, or replace it in place if already present.
    pub fn insert(&mut self, symbol: String, coin: CoinSnapshot) {
        match self.0.iter_mut().find(|(s, _)| *s == symbol) {
            Some((_, existing)) => *existing = coin,
            None => self.0.push((symbol, coin)),
        }
    }

    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(s, _)| s.as_str())
    }
}

impl FromIterator<(String, CoinSnapshot)> for ActiveCoins {
    fn from_iter<I: IntoIterator<Item = (String, CoinSnapshot)>>(iter: I) -> Self {
        let mut coins = Self::new();
        for (symbol, coin) in iter {
            coins.insert(symbol, coin);
        }
        coins
    }
}

impl IntoIterator for ActiveCoins {
    type Item = (String, CoinSnapshot);
    type IntoIter = std::vec::IntoIter<(String, CoinSnapshot)>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl Serialize for ActiveCoins {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_map(self.0.iter().map(|(symbol, coin)| (symbol, coin)))
    }
}

impl<'de> Deserialize<'de> for ActiveCoins {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct OrderedVisitor;

        impl<'de> Visitor<'de> for OrderedVisitor {
            type Value = ActiveCoins;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of coin symbols")
            }

            fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut coins = ActiveCoins::new();
                while let Some((symbol, coin)) = map.next_entry::<String, CoinSnapshot>()? {
                    coins.insert(symbol, coin);
                }
                Ok(coins)
            }
        }

        deserializer.deserialize_map(OrderedVisitor)
    }
}

/// Reads and writes the snapshot under one storage key.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    storage: LocalStorage,
    key: String,
}

impl SnapshotStore {
    pub fn new(storage: LocalStorage, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    pub fn storage(&self) -> &LocalStorage {
        &self.storage
    }

    /// Serialize and store a snapshot.
    pub fn save(&self, snapshot: &Snapshot) -> Result<()> {
        self.storage.set(&self.key, serde_json::to_string(snapshot)?)
    }

    /// Load the snapshot. Missing, unreadable or malformed data yields `None`.
    pub fn load(&self) -> Option<Snapshot> {
        let raw = match self.storage.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!("Failed to read local storage: {}", e);
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                warn!("Ignoring malformed snapshot under {}: {}", self.key, e);
                None
            }
        }
    }

    /// Remove the persisted snapshot.
    pub fn clear(&self) -> Result<()> {
        self.storage.remove(&self.key)
    }
}
