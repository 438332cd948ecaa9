//! Dashboard API integration.
//!
//! This module provides the HTTP client for the price/analysis/signal API,
//! its request/response types, and the offline response cache.

mod cache;
mod client;
mod types;

pub use cache::{FetchStrategy, OfflineCache};
pub use client::{ApiClient, ApiClientBuilder, DashboardApi};
#[cfg(test)]
pub use client::MockDashboardApi;
pub use types::{
    Analysis, PrefsUpdate, PriceQuote, RemotePrefs, RemoteSettings, SettingsUpdate, SignalHistory,
    SignalRecord, SignalUpdate, TimeframeAnalysis, TrendSignal,
};
