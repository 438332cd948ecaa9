//! # P-Plus - Crypto Signal Dashboard
//!
//! A terminal dashboard that polls a remote price/analysis API for a
//! configurable set of coins, renders live prices and multi-timeframe
//! technical analysis, and applies a simple buy/sell signal heuristic with
//! local notifications and persistence.
//!
//! ## Architecture
//!
//! The application follows a unidirectional data flow:
//!
//! - **App**: Terminal lifecycle and the event loop
//! - **Controller**: Side effects of actions (network, storage, signals)
//! - **State**: Centralized store mutated by actions
//! - **API**: Dashboard REST client and offline response cache
//! - **Signal**: Entry/exit heuristic over price ticks
//! - **Poller**: Fixed-interval refresh timer
//! - **Storage**: File-backed local storage and state snapshots
//! - **UI / Events**: Rendering and input handling
//! - **Config**: Configuration management

pub mod api;
pub mod app;
pub mod config;
pub mod controller;
pub mod error;
pub mod events;
pub mod poller;
pub mod signal;
pub mod state;
pub mod storage;
pub mod ui;

pub use app::App;
pub use config::Config;
pub use controller::Controller;
pub use error::{Error, Result};
pub use signal::{SignalDetector, SignalEvent, SignalKind};
