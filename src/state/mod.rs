//! State management for P-Plus.
//!
//! This module provides centralized state management with a unidirectional
//! data flow pattern inspired by Redux/Elm architecture. Network results
//! arrive as [`Action`]s and are applied by [`Store::reduce`] in arrival order.

mod app_state;
mod dashboard_state;
mod notification_state;
mod picker_state;
pub mod sync;

pub use app_state::{AppState, InputMode, SettingsField, Theme, Toast, View};
pub use dashboard_state::{CoinState, DashboardState, normalize_symbol};
pub use notification_state::{Notification, NotificationKind, NotificationState};
pub use picker_state::{CoinPickerState, SelectAllState};

use crate::api::{Analysis, RemotePrefs, RemoteSettings, SignalHistory};
use crate::config::Config;
use crate::error::Result;
use crate::storage::Snapshot;
use rust_decimal::Decimal;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

/// How long a toast stays on screen.
const TOAST_DURATION: Duration = Duration::from_secs(4);

/// Actions that can be dispatched to modify state.
#[derive(Debug, Clone)]
pub enum Action {
    // Navigation
    SetView(View),
    SetInputMode(InputMode),
    ToggleHelp,
    ToggleNotificationPanel,
    ToggleTheme,
    ScrollUp,
    ScrollDown,
    GoToTop,
    GoToBottom,

    // Text input
    InputChar(char),
    InputBackspace,
    CursorLeft,
    CursorRight,
    SubmitInput,
    CancelInput,
    BeginEdit(SettingsField),

    // Boot
    RestoreSnapshot(Snapshot),
    SettingsLoaded(RemoteSettings),
    PrefsLoaded(RemotePrefs),

    // Coin subscriptions
    AddCoin(String),
    RemoveCoin(String),
    ToggleCoin(String),
    ToggleAllCoins,

    // Data refresh
    PollTick,
    RefreshCoin(String),
    LoadSignals(String),
    PriceLoaded { symbol: String, price: Decimal },
    AnalysisLoaded { symbol: String, analysis: Analysis },
    SignalsLoaded { symbol: String, history: SignalHistory },

    // Settings
    SubmitSettings { buy: Decimal, sell: Decimal },
    SettingsSaved { buy: Decimal, sell: Decimal },
    SetSoundEnabled(bool),

    // Notifications
    Notify(Notification),
    DismissNotification(String),
    ClearNotifications,

    // Maintenance
    ExportCsv(String),
    ClearState,

    // Status
    SetConnected(bool),
    SetError(String),
    ClearError,

    // Quit
    Quit,
}

/// The global state store.
#[derive(Debug)]
pub struct Store {
    /// Application state.
    pub app: AppState,
    /// Thresholds and coin subscriptions.
    pub dashboard: DashboardState,
    /// Coin picker.
    pub picker: CoinPickerState,
    /// Notification log.
    pub notifications: NotificationState,
    /// Thresholds restored by `ClearState`.
    default_thresholds: (Decimal, Decimal),
    /// Maximum history lines kept per coin.
    max_history_lines: usize,
    /// Action sender for dispatching actions.
    action_tx: mpsc::UnboundedSender<Action>,
}

impl Store {
    /// Create a new store with the given action sender.
    pub fn new(action_tx: mpsc::UnboundedSender<Action>, config: &Config) -> Self {
        let buy = config.signal.buy_threshold_percent;
        let sell = config.signal.sell_threshold_percent;
        let app = AppState {
            theme: if config.ui.dark_mode {
                Theme::Dark
            } else {
                Theme::Light
            },
            ..AppState::default()
        };

        Self {
            app,
            dashboard: DashboardState::new(buy, sell),
            picker: CoinPickerState::new(config.coins.universe.clone()),
            notifications: NotificationState::default(),
            default_thresholds: (buy, sell),
            max_history_lines: config.ui.max_history_lines,
            action_tx,
        }
    }

    /// Dispatch an action to the store.
    pub fn dispatch(&self, action: Action) -> Result<()> {
        self.action_tx
            .send(action)
            .map_err(|e| crate::Error::channel(e.to_string()))
    }

    /// A sender for background tasks.
    pub fn sender(&self) -> mpsc::UnboundedSender<Action> {
        self.action_tx.clone()
    }

    /// Drop the toast once it has been shown long enough.
    pub fn expire_toast(&mut self, now: Instant) {
        if self.app.toast.as_ref().is_some_and(|t| t.is_expired(now)) {
            self.app.toast = None;
        }
    }

    /// Apply an action to update state.
    ///
    /// Actions with side effects (network, storage) are handled by the
    /// controller, which calls this for their state part.
    pub fn reduce(&mut self, action: Action) {
        match action {
            // Navigation
            Action::SetView(view) => {
                self.app.current_view = view;
                self.app.show_help = false;
            }
            Action::SetInputMode(mode) => {
                if mode == InputMode::Search {
                    self.app.set_input(self.picker.filter.clone());
                }
                self.app.input_mode = mode;
            }
            Action::ToggleHelp => self.app.show_help = !self.app.show_help,
            Action::ToggleNotificationPanel => {
                self.app.show_notifications = !self.app.show_notifications;
                self.notifications.selected_index = if self.app.show_notifications
                    && self.notifications.count() > 0
                {
                    Some(0)
                } else {
                    None
                };
            }
            Action::ToggleTheme => self.app.theme = self.app.theme.toggled(),
            Action::ScrollUp => self.scroll(-1),
            Action::ScrollDown => self.scroll(1),
            Action::GoToTop => self.scroll(i32::MIN / 2),
            Action::GoToBottom => self.scroll(i32::MAX / 2),

            // Text input
            Action::InputChar(c) => {
                self.app.push_char(c);
                self.sync_search();
            }
            Action::InputBackspace => {
                self.app.pop_char();
                self.sync_search();
            }
            Action::CursorLeft => self.app.cursor_left(),
            Action::CursorRight => self.app.cursor_right(),
            Action::SubmitInput => {
                self.app.input_mode = InputMode::Normal;
                self.app.clear_input();
            }
            Action::CancelInput => {
                if self.app.input_mode == InputMode::Search {
                    self.picker.set_filter("");
                }
                self.app.input_mode = InputMode::Normal;
                self.app.clear_input();
            }
            Action::BeginEdit(field) => {
                let current = match field {
                    SettingsField::BuyThreshold => self.dashboard.buy_threshold_percent,
                    SettingsField::SellThreshold => self.dashboard.sell_threshold_percent,
                    SettingsField::Sound => return,
                };
                self.app.settings_field = field;
                self.app.set_input(current.to_string());
                self.app.input_mode = InputMode::Editing;
            }

            // Boot
            Action::RestoreSnapshot(snapshot) => self.dashboard.apply_snapshot(snapshot),
            Action::SettingsLoaded(settings) => {
                if let Some(buy) = settings.buy_threshold {
                    self.dashboard.buy_threshold_percent = buy;
                }
                if let Some(sell) = settings.sell_threshold {
                    self.dashboard.sell_threshold_percent = sell;
                }
            }
            Action::PrefsLoaded(prefs) => {
                self.notifications.sound_enabled = prefs.notif_sound.unwrap_or(false);
            }

            // Coin subscriptions
            Action::AddCoin(symbol) => {
                self.dashboard.add_coin(&normalize_symbol(&symbol));
            }
            Action::RemoveCoin(symbol) => {
                self.dashboard.remove_coin(&normalize_symbol(&symbol));
            }
            Action::ToggleCoin(symbol) => {
                let symbol = normalize_symbol(&symbol);
                if !self.dashboard.remove_coin(&symbol) {
                    self.dashboard.add_coin(&symbol);
                }
            }
            Action::ToggleAllCoins => {
                let (target, symbols) = self.picker.select_all_targets(&self.dashboard);
                for symbol in symbols {
                    if target {
                        self.dashboard.add_coin(&symbol);
                    } else {
                        self.dashboard.remove_coin(&symbol);
                    }
                }
            }

            // Data refresh
            Action::PollTick => self.app.poll_ticks += 1,
            Action::RefreshCoin(_) | Action::LoadSignals(_) => {}
            Action::PriceLoaded { symbol, price } => {
                if let Some(coin) = self.dashboard.coin_mut(&symbol) {
                    coin.price = Some(price);
                    coin.price_updated = Some(chrono::Utc::now());
                }
                self.app.connected = true;
            }
            Action::AnalysisLoaded { symbol, analysis } => {
                if let Some(coin) = self.dashboard.coin_mut(&symbol) {
                    coin.analysis = Some(analysis);
                }
            }
            Action::SignalsLoaded { symbol, history } => {
                self.dashboard
                    .apply_signals(&symbol, history, self.max_history_lines);
            }

            // Settings
            Action::SubmitSettings { .. } => {}
            Action::SettingsSaved { buy, sell } => {
                self.dashboard.buy_threshold_percent = buy;
                self.dashboard.sell_threshold_percent = sell;
            }
            Action::SetSoundEnabled(enabled) => self.notifications.sound_enabled = enabled,

            // Notifications
            Action::Notify(notification) => {
                self.app.toast = Some(Toast {
                    text: notification.text.clone(),
                    kind: notification.kind,
                    shown_at: Instant::now(),
                    duration: TOAST_DURATION,
                });
                self.notifications.push(notification);
            }
            Action::DismissNotification(id) => {
                self.notifications.remove(&id);
            }
            Action::ClearNotifications => self.notifications.clear(),

            // Maintenance
            Action::ExportCsv(_) => {}
            Action::ClearState => {
                let (buy, sell) = self.default_thresholds;
                self.dashboard.reset(buy, sell);
                self.notifications.clear();
                self.app.toast = None;
            }

            // Status
            Action::SetConnected(connected) => self.app.connected = connected,
            Action::SetError(error) => self.app.error = Some(error),
            Action::ClearError => self.app.error = None,

            // Quit
            Action::Quit => self.app.should_quit = true,
        }

        self.picker.clamp();
    }

    fn sync_search(&mut self) {
        if self.app.input_mode == InputMode::Search {
            self.picker.set_filter(self.app.input_buffer.clone());
        }
    }

    fn scroll(&mut self, delta: i32) {
        fn step(current: usize, delta: i32, len: usize) -> usize {
            let max = len.saturating_sub(1) as i64;
            (current as i64 + delta as i64).clamp(0, max) as usize
        }

        if self.app.show_notifications {
            let len = self.notifications.count();
            if len > 0 {
                let current = self.notifications.selected_index.unwrap_or(0);
                self.notifications.selected_index = Some(step(current, delta, len));
            }
            return;
        }

        match self.app.current_view {
            View::Dashboard => {
                let len = self.dashboard.coins.len();
                if len > 0 {
                    let current = self.dashboard.selected_index.unwrap_or(0);
                    self.dashboard.selected_index = Some(step(current, delta, len));
                }
            }
            View::Coins => {
                let len = self.picker.visible().len();
                self.picker.selected_index = step(self.picker.selected_index, delta, len);
            }
            View::Settings => {
                let index = SettingsField::ALL
                    .iter()
                    .position(|f| *f == self.app.settings_field)
                    .unwrap_or(0);
                let next = step(index, delta, SettingsField::ALL.len());
                self.app.settings_field = SettingsField::ALL[next];
            }
        }
    }
}
