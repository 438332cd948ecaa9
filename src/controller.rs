//! Effectful action handling.
//!
//! The [`Controller`] owns the [`Store`] and sits between the event loop and
//! the reducer: actions that need the network, local storage or the signal
//! detector are handled here, and their state part is delegated to
//! [`Store::reduce`]. Network calls run on spawned tasks that report back by
//! sending further actions, so results are applied in completion order.

use crate::api::{DashboardApi, PrefsUpdate, SettingsUpdate};
use crate::config::Config;
use crate::error::Result;
use crate::poller::Poller;
use crate::signal::{SignalDetector, SignalEvent};
use crate::state::{
    Action, InputMode, Notification, SettingsField, Store, Theme, normalize_symbol,
    sync::{coins_to_replay, should_replay_prefs},
};
use crate::storage::SnapshotStore;
use rust_decimal::Decimal;
use std::future::Future;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Applies actions to the store and runs their side effects.
pub struct Controller {
    store: Store,
    api: Arc<dyn DashboardApi>,
    snapshots: Option<SnapshotStore>,
    detector: SignalDetector,
    poller: Poller,
    config: Config,
    /// Replay server coin selection once prefs arrive.
    replay_prefs: bool,
    /// Where CSV exports are written.
    export_dir: PathBuf,
}

impl Controller {
    pub fn new(
        store: Store,
        api: Arc<dyn DashboardApi>,
        snapshots: Option<SnapshotStore>,
        detector: SignalDetector,
        config: Config,
        export_dir: PathBuf,
    ) -> Self {
        Self {
            store,
            api,
            snapshots,
            detector,
            poller: Poller::new(config.poll.analysis_every),
            config,
            replay_prefs: false,
            export_dir,
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut Store {
        &mut self.store
    }

    /// Restore local state and start the initial loads.
    pub fn boot(&mut self) {
        let local = self.snapshots.as_ref().and_then(|s| s.load());
        self.replay_prefs = should_replay_prefs(local.as_ref());
        if let Some(snapshot) = local {
            info!("Restored {} coins from local storage", snapshot.active_coins.len());
            self.store.reduce(Action::RestoreSnapshot(snapshot));
        }

        if let Some(theme) = self.load_theme() {
            self.store.app.theme = theme;
        }

        let api = self.api.clone();
        let tx = self.store.sender();
        self.spawn("load settings", async move {
            let settings = api.settings().await?;
            send(&tx, Action::SettingsLoaded(settings));
            Ok(())
        });

        let api = self.api.clone();
        let tx = self.store.sender();
        self.spawn("load prefs", async move {
            let prefs = api.prefs().await?;
            send(&tx, Action::PrefsLoaded(prefs));
            Ok(())
        });

        for symbol in self.store.dashboard.symbols() {
            self.load_coin(&symbol);
        }
    }

    /// Handle one action.
    pub fn handle_action(&mut self, action: Action) -> Result<()> {
        match action {
            Action::SettingsLoaded(settings) => {
                self.store.reduce(Action::SettingsLoaded(settings));
                self.persist();
            }
            Action::PrefsLoaded(prefs) => {
                let replay = std::mem::take(&mut self.replay_prefs);
                let coins = coins_to_replay(&prefs, &self.config.coins.default_selection);
                self.store.reduce(Action::PrefsLoaded(prefs));
                if replay {
                    debug!("Replaying {} coins from server prefs", coins.len());
                    for symbol in coins {
                        self.add_coin(&symbol);
                    }
                    self.persist();
                }
            }

            Action::AddCoin(symbol) => {
                if self.add_coin(&normalize_symbol(&symbol)) {
                    self.persist();
                }
            }
            Action::RemoveCoin(symbol) => {
                let symbol = normalize_symbol(&symbol);
                if self.store.dashboard.is_active(&symbol) {
                    self.store.reduce(Action::RemoveCoin(symbol));
                    self.persist();
                    self.save_selection();
                }
            }
            Action::ToggleCoin(symbol) => {
                let symbol = normalize_symbol(&symbol);
                if symbol.is_empty() {
                    return Ok(());
                }
                if !self.add_coin(&symbol) {
                    self.store.reduce(Action::RemoveCoin(symbol));
                }
                self.persist();
                self.save_selection();
            }
            Action::ToggleAllCoins => {
                let (target, symbols) = self
                    .store
                    .picker
                    .select_all_targets(&self.store.dashboard);
                if symbols.is_empty() {
                    return Ok(());
                }
                self.store.reduce(Action::ToggleAllCoins);
                if target {
                    for symbol in &symbols {
                        self.load_coin(symbol);
                    }
                }
                self.persist();
                self.save_selection();
            }

            Action::PollTick => {
                self.store.reduce(Action::PollTick);
                let analysis_due = self.poller.advance();
                for symbol in self.store.dashboard.symbols() {
                    self.load_price(&symbol);
                    if analysis_due {
                        self.load_analysis(&symbol);
                    }
                }
            }
            Action::RefreshCoin(symbol) => {
                if self.store.dashboard.is_active(&symbol) {
                    self.load_price(&symbol);
                    self.load_analysis(&symbol);
                }
            }
            Action::LoadSignals(symbol) => self.load_signals(&symbol),
            Action::SignalsLoaded { symbol, history } => {
                let active = self.store.dashboard.is_active(&symbol);
                self.store.reduce(Action::SignalsLoaded { symbol, history });
                if active {
                    self.persist();
                }
            }
            Action::PriceLoaded { symbol, price } => self.on_price(symbol, price),

            Action::SubmitInput => self.submit_input(),
            Action::SubmitSettings { buy, sell } => {
                let api = self.api.clone();
                let tx = self.store.sender();
                self.spawn("save settings", async move {
                    let update = SettingsUpdate {
                        buy_threshold: buy,
                        sell_threshold: sell,
                    };
                    match api.save_settings(update).await {
                        Ok(()) => {
                            send(&tx, Action::SettingsSaved { buy, sell });
                            send(&tx, Action::Notify(Notification::info("Settings saved")));
                        }
                        Err(e) => {
                            warn!("Failed to save settings: {}", e);
                            send(
                                &tx,
                                Action::Notify(Notification::info("Failed to save settings")),
                            );
                        }
                    }
                    Ok(())
                });
            }
            Action::SettingsSaved { buy, sell } => {
                self.store.reduce(Action::SettingsSaved { buy, sell });
                self.persist();
            }
            Action::SetSoundEnabled(enabled) => {
                self.store.reduce(Action::SetSoundEnabled(enabled));
                let api = self.api.clone();
                self.spawn("save sound preference", async move {
                    api.save_prefs(PrefsUpdate::sound(enabled)).await
                });
            }

            Action::ExportCsv(symbol) => self.export_csv(symbol),
            Action::ClearState => {
                self.store.reduce(Action::ClearState);
                self.poller.reset();
                if let Some(snapshots) = &self.snapshots {
                    if let Err(e) = snapshots.clear() {
                        warn!("Failed to clear local state: {}", e);
                    }
                }
                info!("Local state cleared");
            }
            Action::ToggleTheme => {
                self.store.reduce(Action::ToggleTheme);
                self.save_theme(self.store.app.theme);
            }

            other => self.store.reduce(other),
        }

        Ok(())
    }

    /// Subscribe to a coin and start its loads. Returns false if already active.
    fn add_coin(&mut self, symbol: &str) -> bool {
        if symbol.is_empty() || self.store.dashboard.is_active(symbol) {
            return false;
        }
        self.store.reduce(Action::AddCoin(symbol.to_string()));
        self.load_coin(symbol);
        true
    }

    fn on_price(&mut self, symbol: String, price: Decimal) {
        if price.is_zero() || !self.store.dashboard.is_active(&symbol) {
            return;
        }
        self.store.reduce(Action::PriceLoaded {
            symbol: symbol.clone(),
            price,
        });

        let threshold = self.store.dashboard.sell_threshold_percent;
        let Some(coin) = self.store.dashboard.coin_mut(&symbol) else {
            return;
        };
        let events = self
            .detector
            .evaluate(&symbol, price, &mut coin.last_buy_price, threshold);
        if events.is_empty() {
            return;
        }

        for event in &events {
            info!("{}", event.message());
            self.store.reduce(Action::Notify(Notification::from(event)));
            self.save_signal(event);
        }
        self.persist();
    }

    fn save_signal(&self, event: &SignalEvent) {
        let api = self.api.clone();
        let tx = self.store.sender();
        let SignalEvent {
            symbol,
            kind,
            price,
        } = event.clone();
        self.spawn("save signal", async move {
            api.save_signal(&symbol, kind, price).await?;
            send(&tx, Action::LoadSignals(symbol));
            Ok(())
        });
    }

    /// Commit the edit buffer of the settings form.
    fn submit_input(&mut self) {
        if self.store.app.input_mode != InputMode::Editing {
            self.store.reduce(Action::SubmitInput);
            return;
        }

        let field = self.store.app.settings_field;
        let input = self.store.app.input_buffer.trim().to_string();
        self.store.reduce(Action::SubmitInput);

        let mut buy = self.store.dashboard.buy_threshold_percent;
        let mut sell = self.store.dashboard.sell_threshold_percent;
        if !input.is_empty() {
            let Ok(value) = Decimal::from_str(&input) else {
                self.store.reduce(Action::Notify(Notification::info(format!(
                    "Invalid threshold: {}",
                    input
                ))));
                return;
            };
            match field {
                SettingsField::BuyThreshold => buy = value,
                SettingsField::SellThreshold => sell = value,
                SettingsField::Sound => return,
            }
        }

        // Routed through the channel so the save runs like any other submit.
        if let Err(e) = self.store.dispatch(Action::SubmitSettings { buy, sell }) {
            warn!("Failed to queue settings save: {}", e);
        }
    }

    fn export_csv(&self, symbol: String) {
        let symbol = normalize_symbol(&symbol);
        let api = self.api.clone();
        let tx = self.store.sender();
        let path = self.export_dir.join(format!("{}_signals.csv", symbol));
        self.spawn("export csv", async move {
            let outcome = async {
                let csv = api.signals_csv(&symbol).await?;
                if let Some(dir) = path.parent() {
                    tokio::fs::create_dir_all(dir).await?;
                }
                tokio::fs::write(&path, csv).await?;
                Ok::<_, crate::Error>(())
            }
            .await;

            let text = match outcome {
                Ok(()) => format!("Exported {}", path.display()),
                Err(e) => {
                    warn!("CSV export for {} failed: {}", symbol, e);
                    format!("CSV export for {} failed", symbol)
                }
            };
            send(&tx, Action::Notify(Notification::info(text)));
            Ok(())
        });
    }

    fn load_coin(&self, symbol: &str) {
        self.load_signals(symbol);
        self.load_price(symbol);
        self.load_analysis(symbol);
    }

    fn load_signals(&self, symbol: &str) {
        let api = self.api.clone();
        let tx = self.store.sender();
        let symbol = symbol.to_string();
        self.spawn("load signals", async move {
            let history = api.signals(&symbol).await?;
            send(&tx, Action::SignalsLoaded { symbol, history });
            Ok(())
        });
    }

    fn load_price(&self, symbol: &str) {
        let api = self.api.clone();
        let tx = self.store.sender();
        let symbol = symbol.to_string();
        self.spawn("load price", async move {
            match api.price(&symbol).await {
                Ok(quote) => {
                    if let Some(price) = quote.usable() {
                        send(&tx, Action::PriceLoaded { symbol, price });
                    }
                    Ok(())
                }
                Err(e) => {
                    send(&tx, Action::SetConnected(false));
                    Err(e)
                }
            }
        });
    }

    fn load_analysis(&self, symbol: &str) {
        let api = self.api.clone();
        let tx = self.store.sender();
        let symbol = symbol.to_string();
        self.spawn("load analysis", async move {
            let analysis = api.analysis(&symbol).await?;
            send(&tx, Action::AnalysisLoaded { symbol, analysis });
            Ok(())
        });
    }

    /// Post the full coin selection to the server.
    fn save_selection(&self) {
        let api = self.api.clone();
        let coins = self.store.dashboard.symbols();
        self.spawn("save coin selection", async move {
            api.save_prefs(PrefsUpdate::coins(coins)).await
        });
    }

    /// Write the thresholds and coins to local storage.
    fn persist(&self) {
        if let Some(snapshots) = &self.snapshots {
            if let Err(e) = snapshots.save(&self.store.dashboard.to_snapshot()) {
                warn!("Failed to persist state: {}", e);
            }
        }
    }

    fn load_theme(&self) -> Option<Theme> {
        let storage = self.snapshots.as_ref()?.storage();
        match storage.get(&self.config.storage.theme_key) {
            Ok(value) => value.as_deref().and_then(Theme::parse),
            Err(e) => {
                warn!("Failed to read theme: {}", e);
                None
            }
        }
    }

    fn save_theme(&self, theme: Theme) {
        let Some(snapshots) = &self.snapshots else {
            return;
        };
        if let Err(e) = snapshots
            .storage()
            .set(&self.config.storage.theme_key, theme.as_str())
        {
            warn!("Failed to save theme: {}", e);
        }
    }

    /// Run a network task; its failure is logged and otherwise ignored.
    fn spawn<F>(&self, what: &'static str, task: F)
    where
        F: Future<Output = Result<()>> + Send + 'static,
    {
        tokio::spawn(async move {
            if let Err(e) = task.await {
                debug!("{} failed: {}", what, e);
            }
        });
    }
}

fn send(tx: &mpsc::UnboundedSender<Action>, action: Action) {
    if tx.send(action).is_err() {
        debug!("Action channel closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{
        ApiClientBuilder, MockDashboardApi, OfflineCache, PriceQuote, RemotePrefs,
        RemoteSettings, SignalHistory,
    };
    use crate::config::ApiConfig;
    use crate::error::Error;
    use crate::signal::{RandomEntry, SignalKind};
    use crate::state::NotificationKind;
    use crate::storage::{CoinSnapshot, LocalStorage, Snapshot};
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use std::time::Duration;
    use tempfile::TempDir;

    struct Harness {
        controller: Controller,
        rx: mpsc::UnboundedReceiver<Action>,
        snapshots: SnapshotStore,
        _dir: TempDir,
    }

    fn harness(api: MockDashboardApi, buy_probability: f64) -> Harness {
        harness_with(Arc::new(api), buy_probability)
    }

    fn harness_with(api: Arc<dyn DashboardApi>, buy_probability: f64) -> Harness {
        let dir = TempDir::new().unwrap();
        let config = Config::default();
        let storage = LocalStorage::open(dir.path().join("local_storage.json"));
        let snapshots = SnapshotStore::new(storage, config.storage.state_key.clone());
        let (tx, rx) = mpsc::unbounded_channel();
        let store = Store::new(tx, &config);
        let controller = Controller::new(
            store,
            api,
            Some(snapshots.clone()),
            SignalDetector::new(RandomEntry::with_seed(buy_probability, 7)),
            config,
            dir.path().join("exports"),
        );
        Harness {
            controller,
            rx,
            snapshots,
            _dir: dir,
        }
    }

    /// Feed every queued action back through the controller until idle.
    async fn drain(h: &mut Harness) {
        drain_for(h, Duration::from_millis(100)).await;
    }

    async fn drain_for(h: &mut Harness, idle: Duration) {
        while let Ok(Some(action)) = tokio::time::timeout(idle, h.rx.recv()).await {
            h.controller.handle_action(action).unwrap();
        }
    }

    /// Receive queued actions without applying them.
    async fn collect(h: &mut Harness, idle: Duration) -> Vec<Action> {
        let mut actions = Vec::new();
        while let Ok(Some(action)) = tokio::time::timeout(idle, h.rx.recv()).await {
            actions.push(action);
        }
        actions
    }

    fn offline() -> Error {
        Error::application("offline")
    }

    fn quiet_coin_loads(api: &mut MockDashboardApi) {
        api.expect_signals()
            .returning(|_| Ok(SignalHistory::default()));
        api.expect_price().returning(|_| Err(offline()));
        api.expect_analysis().returning(|_| Err(offline()));
    }

    #[tokio::test]
    async fn test_boot_prefers_local_coins_and_server_thresholds() {
        let mut api = MockDashboardApi::new();
        api.expect_settings().returning(|| {
            Ok(RemoteSettings {
                buy_threshold: None,
                sell_threshold: Some(dec!(3)),
            })
        });
        api.expect_prefs().returning(|| {
            Ok(RemotePrefs {
                selected_coins: Some(vec!["DOT".into()]),
                notif_sound: Some(true),
            })
        });
        quiet_coin_loads(&mut api);

        let mut h = harness(api, 0.0);
        h.snapshots
            .save(&Snapshot {
                buy_threshold_percent: dec!(2),
                sell_threshold_percent: dec!(2),
                active_coins: [(
                    "SOL".to_string(),
                    CoinSnapshot {
                        last_buy_price: Some(dec!(150)),
                    },
                )]
                .into_iter()
                .collect(),
            })
            .unwrap();

        h.controller.boot();
        drain(&mut h).await;

        let store = h.controller.store();
        assert_eq!(store.dashboard.symbols(), vec!["SOL"]);
        assert_eq!(store.dashboard.buy_threshold_percent, dec!(2));
        assert_eq!(store.dashboard.sell_threshold_percent, dec!(3));
        assert!(store.notifications.sound_enabled);
        assert_eq!(
            h.snapshots.load().unwrap().sell_threshold_percent,
            dec!(3)
        );
    }

    #[tokio::test]
    async fn test_boot_replays_server_prefs_without_local_coins() {
        let mut api = MockDashboardApi::new();
        api.expect_settings().returning(|| Err(offline()));
        api.expect_prefs().returning(|| Ok(RemotePrefs::default()));
        quiet_coin_loads(&mut api);

        let mut h = harness(api, 0.0);
        h.controller.boot();
        drain(&mut h).await;

        let store = h.controller.store();
        assert_eq!(store.dashboard.symbols(), vec!["BTC", "ETH", "BNB"]);
        assert!(!store.notifications.sound_enabled);
        assert_eq!(h.snapshots.load().unwrap().active_coins.len(), 3);
    }

    #[tokio::test]
    async fn test_toggle_posts_full_selection() {
        let mut api = MockDashboardApi::new();
        quiet_coin_loads(&mut api);
        api.expect_save_prefs()
            .withf(|u| u.selected_coins == Some(vec!["BTC".to_string()]))
            .times(1)
            .returning(|_| Ok(()));
        api.expect_save_prefs()
            .withf(|u| u.selected_coins == Some(vec![]))
            .times(1)
            .returning(|_| Ok(()));

        let mut h = harness(api, 0.0);
        h.controller
            .handle_action(Action::ToggleCoin("btc".into()))
            .unwrap();
        drain(&mut h).await;
        h.controller
            .handle_action(Action::ToggleCoin("BTC".into()))
            .unwrap();
        drain(&mut h).await;

        assert!(h.controller.store().dashboard.coins.is_empty());
    }

    #[tokio::test]
    async fn test_price_opens_and_closes_with_zero_threshold() {
        let mut api = MockDashboardApi::new();
        quiet_coin_loads(&mut api);
        api.expect_save_signal()
            .withf(|s, _, p| s == "BTC" && *p == dec!(100))
            .times(2)
            .returning(|_, _, _| Ok(()));

        let mut h = harness(api, 1.0);
        h.controller.store_mut().reduce(Action::AddCoin("BTC".into()));
        h.controller.store_mut().dashboard.sell_threshold_percent = Decimal::ZERO;

        h.controller
            .handle_action(Action::PriceLoaded {
                symbol: "BTC".into(),
                price: dec!(100),
            })
            .unwrap();
        drain(&mut h).await;

        let store = h.controller.store();
        let kinds: Vec<_> = store.notifications.items.iter().map(|n| n.kind).collect();
        assert_eq!(kinds, vec![NotificationKind::Buy, NotificationKind::Sell]);
        assert_eq!(store.dashboard.coin("BTC").unwrap().last_buy_price, None);
    }

    #[tokio::test]
    async fn test_zero_price_is_ignored() {
        let mut h = harness(MockDashboardApi::new(), 1.0);
        h.controller.store_mut().reduce(Action::AddCoin("BTC".into()));
        h.controller
            .handle_action(Action::PriceLoaded {
                symbol: "BTC".into(),
                price: Decimal::ZERO,
            })
            .unwrap();

        let coin = h.controller.store().dashboard.coin("BTC").unwrap();
        assert_eq!(coin.price, None);
        assert_eq!(coin.last_buy_price, None);
    }

    #[tokio::test]
    async fn test_poll_loads_analysis_every_third_tick() {
        let mut api = MockDashboardApi::new();
        api.expect_price()
            .times(3)
            .returning(|_| Ok(PriceQuote { price: None }));
        api.expect_analysis().times(1).returning(|_| Err(offline()));

        let mut h = harness(api, 0.0);
        h.controller.store_mut().reduce(Action::AddCoin("ETH".into()));
        for _ in 0..3 {
            h.controller.handle_action(Action::PollTick).unwrap();
        }
        drain(&mut h).await;

        assert_eq!(h.controller.store().app.poll_ticks, 3);
    }

    #[tokio::test]
    async fn test_settings_submit_success_and_failure() {
        let mut api = MockDashboardApi::new();
        api.expect_save_settings()
            .withf(|u| u.sell_threshold == dec!(2.5))
            .times(1)
            .returning(|_| Ok(()));
        api.expect_save_settings()
            .withf(|u| u.sell_threshold == dec!(9))
            .times(1)
            .returning(|_| Err(Error::status(500, "/settings")));

        let mut h = harness(api, 0.0);
        h.controller
            .handle_action(Action::BeginEdit(SettingsField::SellThreshold))
            .unwrap();
        h.controller.store_mut().app.set_input("2.5");
        h.controller.handle_action(Action::SubmitInput).unwrap();
        drain(&mut h).await;

        assert_eq!(
            h.controller.store().dashboard.sell_threshold_percent,
            dec!(2.5)
        );
        assert_eq!(
            h.controller.store().notifications.latest().unwrap().text,
            "Settings saved"
        );

        h.controller
            .handle_action(Action::SubmitSettings {
                buy: dec!(1),
                sell: dec!(9),
            })
            .unwrap();
        drain(&mut h).await;

        let store = h.controller.store();
        assert_eq!(store.dashboard.sell_threshold_percent, dec!(2.5));
        assert_eq!(
            store.notifications.latest().unwrap().text,
            "Failed to save settings"
        );
    }

    #[tokio::test]
    async fn test_invalid_threshold_is_reported() {
        let mut h = harness(MockDashboardApi::new(), 0.0);
        h.controller
            .handle_action(Action::BeginEdit(SettingsField::BuyThreshold))
            .unwrap();
        h.controller.store_mut().app.set_input("abc");
        h.controller.handle_action(Action::SubmitInput).unwrap();

        let store = h.controller.store();
        assert_eq!(store.app.input_mode, InputMode::Normal);
        assert_eq!(
            store.notifications.latest().unwrap().text,
            "Invalid threshold: abc"
        );
    }

    #[tokio::test]
    async fn test_clear_state_removes_snapshot() {
        let mut api = MockDashboardApi::new();
        quiet_coin_loads(&mut api);
        let mut h = harness(api, 0.0);
        h.controller
            .handle_action(Action::AddCoin("ADA".into()))
            .unwrap();
        assert!(h.snapshots.load().is_some());

        h.controller.handle_action(Action::ClearState).unwrap();

        assert!(h.controller.store().dashboard.coins.is_empty());
        assert!(h.snapshots.load().is_none());
    }

    #[tokio::test]
    async fn test_theme_is_persisted() {
        let mut h = harness(MockDashboardApi::new(), 0.0);
        h.controller.handle_action(Action::ToggleTheme).unwrap();

        let stored = h.snapshots.storage().get("theme").unwrap();
        assert_eq!(stored.as_deref(), Some("light"));
    }

    #[tokio::test]
    async fn test_export_writes_csv_file() {
        let mut api = MockDashboardApi::new();
        api.expect_signals_csv()
            .returning(|_| Ok("type,price\nbuy,1\n".to_string()));

        let mut h = harness(api, 0.0);
        h.controller
            .handle_action(Action::ExportCsv("btc".into()))
            .unwrap();
        drain(&mut h).await;

        let path = h.controller.export_dir.join("BTC_signals.csv");
        assert_eq!(
            std::fs::read_to_string(path).unwrap(),
            "type,price\nbuy,1\n"
        );
        assert_eq!(
            h.controller.store().notifications.latest().unwrap().kind,
            NotificationKind::Info
        );
    }

    #[tokio::test]
    async fn test_signal_kind_reaches_api() {
        let mut api = MockDashboardApi::new();
        api.expect_save_signal()
            .withf(|_, k, _| *k == SignalKind::Buy)
            .times(1)
            .returning(|_, _, _| Err(offline()));

        let mut h = harness(api, 1.0);
        h.controller.store_mut().reduce(Action::AddCoin("XRP".into()));
        h.controller
            .handle_action(Action::PriceLoaded {
                symbol: "XRP".into(),
                price: dec!(0.5),
            })
            .unwrap();
        drain(&mut h).await;

        assert_eq!(
            h.controller.store().dashboard.coin("XRP").unwrap().last_buy_price,
            Some(dec!(0.5))
        );
    }

    #[tokio::test]
    async fn test_signal_history_reaches_snapshot() {
        let mut api = MockDashboardApi::new();
        api.expect_signals().returning(|_| {
            Ok(SignalHistory {
                last_open_buy: Some(dec!(42)),
                ..SignalHistory::default()
            })
        });
        api.expect_price().returning(|_| Err(offline()));
        api.expect_analysis().returning(|_| Err(offline()));
        api.expect_save_prefs().returning(|_| Ok(()));

        let mut h = harness(api, 0.0);
        h.controller
            .handle_action(Action::ToggleCoin("BTC".into()))
            .unwrap();
        drain(&mut h).await;

        assert_eq!(
            h.controller.store().dashboard.coin("BTC").unwrap().last_buy_price,
            Some(dec!(42))
        );
        let snapshot = h.snapshots.load().unwrap();
        assert_eq!(
            snapshot.active_coins.get("BTC").unwrap().last_buy_price,
            Some(dec!(42))
        );
    }

    #[tokio::test]
    async fn test_refresh_skips_signal_history() {
        let mut api = MockDashboardApi::new();
        api.expect_signals().never();
        api.expect_price()
            .times(1)
            .returning(|_| Ok(PriceQuote { price: None }));
        api.expect_analysis().times(1).returning(|_| Err(offline()));

        let mut h = harness(api, 0.0);
        h.controller.store_mut().reduce(Action::AddCoin("ETH".into()));
        h.controller
            .handle_action(Action::RefreshCoin("ETH".into()))
            .unwrap();
        drain(&mut h).await;
    }

    #[tokio::test]
    async fn test_failed_price_is_not_served_from_cache() {
        let mut server = mockito::Server::new_async().await;
        let ok = server
            .mock("GET", "/price/BTC")
            .with_status(200)
            .with_body(r#"{"price":100}"#)
            .create_async()
            .await;

        let config = Config::default();
        let client = ApiClientBuilder::new()
            .config(ApiConfig {
                base_url: server.url(),
                ..config.api.clone()
            })
            .cache(OfflineCache::new(config.cache.clone()))
            .build()
            .unwrap();

        let mut h = harness_with(Arc::new(client), 1.0);
        h.controller.store_mut().reduce(Action::AddCoin("BTC".into()));

        h.controller.handle_action(Action::PollTick).unwrap();
        drain_for(&mut h, Duration::from_millis(500)).await;
        assert_eq!(
            h.controller.store().dashboard.coin("BTC").unwrap().price,
            Some(dec!(100))
        );
        let notified = h.controller.store().notifications.items.len();

        ok.remove_async().await;
        server
            .mock("GET", "/price/BTC")
            .with_status(503)
            .create_async()
            .await;

        h.controller.handle_action(Action::PollTick).unwrap();
        let actions = collect(&mut h, Duration::from_millis(500)).await;
        assert!(
            !actions
                .iter()
                .any(|a| matches!(a, Action::PriceLoaded { .. }))
        );
        assert!(
            actions
                .iter()
                .any(|a| matches!(a, Action::SetConnected(false)))
        );

        for action in actions {
            h.controller.handle_action(action).unwrap();
        }
        let store = h.controller.store();
        assert!(!store.app.connected);
        assert_eq!(store.notifications.items.len(), notified);
    }
}
