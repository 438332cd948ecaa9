//! Configuration settings for P-Plus.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable prefix for overrides, e.g. `PPLUS_API__BASE_URL`.
const ENV_PREFIX: &str = "PPLUS";

/// Main configuration struct.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// API configuration.
    pub api: ApiConfig,
    /// Polling loop configuration.
    pub poll: PollConfig,
    /// Signal heuristic configuration.
    pub signal: SignalConfig,
    /// Tracked coin universe.
    pub coins: CoinsConfig,
    /// Local storage configuration.
    pub storage: StorageConfig,
    /// Offline response cache configuration.
    pub cache: CacheConfig,
    /// UI configuration.
    pub ui: UiConfig,
    /// Key bindings.
    pub keybindings: KeyBindings,
    /// Theme configuration.
    pub theme: ThemeConfig,
}

impl Config {
    /// Load configuration from the default location, falling back to defaults.
    pub fn load_or_default() -> crate::Result<Self> {
        Self::load(None)
    }

    /// Load configuration from a TOML file layered with `PPLUS_*` environment overrides.
    ///
    /// A missing file is not an error; every section falls back to its defaults.
    pub fn load(path: Option<PathBuf>) -> crate::Result<Self> {
        let config_path = path.unwrap_or_else(Self::default_path);

        let settings = config::Config::builder()
            .add_source(config::File::from(config_path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file.
    pub fn save(&self, path: Option<PathBuf>) -> crate::Result<()> {
        let config_path = path.unwrap_or_else(Self::default_path);

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content =
            toml::to_string_pretty(self).map_err(|e| crate::Error::config(e.to_string()))?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    /// Reject values the rest of the application cannot work with.
    pub fn validate(&self) -> crate::Result<()> {
        if !(0.0..=1.0).contains(&self.signal.buy_probability) {
            return Err(crate::Error::config(format!(
                "signal.buy_probability must be within [0, 1], got {}",
                self.signal.buy_probability
            )));
        }
        if self.poll.interval_secs == 0 {
            return Err(crate::Error::config("poll.interval_secs must be positive"));
        }
        if self.poll.analysis_every == 0 {
            return Err(crate::Error::config("poll.analysis_every must be positive"));
        }
        Ok(())
    }

    fn default_path() -> PathBuf {
        super::config_dir()
            .map(|p| p.join("config.toml"))
            .unwrap_or_else(|_| PathBuf::from("config.toml"))
    }
}

/// API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Dashboard API base URL.
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Timeframes requested from the analysis endpoint.
    pub analysis_intervals: Vec<String>,
    /// Candle count requested from the analysis endpoint.
    pub analysis_limit: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            timeout_secs: 10,
            analysis_intervals: vec!["5m".to_string(), "15m".to_string(), "1h".to_string()],
            analysis_limit: 200,
        }
    }
}

/// Polling loop configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PollConfig {
    /// Seconds between price refreshes.
    pub interval_secs: u64,
    /// Analysis is refreshed every N price ticks.
    pub analysis_every: u64,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_secs: 5,
            analysis_every: 3,
        }
    }
}

/// Signal heuristic configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalConfig {
    /// Probability of opening a position on a tick with no open position.
    pub buy_probability: f64,
    /// Default buy threshold (percent).
    pub buy_threshold_percent: Decimal,
    /// Default sell threshold (percent).
    pub sell_threshold_percent: Decimal,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            buy_probability: 0.08,
            buy_threshold_percent: dec!(1.0),
            sell_threshold_percent: dec!(1.5),
        }
    }
}

/// Tracked coin universe.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CoinsConfig {
    /// Every symbol offered in the coin picker.
    pub universe: Vec<String>,
    /// Selection used when the server has no saved preference.
    pub default_selection: Vec<String>,
}

impl Default for CoinsConfig {
    fn default() -> Self {
        let universe = [
            "BTC", "ETH", "BNB", "SOL", "XRP", "ADA", "DOGE", "TON", "AVAX", "DOT",
        ];
        Self {
            universe: universe.iter().map(|s| s.to_string()).collect(),
            default_selection: universe[..3].iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Local storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Mirror state into local storage.
    pub enabled: bool,
    /// Storage file (defaults to `<data_dir>/local_storage.json`).
    pub path: Option<PathBuf>,
    /// Key holding the state snapshot.
    pub state_key: String,
    /// Key holding the theme choice.
    pub theme_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: None,
            state_key: "p-plus-state".to_string(),
            theme_key: "theme".to_string(),
        }
    }
}

impl StorageConfig {
    /// Resolve the storage file path.
    pub fn resolved_path(&self) -> PathBuf {
        self.path.clone().unwrap_or_else(|| {
            super::data_dir()
                .map(|p| p.join("local_storage.json"))
                .unwrap_or_else(|_| PathBuf::from("local_storage.json"))
        })
    }
}

/// Offline response cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Route GET requests through the offline cache.
    pub enabled: bool,
    /// Current cache version name; other names are purged on activation.
    pub name: String,
    /// Path prefixes served network-first.
    pub api_prefixes: Vec<String>,
    /// Path prefixes served cache-first.
    pub static_prefixes: Vec<String>,
    /// Exact navigation paths served cache-first.
    pub navigation_paths: Vec<String>,
    /// Paths fetched into the cache on install.
    pub precache: Vec<String>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        let strings = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        Self {
            enabled: true,
            name: "pplus-cache-v1".to_string(),
            api_prefixes: strings(&["/api/"]),
            static_prefixes: strings(&["/static/"]),
            navigation_paths: strings(&["/", "/panel"]),
            precache: strings(&["/", "/panel", "/static/manifest.webmanifest"]),
        }
    }
}

/// UI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Input poll rate in milliseconds.
    pub tick_rate_ms: u64,
    /// Enable mouse support.
    pub mouse_support: bool,
    /// Start in dark mode when no theme was saved.
    pub dark_mode: bool,
    /// Maximum signal history lines shown per coin card.
    pub max_history_lines: usize,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: 100,
            mouse_support: true,
            dark_mode: true,
            max_history_lines: 50,
        }
    }
}

/// Key bindings configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    /// Quit the application.
    pub quit: String,
    /// Show help.
    pub help: String,
    /// Navigate up.
    pub up: String,
    /// Navigate down.
    pub down: String,
    /// Select/confirm.
    pub select: String,
    /// Cancel/back.
    pub back: String,
    /// Refresh the selected coin.
    pub refresh: String,
    /// Switch to the dashboard view.
    pub dashboard: String,
    /// Switch to the coin picker.
    pub coins: String,
    /// Switch to the settings view.
    pub settings: String,
    /// Search the coin picker.
    pub search: String,
    /// Toggle the coin under the cursor.
    pub toggle_coin: String,
    /// Toggle every visible coin.
    pub select_all: String,
    /// Remove the selected coin card.
    pub remove_coin: String,
    /// Export the selected coin's signals as CSV.
    pub export_csv: String,
    /// Open/close the notification panel.
    pub notifications: String,
    /// Delete the selected notification.
    pub delete_notification: String,
    /// Clear every notification.
    pub clear_notifications: String,
    /// Toggle dark/light theme.
    pub theme: String,
    /// Toggle the notification sound.
    pub sound: String,
    /// Clear all persisted state.
    pub clear_state: String,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            quit: "q".to_string(),
            help: "?".to_string(),
            up: "k".to_string(),
            down: "j".to_string(),
            select: "Enter".to_string(),
            back: "Esc".to_string(),
            refresh: "r".to_string(),
            dashboard: "1".to_string(),
            coins: "2".to_string(),
            settings: "3".to_string(),
            search: "/".to_string(),
            toggle_coin: "Space".to_string(),
            select_all: "a".to_string(),
            remove_coin: "x".to_string(),
            export_csv: "e".to_string(),
            notifications: "n".to_string(),
            delete_notification: "d".to_string(),
            clear_notifications: "c".to_string(),
            theme: "t".to_string(),
            sound: "s".to_string(),
            clear_state: "Ctrl+r".to_string(),
        }
    }
}

/// Theme configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    /// Palette used in dark mode.
    pub dark: Palette,
    /// Palette used in light mode.
    pub light: Palette,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            dark: Palette::default(),
            light: Palette {
                primary: "#2563eb".to_string(),
                accent: "#ea580c".to_string(),
                success: "#16a34a".to_string(),
                warning: "#ca8a04".to_string(),
                error: "#dc2626".to_string(),
                background: "#f9fafb".to_string(),
                foreground: "#111827".to_string(),
                muted: "#6b7280".to_string(),
                border: "#d1d5db".to_string(),
                selection: "#e5e7eb".to_string(),
            },
        }
    }
}

/// A color palette (hex strings).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub primary: String,
    pub accent: String,
    pub success: String,
    pub warning: String,
    pub error: String,
    pub background: String,
    pub foreground: String,
    pub muted: String,
    pub border: String,
    pub selection: String,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            primary: "#5c6bc0".to_string(),
            accent: "#ff7043".to_string(),
            success: "#66bb6a".to_string(),
            warning: "#ffa726".to_string(),
            error: "#ef5350".to_string(),
            background: "#1e1e2e".to_string(),
            foreground: "#cdd6f4".to_string(),
            muted: "#9399b2".to_string(),
            border: "#45475a".to_string(),
            selection: "#585b70".to_string(),
        }
    }
}
