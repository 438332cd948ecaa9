//! TUI widgets.

mod coin_cards;
mod coin_picker;
mod help;
mod notifications;
mod settings_panel;
mod status_bar;
mod tab_bar;

pub use coin_cards::CoinCards;
pub use coin_picker::CoinPicker;
pub use help::HelpPanel;
pub use notifications::{render_error, render_notification_panel, render_toast};
pub use settings_panel::SettingsPanel;
pub use status_bar::StatusBar;
pub use tab_bar::TabBar;
