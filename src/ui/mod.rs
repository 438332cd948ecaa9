//! UI rendering using ratatui.
//!
//! This module contains all TUI components and rendering logic.

mod layout;
mod theme;
mod widgets;

pub use layout::Layout;
pub use theme::{Colors, ThemeColors};
pub use widgets::{CoinCards, CoinPicker, HelpPanel, SettingsPanel, StatusBar, TabBar};

use crate::config::{Config, KeyBindings};
use crate::state::{Store, View};
use ratatui::Frame;
use ratatui::widgets::Block;

/// Main UI renderer.
pub struct Ui {
    colors: ThemeColors,
    keybindings: KeyBindings,
    intervals: Vec<String>,
}

impl Ui {
    pub fn new(config: &Config) -> Self {
        Self {
            colors: ThemeColors::new(&config.theme),
            keybindings: config.keybindings.clone(),
            intervals: config.api.analysis_intervals.clone(),
        }
    }

    /// Render the entire UI.
    pub fn render(&self, frame: &mut Frame, store: &Store) {
        let colors = self.colors.get(store.app.theme);
        let layout = Layout::new(frame.area());

        frame.render_widget(Block::default().style(colors.base()), frame.area());

        StatusBar::render(frame, layout.status_area, store, colors);
        TabBar::render(frame, layout.tab_area, store, colors);

        match store.app.current_view {
            View::Dashboard => {
                CoinCards::render(frame, layout.main_area, store, colors, &self.intervals)
            }
            View::Coins => CoinPicker::render(frame, layout.main_area, store, colors),
            View::Settings => SettingsPanel::render(frame, layout.main_area, store, colors),
        }

        if store.app.show_notifications {
            widgets::render_notification_panel(
                frame,
                layout.panel_area,
                &store.notifications,
                colors,
            );
        }

        if store.app.show_help {
            HelpPanel::render(frame, frame.area(), &self.keybindings, colors);
        }

        if let Some(toast) = &store.app.toast {
            widgets::render_toast(frame, layout.toast_area, toast, colors);
        }

        if let Some(error) = &store.app.error {
            widgets::render_error(frame, layout.toast_area, error, colors);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Action, Notification};
    use ratatui::{Terminal, backend::TestBackend};
    use rust_decimal_macros::dec;
    use tokio::sync::mpsc;

    fn screen(store: &Store) -> String {
        let ui = Ui::new(&Config::default());
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|frame| ui.render(frame, store)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn store() -> Store {
        let (tx, _rx) = mpsc::unbounded_channel();
        Store::new(tx, &Config::default())
    }

    #[test]
    fn test_dashboard_renders_coin_card() {
        let mut store = store();
        store.reduce(Action::AddCoin("BTC".into()));
        store.reduce(Action::PriceLoaded {
            symbol: "BTC".into(),
            price: dec!(50000),
        });

        let screen = screen(&store);
        assert!(screen.contains("BTC/USDT"));
        assert!(screen.contains("50000.00 $"));
    }

    #[test]
    fn test_every_view_renders() {
        let mut store = store();
        for view in [View::Dashboard, View::Coins, View::Settings] {
            store.reduce(Action::SetView(view));
            assert!(!screen(&store).is_empty());
        }
    }

    #[test]
    fn test_notification_panel_lists_entries() {
        let mut store = store();
        store.reduce(Action::Notify(Notification::info("Settings saved")));
        store.reduce(Action::ToggleNotificationPanel);

        let screen = screen(&store);
        assert!(screen.contains("Notifications (1)"));
        assert!(screen.contains("Settings saved"));
    }
}
