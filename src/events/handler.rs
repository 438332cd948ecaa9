//! Event handler for processing input events.

use super::InputEvent;
use crate::config::KeyBindings;
use crate::error::Result;
use crate::state::{Action, InputMode, SettingsField, Store, View};
use crossterm::event::{
    self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, MouseEvent, MouseEventKind,
};
use std::time::Duration;

/// Handles input events and produces actions.
pub struct EventHandler {
    /// Key bindings.
    keybindings: KeyBindings,
    /// How long to wait for terminal input per call.
    poll_timeout: Duration,
    /// Store reference for state-aware handling.
    store_snapshot: Option<StoreSnapshot>,
}

/// Snapshot of relevant store state for event handling.
#[derive(Clone, Debug)]
struct StoreSnapshot {
    input_mode: InputMode,
    current_view: View,
    show_help: bool,
    show_notifications: bool,
    selected_coin: Option<String>,
    picker_symbol: Option<String>,
    selected_notification: Option<String>,
    settings_field: SettingsField,
    sound_enabled: bool,
}

impl EventHandler {
    /// Create a new event handler.
    pub fn new(keybindings: KeyBindings, poll_timeout: Duration) -> Self {
        Self {
            keybindings,
            poll_timeout,
            store_snapshot: None,
        }
    }

    /// Update the store snapshot for state-aware event handling.
    pub fn update_store_snapshot(&mut self, store: &Store) {
        self.store_snapshot = Some(StoreSnapshot {
            input_mode: store.app.input_mode,
            current_view: store.app.current_view,
            show_help: store.app.show_help,
            show_notifications: store.app.show_notifications,
            selected_coin: store.dashboard.selected_coin().map(|c| c.symbol.clone()),
            picker_symbol: store.picker.selected_symbol().map(str::to_string),
            selected_notification: store.notifications.selected_id().map(str::to_string),
            settings_field: store.app.settings_field,
            sound_enabled: store.notifications.sound_enabled,
        });
    }

    /// Get the next action from user input.
    pub async fn next(&mut self) -> Result<Option<Action>> {
        if !event::poll(self.poll_timeout)? {
            return Ok(None);
        }

        Ok(match event::read()? {
            CrosstermEvent::Key(key) => self.handle_key(key),
            CrosstermEvent::Mouse(mouse) => self.handle_mouse(mouse),
            // Resize is picked up by the next draw
            _ => None,
        })
    }

    /// Handle a key event and return an optional action.
    fn handle_key(&self, key: KeyEvent) -> Option<Action> {
        if key.kind != KeyEventKind::Press {
            return None;
        }

        let snapshot = self.store_snapshot.as_ref()?;

        match snapshot.input_mode {
            InputMode::Normal => self.handle_normal_mode(key, snapshot),
            InputMode::Search => self.handle_text_mode(key, |_| true),
            InputMode::Editing => {
                self.handle_text_mode(key, |c| c.is_ascii_digit() || c == '.' || c == '-')
            }
        }
    }

    fn handle_mouse(&self, mouse: MouseEvent) -> Option<Action> {
        match mouse.kind {
            MouseEventKind::ScrollUp => Some(Action::ScrollUp),
            MouseEventKind::ScrollDown => Some(Action::ScrollDown),
            _ => None,
        }
    }

    fn handle_normal_mode(&self, key: KeyEvent, snapshot: &StoreSnapshot) -> Option<Action> {
        let input = InputEvent::from(key);
        let keys = &self.keybindings;

        // Global shortcuts
        if input.matches(&keys.quit) {
            return Some(Action::Quit);
        }
        if input.matches(&keys.help) || (snapshot.show_help && input.matches(&keys.back)) {
            return Some(Action::ToggleHelp);
        }
        if input.matches(&keys.theme) {
            return Some(Action::ToggleTheme);
        }
        if input.matches(&keys.sound) {
            return Some(Action::SetSoundEnabled(!snapshot.sound_enabled));
        }
        if input.matches(&keys.notifications) {
            return Some(Action::ToggleNotificationPanel);
        }
        if input.matches(&keys.clear_state) {
            return Some(Action::ClearState);
        }

        // View switching
        if input.matches(&keys.dashboard) {
            return Some(Action::SetView(View::Dashboard));
        }
        if input.matches(&keys.coins) {
            return Some(Action::SetView(View::Coins));
        }
        if input.matches(&keys.settings) {
            return Some(Action::SetView(View::Settings));
        }

        // Navigation
        if input.matches(&keys.up) || key.code == KeyCode::Up {
            return Some(Action::ScrollUp);
        }
        if input.matches(&keys.down) || key.code == KeyCode::Down {
            return Some(Action::ScrollDown);
        }
        if key.code == KeyCode::Home {
            return Some(Action::GoToTop);
        }
        if key.code == KeyCode::End {
            return Some(Action::GoToBottom);
        }

        if snapshot.show_notifications {
            return self.handle_notification_panel(input, snapshot);
        }

        match snapshot.current_view {
            View::Dashboard => self.handle_dashboard_view(input, snapshot),
            View::Coins => self.handle_coins_view(input, snapshot),
            View::Settings => self.handle_settings_view(input, snapshot),
        }
    }

    fn handle_notification_panel(
        &self,
        input: InputEvent,
        snapshot: &StoreSnapshot,
    ) -> Option<Action> {
        let keys = &self.keybindings;

        if input.matches(&keys.delete_notification) {
            return snapshot
                .selected_notification
                .clone()
                .map(Action::DismissNotification);
        }
        if input.matches(&keys.clear_notifications) {
            return Some(Action::ClearNotifications);
        }
        if input.matches(&keys.back) {
            return Some(Action::ToggleNotificationPanel);
        }

        None
    }

    fn handle_dashboard_view(&self, input: InputEvent, snapshot: &StoreSnapshot) -> Option<Action> {
        let keys = &self.keybindings;
        let symbol = snapshot.selected_coin.clone()?;

        if input.matches(&keys.refresh) {
            return Some(Action::RefreshCoin(symbol));
        }
        if input.matches(&keys.remove_coin) {
            return Some(Action::RemoveCoin(symbol));
        }
        if input.matches(&keys.export_csv) {
            return Some(Action::ExportCsv(symbol));
        }

        None
    }

    fn handle_coins_view(&self, input: InputEvent, snapshot: &StoreSnapshot) -> Option<Action> {
        let keys = &self.keybindings;

        if input.matches(&keys.search) {
            return Some(Action::SetInputMode(InputMode::Search));
        }
        if input.matches(&keys.select_all) {
            return Some(Action::ToggleAllCoins);
        }
        if input.matches(&keys.toggle_coin) || input.matches(&keys.select) {
            return snapshot.picker_symbol.clone().map(Action::ToggleCoin);
        }

        None
    }

    fn handle_settings_view(&self, input: InputEvent, snapshot: &StoreSnapshot) -> Option<Action> {
        let keys = &self.keybindings;

        if input.matches(&keys.select) || input.matches(&keys.toggle_coin) {
            return Some(match snapshot.settings_field {
                SettingsField::Sound => Action::SetSoundEnabled(!snapshot.sound_enabled),
                field => Action::BeginEdit(field),
            });
        }

        None
    }

    /// Keys while typing into the search box or a settings field.
    fn handle_text_mode(&self, key: KeyEvent, accept: impl Fn(char) -> bool) -> Option<Action> {
        match key.code {
            KeyCode::Esc => Some(Action::CancelInput),
            KeyCode::Enter => Some(Action::SubmitInput),
            KeyCode::Backspace => Some(Action::InputBackspace),
            KeyCode::Left => Some(Action::CursorLeft),
            KeyCode::Right => Some(Action::CursorRight),
            KeyCode::Up => Some(Action::ScrollUp),
            KeyCode::Down => Some(Action::ScrollDown),
            _ => InputEvent::from(key)
                .char()
                .filter(|c| accept(*c))
                .map(Action::InputChar),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crossterm::event::KeyModifiers;
    use tokio::sync::mpsc;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn setup() -> (EventHandler, Store) {
        let (tx, _rx) = mpsc::unbounded_channel();
        let config = Config::default();
        let store = Store::new(tx, &config);
        let handler = EventHandler::new(config.keybindings, Duration::from_millis(10));
        (handler, store)
    }

    #[test]
    fn test_no_action_before_first_snapshot() {
        let (handler, _) = setup();
        assert!(handler.handle_key(press(KeyCode::Char('q'))).is_none());
    }

    #[test]
    fn test_view_switching_and_quit() {
        let (mut handler, store) = setup();
        handler.update_store_snapshot(&store);

        assert!(matches!(
            handler.handle_key(press(KeyCode::Char('2'))),
            Some(Action::SetView(View::Coins))
        ));
        assert!(matches!(
            handler.handle_key(press(KeyCode::Char('q'))),
            Some(Action::Quit)
        ));
    }

    #[test]
    fn test_space_toggles_picker_coin() {
        let (mut handler, mut store) = setup();
        store.reduce(Action::SetView(View::Coins));
        store.reduce(Action::ScrollDown);
        handler.update_store_snapshot(&store);

        match handler.handle_key(press(KeyCode::Char(' '))) {
            Some(Action::ToggleCoin(symbol)) => assert_eq!(symbol, "ETH"),
            other => panic!("unexpected action: {:?}", other),
        }
    }

    #[test]
    fn test_dashboard_keys_need_a_selected_coin() {
        let (mut handler, mut store) = setup();
        handler.update_store_snapshot(&store);
        assert!(handler.handle_key(press(KeyCode::Char('e'))).is_none());

        store.reduce(Action::AddCoin("BTC".into()));
        handler.update_store_snapshot(&store);
        match handler.handle_key(press(KeyCode::Char('e'))) {
            Some(Action::ExportCsv(symbol)) => assert_eq!(symbol, "BTC"),
            other => panic!("unexpected action: {:?}", other),
        }
    }

    #[test]
    fn test_editing_accepts_numeric_input_only() {
        let (mut handler, mut store) = setup();
        store.reduce(Action::BeginEdit(SettingsField::BuyThreshold));
        handler.update_store_snapshot(&store);

        assert!(matches!(
            handler.handle_key(press(KeyCode::Char('7'))),
            Some(Action::InputChar('7'))
        ));
        assert!(handler.handle_key(press(KeyCode::Char('z'))).is_none());
        assert!(matches!(
            handler.handle_key(press(KeyCode::Enter)),
            Some(Action::SubmitInput)
        ));
    }

    #[test]
    fn test_sound_row_toggles_sound() {
        let (mut handler, mut store) = setup();
        store.reduce(Action::SetView(View::Settings));
        store.reduce(Action::GoToBottom);
        handler.update_store_snapshot(&store);

        assert!(matches!(
            handler.handle_key(press(KeyCode::Enter)),
            Some(Action::SetSoundEnabled(true))
        ));
    }

    #[test]
    fn test_notification_panel_delete() {
        let (mut handler, mut store) = setup();
        store.reduce(Action::Notify(crate::state::Notification::info("hi")));
        store.reduce(Action::ToggleNotificationPanel);
        handler.update_store_snapshot(&store);

        let expected = store.notifications.items[0].id.clone();
        match handler.handle_key(press(KeyCode::Char('d'))) {
            Some(Action::DismissNotification(id)) => assert_eq!(id, expected),
            other => panic!("unexpected action: {:?}", other),
        }
    }

    #[test]
    fn test_ctrl_r_clears_state() {
        let (mut handler, store) = setup();
        handler.update_store_snapshot(&store);
        let key = KeyEvent::new(KeyCode::Char('r'), KeyModifiers::CONTROL);
        assert!(matches!(handler.handle_key(key), Some(Action::ClearState)));
    }
}
