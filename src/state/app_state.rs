//! Application-level state.

use std::time::{Duration, Instant};

use super::NotificationKind;

/// The current view/screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Dashboard,
    Coins,
    Settings,
}

/// Input mode for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    /// Typing into the coin picker search box.
    Search,
    /// Editing a threshold in the settings form.
    Editing,
}

/// Color theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    /// Value stored under the theme key.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "dark" => Some(Self::Dark),
            "light" => Some(Self::Light),
            _ => None,
        }
    }
}

/// Rows of the settings form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SettingsField {
    #[default]
    BuyThreshold,
    SellThreshold,
    Sound,
}

impl SettingsField {
    pub const ALL: [SettingsField; 3] = [Self::BuyThreshold, Self::SellThreshold, Self::Sound];

    pub fn next(self) -> Self {
        match self {
            Self::BuyThreshold => Self::SellThreshold,
            Self::SellThreshold | Self::Sound => Self::Sound,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::BuyThreshold | Self::SellThreshold => Self::BuyThreshold,
            Self::Sound => Self::SellThreshold,
        }
    }
}

/// A short-lived popup echoing the latest notification.
#[derive(Debug, Clone)]
pub struct Toast {
    pub text: String,
    pub kind: NotificationKind,
    pub shown_at: Instant,
    pub duration: Duration,
}

impl Toast {
    pub fn is_expired(&self, now: Instant) -> bool {
        now.duration_since(self.shown_at) >= self.duration
    }
}

/// Global application state.
#[derive(Debug, Default)]
pub struct AppState {
    /// Current view.
    pub current_view: View,
    /// Current input mode.
    pub input_mode: InputMode,
    /// Current theme.
    pub theme: Theme,
    /// Whether to show help overlay.
    pub show_help: bool,
    /// Whether the notification panel is open.
    pub show_notifications: bool,
    /// Highlighted settings row.
    pub settings_field: SettingsField,
    /// Current toast.
    pub toast: Option<Toast>,
    /// Current error message.
    pub error: Option<String>,
    /// Whether the last API call succeeded.
    pub connected: bool,
    /// Number of poll ticks seen.
    pub poll_ticks: u64,
    /// Whether the app should quit.
    pub should_quit: bool,
    /// Current search/edit input.
    pub input_buffer: String,
    /// Cursor position in input buffer.
    pub cursor_position: usize,
}

impl AppState {
    /// Check if in an input mode.
    pub fn is_editing(&self) -> bool {
        matches!(self.input_mode, InputMode::Search | InputMode::Editing)
    }

    /// Clear the input buffer.
    pub fn clear_input(&mut self) {
        self.input_buffer.clear();
        self.cursor_position = 0;
    }

    /// Replace the input buffer, cursor at the end.
    pub fn set_input(&mut self, value: impl Into<String>) {
        self.input_buffer = value.into();
        self.cursor_position = self.input_buffer.chars().count();
    }

    /// Add a character at the cursor.
    pub fn push_char(&mut self, c: char) {
        let at = self.byte_offset(self.cursor_position);
        self.input_buffer.insert(at, c);
        self.cursor_position += 1;
    }

    /// Remove the character before the cursor.
    pub fn pop_char(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
            let at = self.byte_offset(self.cursor_position);
            self.input_buffer.remove(at);
        }
    }

    /// Move cursor left.
    pub fn cursor_left(&mut self) {
        self.cursor_position = self.cursor_position.saturating_sub(1);
    }

    /// Move cursor right.
    pub fn cursor_right(&mut self) {
        if self.cursor_position < self.input_buffer.chars().count() {
            self.cursor_position += 1;
        }
    }

    fn byte_offset(&self, char_index: usize) -> usize {
        self.input_buffer
            .char_indices()
            .nth(char_index)
            .map(|(i, _)| i)
            .unwrap_or(self.input_buffer.len())
    }
}
