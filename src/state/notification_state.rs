//! Notification log.

use crate::signal::{SignalEvent, SignalKind};

/// What a notification is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Buy,
    Sell,
    Info,
}

impl From<SignalKind> for NotificationKind {
    fn from(kind: SignalKind) -> Self {
        match kind {
            SignalKind::Buy => Self::Buy,
            SignalKind::Sell => Self::Sell,
        }
    }
}

/// A notification to display to the user.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    /// Random identifier used for individual removal.
    pub id: String,
    pub text: String,
    pub kind: NotificationKind,
    /// Local wall-clock time, `HH:MM:SS`.
    pub time: String,
}

impl Notification {
    pub fn new(text: impl Into<String>, kind: NotificationKind) -> Self {
        Self {
            id: uuid::Uuid::new_v4().simple().to_string(),
            text: text.into(),
            kind,
            time: chrono::Local::now().format("%H:%M:%S").to_string(),
        }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self::new(text, NotificationKind::Info)
    }
}

impl From<&SignalEvent> for Notification {
    fn from(event: &SignalEvent) -> Self {
        Self::new(event.message(), event.kind.into())
    }
}

/// The ordered notification log (oldest first).
#[derive(Debug, Clone, Default)]
pub struct NotificationState {
    pub items: Vec<Notification>,
    /// Cursor within the newest-first panel listing.
    pub selected_index: Option<usize>,
    /// Ring the terminal bell on new notifications.
    pub sound_enabled: bool,
    /// A bell is owed to the terminal.
    pending_bell: bool,
}

impl NotificationState {
    /// Append a notification. Duplicates are kept.
    pub fn push(&mut self, notification: Notification) {
        self.items.push(notification);
        if self.sound_enabled {
            self.pending_bell = true;
        }
    }

    /// Remove one notification by id. Returns false if no such id.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|n| n.id != id);
        let removed = self.items.len() != before;
        if removed {
            self.clamp();
        }
        removed
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.selected_index = None;
    }

    /// Badge count.
    pub fn count(&self) -> usize {
        self.items.len()
    }

    /// Notifications as listed in the panel.
    pub fn newest_first(&self) -> impl Iterator<Item = &Notification> {
        self.items.iter().rev()
    }

    pub fn latest(&self) -> Option<&Notification> {
        self.items.last()
    }

    /// Id of the highlighted panel row.
    pub fn selected_id(&self) -> Option<&str> {
        self.selected_index
            .and_then(|i| self.newest_first().nth(i))
            .map(|n| n.id.as_str())
    }

    /// Take the pending bell, if any.
    pub fn take_bell(&mut self) -> bool {
        std::mem::take(&mut self.pending_bell)
    }

    fn clamp(&mut self) {
        self.selected_index = match self.selected_index {
            _ if self.items.is_empty() => None,
            Some(i) => Some(i.min(self.items.len() - 1)),
            None => None,
        };
    }
}
