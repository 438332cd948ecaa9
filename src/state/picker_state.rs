//! Coin picker: the checkbox list of every selectable symbol.

use super::DashboardState;

/// Aggregate state of the "select all" checkbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectAllState {
    Unchecked,
    Partial,
    Checked,
}

/// Coin picker state. Checkbox state itself is derived from the dashboard.
#[derive(Debug, Clone, Default)]
pub struct CoinPickerState {
    /// Every selectable symbol.
    pub universe: Vec<String>,
    /// Case-insensitive search filter.
    pub filter: String,
    /// Cursor position within the visible list.
    pub selected_index: usize,
}

impl CoinPickerState {
    pub fn new(universe: Vec<String>) -> Self {
        Self {
            universe,
            filter: String::new(),
            selected_index: 0,
        }
    }

    /// Symbols matching the filter.
    pub fn visible(&self) -> Vec<&str> {
        let filter = self.filter.trim().to_uppercase();
        self.universe
            .iter()
            .filter(|s| filter.is_empty() || s.contains(&filter))
            .map(|s| s.as_str())
            .collect()
    }

    pub fn selected_symbol(&self) -> Option<&str> {
        self.visible().get(self.selected_index).copied()
    }

    /// Update the filter and keep the cursor inside the visible list.
    pub fn set_filter(&mut self, filter: impl Into<String>) {
        self.filter = filter.into();
        self.clamp();
    }

    pub fn clamp(&mut self) {
        let len = self.visible().len();
        self.selected_index = self.selected_index.min(len.saturating_sub(1));
    }

    /// State of the select-all checkbox over the visible symbols.
    pub fn select_all_state(&self, dashboard: &DashboardState) -> SelectAllState {
        let visible = self.visible();
        let checked = visible.iter().filter(|s| dashboard.is_active(s)).count();
        if visible.is_empty() || checked == 0 {
            SelectAllState::Unchecked
        } else if checked == visible.len() {
            SelectAllState::Checked
        } else {
            SelectAllState::Partial
        }
    }

    /// Visible symbols that must flip for select-all to take effect.
    ///
    /// Returns the target checked state and the symbols whose state differs.
    pub fn select_all_targets(&self, dashboard: &DashboardState) -> (bool, Vec<String>) {
        let target = self.select_all_state(dashboard) != SelectAllState::Checked;
        let symbols = self
            .visible()
            .into_iter()
            .filter(|s| dashboard.is_active(s) != target)
            .map(str::to_string)
            .collect();
        (target, symbols)
    }
}
