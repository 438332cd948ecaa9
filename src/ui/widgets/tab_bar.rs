//! Tab bar widget.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::state::{Store, View};
use crate::ui::Colors;

/// Tab bar widget.
pub struct TabBar;

impl TabBar {
    /// Render the tab bar.
    pub fn render(frame: &mut Frame, area: Rect, store: &Store, colors: &Colors) {
        let tabs = [
            ("1", format!("Dashboard ({})", store.dashboard.coins.len()), View::Dashboard),
            ("2", "Coins".to_string(), View::Coins),
            ("3", "Settings".to_string(), View::Settings),
        ];

        let mut spans = vec![Span::raw(" ")];

        for (key, name, view) in tabs {
            let name_style = if store.app.current_view == view {
                Style::default()
                    .fg(colors.primary)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
            } else {
                Style::default().fg(colors.foreground)
            };

            spans.push(Span::styled(format!("[{}] ", key), colors.muted()));
            spans.push(Span::styled(name, name_style));
            spans.push(Span::raw("  "));
        }

        frame.render_widget(Paragraph::new(Line::from(spans)).style(colors.base()), area);
    }
}
