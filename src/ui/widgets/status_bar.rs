//! Status bar widget.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::state::Store;
use crate::ui::Colors;

/// Status bar widget.
pub struct StatusBar;

impl StatusBar {
    /// Render the status bar.
    pub fn render(frame: &mut Frame, area: Rect, store: &Store, colors: &Colors) {
        let connection_status = if store.app.connected {
            Span::styled("● Online", Style::default().fg(colors.success))
        } else {
            Span::styled("○ Offline", Style::default().fg(colors.error))
        };

        let sound = if store.notifications.sound_enabled {
            "🔔"
        } else {
            "🔕"
        };

        let badge_style = if store.notifications.count() > 0 {
            Style::default()
                .fg(colors.accent)
                .add_modifier(Modifier::BOLD)
        } else {
            colors.muted()
        };

        let left_content = vec![
            Span::styled(
                " P-Plus ",
                Style::default()
                    .fg(colors.primary)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" | "),
            connection_status,
            Span::raw(" | "),
            Span::styled(format!("tick {}", store.app.poll_ticks), colors.muted()),
            Span::raw(" | "),
            Span::raw(format!("{} ", sound)),
            Span::styled(
                format!("✉ {}", store.notifications.count()),
                badge_style,
            ),
            Span::raw(" | "),
            Span::styled(store.app.theme.as_str(), colors.muted()),
        ];

        let help_hint = Span::styled(" Press ? for help ", colors.muted());

        let status_line = Line::from(left_content);

        // Pad so the help hint is right-aligned
        let left_len = status_line.width();
        let right_len = help_hint.width();
        let padding = (area.width as usize).saturating_sub(left_len + right_len);

        let mut full_line = status_line.spans;
        full_line.push(Span::raw(" ".repeat(padding)));
        full_line.push(help_hint);

        let paragraph = Paragraph::new(Line::from(full_line))
            .style(Style::default().fg(colors.foreground).bg(colors.border));

        frame.render_widget(paragraph, area);
    }
}
