//! Settings form.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::state::{InputMode, SettingsField, Store};
use crate::ui::Colors;

/// Threshold form and sound toggle.
pub struct SettingsPanel;

impl SettingsPanel {
    pub fn render(frame: &mut Frame, area: Rect, store: &Store, colors: &Colors) {
        let editing = store.app.input_mode == InputMode::Editing;
        let mut lines = vec![Line::from("")];

        for field in SettingsField::ALL {
            let focused = store.app.settings_field == field;
            let (label, value) = match field {
                SettingsField::BuyThreshold => (
                    "Buy threshold (%)",
                    store.dashboard.buy_threshold_percent.to_string(),
                ),
                SettingsField::SellThreshold => (
                    "Sell threshold (%)",
                    store.dashboard.sell_threshold_percent.to_string(),
                ),
                SettingsField::Sound => (
                    "Notification sound",
                    if store.notifications.sound_enabled {
                        "[x] on".to_string()
                    } else {
                        "[ ] off".to_string()
                    },
                ),
            };

            let value = if focused && editing {
                Span::styled(
                    format!("{}▏", store.app.input_buffer),
                    Style::default()
                        .fg(colors.accent)
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                Span::raw(value)
            };

            let marker = if focused { "▶ " } else { "  " };
            let line = Line::from(vec![
                Span::styled(marker, Style::default().fg(colors.primary)),
                Span::styled(format!("{:<22}", label), colors.muted()),
                value,
            ]);
            lines.push(if focused {
                line.style(colors.highlight())
            } else {
                line
            });
        }

        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            if editing {
                "Enter to save, Esc to cancel"
            } else {
                "Enter to edit or toggle"
            },
            colors.muted(),
        )));

        let form = Paragraph::new(lines)
            .block(
                Block::default()
                    .title(Span::styled(" Settings ", colors.title()))
                    .borders(Borders::ALL)
                    .border_style(colors.border()),
            )
            .style(colors.base());

        frame.render_widget(form, area);
    }
}
