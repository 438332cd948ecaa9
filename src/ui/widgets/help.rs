//! Help panel widget.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use super::super::layout::centered_rect;
use crate::config::KeyBindings;
use crate::ui::Colors;

/// Help panel showing keybindings.
pub struct HelpPanel;

impl HelpPanel {
    /// Render the help panel.
    pub fn render(frame: &mut Frame, area: Rect, keys: &KeyBindings, colors: &Colors) {
        let popup_area = centered_rect(60, 80, area);

        // Clear the area behind the popup
        frame.render_widget(Clear, popup_area);

        let sections: [(&str, Vec<(String, &str)>); 4] = [
            (
                "Navigation",
                vec![
                    (format!("{}/↓", keys.down), "Move down"),
                    (format!("{}/↑", keys.up), "Move up"),
                    ("Home/End".to_string(), "Go to top/bottom"),
                    (
                        format!("{} {} {}", keys.dashboard, keys.coins, keys.settings),
                        "Dashboard, coins, settings",
                    ),
                ],
            ),
            (
                "Dashboard",
                vec![
                    (keys.refresh.clone(), "Refresh selected coin"),
                    (keys.remove_coin.clone(), "Remove selected coin"),
                    (keys.export_csv.clone(), "Export signals as CSV"),
                ],
            ),
            (
                "Coins",
                vec![
                    (keys.search.clone(), "Search"),
                    (keys.toggle_coin.clone(), "Toggle coin"),
                    (keys.select_all.clone(), "Select all visible"),
                ],
            ),
            (
                "General",
                vec![
                    (keys.notifications.clone(), "Notifications"),
                    (keys.sound.clone(), "Toggle sound"),
                    (keys.theme.clone(), "Toggle theme"),
                    (keys.clear_state.clone(), "Clear saved state"),
                    (keys.help.clone(), "Toggle help"),
                    (keys.quit.clone(), "Quit"),
                ],
            ),
        ];

        let key_style = Style::default().fg(colors.primary);
        let heading_style = Style::default()
            .fg(colors.warning)
            .add_modifier(Modifier::BOLD);

        let mut help_text = Vec::new();
        for (heading, entries) in sections {
            help_text.push(Line::from(Span::styled(heading, heading_style)));
            for (key, description) in entries {
                help_text.push(Line::from(vec![
                    Span::styled(format!("  {:<10}", key), key_style),
                    Span::raw(description),
                ]));
            }
            help_text.push(Line::from(""));
        }

        let help = Paragraph::new(help_text)
            .block(
                Block::default()
                    .title(" Help ")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(colors.warning)),
            )
            .style(colors.base());

        frame.render_widget(help, popup_area);
    }
}
