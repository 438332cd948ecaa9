//! Notification rendering.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
};

use crate::state::{NotificationKind, NotificationState, Toast};
use crate::ui::Colors;

fn kind_color(kind: NotificationKind, colors: &Colors) -> Color {
    match kind {
        NotificationKind::Buy => colors.success,
        NotificationKind::Sell => colors.error,
        NotificationKind::Info => colors.primary,
    }
}

/// Render the notification panel, newest first.
pub fn render_notification_panel(
    frame: &mut Frame,
    area: Rect,
    notifications: &NotificationState,
    colors: &Colors,
) {
    frame.render_widget(Clear, area);

    let items: Vec<ListItem> = notifications
        .newest_first()
        .map(|n| {
            ListItem::new(Line::from(vec![
                Span::styled(format!("{} ", n.time), colors.muted()),
                Span::styled(n.text.clone(), Style::default().fg(kind_color(n.kind, colors))),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .title(Span::styled(
                    format!(" Notifications ({}) ", notifications.count()),
                    colors.title(),
                ))
                .title_bottom(Span::styled(" d delete • c clear • Esc close ", colors.muted()))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(colors.accent)),
        )
        .style(colors.base())
        .highlight_style(colors.highlight())
        .highlight_symbol("▶ ");

    let mut state = ListState::default();
    state.select(notifications.selected_index);

    frame.render_stateful_widget(list, area, &mut state);
}

/// Render the toast popup.
pub fn render_toast(frame: &mut Frame, area: Rect, toast: &Toast, colors: &Colors) {
    frame.render_widget(Clear, area);

    let color = kind_color(toast.kind, colors);
    let paragraph = Paragraph::new(Line::from(Span::raw(toast.text.clone())))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color)),
        )
        .style(colors.base());

    frame.render_widget(paragraph, area);
}

/// Render an error popup.
pub fn render_error(frame: &mut Frame, area: Rect, error: &str, colors: &Colors) {
    frame.render_widget(Clear, area);

    let content = Line::from(vec![
        Span::styled(
            "✗ Error: ",
            Style::default()
                .fg(colors.error)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(error.to_string()),
    ]);

    let paragraph = Paragraph::new(content)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(colors.error)),
        )
        .style(colors.base());

    frame.render_widget(paragraph, area);
}
