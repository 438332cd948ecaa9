//! Coin picker widget.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use crate::state::{InputMode, SelectAllState, Store};
use crate::ui::Colors;

/// Checkbox list of every selectable coin.
pub struct CoinPicker;

impl CoinPicker {
    /// Render the picker.
    pub fn render(frame: &mut Frame, area: Rect, store: &Store, colors: &Colors) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Search box
                Constraint::Length(1), // Select all
                Constraint::Min(0),    // List
            ])
            .split(area);

        render_search(frame, chunks[0], store, colors);

        let select_all = match store.picker.select_all_state(&store.dashboard) {
            SelectAllState::Checked => "[x]",
            SelectAllState::Partial => "[-]",
            SelectAllState::Unchecked => "[ ]",
        };
        let header = Line::from(vec![
            Span::styled(format!(" {} ", select_all), colors.title()),
            Span::raw("Select all"),
            Span::styled("  (a)", colors.muted()),
        ]);
        frame.render_widget(Paragraph::new(header).style(colors.base()), chunks[1]);

        let visible = store.picker.visible();
        let items: Vec<ListItem> = visible
            .iter()
            .map(|symbol| {
                let active = store.dashboard.is_active(symbol);
                let (mark, style) = if active {
                    ("[x]", Style::default().fg(colors.success))
                } else {
                    ("[ ]", Style::default().fg(colors.foreground))
                };
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{} ", mark), style),
                    Span::styled(symbol.to_string(), style),
                ]))
            })
            .collect();

        let title = format!(
            " Coins ({}/{} active) ",
            store.dashboard.coins.len(),
            store.picker.universe.len()
        );
        let list = List::new(items)
            .block(
                Block::default()
                    .title(Span::styled(title, colors.title()))
                    .borders(Borders::ALL)
                    .border_style(colors.border()),
            )
            .style(colors.base())
            .highlight_style(colors.highlight())
            .highlight_symbol("▶ ");

        let mut state = ListState::default();
        if !visible.is_empty() {
            state.select(Some(store.picker.selected_index));
        }

        frame.render_stateful_widget(list, chunks[2], &mut state);
    }
}

fn render_search(frame: &mut Frame, area: Rect, store: &Store, colors: &Colors) {
    let searching = store.app.input_mode == InputMode::Search;
    let text = if searching {
        store.app.input_buffer.as_str()
    } else {
        store.picker.filter.as_str()
    };

    let content = if text.is_empty() && !searching {
        Line::from(Span::styled("Press / to search", colors.muted()))
    } else {
        Line::from(Span::raw(text.to_string()))
    };

    let border_style = if searching {
        Style::default()
            .fg(colors.accent)
            .add_modifier(Modifier::BOLD)
    } else {
        colors.border()
    };

    let search = Paragraph::new(content)
        .block(
            Block::default()
                .title(" Search ")
                .borders(Borders::ALL)
                .border_style(border_style),
        )
        .style(colors.base());
    frame.render_widget(search, area);

    if searching {
        let cursor = store.app.cursor_position as u16;
        frame.set_cursor_position((area.x + 1 + cursor, area.y + 1));
    }
}
