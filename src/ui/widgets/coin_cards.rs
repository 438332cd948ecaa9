//! Dashboard coin cards.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use rust_decimal::Decimal;

use crate::api::{TimeframeAnalysis, TrendSignal};
use crate::state::{CoinState, Store};
use crate::ui::Colors;

/// Card height including borders.
const CARD_HEIGHT: u16 = 9;
/// History lines shown inside a card.
const CARD_HISTORY_LINES: usize = 2;

/// Dashboard of coin cards, one per active coin.
pub struct CoinCards;

impl CoinCards {
    pub fn render(frame: &mut Frame, area: Rect, store: &Store, colors: &Colors, intervals: &[String]) {
        let coins = &store.dashboard.coins;
        if coins.is_empty() {
            let hint = Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled("No coins selected.", colors.title())),
                Line::from(Span::styled(
                    "Press 2 to open the coin picker.",
                    colors.muted(),
                )),
            ])
            .block(panel(" Dashboard ", colors))
            .style(colors.base());
            frame.render_widget(hint, area);
            return;
        }

        let fit = (area.height / CARD_HEIGHT).max(1) as usize;
        let selected = store.dashboard.selected_index.unwrap_or(0);
        let offset = selected.saturating_sub(fit - 1);
        let visible = &coins[offset..coins.len().min(offset + fit)];

        let areas = Layout::default()
            .direction(Direction::Vertical)
            .constraints(
                visible
                    .iter()
                    .map(|_| Constraint::Length(CARD_HEIGHT))
                    .chain(std::iter::once(Constraint::Min(0))),
            )
            .split(area);

        for (i, coin) in visible.iter().enumerate() {
            let is_selected = offset + i == selected;
            render_card(frame, areas[i], coin, is_selected, colors, intervals);
        }
    }
}

fn render_card(
    frame: &mut Frame,
    area: Rect,
    coin: &CoinState,
    selected: bool,
    colors: &Colors,
    intervals: &[String],
) {
    let border_style = if selected {
        Style::default().fg(colors.primary)
    } else {
        colors.border()
    };

    let updated = coin
        .price_updated
        .map(|t| format!("  updated {}", t.with_timezone(&chrono::Local).format("%H:%M:%S")))
        .unwrap_or_default();

    let profit_color = if coin.is_profitable() {
        colors.success
    } else {
        colors.error
    };

    let mut lines = vec![
        Line::from(vec![
            Span::styled(
                format_price(coin.price),
                Style::default()
                    .fg(colors.foreground)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(updated, colors.muted()),
        ]),
        Line::from(vec![
            Span::styled("Last signal: ", colors.muted()),
            Span::raw(coin.last_signal.clone().unwrap_or_else(|| "—".to_string())),
        ]),
        Line::from(vec![
            Span::styled("Total profit: ", colors.muted()),
            Span::styled(
                format!("{:.2} $", coin.total_profit),
                Style::default().fg(profit_color),
            ),
            Span::styled(
                coin.last_buy_price
                    .map(|p| format!("  open @ {} $", p))
                    .unwrap_or_default(),
                Style::default().fg(colors.warning),
            ),
        ]),
        pill_line(coin, colors, intervals),
        Line::from(vec![
            Span::styled("Confidence: ", colors.muted()),
            Span::raw(
                coin.analysis
                    .as_ref()
                    .map(|a| format!("{}%", a.confidence))
                    .unwrap_or_else(|| "--".to_string()),
            ),
        ]),
    ];

    lines.extend(
        coin.history
            .iter()
            .take(CARD_HISTORY_LINES)
            .map(|h| Line::from(Span::styled(h.clone(), colors.muted()))),
    );

    let card = Paragraph::new(lines)
        .block(
            Block::default()
                .title(Span::styled(format!(" {} ", coin.pair()), colors.title()))
                .borders(Borders::ALL)
                .border_style(border_style),
        )
        .style(colors.base());

    frame.render_widget(card, area);
}

fn pill_line(coin: &CoinState, colors: &Colors, intervals: &[String]) -> Line<'static> {
    let mut spans = Vec::new();
    for interval in intervals {
        let timeframe = coin.analysis.as_ref().and_then(|a| a.timeframe(interval));
        let color = match timeframe.and_then(|t| t.signal) {
            Some(TrendSignal::Buy) => colors.success,
            Some(TrendSignal::Sell) => colors.error,
            _ => colors.muted,
        };
        spans.push(Span::styled(
            format!("[{}]", pill_text(interval, timeframe)),
            Style::default().fg(color),
        ));
        spans.push(Span::raw(" "));
    }
    Line::from(spans)
}

/// Text of one timeframe pill, e.g. `5m Buy C:101.25 • RSI:61`.
pub fn pill_text(interval: &str, timeframe: Option<&TimeframeAnalysis>) -> String {
    let Some(tf) = timeframe else {
        return format!("{} — C:-- • RSI:--", interval);
    };
    if let Some(error) = &tf.error {
        return format!("{} error: {}", interval, error);
    }

    let tag = tf.signal.map(|s| s.label()).unwrap_or("—");
    let close = tf
        .close
        .map(|c| format!("{:.2}", c))
        .unwrap_or_else(|| "--".to_string());
    let rsi = tf
        .rsi14
        .map(|r| format!("{:.0}", r))
        .unwrap_or_else(|| "--".to_string());
    format!("{} {} C:{} • RSI:{}", interval, tag, close, rsi)
}

/// Price with two decimals, or a placeholder before the first update.
pub fn format_price(price: Option<Decimal>) -> String {
    match price {
        Some(p) => format!("{:.2} $", p),
        None => "-- $".to_string(),
    }
}

fn panel(title: &str, colors: &Colors) -> Block<'static> {
    Block::default()
        .title(Span::styled(title.to_string(), colors.title()))
        .borders(Borders::ALL)
        .border_style(colors.border())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_pill_text() {
        let tf = TimeframeAnalysis {
            close: Some(dec!(101.25)),
            rsi14: Some(dec!(61)),
            signal: Some(TrendSignal::Buy),
            ..Default::default()
        };
        assert_eq!(pill_text("5m", Some(&tf)), "5m Buy C:101.25 • RSI:61");
        assert_eq!(pill_text("1h", None), "1h — C:-- • RSI:--");
    }

    #[test]
    fn test_pill_text_with_error() {
        let tf = TimeframeAnalysis {
            error: Some("no data".to_string()),
            ..Default::default()
        };
        assert_eq!(pill_text("15m", Some(&tf)), "15m error: no data");
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(Some(dec!(42000.5))), "42000.50 $");
        assert_eq!(format_price(None), "-- $");
    }
}
