// Summary widget: record count, average FIFA rating, unique players.

use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use sidelined_core::report::Summary;

pub fn render(frame: &mut Frame, area: Rect, summary: &Summary) {
    let cells = Layout::horizontal([
        Constraint::Ratio(1, 3),
        Constraint::Ratio(1, 3),
        Constraint::Ratio(1, 3),
    ])
    .split(area);

    let stats = [
        ("Records", summary.records.to_string()),
        ("Avg rating", format_rating(summary.avg_rating)),
        ("Unique players", summary.unique_players.to_string()),
    ];
    for ((title, value), cell) in stats.into_iter().zip(cells.iter()) {
        let paragraph = Paragraph::new(Span::styled(
            format!(" {value}"),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ))
        .block(Block::default().borders(Borders::ALL).title(title));
        frame.render_widget(paragraph, *cell);
    }
}

/// Two decimals, or "N/A" when no rating is known.
pub fn format_rating(rating: Option<f64>) -> String {
    rating.map_or_else(|| "N/A".to_string(), |r| format!("{r:.2}"))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
