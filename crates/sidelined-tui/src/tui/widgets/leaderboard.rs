// Leaderboard of players whose ratings improved most after injury.

use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Row, Table};
use ratatui::Frame;

use sidelined_core::report::Leaderboard;

use super::clamp_scroll;

fn rating(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.2}"))
}

/// Signed improvement, green when positive, red when negative.
pub fn improvement_cell(value: Option<f64>) -> Cell<'static> {
    match value {
        Some(v) => {
            let color = if v > 0.0 {
                Color::Green
            } else if v < 0.0 {
                Color::Red
            } else {
                Color::White
            };
            Cell::from(format!("{v:+.2}")).style(Style::default().fg(color))
        }
        None => Cell::from("n/a").style(Style::default().fg(Color::DarkGray)),
    }
}

pub fn render(frame: &mut Frame, area: Rect, board: &Leaderboard, scroll: usize) {
    let visible_rows = (area.height as usize).saturating_sub(3);
    let scroll = clamp_scroll(scroll, board.rows.len(), visible_rows);

    let header = Row::new(["#", "Player", "Before", "After", "Drop", "Improvement"])
        .style(Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD));

    let rows = board.rows.iter().enumerate().skip(scroll).map(|(i, row)| {
        Row::new(vec![
            Cell::from(format!("{}", i + 1)),
            Cell::from(row.player.clone()),
            Cell::from(rating(row.avg_rating_before)),
            Cell::from(rating(row.avg_rating_after)),
            Cell::from(rating(row.performance_drop_index)),
            improvement_cell(row.rating_improvement),
        ])
    });

    let widths = [
        Constraint::Length(3),
        Constraint::Min(16),
        Constraint::Length(7),
        Constraint::Length(7),
        Constraint::Length(7),
        Constraint::Length(11),
    ];
    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" Top rating improvements ({}) ", board.rows.len())),
    );
    frame.render_widget(table, area);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
