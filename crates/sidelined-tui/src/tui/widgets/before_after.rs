// Before/after comparison for the player with the most recorded injuries.

use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use sidelined_core::report::{Bar, BarChart, BeforeAfter};

use super::bar_chart::bar_lines;

/// Two-bar chart from whichever averages are known.
pub fn chart(ba: &BeforeAfter) -> BarChart {
    let bars = [("Before", ba.before), ("After", ba.after)]
        .into_iter()
        .filter_map(|(label, value)| {
            value.map(|value| Bar {
                label: label.to_string(),
                value,
            })
        })
        .collect();
    BarChart {
        title: format!("Avg before vs after injury: {}", ba.player),
        x_label: "period".into(),
        y_label: "Avg rating".into(),
        bars,
    }
}

pub fn render(frame: &mut Frame, area: Rect, ba: &BeforeAfter) {
    let chart = chart(ba);
    let mut lines = bar_lines(&chart, (area.width as usize).saturating_sub(2));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!(" {} record(s)", ba.records),
        Style::default().fg(Color::Gray),
    )));
    for (side, value) in [("before", ba.before), ("after", ba.after)] {
        if value.is_none() {
            lines.push(Line::from(Span::styled(
                format!(" no known {side} rating"),
                Style::default().fg(Color::Yellow),
            )));
        }
    }
    if let (Some(before), Some(after)) = (ba.before, ba.after) {
        lines.push(Line::from(Span::styled(
            format!(" change: {:+.2}", after - before),
            Style::default().fg(if after < before { Color::Red } else { Color::Green }),
        )));
    }

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", chart.title)),
    );
    frame.render_widget(paragraph, area);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
