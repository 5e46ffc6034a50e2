// Horizontal bar chart widget for the drop ranking and team counts.
//
// Bars grow from a shared zero column so negative values (performance gains)
// read left of the axis in red. Scrollable when there are more bars than rows.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use sidelined_core::report::BarChart;
use sidelined_core::table::format_number;

use super::{clamp_scroll, fit};

const MAX_LABEL_WIDTH: usize = 24;

pub fn render(frame: &mut Frame, area: Rect, chart: &BarChart, scroll: usize) {
    let lines = bar_lines(chart, (area.width as usize).saturating_sub(2));
    let visible_rows = (area.height as usize).saturating_sub(2);
    let scroll = clamp_scroll(scroll, lines.len(), visible_rows) as u16;

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(chart.title.clone()),
        )
        .scroll((scroll, 0));
    frame.render_widget(paragraph, area);
}

/// Display value: whole numbers bare, otherwise two decimals.
pub fn format_value(v: f64) -> String {
    if v.fract() == 0.0 {
        format_number(v)
    } else {
        format!("{v:.2}")
    }
}

/// One header line plus one line per bar, sized to `width` columns.
pub fn bar_lines(chart: &BarChart, width: usize) -> Vec<Line<'static>> {
    let label_width = chart
        .bars
        .iter()
        .map(|b| b.label.chars().count())
        .max()
        .unwrap_or(0)
        .clamp(4, MAX_LABEL_WIDTH);
    let values: Vec<String> = chart.bars.iter().map(|b| format_value(b.value)).collect();
    let value_width = values.iter().map(String::len).max().unwrap_or(1);

    let has_negative = chart.bars.iter().any(|b| b.value < 0.0);
    let has_positive = chart.bars.iter().any(|b| b.value > 0.0);
    let bar_space = width.saturating_sub(label_width + value_width + 3);
    // Split the bar space around the zero column when both signs occur.
    let (neg_space, pos_space) = match (has_negative, has_positive) {
        (true, true) => (bar_space / 2, bar_space - bar_space / 2),
        (true, false) => (bar_space, 0),
        _ => (0, bar_space),
    };
    let max_abs = chart
        .bars
        .iter()
        .map(|b| b.value.abs())
        .fold(0.0, f64::max);

    let mut lines = vec![Line::from(Span::styled(
        format!(" {} by {}", chart.y_label, chart.x_label),
        Style::default().fg(Color::DarkGray),
    ))];

    for (bar, value) in chart.bars.iter().zip(values) {
        let len = if max_abs > 0.0 {
            let space = if bar.value < 0.0 { neg_space } else { pos_space };
            ((bar.value.abs() / max_abs) * space as f64).round() as usize
        } else {
            0
        };
        let (left, right) = if bar.value < 0.0 {
            (
                format!("{}{}", " ".repeat(neg_space - len), "█".repeat(len)),
                " ".repeat(pos_space),
            )
        } else {
            (" ".repeat(neg_space), format!("{:<pos_space$}", "█".repeat(len)))
        };
        let color = if bar.value < 0.0 { Color::Red } else { Color::Cyan };

        lines.push(Line::from(vec![
            Span::styled(
                format!(" {:<label_width$}", fit(&bar.label, label_width)),
                Style::default().fg(Color::White),
            ),
            Span::raw(" "),
            Span::styled(left, Style::default().fg(color)),
            Span::styled(right, Style::default().fg(color)),
            Span::raw(" "),
            Span::styled(value, Style::default().add_modifier(Modifier::BOLD)),
        ]));
    }
    lines
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
