// Month x team heatmap: injury counts as a shaded table.

use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Row, Table};
use ratatui::Frame;

use sidelined_core::report::Heatmap;

use super::{clamp_scroll, fit};

const ROW_LABEL_WIDTH: usize = 16;
const MONTH_WIDTH: u16 = 7;

/// Background for a cell holding `count` out of `max`, light to dark blue.
pub fn shade(count: u32, max: u32) -> Color {
    let t = if max == 0 { 0.0 } else { count as f64 / max as f64 };
    let lerp = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
    Color::Rgb(lerp(0xf7, 0x08), lerp(0xfb, 0x30), lerp(0xff, 0x6b))
}

pub fn render(frame: &mut Frame, area: Rect, grid: &Heatmap, scroll: usize) {
    let max = grid.max();
    let visible_rows = (area.height as usize).saturating_sub(3);
    let scroll = clamp_scroll(scroll, grid.rows.len(), visible_rows);

    let header = Row::new(
        std::iter::once(Cell::from(grid.row_label.clone()))
            .chain(grid.columns.iter().map(|m| Cell::from(m.clone()))),
    )
    .style(Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD));

    let rows = grid
        .rows
        .iter()
        .zip(&grid.counts)
        .skip(scroll)
        .map(|(label, counts)| {
            let cells = counts.iter().map(|&count| {
                let fg = if max > 0 && count * 2 > max {
                    Color::White
                } else {
                    Color::Black
                };
                Cell::from(format!("{count:>5}")).style(Style::default().fg(fg).bg(shade(count, max)))
            });
            Row::new(std::iter::once(Cell::from(fit(label, ROW_LABEL_WIDTH))).chain(cells))
        });

    let mut widths = vec![Constraint::Length(ROW_LABEL_WIDTH as u16)];
    widths.extend(grid.columns.iter().map(|_| Constraint::Length(MONTH_WIDTH)));

    let title = format!(
        " Injuries by month and {} (total {}) ",
        grid.row_label,
        grid.total()
    );
    let table = Table::new(rows, widths)
        .header(header)
        .column_spacing(1)
        .block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(table, area);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
