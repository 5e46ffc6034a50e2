// Placeholder shown in place of a view that cannot be drawn.

use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use sidelined_core::report::Unavailable;

pub fn render(frame: &mut Frame, area: Rect, unavailable: &Unavailable) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!(" {unavailable}"),
            Style::default().fg(Color::Yellow),
        )),
        Line::from(""),
        Line::from(Span::styled(
            " Adjust filters (Esc clears) or check the CSV columns.",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title(" Unavailable "));
    frame.render_widget(paragraph, area);
}
