// Filter sidebar: current value of each control and the key that cycles it.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use sidelined_core::filter::FilterField;

use super::fit;
use crate::tui::ViewState;

/// Key bound to each control (lowercase forward, uppercase backward).
pub fn key_for(field: FilterField) -> char {
    match field {
        FilterField::Player => 'p',
        FilterField::Team => 't',
        FilterField::Season => 's',
        FilterField::Month => 'm',
    }
}

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let value_width = (area.width as usize).saturating_sub(4);
    let mut lines = Vec::new();

    for field in FilterField::ALL {
        let choices = state.choices.get(&field).map_or(0, Vec::len);
        lines.push(Line::from(vec![
            Span::styled(
                format!(" {} ", key_for(field)),
                Style::default().fg(Color::Black).bg(Color::Gray),
            ),
            Span::styled(
                format!(" {}", field.label()),
                Style::default().fg(Color::Gray),
            ),
        ]));

        let value = match state.filters.get(field) {
            Some(v) => Span::styled(
                fit(v, value_width),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            None if choices == 0 => Span::styled("n/a", Style::default().fg(Color::DarkGray)),
            None => Span::styled(
                format!("All ({choices})"),
                Style::default().fg(Color::White),
            ),
        };
        lines.push(Line::from(vec![Span::raw("   "), value]));
        lines.push(Line::from(""));
    }

    let paragraph = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Filters"));
    frame.render_widget(paragraph, area);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
