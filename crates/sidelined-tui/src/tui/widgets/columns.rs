// Column inventory: every column after normalization, its type, and the
// role it was resolved to, if any.

use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Row, Table};
use ratatui::Frame;

use sidelined_core::normalize::{Role, Schema};

use super::clamp_scroll;
use crate::tui::ViewState;

/// Role label for `column`, when the schema resolved one to it.
pub fn role_of(schema: &Schema, column: &str) -> Option<&'static str> {
    Role::ALL
        .into_iter()
        .find(|role| schema.column(*role) == Some(column))
        .map(Role::label)
}

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState, scroll: usize) {
    let columns = &state.report.columns;
    let visible_rows = (area.height as usize).saturating_sub(3);
    let scroll = clamp_scroll(scroll, columns.len(), visible_rows);

    let header = Row::new(["Column", "Type", "Role"])
        .style(Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD));
    let rows = columns.iter().skip(scroll).map(|(name, kind)| {
        let role = match role_of(&state.dataset.schema, name) {
            Some(label) => Cell::from(label).style(Style::default().fg(Color::Cyan)),
            None => Cell::from(""),
        };
        Row::new(vec![Cell::from(name.clone()), Cell::from(*kind), role])
    });

    let widths = [
        Constraint::Min(24),
        Constraint::Length(8),
        Constraint::Length(12),
    ];
    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" Columns ({}) ", columns.len())),
    );
    frame.render_widget(table, area);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
