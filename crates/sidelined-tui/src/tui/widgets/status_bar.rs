// Status bar widget: data source, row counts, active filters.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use sidelined_core::filter::{FilterField, Filters};

use crate::tui::ViewState;

/// Render the status bar into the given area.
///
/// Layout: [source] [total rows] [filtered rows] [active filters]
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let source = state
        .dataset
        .source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| state.dataset.source.display().to_string());

    let sep = || Span::styled(" | ", Style::default().fg(Color::Gray));
    let spans = vec![
        Span::styled(
            format!(" {source}"),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        sep(),
        Span::styled(
            format!("{} rows", state.dataset.table.row_count()),
            Style::default().fg(Color::White),
        ),
        sep(),
        Span::styled(
            format!("{} shown", state.report.summary.records),
            Style::default().fg(Color::White),
        ),
        sep(),
        Span::styled(
            format!("Filters: {}", describe_filters(&state.filters)),
            Style::default().fg(if state.filters.is_empty() {
                Color::DarkGray
            } else {
                Color::Yellow
            }),
        ),
    ];

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, area);
}

/// "none", or the active filters as `Label=value` pairs.
pub fn describe_filters(filters: &Filters) -> String {
    let active: Vec<String> = FilterField::ALL
        .iter()
        .filter_map(|f| filters.get(*f).map(|v| format!("{}={}", f.label(), v)))
        .collect();
    if active.is_empty() {
        "none".to_string()
    } else {
        active.join(", ")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
