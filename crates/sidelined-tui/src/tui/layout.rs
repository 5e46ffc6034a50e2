// Screen layout: panel arrangement and sizing.
//
// +--------------------------------------------------+
// | Status Bar (1 row)                                |
// +--------------------------------------------------+
// | Summary (3 rows)                                  |
// +--------------------------------------------------+
// | Tab Bar (1 row)                                   |
// +-------------------------------+------------------+
// | Main Panel (75%)              | Filters (25%)    |
// +-------------------------------+------------------+
// | Help Bar (1 row)                                  |
// +--------------------------------------------------+

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Resolved screen areas for each dashboard zone.
#[derive(Debug, Clone)]
pub struct AppLayout {
    /// Top row: data source, row counts, active filters.
    pub status_bar: Rect,
    /// Headline numbers for the filtered rows.
    pub summary: Rect,
    /// Tab indicator row.
    pub tab_bar: Rect,
    /// Tab-switched view area.
    pub main_panel: Rect,
    /// Right column: filter controls.
    pub filters: Rect,
    /// Bottom row: keyboard shortcut hints.
    pub help_bar: Rect,
}

/// Build the dashboard layout from the available terminal area.
pub fn build_layout(area: Rect) -> AppLayout {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // status bar
            Constraint::Length(3), // summary
            Constraint::Length(1), // tab bar
            Constraint::Min(6),    // main + filters
            Constraint::Length(1), // help bar
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(75), Constraint::Percentage(25)])
        .split(vertical[3]);

    AppLayout {
        status_bar: vertical[0],
        summary: vertical[1],
        tab_bar: vertical[2],
        main_panel: horizontal[0],
        filters: horizontal[1],
        help_bar: vertical[4],
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
