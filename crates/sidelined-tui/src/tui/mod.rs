// TUI dashboard: layout, input handling, and widget rendering.
//
// The TUI owns a `ViewState` holding the enriched dataset, the current filter
// selection, and the report built from it. Every filter change rebuilds the
// report; the frame is redrawn at ~30 fps from whatever the state holds.

pub mod input;
pub mod layout;
pub mod widgets;

use std::collections::HashMap;
use std::time::Duration;

use crossterm::event::{Event, EventStream};
use futures_util::StreamExt;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::{DefaultTerminal, Frame};
use tracing::{debug, error, info};

use sidelined_core::filter::{FilterField, Filters};
use sidelined_core::report::{Report, ReportOptions, ViewKind, ViewResult};
use sidelined_core::Dataset;

use layout::{build_layout, AppLayout};
use widgets::{
    bar_chart, before_after, columns, filters, heatmap, leaderboard, notice, quit_confirm,
    scatter, status_bar, summary, tab_bar,
};

// ---------------------------------------------------------------------------
// Tabs and commands
// ---------------------------------------------------------------------------

/// Main-panel tabs, in key order (`1`..`7`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TabId {
    Drops,
    Teams,
    Heatmap,
    Age,
    Leaderboard,
    BeforeAfter,
    Columns,
}

impl TabId {
    pub const ALL: [TabId; 7] = [
        TabId::Drops,
        TabId::Teams,
        TabId::Heatmap,
        TabId::Age,
        TabId::Leaderboard,
        TabId::BeforeAfter,
        TabId::Columns,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TabId::Drops => "Drops",
            TabId::Teams => "Teams",
            TabId::Heatmap => "Heatmap",
            TabId::Age => "Age",
            TabId::Leaderboard => "Leaderboard",
            TabId::BeforeAfter => "Before/After",
            TabId::Columns => "Columns",
        }
    }

    /// Key for this tab's entry in `ViewState::scroll_offset`.
    pub fn scroll_key(self) -> &'static str {
        match self {
            TabId::Drops => "drops",
            TabId::Teams => "teams",
            TabId::Heatmap => "heatmap",
            TabId::Age => "age",
            TabId::Leaderboard => "leaderboard",
            TabId::BeforeAfter => "before_after",
            TabId::Columns => "columns",
        }
    }

    pub fn next(self) -> TabId {
        let i = TabId::ALL.iter().position(|t| *t == self).unwrap_or(0);
        TabId::ALL[(i + 1) % TabId::ALL.len()]
    }

    pub fn prev(self) -> TabId {
        let i = TabId::ALL.iter().position(|t| *t == self).unwrap_or(0);
        TabId::ALL[(i + TabId::ALL.len() - 1) % TabId::ALL.len()]
    }
}

/// Commands produced by the input handler that the event loop acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserCommand {
    Quit,
}

// ---------------------------------------------------------------------------
// ViewState
// ---------------------------------------------------------------------------

/// TUI-local state: the dataset, the active filters, and the report for them.
pub struct ViewState {
    /// Enriched, unfiltered data.
    pub dataset: Dataset,
    /// Top-N limits for the views.
    pub options: ReportOptions,
    /// Current filter selection.
    pub filters: Filters,
    /// Choices per filter control, computed once from the unfiltered table.
    pub choices: HashMap<FilterField, Vec<String>>,
    /// Report over the filtered rows; rebuilt on every filter change.
    pub report: Report,
    /// Which tab is active in the main panel.
    pub active_tab: TabId,
    /// Per-widget scroll offsets (keyed by `TabId::scroll_key`).
    pub scroll_offset: HashMap<String, usize>,
    /// Whether the quit confirmation dialog is showing.
    pub confirm_quit: bool,
}

impl ViewState {
    pub fn new(dataset: Dataset, options: ReportOptions) -> ViewState {
        let filters = Filters::default();
        let choices = FilterField::ALL
            .iter()
            .map(|f| (*f, dataset.options(*f)))
            .collect();
        let report = dataset.report(&filters, &options);
        ViewState {
            dataset,
            options,
            filters,
            choices,
            report,
            active_tab: TabId::Drops,
            scroll_offset: HashMap::new(),
            confirm_quit: false,
        }
    }

    /// Rebuild the report for the current filters and reset scrolling.
    pub fn refresh(&mut self) {
        self.report = self.dataset.report(&self.filters, &self.options);
        self.scroll_offset.clear();
        debug!(
            "report refreshed: {} of {} rows",
            self.report.summary.records,
            self.dataset.table.row_count()
        );
    }

    /// Step a filter control through "All" followed by its sorted choices.
    pub fn cycle_filter(&mut self, field: FilterField, forward: bool) {
        let empty = Vec::new();
        let choices = self.choices.get(&field).unwrap_or(&empty);
        let current = self
            .filters
            .get(field)
            .and_then(|v| choices.iter().position(|c| c == v));

        let next = match (current, forward) {
            (None, true) => choices.first(),
            (None, false) => choices.last(),
            (Some(i), true) => choices.get(i + 1),
            (Some(0), false) => None,
            (Some(i), false) => choices.get(i - 1),
        };
        self.filters.set(field, next.cloned());
        self.refresh();
    }

    pub fn clear_filters(&mut self) {
        if !self.filters.is_empty() {
            self.filters = Filters::default();
            self.refresh();
        }
    }

    pub fn scroll(&self, tab: TabId) -> usize {
        self.scroll_offset.get(tab.scroll_key()).copied().unwrap_or(0)
    }

    /// Largest offset worth storing for `tab`: its last line at the top.
    pub fn max_scroll(&self, tab: TabId) -> usize {
        let report = &self.report;
        let lines = match tab {
            // Bar charts carry a header line above the bars.
            TabId::Drops => report.top_drops.as_ref().map_or(0, |c| c.bars.len() + 1),
            TabId::Teams => report.team_counts.as_ref().map_or(0, |c| c.bars.len() + 1),
            TabId::Heatmap => report.month_team.as_ref().map_or(0, |g| g.rows.len()),
            TabId::Leaderboard => report.leaderboard.as_ref().map_or(0, |b| b.rows.len()),
            TabId::Columns => report.columns.len(),
            TabId::Age | TabId::BeforeAfter => 0,
        };
        lines.saturating_sub(1)
    }
}

// ---------------------------------------------------------------------------
// Render frame
// ---------------------------------------------------------------------------

/// Render the complete dashboard frame.
pub fn render_frame(frame: &mut Frame, state: &ViewState) {
    let layout = build_layout(frame.area());

    status_bar::render(frame, layout.status_bar, state);
    summary::render(frame, layout.summary, &state.report.summary);
    tab_bar::render(frame, layout.tab_bar, state.active_tab);
    render_main_panel(frame, layout.main_panel, state);
    filters::render(frame, layout.filters, state);
    render_help_bar(frame, &layout);

    if state.confirm_quit {
        quit_confirm::render(frame, frame.area());
    }
}

/// Draw a view, or its notice when it could not be produced.
fn render_view<T>(
    frame: &mut Frame,
    area: Rect,
    result: &ViewResult<T>,
    draw: impl FnOnce(&mut Frame, Rect, &T),
) {
    match result {
        Ok(view) => draw(frame, area, view),
        Err(unavailable) => notice::render(frame, area, unavailable),
    }
}

fn render_main_panel(frame: &mut Frame, area: Rect, state: &ViewState) {
    let report = &state.report;
    let scroll = state.scroll(state.active_tab);
    match state.active_tab {
        TabId::Drops => render_view(frame, area, &report.top_drops, |f, a, chart| {
            bar_chart::render(f, a, chart, scroll)
        }),
        TabId::Teams => render_view(frame, area, &report.team_counts, |f, a, chart| {
            bar_chart::render(f, a, chart, scroll)
        }),
        TabId::Heatmap => render_view(frame, area, &report.month_team, |f, a, grid| {
            heatmap::render(f, a, grid, scroll)
        }),
        TabId::Age => render_view(frame, area, &report.age, scatter::render),
        TabId::Leaderboard => render_view(frame, area, &report.leaderboard, |f, a, board| {
            leaderboard::render(f, a, board, scroll)
        }),
        TabId::BeforeAfter => {
            render_view(frame, area, &report.before_after, before_after::render)
        }
        TabId::Columns => columns::render(frame, area, state, scroll),
    }
}

fn render_help_bar(frame: &mut Frame, layout: &AppLayout) {
    let text = " q:Quit | 1-7:Tabs | p/t/s/m:Filter (shift: back) | Esc:Clear | j/k PgUp/PgDn:Scroll";
    let paragraph = Paragraph::new(Line::from(vec![Span::styled(
        text,
        Style::default().fg(Color::White).add_modifier(Modifier::DIM),
    )]))
    .style(Style::default().bg(Color::DarkGray));
    frame.render_widget(paragraph, layout.help_bar);
}

// ---------------------------------------------------------------------------
// Main TUI loop
// ---------------------------------------------------------------------------

/// Run the TUI event loop.
///
/// This is the main entry point for the terminal UI. It:
/// 1. Initializes the terminal (enters raw mode, enables alternate screen).
/// 2. Installs a panic hook to restore the terminal on crash.
/// 3. Runs an async select loop: keyboard input and render ticks.
/// 4. Restores the terminal on exit, including when the loop fails.
pub async fn run(dataset: Dataset, options: ReportOptions) -> anyhow::Result<()> {
    let mut view_state = ViewState::new(dataset, options);
    info!(
        "dashboard ready: {} rows, {} of {} views available",
        view_state.dataset.table.row_count(),
        ViewKind::ALL.len() - view_state.report.unavailable().len(),
        ViewKind::ALL.len()
    );

    let mut terminal = ratatui::init();

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = ratatui::restore();
        original_hook(panic_info);
    }));

    let result = event_loop(&mut terminal, &mut view_state).await;

    ratatui::restore();
    result
}

async fn event_loop(terminal: &mut DefaultTerminal, view_state: &mut ViewState) -> anyhow::Result<()> {
    let mut event_stream = EventStream::new();

    let mut render_tick = tokio::time::interval(Duration::from_millis(33));
    render_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key_event))) => {
                        if let Some(UserCommand::Quit) = input::handle_key(key_event, view_state) {
                            info!("quit requested");
                            break;
                        }
                    }
                    Some(Ok(_)) => {
                        // Mouse and resize events: the next tick redraws at the new size.
                    }
                    Some(Err(e)) => {
                        error!("terminal input error: {}", e);
                        break;
                    }
                    None => break,
                }
            }

            _ = render_tick.tick() => {
                terminal.draw(|frame| render_frame(frame, view_state))?;
            }
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Test support
// ---------------------------------------------------------------------------

#[cfg(test)]
pub(crate) mod test_support {
    use std::path::PathBuf;

    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use sidelined_core::report::ReportOptions;
    use sidelined_core::table::{Column, Table};
    use sidelined_core::Dataset;

    use super::ViewState;

    fn text(values: &[&str]) -> Column {
        Column::Text(values.iter().map(|v| Some(v.to_string())).collect())
    }

    /// Four injuries for three players on two teams.
    pub fn sample_dataset() -> Dataset {
        let mut t = Table::with_rows(4);
        t.set("Player Name", text(&["A", "B", "A", "C"]));
        t.set("Team", text(&["Northbridge", "Westvale", "Northbridge", "Westvale"]));
        t.set("Season", text(&["2020/21", "2020/21", "2021/22", "2021/22"]));
        t.set("Age", text(&["27", "22", "28", "31"]));
        t.set("FIFA rating", text(&["83", "78", "84", "80"]));
        t.set(
            "Date of Injury",
            text(&["2020-10-03", "2020-12-01", "2021-09-18", "2021-10-09"]),
        );
        t.set("Match1_before_injury_Player_rating", text(&["7.0", "6.0", "8.0", "6.5"]));
        t.set("Match1_after_injury_Player_rating", text(&["6.0", "7.0", "6.5", "6.5"]));
        Dataset::from_raw(PathBuf::from("sample.csv"), t)
    }

    pub fn sample_state() -> ViewState {
        ViewState::new(sample_dataset(), ReportOptions::default())
    }

    /// Every cell symbol of the rendered buffer, row after row.
    pub fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::test_support::{buffer_text, sample_state};
    use super::*;

    #[test]
    fn new_state_starts_unfiltered_on_first_tab() {
        let state = sample_state();
        assert_eq!(state.active_tab, TabId::Drops);
        assert!(state.filters.is_empty());
        assert_eq!(state.report.summary.records, 4);
        assert!(state.scroll_offset.is_empty());
        assert!(!state.confirm_quit);
        assert_eq!(state.choices[&FilterField::Player], vec!["A", "B", "C"]);
        assert_eq!(state.choices[&FilterField::Month].len(), 4);
    }

    #[test]
    fn cycle_forward_walks_choices_then_all() {
        let mut state = sample_state();
        state.cycle_filter(FilterField::Player, true);
        assert_eq!(state.filters.player.as_deref(), Some("A"));
        assert_eq!(state.report.summary.records, 2);
        state.cycle_filter(FilterField::Player, true);
        assert_eq!(state.filters.player.as_deref(), Some("B"));
        state.cycle_filter(FilterField::Player, true);
        assert_eq!(state.filters.player.as_deref(), Some("C"));
        state.cycle_filter(FilterField::Player, true);
        assert_eq!(state.filters.player, None);
        assert_eq!(state.report.summary.records, 4);
    }

    #[test]
    fn cycle_backward_starts_from_last() {
        let mut state = sample_state();
        state.cycle_filter(FilterField::Team, false);
        assert_eq!(state.filters.team.as_deref(), Some("Westvale"));
        state.cycle_filter(FilterField::Team, false);
        assert_eq!(state.filters.team.as_deref(), Some("Northbridge"));
        state.cycle_filter(FilterField::Team, false);
        assert_eq!(state.filters.team, None);
    }

    #[test]
    fn filters_combine_and_clear() {
        let mut state = sample_state();
        state.cycle_filter(FilterField::Team, true);
        state.cycle_filter(FilterField::Season, true);
        assert_eq!(state.report.summary.records, 1);

        state.scroll_offset.insert("drops".to_string(), 3);
        state.clear_filters();
        assert!(state.filters.is_empty());
        assert_eq!(state.report.summary.records, 4);
        assert!(state.scroll_offset.is_empty());
    }

    #[test]
    fn max_scroll_follows_view_length() {
        let state = sample_state();
        let bars = state.report.top_drops.as_ref().unwrap().bars.len();
        assert_eq!(state.max_scroll(TabId::Drops), bars);
        assert_eq!(state.max_scroll(TabId::Columns), state.report.columns.len() - 1);
        assert_eq!(state.max_scroll(TabId::Age), 0);
    }

    #[test]
    fn tab_next_and_prev_wrap() {
        assert_eq!(TabId::Drops.next(), TabId::Teams);
        assert_eq!(TabId::Columns.next(), TabId::Drops);
        assert_eq!(TabId::Drops.prev(), TabId::Columns);
    }

    #[test]
    fn render_frame_shows_every_zone() {
        let backend = ratatui::backend::TestBackend::new(140, 40);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let state = sample_state();
        terminal
            .draw(|frame| render_frame(frame, &state))
            .unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains("sample.csv"));
        assert!(text.contains("Records"));
        assert!(text.contains("[1:Drops]"));
        assert!(text.contains("Filters"));
        assert!(text.contains("q:Quit"));
    }

    #[test]
    fn every_tab_renders_without_panicking() {
        let mut state = sample_state();
        for tab in TabId::ALL {
            state.active_tab = tab;
            let backend = ratatui::backend::TestBackend::new(120, 40);
            let mut terminal = ratatui::Terminal::new(backend).unwrap();
            terminal
                .draw(|frame| render_frame(frame, &state))
                .unwrap();
        }
    }

    #[test]
    fn unavailable_view_shows_notice() {
        let mut state = sample_state();
        // Player "A" never appears with Westvale, so the filtered table is empty.
        state.filters.player = Some("A".into());
        state.filters.team = Some("Westvale".into());
        state.refresh();
        state.active_tab = TabId::Teams;

        let backend = ratatui::backend::TestBackend::new(140, 40);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| render_frame(frame, &state))
            .unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains("Unavailable"));
        assert!(text.contains("no rows with a known team"));
    }

    #[test]
    fn quit_dialog_drawn_when_confirming() {
        let mut state = sample_state();
        state.confirm_quit = true;
        let backend = ratatui::backend::TestBackend::new(100, 30);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| render_frame(frame, &state))
            .unwrap();
        assert!(buffer_text(&terminal).contains("Leave the dashboard?"));
    }
}
