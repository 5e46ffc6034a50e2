// Keyboard input handling.
//
// Translates crossterm key events into local ViewState mutations (tab
// switching, scrolling, filter cycling) or a UserCommand for the event loop.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use sidelined_core::filter::FilterField;

use super::{TabId, UserCommand, ViewState};

/// Handle a keyboard event.
///
/// Returns `Some(UserCommand::Quit)` when the dashboard should exit; all
/// other keys are handled locally and return `None`.
pub fn handle_key(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    // Only process key press events. On Windows, crossterm emits both
    // Press and Release events for each physical keypress.
    if key_event.kind != KeyEventKind::Press {
        return None;
    }

    // Ctrl+C always quits immediately regardless of mode
    if key_event.modifiers.contains(KeyModifiers::CONTROL) && key_event.code == KeyCode::Char('c') {
        return Some(UserCommand::Quit);
    }

    if view_state.confirm_quit {
        return handle_confirm_quit(key_event, view_state);
    }

    match key_event.code {
        // Tab switching
        KeyCode::Char(c @ '1'..='7') => {
            let index = c as usize - '1' as usize;
            view_state.active_tab = TabId::ALL[index];
            None
        }
        KeyCode::Tab | KeyCode::Right => {
            view_state.active_tab = view_state.active_tab.next();
            None
        }
        KeyCode::BackTab | KeyCode::Left => {
            view_state.active_tab = view_state.active_tab.prev();
            None
        }

        // Scrolling (main panel)
        KeyCode::Up | KeyCode::Char('k') => {
            scroll_up(view_state, 1);
            None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            scroll_down(view_state, 1);
            None
        }
        KeyCode::PageUp => {
            scroll_up(view_state, page_size());
            None
        }
        KeyCode::PageDown => {
            scroll_down(view_state, page_size());
            None
        }

        // Filter cycling: lowercase forward, uppercase backward
        KeyCode::Char(c) if filter_for_key(c).is_some() => {
            if let Some(field) = filter_for_key(c) {
                view_state.cycle_filter(field, c.is_ascii_lowercase());
            }
            None
        }

        KeyCode::Esc => {
            view_state.clear_filters();
            None
        }

        // Quit: enter confirmation mode instead of quitting immediately
        KeyCode::Char('q') => {
            view_state.confirm_quit = true;
            None
        }

        _ => None,
    }
}

/// Handle key events while in quit confirmation mode.
///
/// - `y` or `q` confirms quit
/// - `n` or `Esc` cancels
/// - All other keys are blocked
fn handle_confirm_quit(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Char('q') | KeyCode::Char('Q') => {
            Some(UserCommand::Quit)
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            view_state.confirm_quit = false;
            None
        }
        _ => None,
    }
}

/// Filter control bound to a letter key, either case.
fn filter_for_key(c: char) -> Option<FilterField> {
    match c.to_ascii_lowercase() {
        'p' => Some(FilterField::Player),
        't' => Some(FilterField::Team),
        's' => Some(FilterField::Season),
        'm' => Some(FilterField::Month),
        _ => None,
    }
}

fn scroll_up(view_state: &mut ViewState, lines: usize) {
    let key = view_state.active_tab.scroll_key();
    let offset = view_state.scroll_offset.entry(key.to_string()).or_insert(0);
    *offset = offset.saturating_sub(lines);
}

fn scroll_down(view_state: &mut ViewState, lines: usize) {
    let tab = view_state.active_tab;
    let max = view_state.max_scroll(tab);
    let offset = view_state.scroll_offset.entry(tab.scroll_key().to_string()).or_insert(0);
    *offset = offset.saturating_add(lines).min(max);
}

/// Page size for PageUp/PageDown scrolling.
fn page_size() -> usize {
    10
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::test_support::sample_state;
    use crossterm::event::{KeyEventState, KeyModifiers};

    /// Helper to create a KeyEvent with no modifiers.
    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn shift_key(c: char) -> KeyEvent {
        KeyEvent {
            code: KeyCode::Char(c),
            modifiers: KeyModifiers::SHIFT,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn ctrl_key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::CONTROL,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    // -- Tab switching --

    #[test]
    fn number_keys_select_tabs() {
        let mut state = sample_state();
        for (i, tab) in TabId::ALL.iter().enumerate() {
            let c = char::from(b'1' + i as u8);
            assert!(handle_key(key(KeyCode::Char(c)), &mut state).is_none());
            assert_eq!(state.active_tab, *tab);
        }
    }

    #[test]
    fn eight_is_not_a_tab() {
        let mut state = sample_state();
        state.active_tab = TabId::Age;
        handle_key(key(KeyCode::Char('8')), &mut state);
        assert_eq!(state.active_tab, TabId::Age);
    }

    #[test]
    fn tab_key_advances_and_wraps() {
        let mut state = sample_state();
        state.active_tab = TabId::Columns;
        handle_key(key(KeyCode::Tab), &mut state);
        assert_eq!(state.active_tab, TabId::Drops);
        handle_key(key(KeyCode::BackTab), &mut state);
        assert_eq!(state.active_tab, TabId::Columns);
    }

    // -- Scroll --

    #[test]
    fn j_and_k_scroll_active_tab() {
        let mut state = sample_state();
        state.active_tab = TabId::Columns;
        handle_key(key(KeyCode::Char('j')), &mut state);
        handle_key(key(KeyCode::Down), &mut state);
        assert_eq!(state.scroll_offset["columns"], 2);
        handle_key(key(KeyCode::Char('k')), &mut state);
        assert_eq!(state.scroll_offset["columns"], 1);
        assert_eq!(state.scroll_offset.get("drops"), None);
    }

    #[test]
    fn scroll_down_stops_at_last_line() {
        let mut state = sample_state();
        let max = state.max_scroll(TabId::Drops);
        for _ in 0..50 {
            handle_key(key(KeyCode::Down), &mut state);
        }
        assert_eq!(state.scroll_offset["drops"], max);
        // One step back moves immediately, with no hidden overshoot.
        handle_key(key(KeyCode::Up), &mut state);
        assert_eq!(state.scroll_offset["drops"], max.saturating_sub(1));
    }

    #[test]
    fn views_without_lists_never_scroll() {
        let mut state = sample_state();
        state.active_tab = TabId::Age;
        handle_key(key(KeyCode::PageDown), &mut state);
        assert_eq!(state.scroll_offset["age"], 0);
    }

    #[test]
    fn scroll_up_does_not_underflow() {
        let mut state = sample_state();
        handle_key(key(KeyCode::Up), &mut state);
        assert_eq!(state.scroll_offset["drops"], 0);
    }

    #[test]
    fn page_keys_scroll_by_page_size() {
        let mut state = sample_state();
        state.active_tab = TabId::Leaderboard;
        handle_key(key(KeyCode::PageDown), &mut state);
        let max = state.max_scroll(TabId::Leaderboard);
        assert_eq!(state.scroll_offset["leaderboard"], max.min(10));
        state.scroll_offset.insert("leaderboard".to_string(), 12);
        handle_key(key(KeyCode::PageUp), &mut state);
        assert_eq!(state.scroll_offset["leaderboard"], 2);
    }

    // -- Filters --

    #[test]
    fn lowercase_cycles_forward() {
        let mut state = sample_state();
        handle_key(key(KeyCode::Char('t')), &mut state);
        assert_eq!(state.filters.team.as_deref(), Some("Northbridge"));
        handle_key(key(KeyCode::Char('s')), &mut state);
        assert_eq!(state.filters.season.as_deref(), Some("2020/21"));
        assert_eq!(state.report.summary.records, 1);
    }

    #[test]
    fn uppercase_cycles_backward() {
        let mut state = sample_state();
        handle_key(shift_key('M'), &mut state);
        assert_eq!(state.filters.month.as_deref(), Some("2021-10"));
        handle_key(shift_key('P'), &mut state);
        assert_eq!(state.filters.player.as_deref(), Some("C"));
        assert_eq!(state.report.summary.records, 1);
    }

    #[test]
    fn esc_clears_all_filters() {
        let mut state = sample_state();
        handle_key(key(KeyCode::Char('p')), &mut state);
        handle_key(key(KeyCode::Char('m')), &mut state);
        assert!(!state.filters.is_empty());
        handle_key(key(KeyCode::Esc), &mut state);
        assert!(state.filters.is_empty());
        assert_eq!(state.report.summary.records, 4);
    }

    // -- Quit --

    #[test]
    fn q_asks_for_confirmation() {
        let mut state = sample_state();
        assert!(handle_key(key(KeyCode::Char('q')), &mut state).is_none());
        assert!(state.confirm_quit);
        assert_eq!(
            handle_key(key(KeyCode::Char('y')), &mut state),
            Some(UserCommand::Quit)
        );
    }

    #[test]
    fn confirmation_can_be_cancelled() {
        let mut state = sample_state();
        handle_key(key(KeyCode::Char('q')), &mut state);
        assert!(handle_key(key(KeyCode::Esc), &mut state).is_none());
        assert!(!state.confirm_quit);
    }

    #[test]
    fn confirmation_blocks_other_keys() {
        let mut state = sample_state();
        handle_key(key(KeyCode::Char('q')), &mut state);
        handle_key(key(KeyCode::Char('3')), &mut state);
        handle_key(key(KeyCode::Char('p')), &mut state);
        assert_eq!(state.active_tab, TabId::Drops);
        assert!(state.filters.is_empty());
        assert!(state.confirm_quit);
    }

    #[test]
    fn ctrl_c_quits_immediately() {
        let mut state = sample_state();
        assert_eq!(
            handle_key(ctrl_key(KeyCode::Char('c')), &mut state),
            Some(UserCommand::Quit)
        );
        state.confirm_quit = true;
        assert_eq!(
            handle_key(ctrl_key(KeyCode::Char('c')), &mut state),
            Some(UserCommand::Quit)
        );
    }

    #[test]
    fn release_events_are_ignored() {
        let mut state = sample_state();
        let mut event = key(KeyCode::Char('2'));
        event.kind = KeyEventKind::Release;
        assert!(handle_key(event, &mut state).is_none());
        assert_eq!(state.active_tab, TabId::Drops);
    }
}
