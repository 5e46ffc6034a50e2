// TUI widget modules for each dashboard panel.

pub mod bar_chart;
pub mod before_after;
pub mod columns;
pub mod filters;
pub mod heatmap;
pub mod leaderboard;
pub mod notice;
pub mod quit_confirm;
pub mod scatter;
pub mod status_bar;
pub mod summary;
pub mod tab_bar;

/// Truncate `s` to `width` characters, marking the cut with `…`.
pub fn fit(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        return s.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut out: String = s.chars().take(width - 1).collect();
    out.push('…');
    out
}

/// Clamp a requested scroll offset so the last page stays filled.
pub fn clamp_scroll(offset: usize, total_lines: usize, visible_rows: usize) -> usize {
    offset.min(total_lines.saturating_sub(visible_rows))
}
