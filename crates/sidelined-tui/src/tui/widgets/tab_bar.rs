// Tab bar widget: one label per main-panel view, active tab highlighted.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::tui::TabId;

pub fn render(frame: &mut Frame, area: Rect, active: TabId) {
    let paragraph = Paragraph::new(Line::from(tab_spans(active)));
    frame.render_widget(paragraph, area);
}

/// Tab indicator spans, e.g. "[1:Drops] [2:Teams] ...".
pub fn tab_spans(active: TabId) -> Vec<Span<'static>> {
    let mut spans = vec![Span::raw(" ")];
    for (i, tab) in TabId::ALL.iter().enumerate() {
        let style = if *tab == active {
            Style::default()
                .fg(Color::Black)
                .bg(Color::White)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        spans.push(Span::styled(format!("[{}:{}]", i + 1, tab.label()), style));
        spans.push(Span::raw(" "));
    }
    spans
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tab_spans_label_every_tab() {
        let spans = tab_spans(TabId::Drops);
        let labels: Vec<&str> = spans
            .iter()
            .map(|s| s.content.as_ref())
            .filter(|c| c.starts_with('['))
            .collect();
        assert_eq!(
            labels,
            vec![
                "[1:Drops]",
                "[2:Teams]",
                "[3:Heatmap]",
                "[4:Age]",
                "[5:Leaderboard]",
                "[6:Before/After]",
                "[7:Columns]"
            ]
        );
    }

    #[test]
    fn tab_spans_highlight_active() {
        let spans = tab_spans(TabId::Heatmap);
        // 0 = leading space, then label/space pairs: [3:Heatmap] is at 5.
        assert_eq!(spans[5].content, "[3:Heatmap]");
        assert!(spans[5].style.add_modifier.contains(Modifier::BOLD));
        assert!(!spans[1].style.add_modifier.contains(Modifier::BOLD));
    }
}
