// Self-contained HTML pages for each exported view.
//
// Every page embeds its CSS and SVG so it opens offline.

use sidelined_core::report::{Bar, BarChart, BeforeAfter, Heatmap, Leaderboard, Scatter};

use crate::svg::{self, ChartError};

/// Render a full HTML document around `body`.
pub fn page(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>{css}</style>
</head>
<body>
    <div class="container">
        <header><h1>{title}</h1></header>
        {body}
        <footer>Generated by sidelined-export</footer>
    </div>
</body>
</html>"#,
        title = escape(title),
        css = inline_css(),
    )
}

fn inline_css() -> &'static str {
    r#"
* { box-sizing: border-box; margin: 0; padding: 0; }
body { font-family: system-ui, -apple-system, 'Segoe UI', sans-serif; color: #111827; background: #ffffff; line-height: 1.5; }
.container { max-width: 1100px; margin: 0 auto; padding: 2rem; }
header { margin-bottom: 1.5rem; padding-bottom: 0.75rem; border-bottom: 2px solid #e5e7eb; }
header h1 { font-size: 1.6rem; font-weight: 700; }
.caption { color: #6b7280; font-size: 0.9rem; margin: 0.5rem 0 1rem; }
figure.chart svg { width: 100%; height: auto; }
h2 { font-size: 1.1rem; margin: 1.5rem 0 0.5rem; }
table { border-collapse: collapse; width: 100%; font-size: 0.9rem; }
th, td { padding: 0.4rem 0.75rem; border-bottom: 1px solid #e5e7eb; text-align: right; }
th:first-child, td:first-child { text-align: left; }
th { background: #f9fafb; font-weight: 600; }
footer { margin-top: 2rem; color: #9ca3af; font-size: 0.8rem; }
"#
}

pub fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Whole numbers without decimals, everything else to two places.
pub fn number(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{v:.0}")
    } else {
        format!("{v:.2}")
    }
}

/// Table cell text for a value that may be unknown.
pub fn optional(v: Option<f64>) -> String {
    v.map(number).unwrap_or_else(|| "n/a".to_string())
}

fn caption(text: &str) -> String {
    format!(r#"<p class="caption">{}</p>"#, escape(text))
}

fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let head: String = headers
        .iter()
        .map(|h| format!("<th>{}</th>", escape(h)))
        .collect();
    let body: String = rows
        .iter()
        .map(|row| {
            let cells: String = row
                .iter()
                .map(|c| format!("<td>{}</td>", escape(c)))
                .collect();
            format!("<tr>{cells}</tr>")
        })
        .collect();
    format!("<table><thead><tr>{head}</tr></thead><tbody>{body}</tbody></table>")
}

// ---------------------------------------------------------------------------
// Per-view pages
// ---------------------------------------------------------------------------

fn figure(svg: String) -> String {
    format!(r#"<figure class="chart">{svg}</figure>"#)
}

pub fn bar_page(chart: &BarChart) -> Result<String, ChartError> {
    Ok(page(&chart.title, &figure(svg::bar_chart(chart)?)))
}

pub fn heatmap_page(grid: &Heatmap) -> Result<String, ChartError> {
    let body = format!(
        "{}{}",
        caption(&format!(
            "{} injuries across {} {} value(s) and {} month(s)",
            grid.total(),
            grid.rows.len(),
            grid.row_label,
            grid.columns.len()
        )),
        figure(svg::heatmap(grid)?)
    );
    Ok(page("Injury frequency by month and team", &body))
}

/// Scatter figure followed by the plotted points, labelled by player and team.
pub fn scatter_page(plot: &Scatter) -> Result<String, ChartError> {
    let note = match &plot.trend {
        Some(fit) => format!(
            "{} points; trend y = {:.3}x + {:.3} (R² = {:.2})",
            plot.points.len(),
            fit.slope,
            fit.intercept,
            fit.r_squared
        ),
        None => format!("{} point(s); not enough spread for a trend line", plot.points.len()),
    };
    let points: Vec<Vec<String>> = plot
        .points
        .iter()
        .map(|p| {
            vec![
                p.player.clone().unwrap_or_else(|| "n/a".to_string()),
                p.team.clone().unwrap_or_else(|| "n/a".to_string()),
                number(p.x),
                number(p.y),
            ]
        })
        .collect();
    let body = format!(
        "{}{}<h2>Points</h2>{}",
        caption(&note),
        figure(svg::scatter(plot)?),
        table(&["player", "team", &plot.x_label, &plot.y_label], &points)
    );
    Ok(page(&plot.title, &body))
}

pub fn leaderboard_page(board: &Leaderboard) -> String {
    let rows: Vec<Vec<String>> = board
        .rows
        .iter()
        .map(|r| {
            vec![
                r.player.clone(),
                optional(r.avg_rating_before),
                optional(r.avg_rating_after),
                optional(r.performance_drop_index),
                optional(r.rating_improvement),
            ]
        })
        .collect();
    let body = table(
        &[
            "player",
            "avg_rating_before",
            "avg_rating_after",
            "performance_drop_index",
            "rating_improvement",
        ],
        &rows,
    );
    page("Leaderboard: top rating improvements", &body)
}

/// Two bars for the player's mean rating before and after; an unknown side is
/// named in the caption instead of drawn.
pub fn before_after_page(ba: &BeforeAfter) -> Result<String, ChartError> {
    let bars: Vec<Bar> = [("avg_before", ba.before), ("avg_after", ba.after)]
        .into_iter()
        .filter_map(|(label, value)| {
            value.map(|value| Bar {
                label: label.to_string(),
                value,
            })
        })
        .collect();
    let title = format!("Avg before vs after injury: {}", ba.player);
    let chart = BarChart {
        title: title.clone(),
        x_label: "phase".to_string(),
        y_label: "rating".to_string(),
        bars,
    };

    let mut note = format!("{} record(s)", ba.records);
    for (label, value) in [("before", ba.before), ("after", ba.after)] {
        if value.is_none() {
            note.push_str(&format!("; no known {label} rating"));
        }
    }
    let body = format!("{}{}", caption(&note), figure(svg::bar_chart(&chart)?));
    Ok(page(&title, &body))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use sidelined_core::report::{AgeMetric, LeaderboardRow, ScatterPoint};

    #[test]
    fn escape_covers_markup_characters() {
        assert_eq!(
            escape(r#"<a href="x">O'Neil & co</a>"#),
            "&lt;a href=&quot;x&quot;&gt;O&#39;Neil &amp; co&lt;/a&gt;"
        );
    }

    #[test]
    fn numbers_format_compactly() {
        assert_eq!(number(5.0), "5");
        assert_eq!(number(-1.0), "-1");
        assert_eq!(number(6.75), "6.75");
        assert_eq!(number(7.166666), "7.17");
        assert_eq!(optional(None), "n/a");
    }

    #[test]
    fn page_is_self_contained() {
        let html = page("Title <1>", "<p>body</p>");
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<style>"));
        assert!(html.contains("Title &lt;1&gt;"));
        assert!(!html.contains("<script"));
        assert!(!html.contains("<link"));
    }

    #[test]
    fn leaderboard_page_marks_unknown_values() {
        let board = Leaderboard {
            rows: vec![LeaderboardRow {
                player: "C".into(),
                avg_rating_before: Some(7.0),
                avg_rating_after: None,
                performance_drop_index: None,
                rating_improvement: None,
            }],
        };
        let html = leaderboard_page(&board);
        assert!(html.contains("<td>C</td><td>7</td><td>n/a</td>"));
        assert!(html.contains("<th>rating_improvement</th>"));
    }

    #[test]
    fn before_after_with_one_side_unknown() {
        let ba = BeforeAfter {
            player: "Nils Brandt".into(),
            records: 1,
            before: Some(6.2),
            after: None,
        };
        let html = before_after_page(&ba).unwrap();
        assert!(html.contains("Avg before vs after injury: Nils Brandt"));
        assert!(html.contains("no known after rating"));
        assert!(html.contains("avg_before"));
        assert!(!html.contains("avg_after"));
    }

    #[test]
    fn scatter_page_lists_points_with_labels() {
        let plot = Scatter {
            title: "Age vs performance drop".into(),
            metric: AgeMetric::PerformanceDrop,
            x_label: "age".into(),
            y_label: "performance_drop_index".into(),
            points: vec![ScatterPoint {
                x: 27.0,
                y: 1.25,
                player: Some("Marcus Hale".into()),
                team: None,
            }],
            trend: None,
        };
        let html = scatter_page(&plot).unwrap();
        assert!(html.contains("<figure class=\"chart\">"));
        assert!(html.contains("<svg"));
        assert!(html.contains("<td>Marcus Hale</td><td>n/a</td><td>27</td><td>1.25</td>"));
        assert!(html.contains("not enough spread"));
    }
}
