// Age scatter plot with an optional least-squares trend line.

use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::symbols::Marker;
use ratatui::text::Line;
use ratatui::widgets::{Axis, Block, Borders, Chart, Dataset, GraphType};
use ratatui::Frame;

use sidelined_core::report::Scatter;

/// Axis bounds covering `values` with 5% padding; a flat range is widened by 1.
pub fn bounds(values: impl Iterator<Item = f64>) -> [f64; 2] {
    let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !lo.is_finite() || !hi.is_finite() {
        return [0.0, 1.0];
    }
    if hi - lo == 0.0 {
        return [lo - 1.0, hi + 1.0];
    }
    let pad = (hi - lo) * 0.05;
    [lo - pad, hi + pad]
}

/// Caption under the plot: the fitted line or why there is none.
pub fn trend_caption(scatter: &Scatter) -> String {
    match &scatter.trend {
        Some(fit) => format!(
            " trend: y = {:.3}x {} {:.3}  R² = {:.3} ",
            fit.slope,
            if fit.intercept < 0.0 { '-' } else { '+' },
            fit.intercept.abs(),
            fit.r_squared
        ),
        None => " trend: not enough spread ".to_string(),
    }
}

pub fn render(frame: &mut Frame, area: Rect, scatter: &Scatter) {
    let points: Vec<(f64, f64)> = scatter.points.iter().map(|p| (p.x, p.y)).collect();
    let x_bounds = bounds(points.iter().map(|p| p.0));
    let y_bounds = bounds(points.iter().map(|p| p.1));
    let trend: Vec<(f64, f64)> = scatter
        .trend
        .as_ref()
        .map(|fit| x_bounds.iter().map(|&x| (x, fit.predict(x))).collect())
        .unwrap_or_default();

    let mut datasets = vec![Dataset::default()
        .name(format!("{} injuries", points.len()))
        .marker(Marker::Braille)
        .graph_type(GraphType::Scatter)
        .style(Style::default().fg(Color::Cyan))
        .data(&points)];
    if !trend.is_empty() {
        datasets.push(
            Dataset::default()
                .name("trend")
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(Color::Yellow))
                .data(&trend),
        );
    }

    let axis_labels = |b: [f64; 2]| [format!("{:.1}", b[0]), format!("{:.1}", b[1])];
    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", scatter.title))
                .title_bottom(Line::from(trend_caption(scatter))),
        )
        .x_axis(
            Axis::default()
                .title(scatter.x_label.clone())
                .style(Style::default().fg(Color::Gray))
                .bounds(x_bounds)
                .labels(axis_labels(x_bounds)),
        )
        .y_axis(
            Axis::default()
                .title(scatter.y_label.clone())
                .style(Style::default().fg(Color::Gray))
                .bounds(y_bounds)
                .labels(axis_labels(y_bounds)),
        );
    frame.render_widget(chart, area);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
