// SVG charts for the HTML exports, drawn with plotters into an in-memory
// string so each page embeds its own figure and opens offline.

use std::error::Error;

use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::{FontTransform, TextStyle};

use sidelined_core::report::{BarChart, Heatmap, Scatter};

use crate::html::number;

const SIZE: (u32, u32) = (900, 480);
const FONT: &str = "sans-serif";

const BAR_COLOR: RGBColor = RGBColor(37, 99, 235);
const NEGATIVE_COLOR: RGBColor = RGBColor(220, 38, 38);
const POINT_COLOR: RGBColor = RGBColor(37, 99, 235);
const TREND_COLOR: RGBColor = RGBColor(245, 158, 11);

/// A chart that plotters could not draw.
#[derive(Debug, thiserror::Error)]
#[error("failed to draw {chart} chart: {message}")]
pub struct ChartError {
    pub chart: &'static str,
    pub message: String,
}

type Area<'a> = DrawingArea<SVGBackend<'a>, Shift>;
type DrawResult = Result<(), Box<dyn Error>>;

/// Run `draw` on a fresh white canvas and return the finished SVG document.
fn render(chart: &'static str, draw: impl FnOnce(&Area<'_>) -> DrawResult) -> Result<String, ChartError> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, SIZE).into_drawing_area();
        paint(&root, draw).map_err(|e| ChartError {
            chart,
            message: e.to_string(),
        })?;
    }
    Ok(svg)
}

fn paint(root: &Area<'_>, draw: impl FnOnce(&Area<'_>) -> DrawResult) -> DrawResult {
    root.fill(&WHITE)?;
    draw(root)?;
    root.present()?;
    Ok(())
}

/// Category label for an integer slot on a `-0.5..n-0.5` axis; tick positions
/// between slots get no label.
fn slot_label(labels: &[&str], pos: f64) -> String {
    let slot = pos.round();
    if (pos - slot).abs() > 1e-6 || slot < 0.0 {
        return String::new();
    }
    labels
        .get(slot as usize)
        .map(|s| s.to_string())
        .unwrap_or_default()
}

/// Data range padded by 5%; a flat range is widened by 1 on each side.
fn padded(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !lo.is_finite() || !hi.is_finite() {
        return (0.0, 1.0);
    }
    if hi - lo == 0.0 {
        return (lo - 1.0, hi + 1.0);
    }
    let pad = (hi - lo) * 0.05;
    (lo - pad, hi + pad)
}

// ---------------------------------------------------------------------------
// Bar chart
// ---------------------------------------------------------------------------

/// Horizontal bars, first bar on top, growing from zero; negative values in red.
pub fn bar_chart(chart: &BarChart) -> Result<String, ChartError> {
    render("bar", |root| draw_bars(root, chart))
}

fn draw_bars(root: &Area<'_>, chart: &BarChart) -> DrawResult {
    let n = chart.bars.len();
    // Slot 0 is the bottom row, so the labels run in reverse.
    let slots: Vec<&str> = chart.bars.iter().rev().map(|b| b.label.as_str()).collect();
    let (lo, hi) = padded(chart.bars.iter().map(|b| b.value).chain([0.0]));

    let mut plot = ChartBuilder::on(root)
        .caption(&chart.title, (FONT, 20))
        .margin(20)
        .set_label_area_size(LabelAreaPosition::Left, 170)
        .set_label_area_size(LabelAreaPosition::Bottom, 50)
        .build_cartesian_2d(lo..hi, -0.5..(n as f64 - 0.5))?;

    plot.configure_mesh()
        .disable_y_mesh()
        .y_labels(n + 1)
        .y_label_formatter(&|y| slot_label(&slots, *y))
        .x_label_formatter(&|x| number(*x))
        .x_desc(chart.y_label.as_str())
        .y_desc(chart.x_label.as_str())
        .label_style((FONT, 12))
        .draw()?;

    let row = |i: usize| (n - 1 - i) as f64;
    plot.draw_series(chart.bars.iter().enumerate().map(|(i, bar)| {
        let color = if bar.value < 0.0 { NEGATIVE_COLOR } else { BAR_COLOR };
        Rectangle::new([(0.0, row(i) - 0.35), (bar.value, row(i) + 0.35)], color.filled())
    }))?;
    plot.draw_series(chart.bars.iter().enumerate().map(|(i, bar)| {
        let anchor = if bar.value < 0.0 { HPos::Right } else { HPos::Left };
        Text::new(
            number(bar.value),
            (bar.value, row(i)),
            TextStyle::from((FONT, 12).into_font()).pos(Pos::new(anchor, VPos::Center)),
        )
    }))?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Heatmap
// ---------------------------------------------------------------------------

/// Fill for a cell holding `count` out of `max`, light to dark blue.
pub fn shade(count: u32, max: u32) -> RGBColor {
    let t = if max == 0 { 0.0 } else { count as f64 / max as f64 };
    let lerp = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
    RGBColor(lerp(0xf7, 0x08), lerp(0xfb, 0x30), lerp(0xff, 0x6b))
}

/// One shaded cell per (row, month) with its count printed in the middle.
pub fn heatmap(grid: &Heatmap) -> Result<String, ChartError> {
    render("heatmap", |root| draw_heatmap(root, grid))
}

fn draw_heatmap(root: &Area<'_>, grid: &Heatmap) -> DrawResult {
    let cols = grid.columns.len();
    let rows = grid.rows.len();
    let max = grid.max();
    let months: Vec<&str> = grid.columns.iter().map(String::as_str).collect();
    let labels: Vec<&str> = grid.rows.iter().rev().map(String::as_str).collect();

    let mut plot = ChartBuilder::on(root)
        .caption(format!("Injuries by month and {}", grid.row_label), (FONT, 20))
        .margin(20)
        .set_label_area_size(LabelAreaPosition::Left, 150)
        .set_label_area_size(LabelAreaPosition::Bottom, 70)
        .build_cartesian_2d(-0.5..(cols as f64 - 0.5), -0.5..(rows as f64 - 0.5))?;

    plot.configure_mesh()
        .disable_mesh()
        .x_labels(cols + 1)
        .y_labels(rows + 1)
        .x_label_formatter(&|x| slot_label(&months, *x))
        .y_label_formatter(&|y| slot_label(&labels, *y))
        .x_label_style((FONT, 11).into_font().transform(FontTransform::Rotate90))
        .y_label_style((FONT, 12))
        .x_desc("injury_month")
        .y_desc(grid.row_label.as_str())
        .draw()?;

    let cells: Vec<(f64, f64, u32)> = grid
        .counts
        .iter()
        .enumerate()
        .flat_map(|(r, counts)| {
            let y = (rows - 1 - r) as f64;
            counts
                .iter()
                .enumerate()
                .map(move |(c, &count)| (c as f64, y, count))
        })
        .collect();

    plot.draw_series(cells.iter().map(|&(x, y, count)| {
        Rectangle::new([(x - 0.5, y - 0.5), (x + 0.5, y + 0.5)], shade(count, max).filled())
    }))?;
    plot.draw_series(cells.iter().map(|&(x, y, count)| {
        let fg = if max > 0 && count * 2 > max { WHITE } else { BLACK };
        Text::new(
            count.to_string(),
            (x, y),
            (FONT, 12)
                .into_font()
                .color(&fg)
                .pos(Pos::new(HPos::Center, VPos::Center)),
        )
    }))?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Scatter
// ---------------------------------------------------------------------------

/// Points plus the least-squares line across the x range, when there is one.
pub fn scatter(plot: &Scatter) -> Result<String, ChartError> {
    render("scatter", |root| draw_scatter(root, plot))
}

fn draw_scatter(root: &Area<'_>, plot: &Scatter) -> DrawResult {
    let (x_lo, x_hi) = padded(plot.points.iter().map(|p| p.x));
    let trend: Vec<(f64, f64)> = plot
        .trend
        .as_ref()
        .map(|fit| vec![(x_lo, fit.predict(x_lo)), (x_hi, fit.predict(x_hi))])
        .unwrap_or_default();
    // The trend endpoints stay inside the plotted range.
    let (y_lo, y_hi) = padded(plot.points.iter().map(|p| p.y).chain(trend.iter().map(|p| p.1)));

    let mut chart = ChartBuilder::on(root)
        .caption(&plot.title, (FONT, 20))
        .margin(20)
        .set_label_area_size(LabelAreaPosition::Left, 60)
        .set_label_area_size(LabelAreaPosition::Bottom, 50)
        .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)?;

    chart
        .configure_mesh()
        .x_desc(plot.x_label.as_str())
        .y_desc(plot.y_label.as_str())
        .x_label_formatter(&|v| format!("{:.0}", v))
        .y_label_formatter(&|v| format!("{:.2}", v))
        .label_style((FONT, 12))
        .draw()?;

    chart.draw_series(
        plot.points
            .iter()
            .map(|p| Circle::new((p.x, p.y), 4, POINT_COLOR.mix(0.7).filled())),
    )?;
    if !trend.is_empty() {
        chart.draw_series(LineSeries::new(trend, TREND_COLOR.stroke_width(2)))?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
