// Report views over the enriched (and optionally filtered) table.
//
// Each view checks its own prerequisites and returns `Unavailable` instead of
// failing, so one missing column never takes down the other views. The
// structures here are sink-agnostic: the exporter turns them into HTML/CSV,
// the dashboard into terminal widgets.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::Serialize;
use tracing::warn;

use crate::config::ViewsConfig;
use crate::derive::{
    AGE, AVG_RATING_AFTER, AVG_RATING_BEFORE, FIFA_RATING, INJURY_MONTH, PERFORMANCE_DROP_INDEX,
};
use crate::normalize::{Role, Schema};
use crate::stats::{desc_unknown_last, linear_fit, mean, LinearFit};
use crate::table::{Column, Table};

// ---------------------------------------------------------------------------
// View identity and degradation
// ---------------------------------------------------------------------------

/// The fixed menu of views, in presentation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewKind {
    TopDrops,
    TeamCounts,
    MonthTeamGrid,
    AgeCorrelation,
    Leaderboard,
    BeforeAfter,
}

impl ViewKind {
    pub const ALL: [ViewKind; 6] = [
        ViewKind::TopDrops,
        ViewKind::TeamCounts,
        ViewKind::MonthTeamGrid,
        ViewKind::AgeCorrelation,
        ViewKind::Leaderboard,
        ViewKind::BeforeAfter,
    ];

    /// 1-based position in the menu; used in export file names.
    pub fn index(self) -> usize {
        match self {
            ViewKind::TopDrops => 1,
            ViewKind::TeamCounts => 2,
            ViewKind::MonthTeamGrid => 3,
            ViewKind::AgeCorrelation => 4,
            ViewKind::Leaderboard => 5,
            ViewKind::BeforeAfter => 6,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ViewKind::TopDrops => "Top players by performance drop",
            ViewKind::TeamCounts => "Injury counts by team",
            ViewKind::MonthTeamGrid => "Injury frequency by month and team",
            ViewKind::AgeCorrelation => "Age vs performance drop / rating",
            ViewKind::Leaderboard => "Leaderboard: best comebacks (after − before)",
            ViewKind::BeforeAfter => "Average rating before vs after injury",
        }
    }
}

/// Why a view could not be produced.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Unavailable {
    #[error("{} needs column(s): {}", .view.title(), .columns.join(", "))]
    MissingColumns {
        view: ViewKind,
        columns: Vec<String>,
    },

    #[error("{}: {reason}", .view.title())]
    NoData { view: ViewKind, reason: String },
}

impl Unavailable {
    pub fn view(&self) -> ViewKind {
        match self {
            Unavailable::MissingColumns { view, .. } | Unavailable::NoData { view, .. } => *view,
        }
    }
}

pub type ViewResult<T> = Result<T, Unavailable>;

fn missing(view: ViewKind, columns: &[&str]) -> Unavailable {
    Unavailable::MissingColumns {
        view,
        columns: columns.iter().map(|c| c.to_string()).collect(),
    }
}

fn no_data(view: ViewKind, reason: impl Into<String>) -> Unavailable {
    Unavailable::NoData {
        view,
        reason: reason.into(),
    }
}

/// Alias list of a role, joined for notices (e.g. "team/team_name").
fn role_columns(role: Role) -> String {
    role.aliases().join("/")
}

// ---------------------------------------------------------------------------
// View payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub bars: Vec<Bar>,
}

/// Count grid with teams as rows and months as columns, zero-filled.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Heatmap {
    pub row_label: String,
    pub rows: Vec<String>,
    pub columns: Vec<String>,
    pub counts: Vec<Vec<u32>>,
}

impl Heatmap {
    pub fn max(&self) -> u32 {
        self.counts.iter().flatten().copied().max().unwrap_or(0)
    }

    pub fn total(&self) -> u32 {
        self.counts.iter().flatten().sum()
    }
}

/// Which measure the age scatter ended up plotting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AgeMetric {
    PerformanceDrop,
    FifaRating,
}

impl AgeMetric {
    pub fn column(self) -> &'static str {
        match self {
            AgeMetric::PerformanceDrop => PERFORMANCE_DROP_INDEX,
            AgeMetric::FifaRating => FIFA_RATING,
        }
    }

    /// Short slug for file names.
    pub fn slug(self) -> &'static str {
        match self {
            AgeMetric::PerformanceDrop => "perf_drop",
            AgeMetric::FifaRating => "fifa_rating",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
    pub player: Option<String>,
    pub team: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scatter {
    pub title: String,
    pub metric: AgeMetric,
    pub x_label: String,
    pub y_label: String,
    pub points: Vec<ScatterPoint>,
    pub trend: Option<LinearFit>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardRow {
    pub player: String,
    pub avg_rating_before: Option<f64>,
    pub avg_rating_after: Option<f64>,
    pub performance_drop_index: Option<f64>,
    pub rating_improvement: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Leaderboard {
    pub rows: Vec<LeaderboardRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BeforeAfter {
    pub player: String,
    pub records: usize,
    pub before: Option<f64>,
    pub after: Option<f64>,
}

/// Headline numbers for the filtered table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub records: usize,
    pub avg_rating: Option<f64>,
    pub unique_players: usize,
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportOptions {
    pub top_drops: usize,
    pub leaderboard_size: usize,
}

impl Default for ReportOptions {
    fn default() -> Self {
        ReportOptions::from(&ViewsConfig::default())
    }
}

impl From<&ViewsConfig> for ReportOptions {
    fn from(views: &ViewsConfig) -> Self {
        ReportOptions {
            top_drops: views.top_drops,
            leaderboard_size: views.leaderboard_size,
        }
    }
}

/// Every view computed over one table.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub summary: Summary,
    /// Normalized column names with their coerced kind.
    pub columns: Vec<(String, &'static str)>,
    pub top_drops: ViewResult<BarChart>,
    pub team_counts: ViewResult<BarChart>,
    pub month_team: ViewResult<Heatmap>,
    pub age: ViewResult<Scatter>,
    pub leaderboard: ViewResult<Leaderboard>,
    pub before_after: ViewResult<BeforeAfter>,
}

impl Report {
    pub fn build(table: &Table, schema: &Schema, options: &ReportOptions) -> Report {
        let report = Report {
            summary: summary(table, schema),
            columns: table
                .iter()
                .map(|(name, col)| (name.to_string(), col.kind()))
                .collect(),
            top_drops: top_drops(table, schema, options.top_drops),
            team_counts: team_counts(table, schema),
            month_team: month_team_grid(table, schema),
            age: age_correlation(table, schema),
            leaderboard: leaderboard(table, schema, options.leaderboard_size),
            before_after: before_after(table, schema),
        };
        for notice in report.unavailable() {
            warn!("view unavailable: {}", notice);
        }
        report
    }

    /// Notices for every view that could not be produced, in menu order.
    pub fn unavailable(&self) -> Vec<&Unavailable> {
        [
            self.top_drops.as_ref().err(),
            self.team_counts.as_ref().err(),
            self.month_team.as_ref().err(),
            self.age.as_ref().err(),
            self.leaderboard.as_ref().err(),
            self.before_after.as_ref().err(),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

// ---------------------------------------------------------------------------
// Grouping helpers
// ---------------------------------------------------------------------------

/// Row indices grouped by label, groups sorted by label. Rows whose label is
/// unknown are left out.
fn group_by_label(column: &Column, rows: usize) -> BTreeMap<String, Vec<usize>> {
    let mut groups: BTreeMap<String, Vec<usize>> = BTreeMap::new();
    for row in 0..rows {
        if let Some(label) = column.label(row) {
            groups.entry(label).or_default().push(row);
        }
    }
    groups
}

/// Known-label frequencies, most frequent first; ties keep first appearance.
fn value_counts(column: &Column, rows: usize) -> Vec<(String, usize)> {
    let mut order: Vec<(String, usize)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for row in 0..rows {
        let Some(label) = column.label(row) else {
            continue;
        };
        match index.get(&label) {
            Some(&i) => order[i].1 += 1,
            None => {
                index.insert(label.clone(), order.len());
                order.push((label, 1));
            }
        }
    }
    order.sort_by(|a, b| b.1.cmp(&a.1));
    order
}

fn mean_over(column: Option<&Column>, rows: &[usize]) -> Option<f64> {
    let column = column?;
    mean(rows.iter().map(|&r| column.number(r)))
}

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

pub fn summary(table: &Table, schema: &Schema) -> Summary {
    let records = table.row_count();
    let avg_rating = table
        .get(FIFA_RATING)
        .and_then(|c| mean((0..records).map(|r| c.number(r))));
    let unique_players = schema
        .player
        .as_deref()
        .and_then(|c| table.get(c))
        .map_or(0, |c| {
            (0..records)
                .filter_map(|r| c.label(r))
                .collect::<BTreeSet<_>>()
                .len()
        });
    Summary {
        records,
        avg_rating,
        unique_players,
    }
}

/// Mean performance drop per player, largest first.
///
/// Groups by player when available, else by team, else by row number.
pub fn top_drops(table: &Table, schema: &Schema, limit: usize) -> ViewResult<BarChart> {
    let view = ViewKind::TopDrops;
    let Some(drop) = table.get(PERFORMANCE_DROP_INDEX) else {
        return Err(missing(
            view,
            &[PERFORMANCE_DROP_INDEX, AVG_RATING_BEFORE, AVG_RATING_AFTER],
        ));
    };
    if drop.known_count() == 0 {
        return Err(no_data(view, "performance_drop_index has no known values"));
    }

    let key_column = schema
        .player
        .as_deref()
        .or(schema.team.as_deref())
        .and_then(|c| table.get(c).map(|col| (c, col)));

    let (x_label, groups) = match key_column {
        Some((name, col)) => (name.to_string(), group_by_label(col, table.row_count())),
        None => {
            let groups = (0..table.row_count())
                .map(|r| (format!("row {}", r + 1), vec![r]))
                .collect();
            ("row".to_string(), groups)
        }
    };

    let mut bars: Vec<Bar> = groups
        .into_iter()
        .filter_map(|(label, rows)| {
            mean_over(Some(drop), &rows).map(|value| Bar { label, value })
        })
        .collect();
    bars.sort_by(|a, b| desc_unknown_last(Some(a.value), Some(b.value)));
    bars.truncate(limit);

    Ok(BarChart {
        title: "Top performance drops (higher = bigger drop)".to_string(),
        x_label,
        y_label: "Performance drop".to_string(),
        bars,
    })
}

pub fn team_counts(table: &Table, schema: &Schema) -> ViewResult<BarChart> {
    let view = ViewKind::TeamCounts;
    let Some((team_name, team)) = schema
        .team
        .as_deref()
        .and_then(|c| table.get(c).map(|col| (c, col)))
    else {
        let team = role_columns(Role::Team);
        return Err(missing(view, &[team.as_str()]));
    };

    let bars: Vec<Bar> = value_counts(team, table.row_count())
        .into_iter()
        .map(|(label, count)| Bar {
            label,
            value: count as f64,
        })
        .collect();
    if bars.is_empty() {
        return Err(no_data(view, "no rows with a known team"));
    }

    Ok(BarChart {
        title: "Injury counts by team".to_string(),
        x_label: team_name.to_string(),
        y_label: "injury_count".to_string(),
        bars,
    })
}

pub fn month_team_grid(table: &Table, schema: &Schema) -> ViewResult<Heatmap> {
    let view = ViewKind::MonthTeamGrid;
    let team = schema
        .team
        .as_deref()
        .and_then(|c| table.get(c).map(|col| (c, col)));
    let month = table.get(INJURY_MONTH);
    let (Some((team_name, team)), Some(month)) = (team, month) else {
        let team = role_columns(Role::Team);
        return Err(missing(view, &[INJURY_MONTH, team.as_str()]));
    };

    let mut cells: BTreeMap<(String, String), u32> = BTreeMap::new();
    for row in 0..table.row_count() {
        if let (Some(t), Some(m)) = (team.label(row), month.label(row)) {
            *cells.entry((t, m)).or_default() += 1;
        }
    }
    if cells.is_empty() {
        return Err(no_data(view, "no injury counts to show"));
    }

    let rows: Vec<String> = cells
        .keys()
        .map(|(t, _)| t.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let columns: Vec<String> = cells
        .keys()
        .map(|(_, m)| m.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let counts = rows
        .iter()
        .map(|t| {
            columns
                .iter()
                .map(|m| cells.get(&(t.clone(), m.clone())).copied().unwrap_or(0))
                .collect()
        })
        .collect();

    Ok(Heatmap {
        row_label: team_name.to_string(),
        rows,
        columns,
        counts,
    })
}

/// Age against performance drop, falling back to FIFA rating.
pub fn age_correlation(table: &Table, schema: &Schema) -> ViewResult<Scatter> {
    let view = ViewKind::AgeCorrelation;
    let Some(age) = table.get(AGE) else {
        return Err(missing(view, &[AGE]));
    };

    let pairs = |metric: AgeMetric| -> Vec<usize> {
        match table.get(metric.column()) {
            Some(col) => (0..table.row_count())
                .filter(|&r| age.number(r).is_some() && col.number(r).is_some())
                .collect(),
            None => Vec::new(),
        }
    };

    let (metric, rows) = [AgeMetric::PerformanceDrop, AgeMetric::FifaRating]
        .into_iter()
        .map(|m| (m, pairs(m)))
        .find(|(_, rows)| !rows.is_empty())
        .ok_or_else(|| {
            no_data(
                view,
                "need age plus performance_drop_index or fifa_rating with known values",
            )
        })?;

    let Some(y) = table.get(metric.column()) else {
        return Err(missing(view, &[metric.column()]));
    };
    let player = schema.player.as_deref().and_then(|c| table.get(c));
    let team = schema.team.as_deref().and_then(|c| table.get(c));

    let points: Vec<ScatterPoint> = rows
        .iter()
        .filter_map(|&r| {
            Some(ScatterPoint {
                x: age.number(r)?,
                y: y.number(r)?,
                player: player.and_then(|c| c.label(r)),
                team: team.and_then(|c| c.label(r)),
            })
        })
        .collect();
    let xy: Vec<(f64, f64)> = points.iter().map(|p| (p.x, p.y)).collect();

    let title = match metric {
        AgeMetric::PerformanceDrop => "Age vs performance drop",
        AgeMetric::FifaRating => "Age vs FIFA rating",
    };

    Ok(Scatter {
        title: title.to_string(),
        metric,
        x_label: AGE.to_string(),
        y_label: metric.column().to_string(),
        trend: linear_fit(&xy),
        points,
    })
}

/// Players ranked by rating improvement (after − before), best first.
pub fn leaderboard(table: &Table, schema: &Schema, limit: usize) -> ViewResult<Leaderboard> {
    let view = ViewKind::Leaderboard;
    let before = table.get(AVG_RATING_BEFORE);
    let after = table.get(AVG_RATING_AFTER);
    let player = schema.player.as_deref().and_then(|c| table.get(c));
    let (Some(_), Some(_), Some(player)) = (before, after, player) else {
        let player = role_columns(Role::Player);
        return Err(missing(
            view,
            &[AVG_RATING_BEFORE, AVG_RATING_AFTER, player.as_str()],
        ));
    };
    let drop = table.get(PERFORMANCE_DROP_INDEX);

    let mut rows: Vec<LeaderboardRow> = group_by_label(player, table.row_count())
        .into_iter()
        .map(|(name, idx)| {
            let b = mean_over(before, &idx);
            let a = mean_over(after, &idx);
            LeaderboardRow {
                player: name,
                avg_rating_before: b,
                avg_rating_after: a,
                performance_drop_index: mean_over(drop, &idx),
                rating_improvement: a.zip(b).map(|(a, b)| a - b),
            }
        })
        .collect();

    if rows.iter().all(|r| r.rating_improvement.is_none()) {
        return Err(no_data(view, "no player has both before and after ratings"));
    }

    rows.sort_by(|x, y| desc_unknown_last(x.rating_improvement, y.rating_improvement));
    rows.truncate(limit);
    Ok(Leaderboard { rows })
}

/// Before/after averages for the player with the most records.
pub fn before_after(table: &Table, schema: &Schema) -> ViewResult<BeforeAfter> {
    let view = ViewKind::BeforeAfter;
    let before = table.get(AVG_RATING_BEFORE);
    let after = table.get(AVG_RATING_AFTER);
    let player = schema.player.as_deref().and_then(|c| table.get(c));
    let (Some(_), Some(_), Some(player)) = (before, after, player) else {
        let player = role_columns(Role::Player);
        return Err(missing(
            view,
            &[AVG_RATING_BEFORE, AVG_RATING_AFTER, player.as_str()],
        ));
    };

    let Some((name, records)) = value_counts(player, table.row_count()).into_iter().next() else {
        return Err(no_data(view, "no rows with a known player"));
    };
    let rows: Vec<usize> = (0..table.row_count())
        .filter(|&r| player.label(r).as_deref() == Some(name.as_str()))
        .collect();

    let result = BeforeAfter {
        before: mean_over(before, &rows),
        after: mean_over(after, &rows),
        player: name,
        records,
    };
    if result.before.is_none() && result.after.is_none() {
        return Err(no_data(
            view,
            format!("{} has no known before/after ratings", result.player),
        ));
    }
    Ok(result)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
