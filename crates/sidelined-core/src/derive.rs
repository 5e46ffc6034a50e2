// Derived metrics: per-match rating averages, performance-drop index, and
// injury month.
//
// Source columns always win over derived ones. Running `derive` on its own
// output changes nothing.

use tracing::debug;

use crate::normalize::Schema;
use crate::table::{Column, Table};

pub const BEFORE_MATCH_COLUMNS: [&str; 3] = [
    "match1_before_injury_player_rating",
    "match2_before_injury_player_rating",
    "match3_before_injury_player_rating",
];

pub const AFTER_MATCH_COLUMNS: [&str; 3] = [
    "match1_after_injury_player_rating",
    "match2_after_injury_player_rating",
    "match3_after_injury_player_rating",
];

pub const RATING_BEFORE_AVG: &str = "rating_before_avg";
pub const RATING_AFTER_AVG: &str = "rating_after_avg";
pub const AVG_RATING_BEFORE: &str = "avg_rating_before";
pub const AVG_RATING_AFTER: &str = "avg_rating_after";
pub const PERFORMANCE_DROP_INDEX: &str = "performance_drop_index";
pub const INJURY_MONTH: &str = "injury_month";
pub const AGE: &str = "age";
pub const FIFA_RATING: &str = "fifa_rating";

/// Row-wise mean over whichever of `columns` exist, skipping unknown cells.
///
/// A row is unknown when none of the columns exist or all of its cells are
/// unknown; the two cases are not distinguished.
pub fn mean_of_columns(table: &Table, columns: &[&str]) -> Column {
    let present: Vec<&Column> = columns.iter().filter_map(|c| table.get(c)).collect();
    let values = (0..table.row_count())
        .map(|row| {
            let known: Vec<f64> = present.iter().filter_map(|c| c.number(row)).collect();
            if known.is_empty() {
                None
            } else {
                Some(known.iter().sum::<f64>() / known.len() as f64)
            }
        })
        .collect();
    Column::Number(values)
}

/// Element-wise `left - right`, unknown where either side is unknown.
pub fn difference(left: &Column, right: &Column) -> Column {
    let rows = left.len().min(right.len());
    Column::Number(
        (0..rows)
            .map(|row| match (left.number(row), right.number(row)) {
                (Some(a), Some(b)) => Some(a - b),
                _ => None,
            })
            .collect(),
    )
}

/// `YYYY-MM` label for each known date.
pub fn month_labels(dates: &Column) -> Column {
    Column::Text(
        (0..dates.len())
            .map(|row| dates.date(row).map(|d| d.format("%Y-%m").to_string()))
            .collect(),
    )
}

/// Fill in derived columns that the source does not provide.
pub fn derive(table: &mut Table, schema: &Schema) {
    let before = mean_of_columns(table, &BEFORE_MATCH_COLUMNS);
    let after = mean_of_columns(table, &AFTER_MATCH_COLUMNS);
    table.set(RATING_BEFORE_AVG, before);
    table.set(RATING_AFTER_AVG, after);

    for (target, computed) in [
        (AVG_RATING_BEFORE, RATING_BEFORE_AVG),
        (AVG_RATING_AFTER, RATING_AFTER_AVG),
    ] {
        if !table.has(target) {
            if let Some(col) = table.get(computed).cloned() {
                debug!("deriving {} from {}", target, computed);
                table.set(target, col);
            }
        }
    }

    if !table.has(PERFORMANCE_DROP_INDEX) {
        if let (Some(b), Some(a)) = (table.get(AVG_RATING_BEFORE), table.get(AVG_RATING_AFTER)) {
            debug!("deriving {} from rating averages", PERFORMANCE_DROP_INDEX);
            let drop = difference(b, a);
            table.set(PERFORMANCE_DROP_INDEX, drop);
        }
    }

    if !table.has(INJURY_MONTH) {
        let months = match schema.injury_date.as_deref().and_then(|c| table.get(c)) {
            Some(dates) => month_labels(dates),
            None => Column::Text(vec![None; table.row_count()]),
        };
        table.set(INJURY_MONTH, months);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
