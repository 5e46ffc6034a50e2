// Schema normalization: column-name cleanup, role alias resolution, and
// permissive date/number coercion.
//
// Nothing in here fails. Cells that cannot be coerced become unknown and the
// row is kept; roles with no matching column resolve to `None`.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use tracing::{debug, info, warn};

use crate::table::{Column, Table};

// ---------------------------------------------------------------------------
// Column names
// ---------------------------------------------------------------------------

/// Lower-case, trim, and replace spaces with underscores.
///
/// Idempotent: `normalize_column_name(normalize_column_name(x)) ==
/// normalize_column_name(x)`.
pub fn normalize_column_name(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "_")
}

/// Normalize every column name in place. Returns the original names of any
/// columns dropped because they collided with an earlier column.
pub fn normalize_columns(table: &mut Table) -> Vec<String> {
    let dropped = table.rename_columns(normalize_column_name);
    for name in &dropped {
        warn!(
            "column '{}' normalizes to a name already in use; dropping it",
            name
        );
    }
    dropped
}

// ---------------------------------------------------------------------------
// Roles
// ---------------------------------------------------------------------------

/// Semantic roles whose column spelling varies between files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Player,
    Team,
    Season,
    InjuryDate,
    ReturnDate,
}

impl Role {
    pub const ALL: [Role; 5] = [
        Role::Player,
        Role::Team,
        Role::Season,
        Role::InjuryDate,
        Role::ReturnDate,
    ];

    /// Candidate column names, highest priority first.
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            Role::Player => &["player_name", "name"],
            Role::Team => &["team", "team_name"],
            Role::Season => &["season"],
            Role::InjuryDate => &["date_of_injury", "injury_date"],
            Role::ReturnDate => &["date_of_return", "return_date"],
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Role::Player => "player",
            Role::Team => "team",
            Role::Season => "season",
            Role::InjuryDate => "injury date",
            Role::ReturnDate => "return date",
        }
    }
}

/// Resolved column name for each role; `None` when no alias is present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    pub player: Option<String>,
    pub team: Option<String>,
    pub season: Option<String>,
    pub injury_date: Option<String>,
    pub return_date: Option<String>,
}

impl Schema {
    /// Resolve every role against the (already normalized) table.
    pub fn resolve(table: &Table) -> Schema {
        let pick = |role: Role| {
            role.aliases()
                .iter()
                .find(|alias| table.has(alias))
                .map(|alias| alias.to_string())
        };
        Schema {
            player: pick(Role::Player),
            team: pick(Role::Team),
            season: pick(Role::Season),
            injury_date: pick(Role::InjuryDate),
            return_date: pick(Role::ReturnDate),
        }
    }

    pub fn column(&self, role: Role) -> Option<&str> {
        match role {
            Role::Player => self.player.as_deref(),
            Role::Team => self.team.as_deref(),
            Role::Season => self.season.as_deref(),
            Role::InjuryDate => self.injury_date.as_deref(),
            Role::ReturnDate => self.return_date.as_deref(),
        }
    }
}

// ---------------------------------------------------------------------------
// Value coercion
// ---------------------------------------------------------------------------

/// Columns coerced to numbers when present.
pub const NUMERIC_COLUMNS: &[&str] = &[
    "age",
    "fifa_rating",
    "avg_rating_before",
    "avg_rating_after",
    "performance_drop_index",
    "team_gd_before",
    "team_gd_missed",
    "match1_before_injury_player_rating",
    "match2_before_injury_player_rating",
    "match3_before_injury_player_rating",
    "match1_after_injury_player_rating",
    "match2_after_injury_player_rating",
    "match3_after_injury_player_rating",
];

/// Parse a number, treating blanks, garbage, and non-finite values as unknown.
pub fn parse_number(raw: &str) -> Option<f64> {
    let value: f64 = raw.trim().parse().ok()?;
    value.is_finite().then_some(value)
}

/// Date-only formats tried in order. Slash-separated numeric dates are read
/// month-first.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%B %d %Y",
    "%b %d %Y",
    "%d %B %Y",
    "%d %b %Y",
];

/// `%Y` accepts one to four digits, so two-digit years would otherwise land in
/// the first century.
const MIN_YEAR: i32 = 100;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Permissive date parser. Returns `None` rather than failing, including for
/// two-digit years, which are ambiguous.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    let plausible = |d: &NaiveDate| d.year() >= MIN_YEAR;
    let dates = DATE_FORMATS
        .iter()
        .filter_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok());
    let datetimes = DATETIME_FORMATS
        .iter()
        .filter_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|dt| dt.date());
    let rfc3339 = DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive());
    dates.chain(datetimes).chain(rfc3339).find(plausible)
}

/// Convert a column to numbers. Columns that are already typed pass through.
fn to_number_column(column: &Column) -> Column {
    match column {
        Column::Text(values) => Column::Number(
            values
                .iter()
                .map(|v| v.as_deref().and_then(parse_number))
                .collect(),
        ),
        other => other.clone(),
    }
}

/// Convert a column to dates. Columns that are already typed pass through.
fn to_date_column(column: &Column) -> Column {
    match column {
        Column::Text(values) => Column::Date(
            values
                .iter()
                .map(|v| v.as_deref().and_then(parse_date))
                .collect(),
        ),
        other => other.clone(),
    }
}

// ---------------------------------------------------------------------------
// Pipeline step
// ---------------------------------------------------------------------------

/// Normalize names, resolve roles, and coerce date and numeric columns.
pub fn normalize(table: &mut Table) -> Schema {
    normalize_columns(table);
    let schema = Schema::resolve(table);

    for role in Role::ALL {
        match schema.column(role) {
            Some(col) => debug!("role {} resolved to column '{}'", role.label(), col),
            None => info!("role {} not present in data", role.label()),
        }
    }

    for col in [schema.injury_date.clone(), schema.return_date.clone()]
        .into_iter()
        .flatten()
    {
        let before = table.get(&col).map_or(0, Column::known_count);
        table.update(&col, to_date_column);
        let after = table.get(&col).map_or(0, Column::known_count);
        info!(
            "Converted column '{}' to dates ({} unparseable)",
            col,
            before - after
        );
    }

    for col in NUMERIC_COLUMNS {
        table.update(col, to_number_column);
    }

    schema
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn text(values: &[Option<&str>]) -> Column {
        Column::Text(values.iter().map(|v| v.map(str::to_string)).collect())
    }

    // -- Column names --

    #[test]
    fn column_name_lowercased_trimmed_underscored() {
        assert_eq!(normalize_column_name("  Date of Injury "), "date_of_injury");
        assert_eq!(normalize_column_name("FIFA rating"), "fifa_rating");
        assert_eq!(normalize_column_name("team"), "team");
    }

    #[test]
    fn column_name_normalization_is_idempotent() {
        let inputs = [
            " Player Name ",
            "TEAM_NAME",
            "\tSeason\n",
            "Avg Rating  Before",
            "",
            "ÄGE ",
        ];
        for raw in inputs {
            let once = normalize_column_name(raw);
            assert_eq!(normalize_column_name(&once), once, "input {raw:?}");
        }
    }

    // -- Role resolution --

    #[test]
    fn roles_prefer_first_alias() {
        let mut t = Table::with_rows(1);
        t.set("name", text(&[Some("a")]));
        t.set("player_name", text(&[Some("b")]));
        t.set("team_name", text(&[Some("x")]));
        let schema = Schema::resolve(&t);
        assert_eq!(schema.player.as_deref(), Some("player_name"));
        assert_eq!(schema.team.as_deref(), Some("team_name"));
        assert_eq!(schema.season, None);
        assert_eq!(schema.column(Role::InjuryDate), None);
    }

    #[test]
    fn absent_roles_resolve_to_none() {
        let t = Table::with_rows(0);
        assert_eq!(Schema::resolve(&t), Schema::default());
    }

    // -- Numbers --

    #[test]
    fn numbers_coerce_permissively() {
        assert_eq!(parse_number(" 7.5 "), Some(7.5));
        assert_eq!(parse_number("-2"), Some(-2.0));
        assert_eq!(parse_number("seven"), None);
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number("inf"), None);
    }

    // -- Dates --

    #[test]
    fn dates_in_common_formats() {
        let may10 = NaiveDate::from_ymd_opt(2023, 5, 10);
        assert_eq!(parse_date("2023-05-10"), may10);
        assert_eq!(parse_date("2023/05/10"), may10);
        assert_eq!(parse_date("05/10/2023"), may10);
        assert_eq!(parse_date("10-05-2023"), may10);
        assert_eq!(parse_date("10.05.2023"), may10);
        assert_eq!(parse_date("May 10, 2023"), may10);
        assert_eq!(parse_date("10 May 2023"), may10);
        assert_eq!(parse_date("2023-05-10 14:30:00"), may10);
        assert_eq!(parse_date("2023-05-10T14:30:00"), may10);
        assert_eq!(parse_date("2023-05-10T14:30:00+02:00"), may10);
    }

    #[test]
    fn unparseable_dates_are_unknown() {
        assert_eq!(parse_date("not a date"), None);
        assert_eq!(parse_date("2023-13-45"), None);
        assert_eq!(parse_date("   "), None);
    }

    #[test]
    fn two_digit_years_are_unknown() {
        assert_eq!(parse_date("05/10/23"), None);
        assert_eq!(parse_date("10-05-23"), None);
        assert_eq!(parse_date("10.05.23"), None);
        assert_eq!(parse_date("0023-05-10"), None);
        assert_eq!(parse_date("0100-01-01"), NaiveDate::from_ymd_opt(100, 1, 1));
    }

    // -- Full step --

    #[test]
    fn normalize_coerces_and_keeps_rows() {
        let mut t = Table::with_rows(2);
        t.set("Player Name", text(&[Some("A"), Some("B")]));
        t.set("Date of Injury", text(&[Some("2023-05-10"), Some("garbage")]));
        t.set("Age", text(&[Some("25"), Some("old")]));
        t.set("Notes", text(&[Some("7"), None]));

        let schema = normalize(&mut t);

        assert_eq!(t.row_count(), 2);
        assert_eq!(schema.player.as_deref(), Some("player_name"));
        assert_eq!(schema.injury_date.as_deref(), Some("date_of_injury"));

        let dates = t.get("date_of_injury").unwrap();
        assert_eq!(dates.date(0), NaiveDate::from_ymd_opt(2023, 5, 10));
        assert_eq!(dates.date(1), None);

        let age = t.get("age").unwrap();
        assert_eq!(age.number(0), Some(25.0));
        assert_eq!(age.number(1), None);

        // Undeclared columns stay text.
        assert_eq!(t.get("notes").unwrap().kind(), "text");
    }

    #[test]
    fn normalize_twice_is_stable() {
        let mut t = Table::with_rows(1);
        t.set("Team Name", text(&[Some("X")]));
        t.set("FIFA Rating", text(&[Some("80")]));
        let first_schema = normalize(&mut t);
        let once = t.clone();
        let second_schema = normalize(&mut t);
        assert_eq!(t, once);
        assert_eq!(first_schema, second_schema);
    }
}
