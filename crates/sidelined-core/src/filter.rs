// Equality filters over player, team, season, and injury month.

use std::collections::BTreeSet;

use crate::derive::INJURY_MONTH;
use crate::normalize::{Role, Schema};
use crate::table::Table;

/// Which control a filter value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterField {
    Player,
    Team,
    Season,
    Month,
}

impl FilterField {
    pub const ALL: [FilterField; 4] = [
        FilterField::Player,
        FilterField::Team,
        FilterField::Season,
        FilterField::Month,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FilterField::Player => "Player",
            FilterField::Team => "Team",
            FilterField::Season => "Season",
            FilterField::Month => "Injury month",
        }
    }

    /// Column this control filters on, if the data has one.
    pub fn column(self, schema: &Schema) -> Option<&str> {
        match self {
            FilterField::Player => schema.column(Role::Player),
            FilterField::Team => schema.column(Role::Team),
            FilterField::Season => schema.column(Role::Season),
            FilterField::Month => Some(INJURY_MONTH),
        }
    }
}

/// Selected value per control; `None` means "All".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filters {
    pub player: Option<String>,
    pub team: Option<String>,
    pub season: Option<String>,
    pub month: Option<String>,
}

impl Filters {
    pub fn get(&self, field: FilterField) -> Option<&str> {
        match field {
            FilterField::Player => self.player.as_deref(),
            FilterField::Team => self.team.as_deref(),
            FilterField::Season => self.season.as_deref(),
            FilterField::Month => self.month.as_deref(),
        }
    }

    pub fn set(&mut self, field: FilterField, value: Option<String>) {
        let slot = match field {
            FilterField::Player => &mut self.player,
            FilterField::Team => &mut self.team,
            FilterField::Season => &mut self.season,
            FilterField::Month => &mut self.month,
        };
        *slot = value;
    }

    pub fn is_empty(&self) -> bool {
        FilterField::ALL.iter().all(|f| self.get(*f).is_none())
    }

    /// Row indices that satisfy every active filter. Filters on a column the
    /// table does not have are ignored.
    pub fn matching_rows(&self, table: &Table, schema: &Schema) -> Vec<usize> {
        let active: Vec<_> = FilterField::ALL
            .iter()
            .filter_map(|f| {
                let wanted = self.get(*f)?;
                let column = table.get(f.column(schema)?)?;
                Some((column, wanted))
            })
            .collect();

        (0..table.row_count())
            .filter(|&row| {
                active
                    .iter()
                    .all(|(column, wanted)| column.label(row).as_deref() == Some(*wanted))
            })
            .collect()
    }

    /// The filtered table. With no active filter this is a plain copy.
    pub fn apply(&self, table: &Table, schema: &Schema) -> Table {
        if self.is_empty() {
            return table.clone();
        }
        table.select_rows(&self.matching_rows(table, schema))
    }
}

/// Sorted distinct known values offered by a control.
pub fn filter_options(table: &Table, schema: &Schema, field: FilterField) -> Vec<String> {
    let Some(column) = field.column(schema).and_then(|c| table.get(c)) else {
        return Vec::new();
    };
    (0..table.row_count())
        .filter_map(|row| column.label(row))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
