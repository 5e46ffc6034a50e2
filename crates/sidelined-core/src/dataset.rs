// Load → normalize → derive, producing the enriched table both front ends
// share.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::derive::derive;
use crate::filter::{filter_options, FilterField, Filters};
use crate::load::{load_csv, LoadError};
use crate::normalize::{normalize, Schema};
use crate::report::{Report, ReportOptions};
use crate::table::Table;

/// The normalized, enriched table plus its resolved roles.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub source: PathBuf,
    pub table: Table,
    pub schema: Schema,
}

impl Dataset {
    /// Normalize and enrich a raw table. Derivation happens exactly once
    /// here; everything downstream treats the result as authoritative.
    pub fn from_raw(source: PathBuf, mut table: Table) -> Dataset {
        let schema = normalize(&mut table);
        derive(&mut table, &schema);
        info!(
            "Dataset ready: {} rows, {} columns after derivation",
            table.row_count(),
            table.column_count()
        );
        Dataset {
            source,
            table,
            schema,
        }
    }

    /// Load the CSV at `path` and enrich it.
    pub fn load(path: &Path) -> Result<Dataset, LoadError> {
        let raw = load_csv(path)?;
        Ok(Dataset::from_raw(path.to_path_buf(), raw))
    }

    /// Rows matching `filters`.
    pub fn filtered(&self, filters: &Filters) -> Table {
        filters.apply(&self.table, &self.schema)
    }

    /// Build every view over the filtered rows.
    pub fn report(&self, filters: &Filters, options: &ReportOptions) -> Report {
        Report::build(&self.filtered(filters), &self.schema, options)
    }

    /// Choices for a filter control, computed over the unfiltered table.
    pub fn options(&self, field: FilterField) -> Vec<String> {
        filter_options(&self.table, &self.schema, field)
    }
}
