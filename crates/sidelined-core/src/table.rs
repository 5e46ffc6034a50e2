// Columnar in-memory table.
//
// Every cell is optional: `None` means the value is unknown (missing in the
// file or failed to coerce). Columns keep their insertion order so the column
// list shown to the user matches the file.

use chrono::NaiveDate;

/// A single typed column.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Text(Vec<Option<String>>),
    Number(Vec<Option<f64>>),
    Date(Vec<Option<NaiveDate>>),
}

impl Column {
    pub fn len(&self) -> usize {
        match self {
            Column::Text(v) => v.len(),
            Column::Number(v) => v.len(),
            Column::Date(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the cell at `row` holds a known value.
    pub fn is_known(&self, row: usize) -> bool {
        match self {
            Column::Text(v) => v.get(row).is_some_and(Option::is_some),
            Column::Number(v) => v.get(row).is_some_and(Option::is_some),
            Column::Date(v) => v.get(row).is_some_and(Option::is_some),
        }
    }

    /// Number of known cells.
    pub fn known_count(&self) -> usize {
        (0..self.len()).filter(|&r| self.is_known(r)).count()
    }

    /// The cell as a display label. Numbers drop a trailing `.0`, dates use
    /// ISO format.
    pub fn label(&self, row: usize) -> Option<String> {
        match self {
            Column::Text(v) => v.get(row).cloned().flatten(),
            Column::Number(v) => v.get(row).copied().flatten().map(format_number),
            Column::Date(v) => v
                .get(row)
                .copied()
                .flatten()
                .map(|d| d.format("%Y-%m-%d").to_string()),
        }
    }

    /// The cell as a number, for numeric columns only.
    pub fn number(&self, row: usize) -> Option<f64> {
        match self {
            Column::Number(v) => v.get(row).copied().flatten(),
            _ => None,
        }
    }

    /// The cell as a date, for date columns only.
    pub fn date(&self, row: usize) -> Option<NaiveDate> {
        match self {
            Column::Date(v) => v.get(row).copied().flatten(),
            _ => None,
        }
    }

    /// Keep only the rows whose index is listed in `rows`, in that order.
    pub fn select(&self, rows: &[usize]) -> Column {
        match self {
            Column::Text(v) => Column::Text(rows.iter().map(|&r| v[r].clone()).collect()),
            Column::Number(v) => Column::Number(rows.iter().map(|&r| v[r]).collect()),
            Column::Date(v) => Column::Date(rows.iter().map(|&r| v[r]).collect()),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Column::Text(_) => "text",
            Column::Number(_) => "number",
            Column::Date(_) => "date",
        }
    }
}

/// Format a number the way a spreadsheet would: integers without decimals.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

/// Ordered set of named, equally long columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    names: Vec<String>,
    columns: Vec<Column>,
    rows: usize,
}

impl Table {
    /// An empty table with `rows` rows and no columns.
    pub fn with_rows(rows: usize) -> Self {
        Table {
            names: Vec::new(),
            columns: Vec::new(),
            rows,
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    pub fn has(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn get(&self, name: &str) -> Option<&Column> {
        self.position(name).map(|i| &self.columns[i])
    }

    /// Iterate `(name, column)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Column)> {
        self.names.iter().map(String::as_str).zip(self.columns.iter())
    }

    /// Insert a column, replacing any existing column of the same name in
    /// place. Panics if the length does not match the row count.
    pub fn set(&mut self, name: impl Into<String>, column: Column) {
        assert_eq!(
            column.len(),
            self.rows,
            "column length must equal the table row count"
        );
        let name = name.into();
        match self.position(&name) {
            Some(i) => self.columns[i] = column,
            None => {
                self.names.push(name);
                self.columns.push(column);
            }
        }
    }

    /// Replace the column at `name` with `f(column)`. No-op when absent.
    pub fn update(&mut self, name: &str, f: impl FnOnce(&Column) -> Column) {
        if let Some(i) = self.position(name) {
            let next = f(&self.columns[i]);
            debug_assert_eq!(next.len(), self.rows);
            self.columns[i] = next;
        }
    }

    /// A new table containing only the given rows.
    pub fn select_rows(&self, rows: &[usize]) -> Table {
        Table {
            names: self.names.clone(),
            columns: self.columns.iter().map(|c| c.select(rows)).collect(),
            rows: rows.len(),
        }
    }

    /// Rename columns with `f`. Later columns whose new name collides with
    /// an earlier one are dropped; their original names are returned.
    pub fn rename_columns(&mut self, f: impl Fn(&str) -> String) -> Vec<String> {
        let mut names = Vec::with_capacity(self.names.len());
        let mut columns = Vec::with_capacity(self.columns.len());
        let mut dropped = Vec::new();
        for (name, column) in self.names.drain(..).zip(self.columns.drain(..)) {
            let renamed = f(&name);
            if names.contains(&renamed) {
                dropped.push(name);
                continue;
            }
            names.push(renamed);
            columns.push(column);
        }
        self.names = names;
        self.columns = columns;
        dropped
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
