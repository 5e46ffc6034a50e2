// CSV loading into a raw, all-text table.
//
// Column names are kept exactly as they appear in the header; normalization
// happens in `normalize`. Cells are trimmed and empty cells become unknown.

use std::io::Read;
use std::path::Path;

use tracing::{info, warn};

use crate::table::{Column, Table};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("file not found: {path}")]
    NotFound { path: String },

    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("{path} has no header row")]
    Empty { path: String },
}

// ---------------------------------------------------------------------------
// Reader-based loader
// ---------------------------------------------------------------------------

/// Outcome of parsing CSV text before the path is attached to errors.
#[derive(Debug)]
pub(crate) enum ReadFailure {
    Csv(csv::Error),
    NoHeader,
}

/// Parse CSV from any reader into a raw text table.
///
/// Short rows are padded with unknown cells; surplus fields are ignored.
pub(crate) fn read_table<R: Read>(rdr: R) -> Result<Table, ReadFailure> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(rdr);

    let headers: Vec<String> = reader
        .headers()
        .map_err(ReadFailure::Csv)?
        .iter()
        .map(str::to_string)
        .collect();
    if headers.is_empty() || headers.iter().all(|h| h.trim().is_empty()) {
        return Err(ReadFailure::NoHeader);
    }

    let mut cells: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];
    let mut surplus_rows = 0usize;
    for (line, result) in reader.records().enumerate() {
        let record = result.map_err(ReadFailure::Csv)?;
        if record.len() > headers.len() {
            surplus_rows += 1;
            warn!(
                "row {} has {} fields, header has {}; ignoring the extra fields",
                line + 2,
                record.len(),
                headers.len()
            );
        }
        for (i, column) in cells.iter_mut().enumerate() {
            let value = record
                .get(i)
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string);
            column.push(value);
        }
    }

    let rows = cells.first().map_or(0, Vec::len);
    let mut table = Table::with_rows(rows);
    for (name, column) in headers.into_iter().zip(cells) {
        if table.has(&name) {
            warn!("duplicate header '{}', keeping the first occurrence", name);
            continue;
        }
        table.set(name, Column::Text(column));
    }
    if surplus_rows > 0 {
        warn!("{} rows carried more fields than the header", surplus_rows);
    }
    Ok(table)
}

// ---------------------------------------------------------------------------
// Public path-based loader
// ---------------------------------------------------------------------------

/// Load the injury CSV at `path`. Any failure here is fatal for the run.
pub fn load_csv(path: &Path) -> Result<Table, LoadError> {
    let shown = path.display().to_string();
    if !path.exists() {
        return Err(LoadError::NotFound { path: shown });
    }
    let file = std::fs::File::open(path).map_err(|e| LoadError::Io {
        path: shown.clone(),
        source: e,
    })?;
    let table = read_table(file).map_err(|e| match e {
        ReadFailure::Csv(source) => LoadError::Csv {
            path: shown.clone(),
            source,
        },
        ReadFailure::NoHeader => LoadError::Empty {
            path: shown.clone(),
        },
    })?;
    info!(
        "Loaded {}: {} rows, {} columns",
        shown,
        table.row_count(),
        table.column_count()
    );
    Ok(table)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn read(csv: &str) -> Table {
        match read_table(csv.as_bytes()) {
            Ok(t) => t,
            Err(e) => panic!("unexpected read failure: {e:?}"),
        }
    }

    #[test]
    fn header_names_kept_verbatim() {
        let t = read("Player Name, Team ,Age\nA,X,25\n");
        assert_eq!(
            t.column_names(),
            &["Player Name".to_string(), " Team ".to_string(), "Age".to_string()]
        );
        assert_eq!(t.row_count(), 1);
    }

    #[test]
    fn empty_cells_are_unknown() {
        let t = read("name,age\nA,\n B , 30 \n");
        let age = t.get("age").unwrap();
        assert_eq!(age.label(0), None);
        assert_eq!(age.label(1).as_deref(), Some("30"));
        assert_eq!(t.get("name").unwrap().label(1).as_deref(), Some("B"));
    }

    #[test]
    fn short_rows_are_padded() {
        let t = read("a,b,c\n1,2\n");
        assert_eq!(t.row_count(), 1);
        assert_eq!(t.get("c").unwrap().label(0), None);
    }

    #[test]
    fn surplus_fields_ignored() {
        let t = read("a,b\n1,2,3\n");
        assert_eq!(t.column_count(), 2);
        assert_eq!(t.get("b").unwrap().label(0).as_deref(), Some("2"));
    }

    #[test]
    fn header_only_gives_zero_rows() {
        let t = read("a,b\n");
        assert_eq!(t.row_count(), 0);
        assert_eq!(t.column_count(), 2);
    }

    #[test]
    fn empty_input_has_no_header() {
        assert!(matches!(read_table("".as_bytes()), Err(ReadFailure::NoHeader)));
    }

    #[test]
    fn missing_file_is_not_found() {
        let err = load_csv(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, LoadError::NotFound { .. }));
        assert!(err.to_string().contains("/definitely/not/here.csv"));
    }

    #[test]
    fn empty_file_is_load_error() {
        let path = std::env::temp_dir().join("sidelined_load_empty.csv");
        std::fs::write(&path, "").unwrap();
        let err = load_csv(&path).unwrap_err();
        assert!(matches!(err, LoadError::Empty { .. }));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn loads_file_from_disk() {
        let path =
            std::env::temp_dir().join(format!("sidelined_load_ok_{}.csv", std::process::id()));
        std::fs::write(&path, "name,team\nA,X\nB,Y\n").unwrap();
        let table = load_csv(&path).unwrap();
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column_count(), 2);
        let _ = std::fs::remove_file(&path);
    }
}
