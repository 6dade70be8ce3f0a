//! CSV loading for the attacks dataset.
//!
//! Reads the file verbatim into a [`RawEventTable`] of string cells.  No
//! column is interpreted here; the normalizer decides what is required and
//! how each cell is parsed.

use std::io::Read;
use std::path::Path;

use dashboard_core::error::{DashboardError, Result};
use tracing::debug;

/// A CSV file held as text: one header row plus one `Vec<String>` per data row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawEventTable {
    /// Column names exactly as they appear in the header row (trimmed).
    pub headers: Vec<String>,
    /// Data rows, each with one cell per header.
    pub rows: Vec<Vec<String>>,
}

impl RawEventTable {
    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of the first header matching any of `names`, ignoring ASCII case.
    pub fn column_index(&self, names: &[&str]) -> Option<usize> {
        names.iter().find_map(|name| {
            self.headers
                .iter()
                .position(|h| h.eq_ignore_ascii_case(name))
        })
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a CSV file from disk into a [`RawEventTable`].
pub fn read_event_table(path: &Path) -> Result<RawEventTable> {
    let file = std::fs::File::open(path).map_err(|source| DashboardError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let table = read_event_table_from(file)?;

    debug!(
        "Read {} rows x {} columns from {}",
        table.rows.len(),
        table.headers.len(),
        path.display()
    );

    Ok(table)
}

/// Parse CSV text from any reader.
///
/// Rows whose cell count differs from the header are rejected by the CSV
/// reader and surface as [`DashboardError::Csv`].
pub fn read_event_table_from<R: Read>(reader: R) -> Result<RawEventTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = rdr.headers()?.iter().map(|h| h.to_string()).collect();

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record?;
        rows.push(record.iter().map(|cell| cell.to_string()).collect());
    }

    Ok(RawEventTable { headers, rows })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
