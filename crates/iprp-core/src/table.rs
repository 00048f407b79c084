//! Core table types for representing 2DA data

use std::path::PathBuf;

/// The 2DA "no value" marker
pub const SENTINEL: &str = "****";

/// A 2DA table loaded from its CSV export
///
/// Rows are addressed by position, which is the 2DA row index.
#[derive(Debug, Clone)]
pub struct Table {
    /// Column definitions
    pub columns: Vec<Column>,
    /// Row data
    pub rows: Vec<Row>,
    /// Source file path
    pub source_path: PathBuf,
}

impl Table {
    /// Get the number of rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Find a column by name (2DA column names are case-insensitive)
    pub fn find_column(&self, name: &str) -> Option<&Column> {
        self.columns
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// Get the cell at a row index and column index
    pub fn cell(&self, row: usize, column: usize) -> Option<&CellValue> {
        self.rows.get(row).and_then(|r| r.get(column))
    }
}

/// A column definition
#[derive(Debug, Clone)]
pub struct Column {
    /// Column name (e.g., "Label" or "SpellIndex")
    pub name: String,
    /// Column index (0-based)
    pub index: usize,
}

impl Column {
    /// Create a new column
    pub fn new(name: String, index: usize) -> Self {
        Self { name, index }
    }
}

/// A row of data
#[derive(Debug, Clone)]
pub struct Row {
    /// Cell values for each column
    pub cells: Vec<CellValue>,
}

impl Row {
    /// Create a new row
    pub fn new(cells: Vec<CellValue>) -> Self {
        Self { cells }
    }

    /// Get a cell value by column index
    pub fn get(&self, index: usize) -> Option<&CellValue> {
        self.cells.get(index)
    }
}

/// A cell as written in the table
///
/// Text is kept verbatim. Numeric interpretation happens on read, so labels
/// like `007` or `1e3` survive untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellValue {
    /// Cell text, untrimmed
    Text(String),
    /// Cell missing from a short row, or written as an empty field
    Empty,
}

impl CellValue {
    /// Wrap raw cell text; only a zero-length field is empty
    pub fn parse(s: &str) -> Self {
        if s.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(s.to_string())
        }
    }

    /// The cell as 2DA text; empty cells read as the sentinel
    pub fn to_2da_string(&self) -> String {
        match self {
            CellValue::Text(s) => s.clone(),
            CellValue::Empty => SENTINEL.to_string(),
        }
    }

    /// True for the `****` marker or an empty cell
    pub fn is_sentinel(&self) -> bool {
        match self {
            CellValue::Text(s) => s == SENTINEL,
            CellValue::Empty => true,
        }
    }

    /// The cell as a signed integer, if the text is exactly one
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            CellValue::Text(s) => s.parse().ok(),
            CellValue::Empty => None,
        }
    }
}
