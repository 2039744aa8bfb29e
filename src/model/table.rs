//! Table types.

use super::Run;
use serde::{Deserialize, Serialize};

/// A table: an ordered 2-D grid of cells.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Table {
    /// Rows in source order
    pub rows: Vec<TableRow>,
}

impl Table {
    /// Create a new empty table.
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    /// Add a row to the table.
    pub fn add_row(&mut self, row: TableRow) {
        self.rows.push(row);
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get the number of columns (based on the first row).
    pub fn column_count(&self) -> usize {
        self.rows.first().map(|r| r.cells.len()).unwrap_or(0)
    }

    /// Check if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Get the first row, conventionally the header.
    pub fn header_row(&self) -> Option<&TableRow> {
        self.rows.first()
    }

    /// Get all rows after the first.
    pub fn body_rows(&self) -> &[TableRow] {
        if self.rows.is_empty() {
            &[]
        } else {
            &self.rows[1..]
        }
    }

    /// Get plain text representation, one line per row, cells tab-separated.
    pub fn plain_text(&self) -> String {
        self.rows
            .iter()
            .map(|row| row.plain_text())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A table row.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TableRow {
    /// Cells in source order
    pub cells: Vec<TableCell>,
}

impl TableRow {
    /// Create a row from cells.
    pub fn new(cells: Vec<TableCell>) -> Self {
        Self { cells }
    }

    /// Create a row of plain-text cells.
    pub fn from_strings<S: Into<String>>(values: impl IntoIterator<Item = S>) -> Self {
        Self::new(values.into_iter().map(TableCell::text).collect())
    }

    /// Get plain text representation, cells tab-separated.
    pub fn plain_text(&self) -> String {
        self.cells
            .iter()
            .map(|c| c.plain_text())
            .collect::<Vec<_>>()
            .join("\t")
    }

    /// Check if every cell in the row is empty.
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|c| c.is_empty())
    }
}

/// A table cell.
///
/// Cells keep their runs so formatting survives rendering; normalization
/// reads them through `plain_text` only.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TableCell {
    /// Runs in the cell; paragraph breaks inside a cell are collapsed to `\n`
    pub runs: Vec<Run>,
}

impl TableCell {
    /// Create a cell with a single plain run.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            runs: vec![Run::new(text)],
        }
    }

    /// Create an empty cell.
    pub fn empty() -> Self {
        Self { runs: Vec::new() }
    }

    /// Create a cell from pre-built runs.
    pub fn from_runs(runs: Vec<Run>) -> Self {
        Self { runs }
    }

    /// Get the concatenated cell text.
    pub fn plain_text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    /// Check if the cell has no visible text.
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty() || self.plain_text().trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_new() {
        let table = Table::new();
        assert!(table.is_empty());
        assert_eq!(table.row_count(), 0);
        assert_eq!(table.column_count(), 0);
        assert!(table.header_row().is_none());
    }

    #[test]
    fn test_table_with_data() {
        let mut table = Table::new();
        table.add_row(TableRow::from_strings(["Ver", "Date"]));
        table.add_row(TableRow::from_strings(["1.0", "2023-01-05"]));
        table.add_row(TableRow::from_strings(["1.1", "2023-02-10"]));

        assert_eq!(table.row_count(), 3);
        assert_eq!(table.column_count(), 2);
        assert_eq!(table.header_row().unwrap().plain_text(), "Ver\tDate");
        assert_eq!(table.body_rows().len(), 2);
    }

    #[test]
    fn test_cell_text() {
        let cell = TableCell::text("Hello");
        assert_eq!(cell.plain_text(), "Hello");
        assert!(!cell.is_empty());
        assert!(TableCell::empty().is_empty());
        assert!(TableCell::text("  ").is_empty());
    }

    #[test]
    fn test_row_empty() {
        let row = TableRow::from_strings(["", " "]);
        assert!(row.is_empty());
    }
}
