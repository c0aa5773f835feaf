//! In-memory workbook model
//!
//! A workbook is the decoded form of a tabular artifact: one header row of
//! column names at row 0 followed by a grid of scalar cells. The export
//! accumulator splices caller-supplied batches into this grid at
//! index-derived offsets, which makes duplicate batch indices last-write-wins
//! on the affected rows.

use crate::domain::row::{CellValue, RowRecord};

/// Decoded tabular artifact: header row plus data grid
///
/// Data rows are indexed from 0; in the encoded artifact they occupy rows
/// `1..=len` because the header occupies row 0.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Workbook {
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl Workbook {
    /// Creates an empty workbook with the given column order
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Creates a workbook with pre-populated rows
    pub fn with_rows(columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Self { columns, rows }
    }

    /// Declared column order (the header row)
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of data rows (excluding the header)
    pub fn row_count(&self) -> u64 {
        self.rows.len() as u64
    }

    /// Data row at the given 0-based index
    pub fn row(&self, index: usize) -> Option<&[CellValue]> {
        self.rows.get(index).map(|r| r.as_slice())
    }

    /// All data rows
    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    /// Writes a block of rows starting at a 0-based data row index
    ///
    /// The grid grows with empty rows if the offset is past the current end;
    /// existing rows in the covered range are overwritten. Callers derive the
    /// offset from the batch index, so re-applying a batch overwrites exactly
    /// the rows it wrote the first time.
    pub fn write_rows_at(&mut self, offset: usize, block: Vec<Vec<CellValue>>) {
        let needed = offset + block.len();
        if self.rows.len() < needed {
            self.rows.resize(needed, vec![CellValue::Null; self.columns.len()]);
        }
        for (i, row) in block.into_iter().enumerate() {
            self.rows[offset + i] = row;
        }
    }

    /// Pairs each data row with the column order into row records
    pub fn records(&self) -> Vec<RowRecord> {
        self.rows
            .iter()
            .map(|cells| RowRecord::from_cells(&self.columns, cells))
            .collect()
    }
}
