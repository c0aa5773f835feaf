//! Row and cell value models
//!
//! Spreadsheet rows are modeled as an ordered mapping from column name to a
//! small closed set of scalar value kinds. The destination write layer stays
//! schema-flexible (arbitrary column sets per source file) without an open
//! dynamic type.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single spreadsheet cell value
///
/// The closed scalar set a cell can hold: text, number, boolean or null.
/// Serializes untagged so a row round-trips as plain JSON scalars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum CellValue {
    /// An empty cell
    #[default]
    Null,
    /// A boolean cell
    Bool(bool),
    /// A numeric cell (integers are represented as floats, as in the source format)
    Number(f64),
    /// A text cell
    Text(String),
}

impl CellValue {
    /// Whether the cell carries no content (null or empty text)
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Null => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Converts the cell into a JSON value
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            CellValue::Null => serde_json::Value::Null,
            CellValue::Bool(b) => serde_json::Value::Bool(*b),
            CellValue::Number(n) => serde_json::Number::from_f64(*n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            CellValue::Text(s) => serde_json::Value::String(s.clone()),
        }
    }

    /// Builds a cell from a JSON value
    ///
    /// Scalars map directly; arrays and objects are stringified so that an
    /// export batch with nested payloads still renders into a flat cell.
    pub fn from_json(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => CellValue::Null,
            serde_json::Value::Bool(b) => CellValue::Bool(*b),
            serde_json::Value::Number(n) => {
                n.as_f64().map(CellValue::Number).unwrap_or(CellValue::Null)
            }
            serde_json::Value::String(s) => CellValue::Text(s.clone()),
            other => CellValue::Text(other.to_string()),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => Ok(()),
            CellValue::Bool(b) => write!(f, "{}", b),
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Text(s) => write!(f, "{}", s),
        }
    }
}

/// An ordered mapping from column name to cell value
///
/// Represents one decoded spreadsheet row paired with the workbook's column
/// order. Column order is preserved; lookups are linear, which is fine for
/// the small column counts of tabular imports.
#[derive(Debug, Clone, PartialEq)]
pub struct RowRecord {
    fields: Vec<(String, CellValue)>,
}

impl RowRecord {
    /// Creates a row record from ordered (column, value) pairs
    pub fn new(fields: Vec<(String, CellValue)>) -> Self {
        Self { fields }
    }

    /// Pairs a column order with a slice of cells
    ///
    /// Missing trailing cells render as null; extra cells are dropped.
    pub fn from_cells(columns: &[String], cells: &[CellValue]) -> Self {
        let fields = columns
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), cells.get(i).cloned().unwrap_or_default()))
            .collect();
        Self { fields }
    }

    /// Returns the value for a column, if present
    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    /// Ordered (column, value) pairs
    pub fn fields(&self) -> &[(String, CellValue)] {
        &self.fields
    }

    /// Number of columns in the record
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the record has no columns
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Whether every cell in the record is blank
    ///
    /// This is the minimal validity check applied during import: a row with
    /// no content at all is recorded as an error and excluded from the batch.
    pub fn is_blank(&self) -> bool {
        self.fields.iter().all(|(_, value)| value.is_blank())
    }

    /// Converts the record into a JSON object
    pub fn to_json(&self) -> serde_json::Value {
        let mut map = serde_json::Map::new();
        for (name, value) in &self.fields {
            map.insert(name.clone(), value.to_json());
        }
        serde_json::Value::Object(map)
    }
}
