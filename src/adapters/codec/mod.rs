//! Spreadsheet codec
//!
//! Pure byte-level conversion between XLSX artifacts and the in-memory
//! [`Workbook`] model: `calamine` for decoding, `rust_xlsxwriter` for
//! encoding. The codec reads and writes a single worksheet; row 0 is the
//! header row, everything below it is data.

use crate::domain::errors::CodecError;
use crate::domain::row::CellValue;
use crate::domain::workbook::Workbook;
use calamine::{Data, Reader, Xlsx};
use rust_xlsxwriter::{Format, Workbook as XlsxWorkbook};
use std::io::Cursor;

/// Decodes XLSX bytes into a workbook
///
/// The first worksheet's first row becomes the column order; every following
/// row becomes a data row of scalar cells. Date, duration and error cells
/// degrade to text so the cell model stays a closed scalar set.
///
/// # Errors
///
/// Returns an error if the bytes are not a readable XLSX file or the file
/// has no worksheet.
pub fn decode(bytes: &[u8]) -> Result<Workbook, CodecError> {
    let mut reader = Xlsx::new(Cursor::new(bytes))
        .map_err(|e| CodecError::UnreadableWorkbook(e.to_string()))?;

    let range = reader
        .worksheet_range_at(0)
        .ok_or(CodecError::MissingWorksheet)?
        .map_err(|e| CodecError::UnreadableWorkbook(e.to_string()))?;

    let mut rows = range.rows();
    let columns = match rows.next() {
        Some(header) => header.iter().map(cell_to_header).collect(),
        None => return Ok(Workbook::default()),
    };

    let data = rows
        .map(|row| row.iter().map(cell_to_value).collect())
        .collect();

    Ok(Workbook::with_rows(columns, data))
}

/// Encodes a workbook into XLSX bytes
///
/// Writes the header at row 0 and each data row below it. Null cells are
/// written as blank cells so every data row stays inside the sheet's
/// bounding box; an all-null trailing row survives a round trip instead of
/// being truncated away.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn encode(workbook: &Workbook) -> Result<Vec<u8>, CodecError> {
    let mut book = XlsxWorkbook::new();
    let sheet = book.add_worksheet();
    let blank = Format::new();

    for (col, name) in workbook.columns().iter().enumerate() {
        sheet
            .write_string(0, col as u16, name)
            .map_err(|e| CodecError::EncodeFailed(e.to_string()))?;
    }

    for (r, row) in workbook.rows().iter().enumerate() {
        let out_row = (r + 1) as u32;
        for (c, cell) in row.iter().enumerate() {
            let col = c as u16;
            match cell {
                CellValue::Null => {
                    sheet
                        .write_blank(out_row, col, &blank)
                        .map_err(|e| CodecError::EncodeFailed(e.to_string()))?;
                }
                CellValue::Bool(b) => {
                    sheet
                        .write_boolean(out_row, col, *b)
                        .map_err(|e| CodecError::EncodeFailed(e.to_string()))?;
                }
                CellValue::Number(n) => {
                    sheet
                        .write_number(out_row, col, *n)
                        .map_err(|e| CodecError::EncodeFailed(e.to_string()))?;
                }
                CellValue::Text(s) => {
                    sheet
                        .write_string(out_row, col, s)
                        .map_err(|e| CodecError::EncodeFailed(e.to_string()))?;
                }
            }
        }
    }

    book.save_to_buffer()
        .map_err(|e| CodecError::EncodeFailed(e.to_string()))
}

fn cell_to_header(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.clone(),
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

fn cell_to_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Null,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Text(e.to_string()),
    }
}
