//! Tabular file parsing for bulk import
//!
//! Both formats yield the same [`ImportRow`] stream: the header row is
//! skipped, blank rows are ignored, and every other row must start with
//! `color, cottonPercentage, quantity`. Extra columns are ignored.
//!
//! Rows are produced lazily so the caller decides when each one is
//! committed; a malformed row surfaces as an `Err` item at its position in
//! the stream.

use calamine::{Data, Reader, open_workbook_auto_from_rs};
use serde::Serialize;
use std::io::Cursor;

use crate::core::error::{InventoryError, InventoryResult};
use crate::core::sock::SkuKey;
use crate::core::store::StockMerge;

/// Supported upload formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileFormat {
    /// Comma separated text (`.csv`)
    Csv,
    /// Excel workbook (`.xlsx`, `.xls`); only the first sheet is read
    Spreadsheet,
}

impl FileFormat {
    /// Pick the format from the uploaded file name, ignoring extension case
    pub fn from_file_name(file_name: &str) -> InventoryResult<Self> {
        let lower = file_name.to_ascii_lowercase();
        if lower.ends_with(".csv") {
            Ok(FileFormat::Csv)
        } else if lower.ends_with(".xlsx") || lower.ends_with(".xls") {
            Ok(FileFormat::Spreadsheet)
        } else {
            Err(InventoryError::UnsupportedFileType {
                file_name: file_name.to_string(),
            })
        }
    }
}

/// One data row of an import file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRow {
    /// 1-based row number in the file, header included
    pub row: u64,
    pub color: String,
    pub cotton_percentage: i32,
    pub quantity: i32,
}

impl ImportRow {
    pub fn key(&self) -> SkuKey {
        SkuKey::new(self.color.clone(), self.cotton_percentage)
    }
}

/// What an import committed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub format: FileFormat,
    /// Rows merged into the store
    pub rows: usize,
    /// Rows that created a new record
    pub created: usize,
    /// Rows that increased an existing record
    pub merged: usize,
}

impl ImportSummary {
    pub fn new(format: FileFormat) -> Self {
        Self {
            format,
            rows: 0,
            created: 0,
            merged: 0,
        }
    }

    pub fn record(&mut self, outcome: &StockMerge) {
        self.rows += 1;
        if outcome.is_created() {
            self.created += 1;
        } else {
            self.merged += 1;
        }
    }
}

/// A lazily parsed sequence of import rows
pub type RowStream<'a> = Box<dyn Iterator<Item = InventoryResult<ImportRow>> + Send + 'a>;

/// Open `bytes` in the given format
///
/// Fails immediately only when the file as a whole cannot be opened (for
/// example a corrupt workbook); per-row problems are reported by the stream.
pub fn read_rows(format: FileFormat, bytes: &[u8]) -> InventoryResult<RowStream<'_>> {
    match format {
        FileFormat::Csv => Ok(Box::new(csv_rows(bytes))),
        FileFormat::Spreadsheet => Ok(Box::new(spreadsheet_rows(bytes)?)),
    }
}

fn row_error(row: u64, message: impl std::fmt::Display) -> InventoryError {
    InventoryError::file_processing(format!("row {}: {}", row, message))
}

fn parse_number(row: u64, column: &str, raw: &str) -> InventoryResult<i32> {
    raw.parse::<i32>()
        .map_err(|e| row_error(row, format!("invalid {} '{}': {}", column, raw, e)))
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

fn csv_rows(bytes: &[u8]) -> impl Iterator<Item = InventoryResult<ImportRow>> + Send + '_ {
    let reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(bytes);

    reader.into_records().map(|record| {
        let record = record.map_err(|e| {
            let row = e.position().map(|p| p.line()).unwrap_or_default();
            row_error(row, format!("unreadable CSV record: {}", e))
        })?;
        let row = record.position().map(|p| p.line()).unwrap_or_default();

        if record.len() < 3 {
            return Err(row_error(
                row,
                format!("expected 3 columns, found {}", record.len()),
            ));
        }

        Ok(ImportRow {
            row,
            color: record[0].to_string(),
            cotton_percentage: parse_number(row, "cottonPercentage", &record[1])?,
            quantity: parse_number(row, "quantity", &record[2])?,
        })
    })
}

// ---------------------------------------------------------------------------
// Spreadsheet
// ---------------------------------------------------------------------------

fn spreadsheet_rows(
    bytes: &[u8],
) -> InventoryResult<impl Iterator<Item = InventoryResult<ImportRow>> + Send + 'static> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| InventoryError::file_processing(format!("unreadable workbook: {}", e)))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| InventoryError::file_processing("workbook has no sheets"))?
        .map_err(|e| InventoryError::file_processing(format!("unreadable sheet: {}", e)))?;

    let first_row = range.start().map(|(row, _)| u64::from(row)).unwrap_or_default();
    let rows: Vec<(u64, Vec<Data>)> = range
        .rows()
        .enumerate()
        .skip(1)
        .map(|(offset, cells)| (first_row + offset as u64 + 1, cells.to_vec()))
        .filter(|(_, cells)| cells.iter().any(|cell| !matches!(cell, Data::Empty)))
        .collect();

    Ok(rows.into_iter().map(|(row, cells)| {
        let cell = |index: usize| cells.get(index).unwrap_or(&Data::Empty);
        Ok(ImportRow {
            row,
            color: text_cell(row, cell(0))?,
            cotton_percentage: number_cell(row, "cottonPercentage", cell(1))?,
            quantity: number_cell(row, "quantity", cell(2))?,
        })
    }))
}

fn text_cell(row: u64, cell: &Data) -> InventoryResult<String> {
    match cell {
        Data::String(s) => Ok(s.trim().to_string()),
        Data::Int(i) => Ok(i.to_string()),
        Data::Float(f) => Ok(f.to_string()),
        Data::Empty => Err(row_error(row, "missing color")),
        other => Err(row_error(row, format!("unsupported color cell {:?}", other))),
    }
}

/// Numeric cells are truncated toward zero; numeric text is parsed
fn number_cell(row: u64, column: &str, cell: &Data) -> InventoryResult<i32> {
    match cell {
        Data::Int(i) => i32::try_from(*i)
            .map_err(|_| row_error(row, format!("{} {} is out of range", column, i))),
        Data::Float(f) if f.is_finite() && *f >= i32::MIN as f64 && *f <= i32::MAX as f64 => {
            Ok(f.trunc() as i32)
        }
        Data::Float(f) => Err(row_error(row, format!("{} {} is out of range", column, f))),
        Data::String(s) => parse_number(row, column, s.trim()),
        Data::Empty => Err(row_error(row, format!("missing {}", column))),
        other => Err(row_error(row, format!("invalid {} cell {:?}", column, other))),
    }
}
