//! CSV rendering of extracted log records
//!
//! Escaping is deliberately minimal: a text cell is quoted only when it
//! contains a comma, and embedded quotes are doubled only inside such a
//! quoted cell. Newlines and surrounding whitespace pass through untouched.

use crate::errors::{Result, TempLogError};
use crate::model::{CellValue, DynamicRecord, LogRecord};
use crate::{log_op_end, log_op_error, log_op_start};
use std::fmt;
use std::time::Instant;

/// A record the exporter can render
///
/// `field_names` of the first record defines the header and column order
/// of the whole document.
pub trait CsvRecord {
    fn field_names(&self) -> Vec<String>;

    /// Value of `name`, `None` when the record has no such field
    fn cell(&self, name: &str) -> Option<CellValue>;
}

impl CsvRecord for LogRecord {
    fn field_names(&self) -> Vec<String> {
        LogRecord::FIELD_NAMES.iter().map(|s| s.to_string()).collect()
    }

    fn cell(&self, name: &str) -> Option<CellValue> {
        LogRecord::cell(self, name)
    }
}

impl CsvRecord for DynamicRecord {
    fn field_names(&self) -> Vec<String> {
        DynamicRecord::field_names(self).map(str::to_string).collect()
    }

    fn cell(&self, name: &str) -> Option<CellValue> {
        self.get(name).cloned()
    }
}

/// Rendered CSV text: a header line, then one line per record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvDocument {
    text: String,
    rows: usize,
}

impl CsvDocument {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Physical lines of the text; a cell holding a newline spans two
    pub fn lines(&self) -> std::str::Split<'_, char> {
        self.text.split('\n')
    }

    /// Number of records rendered
    pub fn row_count(&self) -> usize {
        self.rows
    }

    /// Header plus one logical line per record
    pub fn line_count(&self) -> usize {
        self.rows + 1
    }
}

impl fmt::Display for CsvDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Human-readable column label for a field name
pub fn header_label(name: &str) -> String {
    match name {
        "sensor_name" => "Sensor Name".to_string(),
        "temperature" => "Temperature (C)".to_string(),
        "timestamp" => "Time Stamp".to_string(),
        other => other.to_uppercase(),
    }
}

/// Render one cell; only comma-bearing text is quoted
pub fn escape_cell(cell: &CellValue) -> String {
    match cell {
        CellValue::Text(s) if s.contains(',') => format!("\"{}\"", s.replace('"', "\"\"")),
        other => other.to_string(),
    }
}

/// Render `records` as a CSV document
///
/// # Errors
///
/// - `NoData` when `records` is empty
pub fn export_csv<R: CsvRecord>(records: &[R]) -> Result<CsvDocument> {
    let start = Instant::now();
    log_op_start!("export_csv", row_count = records.len());

    let Some(first) = records.first() else {
        let err = TempLogError::NoData;
        log_op_error!(
            "export_csv",
            err.clone(),
            duration_ms = start.elapsed().as_millis() as u64
        );
        return Err(err.into());
    };

    let fields = first.field_names();
    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(
        fields
            .iter()
            .map(|f| header_label(f))
            .collect::<Vec<_>>()
            .join(","),
    );

    for record in records {
        let row = fields
            .iter()
            .map(|f| record.cell(f).map(|c| escape_cell(&c)).unwrap_or_default())
            .collect::<Vec<_>>()
            .join(",");
        lines.push(row);
    }

    let doc = CsvDocument {
        text: lines.join("\n"),
        rows: records.len(),
    };
    log_op_end!(
        "export_csv",
        duration_ms = start.elapsed().as_millis() as u64,
        line_count = doc.line_count()
    );
    Ok(doc)
}
