//! templog core - log records, CSV export, and the shared error and
//! logging facilities
//!
//! - [`model`]: typed `LogRecord` rows of the `temp_logs` table, plus
//!   `DynamicRecord` for re-supplied data
//! - [`csv`]: the CSV exporter
//! - [`errors`]: `ExError` facility and the `TempLogError` taxonomy
//! - [`logging_facility`]: tracing initialization, op macros, test capture

pub mod csv;
pub mod errors;
pub mod logging_facility;
pub mod model;

pub use templog_core_types as core_types;

// Re-export commonly used types
pub use csv::{export_csv, CsvDocument, CsvRecord};
pub use errors::{ExError, ExErrorKind, Result, TempLogError};
pub use model::{CellValue, DynamicRecord, LogRecord, LogRecordSet, Temperature, Timestamp};
