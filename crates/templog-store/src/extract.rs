//! Log extraction from an exported sensor database
//!
//! The whole `temp_logs` table is read into memory through a database
//! instance that belongs to a single call and is closed before returning.

use crate::engine::{QueryEngine, ScopedDatabase};
use crate::errors::{extraction, file_read, Result};
use crate::loader;
use std::path::Path;
use std::time::Instant;
use templog_core::errors::{ExError, ExErrorKind};
use templog_core::model::{LogRecord, LogRecordSet};
use templog_core::{log_op_end, log_op_error, log_op_start};

/// The one query issued against a log database
pub const LOG_QUERY: &str =
    "SELECT sl, sensor_name, status, temperature, timestamp FROM temp_logs ORDER BY sl DESC";

/// Extract the log table of `path` using the process-wide engine
///
/// # Errors
///
/// - `EngineNotInitialized` if `loader::ensure_ready` has not succeeded
/// - `FileRead` if the file cannot be read
/// - `Extraction` for anything that goes wrong opening or querying it
pub fn extract_log(path: &Path) -> Result<LogRecordSet> {
    let engine = loader::engine()?;
    extract_log_with(engine.as_ref(), path)
}

/// Extract the log table of `path` using `engine`
///
/// # Errors
///
/// - `FileRead` if the file cannot be read
/// - `Extraction` for anything that goes wrong opening or querying it
pub fn extract_log_with<E: QueryEngine>(engine: &E, path: &Path) -> Result<LogRecordSet> {
    let start = Instant::now();
    log_op_start!("extract_log", path = %path.display());

    let result = read_and_query(engine, path);
    let elapsed = start.elapsed().as_millis() as u64;
    match &result {
        Ok(records) => {
            log_op_end!(
                "extract_log",
                duration_ms = elapsed,
                path = %path.display(),
                row_count = records.len()
            );
        }
        Err(err) => {
            log_op_error!(
                "extract_log",
                err.clone(),
                duration_ms = elapsed,
                path = %path.display()
            );
        }
    }
    result
}

fn read_and_query<E: QueryEngine>(engine: &E, path: &Path) -> Result<LogRecordSet> {
    let bytes = std::fs::read(path).map_err(|e| file_read(path, e))?;
    query_log(engine, bytes).map_err(|e| extraction(path, e))
}

fn query_log<E: QueryEngine>(engine: &E, bytes: Vec<u8>) -> Result<LogRecordSet> {
    let mut db = ScopedDatabase::new(engine.open(bytes)?);

    let Some(table) = db.query(LOG_QUERY)?.filter(|t| !t.is_empty()) else {
        return Ok(LogRecordSet::default());
    };
    let records = table
        .rows
        .into_iter()
        .map(|row| LogRecord::from_row(&table.columns, row))
        .collect::<std::result::Result<LogRecordSet, _>>()
        .map_err(|e| {
            ExError::new(ExErrorKind::Extraction)
                .with_op("map_rows")
                .with_message(e.to_string())
        })?;

    db.close()?;
    Ok(records)
}
