//! Boundary operations
//!
//! Every user-facing operation returns an [`Envelope`] instead of an error:
//! failures inside the pipeline are caught here and flattened into
//! `message`, and a canceled selection is reported as `canceled`, never as
//! a failure.

use crate::paths::AppPaths;
use chrono::NaiveDate;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;
use templog_core::core_types::RequestId;
use templog_core::csv::{export_csv, CsvDocument, CsvRecord};
use templog_core::errors::{ExError, Result, TempLogError};
use templog_core::model::{DynamicRecord, LogRecordSet};
use templog_core::{log_op_end, log_op_error, log_op_start};
use tracing::info_span;

/// Result envelope handed to the caller of a boundary operation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub canceled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            canceled: false,
            message: None,
            code: None,
            data: Some(data),
        }
    }

    pub fn canceled() -> Self {
        Self {
            success: false,
            canceled: true,
            message: None,
            code: None,
            data: None,
        }
    }

    pub fn failed(err: &ExError) -> Self {
        let message = if err.message().is_empty() {
            err.to_string()
        } else {
            err.message().to_string()
        };
        Self {
            success: false,
            canceled: false,
            message: Some(message),
            code: Some(err.code()),
            data: None,
        }
    }

    /// Neither succeeded nor was canceled
    pub fn is_failure(&self) -> bool {
        !self.success && !self.canceled
    }
}

/// A named extension filter offered to a file selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileFilter {
    pub name: &'static str,
    pub extensions: &'static [&'static str],
}

impl FileFilter {
    /// Case-insensitive extension match
    pub fn matches(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
            .unwrap_or(false)
    }
}

pub const DATABASE_FILTER: FileFilter = FileFilter {
    name: "Database",
    extensions: &["db", "sqlite", "sqlite3"],
};

pub const CSV_FILTER: FileFilter = FileFilter {
    name: "CSV",
    extensions: &["csv"],
};

/// Picks files on the user's behalf; `Ok(None)` means the user canceled
pub trait FileSelector {
    /// # Errors
    ///
    /// The selector could not present or complete the selection.
    fn select_database(&self, filter: &FileFilter) -> Result<Option<PathBuf>>;

    /// # Errors
    ///
    /// The selector could not present or complete the selection.
    fn select_save_target(&self, default_name: &str, filter: &FileFilter)
        -> Result<Option<PathBuf>>;
}

/// Persists a rendered document
pub trait DocumentWriter {
    /// # Errors
    ///
    /// `CsvWrite` carrying the destination path.
    fn write(&self, path: &Path, document: &CsvDocument) -> Result<()>;
}

/// Writes documents to the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct FsDocumentWriter;

impl DocumentWriter for FsDocumentWriter {
    fn write(&self, path: &Path, document: &CsvDocument) -> Result<()> {
        std::fs::write(path, document.as_str()).map_err(|e| {
            ExError::from(TempLogError::CsvWrite {
                path: path.to_path_buf(),
                message: e.to_string(),
            })
            .with_op("save_csv")
        })
    }
}

/// Default export file name for `date`: `log_data_export_<YYYYMMDD>.csv`
pub fn default_export_file_name(date: NaiveDate) -> String {
    format!("log_data_export_{}.csv", date.format("%Y%m%d"))
}

/// Records loaded from a selected database
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadedLog {
    pub path: PathBuf,
    pub records: LogRecordSet,
}

/// Where an export was written and how many records it holds
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SavedExport {
    pub path: PathBuf,
    pub rows: usize,
}

enum Outcome<T> {
    Done(T),
    Canceled,
}

fn run<T>(op: &'static str, body: impl FnOnce() -> Result<Outcome<T>>) -> Envelope<T> {
    let request_id = RequestId::new();
    let span = info_span!("boundary", request_id = %request_id);
    let _entered = span.enter();

    let start = Instant::now();
    log_op_start!(op);
    let result = body();
    let duration_ms = start.elapsed().as_millis() as u64;
    match result {
        Ok(Outcome::Done(data)) => {
            log_op_end!(op, duration_ms = duration_ms);
            Envelope::ok(data)
        }
        Ok(Outcome::Canceled) => {
            log_op_end!(op, duration_ms = duration_ms, canceled = true);
            Envelope::canceled()
        }
        Err(err) => {
            log_op_error!(op, err.clone(), duration_ms = duration_ms);
            Envelope::failed(&err)
        }
    }
}

fn load(path: &Path) -> Result<LoadedLog> {
    templog_store::ensure_ready()?;
    let records = templog_store::extract_log(path)?;
    Ok(LoadedLog {
        path: path.to_path_buf(),
        records,
    })
}

/// Ask for a database file and load its log table
pub fn open_log(selector: &dyn FileSelector) -> Envelope<LoadedLog> {
    run("open_log", || {
        match selector.select_database(&DATABASE_FILTER)? {
            Some(path) => load(&path).map(Outcome::Done),
            None => Ok(Outcome::Canceled),
        }
    })
}

/// Load the log table of an already chosen database file
pub fn open_log_at(path: &Path) -> Envelope<LoadedLog> {
    run("open_log", || load(path).map(Outcome::Done))
}

fn save<R: CsvRecord>(
    records: &[R],
    selector: &dyn FileSelector,
    writer: &dyn DocumentWriter,
    today: NaiveDate,
) -> Result<Outcome<SavedExport>> {
    let document = export_csv(records)?;
    let default_name = default_export_file_name(today);
    let Some(path) = selector.select_save_target(&default_name, &CSV_FILTER)? else {
        return Ok(Outcome::Canceled);
    };
    writer.write(&path, &document)?;
    Ok(Outcome::Done(SavedExport {
        path,
        rows: records.len(),
    }))
}

/// Render `records` as CSV, ask for a destination and write it there
///
/// Empty input fails with `NoData` before any destination is asked for.
pub fn save_csv<R: CsvRecord>(
    records: &[R],
    selector: &dyn FileSelector,
    writer: &dyn DocumentWriter,
    today: NaiveDate,
) -> Envelope<SavedExport> {
    run("save_csv", || save(records, selector, writer, today))
}

fn read_records_file(path: &Path) -> Result<Vec<DynamicRecord>> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        ExError::from(TempLogError::FileRead {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    })?;
    DynamicRecord::list_from_json(&text).map_err(|e| e.with_path(path))
}

/// Export records re-supplied as a JSON array of objects
pub fn save_records_file(
    path: &Path,
    selector: &dyn FileSelector,
    writer: &dyn DocumentWriter,
    today: NaiveDate,
) -> Envelope<SavedExport> {
    run("save_csv", || {
        let records = read_records_file(path)?;
        save(&records, selector, writer, today)
    })
}

/// Directory suggested for backups
pub fn default_backup_directory(paths: &AppPaths) -> PathBuf {
    paths.backup_directory()
}
