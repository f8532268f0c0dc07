//! Error handling for templog-store
//!
//! Wraps templog-core ExError with store-specific helpers

use std::path::Path;
use templog_core::errors::{ExError, ExErrorKind, TempLogError};

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Create an engine initialization error
pub fn engine_init(reason: impl Into<String>) -> ExError {
    ExError::from(TempLogError::EngineInit {
        message: reason.into(),
    })
    .with_op("ensure_ready")
}

/// Create a database error from rusqlite::Error
pub fn from_rusqlite(err: rusqlite::Error) -> ExError {
    ExError::new(ExErrorKind::Extraction)
        .with_op("sqlite")
        .with_message(err.to_string())
}

/// Create a file read error
pub fn file_read(path: &Path, err: std::io::Error) -> ExError {
    ExError::from(TempLogError::FileRead {
        path: path.to_path_buf(),
        message: err.to_string(),
    })
    .with_op("extract_log")
}

/// Wrap any failure while opening or querying `path` into an extraction error
///
/// The original error is kept as the source so its kind stays inspectable.
pub fn extraction(path: &Path, cause: ExError) -> ExError {
    let message = if cause.message().is_empty() {
        cause.code().to_string()
    } else {
        cause.message().to_string()
    };
    ExError::from(TempLogError::Extraction {
        path: path.to_path_buf(),
        message,
    })
    .with_op("extract_log")
    .with_source(cause)
}
