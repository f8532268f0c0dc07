use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that can be used for programmatic
/// error handling, testing, and the boundary result envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Engine lifecycle
    EngineInit,
    EngineNotInitialized,

    // Extraction
    FileRead,
    Extraction,

    // Export
    NoData,
    CsvWrite,

    // Boundary
    InvalidInput,
    Serialization,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::EngineInit => "ERR_ENGINE_INIT",
            ExErrorKind::EngineNotInitialized => "ERR_ENGINE_NOT_INITIALIZED",
            ExErrorKind::FileRead => "ERR_FILE_READ",
            ExErrorKind::Extraction => "ERR_EXTRACTION",
            ExErrorKind::NoData => "ERR_NO_DATA",
            ExErrorKind::CsvWrite => "ERR_CSV_WRITE",
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries a classification kind for programmatic handling plus the
/// operation and file path the failure happened in.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    path: Option<PathBuf>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            path: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add file path context
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the file path context, if any
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source error, if any
    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(path) = &self.path {
            write!(f, " (path: {})", path.display())?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Error taxonomy for log extraction and export
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TempLogError {
    /// The embedded database engine could not be initialized
    #[error("Database engine failed to initialize: {message}")]
    EngineInit { message: String },

    /// An operation needed the engine before `ensure_ready` succeeded
    #[error("Database engine is not initialized")]
    EngineNotInitialized,

    /// The selected file could not be read
    #[error("Failed to read {}: {message}", .path.display())]
    FileRead { path: PathBuf, message: String },

    /// Opening, parsing or querying the database failed
    #[error("Failed to extract log from {}: {message}", .path.display())]
    Extraction { path: PathBuf, message: String },

    /// Export was requested with no records
    #[error("No data to export")]
    NoData,

    /// The CSV document could not be written
    #[error("Failed to write CSV to {}: {message}", .path.display())]
    CsvWrite { path: PathBuf, message: String },

    /// Input supplied at the boundary was malformed
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// Serialization failure
    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

impl TempLogError {
    /// Get the error kind for this variant
    pub fn kind(&self) -> ExErrorKind {
        match self {
            TempLogError::EngineInit { .. } => ExErrorKind::EngineInit,
            TempLogError::EngineNotInitialized => ExErrorKind::EngineNotInitialized,
            TempLogError::FileRead { .. } => ExErrorKind::FileRead,
            TempLogError::Extraction { .. } => ExErrorKind::Extraction,
            TempLogError::NoData => ExErrorKind::NoData,
            TempLogError::CsvWrite { .. } => ExErrorKind::CsvWrite,
            TempLogError::InvalidInput { .. } => ExErrorKind::InvalidInput,
            TempLogError::Serialization { .. } => ExErrorKind::Serialization,
        }
    }
}

impl From<TempLogError> for ExError {
    fn from(err: TempLogError) -> Self {
        let mut ex = ExError::new(err.kind()).with_message(err.to_string());
        match err {
            TempLogError::FileRead { path, .. }
            | TempLogError::Extraction { path, .. }
            | TempLogError::CsvWrite { path, .. } => {
                ex = ex.with_path(path);
            }
            _ => {}
        }
        ex
    }
}

impl From<serde_json::Error> for TempLogError {
    fn from(err: serde_json::Error) -> Self {
        TempLogError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for ExError {
    fn from(err: serde_json::Error) -> Self {
        TempLogError::from(err).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_codes() {
        let cases = [
            (ExErrorKind::EngineInit, "ERR_ENGINE_INIT"),
            (
                ExErrorKind::EngineNotInitialized,
                "ERR_ENGINE_NOT_INITIALIZED",
            ),
            (ExErrorKind::FileRead, "ERR_FILE_READ"),
            (ExErrorKind::Extraction, "ERR_EXTRACTION"),
            (ExErrorKind::NoData, "ERR_NO_DATA"),
            (ExErrorKind::CsvWrite, "ERR_CSV_WRITE"),
        ];
        for (kind, expected_code) in cases {
            assert_eq!(kind.code(), expected_code, "Wrong code for {:?}", kind);
        }
    }

    #[test]
    fn test_extraction_error_carries_path() {
        let err: ExError = TempLogError::Extraction {
            path: PathBuf::from("/tmp/logs.db"),
            message: "file is not a database".to_string(),
        }
        .into();

        assert_eq!(err.kind(), ExErrorKind::Extraction);
        assert_eq!(err.path(), Some(Path::new("/tmp/logs.db")));
        assert!(err.message().contains("file is not a database"));
    }

    #[test]
    fn test_display_includes_op_and_path() {
        let err = ExError::new(ExErrorKind::FileRead)
            .with_op("extract_log")
            .with_message("No such file or directory")
            .with_path("missing.db");

        let rendered = err.to_string();
        assert!(rendered.starts_with("[ERR_FILE_READ] in operation 'extract_log'"));
        assert!(rendered.ends_with("(path: missing.db)"));
    }

    #[test]
    fn test_no_data_has_no_path() {
        let err: ExError = TempLogError::NoData.into();
        assert_eq!(err.kind(), ExErrorKind::NoData);
        assert!(err.path().is_none());
        assert_eq!(err.message(), "No data to export");
    }
}
