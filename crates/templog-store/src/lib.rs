//! templog store - the database side of log extraction
//!
//! Provides:
//! - An engine capability (`open` / `query` / `close`) with a scope guard
//!   that closes every opened database instance exactly once
//! - A SQLite implementation of that capability
//! - The process-wide engine loader
//! - The log extractor for the `temp_logs` table

pub mod db;
pub mod engine;
pub mod errors;
pub mod extract;
pub mod loader;
pub mod sqlite;

// Re-export key types
pub use engine::{DatabaseHandle, QueryEngine, ScopedDatabase, TabularResult};
pub use errors::Result;
pub use extract::{extract_log, extract_log_with, LOG_QUERY};
pub use loader::{engine, ensure_ready, BuildMode, EngineLoader, LoaderConfig};
pub use sqlite::{EngineSettings, SqliteEngine};
