//! Database connection management
//!
//! Provides utilities for opening and configuring SQLite connections

use crate::errors::{from_rusqlite, Result};
use crate::sqlite::EngineSettings;
use rusqlite::{Connection, OpenFlags};
use std::path::Path;
use std::time::Duration;

/// Open an existing SQLite database without write access
pub fn open_read_only<P: AsRef<Path>>(path: P) -> Result<Connection> {
    Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .map_err(from_rusqlite)
}

/// Open an in-memory SQLite database (engine probe and tests)
pub fn open_in_memory() -> Result<Connection> {
    Connection::open_in_memory().map_err(from_rusqlite)
}

/// Apply engine settings to a connection
pub fn configure(conn: &Connection, settings: &EngineSettings) -> Result<()> {
    conn.busy_timeout(Duration::from_millis(settings.busy_timeout_ms))
        .map_err(from_rusqlite)?;

    // Negative cache_size is a size in KiB rather than in pages
    conn.execute_batch(&format!(
        "PRAGMA cache_size = -{}; PRAGMA query_only = {};",
        settings.cache_size_kib,
        if settings.query_only { "ON" } else { "OFF" }
    ))
    .map_err(from_rusqlite)?;

    Ok(())
}
