//! SQLite implementation of the query engine capability
//!
//! A database instance is built from file bytes by materializing them into
//! a private temporary directory that lives exactly as long as the handle.
//! SQLite side files (`-wal`, `-shm`, `-journal`) land in the same directory
//! and go with it. The selected source file itself is only ever read.

use crate::db;
use crate::engine::{DatabaseHandle, QueryEngine, TabularResult};
use crate::errors::{engine_init, from_rusqlite, Result};
use rusqlite::types::ValueRef;
use rusqlite::Connection;
use serde::Deserialize;
use std::path::PathBuf;
use tempfile::TempDir;
use templog_core::errors::{ExError, ExErrorKind};
use templog_core::model::CellValue;
use tracing::debug;

/// Settings applied to every database instance the engine opens
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineSettings {
    pub cache_size_kib: u32,
    pub busy_timeout_ms: u64,
    pub query_only: bool,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            cache_size_kib: 2000,
            busy_timeout_ms: 5000,
            query_only: true,
        }
    }
}

/// A ready SQLite engine
#[derive(Debug, Clone)]
pub struct SqliteEngine {
    settings: EngineSettings,
    version: String,
}

impl SqliteEngine {
    /// Initialize from the bytes of an `engine.toml` resource
    ///
    /// # Errors
    ///
    /// `EngineInit` when the resource is not valid UTF-8 TOML settings or the
    /// readiness probe fails.
    pub fn from_resource(bytes: &[u8]) -> Result<Self> {
        let text = std::str::from_utf8(bytes)
            .map_err(|e| engine_init(format!("engine resource is not UTF-8: {}", e)))?;
        let settings: EngineSettings = toml::from_str(text)
            .map_err(|e| engine_init(format!("invalid engine resource: {}", e)))?;
        Self::with_settings(settings)
    }

    /// Initialize with built-in default settings
    ///
    /// # Errors
    ///
    /// `EngineInit` when the readiness probe fails.
    pub fn builtin() -> Result<Self> {
        Self::with_settings(EngineSettings::default())
    }

    /// Probe the engine with `settings` applied to an in-memory connection
    ///
    /// # Errors
    ///
    /// `EngineInit` when the probe connection cannot be opened or configured.
    pub fn with_settings(settings: EngineSettings) -> Result<Self> {
        let probe = || -> Result<String> {
            let conn = db::open_in_memory()?;
            db::configure(&conn, &settings)?;
            conn.query_row("SELECT sqlite_version()", [], |row| row.get(0))
                .map_err(from_rusqlite)
        };
        let version = probe().map_err(|e| engine_init(e.message().to_string()))?;
        debug!(sqlite_version = %version, "sqlite engine probed");
        Ok(Self { settings, version })
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Version string reported by the linked SQLite library
    pub fn version(&self) -> &str {
        &self.version
    }
}

impl QueryEngine for SqliteEngine {
    type Handle = SqliteHandle;

    fn open(&self, bytes: Vec<u8>) -> Result<SqliteHandle> {
        let dir = tempfile::Builder::new()
            .prefix("templog-")
            .tempdir()
            .map_err(|e| scratch_error("create", e))?;
        let path = dir.path().join(SCRATCH_DB_NAME);
        std::fs::write(&path, bytes).map_err(|e| scratch_error("write", e))?;

        let conn = db::open_read_only(&path)?;
        db::configure(&conn, &self.settings)?;
        Ok(SqliteHandle { conn, dir })
    }
}

const SCRATCH_DB_NAME: &str = "scratch.db";

fn scratch_error(action: &str, err: std::io::Error) -> ExError {
    ExError::new(ExErrorKind::Extraction)
        .with_op("open_database")
        .with_message(format!("failed to {} scratch database file: {}", action, err))
}

/// A SQLite instance backed by a private temporary copy of the file bytes
pub struct SqliteHandle {
    // Field order matters: the connection drops before its directory is removed
    conn: Connection,
    dir: TempDir,
}

impl SqliteHandle {
    /// Directory holding the scratch database and any SQLite side files
    pub fn scratch_dir(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }
}

impl DatabaseHandle for SqliteHandle {
    fn query(&mut self, sql: &str) -> Result<Option<TabularResult>> {
        let mut stmt = self.conn.prepare(sql).map_err(from_rusqlite)?;
        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        if columns.is_empty() {
            stmt.execute([]).map_err(from_rusqlite)?;
            return Ok(None);
        }

        let width = columns.len();
        let mut rows = Vec::new();
        let mut cursor = stmt.query([]).map_err(from_rusqlite)?;
        while let Some(row) = cursor.next().map_err(from_rusqlite)? {
            let cells = (0..width)
                .map(|i| row.get_ref(i).map(cell_from_ref))
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(from_rusqlite)?;
            rows.push(cells);
        }

        Ok(Some(TabularResult { columns, rows }))
    }

    fn close(self) -> Result<()> {
        let SqliteHandle { conn, dir } = self;
        conn.close().map_err(|(_, e)| from_rusqlite(e))?;
        dir.close().map_err(|e| scratch_error("remove", e))
    }
}

fn cell_from_ref(value: ValueRef<'_>) -> CellValue {
    match value {
        ValueRef::Null => CellValue::Null,
        ValueRef::Integer(i) => CellValue::Integer(i),
        ValueRef::Real(r) => CellValue::Real(r),
        ValueRef::Text(t) => CellValue::Text(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(b) => CellValue::Blob(b.to_vec()),
    }
}
