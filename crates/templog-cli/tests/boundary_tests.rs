//! Boundary operation tests
//!
//! Drive open/save through in-memory selectors and writers and check the
//! envelopes they produce.

use chrono::NaiveDate;
use rusqlite::Connection;
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use templog_cli::boundary::{
    self, DocumentWriter, FileFilter, FileSelector, LoadedLog, DATABASE_FILTER,
};
use templog_core::csv::CsvDocument;
use templog_core::errors::{ExError, ExErrorKind, Result, TempLogError};
use templog_core::model::{LogRecord, Temperature, Timestamp};

/// Selector that answers with fixed paths and remembers what it was asked
#[derive(Default)]
struct FixedSelector {
    database: Option<PathBuf>,
    save_target: Option<PathBuf>,
    offered_names: RefCell<Vec<String>>,
}

impl FileSelector for FixedSelector {
    fn select_database(&self, _filter: &FileFilter) -> Result<Option<PathBuf>> {
        Ok(self.database.clone())
    }

    fn select_save_target(
        &self,
        default_name: &str,
        _filter: &FileFilter,
    ) -> Result<Option<PathBuf>> {
        self.offered_names.borrow_mut().push(default_name.to_string());
        Ok(self.save_target.clone())
    }
}

#[derive(Default)]
struct MemoryWriter {
    written: RefCell<Vec<(PathBuf, String)>>,
}

impl DocumentWriter for MemoryWriter {
    fn write(&self, path: &Path, document: &CsvDocument) -> Result<()> {
        self.written
            .borrow_mut()
            .push((path.to_path_buf(), document.as_str().to_string()));
        Ok(())
    }
}

struct FailingWriter;

impl DocumentWriter for FailingWriter {
    fn write(&self, path: &Path, _document: &CsvDocument) -> Result<()> {
        Err(ExError::from(TempLogError::CsvWrite {
            path: path.to_path_buf(),
            message: "disk full".to_string(),
        }))
    }
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
}

fn record(sl: i64, name: &str) -> LogRecord {
    LogRecord {
        sl,
        sensor_name: Some(name.to_string()),
        status: Some("OK".to_string()),
        temperature: Some(Temperature::Real(21.5)),
        timestamp: Some(Timestamp::Text("2024-01-01T00:00:00Z".to_string())),
    }
}

fn setup_log_db(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("logs.db");
    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(
        "CREATE TABLE temp_logs (sl INTEGER PRIMARY KEY, sensor_name TEXT, status TEXT, temperature REAL, timestamp TEXT);
         INSERT INTO temp_logs VALUES (1, 'A,B', 'OK', 21.5, '2024-01-01T00:00:00Z');
         INSERT INTO temp_logs VALUES (2, 'probe', 'WARN', 35, '2024-01-01T00:01:00Z');",
    )
    .unwrap();
    conn.close().unwrap();
    path
}

#[test]
fn test_open_log_canceled_is_not_failure() {
    let selector = FixedSelector::default();
    let envelope = boundary::open_log(&selector);

    assert!(envelope.canceled);
    assert!(!envelope.success);
    assert!(!envelope.is_failure());
    assert!(envelope.data.is_none());
}

#[test]
fn test_open_log_loads_records() {
    let dir = TempDir::new().unwrap();
    let path = setup_log_db(&dir);
    let selector = FixedSelector {
        database: Some(path.clone()),
        ..FixedSelector::default()
    };

    let envelope = boundary::open_log(&selector);
    assert!(envelope.success, "{:?}", envelope.message);
    let LoadedLog { path: loaded_from, records } = envelope.data.unwrap();
    assert_eq!(loaded_from, path);
    assert_eq!(records.len(), 2);
    assert_eq!(records.records()[0].sl, 2);
}

#[test]
fn test_open_log_failure_is_flattened() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.db");
    std::fs::write(&path, "definitely not a database file, only some words in it").unwrap();

    let envelope = boundary::open_log_at(&path);
    assert!(envelope.is_failure());
    assert_eq!(envelope.code, Some(ExErrorKind::Extraction.code()));
    assert!(envelope.message.unwrap().contains("broken.db"));
}

#[test]
fn test_save_csv_writes_document_to_selected_target() {
    let selector = FixedSelector {
        save_target: Some(PathBuf::from("/exports/out.csv")),
        ..FixedSelector::default()
    };
    let writer = MemoryWriter::default();

    let envelope = boundary::save_csv(&[record(1, "A,B")], &selector, &writer, today());

    assert!(envelope.success);
    assert_eq!(envelope.data.unwrap().rows, 1);
    assert_eq!(
        *selector.offered_names.borrow(),
        vec!["log_data_export_20240115.csv".to_string()]
    );
    let written = writer.written.borrow();
    assert_eq!(written[0].0, PathBuf::from("/exports/out.csv"));
    assert_eq!(
        written[0].1,
        "SL,Sensor Name,STATUS,Temperature (C),Time Stamp\n1,\"A,B\",OK,21.5,2024-01-01T00:00:00Z"
    );
}

#[test]
fn test_save_csv_with_no_records_fails_before_asking() {
    let selector = FixedSelector {
        save_target: Some(PathBuf::from("out.csv")),
        ..FixedSelector::default()
    };
    let writer = MemoryWriter::default();
    let records: Vec<LogRecord> = Vec::new();

    let envelope = boundary::save_csv(&records, &selector, &writer, today());

    assert!(envelope.is_failure());
    assert_eq!(envelope.code, Some(ExErrorKind::NoData.code()));
    assert!(selector.offered_names.borrow().is_empty());
    assert!(writer.written.borrow().is_empty());
}

#[test]
fn test_save_csv_canceled_writes_nothing() {
    let selector = FixedSelector::default();
    let writer = MemoryWriter::default();

    let envelope = boundary::save_csv(&[record(1, "probe")], &selector, &writer, today());

    assert!(envelope.canceled);
    assert!(writer.written.borrow().is_empty());
}

#[test]
fn test_save_csv_write_failure_is_reported() {
    let selector = FixedSelector {
        save_target: Some(PathBuf::from("/readonly/out.csv")),
        ..FixedSelector::default()
    };

    let envelope = boundary::save_csv(&[record(1, "probe")], &selector, &FailingWriter, today());

    assert!(envelope.is_failure());
    assert_eq!(envelope.code, Some(ExErrorKind::CsvWrite.code()));
    assert!(envelope.message.unwrap().contains("disk full"));
}

#[test]
fn test_save_records_file_keeps_supplied_columns() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("edited.json");
    std::fs::write(
        &input,
        r#"[{"sl": 2, "sensor_name": "probe", "note": "He said \"hi\""},
            {"sl": 1, "sensor_name": null, "note": "a, b"}]"#,
    )
    .unwrap();
    let selector = FixedSelector {
        save_target: Some(PathBuf::from("edited.csv")),
        ..FixedSelector::default()
    };
    let writer = MemoryWriter::default();

    let envelope = boundary::save_records_file(&input, &selector, &writer, today());

    assert!(envelope.success, "{:?}", envelope.message);
    assert_eq!(
        writer.written.borrow()[0].1,
        "SL,Sensor Name,NOTE\n2,probe,He said \"hi\"\n1,,\"a, b\""
    );
}

#[test]
fn test_save_records_file_rejects_non_array() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("bad.json");
    std::fs::write(&input, r#"{"sl": 1}"#).unwrap();

    let envelope = boundary::save_records_file(
        &input,
        &FixedSelector::default(),
        &MemoryWriter::default(),
        today(),
    );
    assert!(envelope.is_failure());
    assert_eq!(envelope.code, Some(ExErrorKind::InvalidInput.code()));
}

#[test]
fn test_database_filter_offered_for_open() {
    assert!(DATABASE_FILTER.matches(Path::new("exported.db")));
}
