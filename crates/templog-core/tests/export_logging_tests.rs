#![allow(clippy::unwrap_used, clippy::expect_used)]

use templog_core::core_types::schema::{
    EVENT_END, EVENT_END_ERROR, EVENT_START, FIELD_DURATION_MS, FIELD_ERR_CODE, FIELD_ERR_KIND,
    FIELD_ERR_MESSAGE, FIELD_LINE_COUNT, FIELD_PATH, FIELD_ROW_COUNT,
};
use templog_core::errors::TempLogError;
use templog_core::logging_facility::test_capture::init_test_capture;
use templog_core::model::{CellValue, DynamicRecord, LogRecord};
use templog_core::{export_csv, log_op_end, log_op_error, log_op_start};

#[test]
fn test_log_op_macros_emit_canonical_events() {
    let capture = init_test_capture();
    let op_name = "test_macro_events_unique_1";

    log_op_start!(op_name, path = "logs.db");
    log_op_end!(op_name, duration_ms = 42);

    let events = capture.events_for(op_name);
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].event.as_deref(), Some(EVENT_START));
    assert_eq!(events[0].field(FIELD_PATH), Some("logs.db"));
    assert_eq!(events[1].event.as_deref(), Some(EVENT_END));
    assert_eq!(events[1].field(FIELD_DURATION_MS), Some("42"));
}

#[test]
fn test_log_op_error_includes_kind_and_code() {
    let capture = init_test_capture();
    let op_name = "test_macro_error_unique_2";

    log_op_error!(op_name, TempLogError::NoData, duration_ms = 0);

    let errors: Vec<_> = capture
        .events_for(op_name)
        .into_iter()
        .filter(|e| e.event.as_deref() == Some(EVENT_END_ERROR))
        .collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].field(FIELD_ERR_CODE), Some("ERR_NO_DATA"));
    assert_eq!(errors[0].field(FIELD_ERR_KIND), Some("NoData"));
    assert!(errors[0].field(FIELD_ERR_MESSAGE).is_some());
}

#[test]
fn test_export_emits_start_and_end() {
    let capture = init_test_capture();

    // row_count is unique to this test so concurrent tests don't interfere
    let records: Vec<DynamicRecord> = (0..37)
        .map(|i| DynamicRecord::new().with_field("sl", CellValue::Integer(i)))
        .collect();
    let doc = export_csv(&records).unwrap();
    assert_eq!(doc.line_count(), 38);

    let starts = capture.count_events(|e| {
        e.op.as_deref() == Some("export_csv")
            && e.event.as_deref() == Some(EVENT_START)
            && e.field(FIELD_ROW_COUNT) == Some("37")
    });
    assert_eq!(starts, 1);

    let ends = capture.count_events(|e| {
        e.op.as_deref() == Some("export_csv")
            && e.event.as_deref() == Some(EVENT_END)
            && e.field(FIELD_LINE_COUNT) == Some("38")
    });
    assert_eq!(ends, 1);
}

#[test]
fn test_export_of_empty_set_logs_error() {
    let capture = init_test_capture();

    let records: Vec<LogRecord> = Vec::new();
    assert!(export_csv(&records).is_err());

    capture.assert_event_exists("export_csv", EVENT_END_ERROR);
}
