//! Field and event names shared by every structured log line
//!
//! The `log_op_*` macros emit these names and the test capture layer reads
//! them back.

pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";

// Log and export volume
pub const FIELD_PATH: &str = "path";
pub const FIELD_ROW_COUNT: &str = "row_count";
pub const FIELD_LINE_COUNT: &str = "line_count";

// Error fields
pub const FIELD_ERR_KIND: &str = "err_kind";
pub const FIELD_ERR_CODE: &str = "err_code";
pub const FIELD_ERR_MESSAGE: &str = "err_message";

// Lifecycle events
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
