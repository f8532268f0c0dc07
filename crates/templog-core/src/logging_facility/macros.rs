//! Operation lifecycle macros
//!
//! Every templog operation logs one `start` event and exactly one of `end`
//! or `end_error`. Extra `tracing` fields may follow the required ones.

/// Log that an operation began
///
/// # Example
///
/// ```
/// # use templog_core::log_op_start;
/// log_op_start!("extract_log");
/// log_op_start!("extract_log", path = "logs.db");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr $(, $($field:tt)+)?) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_START,
            $($($field)+)?
        )
    };
}

/// Log that an operation finished successfully
///
/// # Example
///
/// ```
/// # use templog_core::log_op_end;
/// log_op_end!("export_csv", duration_ms = 3);
/// log_op_end!("export_csv", duration_ms = 3, line_count = 11);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr $(, $($field:tt)+)?) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_END,
            duration_ms = $duration,
            $($($field)+)?
        )
    };
}

/// Log that an operation failed
///
/// `$err` is anything convertible into `ExError`; its kind, code and message
/// are recorded.
///
/// ```
/// # use templog_core::{log_op_error, errors::TempLogError};
/// log_op_error!("export_csv", TempLogError::NoData, duration_ms = 0);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr $(, $($field:tt)+)?) => {{
        let failure: $crate::errors::ExError = ::core::convert::Into::into($err);
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?failure.kind(),
            err_code = failure.code(),
            err_message = failure.message(),
            $($($field)+)?
        )
    }};
}
