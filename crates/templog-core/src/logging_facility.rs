//! Structured logging for templog
//!
//! `init` installs the subscriber once per process. Operations log through
//! `log_op_start!`, `log_op_end!` and `log_op_error!` so every event carries
//! the field names in `core_types::schema`. Tests swap the subscriber for
//! `init_test_capture` and assert on recorded events.
//!
//! ```rust
//! use templog_core::logging_facility::{init, Profile};
//!
//! init(Profile::Development);
//! ```

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
