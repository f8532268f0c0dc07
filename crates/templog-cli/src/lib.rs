//! templog CLI library
//!
//! The boundary between the log pipeline and whatever drives it: result
//! envelopes, file selection, persistence and default paths. The `templog`
//! binary is one driver; tests drive the same operations directly.

pub mod boundary;
pub mod paths;
pub mod prompt;

pub use boundary::{DocumentWriter, Envelope, FileFilter, FileSelector, FsDocumentWriter};
pub use paths::AppPaths;
pub use prompt::PromptSelector;
