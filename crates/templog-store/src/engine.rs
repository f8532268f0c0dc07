//! Query engine capability
//!
//! Extraction is written against this small surface rather than against a
//! particular database library: open a database from raw file bytes, run a
//! query, close the database.

use crate::errors::Result;
use templog_core::model::CellValue;
use tracing::warn;

/// Column names plus rows, exactly as the engine returned them
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TabularResult {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl TabularResult {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// An engine able to open database instances from file contents
pub trait QueryEngine {
    type Handle: DatabaseHandle;

    /// Open a private database instance over `bytes`
    ///
    /// # Errors
    ///
    /// Fails when the engine cannot construct an instance at all. Content
    /// that is not a database may also surface later, from `query`.
    fn open(&self, bytes: Vec<u8>) -> Result<Self::Handle>;
}

/// One open database instance
pub trait DatabaseHandle {
    /// Run `sql`; `None` when the statement produced no result set
    ///
    /// # Errors
    ///
    /// Any engine failure: malformed database, missing table, bad SQL.
    fn query(&mut self, sql: &str) -> Result<Option<TabularResult>>;

    /// Release the instance and its native resources
    ///
    /// # Errors
    ///
    /// The engine reported a failure while closing.
    fn close(self) -> Result<()>;
}

/// Owns a handle and closes it exactly once, on whichever path the scope exits
pub struct ScopedDatabase<H: DatabaseHandle> {
    handle: Option<H>,
}

impl<H: DatabaseHandle> ScopedDatabase<H> {
    pub fn new(handle: H) -> Self {
        Self {
            handle: Some(handle),
        }
    }

    /// Run a query on the owned handle
    ///
    /// # Errors
    ///
    /// Propagates the handle's query error.
    pub fn query(&mut self, sql: &str) -> Result<Option<TabularResult>> {
        match self.handle.as_mut() {
            Some(handle) => handle.query(sql),
            None => Ok(None),
        }
    }

    /// Close now and report the outcome instead of leaving it to `Drop`
    ///
    /// # Errors
    ///
    /// The engine reported a failure while closing.
    pub fn close(mut self) -> Result<()> {
        match self.handle.take() {
            Some(handle) => handle.close(),
            None => Ok(()),
        }
    }
}

impl<H: DatabaseHandle> Drop for ScopedDatabase<H> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            if let Err(err) = handle.close() {
                warn!(op = "close_database", err_code = err.code(), "{}", err);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;
    use templog_core::errors::{ExError, ExErrorKind};

    struct CountingHandle {
        closes: Rc<Cell<usize>>,
        fail_query: bool,
    }

    impl DatabaseHandle for CountingHandle {
        fn query(&mut self, _sql: &str) -> Result<Option<TabularResult>> {
            if self.fail_query {
                Err(ExError::new(ExErrorKind::Extraction).with_message("boom"))
            } else {
                Ok(Some(TabularResult::default()))
            }
        }

        fn close(self) -> Result<()> {
            self.closes.set(self.closes.get() + 1);
            Ok(())
        }
    }

    fn handle(closes: &Rc<Cell<usize>>, fail_query: bool) -> CountingHandle {
        CountingHandle {
            closes: closes.clone(),
            fail_query,
        }
    }

    #[test]
    fn test_drop_closes_once() {
        let closes = Rc::new(Cell::new(0));
        {
            let mut db = ScopedDatabase::new(handle(&closes, false));
            db.query("SELECT 1").unwrap();
        }
        assert_eq!(closes.get(), 1);
    }

    #[test]
    fn test_explicit_close_does_not_double_close() {
        let closes = Rc::new(Cell::new(0));
        let db = ScopedDatabase::new(handle(&closes, false));
        db.close().unwrap();
        assert_eq!(closes.get(), 1);
    }

    #[test]
    fn test_error_path_still_closes() {
        let closes = Rc::new(Cell::new(0));
        let run = || -> Result<Option<TabularResult>> {
            let mut db = ScopedDatabase::new(handle(&closes, true));
            db.query("SELECT 1")
        };
        assert!(run().is_err());
        assert_eq!(closes.get(), 1);
    }
}
