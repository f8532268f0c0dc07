//! Terminal file selection
//!
//! Paths given on the command line are used as-is; anything missing is
//! asked for on the terminal. End of input cancels the selection.

use crate::boundary::{FileFilter, FileSelector};
use std::cell::RefCell;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use templog_core::errors::{ExError, ExErrorKind, Result, TempLogError};

pub struct PromptSelector<R, W> {
    input: RefCell<R>,
    output: RefCell<W>,
    database: Option<PathBuf>,
    save_target: Option<PathBuf>,
}

impl<R: BufRead, W: Write> PromptSelector<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input: RefCell::new(input),
            output: RefCell::new(output),
            database: None,
            save_target: None,
        }
    }

    /// Use `path` instead of asking for a database
    pub fn with_database(mut self, path: Option<PathBuf>) -> Self {
        self.database = path;
        self
    }

    /// Use `path` instead of asking for a save target
    pub fn with_save_target(mut self, path: Option<PathBuf>) -> Self {
        self.save_target = path;
        self
    }

    // `None` on end of input
    fn ask(&self, question: &str) -> Result<Option<String>> {
        {
            let mut out = self.output.borrow_mut();
            write!(out, "{}", question)
                .and_then(|_| out.flush())
                .map_err(terminal_error)?;
        }
        let mut line = String::new();
        let read = self
            .input
            .borrow_mut()
            .read_line(&mut line)
            .map_err(terminal_error)?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

fn terminal_error(err: std::io::Error) -> ExError {
    ExError::new(ExErrorKind::Internal)
        .with_op("prompt")
        .with_message(format!("terminal I/O failed: {}", err))
}

impl<R: BufRead, W: Write> FileSelector for PromptSelector<R, W> {
    fn select_database(&self, filter: &FileFilter) -> Result<Option<PathBuf>> {
        let chosen = match &self.database {
            Some(path) => Some(path.clone()),
            None => {
                let question = format!(
                    "{} file (.{}): ",
                    filter.name,
                    filter.extensions.join(", .")
                );
                match self.ask(&question)? {
                    Some(answer) if !answer.is_empty() => Some(PathBuf::from(answer)),
                    _ => None,
                }
            }
        };

        match chosen {
            Some(path) if !filter.matches(&path) => Err(TempLogError::InvalidInput {
                message: format!(
                    "{} does not have a {} extension ({})",
                    path.display(),
                    filter.name.to_lowercase(),
                    filter.extensions.join(", ")
                ),
            }
            .into()),
            other => Ok(other),
        }
    }

    fn select_save_target(
        &self,
        default_name: &str,
        filter: &FileFilter,
    ) -> Result<Option<PathBuf>> {
        if let Some(path) = &self.save_target {
            return Ok(Some(path.clone()));
        }
        let question = format!("Save {} as [{}]: ", filter.name, default_name);
        Ok(self.ask(&question)?.map(|answer| {
            if answer.is_empty() {
                PathBuf::from(default_name)
            } else {
                PathBuf::from(answer)
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::{CSV_FILTER, DATABASE_FILTER};
    use std::io::Cursor;

    fn selector(input: &str) -> PromptSelector<Cursor<Vec<u8>>, Vec<u8>> {
        PromptSelector::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn test_preset_database_skips_prompt() {
        let s = selector("").with_database(Some(PathBuf::from("logs.db")));
        let chosen = s.select_database(&DATABASE_FILTER).unwrap();
        assert_eq!(chosen, Some(PathBuf::from("logs.db")));
        assert!(s.output.borrow().is_empty());
    }

    #[test]
    fn test_prompted_database() {
        let s = selector("  /data/logs.db \n");
        let chosen = s.select_database(&DATABASE_FILTER).unwrap();
        assert_eq!(chosen, Some(PathBuf::from("/data/logs.db")));
        let asked = String::from_utf8(s.output.borrow().clone()).unwrap();
        assert_eq!(asked, "Database file (.db, .sqlite, .sqlite3): ");
    }

    #[test]
    fn test_eof_or_blank_cancels_database() {
        assert_eq!(selector("").select_database(&DATABASE_FILTER).unwrap(), None);
        assert_eq!(selector("\n").select_database(&DATABASE_FILTER).unwrap(), None);
    }

    #[test]
    fn test_wrong_extension_is_invalid_input() {
        let s = selector("").with_database(Some(PathBuf::from("logs.csv")));
        let err = s.select_database(&DATABASE_FILTER).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::InvalidInput);
    }

    #[test]
    fn test_enter_accepts_default_save_name() {
        let s = selector("\n");
        let chosen = s
            .select_save_target("log_data_export_20240101.csv", &CSV_FILTER)
            .unwrap();
        assert_eq!(chosen, Some(PathBuf::from("log_data_export_20240101.csv")));
    }

    #[test]
    fn test_eof_cancels_save() {
        let s = selector("");
        let chosen = s
            .select_save_target("log_data_export_20240101.csv", &CSV_FILTER)
            .unwrap();
        assert_eq!(chosen, None);
    }
}
