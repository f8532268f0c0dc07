//! Export command
//!
//! Usage: templog export [DB] [--records <FILE>] [--output <FILE>]

use chrono::Local;
use clap::Args;
use std::io;
use std::path::PathBuf;
use templog_cli::{boundary, FsDocumentWriter, PromptSelector};

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Database file to extract (asked for when neither it nor --records is given)
    #[arg(conflicts_with = "records")]
    pub db: Option<PathBuf>,

    /// JSON array of record objects to export instead of a database
    #[arg(long)]
    pub records: Option<PathBuf>,

    /// Destination CSV file (asked for when omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn execute(args: ExportArgs) -> Result<(), Box<dyn std::error::Error>> {
    let today = Local::now().date_naive();
    let selector = PromptSelector::new(io::stdin().lock(), io::stderr())
        .with_database(args.db)
        .with_save_target(args.output);

    let envelope = match args.records {
        Some(records_path) => {
            boundary::save_records_file(&records_path, &selector, &FsDocumentWriter, today)
        }
        None => {
            let loaded = boundary::open_log(&selector);
            let Some(log) = loaded.data.as_ref() else {
                return super::print_envelope(&loaded);
            };
            boundary::save_csv(log.records.records(), &selector, &FsDocumentWriter, today)
        }
    };
    super::print_envelope(&envelope)
}
