//! View command
//!
//! Usage: templog view [DB]

use clap::Args;
use std::io;
use std::path::PathBuf;
use templog_cli::{boundary, PromptSelector};

#[derive(Debug, Args)]
pub struct ViewArgs {
    /// Database file (asked for when omitted)
    pub db: Option<PathBuf>,
}

pub fn execute(args: ViewArgs) -> Result<(), Box<dyn std::error::Error>> {
    let selector = PromptSelector::new(io::stdin().lock(), io::stderr()).with_database(args.db);
    let envelope = boundary::open_log(&selector);
    super::print_envelope(&envelope)
}
