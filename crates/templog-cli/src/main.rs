//! templog CLI
//!
//! View a sensor-log database and export its log table as CSV

use clap::{Parser, Subcommand, ValueEnum};
use templog_core::logging_facility::{self, Profile};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "templog")]
#[command(about = "templog - view and export sensor temperature logs", long_about = None)]
struct Cli {
    /// Log output format (logs go to stderr)
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Load the log table of a database and print it
    View(commands::view::ViewArgs),
    /// Export a log table, or re-supplied records, as CSV
    Export(commands::export::ExportArgs),
    /// Print the default backup directory
    BackupDir,
}

fn main() {
    let cli = Cli::parse();

    logging_facility::init(match cli.log_format {
        LogFormat::Pretty => Profile::Development,
        LogFormat::Json => Profile::Production,
    });

    let result = match cli.command {
        Commands::View(args) => commands::view::execute(args),
        Commands::Export(args) => commands::export::execute(args),
        Commands::BackupDir => commands::backup_dir::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
