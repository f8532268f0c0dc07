//! Backup directory command
//!
//! Usage: templog backup-dir

use templog_cli::{boundary, AppPaths};

pub fn execute() -> Result<(), Box<dyn std::error::Error>> {
    let dir = boundary::default_backup_directory(&AppPaths::from_env());
    println!("{}", dir.display());
    Ok(())
}
