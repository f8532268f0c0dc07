//! Application data locations

use std::path::{Path, PathBuf};

/// Environment variable overriding the application-data root
pub const ENV_DATA_DIR: &str = "TEMPLOG_DATA_DIR";

const APP_DIR_NAME: &str = "templog";
const BACKUPS_DIR: &str = "backups";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    data_root: PathBuf,
}

impl AppPaths {
    pub fn new(data_root: impl Into<PathBuf>) -> Self {
        Self {
            data_root: data_root.into(),
        }
    }

    /// `TEMPLOG_DATA_DIR`, else the platform data directory joined with `templog`
    pub fn from_env() -> Self {
        match std::env::var_os(ENV_DATA_DIR) {
            Some(root) if !root.is_empty() => Self::new(root),
            _ => Self::new(platform_data_dir().join(APP_DIR_NAME)),
        }
    }

    pub fn data_root(&self) -> &Path {
        &self.data_root
    }

    /// Where backups are expected; only a hint, never created or checked
    pub fn backup_directory(&self) -> PathBuf {
        self.data_root.join(BACKUPS_DIR)
    }
}

/// Per-user application data directory: `%APPDATA%` on Windows,
/// `~/Library/Application Support` on macOS, XDG data home elsewhere
fn platform_data_dir() -> PathBuf {
    dirs::data_dir().unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backup_directory_under_data_root() {
        let paths = AppPaths::new("/var/lib/templog");
        assert_eq!(
            paths.backup_directory(),
            PathBuf::from("/var/lib/templog/backups")
        );
    }

    #[test]
    fn test_backup_directory_is_not_created() {
        let dir = tempfile::TempDir::new().unwrap();
        let paths = AppPaths::new(dir.path().join("app"));
        let backups = paths.backup_directory();
        assert!(!backups.exists());
    }

    #[test]
    fn test_platform_root_ends_with_app_dir() {
        let root = platform_data_dir().join(APP_DIR_NAME);
        assert!(root.ends_with(APP_DIR_NAME));
        assert_eq!(
            AppPaths::new(&root).backup_directory(),
            root.join(BACKUPS_DIR)
        );
    }

    #[test]
    fn test_platform_root_follows_dirs_data_dir() {
        if let Some(base) = dirs::data_dir() {
            assert_eq!(platform_data_dir(), base);
        }
    }
}
