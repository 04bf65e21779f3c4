//! Catalog configuration
//!
//! Built once at process start (by the CLI from its arguments) and passed by
//! reference to every component; nothing mutates it afterwards.

use std::path::{Path, PathBuf};

use crate::errors::Result;
use crate::policy::SnapshotFailureMode;
use crate::retention::{RetentionPolicy, DEFAULT_RETENTION_LIMIT};

pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_BACKUP_DIR: &str = "backups";
pub const DEFAULT_EXPORT_DIR: &str = "exports";

/// File name of the live catalog inside `data_dir`
pub const DATABASE_FILE_NAME: &str = "livraria.db";

/// File name of the CSV export inside `export_dir`
pub const EXPORT_FILE_NAME: &str = "livros_exportados.csv";

/// Locations and policies for one catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
    /// Directory holding the live database file
    pub data_dir: PathBuf,
    /// Directory holding timestamped snapshots
    pub backup_dir: PathBuf,
    /// Directory receiving CSV exports
    pub export_dir: PathBuf,
    pub retention_limit: usize,
    pub failure_mode: SnapshotFailureMode,
}

impl CatalogConfig {
    /// Default layout rooted at `root` (`root/data`, `root/backups`, `root/exports`)
    pub fn rooted_at(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            data_dir: root.join(DEFAULT_DATA_DIR),
            backup_dir: root.join(DEFAULT_BACKUP_DIR),
            export_dir: root.join(DEFAULT_EXPORT_DIR),
            ..Self::default()
        }
    }

    pub fn with_retention_limit(mut self, limit: usize) -> Self {
        self.retention_limit = limit;
        self
    }

    pub fn with_failure_mode(mut self, mode: SnapshotFailureMode) -> Self {
        self.failure_mode = mode;
        self
    }

    /// Path of the live catalog database
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(DATABASE_FILE_NAME)
    }

    /// Path the CSV export is written to
    pub fn export_path(&self) -> PathBuf {
        self.export_dir.join(EXPORT_FILE_NAME)
    }

    /// # Errors
    ///
    /// `InvalidRetentionLimit` when the limit is zero
    pub fn retention_policy(&self) -> Result<RetentionPolicy> {
        RetentionPolicy::new(self.retention_limit)
    }

    /// Check the configuration before any directory is touched
    ///
    /// # Errors
    ///
    /// `InvalidRetentionLimit` when the limit is zero
    pub fn validate(&self) -> Result<()> {
        self.retention_policy().map(|_| ())
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            backup_dir: PathBuf::from(DEFAULT_BACKUP_DIR),
            export_dir: PathBuf::from(DEFAULT_EXPORT_DIR),
            retention_limit: DEFAULT_RETENTION_LIMIT,
            failure_mode: SnapshotFailureMode::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::CatalogError;

    #[test]
    fn test_defaults_reproduce_fixed_layout() {
        let config = CatalogConfig::default();
        assert_eq!(config.database_path(), PathBuf::from("data/livraria.db"));
        assert_eq!(
            config.export_path(),
            PathBuf::from("exports/livros_exportados.csv")
        );
        assert_eq!(config.backup_dir, PathBuf::from("backups"));
        assert_eq!(config.retention_limit, 5);
        assert_eq!(config.failure_mode, SnapshotFailureMode::FailClosed);
    }

    #[test]
    fn test_rooted_layout() {
        let config = CatalogConfig::rooted_at("/tmp/cat");
        assert_eq!(
            config.database_path(),
            PathBuf::from("/tmp/cat/data/livraria.db")
        );
        assert_eq!(config.backup_dir, PathBuf::from("/tmp/cat/backups"));
    }

    #[test]
    fn test_validate_rejects_zero_retention() {
        let config = CatalogConfig::default().with_retention_limit(0);
        assert_eq!(
            config.validate().unwrap_err(),
            CatalogError::InvalidRetentionLimit { limit: 0 }
        );
        assert!(CatalogConfig::default().validate().is_ok());
    }
}
