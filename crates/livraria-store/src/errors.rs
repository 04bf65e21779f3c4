//! Error helpers for livraria-store
//!
//! Builds `ExError` values for the failure modes of the persistence layer

use livraria_core::errors::{ExError, ExErrorKind};
use std::path::Path;

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Create a migration error
pub fn migration_error(migration_id: &str, reason: &str) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op("migration")
        .with_message(format!("Migration {} failed: {}", migration_id, reason))
}

/// Create a database error from rusqlite::Error
pub fn from_rusqlite(err: rusqlite::Error) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op("sqlite")
        .with_message(err.to_string())
}

/// Create a storage IO error
pub fn io_error(operation: &str, err: std::io::Error) -> ExError {
    ExError::new(ExErrorKind::StorageIo)
        .with_op(operation.to_string())
        .with_message(err.to_string())
}

/// The live database could not be read for a snapshot
pub fn source_unavailable(path: &Path, reason: impl Into<String>) -> ExError {
    ExError::new(ExErrorKind::SourceUnavailable)
        .with_op("create_snapshot")
        .with_path(path)
        .with_message(reason)
}

/// Every same-second suffix for a snapshot name is taken
pub fn snapshot_names_exhausted(stamp: &str) -> ExError {
    ExError::new(ExErrorKind::StorageIo)
        .with_op("create_snapshot")
        .with_subject(stamp.to_string())
        .with_message("All snapshot names for this second are taken")
}

/// A CSV row that cannot become a book
pub fn malformed_row(path: &Path, line: u64, reason: impl Into<String>) -> ExError {
    ExError::new(ExErrorKind::MalformedInput)
        .with_op("import_csv")
        .with_path(path)
        .with_line(line)
        .with_message(reason)
}

/// Map a csv crate error, keeping IO failures apart from format failures
pub fn from_csv(operation: &str, path: &Path, err: csv::Error) -> ExError {
    let line = err.position().map(|p| p.line());
    let kind = if err.is_io_error() {
        ExErrorKind::StorageIo
    } else {
        ExErrorKind::MalformedInput
    };

    let ex = ExError::new(kind)
        .with_op(operation.to_string())
        .with_path(path)
        .with_message(err.to_string());
    match line {
        Some(line) => ex.with_line(line),
        None => ex,
    }
}
