//! Snapshot seam between orchestration and storage
//!
//! The engine's mutation guard only knows the `Snapshotter` trait; the
//! filesystem snapshot store in `livraria-store` implements it. Tests plug
//! in recording or failing implementations.

use crate::errors::ExError;
use crate::model::SnapshotOutcome;

/// Something that can take a snapshot of the live catalog right now
pub trait Snapshotter {
    /// Copy the live state and apply retention
    ///
    /// # Errors
    ///
    /// - `SourceUnavailable` if the live state cannot be read
    /// - `StorageIo` if the copy or a retention deletion fails
    #[allow(clippy::result_large_err)]
    fn create_snapshot(&self) -> std::result::Result<SnapshotOutcome, ExError>;
}

/// What the mutation guard does when the snapshot step fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SnapshotFailureMode {
    /// Abort: the mutation does not run
    #[default]
    FailClosed,
    /// Log a warning and run the mutation without a snapshot
    FailOpen,
}

impl SnapshotFailureMode {
    pub fn blocks_mutation(&self) -> bool {
        matches!(self, SnapshotFailureMode::FailClosed)
    }
}

/// Always fails (for tests that verify a failed snapshot stops the mutation)
pub struct FailingSnapshotter;

impl Snapshotter for FailingSnapshotter {
    #[allow(clippy::result_large_err)]
    fn create_snapshot(&self) -> std::result::Result<SnapshotOutcome, ExError> {
        Err(
            ExError::new(crate::errors::ExErrorKind::SourceUnavailable)
                .with_op("create_snapshot")
                .with_message("FailingSnapshotter"),
        )
    }
}
