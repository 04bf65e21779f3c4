//! Snapshot-before-mutation coordination
//!
//! `MutationGuard::run` takes a snapshot to completion and only then runs
//! the mutation, so the snapshot holds the state from just before the
//! change. What happens when the snapshot fails is decided by the
//! configured `SnapshotFailureMode`.

#![allow(clippy::result_large_err)]

use livraria_core::errors::{ExError, ExErrorKind};
use livraria_core::model::SnapshotOutcome;
use livraria_core::policy::{SnapshotFailureMode, Snapshotter};
use livraria_store::errors::Result;

/// Value produced by a guarded mutation together with the snapshot taken before it
#[derive(Debug, Clone)]
pub struct Guarded<T> {
    /// `None` only when the snapshot failed under `FailOpen`
    pub snapshot: Option<SnapshotOutcome>,
    pub value: T,
}

/// Coordination point every catalog-altering operation passes through
pub struct MutationGuard<'a> {
    snapshotter: &'a dyn Snapshotter,
    mode: SnapshotFailureMode,
}

impl<'a> MutationGuard<'a> {
    pub fn new(snapshotter: &'a dyn Snapshotter, mode: SnapshotFailureMode) -> Self {
        Self { snapshotter, mode }
    }

    /// Snapshot, then mutate
    ///
    /// # Errors
    ///
    /// - The snapshot error, unchanged in kind, under `FailClosed`; the
    ///   mutation is not run
    /// - Whatever the mutation returns
    pub fn run<T, F>(&self, op: &str, mutation: F) -> Result<Guarded<T>>
    where
        F: FnOnce() -> Result<T>,
    {
        let snapshot = match self.take_snapshot() {
            Ok(outcome) => Some(outcome),
            Err(err) if self.mode.blocks_mutation() => {
                return Err(ExError::new(err.kind())
                    .with_op(op)
                    .with_message("snapshot failed; mutation not applied")
                    .with_source(err));
            }
            Err(err) => {
                tracing::warn!(
                    op,
                    err_code = err.code(),
                    "snapshot failed; applying mutation without a backup"
                );
                None
            }
        };

        let value = mutation()?;
        Ok(Guarded { snapshot, value })
    }

    /// A snapshot evicted by its own prune protects nothing
    fn take_snapshot(&self) -> Result<SnapshotOutcome> {
        let outcome = self.snapshotter.create_snapshot()?;
        if outcome
            .pruned
            .iter()
            .any(|record| record.name == outcome.created.name)
        {
            return Err(ExError::new(ExErrorKind::Internal)
                .with_op("create_snapshot")
                .with_subject(outcome.created.name.clone())
                .with_message("retention evicted the snapshot just taken"));
        }
        Ok(outcome)
    }
}
