//! Backup command handlers
//!
//! A forced backup is a snapshot on demand: it goes straight to the
//! snapshot store (retention still applies) and does not pass through the
//! mutation guard, since nothing in the catalog changes.

#![allow(clippy::result_large_err)]

use livraria_core::model::{SnapshotOutcome, SnapshotRecord};
use livraria_core::{log_op_end, log_op_error, log_op_start};
use livraria_store::errors::Result;
use livraria_store::BackupStore;
use std::time::Instant;

/// Take a snapshot now
pub fn force_backup(store: &BackupStore) -> Result<SnapshotOutcome> {
    log_op_start!("force_backup");
    let start = Instant::now();

    let outcome = store.create_snapshot().map_err(|e| {
        log_op_error!(
            "force_backup",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64
        );
        e
    })?;

    log_op_end!(
        "force_backup",
        duration_ms = start.elapsed().as_millis() as u64,
        snapshot = outcome.created.name.as_str(),
        pruned = outcome.pruned.len()
    );
    Ok(outcome)
}

/// Retained snapshots, oldest first
pub fn list_backups(store: &BackupStore) -> Result<Vec<SnapshotRecord>> {
    store.list_snapshots()
}
