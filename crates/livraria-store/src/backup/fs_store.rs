//! Filesystem snapshot store
//!
//! Copies the live database file into the backup directory under a
//! timestamped name, then prunes the directory down to the retention limit.

#![allow(clippy::result_large_err)]

use crate::backup::atomic::atomic_copy;
use crate::errors::{io_error, snapshot_names_exhausted, source_unavailable, Result};
use livraria_core::clock::{Clock, SystemClock};
use livraria_core::config::CatalogConfig;
use livraria_core::errors::ExError;
use livraria_core::model::{SnapshotOutcome, SnapshotRecord};
use livraria_core::policy::Snapshotter;
use livraria_core::retention::RetentionPolicy;
use livraria_core::snapshot::SnapshotName;
use std::fs::{self, File};
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// How an evicted snapshot file is deleted
pub type RemoveFn = fn(&Path) -> io::Result<()>;

fn remove_snapshot_file(path: &Path) -> io::Result<()> {
    fs::remove_file(path)
}

/// Snapshot store rooted at a backup directory
pub struct BackupStore {
    source: PathBuf,
    root: PathBuf,
    retention: RetentionPolicy,
    clock: Arc<dyn Clock>,
    remove: RemoveFn,
}

impl BackupStore {
    /// Snapshot `source` into `root`, keeping at most `retention.limit()` copies
    pub fn new(
        source: impl Into<PathBuf>,
        root: impl Into<PathBuf>,
        retention: RetentionPolicy,
    ) -> Self {
        Self {
            source: source.into(),
            root: root.into(),
            retention,
            clock: Arc::new(SystemClock),
            remove: remove_snapshot_file,
        }
    }

    /// Store for the live database and backup directory of `config`
    pub fn from_config(config: &CatalogConfig) -> Result<Self> {
        let retention = config.retention_policy().map_err(ExError::from)?;
        Ok(Self::new(
            config.database_path(),
            config.backup_dir.clone(),
            retention,
        ))
    }

    /// Replace the wall clock used for naming
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replace how evicted snapshots are deleted
    pub fn with_remover(mut self, remove: RemoveFn) -> Self {
        self.remove = remove;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn retention(&self) -> RetentionPolicy {
        self.retention
    }

    /// Copy the live database byte-for-byte, then prune
    ///
    /// # Errors
    ///
    /// - `SourceUnavailable` if the live file is missing, not a file, or
    ///   cannot be opened; nothing is written in that case
    /// - `StorageIo` if the copy fails, the same-second names run out, or a
    ///   retention deletion fails (the new snapshot is kept)
    pub fn create_snapshot(&self) -> Result<SnapshotOutcome> {
        let metadata = fs::metadata(&self.source)
            .map_err(|e| source_unavailable(&self.source, e.to_string()))?;
        if !metadata.is_file() {
            return Err(source_unavailable(
                &self.source,
                "live database path is not a regular file",
            ));
        }
        let mut source = File::open(&self.source)
            .map_err(|e| source_unavailable(&self.source, e.to_string()))?;

        fs::create_dir_all(&self.root).map_err(|e| io_error("create_backup_dir", e))?;

        let name = self.next_free_name()?;
        let target = self.root.join(name.file_name());

        let size_bytes = atomic_copy(&mut source, &target)?;
        drop(source);

        let created = SnapshotRecord {
            name: name.file_name(),
            path: target,
            taken_at: name.taken_at(),
            sequence: name.sequence(),
            size_bytes,
        };
        tracing::debug!(
            snapshot = %created.name,
            size_bytes,
            "created snapshot"
        );

        let pruned = self.prune()?;

        Ok(SnapshotOutcome { created, pruned })
    }

    /// Snapshots currently on disk, oldest first
    ///
    /// Files that do not follow the snapshot naming scheme are ignored. A
    /// missing backup directory means no snapshots.
    pub fn list_snapshots(&self) -> Result<Vec<SnapshotRecord>> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(io_error("list_snapshots", e).with_path(&self.root)),
        };

        let mut records = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| io_error("list_snapshots", e))?;
            let file_name = entry.file_name();
            let Some(file_name) = file_name.to_str() else {
                continue;
            };
            let Ok(name) = SnapshotName::parse(file_name) else {
                continue;
            };
            let metadata = entry
                .metadata()
                .map_err(|e| io_error("list_snapshots", e).with_path(entry.path()))?;
            if !metadata.is_file() {
                continue;
            }

            records.push(SnapshotRecord {
                name: file_name.to_string(),
                path: entry.path(),
                taken_at: name.taken_at(),
                sequence: name.sequence(),
                size_bytes: metadata.len(),
            });
        }

        records.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(records)
    }

    /// Delete every snapshot beyond the retention limit, oldest first
    ///
    /// Stops at the first failed deletion; whatever was not deleted is
    /// picked up by the next prune.
    pub fn prune(&self) -> Result<Vec<SnapshotRecord>> {
        let existing = self.list_snapshots()?;
        let names: Vec<&str> = existing.iter().map(|r| r.name.as_str()).collect();
        let evictions = self.retention.select_evictions(&names);

        let mut pruned = Vec::with_capacity(evictions.len());
        for name in evictions {
            let Some(record) = existing.iter().find(|r| r.name == name) else {
                continue;
            };
            (self.remove)(&record.path)
                .map_err(|e| io_error("prune_snapshot", e).with_path(&record.path))?;
            tracing::debug!(snapshot = %record.name, "pruned snapshot");
            pruned.push(record.clone());
        }

        Ok(pruned)
    }

    /// Name following every snapshot already taken in the current second
    ///
    /// Slots freed by pruning are never reused: a reused lower slot would
    /// sort before its surviving siblings and be evicted by its own prune.
    fn next_free_name(&self) -> Result<SnapshotName> {
        let first = SnapshotName::first_in_second(self.clock.now());
        let latest = self
            .list_snapshots()?
            .iter()
            .filter_map(|record| SnapshotName::parse(&record.name).ok())
            .filter(|name| name.taken_at() == first.taken_at())
            .max();

        match latest {
            None => Ok(first),
            Some(latest) => latest
                .next_in_second()
                .ok_or_else(|| snapshot_names_exhausted(&latest.file_name())),
        }
    }
}

impl Snapshotter for BackupStore {
    fn create_snapshot(&self) -> std::result::Result<SnapshotOutcome, ExError> {
        BackupStore::create_snapshot(self)
    }
}
