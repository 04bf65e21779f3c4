use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A snapshot file as seen in the snapshot directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotRecord {
    /// File name, e.g. `backup_livraria_2024-05-01_10-00-00.db`
    pub name: String,

    pub path: PathBuf,

    /// Wall-clock second the snapshot was taken, parsed back from `name`
    pub taken_at: NaiveDateTime,

    /// Same-second disambiguator; 0 for the first snapshot in a second
    pub sequence: u32,

    pub size_bytes: u64,
}

/// Result of one `create_snapshot` call: the new snapshot plus what retention evicted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotOutcome {
    pub created: SnapshotRecord,
    /// Evicted snapshots, oldest first
    pub pruned: Vec<SnapshotRecord>,
}
