use chrono::{NaiveDateTime, Timelike};

use crate::errors::{CatalogError, Result};

pub const SNAPSHOT_PREFIX: &str = "backup_livraria_";
pub const SNAPSHOT_EXTENSION: &str = "db";

/// Timestamp layout embedded in snapshot names (zero-padded, sorts chronologically)
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Highest same-second sequence suffix; keeps the suffix at three digits
pub const MAX_SEQUENCE: u32 = 999;

const TIMESTAMP_LEN: usize = 19;

/// Parsed form of a snapshot file name
///
/// - `backup_livraria_2024-05-01_10-00-00.db` (sequence 0)
/// - `backup_livraria_2024-05-01_10-00-00_001.db` (sequence 1)
///
/// `'.'` sorts before `'_'`, so the unsuffixed name precedes its suffixed
/// siblings and the derived `Ord` agrees with string order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SnapshotName {
    taken_at: NaiveDateTime,
    sequence: u32,
}

impl SnapshotName {
    /// Name for the first snapshot taken in the second containing `taken_at`
    pub fn first_in_second(taken_at: NaiveDateTime) -> Self {
        Self {
            taken_at: taken_at.with_nanosecond(0).unwrap_or(taken_at),
            sequence: 0,
        }
    }

    /// The next free name within the same second, if the suffix space allows
    pub fn next_in_second(&self) -> Option<Self> {
        (self.sequence < MAX_SEQUENCE).then(|| Self {
            taken_at: self.taken_at,
            sequence: self.sequence + 1,
        })
    }

    pub fn taken_at(&self) -> NaiveDateTime {
        self.taken_at
    }

    pub fn sequence(&self) -> u32 {
        self.sequence
    }

    /// Render the file name
    pub fn file_name(&self) -> String {
        let stamp = self.taken_at.format(TIMESTAMP_FORMAT);
        if self.sequence == 0 {
            format!("{}{}.{}", SNAPSHOT_PREFIX, stamp, SNAPSHOT_EXTENSION)
        } else {
            format!(
                "{}{}_{:03}.{}",
                SNAPSHOT_PREFIX, stamp, self.sequence, SNAPSHOT_EXTENSION
            )
        }
    }

    /// Parse a file name produced by `file_name`
    ///
    /// # Errors
    ///
    /// `MalformedSnapshotName` for anything that would not render back to
    /// the same string.
    pub fn parse(name: &str) -> Result<Self> {
        let malformed = || CatalogError::MalformedSnapshotName {
            name: name.to_string(),
        };

        let stem = name
            .strip_prefix(SNAPSHOT_PREFIX)
            .and_then(|rest| rest.strip_suffix(SNAPSHOT_EXTENSION))
            .and_then(|rest| rest.strip_suffix('.'))
            .ok_or_else(malformed)?;

        if stem.len() < TIMESTAMP_LEN || !stem.is_char_boundary(TIMESTAMP_LEN) {
            return Err(malformed());
        }
        let (stamp, suffix) = stem.split_at(TIMESTAMP_LEN);

        let taken_at =
            NaiveDateTime::parse_from_str(stamp, TIMESTAMP_FORMAT).map_err(|_| malformed())?;

        let sequence = match suffix {
            "" => 0,
            _ => suffix
                .strip_prefix('_')
                .filter(|digits| digits.len() == 3 && digits.bytes().all(|b| b.is_ascii_digit()))
                .and_then(|digits| digits.parse::<u32>().ok())
                .filter(|seq| *seq > 0)
                .ok_or_else(malformed)?,
        };

        Ok(Self { taken_at, sequence })
    }

    /// True when `name` follows the snapshot naming scheme
    pub fn is_snapshot_name(name: &str) -> bool {
        Self::parse(name).is_ok()
    }
}

impl std::fmt::Display for SnapshotName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.file_name())
    }
}
