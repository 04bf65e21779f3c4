//! Snapshot retention policy
//!
//! Pure decision logic: given the names currently in the snapshot directory,
//! decide which ones to delete. No filesystem access happens here; the
//! snapshot store performs the deletions in the order returned.

use crate::errors::{CatalogError, Result};

/// Number of snapshots kept when nothing else is configured
pub const DEFAULT_RETENTION_LIMIT: usize = 5;

/// Keep-the-newest-N retention
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionPolicy {
    limit: usize,
}

impl RetentionPolicy {
    /// # Errors
    ///
    /// `InvalidRetentionLimit` when `limit` is zero; a snapshot taken right
    /// before a mutation must survive its own prune.
    pub fn new(limit: usize) -> Result<Self> {
        if limit == 0 {
            return Err(CatalogError::InvalidRetentionLimit { limit });
        }
        Ok(Self { limit })
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Names to delete, oldest first
    ///
    /// Names are ordered lexicographically, which is chronological for the
    /// zero-padded snapshot naming scheme. Identical names count once. Every
    /// name beyond the newest `limit` is returned.
    pub fn select_evictions<S: AsRef<str>>(&self, names: &[S]) -> Vec<String> {
        let mut ordered: Vec<&str> = names.iter().map(AsRef::as_ref).collect();
        ordered.sort_unstable();
        ordered.dedup();

        let excess = ordered.len().saturating_sub(self.limit);
        ordered[..excess].iter().map(|s| s.to_string()).collect()
    }
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self {
            limit: DEFAULT_RETENTION_LIMIT,
        }
    }
}
