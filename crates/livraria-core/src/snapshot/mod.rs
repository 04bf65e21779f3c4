//! Snapshot naming
//!
//! Snapshot files are named after the wall-clock second they were taken in,
//! with a sequence suffix when several land in the same second. The scheme is
//! chosen so that lexicographic order of names equals creation order.

pub mod naming;

pub use naming::{SnapshotName, MAX_SEQUENCE, SNAPSHOT_EXTENSION, SNAPSHOT_PREFIX};
