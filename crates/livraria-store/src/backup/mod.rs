//! Snapshot store for the live catalog database
//!
//! Provides:
//! - Byte-for-byte snapshots through temp file + rename
//! - Timestamped, same-second-disambiguated names
//! - Retention pruning right after every snapshot

mod atomic;
mod fs_store;

pub use fs_store::BackupStore;
