pub mod book;
pub mod snapshot;

pub use book::{Book, NewBook};
pub use snapshot::{SnapshotOutcome, SnapshotRecord};
