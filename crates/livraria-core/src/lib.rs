//! Livraria Core - domain model and policies for the book catalog
//!
//! - `Book` / `NewBook` catalog records with validation
//! - Snapshot naming and the keep-newest-N retention policy
//! - The `Snapshotter` seam used by the mutation guard
//! - Error facility (`ExError`) and logging facility shared by all crates
//! - `CatalogConfig`, built once at startup

pub mod clock;
pub mod config;
pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod policy;
pub mod retention;
pub mod snapshot;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::CatalogConfig;
pub use errors::{CatalogError, ExError, ExErrorKind, Result};
pub use model::{Book, NewBook, SnapshotOutcome, SnapshotRecord};
pub use policy::{FailingSnapshotter, SnapshotFailureMode, Snapshotter};
pub use retention::RetentionPolicy;
pub use snapshot::SnapshotName;
