//! Livraria Engine - orchestration layer
//!
//! Coordinates the catalog store and the snapshot store: every mutating
//! command passes through the `MutationGuard`, read-only commands go
//! straight to the repository.

pub mod commands;
pub mod guard;
pub mod session;

pub use guard::{Guarded, MutationGuard};
pub use session::CatalogSession;
