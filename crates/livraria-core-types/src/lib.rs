//! Core types shared across the livraria crates
//!
//! - **Correlation**: `RequestId` stamped on every command the CLI dispatches
//! - **Schema constants**: canonical log field keys and event names

pub mod correlation;
pub mod schema;

pub use correlation::RequestId;
