//! Command orchestration layer.
//!
//! ## Logging Ownership
//!
//! Handlers here own lifecycle logging for catalog operations:
//! - `log_op_start!` at entry
//! - `log_op_end!` on success
//! - `log_op_error!` on failure
//!
//! Lower layers (store, core) use only `tracing::debug!()` for details.

pub mod backup;
pub mod catalog;
pub mod engine_command;
