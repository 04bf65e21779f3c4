//! Correlation id for a single catalog command
//!
//! Each command the CLI dispatches (menu option or subcommand) gets a fresh
//! `RequestId`; it is recorded on the command's tracing span and attached to
//! any `ExError` that escapes the command.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a single catalog command
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(String);

impl RequestId {
    /// Generate a new RequestId using UUIDv7 (time-ordered)
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Wrap an existing id string
    pub fn from_string(s: String) -> Self {
        Self(s)
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
