//! Core types for execql

use serde::{Deserialize, Serialize};

/// Result of a single statement sent to the remote service
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementResult {
    /// Rows affected, when the backend reports them
    pub affected_rows: u64,
}

impl StatementResult {
    pub fn new(affected_rows: u64) -> Self {
        Self { affected_rows }
    }
}
