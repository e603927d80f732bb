//! Session configuration types

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for a shared session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Number of connections opened up front and shared by all callers
    num_conns: usize,
    /// Deadline for each statement in milliseconds (0 = no deadline)
    statement_timeout_ms: u64,
}

impl SessionConfig {
    /// Create a new session configuration with the given connection count
    ///
    /// # Panics
    ///
    /// Panics if `num_conns` is 0.
    pub fn new(num_conns: usize) -> Self {
        assert!(
            num_conns > 0,
            "num_conns must be greater than 0, got {}",
            num_conns
        );

        Self {
            num_conns,
            statement_timeout_ms: 60_000,
        }
    }

    /// Set the per-statement timeout in milliseconds
    pub fn with_statement_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.statement_timeout_ms = timeout_ms;
        self
    }

    /// Get the number of connections
    pub fn num_conns(&self) -> usize {
        self.num_conns
    }

    /// Get the per-statement timeout, if any
    pub fn statement_timeout(&self) -> Option<Duration> {
        (self.statement_timeout_ms > 0).then(|| Duration::from_millis(self.statement_timeout_ms))
    }
}

impl Default for SessionConfig {
    /// Defaults:
    /// - num_conns: 10
    /// - statement_timeout: 60 seconds
    fn default() -> Self {
        Self::new(10)
    }
}
