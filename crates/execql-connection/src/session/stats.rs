//! Session statistics types

use serde::{Deserialize, Serialize};

/// Counters describing what a session has done so far
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    /// Connections held by the session
    connections: usize,
    /// Statements that completed successfully
    executed: u64,
    /// Statements rejected by the remote service
    failed: u64,
    /// Statements that hit the per-statement deadline
    timed_out: u64,
}

impl SessionStats {
    pub fn new(connections: usize, executed: u64, failed: u64, timed_out: u64) -> Self {
        Self {
            connections,
            executed,
            failed,
            timed_out,
        }
    }

    pub fn connections(&self) -> usize {
        self.connections
    }

    pub fn executed(&self) -> u64 {
        self.executed
    }

    pub fn failed(&self) -> u64 {
        self.failed
    }

    pub fn timed_out(&self) -> u64 {
        self.timed_out
    }

    /// Total statements sent, whatever their result
    pub fn attempted(&self) -> u64 {
        self.executed + self.failed + self.timed_out
    }
}
