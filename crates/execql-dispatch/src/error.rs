//! Dispatch errors

use execql_core::ExecqlError;
use thiserror::Error;

pub type DispatchResult<T> = Result<T, DispatchError>;

/// Errors surfaced by a dispatch
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The caller asked for zero lanes. Raised before any lane starts.
    #[error("Lane count must be at least 1, got {0}")]
    InvalidLaneCount(usize),

    /// The remote service rejected a statement
    #[error("Statement failed on lane {lane}: {command}")]
    CommandFailed {
        lane: usize,
        command: String,
        #[source]
        source: ExecqlError,
    },

    /// A lane task ended without reporting an outcome
    #[error("Lane {lane} aborted: {reason}")]
    LaneAborted { lane: usize, reason: String },
}

impl DispatchError {
    /// Lane the error belongs to, if it came from a lane
    pub fn lane(&self) -> Option<usize> {
        match self {
            DispatchError::InvalidLaneCount(_) => None,
            DispatchError::CommandFailed { lane, .. } | DispatchError::LaneAborted { lane, .. } => {
                Some(*lane)
            }
        }
    }

    /// The failing statement, for command failures
    pub fn command(&self) -> Option<&str> {
        match self {
            DispatchError::CommandFailed { command, .. } => Some(command),
            _ => None,
        }
    }
}
