//! Sequential execution of one lane

use std::sync::Arc;

use execql_core::{Connection, ExecqlError};

use super::partition::Chunk;
use super::signal::CancellationObserver;

/// A statement the remote service rejected, with the lane that sent it
#[derive(Debug)]
pub struct LaneFailure {
    pub lane: usize,
    pub command: String,
    pub source: ExecqlError,
}

/// How a lane finished
#[derive(Debug)]
pub enum LaneOutcome {
    /// Every statement of the chunk executed
    Completed {
        lane: usize,
        executed: usize,
        skipped: usize,
    },
    /// The lane saw the cancellation signal before its next statement
    Cancelled { lane: usize, executed: usize },
    /// A statement failed; the rest of the chunk was not sent
    Failed(LaneFailure),
}

impl LaneOutcome {
    pub fn lane(&self) -> usize {
        match self {
            LaneOutcome::Completed { lane, .. } | LaneOutcome::Cancelled { lane, .. } => *lane,
            LaneOutcome::Failed(failure) => failure.lane,
        }
    }

    /// Statements this lane got a successful reply for
    pub fn executed(&self) -> usize {
        match self {
            LaneOutcome::Completed { executed, .. } | LaneOutcome::Cancelled { executed, .. } => {
                *executed
            }
            LaneOutcome::Failed(_) => 0,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, LaneOutcome::Completed { .. })
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, LaneOutcome::Cancelled { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, LaneOutcome::Failed(_))
    }
}

/// Runs one chunk against the shared connection.
///
/// The executor only reads the cancellation signal; raising it is the
/// dispatcher's job.
pub struct LaneExecutor {
    connection: Arc<dyn Connection>,
    observer: CancellationObserver,
}

impl LaneExecutor {
    pub fn new(connection: Arc<dyn Connection>, observer: CancellationObserver) -> Self {
        Self {
            connection,
            observer,
        }
    }

    /// Execute the chunk's statements in order.
    ///
    /// The signal is checked before every statement, including the first.
    /// Blank statements are skipped without reaching the connection. The
    /// first failure ends the lane.
    #[tracing::instrument(name = "lane", skip(self, chunk), fields(lane = chunk.lane))]
    pub async fn run(&self, chunk: Chunk) -> LaneOutcome {
        let lane = chunk.lane;
        tracing::info!(statements = chunk.len(), "lane started");

        let mut executed = 0;
        let mut skipped = 0;
        for command in chunk.commands {
            if self.observer.is_cancelled() {
                tracing::info!(executed, "lane cancelled");
                return LaneOutcome::Cancelled { lane, executed };
            }

            let statement = command.trim();
            if statement.is_empty() {
                skipped += 1;
                continue;
            }

            tracing::debug!(statement, "executing statement");
            if let Err(source) = self.connection.execute(statement).await {
                tracing::debug!(error = %source, statement, "statement failed");
                return LaneOutcome::Failed(LaneFailure {
                    lane,
                    command: statement.to_string(),
                    source,
                });
            }
            executed += 1;
        }

        tracing::info!(executed, skipped, "lane completed");
        LaneOutcome::Completed {
            lane,
            executed,
            skipped,
        }
    }
}
