//! Concurrent lane dispatcher

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use execql_core::Connection;
use serde::Serialize;
use tokio::task::JoinSet;

use super::lane::{LaneExecutor, LaneFailure, LaneOutcome};
use super::partition::partition;
use super::signal::CancellationSignal;
use crate::error::{DispatchError, DispatchResult};

/// Phases a single dispatch call moves through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DispatchPhase {
    Idle,
    Partitioning,
    Running,
    /// A lane failed; waiting for the others to stop
    Draining,
    FinishedWithError,
    FinishedSuccess,
}

impl fmt::Display for DispatchPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DispatchPhase::Idle => "idle",
            DispatchPhase::Partitioning => "partitioning",
            DispatchPhase::Running => "running",
            DispatchPhase::Draining => "draining",
            DispatchPhase::FinishedWithError => "finished-with-error",
            DispatchPhase::FinishedSuccess => "finished-success",
        };
        f.write_str(name)
    }
}

/// What a successful dispatch did
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DispatchSummary {
    /// Number of lanes that ran
    pub lanes: usize,
    /// Statements executed across all lanes
    pub executed: usize,
    /// Blank statements skipped across all lanes
    pub skipped: usize,
    /// Wall-clock time of the whole dispatch
    pub elapsed: Duration,
}

/// Runs a batch over a fixed number of concurrent lanes.
///
/// When several lanes fail at about the same time, the failure that reaches
/// the dispatcher first is surfaced and the rest are logged and dropped.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    lanes: usize,
}

impl Dispatcher {
    pub fn new(lanes: usize) -> Self {
        Self { lanes }
    }

    pub fn lanes(&self) -> usize {
        self.lanes
    }

    /// Execute `commands` over the configured lanes.
    ///
    /// Returns only after every lane has finished, whether or not one failed.
    /// Dropping the returned future aborts every lane still running.
    #[tracing::instrument(
        name = "dispatch",
        skip(self, commands, connection),
        fields(lanes = self.lanes, statements = commands.len())
    )]
    pub async fn dispatch(
        &self,
        commands: Vec<String>,
        connection: Arc<dyn Connection>,
    ) -> DispatchResult<DispatchSummary> {
        let started = Instant::now();
        let mut phase = DispatchPhase::Idle;

        if self.lanes == 0 {
            tracing::error!(%phase, "rejecting dispatch with zero lanes");
            return Err(DispatchError::InvalidLaneCount(self.lanes));
        }

        phase = advance(phase, DispatchPhase::Partitioning);
        let chunks = partition(commands, self.lanes);

        let signal = CancellationSignal::new();
        phase = advance(phase, DispatchPhase::Running);

        let mut running = JoinSet::new();
        let mut task_lanes = HashMap::with_capacity(chunks.len());
        for chunk in chunks {
            let lane = chunk.lane;
            let executor = LaneExecutor::new(connection.clone(), signal.observer());
            let handle = running.spawn(async move { executor.run(chunk).await });
            task_lanes.insert(handle.id(), lane);
        }

        let mut surfaced: Option<DispatchError> = None;
        let mut executed = 0;
        let mut skipped = 0;

        while let Some(joined) = running.join_next().await {
            let failure = match joined {
                Ok(LaneOutcome::Completed {
                    executed: done,
                    skipped: blank,
                    ..
                }) => {
                    executed += done;
                    skipped += blank;
                    continue;
                }
                Ok(LaneOutcome::Cancelled { executed: done, .. }) => {
                    executed += done;
                    continue;
                }
                Ok(LaneOutcome::Failed(LaneFailure {
                    lane,
                    command,
                    source,
                })) => DispatchError::CommandFailed {
                    lane,
                    command,
                    source,
                },
                Err(e) => DispatchError::LaneAborted {
                    lane: task_lanes.get(&e.id()).copied().unwrap_or_default(),
                    reason: e.to_string(),
                },
            };

            if surfaced.is_some() {
                tracing::warn!(error = %failure, "additional lane failure discarded");
                continue;
            }

            tracing::error!(error = %failure, "lane failed, cancelling remaining lanes");
            signal.raise();
            phase = advance(phase, DispatchPhase::Draining);
            surfaced = Some(failure);
        }

        let elapsed = started.elapsed();
        match surfaced {
            Some(error) => {
                advance(phase, DispatchPhase::FinishedWithError);
                Err(error)
            }
            None => {
                advance(phase, DispatchPhase::FinishedSuccess);
                tracing::info!(
                    executed,
                    skipped,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "all lanes completed"
                );
                Ok(DispatchSummary {
                    lanes: self.lanes,
                    executed,
                    skipped,
                    elapsed,
                })
            }
        }
    }
}

fn advance(from: DispatchPhase, to: DispatchPhase) -> DispatchPhase {
    tracing::debug!(%from, %to, "dispatch phase");
    to
}

/// Execute `commands` over `lanes` concurrent lanes sharing `connection`.
///
/// Shorthand for `Dispatcher::new(lanes).dispatch(commands, connection)`.
pub async fn dispatch(
    commands: Vec<String>,
    lanes: usize,
    connection: Arc<dyn Connection>,
) -> DispatchResult<DispatchSummary> {
    Dispatcher::new(lanes).dispatch(commands, connection).await
}
