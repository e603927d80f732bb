//! Fail-fast batch dispatch
//!
//! A batch is split into a fixed number of contiguous chunks, one per lane.
//! Every lane runs its chunk strictly in order against the shared connection,
//! and all lanes run concurrently. The first failing statement raises a
//! cancellation signal that every other lane checks before its next statement.

mod dispatcher;
mod lane;
mod partition;
mod signal;

pub use dispatcher::{DispatchPhase, DispatchSummary, Dispatcher, dispatch};
pub use lane::{LaneExecutor, LaneFailure, LaneOutcome};
pub use partition::{Chunk, chunk_size, partition};
pub use signal::{CancellationObserver, CancellationSignal};
