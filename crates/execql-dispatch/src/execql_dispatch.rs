//! execql Dispatch - Concurrent, fail-fast execution of statement batches
//!
//! Statements are read from a file, split into a fixed number of contiguous
//! lanes and executed lane by lane against one shared connection. The first
//! failing statement stops every other lane at its next statement boundary.

pub mod batch;
mod error;
pub mod source;

pub use batch::{
    CancellationObserver, CancellationSignal, Chunk, DispatchPhase, DispatchSummary, Dispatcher,
    LaneExecutor, LaneFailure, LaneOutcome, chunk_size, dispatch, partition,
};
pub use error::{DispatchError, DispatchResult};
pub use source::{read_statements, split_statements};
