//! One-shot cancellation signal shared by the lanes of a dispatch

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Write side of the cancellation signal.
///
/// Created once per dispatch and held only by the dispatcher. Raising it is
/// permanent; there is no way to reset it.
#[derive(Debug, Default)]
pub struct CancellationSignal {
    raised: Arc<AtomicBool>,
}

impl CancellationSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the signal. Returns `true` if this call raised it.
    pub fn raise(&self) -> bool {
        !self.raised.swap(true, Ordering::AcqRel)
    }

    pub fn is_raised(&self) -> bool {
        self.raised.load(Ordering::Acquire)
    }

    /// Read-only view handed to a lane
    pub fn observer(&self) -> CancellationObserver {
        CancellationObserver {
            raised: self.raised.clone(),
        }
    }
}

/// Read side of the cancellation signal
#[derive(Debug, Clone)]
pub struct CancellationObserver {
    raised: Arc<AtomicBool>,
}

impl CancellationObserver {
    /// Non-blocking check
    pub fn is_cancelled(&self) -> bool {
        self.raised.load(Ordering::Acquire)
    }
}
