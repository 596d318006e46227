pub mod collector;
pub mod signal;

use std::time::Duration;

pub use collector::{StatsSnapshot, TargetStats};
pub use signal::{change_signal, ChangeListener, ChangeSignal};

/// The result of one poll, produced by a worker and folded into that
/// target's [`TargetStats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    /// Time until the response head arrived, or until the failure.
    pub duration: Duration,
    /// Body bytes read; 0 when the body could not be read.
    pub size: u64,
    /// Status in [200, 400) with no transport or body error.
    pub success: bool,
}

impl Outcome {
    pub fn new(duration: Duration, size: u64, success: bool) -> Self {
        Self {
            duration,
            size,
            success,
        }
    }

    /// A failed poll carries its elapsed time but no body.
    pub fn failure(duration: Duration) -> Self {
        Self::new(duration, 0, false)
    }
}
