use std::fmt;

/// Pipeline phase of a single attempt.
///
/// An attempt moves strictly forward:
///
/// ```text
/// Idle -> Capturing -> Preprocessing -> Extracting -> Querying -> Decided -> Idle
/// ```
///
/// `Decided` always returns to `Idle` once the result is reported;
/// there is no retry within an attempt. A rejected attempt requires
/// the caller to start a brand-new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Capturing,
    Preprocessing,
    Extracting,
    Querying,
    Decided,
}

impl Phase {
    /// The phase that follows this one.
    pub fn next(self) -> Phase {
        match self {
            Phase::Idle => Phase::Capturing,
            Phase::Capturing => Phase::Preprocessing,
            Phase::Preprocessing => Phase::Extracting,
            Phase::Extracting => Phase::Querying,
            Phase::Querying => Phase::Decided,
            Phase::Decided => Phase::Idle,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Idle => write!(f, "idle"),
            Phase::Capturing => write!(f, "capturing"),
            Phase::Preprocessing => write!(f, "preprocessing"),
            Phase::Extracting => write!(f, "extracting"),
            Phase::Querying => write!(f, "querying"),
            Phase::Decided => write!(f, "decided"),
        }
    }
}

/// Tracks an attempt's phase and logs every transition.
pub(crate) struct AttemptState {
    phase: Phase,
}

impl AttemptState {
    pub(crate) fn new() -> Self {
        Self { phase: Phase::Idle }
    }

    pub(crate) fn advance(&mut self) -> Phase {
        let next = self.phase.next();
        tracing::debug!(from = %self.phase, to = %next, "attempt phase");
        self.phase = next;
        next
    }
}

impl Drop for AttemptState {
    fn drop(&mut self) {
        // An attempt always ends Idle, whether it decided or faulted.
        if self.phase != Phase::Idle {
            tracing::debug!(from = %self.phase, to = %Phase::Idle, "attempt phase");
        }
    }
}
