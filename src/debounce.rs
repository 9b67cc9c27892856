//! Trailing-edge debouncer with caller-supplied time.

use std::time::{Duration, Instant};

/// Quiet period before a debounced save runs.
pub const PERSIST_QUIET: Duration = Duration::from_millis(200);

/// Quiet period before a debounced grid resize runs.
pub const RESIZE_QUIET: Duration = Duration::from_millis(100);

/// Coalesces a burst of triggers into a single action that becomes due once
/// no trigger has arrived for `quiet`.
#[derive(Debug, Clone)]
pub struct Debouncer {
    quiet: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            deadline: None,
        }
    }

    /// Records a trigger at `now`, pushing the deadline back.
    pub fn trigger(&mut self, now: Instant) {
        self.deadline = Some(now + self.quiet);
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Returns true exactly once when the quiet period has elapsed.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Returns true and clears the trigger if one is pending, regardless of time.
    pub fn flush(&mut self) -> bool {
        self.deadline.take().is_some()
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }
}
