//! Debounce for live search input.
//!
//! Each keystroke [`schedule`](SearchDebounce::schedule)s the current input and
//! restarts the delay. Only when the input has been quiet for the whole delay
//! does [`poll`](SearchDebounce::poll) hand the latest query back, once. The
//! caller supplies the clock, which keeps the type usable from any event loop
//! and deterministic under test.

use std::time::{Duration, Instant};

pub const DEFAULT_DELAY: Duration = Duration::from_millis(150);

#[derive(Debug, Clone)]
struct Pending {
    query: String,
    deadline: Instant,
}

#[derive(Debug, Clone)]
pub struct SearchDebounce {
    delay: Duration,
    pending: Option<Pending>,
}

impl Default for SearchDebounce {
    fn default() -> Self {
        Self::new(DEFAULT_DELAY)
    }
}

impl SearchDebounce {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Cancels any pending query and starts a new delay for `query`.
    pub fn schedule(&mut self, query: impl Into<String>, now: Instant) {
        self.pending = Some(Pending {
            query: query.into(),
            deadline: now + self.delay,
        });
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// When the pending query is due.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.deadline)
    }

    /// Returns the pending query if its deadline has passed, clearing it.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        let due = self.pending.as_ref().is_some_and(|p| now >= p.deadline);
        if due {
            self.pending.take().map(|p| p.query)
        } else {
            None
        }
    }
}
