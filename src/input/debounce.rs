//! Debounced input.
//!
//! This is the ONE place where timing enters the filter.
//! A quiet-interval deadline expires → the pending text is applied to the
//! pipeline → the graph propagates → the frontend redraws.
//!
//! There is a single pending slot. Scheduling replaces whatever is in it, so
//! the last input inside the quiet window always wins. The event loop asks
//! [`Debouncer::next_deadline`] how long it may block and calls
//! [`Debouncer::fire_due`] when it wakes; firing and cancelling are both
//! plain mutations of the slot on the loop's thread, so a cancelled update
//! can never run.

use std::time::{Duration, Instant};

use tracing::trace;

/// Identifies one scheduled update.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PendingToken(u64);

#[derive(Debug)]
struct Pending<T> {
    token: PendingToken,
    value: T,
    deadline: Instant,
}

/// Cancel-and-replace delay line for one value.
#[derive(Debug)]
pub struct Debouncer<T> {
    quiet_interval: Duration,
    pending: Option<Pending<T>>,
    next_token: u64,
}

impl<T> Debouncer<T> {
    pub fn new(quiet_interval: Duration) -> Self {
        Self {
            quiet_interval,
            pending: None,
            next_token: 0,
        }
    }

    pub fn quiet_interval(&self) -> Duration {
        self.quiet_interval
    }

    /// A zero interval means every input applies immediately.
    pub fn is_immediate(&self) -> bool {
        self.quiet_interval.is_zero()
    }

    /// Schedule `value` to fire at `now + quiet_interval`, replacing any
    /// pending value.
    pub fn schedule(&mut self, value: T, now: Instant) -> PendingToken {
        let token = PendingToken(self.next_token);
        self.next_token += 1;
        if let Some(replaced) = self.pending.replace(Pending {
            token,
            value,
            deadline: now + self.quiet_interval,
        }) {
            trace!(replaced = replaced.token.0, token = token.0, "debounce restarted");
        }
        token
    }

    /// Cancel the update identified by `token`.
    ///
    /// Returns false when that update already fired, was replaced or was
    /// cancelled before; none of those are errors.
    pub fn cancel(&mut self, token: PendingToken) -> bool {
        match &self.pending {
            Some(p) if p.token == token => {
                self.pending = None;
                true
            }
            _ => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending_token(&self) -> Option<PendingToken> {
        self.pending.as_ref().map(|p| p.token)
    }

    /// Time left until the pending update is due (`None` when idle).
    pub fn next_deadline(&self, now: Instant) -> Option<Duration> {
        self.pending
            .as_ref()
            .map(|p| p.deadline.saturating_duration_since(now))
    }

    /// Take the pending value if its deadline has passed.
    pub fn fire_due(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some(p) if p.deadline <= now => self.pending.take().map(|p| p.value),
            _ => None,
        }
    }

    /// Take the pending value regardless of its deadline.
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|p| p.value)
    }
}

// =============================================================================
// TESTS
// =============================================================================
