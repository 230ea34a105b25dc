//! Single-flight gate for token refresh.
//!
//! # Design
//! - At most one refresh runs process-wide; every caller that finds one in
//!   flight parks on a FIFO queue instead of starting a second attempt.
//! - The leader settles the gate exactly once and every parked caller
//!   observes the same outcome.
//! - The gate is reset on logout so a stale in-flight flag cannot outlive
//!   the session that created it.

use futures::channel::oneshot;
use std::cell::RefCell;
use std::rc::Rc;

/// Terminal refresh failure shared with every queued caller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RefreshError {
    /// Human-readable failure description.
    pub message: String,
}

impl RefreshError {
    /// Build an error from any displayable cause.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for RefreshError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "token refresh failed: {}", self.message)
    }
}

/// Outcome fanned out to all waiters: the new token or the shared error.
pub type RefreshOutcome = Result<String, RefreshError>;

/// Role assigned to a caller entering the gate.
pub enum GateEntry {
    /// Caller must run the refresh and settle the gate.
    Leader,
    /// Caller waits for the leader's outcome.
    Follower(oneshot::Receiver<RefreshOutcome>),
}

#[derive(Default)]
struct GateInner {
    in_flight: bool,
    waiters: Vec<oneshot::Sender<RefreshOutcome>>,
}

/// Shared single-flight refresh coordinator.
#[derive(Clone, Default)]
pub struct RefreshGate {
    inner: Rc<RefCell<GateInner>>,
}

impl RefreshGate {
    /// Create an idle gate.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a refresh is currently in flight.
    #[must_use]
    pub fn in_flight(&self) -> bool {
        self.inner.borrow().in_flight
    }

    /// Enter the gate: become the leader or park behind the current one.
    #[must_use]
    pub fn enter(&self) -> GateEntry {
        let mut inner = self.inner.borrow_mut();
        if inner.in_flight {
            let (tx, rx) = oneshot::channel();
            inner.waiters.push(tx);
            GateEntry::Follower(rx)
        } else {
            inner.in_flight = true;
            GateEntry::Leader
        }
    }

    /// Settle the gate, fanning the outcome out to every parked caller.
    ///
    /// Only the leader calls this; it releases the in-flight flag.
    pub fn settle(&self, outcome: &RefreshOutcome) {
        let waiters = {
            let mut inner = self.inner.borrow_mut();
            inner.in_flight = false;
            std::mem::take(&mut inner.waiters)
        };
        for waiter in waiters {
            let _ = waiter.send(outcome.clone());
        }
    }

    /// Reject all waiters and clear the flag; used on logout.
    pub fn reset(&self) {
        self.settle(&Err(RefreshError::new("session cleared")));
    }
}

/// Await a follower's shared outcome; a dropped leader counts as failure.
pub async fn wait(receiver: oneshot::Receiver<RefreshOutcome>) -> RefreshOutcome {
    match receiver.await {
        Ok(outcome) => outcome,
        Err(_) => Err(RefreshError::new("refresh abandoned")),
    }
}
