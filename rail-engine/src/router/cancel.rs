//! Cooperative cancellation for in-flight queries (spec.md §5 "Suspension
//! points": "the router checks a cancellation token at each heap-pop").
//!
//! Built on `tokio::sync::watch` rather than a bespoke `AtomicBool`: a
//! `watch` channel gives a cheaply cloneable receiver with no polling, the
//! same primitive family (`tokio::sync`) the teacher already depends on for
//! its own shared state.

use tokio::sync::watch;

/// Read-only handle a [`crate::router::search::Router`] polls between label
/// pops. Cloning is cheap; every clone observes the same cancellation.
#[derive(Debug, Clone)]
pub struct CancellationToken {
    cancelled: watch::Receiver<bool>,
}

/// The write side, held by whoever may need to cancel an in-flight query
/// (e.g. a dropped HTTP connection in the `web` facade).
#[derive(Debug)]
pub struct CancellationHandle {
    cancelled: watch::Sender<bool>,
}

/// Creates a linked handle/token pair, starting in the not-cancelled state.
pub fn cancellation_pair() -> (CancellationHandle, CancellationToken) {
    let (tx, rx) = watch::channel(false);
    (CancellationHandle { cancelled: tx }, CancellationToken { cancelled: rx })
}

impl CancellationHandle {
    /// Signals cancellation. Idempotent; further calls are no-ops once the
    /// channel has no receivers left.
    pub fn cancel(&self) {
        let _ = self.cancelled.send(true);
    }
}

impl CancellationToken {
    /// A token that never cancels, for callers (tests, the synchronous CLI
    /// path) with no cancellation source of their own.
    pub fn never() -> Self {
        cancellation_pair().1
    }

    pub fn is_cancelled(&self) -> bool {
        *self.cancelled.borrow()
    }
}
