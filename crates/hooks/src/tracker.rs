//! Lifecycle tracking for asynchronous hooks
//!
//! Every background hook holds a [`PendingGuard`] for as long as its process
//! may still be running. The guard is handed out only when the concurrency
//! ceiling allows it, and dropping it is the one place the pending count is
//! decremented. Because the decision to start and the increment happen under
//! the same lock, the ceiling can never be overshot by racing callers.

use std::sync::{Arc, Condvar, LazyLock, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

static GLOBAL: LazyLock<Arc<PendingHooks>> = LazyLock::new(|| Arc::new(PendingHooks::new()));

#[derive(Debug, Default)]
struct PendingState {
    pending: usize,
    accepted: u64,
    rejected: u64,
}

/// Counter of in-flight asynchronous hooks
#[derive(Debug, Default)]
pub struct PendingHooks {
    state: Mutex<PendingState>,
    drained: Condvar,
}

impl PendingHooks {
    /// Create an empty tracker
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide tracker used by the CLI
    #[must_use]
    pub fn global() -> Arc<Self> {
        Arc::clone(&GLOBAL)
    }

    fn lock(&self) -> MutexGuard<'_, PendingState> {
        // A panicking watcher must not wedge every later dispatch
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Reserve a slot for one background hook
    ///
    /// Returns `None` when `max` hooks are already pending. The caller must
    /// keep the guard alive until the hook's process has been reaped.
    pub fn try_acquire(self: &Arc<Self>, max: usize) -> Option<PendingGuard> {
        let mut state = self.lock();
        if state.pending >= max {
            state.rejected += 1;
            tracing::debug!(
                pending = state.pending,
                max,
                "Concurrency limit reached"
            );
            return None;
        }
        state.pending += 1;
        state.accepted += 1;
        drop(state);

        Some(PendingGuard {
            tracker: Arc::clone(self),
        })
    }

    /// Number of hooks currently pending
    #[must_use]
    pub fn pending(&self) -> usize {
        self.lock().pending
    }

    /// Total hooks accepted since creation (or the last reset)
    #[must_use]
    pub fn accepted(&self) -> u64 {
        self.lock().accepted
    }

    /// Total hooks rejected by the concurrency ceiling
    #[must_use]
    pub fn rejected(&self) -> u64 {
        self.lock().rejected
    }

    /// Block until no hook is pending
    ///
    /// Returns immediately when nothing is pending. Every watcher finishes
    /// within its timeout, so this always returns eventually.
    pub fn wait(&self) {
        let state = self.lock();
        let _state = self
            .drained
            .wait_while(state, |s| s.pending > 0)
            .unwrap_or_else(PoisonError::into_inner);
    }

    /// Block until no hook is pending or `timeout` elapses
    ///
    /// Returns `true` when the tracker drained in time.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut state = self.lock();
        while state.pending > 0 {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return false;
            }
            state = self
                .drained
                .wait_timeout(state, remaining)
                .unwrap_or_else(PoisonError::into_inner)
                .0;
        }
        true
    }

    /// Clear the counters between tests
    ///
    /// # Panics
    ///
    /// Panics if any hook is still pending; tests must drain first.
    pub fn reset_for_testing(&self) {
        let mut state = self.lock();
        assert_eq!(
            state.pending, 0,
            "reset_for_testing called with {} hook(s) still pending",
            state.pending
        );
        *state = PendingState::default();
    }

    fn release(&self) {
        let mut state = self.lock();
        assert!(state.pending > 0, "pending hook count underflow");
        state.pending -= 1;
        if state.pending == 0 {
            self.drained.notify_all();
        }
    }
}

/// Slot held by one running background hook
///
/// Dropping the guard marks the hook as finished.
#[derive(Debug)]
#[must_use = "dropping the guard immediately releases the slot"]
pub struct PendingGuard {
    tracker: Arc<PendingHooks>,
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        self.tracker.release();
    }
}
