//! Cooperative cancellation: shared cancel tokens and the single-job policy.
//!
//! The hash loop polls its token at chunk boundaries; whoever holds a clone
//! (UI thread, signal handler) can set it at any time. The token is the only
//! state mutated from outside the hashing thread.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Shareable cancellation flag for one hash job.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Safe from any thread; the loop observes it at
    /// the next chunk boundary.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Tracks the one active hash job. Policy: starting a new job while another
/// is active cancels the previous one; there is never more than one live
/// token handed out by `begin`.
#[derive(Debug, Default)]
pub struct JobControl {
    active: Mutex<Option<CancelToken>>,
}

impl JobControl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new job, cancelling any job still registered. Returns the
    /// token to pass into the hash loop.
    pub fn begin(&self) -> CancelToken {
        let mut slot = self.active.lock().unwrap();
        if let Some(prev) = slot.take() {
            tracing::debug!("cancelling previous job before starting a new one");
            prev.cancel();
        }
        let token = CancelToken::new();
        *slot = Some(token.clone());
        token
    }

    /// Request cancellation of the active job, if any (e.g. from a Ctrl-C
    /// handler).
    pub fn cancel_active(&self) {
        if let Some(token) = self.active.lock().unwrap().as_ref() {
            token.cancel();
        }
    }

    /// Clear the slot once the job has finished (success, cancel or error).
    pub fn finish(&self) {
        self.active.lock().unwrap().take();
    }
}
