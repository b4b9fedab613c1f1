//! Cooperative cancellation for in-flight model requests.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

/// A cloneable flag that consumers poll between units of work.
///
/// Clones share state: cancelling any clone cancels them all. Nothing is interrupted
/// forcibly; the chat transport checks the flag before handing out each fragment.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Create a new token that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}
