//! Process-wide hover suppression gate.
//!
//! Any number of independent table instances can hold the gate without
//! knowing about each other; hover overlay updates are skipped while the
//! refcount is above zero. Each holder tracks whether it currently holds
//! the gate and releases exactly once, including on teardown. The count
//! is never re-synced from the outside.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};

/// Clone-able handle to a shared suppression refcount.
///
/// [`SuppressionGate::global`] returns the process-wide gate shared by all
/// tables; `new` creates an isolated gate for tests or embedded use.
#[derive(Debug, Clone, Default)]
pub struct SuppressionGate {
    count: Arc<AtomicUsize>,
}

impl SuppressionGate {
    /// Create an isolated gate with no holders.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide gate.
    pub fn global() -> SuppressionGate {
        static GLOBAL: OnceLock<SuppressionGate> = OnceLock::new();
        GLOBAL.get_or_init(SuppressionGate::new).clone()
    }

    /// Increment the refcount.
    pub fn acquire(&self) {
        self.count.fetch_add(1, Ordering::SeqCst);
    }

    /// Decrement the refcount, flooring at zero.
    ///
    /// A release without a matching acquire indicates a holder that lost
    /// track of its own state; the count stays at zero.
    pub fn release(&self) {
        let result = self
            .count
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
        if result.is_err() {
            log::warn!("suppression gate released with no holders");
        }
    }

    /// Whether hover updates are currently suppressed.
    pub fn is_active(&self) -> bool {
        self.count.load(Ordering::SeqCst) > 0
    }

    /// Current number of holders.
    pub fn holders(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}
