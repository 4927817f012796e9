//! Frame-scheduled callback coalescing.
//!
//! Controllers defer repaint-coupled work (header alignment, hover geometry
//! refresh) to the next frame through a [`FrameScheduler`]. The trait keeps
//! the at-most-one-pending behavior testable without a real rendering
//! surface: a host with a repaint loop drives [`ManualScheduler::run_frame`]
//! once per frame, and a host without one falls back to
//! [`ImmediateScheduler`], which runs callbacks synchronously.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// A deferred unit of work.
pub type FrameCallback = Box<dyn FnOnce() + Send>;

/// Handle to a scheduled callback, used for cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameToken(u64);

static NEXT_TOKEN: AtomicU64 = AtomicU64::new(1);

fn next_token() -> FrameToken {
    FrameToken(NEXT_TOKEN.fetch_add(1, Ordering::Relaxed))
}

/// Defers a callback until the next visual repaint.
///
/// Implementations must run each scheduled callback at most once;
/// `cancel` with a token whose callback already ran is a no-op.
pub trait FrameScheduler: Send + Sync {
    /// Schedule a callback to run before the next repaint.
    fn schedule(&self, callback: FrameCallback) -> FrameToken;

    /// Cancel a previously scheduled callback.
    fn cancel(&self, token: FrameToken);
}

/// Fallback scheduler that runs callbacks synchronously.
///
/// Used when the platform offers no deferral facility: sync work happens
/// immediately instead of before the next repaint, which keeps the view
/// correct at the cost of coalescing.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImmediateScheduler;

impl FrameScheduler for ImmediateScheduler {
    fn schedule(&self, callback: FrameCallback) -> FrameToken {
        let token = next_token();
        callback();
        token
    }

    fn cancel(&self, _token: FrameToken) {}
}

/// Scheduler that queues callbacks until the host runs a frame.
///
/// The host calls [`run_frame`](ManualScheduler::run_frame) once per
/// repaint; everything scheduled since the previous frame runs then, in
/// scheduling order. Also serves as the synchronous stub for tests.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    pending: Arc<Mutex<Vec<(FrameToken, FrameCallback)>>>,
}

impl ManualScheduler {
    /// Create an empty scheduler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of callbacks waiting for the next frame.
    pub fn pending(&self) -> usize {
        self.pending.lock().map(|queue| queue.len()).unwrap_or(0)
    }

    /// Run all pending callbacks. Returns how many ran.
    ///
    /// Callbacks scheduled *during* the frame run on the next frame.
    pub fn run_frame(&self) -> usize {
        let drained: Vec<(FrameToken, FrameCallback)> = match self.pending.lock() {
            Ok(mut queue) => queue.drain(..).collect(),
            Err(_) => return 0,
        };
        let count = drained.len();
        for (_, callback) in drained {
            callback();
        }
        count
    }
}

impl std::fmt::Debug for ManualScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManualScheduler")
            .field("pending", &self.pending())
            .finish()
    }
}

impl FrameScheduler for ManualScheduler {
    fn schedule(&self, callback: FrameCallback) -> FrameToken {
        let token = next_token();
        if let Ok(mut queue) = self.pending.lock() {
            queue.push((token, callback));
        }
        token
    }

    fn cancel(&self, token: FrameToken) {
        if let Ok(mut queue) = self.pending.lock() {
            queue.retain(|(t, _)| *t != token);
        }
    }
}
