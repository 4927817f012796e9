//! Hover overlay synchronization.
//!
//! Tracks which row the pointer is over, computes the overlay geometry
//! relative to the scroll container, and keeps the sticky header glued to
//! the body during horizontal scroll. Scheduled work is coalesced so a
//! burst of scroll events costs one geometry pass per repaint.
//!
//! While the process-wide suppression gate is held (keyboard navigation, a
//! context menu), every hover mutation freezes: state and tracked handle
//! stay as they are.

use std::sync::{Arc, RwLock};

use crate::frame::{FrameScheduler, FrameToken};
use crate::suppression::SuppressionGate;

/// Geometry updates smaller than this are invisible and skipped.
const GEOMETRY_EPSILON: f64 = 0.5;

/// Geometry and markers for one realized row, read from the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowTarget {
    /// Row top edge in the host's coordinate space.
    pub top: f64,
    /// Row height in pixels.
    pub height: f64,
    /// Row carries the selected marker.
    pub selected: bool,
    /// Row carries the focused marker.
    pub focused: bool,
}

/// Host-side view of the scroll container and its realized rows.
pub trait HoverSurface: Send + Sync {
    /// Container top edge in the host's coordinate space, or `None` while
    /// the container is not mounted.
    fn container_top(&self) -> Option<f64>;

    /// Current vertical scroll offset of the container.
    fn scroll_top(&self) -> f64;

    /// Current horizontal scroll offset of the container.
    fn scroll_left(&self) -> f64;

    /// Geometry and markers for the row at `index`, if it is realized.
    fn row_target(&self, index: usize) -> Option<RowTarget>;

    /// Current number of rows in the table.
    fn row_count(&self) -> usize;

    /// Apply a horizontal translation to the header's inner element.
    /// An offset of `0` resets the translation.
    fn set_header_offset(&self, px: f64);
}

/// Current overlay geometry and row flags, consumed by the paint layer.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HoverState {
    /// Whether the overlay is shown.
    pub visible: bool,
    /// Overlay top relative to the scroll container.
    pub top: f64,
    /// Overlay height.
    pub height: f64,
    /// Tracked row carries the selected marker.
    pub selected: bool,
    /// Tracked row carries the focused marker.
    pub focused: bool,
}

#[derive(Debug)]
struct HoverInner {
    state: HoverState,
    /// Index of the tracked row, if any.
    tracked: Option<usize>,
    /// A flush has been requested and not yet run.
    pending: bool,
    token: Option<FrameToken>,
    last_row_count: usize,
}

/// The hover synchronization controller. Clones share state.
pub struct HoverSync {
    inner: Arc<RwLock<HoverInner>>,
    surface: Arc<dyn HoverSurface>,
    scheduler: Arc<dyn FrameScheduler>,
    gate: SuppressionGate,
}

impl HoverSync {
    /// Create a controller over the given surface, scheduler and gate.
    pub fn new(
        surface: Arc<dyn HoverSurface>,
        scheduler: Arc<dyn FrameScheduler>,
        gate: SuppressionGate,
    ) -> Self {
        Self {
            inner: Arc::new(RwLock::new(HoverInner {
                state: HoverState::default(),
                tracked: None,
                pending: false,
                token: None,
                last_row_count: surface.row_count(),
            })),
            surface,
            scheduler,
            gate,
        }
    }

    /// Current overlay state.
    pub fn state(&self) -> HoverState {
        self.inner
            .read()
            .map(|g| g.state)
            .unwrap_or_default()
    }

    /// Index of the tracked row, if any.
    pub fn tracked_row(&self) -> Option<usize> {
        self.inner.read().ok().and_then(|g| g.tracked)
    }

    /// Point the overlay at a row, or clear it with `None`.
    ///
    /// No-op while suppression is active: state and tracked handle are
    /// frozen. Passing `None` hides the overlay only if it is visible
    /// (idempotent). Geometry changes under half a pixel with unchanged
    /// flags are skipped to avoid redundant repaints.
    pub fn update_hover_for_row(&self, row: Option<usize>) {
        if self.gate.is_active() {
            return;
        }
        let Some(index) = row else {
            if let Ok(mut guard) = self.inner.write() {
                guard.tracked = None;
                if guard.state.visible {
                    guard.state.visible = false;
                    log::trace!("hover overlay hidden");
                }
            }
            return;
        };

        // Not mounted yet or row not realized: retried on the next event.
        let Some(container_top) = self.surface.container_top() else {
            return;
        };
        let Some(target) = self.surface.row_target(index) else {
            return;
        };

        let top = target.top - container_top + self.surface.scroll_top();
        let height = target.height;
        if let Ok(mut guard) = self.inner.write() {
            let state = guard.state;
            if state.visible
                && (top - state.top).abs() < GEOMETRY_EPSILON
                && (height - state.height).abs() < GEOMETRY_EPSILON
                && state.selected == target.selected
                && state.focused == target.focused
            {
                guard.tracked = Some(index);
                return;
            }
            guard.tracked = Some(index);
            guard.state = HoverState {
                visible: true,
                top,
                height,
                selected: target.selected,
                focused: target.focused,
            };
        }
    }

    /// Pointer entered a row.
    pub fn handle_row_mouse_enter(&self, index: usize) {
        if self.gate.is_active() {
            return;
        }
        self.update_hover_for_row(Some(index));
    }

    /// Pointer left a row.
    ///
    /// A selected or focused row keeps the overlay anchored to it instead
    /// of hiding, so persistently-marked rows stay highlighted.
    pub fn handle_row_mouse_leave(&self, index: Option<usize>) {
        if self.gate.is_active() {
            return;
        }
        if let Some(index) = index
            && let Some(target) = self.surface.row_target(index)
            && (target.selected || target.focused)
        {
            self.update_hover_for_row(Some(index));
            return;
        }
        self.update_hover_for_row(None);
    }

    /// React to a row-set length change.
    ///
    /// When the overlay is hidden and the window shift evicted the row it
    /// was tracking, reattach to the first row still carrying a selected
    /// or focused marker.
    pub fn notify_rows_changed(&self) {
        let count = self.surface.row_count();
        let reattach = match self.inner.write() {
            Ok(mut guard) => {
                let changed = count != guard.last_row_count;
                guard.last_row_count = count;
                changed && !guard.state.visible
            }
            Err(_) => false,
        };
        if !reattach {
            return;
        }
        for index in 0..count {
            if let Some(target) = self.surface.row_target(index)
                && (target.selected || target.focused)
            {
                self.update_hover_for_row(Some(index));
                return;
            }
        }
    }

    /// Align the header with the container's horizontal scroll, now.
    pub fn sync_header_now(&self) {
        self.surface.set_header_offset(self.surface.scroll_left());
    }

    /// Request a header/hover sync before the next repaint.
    ///
    /// At most one flush is pending at a time; further calls while one is
    /// pending are no-ops. The flush realigns the header and, if a row is
    /// tracked and suppression is inactive, refreshes its overlay geometry
    /// (layout drift from async changes).
    pub fn schedule_header_sync(&self) {
        {
            let Ok(mut guard) = self.inner.write() else {
                return;
            };
            if guard.pending {
                return;
            }
            guard.pending = true;
        }
        let this = self.clone();
        let token = self.scheduler.schedule(Box::new(move || this.flush()));
        // With a synchronous scheduler the flush already ran and cleared
        // the pending flag; only keep the token while it is still live.
        if let Ok(mut guard) = self.inner.write()
            && guard.pending
        {
            guard.token = Some(token);
        }
    }

    fn flush(&self) {
        if let Ok(mut guard) = self.inner.write() {
            guard.pending = false;
            guard.token = None;
        }
        self.sync_header_now();
        let tracked = self.tracked_row();
        if let Some(index) = tracked
            && !self.gate.is_active()
        {
            self.update_hover_for_row(Some(index));
        }
    }

    /// Cancel any pending flush. Call on disposal so a scheduled callback
    /// never acts on stale state.
    pub fn teardown(&self) {
        let token = match self.inner.write() {
            Ok(mut guard) => {
                guard.pending = false;
                guard.token.take()
            }
            Err(_) => None,
        };
        if let Some(token) = token {
            self.scheduler.cancel(token);
        }
    }
}

impl Clone for HoverSync {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            surface: Arc::clone(&self.surface),
            scheduler: Arc::clone(&self.scheduler),
            gate: self.gate.clone(),
        }
    }
}

impl std::fmt::Debug for HoverSync {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HoverSync").field("state", &self.state()).finish()
    }
}
