//! Infinite pagination triggering.
//!
//! Decides when to request more rows: automatically when the host reports
//! the sentinel intersecting the scrollable ancestor's trigger zone, or
//! manually from a button. A local in-flight guard covers the gap between
//! firing the request callback and the caller acknowledging it by flipping
//! `is_requesting_more`; without it, a second observation or click in that
//! gap would fire a duplicate request.

use std::sync::{Arc, RwLock};

/// What initiated a pagination request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageTrigger {
    /// The user pressed the load-more control.
    Manual,
    /// The sentinel became visible.
    Auto,
}

/// Derived pagination status for the footer label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginationStatus {
    /// Pagination disabled or no rows yet; nothing to show.
    Hidden,
    /// A request is outstanding.
    Loading,
    /// More rows may exist.
    MoreAvailable,
    /// All rows are loaded.
    Exhausted,
}

impl PaginationStatus {
    /// The status label.
    pub fn label(&self) -> &'static str {
        match self {
            PaginationStatus::Hidden => "",
            PaginationStatus::Loading => "loading",
            PaginationStatus::MoreAvailable => "more available",
            PaginationStatus::Exhausted => "exhausted",
        }
    }
}

#[derive(Debug)]
struct PageInner {
    enabled: bool,
    has_more: bool,
    is_requesting_more: bool,
    row_count: usize,
    /// Guards the gap between trigger and acknowledgment.
    in_flight: bool,
    margin: f64,
}

/// The pagination trigger controller. Clones share state.
pub struct PaginationController {
    inner: Arc<RwLock<PageInner>>,
    on_request_more: Arc<dyn Fn(PageTrigger) + Send + Sync>,
}

impl PaginationController {
    /// Create a controller.
    ///
    /// `margin` is the symmetric pixel margin the host applies to sentinel
    /// visibility observation, extending the trigger zone beyond the
    /// visible edges so rows are requested before the user reaches the
    /// true bottom.
    pub fn new(
        enabled: bool,
        margin: f64,
        on_request_more: impl Fn(PageTrigger) + Send + Sync + 'static,
    ) -> Self {
        Self {
            inner: Arc::new(RwLock::new(PageInner {
                enabled,
                has_more: false,
                is_requesting_more: false,
                row_count: 0,
                in_flight: false,
                margin: margin.max(0.0),
            })),
            on_request_more: Arc::new(on_request_more),
        }
    }

    /// Push the caller's current pagination props.
    ///
    /// Flipping `is_requesting_more` to true acknowledges the last trigger
    /// and releases the local guard; the guard only protects the gap
    /// between trigger and acknowledgment, not the request lifetime.
    pub fn sync(&self, has_more: bool, is_requesting_more: bool, row_count: usize) {
        if let Ok(mut guard) = self.inner.write() {
            guard.has_more = has_more;
            guard.row_count = row_count;
            if is_requesting_more && !guard.is_requesting_more {
                guard.in_flight = false;
            }
            guard.is_requesting_more = is_requesting_more;
        }
    }

    /// Request more rows.
    ///
    /// No-op unless pagination is enabled, more rows may exist, no request
    /// is outstanding and none is already in flight.
    pub fn handle_request_more(&self, trigger: PageTrigger) {
        let fire = match self.inner.write() {
            Ok(mut guard) => {
                if guard.enabled
                    && guard.has_more
                    && !guard.is_requesting_more
                    && !guard.in_flight
                {
                    guard.in_flight = true;
                    true
                } else {
                    false
                }
            }
            Err(_) => false,
        };
        if fire {
            log::debug!("pagination request fired ({trigger:?})");
            // Outside the lock: the callback may call back into sync().
            (self.on_request_more)(trigger);
        }
    }

    /// The host's visibility observer reported a sentinel transition.
    /// Any intersecting observation fires an automatic request.
    pub fn sentinel_visibility(&self, intersecting: bool) {
        if intersecting {
            self.handle_request_more(PageTrigger::Auto);
        }
    }

    /// Whether the sentinel should be rendered (only while more rows may
    /// exist and pagination is on).
    pub fn show_sentinel(&self) -> bool {
        self.inner
            .read()
            .map(|g| g.enabled && g.has_more)
            .unwrap_or(false)
    }

    /// The observation margin the host applies to the sentinel.
    pub fn margin(&self) -> f64 {
        self.inner.read().map(|g| g.margin).unwrap_or(0.0)
    }

    /// Whether a request is currently held by the local guard.
    pub fn is_in_flight(&self) -> bool {
        self.inner.read().map(|g| g.in_flight).unwrap_or(false)
    }

    /// Derived status for the footer label.
    pub fn status(&self) -> PaginationStatus {
        let Ok(guard) = self.inner.read() else {
            return PaginationStatus::Hidden;
        };
        if !guard.enabled || guard.row_count == 0 {
            PaginationStatus::Hidden
        } else if guard.is_requesting_more || guard.in_flight {
            PaginationStatus::Loading
        } else if guard.has_more {
            PaginationStatus::MoreAvailable
        } else {
            PaginationStatus::Exhausted
        }
    }
}

impl Clone for PaginationController {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            on_request_more: Arc::clone(&self.on_request_more),
        }
    }
}

impl std::fmt::Debug for PaginationController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaginationController")
            .field("status", &self.status())
            .finish()
    }
}
