use std::sync::{Arc, Mutex};

use gridtable::frame::{ImmediateScheduler, ManualScheduler};
use gridtable::suppression::SuppressionGate;
use gridtable::table::{HoverSurface, HoverSync, RowTarget};

/// In-memory scroll container with a handful of realized rows.
#[derive(Default)]
struct StubSurface {
    container_top: Mutex<Option<f64>>,
    scroll_top: Mutex<f64>,
    scroll_left: Mutex<f64>,
    rows: Mutex<Vec<RowTarget>>,
    header_offsets: Mutex<Vec<f64>>,
}

impl StubSurface {
    fn mounted(rows: Vec<RowTarget>) -> Arc<Self> {
        let surface = Self::default();
        *surface.container_top.lock().unwrap() = Some(50.0);
        *surface.rows.lock().unwrap() = rows;
        Arc::new(surface)
    }

    fn set_rows(&self, rows: Vec<RowTarget>) {
        *self.rows.lock().unwrap() = rows;
    }

    fn set_scroll_left(&self, px: f64) {
        *self.scroll_left.lock().unwrap() = px;
    }

    fn recorded_header_offsets(&self) -> Vec<f64> {
        self.header_offsets.lock().unwrap().clone()
    }
}

impl HoverSurface for StubSurface {
    fn container_top(&self) -> Option<f64> {
        *self.container_top.lock().unwrap()
    }

    fn scroll_top(&self) -> f64 {
        *self.scroll_top.lock().unwrap()
    }

    fn scroll_left(&self) -> f64 {
        *self.scroll_left.lock().unwrap()
    }

    fn row_target(&self, index: usize) -> Option<RowTarget> {
        self.rows.lock().unwrap().get(index).copied()
    }

    fn row_count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    fn set_header_offset(&self, px: f64) {
        self.header_offsets.lock().unwrap().push(px);
    }
}

fn plain_row(top: f64) -> RowTarget {
    RowTarget {
        top,
        height: 28.0,
        selected: false,
        focused: false,
    }
}

fn controller(surface: Arc<StubSurface>) -> (HoverSync, SuppressionGate) {
    let gate = SuppressionGate::new();
    let hover = HoverSync::new(surface, Arc::new(ImmediateScheduler), gate.clone());
    (hover, gate)
}

#[test]
fn test_hover_geometry_is_container_relative() {
    let surface = StubSurface::mounted(vec![plain_row(106.0)]);
    *surface.scroll_top.lock().unwrap() = 84.0;
    let (hover, _gate) = controller(surface);

    hover.update_hover_for_row(Some(0));
    let state = hover.state();
    assert!(state.visible);
    // row top 106 - container top 50 + scroll top 84
    assert_eq!(state.top, 140.0);
    assert_eq!(state.height, 28.0);
}

#[test]
fn test_hover_clear_after_track_hides_overlay() {
    let surface = StubSurface::mounted(vec![plain_row(106.0)]);
    let (hover, _gate) = controller(surface);

    hover.update_hover_for_row(Some(0));
    assert!(hover.state().visible);

    hover.update_hover_for_row(None);
    assert!(!hover.state().visible);
    assert_eq!(hover.tracked_row(), None);

    // Clearing again is idempotent.
    hover.update_hover_for_row(None);
    assert!(!hover.state().visible);
}

#[test]
fn test_suppression_freezes_hover_state() {
    let surface = StubSurface::mounted(vec![plain_row(106.0), plain_row(134.0)]);
    let (hover, gate) = controller(surface);

    hover.update_hover_for_row(Some(0));
    let before = hover.state();

    gate.acquire();
    hover.update_hover_for_row(Some(1));
    assert_eq!(hover.state(), before);
    hover.update_hover_for_row(None);
    assert_eq!(hover.state(), before);
    assert_eq!(hover.tracked_row(), Some(0));

    gate.release();
    hover.update_hover_for_row(None);
    assert!(!hover.state().visible);
}

#[test]
fn test_sub_half_pixel_drift_is_skipped() {
    let surface = StubSurface::mounted(vec![plain_row(106.0)]);
    let (hover, _gate) = controller(Arc::clone(&surface));

    hover.update_hover_for_row(Some(0));
    let before = hover.state();

    surface.set_rows(vec![plain_row(106.4)]);
    hover.update_hover_for_row(Some(0));
    assert_eq!(hover.state(), before, "sub-half-pixel drift must not repaint");

    surface.set_rows(vec![plain_row(106.6)]);
    hover.update_hover_for_row(Some(0));
    assert_eq!(hover.state().top, 106.6 - 50.0);
}

#[test]
fn test_marker_change_updates_despite_same_geometry() {
    let surface = StubSurface::mounted(vec![plain_row(106.0)]);
    let (hover, _gate) = controller(Arc::clone(&surface));

    hover.update_hover_for_row(Some(0));
    assert!(!hover.state().selected);

    surface.set_rows(vec![RowTarget {
        selected: true,
        ..plain_row(106.0)
    }]);
    hover.update_hover_for_row(Some(0));
    assert!(hover.state().selected);
}

#[test]
fn test_mouse_leave_reanchors_to_marked_row() {
    let marked = RowTarget {
        focused: true,
        ..plain_row(106.0)
    };
    let surface = StubSurface::mounted(vec![marked, plain_row(134.0)]);
    let (hover, _gate) = controller(surface);

    hover.handle_row_mouse_enter(0);
    hover.handle_row_mouse_leave(Some(0));
    let state = hover.state();
    assert!(state.visible, "focused row keeps the overlay anchored");
    assert!(state.focused);

    hover.handle_row_mouse_enter(1);
    hover.handle_row_mouse_leave(Some(1));
    assert!(!hover.state().visible, "plain row hides the overlay on leave");
}

#[test]
fn test_row_set_change_reattaches_to_marked_row() {
    let surface = StubSurface::mounted(vec![plain_row(106.0), plain_row(134.0)]);
    let (hover, _gate) = controller(Arc::clone(&surface));

    hover.update_hover_for_row(Some(1));
    hover.update_hover_for_row(None);
    assert!(!hover.state().visible);

    // Window shift evicted the hovered row; a selected row remains.
    surface.set_rows(vec![
        plain_row(106.0),
        RowTarget {
            selected: true,
            ..plain_row(134.0)
        },
        plain_row(162.0),
    ]);
    hover.notify_rows_changed();

    let state = hover.state();
    assert!(state.visible);
    assert!(state.selected);
    assert_eq!(hover.tracked_row(), Some(1));
}

#[test]
fn test_row_set_change_without_marked_row_stays_hidden() {
    let surface = StubSurface::mounted(vec![plain_row(106.0)]);
    let (hover, _gate) = controller(Arc::clone(&surface));

    surface.set_rows(vec![plain_row(106.0), plain_row(134.0)]);
    hover.notify_rows_changed();
    assert!(!hover.state().visible);
}

#[test]
fn test_unmounted_container_is_a_silent_noop() {
    let surface = Arc::new(StubSurface::default());
    surface.set_rows(vec![plain_row(106.0)]);
    let (hover, _gate) = controller(surface);

    hover.update_hover_for_row(Some(0));
    assert!(!hover.state().visible);
}

#[test]
fn test_header_sync_flushes_are_coalesced() {
    let surface = StubSurface::mounted(vec![plain_row(106.0)]);
    surface.set_scroll_left(240.0);
    let scheduler = ManualScheduler::new();
    let gate = SuppressionGate::new();
    let hover = HoverSync::new(
        Arc::clone(&surface) as Arc<dyn HoverSurface>,
        Arc::new(scheduler.clone()),
        gate,
    );

    hover.schedule_header_sync();
    hover.schedule_header_sync();
    hover.schedule_header_sync();
    assert_eq!(scheduler.pending(), 1, "repeat requests coalesce");

    assert_eq!(scheduler.run_frame(), 1);
    assert_eq!(surface.recorded_header_offsets(), vec![240.0]);

    // The next frame can be scheduled again.
    surface.set_scroll_left(0.0);
    hover.schedule_header_sync();
    assert_eq!(scheduler.pending(), 1);
    scheduler.run_frame();
    assert_eq!(surface.recorded_header_offsets(), vec![240.0, 0.0]);
}

#[test]
fn test_flush_refreshes_tracked_row_geometry() {
    let surface = StubSurface::mounted(vec![plain_row(106.0)]);
    let scheduler = ManualScheduler::new();
    let gate = SuppressionGate::new();
    let hover = HoverSync::new(
        Arc::clone(&surface) as Arc<dyn HoverSurface>,
        Arc::new(scheduler.clone()),
        gate,
    );

    hover.update_hover_for_row(Some(0));
    assert_eq!(hover.state().top, 56.0);

    // Async layout shifted the row before the frame ran.
    surface.set_rows(vec![plain_row(120.0)]);
    hover.schedule_header_sync();
    scheduler.run_frame();
    assert_eq!(hover.state().top, 70.0);
}

#[test]
fn test_teardown_cancels_pending_flush() {
    let surface = StubSurface::mounted(vec![plain_row(106.0)]);
    let scheduler = ManualScheduler::new();
    let gate = SuppressionGate::new();
    let hover = HoverSync::new(
        Arc::clone(&surface) as Arc<dyn HoverSurface>,
        Arc::new(scheduler.clone()),
        gate,
    );

    hover.schedule_header_sync();
    hover.teardown();
    assert_eq!(scheduler.run_frame(), 0, "cancelled flush must not run");
    assert!(surface.recorded_header_offsets().is_empty());
}

#[test]
fn test_immediate_scheduler_runs_sync_without_deferral() {
    let surface = StubSurface::mounted(vec![plain_row(106.0)]);
    surface.set_scroll_left(64.0);
    let (hover, _gate) = controller(Arc::clone(&surface));

    hover.schedule_header_sync();
    assert_eq!(surface.recorded_header_offsets(), vec![64.0]);

    // And the controller is immediately schedulable again.
    hover.schedule_header_sync();
    assert_eq!(surface.recorded_header_offsets(), vec![64.0, 64.0]);
}
