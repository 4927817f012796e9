//! Pointer event plumbing for grid rows.

use crate::keybinds::Modifiers;

use super::row::GridRow;
use super::state::GridTable;

/// Result of handling an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    /// Event was ignored, try other handlers.
    Ignored,
    /// Event was consumed, stop propagation.
    Consumed,
}

impl EventResult {
    /// Check if the event was handled.
    pub fn is_handled(&self) -> bool {
        matches!(self, EventResult::Consumed)
    }
}

/// A pointer event in container-relative pixel coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct PointerEvent {
    /// Horizontal position.
    pub x: f64,
    /// Vertical position.
    pub y: f64,
    /// Modifier keys held.
    pub modifiers: Modifiers,
    propagation_stopped: bool,
}

impl PointerEvent {
    /// Create an event at the given position with no modifiers.
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            modifiers: Modifiers::NONE,
            propagation_stopped: false,
        }
    }

    /// Stop the event from reaching enclosing handlers.
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    /// Whether propagation was stopped.
    pub fn propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }
}

/// Row index under a viewport-relative y coordinate, if any.
pub fn row_index_at<R: GridRow>(table: &GridTable<R>, y: f64) -> Option<usize> {
    let row_height = table.config().row_height;
    if y < 0.0 || row_height <= 0.0 {
        return None;
    }
    let index = ((table.scroll_top() + y) / row_height).floor() as usize;
    (index < table.len()).then_some(index)
}

/// Dispatch a click on the row at `index`.
///
/// Propagation stops before the caller's callback runs, so an enclosing
/// surface never double-handles a row click. The callback receives
/// `(item, index, event)`.
pub fn dispatch_row_click<R: GridRow>(
    table: &GridTable<R>,
    index: usize,
    event: &mut PointerEvent,
    on_click: &dyn Fn(&R, usize, &PointerEvent),
) -> EventResult {
    let Some(row) = table.row(index) else {
        return EventResult::Ignored;
    };
    event.stop_propagation();
    on_click(&row, index, event);
    EventResult::Consumed
}
