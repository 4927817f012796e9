//! Auto-grow column width reconciliation.
//!
//! On data or column changes, designated columns are re-measured against
//! their natural content width. Growth beyond half a pixel is recorded in
//! the width map and the remaining space is redistributed to fit the
//! container exactly. The redistribution policy itself is an injected
//! collaborator; only its fill-the-container contract matters here.

use std::sync::Arc;

use super::column::{ColumnDefinition, WidthMap};
use super::row::GridRow;
use super::state::GridTable;

/// Growth below this threshold is measurement noise and ignored.
const WIDTH_EPSILON: f64 = 0.5;

/// Measures a column's natural content width.
///
/// `None` means the measurement target is not available yet (not mounted
/// or zero-size); the reconciler retries on the next triggering change.
pub trait ColumnMeasurer: Send + Sync {
    /// Natural content width of the column, in pixels.
    fn measure(&self, column: &ColumnDefinition) -> Option<f64>;
}

/// Redistributes widths to exactly fill the container.
///
/// The returned map must sum to `container_width` (never overflow, never
/// leave a gap) while preserving manually-set non-auto-grow widths. The
/// allocation policy is the implementor's.
pub trait WidthAllocator: Send + Sync {
    /// Fit `widths` to `container_width`.
    fn allocate(&self, widths: &WidthMap, container_width: f64) -> WidthMap;
}

/// The auto-grow width reconciler.
pub struct AutoGrowReconciler {
    measurer: Arc<dyn ColumnMeasurer>,
    allocator: Arc<dyn WidthAllocator>,
    /// Designates which column keys auto-grow.
    is_auto_grow: Arc<dyn Fn(&str) -> bool + Send + Sync>,
    /// Reports newly measured natural widths for external sort/persist use.
    on_natural_width: Option<Arc<dyn Fn(&str, f64) + Send + Sync>>,
}

impl AutoGrowReconciler {
    /// Create a reconciler with the given collaborators.
    pub fn new(
        measurer: Arc<dyn ColumnMeasurer>,
        allocator: Arc<dyn WidthAllocator>,
        is_auto_grow: impl Fn(&str) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            measurer,
            allocator,
            is_auto_grow: Arc::new(is_auto_grow),
            on_natural_width: None,
        }
    }

    /// Attach a natural-width callback.
    pub fn with_natural_width_callback(
        mut self,
        callback: impl Fn(&str, f64) + Send + Sync + 'static,
    ) -> Self {
        self.on_natural_width = Some(Arc::new(callback));
        self
    }

    /// Run one reconciliation pass against the grid's current state.
    ///
    /// Invoked by the host after every commit that changes container
    /// readiness, row count, rendered columns or the width map. Returns
    /// true if the width map was redistributed.
    pub fn reconcile<R: GridRow>(&self, table: &GridTable<R>) -> bool {
        let container_width = table.container_width();
        if container_width <= 0.0 || table.is_empty() {
            return false;
        }

        let columns = table.columns();
        let window = table.column_window();
        let rendered: Vec<&ColumnDefinition> = window
            .indices()
            .filter_map(|index| columns.get(index))
            .collect();
        if !rendered.iter().any(|c| (self.is_auto_grow)(&c.key)) {
            return false;
        }

        let mut widths = table.widths();
        let mut grew = false;
        for column in rendered {
            if !(self.is_auto_grow)(&column.key) {
                continue;
            }
            let Some(measured) = self.measurer.measure(column) else {
                continue;
            };
            let current = widths
                .get(&column.key)
                .unwrap_or(table.config().default_column_width);
            if measured > current + WIDTH_EPSILON {
                log::debug!(
                    "column {:?} grew {current:.1}px -> {measured:.1}px",
                    column.key
                );
                widths.set(&column.key, measured);
                if let Some(callback) = &self.on_natural_width {
                    callback(&column.key, measured);
                }
                grew = true;
            }
        }
        if !grew {
            return false;
        }

        table.set_widths(self.allocator.allocate(&widths, container_width));
        true
    }
}

impl std::fmt::Debug for AutoGrowReconciler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AutoGrowReconciler").finish_non_exhaustive()
    }
}
