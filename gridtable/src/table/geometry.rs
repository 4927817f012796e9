//! Pure column geometry: offsets and windowing.
//!
//! These functions derive everything from their arguments (no widget
//! state), so the windowing behavior is testable without a view.

use super::column::{ColumnDefinition, ColumnRenderModel, ColumnWindow, WidthMap};

/// The visible horizontal pixel span of the scroll container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibleSpan {
    /// Left edge (the container's horizontal scroll offset).
    pub start: f64,
    /// Right edge (`start + viewport width`).
    pub end: f64,
}

impl VisibleSpan {
    /// Span from a scroll offset and viewport width.
    pub fn new(scroll_left: f64, viewport_width: f64) -> Self {
        Self {
            start: scroll_left,
            end: scroll_left + viewport_width.max(0.0),
        }
    }
}

/// Compute cumulative offsets for the given column order and widths.
///
/// A column key missing from the width map falls back to `default_width`;
/// the invariant is that every rendered key has an entry, so the fallback
/// is logged.
pub fn render_models(
    columns: &[ColumnDefinition],
    widths: &WidthMap,
    default_width: f64,
) -> Vec<ColumnRenderModel> {
    let mut models = Vec::with_capacity(columns.len());
    let mut offset = 0.0;
    for column in columns {
        let width = match widths.get(&column.key) {
            Some(width) => width,
            None => {
                log::warn!(
                    "column {:?} has no width entry, falling back to {default_width}px",
                    column.key
                );
                default_width
            }
        };
        let start = offset;
        offset += width;
        models.push(ColumnRenderModel {
            key: column.key.clone(),
            start,
            end: offset,
            width,
            class: column.class.clone(),
        });
    }
    models
}

/// Derive sticky column counts from a fixed-column predicate.
///
/// Fixed columns pin to the edges: the leading run of columns matching the
/// predicate becomes the sticky-start count and the trailing run the
/// sticky-end count. A fixed column in the middle of the order is not
/// pinnable and is ignored.
pub fn sticky_counts(
    columns: &[ColumnDefinition],
    is_fixed: impl Fn(&str) -> bool,
) -> (usize, usize) {
    let start = columns
        .iter()
        .take_while(|column| is_fixed(&column.key))
        .count();
    let end = columns[start..]
        .iter()
        .rev()
        .take_while(|column| is_fixed(&column.key))
        .count();
    (start, end)
}

/// Compute the column window for a visible span.
///
/// A non-sticky column is included when its `[start, end)` interval
/// intersects `[span.start − overscan, span.end + overscan)`; a column
/// exactly at either boundary is included. The sticky-start and sticky-end
/// sets are always realized regardless of offset. With virtualization
/// disabled the window covers every column.
pub fn column_window(
    models: &[ColumnRenderModel],
    span: VisibleSpan,
    overscan: f64,
    sticky_start: usize,
    sticky_end: usize,
    virtualize: bool,
) -> ColumnWindow {
    let count = models.len();
    if !virtualize || count == 0 {
        return ColumnWindow::full(count);
    }

    let lo = span.start - overscan;
    let hi = span.end + overscan;
    let sticky_end = sticky_end.min(count.saturating_sub(sticky_start));
    let middle = sticky_start..count - sticky_end;

    let mut bounds: Option<(usize, usize)> = None;
    for index in middle {
        let model = &models[index];
        if model.end >= lo && model.start <= hi {
            bounds = match bounds {
                None => Some((index, index)),
                Some((start, _)) => Some((start, index)),
            };
        }
    }

    ColumnWindow::new(bounds, sticky_start, sticky_end, count)
}
