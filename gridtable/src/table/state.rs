//! Shared grid state.
//!
//! `GridTable` is the geometry/width state every controller reads or
//! mutates: the auto-grow reconciler rewrites the width map, the shortcut
//! coordinator moves the cursor, scroll events update offsets, and the row
//! pipeline reads the derived models each time it materializes rows.

use std::ops::Range;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use crate::config::GridConfig;

use super::column::{ColumnDefinition, ColumnRenderModel, ColumnWindow, WidthMap};
use super::geometry::{self, VisibleSpan};
use super::row::GridRow;
use super::selection::{Selection, SelectionMode};

/// Unique identifier for a grid table instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridId(usize);

impl GridId {
    fn new() -> Self {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        Self(COUNTER.fetch_add(1, Ordering::SeqCst))
    }
}

impl std::fmt::Display for GridId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "grid_table_{}", self.0)
    }
}

#[derive(Debug)]
struct GridInner<R: GridRow> {
    config: GridConfig,
    /// Column definitions, in render order.
    columns: Vec<ColumnDefinition>,
    /// Current column widths.
    widths: WidthMap,
    /// Cached render models, recomputed when columns or widths change.
    models: Vec<ColumnRenderModel>,
    rows: Vec<R>,
    selection: Selection,
    selection_mode: SelectionMode,
    /// Focused row index.
    cursor: Option<usize>,
    /// Current sort state (column index, ascending). Stored only; the app
    /// sorts the data itself.
    sort: Option<(usize, bool)>,
    scroll_top: f64,
    scroll_left: f64,
    viewport_width: f64,
    viewport_height: f64,
    container_width: f64,
}

impl<R: GridRow> GridInner<R> {
    fn new(config: GridConfig, columns: Vec<ColumnDefinition>) -> Self {
        let mut inner = Self {
            config,
            columns,
            widths: WidthMap::new(),
            models: Vec::new(),
            rows: Vec::new(),
            selection: Selection::new(),
            selection_mode: SelectionMode::None,
            cursor: None,
            sort: None,
            scroll_top: 0.0,
            scroll_left: 0.0,
            viewport_width: 0.0,
            viewport_height: 0.0,
            container_width: 0.0,
        };
        inner.recompute_models();
        inner
    }

    fn recompute_models(&mut self) {
        self.models = geometry::render_models(
            &self.columns,
            &self.widths,
            self.config.default_column_width,
        );
    }

    fn total_width(&self) -> f64 {
        self.models.last().map(|m| m.end).unwrap_or(0.0)
    }

    fn total_height(&self) -> f64 {
        self.rows.len() as f64 * self.config.row_height
    }

    fn max_scroll_top(&self) -> f64 {
        (self.total_height() - self.viewport_height).max(0.0)
    }

    fn max_scroll_left(&self) -> f64 {
        (self.total_width() - self.viewport_width).max(0.0)
    }

    fn viewport_row_count(&self) -> usize {
        if self.config.row_height <= 0.0 {
            return 0;
        }
        (self.viewport_height / self.config.row_height).floor() as usize
    }

    fn visible_row_range(&self) -> Range<usize> {
        if self.rows.is_empty() || self.viewport_height <= 0.0 || self.config.row_height <= 0.0 {
            return 0..0;
        }
        let start = ((self.scroll_top / self.config.row_height).floor() as usize)
            .min(self.rows.len().saturating_sub(1));
        let count = (self.viewport_height / self.config.row_height).ceil() as usize + 1;
        let end = (start + count).min(self.rows.len());
        start..end
    }
}

/// Virtualized grid table state, shared across controllers.
///
/// Clones share the same underlying state, the way independent controllers
/// observe one view.
#[derive(Debug)]
pub struct GridTable<R: GridRow> {
    id: GridId,
    inner: Arc<RwLock<GridInner<R>>>,
    dirty: Arc<AtomicBool>,
}

impl<R: GridRow> GridTable<R> {
    /// Create a grid with the given configuration and column definitions.
    pub fn new(config: GridConfig, columns: Vec<ColumnDefinition>) -> Self {
        Self {
            id: GridId::new(),
            inner: Arc::new(RwLock::new(GridInner::new(config, columns))),
            dirty: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Get the unique ID.
    pub fn id(&self) -> GridId {
        self.id
    }

    /// Get the configuration.
    pub fn config(&self) -> GridConfig {
        self.inner
            .read()
            .map(|g| g.config.clone())
            .unwrap_or_default()
    }

    // -------------------------------------------------------------------------
    // Columns and widths
    // -------------------------------------------------------------------------

    /// Get the column definitions.
    pub fn columns(&self) -> Vec<ColumnDefinition> {
        self.inner
            .read()
            .map(|g| g.columns.clone())
            .unwrap_or_default()
    }

    /// Replace the column definitions. Resets horizontal scroll.
    pub fn set_columns(&self, columns: Vec<ColumnDefinition>) {
        if let Ok(mut guard) = self.inner.write() {
            guard.columns = columns;
            guard.scroll_left = 0.0;
            guard.recompute_models();
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.inner.read().map(|g| g.columns.len()).unwrap_or(0)
    }

    /// Get the current width map.
    pub fn widths(&self) -> WidthMap {
        self.inner
            .read()
            .map(|g| g.widths.clone())
            .unwrap_or_default()
    }

    /// Replace the whole width map (auto-grow redistribution).
    pub fn set_widths(&self, widths: WidthMap) {
        if let Ok(mut guard) = self.inner.write() {
            guard.widths = widths;
            guard.recompute_models();
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    /// Set one column's width (explicit user resize).
    pub fn set_width(&self, key: &str, width: f64) {
        if let Ok(mut guard) = self.inner.write() {
            guard.widths.set(key, width);
            guard.recompute_models();
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    /// Get the derived per-column render models.
    pub fn render_models(&self) -> Vec<ColumnRenderModel> {
        self.inner
            .read()
            .map(|g| g.models.clone())
            .unwrap_or_default()
    }

    /// Compute the current column window from scroll and viewport state.
    pub fn column_window(&self) -> ColumnWindow {
        self.inner
            .read()
            .map(|g| {
                geometry::column_window(
                    &g.models,
                    VisibleSpan::new(g.scroll_left, g.viewport_width),
                    g.config.overscan,
                    g.config.sticky_start,
                    g.config.sticky_end,
                    g.config.virtualize,
                )
            })
            .unwrap_or_else(|_| ColumnWindow::full(0))
    }

    /// Total content width (sum of column widths).
    pub fn total_width(&self) -> f64 {
        self.inner.read().map(|g| g.total_width()).unwrap_or(0.0)
    }

    /// Total content height (rows only).
    pub fn total_height(&self) -> f64 {
        self.inner.read().map(|g| g.total_height()).unwrap_or(0.0)
    }

    // -------------------------------------------------------------------------
    // Rows
    // -------------------------------------------------------------------------

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.inner.read().map(|g| g.rows.len()).unwrap_or(0)
    }

    /// Check if the grid has no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get a row by index.
    pub fn row(&self, index: usize) -> Option<R> {
        self.inner
            .read()
            .ok()
            .and_then(|g| g.rows.get(index).cloned())
    }

    /// Get the key of the row at `index`.
    pub fn row_key(&self, index: usize) -> Option<String> {
        self.inner
            .read()
            .ok()
            .and_then(|g| g.rows.get(index).map(|r| r.key()))
    }

    /// Replace all rows. Clamps the cursor and clears the selection.
    pub fn set_rows(&self, rows: Vec<R>) {
        if let Ok(mut guard) = self.inner.write() {
            guard.rows = rows;
            if let Some(cursor) = guard.cursor
                && cursor >= guard.rows.len()
            {
                guard.cursor = guard.rows.len().checked_sub(1);
            }
            guard.selection.clear();
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    /// Append rows (a pagination batch). Cursor and selection are kept.
    pub fn append_rows(&self, rows: Vec<R>) {
        if let Ok(mut guard) = self.inner.write() {
            guard.rows.extend(rows);
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    /// Remove all rows and reset cursor, selection and vertical scroll.
    pub fn clear(&self) {
        if let Ok(mut guard) = self.inner.write() {
            guard.rows.clear();
            guard.selection.clear();
            guard.cursor = None;
            guard.scroll_top = 0.0;
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    // -------------------------------------------------------------------------
    // Cursor (focused row)
    // -------------------------------------------------------------------------

    /// Get the cursor position.
    pub fn cursor(&self) -> Option<usize> {
        self.inner.read().ok().and_then(|g| g.cursor)
    }

    /// Whether the row at `index` is focused.
    pub fn is_focused_at(&self, index: usize) -> bool {
        self.cursor() == Some(index)
    }

    /// Set the cursor position. Returns the previous position.
    pub fn set_cursor(&self, index: usize) -> Option<usize> {
        if let Ok(mut guard) = self.inner.write() {
            let previous = guard.cursor;
            if index < guard.rows.len() && previous != Some(index) {
                guard.cursor = Some(index);
                self.dirty.store(true, Ordering::SeqCst);
            }
            return previous;
        }
        None
    }

    /// Move the cursor up one row. Returns `(previous, new)` if moved.
    /// An unset cursor lands on the first row.
    pub fn cursor_up(&self) -> Option<(Option<usize>, usize)> {
        self.move_cursor(|cursor, _len, _page| match cursor {
            Some(current) => current.checked_sub(1),
            None => Some(0),
        })
    }

    /// Move the cursor down one row. Returns `(previous, new)` if moved.
    /// An unset cursor lands on the first row.
    pub fn cursor_down(&self) -> Option<(Option<usize>, usize)> {
        self.move_cursor(|cursor, len, _page| match cursor {
            Some(current) => {
                let next = current + 1;
                (next < len).then_some(next)
            }
            None => Some(0),
        })
    }

    /// Move the cursor up by one viewport's worth of rows.
    pub fn cursor_page_up(&self) -> Option<(Option<usize>, usize)> {
        self.move_cursor(|cursor, _len, page| {
            let next = cursor.unwrap_or(0).saturating_sub(page.max(1));
            (cursor != Some(next)).then_some(next)
        })
    }

    /// Move the cursor down by one viewport's worth of rows.
    pub fn cursor_page_down(&self) -> Option<(Option<usize>, usize)> {
        self.move_cursor(|cursor, len, page| {
            let next = (cursor.unwrap_or(0) + page.max(1)).min(len - 1);
            (cursor != Some(next)).then_some(next)
        })
    }

    /// Move the cursor to the first row.
    pub fn cursor_first(&self) -> Option<(Option<usize>, usize)> {
        self.move_cursor(|cursor, _len, _page| (cursor != Some(0)).then_some(0))
    }

    /// Move the cursor to the last row.
    pub fn cursor_last(&self) -> Option<(Option<usize>, usize)> {
        self.move_cursor(|cursor, len, _page| {
            let last = len - 1;
            (cursor != Some(last)).then_some(last)
        })
    }

    fn move_cursor(
        &self,
        step: impl FnOnce(Option<usize>, usize, usize) -> Option<usize>,
    ) -> Option<(Option<usize>, usize)> {
        if let Ok(mut guard) = self.inner.write() {
            if guard.rows.is_empty() {
                return None;
            }
            let previous = guard.cursor;
            let new = step(previous, guard.rows.len(), guard.viewport_row_count())?;
            guard.cursor = Some(new);
            self.dirty.store(true, Ordering::SeqCst);
            return Some((previous, new));
        }
        None
    }

    /// Scroll the viewport so the cursor row is visible.
    pub fn scroll_to_cursor(&self) {
        if let Some(cursor) = self.cursor() {
            self.scroll_to_row(cursor);
        }
    }

    /// Scroll the viewport so the row at `index` is visible.
    pub fn scroll_to_row(&self, index: usize) {
        if let Ok(mut guard) = self.inner.write() {
            if index >= guard.rows.len() || guard.viewport_height <= 0.0 {
                return;
            }
            let row_top = index as f64 * guard.config.row_height;
            let row_bottom = row_top + guard.config.row_height;
            if row_top < guard.scroll_top {
                guard.scroll_top = row_top;
                self.dirty.store(true, Ordering::SeqCst);
            } else if row_bottom > guard.scroll_top + guard.viewport_height {
                guard.scroll_top = (row_bottom - guard.viewport_height).max(0.0);
                self.dirty.store(true, Ordering::SeqCst);
            }
        }
    }

    // -------------------------------------------------------------------------
    // Selection
    // -------------------------------------------------------------------------

    /// Get the selection mode.
    pub fn selection_mode(&self) -> SelectionMode {
        self.inner
            .read()
            .map(|g| g.selection_mode)
            .unwrap_or_default()
    }

    /// Set the selection mode. Leaving selection off clears it.
    pub fn set_selection_mode(&self, mode: SelectionMode) {
        if let Ok(mut guard) = self.inner.write() {
            guard.selection_mode = mode;
            if mode == SelectionMode::None {
                guard.selection.clear();
            }
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    /// Whether the row at `index` is selected.
    pub fn is_selected_at(&self, index: usize) -> bool {
        self.inner
            .read()
            .map(|g| {
                g.rows
                    .get(index)
                    .is_some_and(|row| g.selection.is_selected(&row.key()))
            })
            .unwrap_or(false)
    }

    /// Select the row at `index` according to the selection mode.
    /// Returns true if the selection changed.
    pub fn select_at(&self, index: usize) -> bool {
        if let Ok(mut guard) = self.inner.write() {
            let Some(key) = guard.rows.get(index).map(|r| r.key()) else {
                return false;
            };
            let changed = match guard.selection_mode {
                SelectionMode::None => false,
                SelectionMode::Single => guard.selection.select_only(&key),
                SelectionMode::Multi => {
                    guard.selection.toggle(&key);
                    true
                }
            };
            if changed {
                self.dirty.store(true, Ordering::SeqCst);
            }
            return changed;
        }
        false
    }

    /// All selected row keys.
    pub fn selected_keys(&self) -> Vec<String> {
        self.inner
            .read()
            .map(|g| g.selection.keys())
            .unwrap_or_default()
    }

    /// Clear the selection. Returns the keys that were selected.
    pub fn clear_selection(&self) -> Vec<String> {
        if let Ok(mut guard) = self.inner.write() {
            let removed = guard.selection.clear();
            if !removed.is_empty() {
                self.dirty.store(true, Ordering::SeqCst);
            }
            return removed;
        }
        Vec::new()
    }

    /// First row carrying a `selected` or `focused` marker, if any.
    pub fn first_marked_row(&self) -> Option<usize> {
        let guard = self.inner.read().ok()?;
        (0..guard.rows.len()).find(|&index| {
            guard.cursor == Some(index)
                || guard
                    .rows
                    .get(index)
                    .is_some_and(|row| guard.selection.is_selected(&row.key()))
        })
    }

    // -------------------------------------------------------------------------
    // Sorting
    // -------------------------------------------------------------------------

    /// Get the current sort state.
    pub fn sort(&self) -> Option<(usize, bool)> {
        self.inner.read().ok().and_then(|g| g.sort)
    }

    /// Store sort state for a sortable column. The app sorts the data and
    /// calls `set_rows` itself.
    pub fn set_sort(&self, column_index: usize, ascending: bool) {
        if let Ok(mut guard) = self.inner.write()
            && guard
                .columns
                .get(column_index)
                .is_some_and(|c| c.sortable)
        {
            guard.sort = Some((column_index, ascending));
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    /// Toggle sort for a column: same column flips direction, a new column
    /// starts ascending. Returns the new state.
    pub fn toggle_sort(&self, column_index: usize) -> Option<(usize, bool)> {
        if let Ok(mut guard) = self.inner.write()
            && guard
                .columns
                .get(column_index)
                .is_some_and(|c| c.sortable)
        {
            let new_sort = match guard.sort {
                Some((index, ascending)) if index == column_index => (column_index, !ascending),
                _ => (column_index, true),
            };
            guard.sort = Some(new_sort);
            self.dirty.store(true, Ordering::SeqCst);
            return Some(new_sort);
        }
        None
    }

    // -------------------------------------------------------------------------
    // Scroll and viewport
    // -------------------------------------------------------------------------

    /// Get the vertical scroll offset in pixels.
    pub fn scroll_top(&self) -> f64 {
        self.inner.read().map(|g| g.scroll_top).unwrap_or(0.0)
    }

    /// Get the horizontal scroll offset in pixels.
    pub fn scroll_left(&self) -> f64 {
        self.inner.read().map(|g| g.scroll_left).unwrap_or(0.0)
    }

    /// Set both scroll offsets, clamped to content bounds.
    pub fn set_scroll(&self, top: f64, left: f64) {
        if let Ok(mut guard) = self.inner.write() {
            let top = top.clamp(0.0, guard.max_scroll_top());
            let left = left.clamp(0.0, guard.max_scroll_left());
            if top != guard.scroll_top || left != guard.scroll_left {
                guard.scroll_top = top;
                guard.scroll_left = left;
                self.dirty.store(true, Ordering::SeqCst);
            }
        }
    }

    /// Set the viewport size in pixels, re-clamping scroll offsets.
    pub fn set_viewport(&self, width: f64, height: f64) {
        if let Ok(mut guard) = self.inner.write() {
            guard.viewport_width = width.max(0.0);
            guard.viewport_height = height.max(0.0);
            guard.scroll_top = guard.scroll_top.clamp(0.0, guard.max_scroll_top());
            guard.scroll_left = guard.scroll_left.clamp(0.0, guard.max_scroll_left());
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    /// Get the viewport width.
    pub fn viewport_width(&self) -> f64 {
        self.inner.read().map(|g| g.viewport_width).unwrap_or(0.0)
    }

    /// Get the viewport height.
    pub fn viewport_height(&self) -> f64 {
        self.inner.read().map(|g| g.viewport_height).unwrap_or(0.0)
    }

    /// Number of whole rows that fit in the viewport.
    pub fn viewport_row_count(&self) -> usize {
        self.inner.read().map(|g| g.viewport_row_count()).unwrap_or(0)
    }

    /// Get the container width used by the auto-grow reconciler.
    /// Zero means the container is not ready yet.
    pub fn container_width(&self) -> f64 {
        self.inner.read().map(|g| g.container_width).unwrap_or(0.0)
    }

    /// Record the container's current pixel width.
    pub fn set_container_width(&self, width: f64) {
        if let Ok(mut guard) = self.inner.write() {
            guard.container_width = width.max(0.0);
        }
    }

    /// Index range of rows intersecting the viewport.
    pub fn visible_row_range(&self) -> Range<usize> {
        self.inner
            .read()
            .map(|g| g.visible_row_range())
            .unwrap_or(0..0)
    }

    // -------------------------------------------------------------------------
    // Dirty tracking
    // -------------------------------------------------------------------------

    /// Check if the grid changed since the last render.
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    /// Clear the dirty flag after rendering.
    pub fn clear_dirty(&self) {
        self.dirty.store(false, Ordering::SeqCst);
    }
}

impl<R: GridRow> Clone for GridTable<R> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            inner: Arc::clone(&self.inner),
            dirty: Arc::clone(&self.dirty),
        }
    }
}
