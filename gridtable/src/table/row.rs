//! Row materialization: producing only the visually necessary cells.
//!
//! The pipeline takes the column window computed by the geometry model and
//! turns a data item into a [`RowModel`] carrying positioned cells and the
//! `selected`/`focused` markers external queries rely on. Cell content
//! comes from a cache keyed by `(row key, column key)` so repeated renders
//! avoid recomputation.

use std::collections::HashMap;

use super::column::{ColumnRenderModel, ColumnWindow};
use super::state::GridTable;

/// Trait for items displayable as grid rows.
pub trait GridRow: Clone + Send + Sync + 'static {
    /// Unique key, stable across re-renders for the same logical row.
    fn key(&self) -> String;

    /// Produce the cell content for the given column.
    fn cell(&self, column_key: &str) -> CellContent;
}

/// Rendered cell payload: display content plus its plain-text extraction.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CellContent {
    /// Display content (markup or rich text, host-interpreted).
    pub content: String,
    /// Plain text used for measurement, search and titles.
    pub text: String,
}

impl CellContent {
    /// Content whose display form and text form are the same.
    pub fn text(value: impl Into<String>) -> Self {
        let text = value.into();
        Self {
            content: text.clone(),
            text,
        }
    }
}

/// Cache of cell content keyed by `(row key, column key)`.
#[derive(Debug, Default)]
pub struct CellCache {
    entries: HashMap<(String, String), CellContent>,
}

impl CellCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the cached content for a cell, computing it on a miss.
    pub fn get_or_insert_with(
        &mut self,
        row_key: &str,
        column_key: &str,
        compute: impl FnOnce() -> CellContent,
    ) -> CellContent {
        self.entries
            .entry((row_key.to_string(), column_key.to_string()))
            .or_insert_with(compute)
            .clone()
    }

    /// Drop all entries for a row (call when its data changed).
    pub fn invalidate_row(&mut self, row_key: &str) {
        self.entries.retain(|(row, _), _| row != row_key);
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of cached cells.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A realized cell with its precomputed inline position.
#[derive(Debug, Clone, PartialEq)]
pub struct CellModel {
    /// Column key.
    pub key: String,
    /// Left offset in pixels.
    pub start: f64,
    /// Width in pixels.
    pub width: f64,
    /// Style class from the column definition.
    pub class: Option<String>,
    /// Cached cell payload.
    pub content: CellContent,
}

/// A realized row: only the cells the window admits, in definition order.
#[derive(Debug, Clone, PartialEq)]
pub struct RowModel {
    /// Stable row key.
    pub key: String,
    /// Row index in the data sequence.
    pub index: usize,
    /// Row carries the selected marker.
    pub selected: bool,
    /// Row carries the focused marker.
    pub focused: bool,
    /// Realized cells.
    pub cells: Vec<CellModel>,
}

/// Materialize one row against the current column window.
///
/// Cells outside the window and sticky sets are not produced; the ones
/// that are keep the definition order. No reordering happens in either
/// mode.
pub fn build_row<R: GridRow>(
    row: &R,
    index: usize,
    selected: bool,
    focused: bool,
    models: &[ColumnRenderModel],
    window: &ColumnWindow,
    cache: &mut CellCache,
) -> RowModel {
    let row_key = row.key();
    let mut cells = Vec::new();
    for column_index in window.indices() {
        let Some(model) = models.get(column_index) else {
            break;
        };
        let content = cache.get_or_insert_with(&row_key, &model.key, || row.cell(&model.key));
        cells.push(CellModel {
            key: model.key.clone(),
            start: model.start,
            width: model.width,
            class: model.class.clone(),
            content,
        });
    }
    RowModel {
        key: row_key,
        index,
        selected,
        focused,
        cells,
    }
}

impl<R: GridRow> GridTable<R> {
    /// Materialize the rows in the current visible range.
    pub fn build_rows(&self, cache: &mut CellCache) -> Vec<RowModel> {
        let models = self.render_models();
        let window = self.column_window();
        let range = self.visible_row_range();
        let mut rows = Vec::with_capacity(range.len());
        for index in range {
            let Some(row) = self.row(index) else {
                break;
            };
            rows.push(build_row(
                &row,
                index,
                self.is_selected_at(index),
                self.is_focused_at(index),
                &models,
                &window,
                cache,
            ));
        }
        rows
    }
}
