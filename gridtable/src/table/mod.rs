//! The grid table: shared state, geometry, and its controllers.

pub mod autogrow;
pub mod column;
pub mod events;
pub mod geometry;
pub mod hover;
pub mod pagination;
pub mod row;
pub mod selection;
pub mod state;

pub use autogrow::{AutoGrowReconciler, ColumnMeasurer, WidthAllocator};
pub use column::{ColumnDefinition, ColumnRenderModel, ColumnWindow, WidthMap};
pub use events::{EventResult, PointerEvent, dispatch_row_click, row_index_at};
pub use geometry::{VisibleSpan, column_window, render_models, sticky_counts};
pub use hover::{HoverState, HoverSurface, HoverSync, RowTarget};
pub use pagination::{PageTrigger, PaginationController, PaginationStatus};
pub use row::{CellCache, CellContent, CellModel, GridRow, RowModel, build_row};
pub use selection::{Selection, SelectionMode};
pub use state::{GridId, GridTable};
