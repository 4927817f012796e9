//! Interaction and virtualization engine for large record tables.
//!
//! Keeps the visual illusion of a full table (continuous scrolling, a
//! synced header, a hover/selection overlay, infinite pagination, adaptive
//! column sizing and keyboard navigation) while only a bounded window of
//! rows and columns is ever realized. Headless: geometry is pixels,
//! platform facilities (repaint scheduling, visibility observation, width
//! measurement) are injected by the hosting view.

pub mod config;
pub mod frame;
pub mod keybinds;
pub mod keys;
pub mod registry;
pub mod shortcuts;
pub mod suppression;
pub mod table;

pub mod prelude {
    pub use crate::config::{ConfigError, GridConfig};
    pub use crate::frame::{FrameScheduler, FrameToken, ImmediateScheduler, ManualScheduler};
    pub use crate::keybinds::{Key, KeyCombo, Modifiers};
    pub use crate::keys::cluster_scoped_key;
    pub use crate::registry::ViewRegistry;
    pub use crate::shortcuts::{
        Shortcut, ShortcutAction, ShortcutContexts, ShortcutCoordinator, default_shortcuts,
    };
    pub use crate::suppression::SuppressionGate;
    pub use crate::table::{
        AutoGrowReconciler, CellCache, CellContent, ColumnDefinition, ColumnMeasurer,
        ColumnRenderModel, ColumnWindow, EventResult, GridRow, GridTable, HoverState,
        HoverSurface, HoverSync, PageTrigger, PaginationController, PaginationStatus,
        PointerEvent, RowModel, RowTarget, Selection, SelectionMode, VisibleSpan, WidthAllocator,
        WidthMap,
    };
}
