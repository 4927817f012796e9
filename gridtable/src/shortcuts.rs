//! Keyboard shortcut context and hover suppression coordination.
//!
//! While a grid is the active interaction surface it holds a
//! priority-scoped entry on the shared shortcut context stack; only the
//! top context receives keys. Activation transitions are edge-triggered:
//! repeated commits with unchanged activation push and pop nothing, and
//! teardown while active pops exactly once.
//!
//! Hover suppression is held while shortcuts are active or a context menu
//! is visible, tracked with a local flag so each coordinator releases at
//! most once, including on drop.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock, RwLock};

use crate::keybinds::{Key, KeyCombo};
use crate::suppression::SuppressionGate;
use crate::table::events::EventResult;
use crate::table::row::GridRow;
use crate::table::state::GridTable;

/// Identifies one pushed shortcut context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContextId(usize);

impl ContextId {
    fn new() -> Self {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        Self(COUNTER.fetch_add(1, Ordering::SeqCst))
    }
}

/// Shared stack of active keyboard surfaces. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct ShortcutContexts {
    stack: Arc<RwLock<Vec<(ContextId, i32)>>>,
}

impl ShortcutContexts {
    /// Create an empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide stack.
    pub fn global() -> ShortcutContexts {
        static GLOBAL: OnceLock<ShortcutContexts> = OnceLock::new();
        GLOBAL.get_or_init(ShortcutContexts::new).clone()
    }

    /// Push a context with the given priority. Returns its id.
    pub fn push(&self, priority: i32) -> ContextId {
        let id = ContextId::new();
        if let Ok(mut stack) = self.stack.write() {
            stack.push((id, priority));
        }
        id
    }

    /// Remove a context. Returns true if it was present.
    pub fn pop(&self, id: ContextId) -> bool {
        if let Ok(mut stack) = self.stack.write() {
            let before = stack.len();
            stack.retain(|(entry, _)| *entry != id);
            return stack.len() != before;
        }
        false
    }

    /// The context currently receiving keys: highest priority, most
    /// recently pushed on a tie.
    pub fn top(&self) -> Option<ContextId> {
        let stack = self.stack.read().ok()?;
        stack
            .iter()
            .enumerate()
            .max_by_key(|&(position, &(_, priority))| (priority, position))
            .map(|(_, (id, _))| *id)
    }

    /// Number of active contexts.
    pub fn len(&self) -> usize {
        self.stack.read().map(|stack| stack.len()).unwrap_or(0)
    }

    /// Check if no contexts are active.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// What a grid shortcut does when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    /// Move the cursor down one row.
    CursorDown,
    /// Move the cursor up one row.
    CursorUp,
    /// Move the cursor down one viewport of rows.
    PageDown,
    /// Move the cursor up one viewport of rows.
    PageUp,
    /// Jump to the first row.
    FirstRow,
    /// Jump to the last row.
    LastRow,
    /// Open the focused row.
    OpenRow,
    /// Open the context menu for the focused row.
    ContextMenu,
}

/// One registered shortcut.
#[derive(Debug, Clone)]
pub struct Shortcut {
    /// Key combination that fires it.
    pub combo: KeyCombo,
    /// What it does.
    pub action: ShortcutAction,
    /// Disabled shortcuts never fire, even on a key match.
    pub enabled: bool,
}

impl Shortcut {
    /// Create an enabled shortcut.
    pub fn new(combo: KeyCombo, action: ShortcutAction) -> Self {
        Self {
            combo,
            action,
            enabled: true,
        }
    }
}

/// The standard grid navigation set.
pub fn default_shortcuts() -> Vec<Shortcut> {
    vec![
        Shortcut::new(KeyCombo::key(Key::Down), ShortcutAction::CursorDown),
        Shortcut::new(KeyCombo::key(Key::Up), ShortcutAction::CursorUp),
        Shortcut::new(KeyCombo::key(Key::PageDown), ShortcutAction::PageDown),
        Shortcut::new(KeyCombo::key(Key::PageUp), ShortcutAction::PageUp),
        Shortcut::new(KeyCombo::key(Key::Home), ShortcutAction::FirstRow),
        Shortcut::new(KeyCombo::key(Key::End), ShortcutAction::LastRow),
        Shortcut::new(KeyCombo::key(Key::Enter), ShortcutAction::OpenRow),
        Shortcut::new(KeyCombo::key(Key::Menu), ShortcutAction::ContextMenu),
    ]
}

/// Coordinates the grid's keyboard surface and hover suppression.
pub struct ShortcutCoordinator<R: GridRow> {
    table: GridTable<R>,
    contexts: ShortcutContexts,
    gate: SuppressionGate,
    priority: i32,
    shortcuts: Vec<Shortcut>,
    /// Context pushed for the current activation, if any.
    context: Option<ContextId>,
    /// Whether this coordinator currently holds the suppression gate.
    holds_gate: bool,
    active: bool,
    menu_visible: bool,
    on_open_row: Arc<dyn Fn() -> bool + Send + Sync>,
    on_context_menu: Arc<dyn Fn() -> bool + Send + Sync>,
}

impl<R: GridRow> ShortcutCoordinator<R> {
    /// Create a coordinator over the given table, context stack and gate.
    pub fn new(table: GridTable<R>, contexts: ShortcutContexts, gate: SuppressionGate) -> Self {
        Self {
            table,
            contexts,
            gate,
            priority: 0,
            shortcuts: default_shortcuts(),
            context: None,
            holds_gate: false,
            active: false,
            menu_visible: false,
            on_open_row: Arc::new(|| false),
            on_context_menu: Arc::new(|| false),
        }
    }

    /// Set the priority of the pushed context.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Replace the shortcut set.
    pub fn with_shortcuts(mut self, shortcuts: Vec<Shortcut>) -> Self {
        self.shortcuts = shortcuts;
        self
    }

    /// Set the open-focused-row action. Returns true when handled.
    pub fn on_open_row(mut self, callback: impl Fn() -> bool + Send + Sync + 'static) -> Self {
        self.on_open_row = Arc::new(callback);
        self
    }

    /// Set the open-context-menu action. Returns true when handled.
    pub fn on_context_menu(mut self, callback: impl Fn() -> bool + Send + Sync + 'static) -> Self {
        self.on_context_menu = Arc::new(callback);
        self
    }

    /// Whether the grid is the active keyboard surface.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Transition activation. Edge-triggered: only the false-to-true edge
    /// pushes and only the true-to-false edge pops.
    pub fn set_active(&mut self, active: bool) {
        if self.active == active {
            return;
        }
        self.active = active;
        if active {
            let id = self.contexts.push(self.priority);
            self.context = Some(id);
            log::debug!("grid shortcut context pushed ({id:?})");
        } else if let Some(id) = self.context.take() {
            self.contexts.pop(id);
            log::debug!("grid shortcut context popped ({id:?})");
        }
        self.update_gate();
    }

    /// Track context menu visibility for suppression purposes.
    pub fn set_context_menu_visible(&mut self, visible: bool) {
        if self.menu_visible == visible {
            return;
        }
        self.menu_visible = visible;
        self.update_gate();
    }

    /// Enable or disable every shortcut bound to `action`.
    pub fn set_enabled(&mut self, action: ShortcutAction, enabled: bool) {
        for shortcut in &mut self.shortcuts {
            if shortcut.action == action {
                shortcut.enabled = enabled;
            }
        }
    }

    fn update_gate(&mut self) {
        let want = self.active || self.menu_visible;
        if want && !self.holds_gate {
            self.gate.acquire();
            self.holds_gate = true;
        } else if !want && self.holds_gate {
            self.gate.release();
            self.holds_gate = false;
        }
    }

    /// Dispatch a key press.
    ///
    /// Fires only while this grid is the top keyboard context, and only
    /// for shortcuts that are enabled.
    pub fn handle_key(&self, combo: &KeyCombo) -> EventResult {
        if !self.active || self.contexts.top() != self.context {
            return EventResult::Ignored;
        }
        let Some(shortcut) = self
            .shortcuts
            .iter()
            .find(|s| s.enabled && s.combo == *combo)
        else {
            return EventResult::Ignored;
        };
        self.run(shortcut.action)
    }

    fn run(&self, action: ShortcutAction) -> EventResult {
        let moved = match action {
            ShortcutAction::CursorDown => self.table.cursor_down(),
            ShortcutAction::CursorUp => self.table.cursor_up(),
            ShortcutAction::PageDown => self.table.cursor_page_down(),
            ShortcutAction::PageUp => self.table.cursor_page_up(),
            ShortcutAction::FirstRow => self.table.cursor_first(),
            ShortcutAction::LastRow => self.table.cursor_last(),
            ShortcutAction::OpenRow => {
                if self.table.cursor().is_some() && (self.on_open_row)() {
                    return EventResult::Consumed;
                }
                return EventResult::Ignored;
            }
            ShortcutAction::ContextMenu => {
                if (self.on_context_menu)() {
                    return EventResult::Consumed;
                }
                return EventResult::Ignored;
            }
        };
        if moved.is_some() {
            self.table.scroll_to_cursor();
            EventResult::Consumed
        } else {
            EventResult::Ignored
        }
    }

    /// Release everything this coordinator holds. Idempotent; also runs
    /// on drop.
    pub fn teardown(&mut self) {
        if let Some(id) = self.context.take() {
            self.contexts.pop(id);
        }
        if self.holds_gate {
            self.gate.release();
            self.holds_gate = false;
        }
        self.active = false;
        self.menu_visible = false;
    }
}

impl<R: GridRow> Drop for ShortcutCoordinator<R> {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl<R: GridRow> std::fmt::Debug for ShortcutCoordinator<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShortcutCoordinator")
            .field("active", &self.active)
            .field("menu_visible", &self.menu_visible)
            .field("holds_gate", &self.holds_gate)
            .finish()
    }
}
