//! Registered grid-table view lookup.
//!
//! External systems mark certain view ids as grid-table views; the lookup
//! is a plain membership set. Ids are trimmed before use, blank ids are
//! ignored, and repeated registration is idempotent.

use std::collections::HashSet;
use std::sync::{Arc, OnceLock, RwLock};

/// Clone-able set of registered grid-table view ids.
#[derive(Debug, Clone, Default)]
pub struct ViewRegistry {
    ids: Arc<RwLock<HashSet<String>>>,
}

impl ViewRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry.
    pub fn global() -> ViewRegistry {
        static GLOBAL: OnceLock<ViewRegistry> = OnceLock::new();
        GLOBAL.get_or_init(ViewRegistry::new).clone()
    }

    /// Register a view id. Returns true if the id was newly added.
    ///
    /// Whitespace is trimmed; blank ids are ignored.
    pub fn register(&self, id: &str) -> bool {
        let id = id.trim();
        if id.is_empty() {
            return false;
        }
        if let Ok(mut ids) = self.ids.write() {
            return ids.insert(id.to_string());
        }
        false
    }

    /// Check whether a view id is registered.
    pub fn is_registered(&self, id: &str) -> bool {
        let id = id.trim();
        if id.is_empty() {
            return false;
        }
        self.ids
            .read()
            .map(|ids| ids.contains(id))
            .unwrap_or(false)
    }

    /// Number of registered ids.
    pub fn len(&self) -> usize {
        self.ids.read().map(|ids| ids.len()).unwrap_or(0)
    }

    /// Check if no ids are registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
