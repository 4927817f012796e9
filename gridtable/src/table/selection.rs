//! Row selection bookkeeping.

use std::collections::HashSet;

/// Selection mode for the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionMode {
    /// No selection allowed.
    #[default]
    None,
    /// At most one row selected.
    Single,
    /// Any number of rows selected.
    Multi,
}

/// Selected rows, tracked by row key.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    selected: HashSet<String>,
}

impl Selection {
    /// Create an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Select only the given key, dropping any previous selection.
    /// Returns true if the selection changed.
    pub fn select_only(&mut self, key: &str) -> bool {
        if self.selected.len() == 1 && self.selected.contains(key) {
            return false;
        }
        self.selected.clear();
        self.selected.insert(key.to_string());
        true
    }

    /// Toggle the given key. Returns true if it is now selected.
    pub fn toggle(&mut self, key: &str) -> bool {
        if self.selected.remove(key) {
            false
        } else {
            self.selected.insert(key.to_string());
            true
        }
    }

    /// Whether the key is selected.
    pub fn is_selected(&self, key: &str) -> bool {
        self.selected.contains(key)
    }

    /// Drop all selected keys. Returns the keys that were selected.
    pub fn clear(&mut self) -> Vec<String> {
        self.selected.drain().collect()
    }

    /// All selected keys, in no particular order.
    pub fn keys(&self) -> Vec<String> {
        self.selected.iter().cloned().collect()
    }

    /// Number of selected keys.
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// Check if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}
