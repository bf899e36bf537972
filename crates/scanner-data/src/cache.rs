//! In-memory panel cache.

use std::collections::HashMap;

use scanner_core::types::Panel;

/// Keyed in-memory store of named panels.
///
/// A collaborator edge of the scan pipeline: the orchestrator publishes
/// cleaned panels here for external consumers. Freshness and eviction are
/// the consumer's concern.
#[derive(Debug, Default)]
pub struct PanelCache {
    cache: HashMap<String, Panel>,
}

impl PanelCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a cached panel by name.
    pub fn get(&self, name: &str) -> Option<&Panel> {
        self.cache.get(name)
    }

    /// Store a panel under a name, replacing any previous entry.
    pub fn insert(&mut self, name: impl Into<String>, panel: Panel) {
        self.cache.insert(name.into(), panel);
    }

    /// Remove and return a named panel.
    pub fn remove(&mut self, name: &str) -> Option<Panel> {
        self.cache.remove(name)
    }

    /// Clear all cached panels.
    pub fn clear(&mut self) {
        self.cache.clear();
    }

    /// Number of cached panels.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}
