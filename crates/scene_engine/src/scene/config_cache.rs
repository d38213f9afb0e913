//! Append-only cache of parsed scene descriptions
//!
//! Entries are shared behind `Arc` and never replaced, so a name always maps
//! to the same description for the lifetime of the cache.

use std::collections::HashMap;
use std::sync::Arc;

use crate::scene::SceneDescription;

/// Scene descriptions keyed by scene name
#[derive(Default)]
pub struct ConfigCache {
    entries: HashMap<String, Arc<SceneDescription>>,
}

impl ConfigCache {
    /// Empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached description for `name`
    pub fn get(&self, name: &str) -> Option<Arc<SceneDescription>> {
        self.entries.get(name).cloned()
    }

    /// Store a description unless one is already cached
    ///
    /// Returns the entry that is cached afterwards; an existing entry wins.
    pub fn insert(&mut self, name: &str, description: SceneDescription) -> Arc<SceneDescription> {
        self.entries
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(description))
            .clone()
    }

    /// Whether `name` has a cached description
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Number of cached scenes
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been cached yet
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
