//! Selector match caching.

use crate::Component;
use core::hash::{Hash as _, Hasher as _};
use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;

/// A per-element, per-selector memo of match results.
///
/// Create one per resolution pass; matching is only stable while the tree is unchanged.
#[derive(Debug, Default)]
pub struct MatchCache {
    store: HashMap<(u64, u64), bool>,
    hits: usize,
    misses: usize,
}

impl MatchCache {
    /// Cache a result.
    #[inline]
    pub fn set(&mut self, element_key: u64, selector_key: u64, matched: bool) {
        self.store.insert((element_key, selector_key), matched);
    }

    /// Get a cached result, counting the lookup.
    #[inline]
    pub fn get(&mut self, element_key: u64, selector_key: u64) -> Option<bool> {
        let found = self.store.get(&(element_key, selector_key)).copied();
        if found.is_some() {
            self.hits = self.hits.saturating_add(1);
        } else {
            self.misses = self.misses.saturating_add(1);
        }
        found
    }

    #[inline]
    pub fn clear(&mut self) {
        self.store.clear();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.store.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// `(hits, misses)` since creation.
    #[inline]
    pub const fn counters(&self) -> (usize, usize) {
        (self.hits, self.misses)
    }
}

/// Build a stable structural key for a chain's components (subject first).
pub fn calc_selector_key(components: &[Component]) -> u64 {
    let mut hasher = DefaultHasher::new();
    components.len().hash(&mut hasher);
    for component in components {
        component.hash(&mut hasher);
    }
    hasher.finish()
}
