//! Caller-owned memo table for quantition.
//!
//! Entries are keyed by [`ExprId`], so a cached value is reused for any
//! structurally equal subtree, in any tree, under any bindings that give its
//! variables the same values. The cache is an ordinary value: nothing is
//! shared between callers unless they share the cache.

use std::collections::HashMap;

use crate::expr::ExprId;
use crate::unit::AtomicUnit;

/// Hit/miss counters and size of a [`QuantitionCache`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Stored entries.
    pub entries: usize,
    /// Lookups answered from the cache.
    pub hits: u64,
    /// Lookups that missed.
    pub misses: u64,
}

/// Memoised subtree values keyed by content address.
#[derive(Debug, Clone, Default)]
pub struct QuantitionCache {
    entries: HashMap<ExprId, AtomicUnit>,
    hits: u64,
    misses: u64,
}

impl QuantitionCache {
    /// An empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a subtree value, counting the hit or miss.
    pub fn lookup(&mut self, id: &ExprId) -> Option<AtomicUnit> {
        match self.entries.get(id) {
            Some(&value) => {
                self.hits += 1;
                tracing::debug!(id = %id, "quantition cache hit");
                Some(value)
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    /// Stores a subtree value.
    pub fn insert(&mut self, id: ExprId, value: AtomicUnit) {
        self.entries.insert(id, value);
    }

    /// True if a value is stored for `id`; does not touch the counters.
    #[must_use]
    pub fn contains(&self, id: &ExprId) -> bool {
        self.entries.contains_key(id)
    }

    /// Number of stored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Lookups answered from the cache.
    #[must_use]
    pub fn hits(&self) -> u64 {
        self.hits
    }

    /// Lookups that missed.
    #[must_use]
    pub fn misses(&self) -> u64 {
        self.misses
    }

    /// Size and counters.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.len(),
            hits: self.hits,
            misses: self.misses,
        }
    }

    /// Drops every entry and resets the counters.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.hits = 0;
        self.misses = 0;
    }
}
