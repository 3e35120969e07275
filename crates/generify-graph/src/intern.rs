//! Hash-consing store for constraint variables and constraints.
//!
//! `ConsTable` canonicalizes values by an explicitly computed key with
//! derived equality and hashing: looking up a semantically-equal key always
//! yields the first-inserted id (first-writer-wins, never overwritten). The
//! same mechanism backs both the variable and the constraint stores.
//!
//! Insertions are additionally recorded into a "created this unit" list that
//! the orchestrator drains at each source-unit boundary for the incremental
//! solver and for pruning.

use rustc_hash::FxHashMap;
use std::hash::Hash;

/// Generic get-or-insert map from consing key to arena id.
pub struct ConsTable<K, I> {
    map: FxHashMap<K, I>,
    created: Vec<I>,
}

impl<K, I> ConsTable<K, I>
where
    K: Eq + Hash,
    I: Copy,
{
    pub fn new() -> Self {
        ConsTable {
            map: FxHashMap::default(),
            created: Vec::new(),
        }
    }

    /// Look up the canonical id for a key, if one exists.
    pub fn get(&self, key: &K) -> Option<I> {
        self.map.get(key).copied()
    }

    /// Return the canonical id for `key`, allocating through `alloc` on the
    /// first request. The second tuple field is true when a new id was
    /// allocated.
    pub fn stored_or_insert(&mut self, key: K, alloc: impl FnOnce() -> I) -> (I, bool) {
        if let Some(&id) = self.map.get(&key) {
            return (id, false);
        }
        let id = alloc();
        self.map.insert(key, id);
        self.created.push(id);
        (id, true)
    }

    /// Unmap a key, making its id unreachable through the store.
    /// Used when the orchestrator prunes unit-scoped variables.
    pub fn remove(&mut self, key: &K) -> Option<I> {
        self.map.remove(key)
    }

    /// Ids allocated since the last unit boundary, in insertion order.
    pub fn created_this_unit(&self) -> &[I] {
        &self.created
    }

    /// Clear the per-unit accumulator at a source-unit boundary.
    pub fn reset_unit(&mut self) {
        self.created.clear();
    }

    /// Number of live (mapped) entries.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl<K, I> Default for ConsTable<K, I>
where
    K: Eq + Hash,
    I: Copy,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "tests/intern_tests.rs"]
mod tests;
