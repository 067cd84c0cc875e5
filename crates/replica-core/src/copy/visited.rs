//! Visited Map
//!
//! Identity-keyed record of every original handle already copied.
//! Entries are append-only during a copy, which makes rollback a truncation.

use std::fmt;

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;

use crate::value::{Identity, Value};

#[derive(Debug)]
struct Entry {
    /// Held so the address cannot be reused while the entry exists
    original: Value,
    copy: Value,
}

/// Original-to-copy map shared by one copy operation, or by several when the
/// caller wants them in one identity space.
#[derive(Default)]
pub struct VisitedMap {
    entries: IndexMap<Identity, Entry, FxBuildHasher>,
}

impl VisitedMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        VisitedMap {
            entries: IndexMap::with_capacity_and_hasher(capacity, FxBuildHasher),
        }
    }

    pub fn get(&self, id: Identity) -> Option<&Value> {
        self.entries.get(&id).map(|e| &e.copy)
    }

    /// Copy previously produced for `original`, if any.
    pub fn copy_of(&self, original: &Value) -> Option<&Value> {
        self.get(original.identity()?)
    }

    pub fn contains(&self, id: Identity) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// `(original, copy)` pairs in registration order
    pub fn iter(&self) -> impl Iterator<Item = (&Value, &Value)> {
        self.entries.values().map(|e| (&e.original, &e.copy))
    }

    /// Registers `copy` for `original`. Atomics are never registered.
    pub(crate) fn register(&mut self, original: &Value, copy: &Value) {
        if let Some(id) = original.identity() {
            self.entries.insert(
                id,
                Entry {
                    original: original.clone(),
                    copy: copy.clone(),
                },
            );
        }
    }

    pub(crate) fn checkpoint(&self) -> usize {
        self.entries.len()
    }

    /// Drops every entry registered after `checkpoint`.
    pub(crate) fn rollback(&mut self, checkpoint: usize) {
        self.entries.truncate(checkpoint);
    }
}

impl fmt::Debug for VisitedMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VisitedMap")
            .field("len", &self.entries.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn atomics_are_not_registered() {
        let mut map = VisitedMap::new();
        map.register(&Value::Int(1), &Value::Int(1));
        assert!(map.is_empty());
    }

    #[test]
    fn lookup_is_by_identity() {
        let mut map = VisitedMap::new();
        let original = Value::list([Value::Int(1)]);
        let twin = Value::list([Value::Int(1)]);
        let copy = Value::list([Value::Int(1)]);
        map.register(&original, &copy);

        assert!(map.copy_of(&original).is_some_and(|c| c.same(&copy)));
        assert!(map.copy_of(&twin).is_none());
    }

    #[test]
    fn rollback_truncates_to_checkpoint() {
        let mut map = VisitedMap::with_capacity(4);
        let a = Value::list([]);
        let b = Value::list([]);
        map.register(&a, &Value::list([]));
        let mark = map.checkpoint();
        map.register(&b, &Value::list([]));
        assert_eq!(map.len(), 2);

        map.rollback(mark);
        assert_eq!(map.len(), 1);
        assert!(a.identity().is_some_and(|id| map.contains(id)));
        assert!(b.identity().is_some_and(|id| !map.contains(id)));
    }
}
