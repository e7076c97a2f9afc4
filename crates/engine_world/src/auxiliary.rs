//! Locally owned, entity-indexed component stores.
//!
//! Both auxiliary tiers (shapes and hierarchy links) are instances of
//! [`AuxStore`]. They are never merged: their key sets are disjoint and each
//! tier is cleared and iterated on its own.

use std::collections::{BTreeMap, BTreeSet};

use engine_component::TypeKey;

/// `entity id -> type key -> value`.
///
/// Inner maps are created on first write and dropped when their last entry
/// is deleted, so [`entity_ids`](Self::entity_ids) only reports ids that
/// actually hold data in this tier.
#[derive(Debug, Clone)]
pub struct AuxStore<V> {
    entries: BTreeMap<u64, BTreeMap<TypeKey, V>>,
}

impl<V> Default for AuxStore<V> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<V> AuxStore<V> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite. Returns the previous value.
    pub fn put(&mut self, id: u64, key: TypeKey, value: V) -> Option<V> {
        self.entries.entry(id).or_default().insert(key, value)
    }

    #[must_use]
    pub fn get(&self, id: u64, key: &str) -> Option<&V> {
        self.entries.get(&id)?.get(key)
    }

    pub fn get_mut(&mut self, id: u64, key: &str) -> Option<&mut V> {
        self.entries.get_mut(&id)?.get_mut(key)
    }

    /// Remove and return the value stored under `key`.
    pub fn delete(&mut self, id: u64, key: &str) -> Option<V> {
        let inner = self.entries.get_mut(&id)?;
        let removed = inner.remove(key);
        if inner.is_empty() {
            self.entries.remove(&id);
        }
        removed
    }

    /// Remove everything stored for `id`.
    pub fn delete_entity(&mut self, id: u64) -> Option<BTreeMap<TypeKey, V>> {
        self.entries.remove(&id)
    }

    #[must_use]
    pub fn has(&self, id: u64, key: &str) -> bool {
        self.entries
            .get(&id)
            .is_some_and(|inner| inner.contains_key(key))
    }

    /// `true` only if every key in `keys` is present for `id`.
    #[must_use]
    pub fn has_all<K: AsRef<str>>(&self, id: u64, keys: &[K]) -> bool {
        match self.entries.get(&id) {
            Some(inner) => keys.iter().all(|key| inner.contains_key(key.as_ref())),
            None => keys.is_empty(),
        }
    }

    /// Every id with at least one value in this tier.
    #[must_use]
    pub fn entity_ids(&self) -> BTreeSet<u64> {
        self.entries.keys().copied().collect()
    }

    #[must_use]
    pub fn contains_entity(&self, id: u64) -> bool {
        self.entries.contains_key(&id)
    }

    /// Number of ids with data in this tier.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(name: &'static str) -> TypeKey {
        TypeKey::from_static(name)
    }

    #[test]
    fn test_put_overwrites_and_returns_previous() {
        let mut store = AuxStore::new();
        assert_eq!(store.put(1, key("A"), 10), None);
        assert_eq!(store.put(1, key("A"), 20), Some(10));
        assert_eq!(store.get(1, "A"), Some(&20));
    }

    #[test]
    fn test_delete_drops_empty_inner_map() {
        let mut store = AuxStore::new();
        store.put(1, key("A"), 1);
        store.put(1, key("B"), 2);
        assert_eq!(store.delete(1, "A"), Some(1));
        assert!(store.contains_entity(1));
        assert_eq!(store.delete(1, "B"), Some(2));
        assert!(!store.contains_entity(1));
        assert_eq!(store.delete(1, "B"), None);
    }

    #[test]
    fn test_has_all() {
        let mut store = AuxStore::new();
        store.put(3, key("A"), ());
        store.put(3, key("B"), ());
        assert!(store.has_all(3, &["A", "B"]));
        assert!(!store.has_all(3, &["A", "C"]));
        assert!(!store.has_all(4, &["A"]));
        assert!(store.has_all::<&str>(4, &[]));
    }

    #[test]
    fn test_entity_ids_and_delete_entity() {
        let mut store = AuxStore::new();
        store.put(5, key("A"), ());
        store.put(2, key("A"), ());
        store.put(2, key("B"), ());
        assert_eq!(store.entity_ids().into_iter().collect::<Vec<_>>(), vec![2, 5]);

        let removed = store.delete_entity(2).unwrap();
        assert_eq!(removed.len(), 2);
        assert_eq!(store.len(), 1);
        assert!(store.delete_entity(2).is_none());
    }
}
