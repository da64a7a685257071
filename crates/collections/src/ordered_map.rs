//! Positional key→value map.
//!
//! `OrderedMap` keeps entries in insertion order and addresses them both by
//! key (O(1) through a key→position index) and by position. Entries are
//! immutable objects: replacing a value swaps in a fresh entry, so entry
//! references handed out earlier never observe mutation.

use crate::faces::{ListFace, MapFace};
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::hash::Hash;
use hashbrown::HashMap;
use tessella_core::{Error, Result};

/// An immutable (key, value) pair handed out by `OrderedMap`.
#[derive(Debug, PartialEq, Eq)]
pub struct MapEntry<K, V> {
    key: K,
    value: V,
}

impl<K, V> MapEntry<K, V> {
    /// Creates an entry.
    pub fn new(key: K, value: V) -> Self {
        Self { key, value }
    }

    /// Returns the key.
    #[inline]
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Returns the value.
    #[inline]
    pub fn value(&self) -> &V {
        &self.value
    }
}

/// A positional key→value map built over parallel ordered-unique storage.
///
/// Invariants:
/// - `keys()` and the entry sequence are always the same length, in the
///   same order
/// - `get(key)` agrees with the position of `key`
///
/// The `values()` projection is memoized and dropped on any change that
/// could affect it, then rebuilt lazily on the next access.
pub struct OrderedMap<K, V> {
    entries: Vec<Rc<MapEntry<K, V>>>,
    index: HashMap<K, usize>,
    values_cache: RefCell<Option<Rc<Vec<V>>>>,
}

impl<K, V> Default for OrderedMap<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone + PartialEq,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> OrderedMap<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone + PartialEq,
{
    /// Creates an empty map.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
            values_cache: RefCell::new(None),
        }
    }

    /// Creates an empty map with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
            values_cache: RefCell::new(None),
        }
    }

    /// Builds a map from (key, value) pairs; the first occurrence of each
    /// key wins and order is preserved.
    pub fn dedup_from<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            if !map.index.contains_key(&k) {
                map.index.insert(k.clone(), map.entries.len());
                map.entries.push(Rc::new(MapEntry::new(k, v)));
            }
        }
        map
    }

    /// Returns the number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the map holds no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns true if the key has an entry.
    #[inline]
    pub fn contains_key(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// Returns the position of the key, or None if absent.
    #[inline]
    pub fn index_of_key(&self, key: &K) -> Option<usize> {
        self.index.get(key).copied()
    }

    /// Returns a clone of the value stored under the key.
    pub fn get(&self, key: &K) -> Option<V> {
        self.index
            .get(key)
            .map(|&i| self.entries[i].value().clone())
    }

    /// Returns a clone of the value at the position.
    pub fn get_at(&self, index: usize) -> Option<V> {
        self.entries.get(index).map(|e| e.value().clone())
    }

    /// Returns the entry object at the position.
    ///
    /// The entry is immutable; a later `put` under the same key produces a
    /// fresh entry and this one keeps its old value.
    pub fn entry_at(&self, index: usize) -> Option<Rc<MapEntry<K, V>>> {
        self.entries.get(index).cloned()
    }

    /// Associates the value with the key.
    ///
    /// If the key exists, the stored value is replaced in place positionally
    /// via a fresh entry object and the old value is returned; the position
    /// never moves. Storing a value equal to the current one is a complete
    /// no-op (the existing entry object is kept). If the key is absent, a
    /// new entry is appended at the end and None is returned.
    pub fn put(&mut self, key: K, value: V) -> Option<V> {
        match self.index.get(&key).copied() {
            Some(i) => {
                let old = self.entries[i].value().clone();
                if old == value {
                    return Some(old);
                }
                self.entries[i] = Rc::new(MapEntry::new(key, value));
                self.invalidate_values();
                Some(old)
            }
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push(Rc::new(MapEntry::new(key, value)));
                self.invalidate_values();
                None
            }
        }
    }

    /// Removes the entry under the key, shifting successors down.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let i = self.index.remove(key)?;
        let entry = self.entries.remove(i);
        self.renumber_from(i);
        self.invalidate_values();
        Some(entry.value().clone())
    }

    /// Removes the entry at the position, shifting successors down.
    pub fn remove_at(&mut self, index: usize) -> Result<(K, V)> {
        if index >= self.entries.len() {
            return Err(Error::index_out_of_bounds(index, self.entries.len()));
        }
        let entry = self.entries.remove(index);
        self.index.remove(entry.key());
        self.renumber_from(index);
        self.invalidate_values();
        Ok((entry.key().clone(), entry.value().clone()))
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
        self.invalidate_values();
    }

    /// Returns an iterator over the entries in positional order.
    pub fn iter(&self) -> core::slice::Iter<'_, Rc<MapEntry<K, V>>> {
        self.entries.iter()
    }

    /// Returns an iterator over the keys in positional order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.iter().map(|e| e.key())
    }

    /// Returns the memoized values projection.
    ///
    /// The projection is rebuilt lazily after a structural or value change
    /// invalidated it; repeated calls in between share one allocation.
    pub fn values(&self) -> Rc<Vec<V>> {
        let mut cache = self.values_cache.borrow_mut();
        if let Some(values) = cache.as_ref() {
            return values.clone();
        }
        let values: Rc<Vec<V>> =
            Rc::new(self.entries.iter().map(|e| e.value().clone()).collect());
        *cache = Some(values.clone());
        values
    }

    /// Returns the order-insensitive key→value equality face.
    pub fn as_map(&self) -> MapFace<'_, K, V> {
        MapFace::new(&self.entries)
    }

    /// Returns the order-sensitive (key, value) sequence face.
    pub fn as_list(&self) -> ListFace<'_, K, V> {
        ListFace::new(&self.entries)
    }

    fn invalidate_values(&mut self) {
        *self.values_cache.borrow_mut() = None;
    }

    fn renumber_from(&mut self, from: usize) {
        for (i, entry) in self.entries.iter().enumerate().skip(from) {
            self.index.insert(entry.key().clone(), i);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::String;
    use alloc::vec;

    fn sample() -> OrderedMap<String, i32> {
        OrderedMap::dedup_from([
            (String::from("a"), 1),
            (String::from("b"), 2),
            (String::from("c"), 3),
        ])
    }

    #[test]
    fn test_put_appends_new_keys_in_order() {
        let map = sample();
        let keys: Vec<&String> = map.keys().collect();
        assert_eq!(keys, vec!["a", "b", "c"]);
        assert_eq!(map.get(&String::from("b")), Some(2));
        assert_eq!(map.index_of_key(&String::from("c")), Some(2));
    }

    #[test]
    fn test_put_existing_keeps_position() {
        let mut map = sample();
        let old = map.put(String::from("a"), 10);
        assert_eq!(old, Some(1));
        assert_eq!(map.index_of_key(&String::from("a")), Some(0));
        assert_eq!(map.get(&String::from("a")), Some(10));
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn test_put_equal_value_is_noop() {
        let mut map = sample();
        let before = map.entry_at(1).unwrap();
        assert_eq!(map.put(String::from("b"), 2), Some(2));
        let after = map.entry_at(1).unwrap();
        // Same entry object: nothing changed.
        assert!(Rc::ptr_eq(&before, &after));
    }

    #[test]
    fn test_put_fresh_entry_preserves_old_references() {
        let mut map = sample();
        let held = map.entry_at(0).unwrap();
        map.put(String::from("a"), 99);
        // The handed-out entry still shows the old value.
        assert_eq!(*held.value(), 1);
        assert_eq!(map.get(&String::from("a")), Some(99));
    }

    #[test]
    fn test_remove_shifts_positions() {
        let mut map = sample();
        assert_eq!(map.remove(&String::from("b")), Some(2));
        assert_eq!(map.index_of_key(&String::from("c")), Some(1));
        assert_eq!(map.get_at(1), Some(3));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_remove_at() {
        let mut map = sample();
        let (k, v) = map.remove_at(0).unwrap();
        assert_eq!((k.as_str(), v), ("a", 1));
        assert_eq!(map.index_of_key(&String::from("b")), Some(0));
        assert!(map.remove_at(5).is_err());
    }

    #[test]
    fn test_values_projection_memoized() {
        let mut map = sample();
        let v1 = map.values();
        let v2 = map.values();
        assert!(Rc::ptr_eq(&v1, &v2));
        assert_eq!(*v1, vec![1, 2, 3]);

        map.put(String::from("b"), 20);
        let v3 = map.values();
        assert!(!Rc::ptr_eq(&v1, &v3));
        assert_eq!(*v3, vec![1, 20, 3]);
    }

    #[test]
    fn test_keys_and_entries_agree() {
        let mut map = sample();
        map.remove(&String::from("a"));
        map.put(String::from("d"), 4);
        let keys: Vec<&String> = map.keys().collect();
        assert_eq!(keys.len(), map.len());
        for (i, key) in map.keys().enumerate() {
            assert_eq!(map.index_of_key(key), Some(i));
            assert_eq!(map.get(key), map.get_at(i));
        }
    }

    #[test]
    fn test_map_face_ignores_order() {
        let a = OrderedMap::dedup_from([(1, 'x'), (2, 'y')]);
        let b = OrderedMap::dedup_from([(2, 'y'), (1, 'x')]);
        assert_eq!(a.as_map(), b.as_map());
        assert_ne!(a.as_list(), b.as_list());
    }

    #[test]
    fn test_list_face_matches_order() {
        let a = OrderedMap::dedup_from([(1, 'x'), (2, 'y')]);
        let b = OrderedMap::dedup_from([(1, 'x'), (2, 'y')]);
        assert_eq!(a.as_list(), b.as_list());
    }
}
