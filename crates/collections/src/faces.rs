//! Equality facades for the positional collection types.
//!
//! The positional types are sensitive to structure: two collections holding
//! the same elements in a different order are not sequence-equal. These
//! borrow views give them the other equality contracts callers expect:
//! set-style for collections, map-style and list-style for `OrderedMap`.

use alloc::rc::Rc;
use core::hash::{Hash, Hasher};
use hashbrown::{HashMap, HashSet};

use crate::ordered_map::MapEntry;

/// Order-insensitive membership face over an ordered unique collection.
///
/// Two membership faces are equal when they hold the same elements in any
/// order. `Hash` is commutative (XOR of per-element hashes) so it stays
/// consistent with that equality, matching the usual set-equality contract.
#[derive(Clone, Copy, Debug)]
pub struct Membership<'a, T> {
    items: &'a [T],
}

impl<'a, T> Membership<'a, T> {
    pub(crate) fn new(items: &'a [T]) -> Self {
        Self { items }
    }

    /// Returns the number of elements behind the face.
    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the face covers no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<'a, 'b, T: Eq + Hash> PartialEq<Membership<'b, T>> for Membership<'a, T> {
    fn eq(&self, other: &Membership<'b, T>) -> bool {
        if self.items.len() != other.items.len() {
            return false;
        }
        // Both sides are unique, so same length + containment = equality.
        let index: HashSet<&T> = other.items.iter().collect();
        self.items.iter().all(|e| index.contains(e))
    }
}

impl<'a, T: Eq + Hash> Eq for Membership<'a, T> {}

impl<'a, T: Hash> Hash for Membership<'a, T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let mut acc: u64 = 0;
        for element in self.items {
            let mut h = FoldHasher::default();
            element.hash(&mut h);
            acc ^= h.finish();
        }
        acc.hash(state);
        self.items.len().hash(state);
    }
}

/// Order-insensitive key→value face over an `OrderedMap`.
#[derive(Clone, Copy, Debug)]
pub struct MapFace<'a, K, V> {
    entries: &'a [Rc<MapEntry<K, V>>],
}

impl<'a, K, V> MapFace<'a, K, V> {
    pub(crate) fn new(entries: &'a [Rc<MapEntry<K, V>>]) -> Self {
        Self { entries }
    }

    /// Returns the number of entries behind the face.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the face covers no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a, 'b, K: Eq + Hash, V: PartialEq> PartialEq<MapFace<'b, K, V>> for MapFace<'a, K, V> {
    fn eq(&self, other: &MapFace<'b, K, V>) -> bool {
        if self.entries.len() != other.entries.len() {
            return false;
        }
        let index: HashMap<&K, &V> = other
            .entries
            .iter()
            .map(|e| (e.key(), e.value()))
            .collect();
        self.entries
            .iter()
            .all(|e| index.get(e.key()).is_some_and(|v| *v == e.value()))
    }
}

impl<'a, K: Eq + Hash, V: Eq> Eq for MapFace<'a, K, V> {}

impl<'a, K: Hash, V: Hash> Hash for MapFace<'a, K, V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let mut acc: u64 = 0;
        for entry in self.entries {
            let mut h = FoldHasher::default();
            entry.key().hash(&mut h);
            entry.value().hash(&mut h);
            acc ^= h.finish();
        }
        acc.hash(state);
        self.entries.len().hash(state);
    }
}

/// Order-sensitive (key, value) sequence face over an `OrderedMap`.
#[derive(Clone, Copy, Debug)]
pub struct ListFace<'a, K, V> {
    entries: &'a [Rc<MapEntry<K, V>>],
}

impl<'a, K, V> ListFace<'a, K, V> {
    pub(crate) fn new(entries: &'a [Rc<MapEntry<K, V>>]) -> Self {
        Self { entries }
    }

    /// Returns the number of entries behind the face.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the face covers no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a, 'b, K: PartialEq, V: PartialEq> PartialEq<ListFace<'b, K, V>> for ListFace<'a, K, V> {
    fn eq(&self, other: &ListFace<'b, K, V>) -> bool {
        self.entries.len() == other.entries.len()
            && self
                .entries
                .iter()
                .zip(other.entries.iter())
                .all(|(a, b)| a.key() == b.key() && a.value() == b.value())
    }
}

impl<'a, K: Eq, V: Eq> Eq for ListFace<'a, K, V> {}

/// Minimal FNV-1a hasher used to fold per-element hashes commutatively.
///
/// The faces cannot reach for the collection's own hasher state here, so a
/// small deterministic hasher keeps the commutative fold stable.
#[derive(Default)]
struct FoldHasher {
    state: u64,
}

impl Hasher for FoldHasher {
    fn finish(&self) -> u64 {
        self.state
    }

    fn write(&mut self, bytes: &[u8]) {
        const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
        const PRIME: u64 = 0x0000_0100_0000_01b3;
        if self.state == 0 {
            self.state = OFFSET;
        }
        for &b in bytes {
            self.state ^= b as u64;
            self.state = self.state.wrapping_mul(PRIME);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vec_set::VecSet;

    fn fold_hash<T: Hash>(value: &T) -> u64 {
        let mut h = FoldHasher::default();
        value.hash(&mut h);
        h.finish()
    }

    #[test]
    fn test_membership_equality_ignores_order() {
        let a = VecSet::dedup_from([1, 2, 3]);
        let b = VecSet::dedup_from([3, 1, 2]);
        assert_eq!(a.membership(), b.membership());
        assert_ne!(a, b);
    }

    #[test]
    fn test_membership_inequality() {
        let a = VecSet::dedup_from([1, 2, 3]);
        let b = VecSet::dedup_from([1, 2, 4]);
        let c = VecSet::dedup_from([1, 2]);
        assert_ne!(a.membership(), b.membership());
        assert_ne!(a.membership(), c.membership());
    }

    #[test]
    fn test_membership_hash_is_order_independent() {
        let a = VecSet::dedup_from([1, 2, 3]);
        let b = VecSet::dedup_from([2, 3, 1]);
        assert_eq!(fold_hash(&a.membership()), fold_hash(&b.membership()));
    }
}
