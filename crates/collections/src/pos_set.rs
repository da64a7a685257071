//! Position-map-backed ordered unique collection.
//!
//! `PosSet` keeps a bidirectional element↔position mapping so `index_of`
//! and `contains` are both O(1). Positional insert and remove are O(n)
//! because every successor must be renumbered.

use crate::faces::Membership;
use crate::traits::OrderedUnique;
use alloc::vec::Vec;
use core::hash::Hash;
use hashbrown::HashMap;
use tessella_core::{Error, Result};

/// Ordered unique collection with O(1) `index_of`.
#[derive(Clone, Debug, Default)]
pub struct PosSet<T: Eq + Hash + Clone> {
    items: Vec<T>,
    positions: HashMap<T, usize>,
}

impl<T: Eq + Hash + Clone> PosSet<T> {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            positions: HashMap::new(),
        }
    }

    /// Creates an empty collection with room for `capacity` elements.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            positions: HashMap::with_capacity(capacity),
        }
    }

    /// Builds a collection from a source, deduplicating by equality.
    ///
    /// The first occurrence of each element wins and order is preserved.
    pub fn dedup_from<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::new();
        for element in iter {
            if !set.positions.contains_key(&element) {
                set.positions.insert(element.clone(), set.items.len());
                set.items.push(element);
            }
        }
        set
    }

    /// Returns the elements as a slice in positional order.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Returns an iterator over the elements in positional order.
    pub fn iter(&self) -> core::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Returns the order-insensitive membership face.
    pub fn membership(&self) -> Membership<'_, T> {
        Membership::new(&self.items)
    }

    /// Renumbers positions in `[from, len)` after a shift.
    fn renumber_from(&mut self, from: usize) {
        for (i, element) in self.items.iter().enumerate().skip(from) {
            self.positions.insert(element.clone(), i);
        }
    }
}

impl<T: Eq + Hash + Clone> OrderedUnique<T> for PosSet<T> {
    #[inline]
    fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    fn contains(&self, element: &T) -> bool {
        self.positions.contains_key(element)
    }

    #[inline]
    fn index_of(&self, element: &T) -> Option<usize> {
        self.positions.get(element).copied()
    }

    fn get(&self, index: usize) -> Option<T> {
        self.items.get(index).cloned()
    }

    fn push(&mut self, element: T) -> Result<bool> {
        if self.positions.contains_key(&element) {
            return Ok(false);
        }
        self.positions.insert(element.clone(), self.items.len());
        self.items.push(element);
        Ok(true)
    }

    fn insert(&mut self, index: usize, element: T) -> Result<()> {
        if index > self.items.len() {
            return Err(Error::index_out_of_bounds(index, self.items.len()));
        }
        if let Some(&at) = self.positions.get(&element) {
            return Err(Error::duplicate_element(at));
        }
        self.items.insert(index, element);
        self.renumber_from(index);
        Ok(())
    }

    fn set(&mut self, index: usize, element: T) -> Result<T> {
        if index >= self.items.len() {
            return Err(Error::index_out_of_bounds(index, self.items.len()));
        }
        if let Some(&at) = self.positions.get(&element) {
            if at != index {
                return Err(Error::duplicate_element(at));
            }
            return Ok(self.items[index].clone());
        }
        let old = core::mem::replace(&mut self.items[index], element.clone());
        self.positions.remove(&old);
        self.positions.insert(element, index);
        Ok(old)
    }

    fn remove_at(&mut self, index: usize) -> Result<T> {
        if index >= self.items.len() {
            return Err(Error::index_out_of_bounds(index, self.items.len()));
        }
        let removed = self.items.remove(index);
        self.positions.remove(&removed);
        self.renumber_from(index);
        Ok(removed)
    }

    fn remove(&mut self, element: &T) -> Result<bool> {
        match self.positions.get(element).copied() {
            Some(index) => {
                self.items.remove(index);
                self.positions.remove(element);
                self.renumber_from(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn extend_unique<I: IntoIterator<Item = T>>(&mut self, iter: I) -> Result<usize> {
        let mut accepted = 0;
        for element in iter {
            if !self.positions.contains_key(&element) {
                self.positions.insert(element.clone(), self.items.len());
                self.items.push(element);
                accepted += 1;
            }
        }
        Ok(accepted)
    }

    fn insert_all<I: IntoIterator<Item = T>>(&mut self, index: usize, iter: I) -> Result<usize> {
        if index > self.items.len() {
            return Err(Error::index_out_of_bounds(index, self.items.len()));
        }
        let mut batch: Vec<T> = Vec::new();
        for element in iter {
            if !self.positions.contains_key(&element) && !batch.contains(&element) {
                batch.push(element);
            }
        }
        let accepted = batch.len();
        if accepted == 0 {
            return Ok(0);
        }
        self.items.splice(index..index, batch);
        self.renumber_from(index);
        Ok(accepted)
    }

    fn remove_range(&mut self, from: usize, to: usize) -> Result<Vec<T>> {
        if from > to || to > self.items.len() {
            let offending = if from > to { from } else { to };
            return Err(Error::index_out_of_bounds(offending, self.items.len()));
        }
        let removed: Vec<T> = self.items.drain(from..to).collect();
        for element in &removed {
            self.positions.remove(element);
        }
        self.renumber_from(from);
        Ok(removed)
    }

    fn clear(&mut self) -> Result<()> {
        self.items.clear();
        self.positions.clear();
        Ok(())
    }

    fn to_vec(&self) -> Vec<T> {
        self.items.clone()
    }
}

/// Sequence face: order-sensitive equality.
impl<T: Eq + Hash + Clone> PartialEq for PosSet<T> {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl<T: Eq + Hash + Clone> Eq for PosSet<T> {}

impl<T: Eq + Hash + Clone> PartialEq<[T]> for PosSet<T> {
    fn eq(&self, other: &[T]) -> bool {
        self.items.as_slice() == other
    }
}

impl<'a, T: Eq + Hash + Clone> IntoIterator for &'a PosSet<T> {
    type Item = &'a T;
    type IntoIter = core::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
