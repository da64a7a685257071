//! Array-backed ordered unique collection.
//!
//! `VecSet` pairs a growable array with a hash presence index. Appends and
//! membership checks are O(1); positional insert/remove and `index_of` are
//! O(n). Use `PosSet` when `index_of` dominates.

use crate::faces::Membership;
use crate::traits::OrderedUnique;
use alloc::vec::Vec;
use core::hash::Hash;
use hashbrown::HashSet;
use tessella_core::{Error, Result};

/// Growable array plus presence index.
///
/// A generation counter is bumped on every structural mutation. Iteration
/// is a plain slice walk; callers that need a hard fail-fast guarantee
/// snapshot `generation()` before iterating and compare after.
#[derive(Clone, Debug, Default)]
pub struct VecSet<T: Eq + Hash + Clone> {
    items: Vec<T>,
    present: HashSet<T>,
    generation: u64,
}

impl<T: Eq + Hash + Clone> VecSet<T> {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            present: HashSet::new(),
            generation: 0,
        }
    }

    /// Creates an empty collection with room for `capacity` elements.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            present: HashSet::with_capacity(capacity),
            generation: 0,
        }
    }

    /// Builds a collection from a source, deduplicating by equality.
    ///
    /// The first occurrence of each element wins and order is preserved:
    /// `[2, 3, 2, 5, 3]` yields `[2, 3, 5]`.
    pub fn dedup_from<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::new();
        for element in iter {
            if set.present.insert(element.clone()) {
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

    /// Returns the structural generation counter.
    ///
    /// Bumped on every mutation that adds, removes, replaces or reorders
    /// an element.
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Returns the order-insensitive membership face.
    pub fn membership(&self) -> Membership<'_, T> {
        Membership::new(&self.items)
    }

    fn check_index(&self, index: usize, upper: usize) -> Result<()> {
        if index > upper {
            return Err(Error::index_out_of_bounds(index, self.items.len()));
        }
        Ok(())
    }
}

impl<T: Eq + Hash + Clone> OrderedUnique<T> for VecSet<T> {
    #[inline]
    fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    fn contains(&self, element: &T) -> bool {
        self.present.contains(element)
    }

    fn index_of(&self, element: &T) -> Option<usize> {
        if !self.present.contains(element) {
            return None;
        }
        self.items.iter().position(|e| e == element)
    }

    fn get(&self, index: usize) -> Option<T> {
        self.items.get(index).cloned()
    }

    fn push(&mut self, element: T) -> Result<bool> {
        if !self.present.insert(element.clone()) {
            return Ok(false);
        }
        self.items.push(element);
        self.generation += 1;
        Ok(true)
    }

    fn insert(&mut self, index: usize, element: T) -> Result<()> {
        self.check_index(index, self.items.len())?;
        if self.present.contains(&element) {
            // index_of is Some by the presence invariant
            let at = self.index_of(&element).unwrap_or(0);
            return Err(Error::duplicate_element(at));
        }
        self.present.insert(element.clone());
        self.items.insert(index, element);
        self.generation += 1;
        Ok(())
    }

    fn set(&mut self, index: usize, element: T) -> Result<T> {
        if index >= self.items.len() {
            return Err(Error::index_out_of_bounds(index, self.items.len()));
        }
        if let Some(at) = self.index_of(&element) {
            if at != index {
                return Err(Error::duplicate_element(at));
            }
            // Replacing an element with itself; nothing changes.
            return Ok(self.items[index].clone());
        }
        let old = core::mem::replace(&mut self.items[index], element.clone());
        self.present.remove(&old);
        self.present.insert(element);
        self.generation += 1;
        Ok(old)
    }

    fn remove_at(&mut self, index: usize) -> Result<T> {
        if index >= self.items.len() {
            return Err(Error::index_out_of_bounds(index, self.items.len()));
        }
        let removed = self.items.remove(index);
        self.present.remove(&removed);
        self.generation += 1;
        Ok(removed)
    }

    fn remove(&mut self, element: &T) -> Result<bool> {
        match self.index_of(element) {
            Some(index) => {
                self.items.remove(index);
                self.present.remove(element);
                self.generation += 1;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn extend_unique<I: IntoIterator<Item = T>>(&mut self, iter: I) -> Result<usize> {
        let mut accepted = 0;
        for element in iter {
            if self.present.insert(element.clone()) {
                self.items.push(element);
                accepted += 1;
            }
        }
        if accepted > 0 {
            self.generation += 1;
        }
        Ok(accepted)
    }

    fn insert_all<I: IntoIterator<Item = T>>(&mut self, index: usize, iter: I) -> Result<usize> {
        self.check_index(index, self.items.len())?;
        // Accept the batch before touching positions so a later index
        // error cannot leave a partial mutation behind.
        let mut batch: Vec<T> = Vec::new();
        for element in iter {
            if !self.present.contains(&element) && !batch.contains(&element) {
                batch.push(element);
            }
        }
        let accepted = batch.len();
        if accepted == 0 {
            return Ok(0);
        }
        for element in &batch {
            self.present.insert(element.clone());
        }
        self.items.splice(index..index, batch);
        self.generation += 1;
        Ok(accepted)
    }

    fn remove_range(&mut self, from: usize, to: usize) -> Result<Vec<T>> {
        if from > to || to > self.items.len() {
            let offending = if from > to { from } else { to };
            return Err(Error::index_out_of_bounds(offending, self.items.len()));
        }
        let removed: Vec<T> = self.items.drain(from..to).collect();
        for element in &removed {
            self.present.remove(element);
        }
        if !removed.is_empty() {
            self.generation += 1;
        }
        Ok(removed)
    }

    fn clear(&mut self) -> Result<()> {
        if !self.items.is_empty() {
            self.generation += 1;
        }
        self.items.clear();
        self.present.clear();
        Ok(())
    }

    fn to_vec(&self) -> Vec<T> {
        self.items.clone()
    }
}

/// Sequence face: order-sensitive equality.
impl<T: Eq + Hash + Clone> PartialEq for VecSet<T> {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl<T: Eq + Hash + Clone> Eq for VecSet<T> {}

impl<T: Eq + Hash + Clone> PartialEq<[T]> for VecSet<T> {
    fn eq(&self, other: &[T]) -> bool {
        self.items.as_slice() == other
    }
}

impl<'a, T: Eq + Hash + Clone> IntoIterator for &'a VecSet<T> {
    type Item = &'a T;
    type IntoIter = core::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
