//! Live unmodifiable views over shared collections.

use crate::traits::OrderedUnique;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::hash::Hash;
use core::marker::PhantomData;
use tessella_core::{Error, Result};

/// An unmodifiable view over a shared collection.
///
/// The view delegates every read to the wrapped collection and fails every
/// mutator with `Error::ReadOnly`. It is a live view, not a snapshot:
/// mutations made through other handles to the shared collection are
/// visible through it immediately.
///
/// # Example
///
/// ```rust
/// use std::cell::RefCell;
/// use std::rc::Rc;
/// use tessella_collections::{OrderedUnique, ReadOnly, VecSet};
///
/// let shared = Rc::new(RefCell::new(VecSet::dedup_from([1, 2])));
/// let view: ReadOnly<VecSet<i32>, i32> = ReadOnly::new(shared.clone());
///
/// shared.borrow_mut().push(3).unwrap();
/// assert_eq!(view.len(), 3); // live
/// assert!(view.push(4).is_err()); // unmodifiable
/// ```
pub struct ReadOnly<S, T> {
    inner: Rc<RefCell<S>>,
    _marker: PhantomData<T>,
}

impl<S, T> ReadOnly<S, T> {
    /// Wraps a shared collection in an unmodifiable view.
    pub fn new(inner: Rc<RefCell<S>>) -> Self {
        Self {
            inner,
            _marker: PhantomData,
        }
    }
}

impl<S, T> Clone for ReadOnly<S, T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            _marker: PhantomData,
        }
    }
}

impl<S, T> ReadOnly<S, T>
where
    S: OrderedUnique<T>,
    T: Eq + Hash + Clone,
{
    /// Returns the number of elements in the wrapped collection.
    pub fn len(&self) -> usize {
        self.inner.borrow().len()
    }

    /// Returns true if the wrapped collection is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().is_empty()
    }

    /// Returns true if the element is present in the wrapped collection.
    pub fn contains(&self, element: &T) -> bool {
        self.inner.borrow().contains(element)
    }

    /// Returns the position of the element in the wrapped collection.
    pub fn index_of(&self, element: &T) -> Option<usize> {
        self.inner.borrow().index_of(element)
    }

    /// Returns a clone of the element at the position.
    pub fn get(&self, index: usize) -> Option<T> {
        self.inner.borrow().get(index)
    }

    /// Returns the wrapped elements as a freshly allocated Vec.
    pub fn to_vec(&self) -> Vec<T> {
        self.inner.borrow().to_vec()
    }

    /// Always fails with `Error::ReadOnly`.
    pub fn push(&self, _element: T) -> Result<bool> {
        Err(Error::ReadOnly)
    }
}

impl<S, T> OrderedUnique<T> for ReadOnly<S, T>
where
    S: OrderedUnique<T>,
    T: Eq + Hash + Clone,
{
    fn len(&self) -> usize {
        self.inner.borrow().len()
    }

    fn contains(&self, element: &T) -> bool {
        self.inner.borrow().contains(element)
    }

    fn index_of(&self, element: &T) -> Option<usize> {
        self.inner.borrow().index_of(element)
    }

    fn get(&self, index: usize) -> Option<T> {
        self.inner.borrow().get(index)
    }

    fn push(&mut self, _element: T) -> Result<bool> {
        Err(Error::ReadOnly)
    }

    fn insert(&mut self, _index: usize, _element: T) -> Result<()> {
        Err(Error::ReadOnly)
    }

    fn set(&mut self, _index: usize, _element: T) -> Result<T> {
        Err(Error::ReadOnly)
    }

    fn remove_at(&mut self, _index: usize) -> Result<T> {
        Err(Error::ReadOnly)
    }

    fn remove(&mut self, _element: &T) -> Result<bool> {
        Err(Error::ReadOnly)
    }

    fn extend_unique<I: IntoIterator<Item = T>>(&mut self, _iter: I) -> Result<usize> {
        Err(Error::ReadOnly)
    }

    fn insert_all<I: IntoIterator<Item = T>>(&mut self, _index: usize, _iter: I) -> Result<usize> {
        Err(Error::ReadOnly)
    }

    fn remove_range(&mut self, _from: usize, _to: usize) -> Result<Vec<T>> {
        Err(Error::ReadOnly)
    }

    fn clear(&mut self) -> Result<()> {
        Err(Error::ReadOnly)
    }

    fn to_vec(&self) -> Vec<T> {
        self.inner.borrow().to_vec()
    }
}
