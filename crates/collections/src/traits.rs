//! The contract shared by every ordered unique collection.

use alloc::vec::Vec;
use core::hash::Hash;
use tessella_core::Result;

/// An ordered container enforcing element uniqueness.
///
/// Position is insertion order unless explicitly reordered by positional
/// mutators. Equality of elements is structural (`Eq`), not identity.
///
/// Invariants upheld by every implementation:
/// - `len()` equals the number of distinct elements
/// - no element occupies two positions
/// - `contains(x)` iff `index_of(x)` is `Some(i)` with `i < len()`
///
/// Mutators return `Result` so that unmodifiable views can implement the
/// same contract and fail with `Error::ReadOnly`. Concrete backings only
/// fail on index or duplicate violations.
pub trait OrderedUnique<T: Eq + Hash + Clone> {
    /// Returns the number of elements.
    fn len(&self) -> usize;

    /// Returns true if the collection holds no elements.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true if the element is present.
    fn contains(&self, element: &T) -> bool;

    /// Returns the position of the element, or None if absent.
    fn index_of(&self, element: &T) -> Option<usize>;

    /// Returns a clone of the element at the position, or None if out of range.
    fn get(&self, index: usize) -> Option<T>;

    /// Returns a clone of the first element.
    fn first(&self) -> Option<T> {
        self.get(0)
    }

    /// Returns a clone of the last element.
    fn last(&self) -> Option<T> {
        self.len().checked_sub(1).and_then(|i| self.get(i))
    }

    /// Appends the element. Returns false (and leaves the collection
    /// untouched) if it is already present.
    fn push(&mut self, element: T) -> Result<bool>;

    /// Inserts the element at the position, shifting successors up.
    ///
    /// Fails with `IndexOutOfBounds` if `index > len()` and with
    /// `DuplicateElement` if the element is already present.
    fn insert(&mut self, index: usize, element: T) -> Result<()>;

    /// Replaces the element at the position, returning the displaced one.
    ///
    /// Fails with `DuplicateElement` if the new element equals an element
    /// at a *different* index; replacing an element with itself is a no-op
    /// that still returns the old element.
    fn set(&mut self, index: usize, element: T) -> Result<T>;

    /// Removes the element at the position, shifting successors down.
    fn remove_at(&mut self, index: usize) -> Result<T>;

    /// Removes the element if present. Returns true if it was removed.
    fn remove(&mut self, element: &T) -> Result<bool>;

    /// Appends every element not already present, preserving the relative
    /// order of the accepted elements. Returns the accepted count.
    fn extend_unique<I: IntoIterator<Item = T>>(&mut self, iter: I) -> Result<usize>;

    /// Inserts the accepted elements of the batch at the position.
    ///
    /// Elements already present, and repeats within the batch, are skipped
    /// silently. Fails with `IndexOutOfBounds` before any mutation when
    /// `index > len()`.
    fn insert_all<I: IntoIterator<Item = T>>(&mut self, index: usize, iter: I) -> Result<usize>;

    /// Removes the positions in `[from, to)`, returning the removed
    /// elements in order. All-or-nothing: an invalid range mutates nothing.
    fn remove_range(&mut self, from: usize, to: usize) -> Result<Vec<T>>;

    /// Removes every element.
    fn clear(&mut self) -> Result<()>;

    /// Returns the elements as a freshly allocated Vec in positional order.
    fn to_vec(&self) -> Vec<T>;
}
