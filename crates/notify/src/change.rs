//! Change-type tags and the coalesced change event.

use crate::graph::NodeId;

/// A change-type tag recorded against a node during a transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Change {
    /// An existing element's content changed
    Value,
    /// Elements were inserted
    Insert,
    /// Elements were removed
    Remove,
    /// Elements were replaced wholesale
    Replace,
    /// Element order changed
    Reorder,
    /// The container's length changed without per-element attribution
    Resize,
}

impl Change {
    /// Every tag, in declaration order.
    pub const ALL: [Change; 6] = [
        Change::Value,
        Change::Insert,
        Change::Remove,
        Change::Replace,
        Change::Reorder,
        Change::Resize,
    ];

    #[inline]
    fn bit(self) -> u8 {
        match self {
            Change::Value => 1 << 0,
            Change::Insert => 1 << 1,
            Change::Remove => 1 << 2,
            Change::Replace => 1 << 3,
            Change::Reorder => 1 << 4,
            Change::Resize => 1 << 5,
        }
    }
}

/// A coalesced set of change-type tags.
///
/// Tags accumulate across a transaction and are delivered as one union;
/// recording the same tag twice is idempotent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ChangeMask {
    bits: u8,
}

impl ChangeMask {
    /// Creates an empty mask.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mask holding a single tag.
    #[inline]
    pub fn of(change: Change) -> Self {
        Self { bits: change.bit() }
    }

    /// Records a tag.
    #[inline]
    pub fn insert(&mut self, change: Change) {
        self.bits |= change.bit();
    }

    /// Returns true if the tag is recorded.
    #[inline]
    pub fn contains(&self, change: Change) -> bool {
        self.bits & change.bit() != 0
    }

    /// Unions another mask into this one.
    #[inline]
    pub fn union(&mut self, other: ChangeMask) {
        self.bits |= other.bits;
    }

    /// Returns true if no tag is recorded.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// Returns the number of distinct tags recorded.
    pub fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    /// Iterates the recorded tags in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = Change> + '_ {
        Change::ALL.iter().copied().filter(|c| self.contains(*c))
    }
}

/// The coalesced event a node fires once per outer transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChangeEvent {
    /// The node the event originates from.
    pub source: NodeId,
    /// The union of every tag recorded since the node's previous event.
    pub changes: ChangeMask,
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn test_mask_insert_contains() {
        let mut mask = ChangeMask::new();
        assert!(mask.is_empty());
        mask.insert(Change::Value);
        mask.insert(Change::Insert);
        assert!(mask.contains(Change::Value));
        assert!(mask.contains(Change::Insert));
        assert!(!mask.contains(Change::Remove));
        assert_eq!(mask.len(), 2);
    }

    #[test]
    fn test_mask_insert_idempotent() {
        let mut mask = ChangeMask::of(Change::Value);
        mask.insert(Change::Value);
        assert_eq!(mask.len(), 1);
    }

    #[test]
    fn test_mask_union() {
        let mut a = ChangeMask::of(Change::Value);
        let b = ChangeMask::of(Change::Remove);
        a.union(b);
        assert!(a.contains(Change::Value));
        assert!(a.contains(Change::Remove));
    }

    #[test]
    fn test_mask_iter() {
        let mut mask = ChangeMask::new();
        mask.insert(Change::Reorder);
        mask.insert(Change::Value);
        let tags: Vec<Change> = mask.iter().collect();
        assert_eq!(tags, [Change::Value, Change::Reorder]);
    }
}
