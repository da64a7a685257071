//! Tessella Collections - Ordered unique collections and positional maps.
//!
//! This crate provides the labeled-container primitives of the Tessella
//! engine:
//!
//! - `OrderedUnique`: the contract shared by every ordered container that
//!   enforces element uniqueness
//! - `VecSet`: growable array + presence index (append O(1), contains O(1),
//!   index_of O(n))
//! - `PosSet`: bidirectional position map (index_of O(1), positional
//!   insert/remove O(n) due to renumbering)
//! - `ReadOnly`: a live unmodifiable view over a shared collection
//! - `OrderedMap`: a positional key→value map with a memoized values
//!   projection and immutable entry objects
//! - `Membership` / `MapFace` / `ListFace`: equality facades giving the
//!   positional types set-style and sequence-style value equality
//!
//! # Example
//!
//! ```rust
//! use tessella_collections::{OrderedUnique, VecSet};
//!
//! let set = VecSet::dedup_from([2, 3, 2, 5, 3]);
//! assert_eq!(set.to_vec(), vec![2, 3, 5]);
//! assert_eq!(set.index_of(&5), Some(2));
//! ```

#![no_std]

extern crate alloc;

mod faces;
mod ordered_map;
mod pos_set;
mod read_only;
mod traits;
mod vec_set;

pub use faces::{ListFace, MapFace, Membership};
pub use ordered_map::{MapEntry, OrderedMap};
pub use pos_set::PosSet;
pub use read_only::ReadOnly;
pub use traits::OrderedUnique;
pub use vec_set::VecSet;
