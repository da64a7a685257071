//! Tessella Storage - Typed leaf column buffers.
//!
//! The leaf storage layer underneath every series: a growable buffer per
//! scalar kind, with a documented per-kind sentinel standing in for the
//! empty value, plus a dynamically-typed column for heterogeneous caches.
//!
//! # Example
//!
//! ```rust
//! use tessella_core::{ScalarKind, Value};
//! use tessella_storage::ColumnBuffer;
//!
//! let mut column = ColumnBuffer::new(ScalarKind::Int32);
//! column.push(Value::Int32(7)).unwrap();
//! column.push(Value::Empty).unwrap();
//! assert_eq!(column.get(0), Value::Int32(7));
//! assert_eq!(column.get(1), Value::Empty);
//! ```

#![no_std]

extern crate alloc;

mod column;

pub use column::{AnyColumn, ColumnBuffer};
