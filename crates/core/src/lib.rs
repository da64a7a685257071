//! Tessella Core - Scalar kinds, values and error types for the Tessella data engine.
//!
//! This crate provides the foundational types shared by every Tessella crate:
//!
//! - `ScalarKind`: The closed set of scalar kinds a cell can hold, with a
//!   static pairwise numeric promotion table
//! - `Value`: Runtime scalar values, including the `Empty` sentinel
//! - `Error`: Error types for engine operations
//!
//! # Example
//!
//! ```rust
//! use tessella_core::{ScalarKind, Value};
//!
//! // Promotion is resolved once, when an operation is constructed.
//! assert_eq!(
//!     ScalarKind::promote(ScalarKind::Int32, ScalarKind::Float64),
//!     Some(ScalarKind::Float64)
//! );
//!
//! let v = Value::Int64(42);
//! assert_eq!(v.kind(), Some(ScalarKind::Int64));
//! assert_eq!(v.as_f64_lossy(), Some(42.0));
//! assert!(!v.is_empty());
//! ```

#![no_std]

extern crate alloc;

mod error;
mod kind;
mod value;

pub use error::{Error, Result};
pub use kind::ScalarKind;
pub use value::Value;
