//! Value type definitions for the Tessella data engine.
//!
//! This module defines the `Value` enum which represents any scalar that can
//! be stored in a cell, including the `Empty` sentinel that marks a cell with
//! no content.

use crate::kind::ScalarKind;
use alloc::string::String;
use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};

/// A scalar value held by a cell.
#[derive(Clone, Debug)]
pub enum Value {
    /// The empty sentinel: a cell with no content
    Empty,
    /// Boolean value
    Bool(bool),
    /// 32-bit signed integer
    Int32(i32),
    /// 64-bit signed integer
    Int64(i64),
    /// 64-bit floating point
    Float64(f64),
    /// UTF-8 string
    Str(String),
    /// DateTime stored as Unix timestamp in milliseconds
    DateTime(i64),
}

impl Value {
    /// Returns the scalar kind of this value, or None if it's Empty.
    pub fn kind(&self) -> Option<ScalarKind> {
        match self {
            Value::Empty => None,
            Value::Bool(_) => Some(ScalarKind::Bool),
            Value::Int32(_) => Some(ScalarKind::Int32),
            Value::Int64(_) => Some(ScalarKind::Int64),
            Value::Float64(_) => Some(ScalarKind::Float64),
            Value::Str(_) => Some(ScalarKind::Str),
            Value::DateTime(_) => Some(ScalarKind::DateTime),
        }
    }

    /// Returns true if this value is the Empty sentinel.
    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, Value::Empty)
    }

    /// Returns the boolean value if this is a Bool, None otherwise.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the i32 value if this is an Int32, None otherwise.
    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Value::Int32(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the i64 value if this is an Int64, None otherwise.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int64(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the f64 value if this is a Float64, None otherwise.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float64(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns a reference to the string if this is a Str, None otherwise.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(v) => Some(v.as_str()),
            _ => None,
        }
    }

    /// Returns the datetime timestamp if this is a DateTime, None otherwise.
    pub fn as_datetime(&self) -> Option<i64> {
        match self {
            Value::DateTime(v) => Some(*v),
            _ => None,
        }
    }

    /// Widens any numeric value to f64 for reduction arithmetic.
    ///
    /// Returns None for Empty and non-numeric kinds.
    pub fn as_f64_lossy(&self) -> Option<f64> {
        match self {
            Value::Int32(v) => Some(*v as f64),
            Value::Int64(v) => Some(*v as f64),
            Value::Float64(v) => Some(*v),
            _ => None,
        }
    }

    /// Creates the additive identity for the given kind.
    pub fn zero_for(kind: ScalarKind) -> Value {
        match kind {
            ScalarKind::Int32 => Value::Int32(0),
            ScalarKind::Int64 => Value::Int64(0),
            ScalarKind::Float64 => Value::Float64(0.0),
            _ => Value::Empty,
        }
    }

    /// Creates the multiplicative identity for the given kind.
    pub fn one_for(kind: ScalarKind) -> Value {
        match kind {
            ScalarKind::Int32 => Value::Int32(1),
            ScalarKind::Int64 => Value::Int64(1),
            ScalarKind::Float64 => Value::Float64(1.0),
            _ => Value::Empty,
        }
    }

    /// Narrows an f64 back into the given numeric kind.
    ///
    /// Used by reductions whose result kind was resolved at construction.
    pub fn from_f64_as(kind: ScalarKind, v: f64) -> Value {
        match kind {
            ScalarKind::Int32 => Value::Int32(v as i32),
            ScalarKind::Int64 => Value::Int64(v as i64),
            ScalarKind::Float64 => Value::Float64(v),
            _ => Value::Empty,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Empty, Value::Empty) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int32(a), Value::Int32(b)) => a == b,
            (Value::Int64(a), Value::Int64(b)) => a == b,
            // Bitwise float equality so Eq, Ord and Hash agree: NaN equals
            // itself and values usable as keys stay findable.
            (Value::Float64(a), Value::Float64(b)) => a.total_cmp(b) == Ordering::Equal,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::DateTime(a), Value::DateTime(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Float64 hashes by bit pattern; callers using float keys accept
        // that -0.0 and 0.0 land in different buckets.
        match self {
            Value::Empty => 0u8.hash(state),
            Value::Bool(v) => {
                1u8.hash(state);
                v.hash(state);
            }
            Value::Int32(v) => {
                2u8.hash(state);
                v.hash(state);
            }
            Value::Int64(v) => {
                3u8.hash(state);
                v.hash(state);
            }
            Value::Float64(v) => {
                4u8.hash(state);
                v.to_bits().hash(state);
            }
            Value::Str(v) => {
                5u8.hash(state);
                v.hash(state);
            }
            Value::DateTime(v) => {
                6u8.hash(state);
                v.hash(state);
            }
        }
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Value::Empty, Value::Empty) => Ordering::Equal,
            // Empty sorts before everything
            (Value::Empty, _) => Ordering::Less,
            (_, Value::Empty) => Ordering::Greater,
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::Int32(a), Value::Int32(b)) => a.cmp(b),
            (Value::Int64(a), Value::Int64(b)) => a.cmp(b),
            (Value::Float64(a), Value::Float64(b)) => a.total_cmp(b),
            (Value::Str(a), Value::Str(b)) => a.cmp(b),
            (Value::DateTime(a), Value::DateTime(b)) => a.cmp(b),
            // Cross-kind comparison falls back to a fixed kind rank so the
            // order is total and deterministic.
            (a, b) => {
                let ra = a.kind().map(|k| k.rank()).unwrap_or(u8::MAX);
                let rb = b.kind().map(|k| k.rank()).unwrap_or(u8::MAX);
                ra.cmp(&rb)
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Empty => Ok(()),
            Value::Bool(v) => write!(f, "{}", v),
            Value::Int32(v) => write!(f, "{}", v),
            Value::Int64(v) => write!(f, "{}", v),
            Value::Float64(v) => write!(f, "{}", v),
            Value::Str(v) => write!(f, "{}", v),
            Value::DateTime(v) => write!(f, "{}", v),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int32(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int64(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float64(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(String::from(v))
    }
}
