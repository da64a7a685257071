//! Scalar kind definitions for the Tessella data engine.
//!
//! This module defines the closed set of scalar kinds a cell can hold and
//! the static numeric promotion table used when two differently-kinded
//! operands are combined.

/// Scalar kinds supported by the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    /// Boolean (true/false)
    Bool,
    /// 32-bit signed integer
    Int32,
    /// 64-bit signed integer
    Int64,
    /// 64-bit floating point number
    Float64,
    /// UTF-8 string
    Str,
    /// Date and time stored as Unix timestamp (milliseconds)
    DateTime,
}

impl ScalarKind {
    /// Returns whether values of this kind participate in arithmetic.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            ScalarKind::Int32 | ScalarKind::Int64 | ScalarKind::Float64
        )
    }

    /// Returns whether values of this kind have a total order.
    ///
    /// Every kind is ordered; Float64 orders NaN after all other values.
    pub fn is_ordered(&self) -> bool {
        true
    }

    /// Resolves the envelope kind for combining two numeric operands.
    ///
    /// The table is static and pairwise; it is consulted once, when an
    /// operation is constructed, never per element. Returns `None` when
    /// either operand is non-numeric.
    pub fn promote(left: ScalarKind, right: ScalarKind) -> Option<ScalarKind> {
        use ScalarKind::*;
        match (left, right) {
            (Int32, Int32) => Some(Int32),
            (Int32, Int64) | (Int64, Int32) | (Int64, Int64) => Some(Int64),
            (Float64, Int32) | (Float64, Int64) | (Int32, Float64) | (Int64, Float64) => {
                Some(Float64)
            }
            (Float64, Float64) => Some(Float64),
            _ => None,
        }
    }

    /// Rank used to order values of different kinds deterministically.
    pub(crate) fn rank(&self) -> u8 {
        match self {
            ScalarKind::Bool => 0,
            ScalarKind::Int32 => 1,
            ScalarKind::Int64 => 2,
            ScalarKind::Float64 => 3,
            ScalarKind::Str => 4,
            ScalarKind::DateTime => 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_numeric() {
        assert!(ScalarKind::Int32.is_numeric());
        assert!(ScalarKind::Int64.is_numeric());
        assert!(ScalarKind::Float64.is_numeric());
        assert!(!ScalarKind::Bool.is_numeric());
        assert!(!ScalarKind::Str.is_numeric());
        assert!(!ScalarKind::DateTime.is_numeric());
    }

    #[test]
    fn test_promote_numeric() {
        use ScalarKind::*;
        assert_eq!(ScalarKind::promote(Int32, Int32), Some(Int32));
        assert_eq!(ScalarKind::promote(Int32, Int64), Some(Int64));
        assert_eq!(ScalarKind::promote(Int64, Int32), Some(Int64));
        assert_eq!(ScalarKind::promote(Int64, Float64), Some(Float64));
        assert_eq!(ScalarKind::promote(Float64, Float64), Some(Float64));
    }

    #[test]
    fn test_promote_non_numeric() {
        use ScalarKind::*;
        assert_eq!(ScalarKind::promote(Str, Int32), None);
        assert_eq!(ScalarKind::promote(Bool, Bool), None);
        assert_eq!(ScalarKind::promote(DateTime, Float64), None);
    }

    #[test]
    fn test_promote_symmetry() {
        use ScalarKind::*;
        let kinds = [Bool, Int32, Int64, Float64, Str, DateTime];
        for &a in &kinds {
            for &b in &kinds {
                assert_eq!(ScalarKind::promote(a, b), ScalarKind::promote(b, a));
            }
        }
    }
}
