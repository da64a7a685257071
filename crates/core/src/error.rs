//! Error types for the Tessella data engine.

use crate::kind::ScalarKind;
use core::fmt;

/// Result type alias for Tessella operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Error types for Tessella engine operations.
///
/// Recoverable failures surface as `Err` at the call site. Mismatched
/// begin/finish changer pairing is a fatal programmer error and panics
/// instead; see `tessella-notify`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// Positional access outside `[0, len)`.
    IndexOutOfBounds {
        index: usize,
        len: usize,
    },
    /// Insertion of an element already present in a unique collection;
    /// `index` is the position of the existing occurrence.
    DuplicateElement {
        index: usize,
    },
    /// Mutator invoked through an unmodifiable view.
    ReadOnly,
    /// Lookup of a key with no entry.
    KeyNotFound,
    /// Numeric combination of operand kinds with no envelope kind.
    IncompatibleKinds {
        left: ScalarKind,
        right: ScalarKind,
    },
    /// Numeric operation attempted on non-numeric data.
    NotNumeric {
        kind: Option<ScalarKind>,
    },
    /// Typed column written with a value of the wrong kind.
    KindMismatch {
        expected: ScalarKind,
        got: ScalarKind,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::IndexOutOfBounds { index, len } => {
                write!(f, "Index {} out of bounds for length {}", index, len)
            }
            Error::DuplicateElement { index } => {
                write!(f, "Element already present at index {}", index)
            }
            Error::ReadOnly => {
                write!(f, "Collection is unmodifiable")
            }
            Error::KeyNotFound => {
                write!(f, "Key not found")
            }
            Error::IncompatibleKinds { left, right } => {
                write!(f, "No envelope kind for {:?} and {:?}", left, right)
            }
            Error::NotNumeric { kind } => {
                write!(f, "Numeric operation on non-numeric data: {:?}", kind)
            }
            Error::KindMismatch { expected, got } => {
                write!(f, "Kind mismatch: expected {:?}, got {:?}", expected, got)
            }
        }
    }
}

impl Error {
    /// Creates an index out of bounds error.
    pub fn index_out_of_bounds(index: usize, len: usize) -> Self {
        Error::IndexOutOfBounds { index, len }
    }

    /// Creates a duplicate element error pointing at the existing occurrence.
    pub fn duplicate_element(index: usize) -> Self {
        Error::DuplicateElement { index }
    }

    /// Creates an incompatible kinds error.
    pub fn incompatible_kinds(left: ScalarKind, right: ScalarKind) -> Self {
        Error::IncompatibleKinds { left, right }
    }

    /// Creates a not numeric error.
    pub fn not_numeric(kind: Option<ScalarKind>) -> Self {
        Error::NotNumeric { kind }
    }

    /// Creates a kind mismatch error.
    pub fn kind_mismatch(expected: ScalarKind, got: ScalarKind) -> Self {
        Error::KindMismatch { expected, got }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn test_error_display() {
        let err = Error::index_out_of_bounds(5, 3);
        assert!(err.to_string().contains("out of bounds"));

        let err = Error::duplicate_element(2);
        assert!(err.to_string().contains("already present"));

        let err = Error::kind_mismatch(ScalarKind::Int32, ScalarKind::Str);
        assert!(err.to_string().contains("Kind mismatch"));
    }

    #[test]
    fn test_error_constructors() {
        let err = Error::incompatible_kinds(ScalarKind::Str, ScalarKind::Int32);
        match err {
            Error::IncompatibleKinds { left, .. } => assert_eq!(left, ScalarKind::Str),
            _ => panic!("Wrong error type"),
        }
    }
}
