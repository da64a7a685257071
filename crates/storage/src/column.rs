//! Typed and dynamically-typed column buffers.

use alloc::string::String;
use alloc::vec::Vec;
use tessella_core::{Error, Result, ScalarKind, Value};

/// A growable buffer of one scalar kind.
///
/// Each kind reserves one in-band sentinel standing in for the empty
/// value; the sentinel reads back as `Value::Empty`:
///
/// | kind       | sentinel   |
/// |------------|------------|
/// | `Bool`     | `false`    |
/// | `Int32`    | `i32::MIN` |
/// | `Int64`    | `i64::MIN` |
/// | `Float64`  | `f64::NAN` |
/// | `Str`      | `""`       |
/// | `DateTime` | `i64::MIN` |
///
/// Writing a sentinel-valued scalar is indistinguishable from writing
/// `Value::Empty`; callers needing the full domain of a kind use
/// [`AnyColumn`] instead.
#[derive(Clone, Debug)]
pub enum ColumnBuffer {
    Bool(Vec<bool>),
    Int32(Vec<i32>),
    Int64(Vec<i64>),
    Float64(Vec<f64>),
    Str(Vec<String>),
    DateTime(Vec<i64>),
}

impl ColumnBuffer {
    /// Creates an empty column of the given kind.
    pub fn new(kind: ScalarKind) -> Self {
        Self::with_capacity(kind, 0)
    }

    /// Creates an empty column of the given kind with reserved capacity.
    pub fn with_capacity(kind: ScalarKind, capacity: usize) -> Self {
        match kind {
            ScalarKind::Bool => ColumnBuffer::Bool(Vec::with_capacity(capacity)),
            ScalarKind::Int32 => ColumnBuffer::Int32(Vec::with_capacity(capacity)),
            ScalarKind::Int64 => ColumnBuffer::Int64(Vec::with_capacity(capacity)),
            ScalarKind::Float64 => ColumnBuffer::Float64(Vec::with_capacity(capacity)),
            ScalarKind::Str => ColumnBuffer::Str(Vec::with_capacity(capacity)),
            ScalarKind::DateTime => ColumnBuffer::DateTime(Vec::with_capacity(capacity)),
        }
    }

    /// The scalar kind this column stores.
    pub fn kind(&self) -> ScalarKind {
        match self {
            ColumnBuffer::Bool(_) => ScalarKind::Bool,
            ColumnBuffer::Int32(_) => ScalarKind::Int32,
            ColumnBuffer::Int64(_) => ScalarKind::Int64,
            ColumnBuffer::Float64(_) => ScalarKind::Float64,
            ColumnBuffer::Str(_) => ScalarKind::Str,
            ColumnBuffer::DateTime(_) => ScalarKind::DateTime,
        }
    }

    /// Number of cells, sentinels included.
    pub fn len(&self) -> usize {
        match self {
            ColumnBuffer::Bool(v) => v.len(),
            ColumnBuffer::Int32(v) => v.len(),
            ColumnBuffer::Int64(v) => v.len(),
            ColumnBuffer::Float64(v) => v.len(),
            ColumnBuffer::Str(v) => v.len(),
            ColumnBuffer::DateTime(v) => v.len(),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reads the cell at `index`; the sentinel reads back as `Value::Empty`.
    pub fn get(&self, index: usize) -> Value {
        match self {
            ColumnBuffer::Bool(v) => match v[index] {
                false => Value::Empty,
                b => Value::Bool(b),
            },
            ColumnBuffer::Int32(v) => match v[index] {
                i32::MIN => Value::Empty,
                n => Value::Int32(n),
            },
            ColumnBuffer::Int64(v) => match v[index] {
                i64::MIN => Value::Empty,
                n => Value::Int64(n),
            },
            ColumnBuffer::Float64(v) => {
                let f = v[index];
                if f.is_nan() {
                    Value::Empty
                } else {
                    Value::Float64(f)
                }
            }
            ColumnBuffer::Str(v) => {
                let s = &v[index];
                if s.is_empty() {
                    Value::Empty
                } else {
                    Value::Str(s.clone())
                }
            }
            ColumnBuffer::DateTime(v) => match v[index] {
                i64::MIN => Value::Empty,
                n => Value::DateTime(n),
            },
        }
    }

    /// Writes the cell at `index` and returns the displaced value.
    ///
    /// `Value::Empty` writes the sentinel; any other value must match the
    /// column's kind.
    pub fn set(&mut self, index: usize, value: Value) -> Result<Value> {
        if index >= self.len() {
            return Err(Error::index_out_of_bounds(index, self.len()));
        }
        self.check_kind(&value)?;
        let old = self.get(index);
        match (self, value) {
            (ColumnBuffer::Bool(v), Value::Bool(b)) => v[index] = b,
            (ColumnBuffer::Bool(v), Value::Empty) => v[index] = false,
            (ColumnBuffer::Int32(v), Value::Int32(n)) => v[index] = n,
            (ColumnBuffer::Int32(v), Value::Empty) => v[index] = i32::MIN,
            (ColumnBuffer::Int64(v), Value::Int64(n)) => v[index] = n,
            (ColumnBuffer::Int64(v), Value::Empty) => v[index] = i64::MIN,
            (ColumnBuffer::Float64(v), Value::Float64(f)) => v[index] = f,
            (ColumnBuffer::Float64(v), Value::Empty) => v[index] = f64::NAN,
            (ColumnBuffer::Str(v), Value::Str(s)) => v[index] = s,
            (ColumnBuffer::Str(v), Value::Empty) => v[index] = String::new(),
            (ColumnBuffer::DateTime(v), Value::DateTime(n)) => v[index] = n,
            (ColumnBuffer::DateTime(v), Value::Empty) => v[index] = i64::MIN,
            // check_kind rejected everything else
            _ => unreachable!(),
        }
        Ok(old)
    }

    /// Appends a value; `Value::Empty` appends the sentinel.
    pub fn push(&mut self, value: Value) -> Result<()> {
        self.check_kind(&value)?;
        match (self, value) {
            (ColumnBuffer::Bool(v), Value::Bool(b)) => v.push(b),
            (ColumnBuffer::Bool(v), Value::Empty) => v.push(false),
            (ColumnBuffer::Int32(v), Value::Int32(n)) => v.push(n),
            (ColumnBuffer::Int32(v), Value::Empty) => v.push(i32::MIN),
            (ColumnBuffer::Int64(v), Value::Int64(n)) => v.push(n),
            (ColumnBuffer::Int64(v), Value::Empty) => v.push(i64::MIN),
            (ColumnBuffer::Float64(v), Value::Float64(f)) => v.push(f),
            (ColumnBuffer::Float64(v), Value::Empty) => v.push(f64::NAN),
            (ColumnBuffer::Str(v), Value::Str(s)) => v.push(s),
            (ColumnBuffer::Str(v), Value::Empty) => v.push(String::new()),
            (ColumnBuffer::DateTime(v), Value::DateTime(n)) => v.push(n),
            (ColumnBuffer::DateTime(v), Value::Empty) => v.push(i64::MIN),
            _ => unreachable!(),
        }
        Ok(())
    }

    /// Removes the cell at `index`, shifting successors down.
    pub fn remove(&mut self, index: usize) -> Result<Value> {
        if index >= self.len() {
            return Err(Error::index_out_of_bounds(index, self.len()));
        }
        let old = self.get(index);
        match self {
            ColumnBuffer::Bool(v) => {
                v.remove(index);
            }
            ColumnBuffer::Int32(v) => {
                v.remove(index);
            }
            ColumnBuffer::Int64(v) => {
                v.remove(index);
            }
            ColumnBuffer::Float64(v) => {
                v.remove(index);
            }
            ColumnBuffer::Str(v) => {
                v.remove(index);
            }
            ColumnBuffer::DateTime(v) => {
                v.remove(index);
            }
        }
        Ok(old)
    }

    /// Grows or shrinks to `len`; new cells hold the sentinel.
    pub fn resize(&mut self, len: usize) {
        match self {
            ColumnBuffer::Bool(v) => v.resize(len, false),
            ColumnBuffer::Int32(v) => v.resize(len, i32::MIN),
            ColumnBuffer::Int64(v) => v.resize(len, i64::MIN),
            ColumnBuffer::Float64(v) => v.resize(len, f64::NAN),
            ColumnBuffer::Str(v) => v.resize(len, String::new()),
            ColumnBuffer::DateTime(v) => v.resize(len, i64::MIN),
        }
    }

    /// Removes all cells.
    pub fn clear(&mut self) {
        match self {
            ColumnBuffer::Bool(v) => v.clear(),
            ColumnBuffer::Int32(v) => v.clear(),
            ColumnBuffer::Int64(v) => v.clear(),
            ColumnBuffer::Float64(v) => v.clear(),
            ColumnBuffer::Str(v) => v.clear(),
            ColumnBuffer::DateTime(v) => v.clear(),
        }
    }

    /// Reads every cell into owned values.
    pub fn values(&self) -> Vec<Value> {
        (0..self.len()).map(|i| self.get(i)).collect()
    }

    fn check_kind(&self, value: &Value) -> Result<()> {
        match value.kind() {
            None => Ok(()),
            Some(k) if k == self.kind() => Ok(()),
            Some(k) => Err(Error::kind_mismatch(self.kind(), k)),
        }
    }
}

/// A dynamically-typed column holding `Value`s directly.
///
/// Used where a cache must hold mixed kinds, or where a kind's sentinel
/// value itself must be storable.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AnyColumn {
    cells: Vec<Value>,
}

impl AnyColumn {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            cells: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Reads the cell at `index`.
    pub fn get(&self, index: usize) -> Value {
        self.cells[index].clone()
    }

    /// Writes the cell at `index` and returns the displaced value.
    pub fn set(&mut self, index: usize, value: Value) -> Result<Value> {
        if index >= self.cells.len() {
            return Err(Error::index_out_of_bounds(index, self.cells.len()));
        }
        Ok(core::mem::replace(&mut self.cells[index], value))
    }

    pub fn push(&mut self, value: Value) {
        self.cells.push(value);
    }

    /// Removes the cell at `index`, shifting successors down.
    pub fn remove(&mut self, index: usize) -> Result<Value> {
        if index >= self.cells.len() {
            return Err(Error::index_out_of_bounds(index, self.cells.len()));
        }
        Ok(self.cells.remove(index))
    }

    /// Grows or shrinks to `len`; new cells hold `Value::Empty`.
    pub fn resize(&mut self, len: usize) {
        self.cells.resize(len, Value::Empty);
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }

    /// The cells as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[Value] {
        &self.cells
    }
}

impl FromIterator<Value> for AnyColumn {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().collect(),
        }
    }
}
