//! The labeled value sequence every view reads from and every cached view
//! writes into.

use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::fmt;
use tessella_core::{Error, Result, ScalarKind, Value};
use tessella_notify::{Change, Changer, NodeId, NotifyGraph};
use tessella_storage::{AnyColumn, ColumnBuffer};

enum Cells {
    Typed(ColumnBuffer),
    Any(AnyColumn),
}

impl Cells {
    fn kind(&self) -> Option<ScalarKind> {
        match self {
            Cells::Typed(c) => Some(c.kind()),
            Cells::Any(_) => None,
        }
    }

    fn len(&self) -> usize {
        match self {
            Cells::Typed(c) => c.len(),
            Cells::Any(c) => c.len(),
        }
    }

    fn get(&self, index: usize) -> Value {
        match self {
            Cells::Typed(c) => c.get(index),
            Cells::Any(c) => c.get(index),
        }
    }

    fn set(&mut self, index: usize, value: Value) -> Result<Value> {
        match self {
            Cells::Typed(c) => c.set(index, value),
            Cells::Any(c) => c.set(index, value),
        }
    }

    fn push(&mut self, value: Value) -> Result<()> {
        match self {
            Cells::Typed(c) => c.push(value),
            Cells::Any(c) => {
                c.push(value);
                Ok(())
            }
        }
    }

    fn remove(&mut self, index: usize) -> Result<Value> {
        match self {
            Cells::Typed(c) => c.remove(index),
            Cells::Any(c) => c.remove(index),
        }
    }

    fn resize(&mut self, len: usize) {
        match self {
            Cells::Typed(c) => c.resize(len),
            Cells::Any(c) => c.resize(len),
        }
    }

    fn clear(&mut self) {
        match self {
            Cells::Typed(c) => c.clear(),
            Cells::Any(c) => c.clear(),
        }
    }

    fn values(&self) -> Vec<Value> {
        match self {
            Cells::Typed(c) => c.values(),
            Cells::Any(c) => c.as_slice().to_vec(),
        }
    }
}

/// A labeled value sequence bound to a node in a `NotifyGraph`.
///
/// Every mutator runs the transaction protocol: open a transaction on the
/// series node, mutate, record a change tag only when the stored content
/// actually changed, close the transaction. Storing a value equal to the
/// current one fires no event.
///
/// A series compares by identity (its node id), not by content: it is a
/// mutable node, and content equality of two live sequences is a
/// transient observation.
pub struct Series {
    graph: Rc<NotifyGraph>,
    node: NodeId,
    changer: Changer,
    label: String,
    cells: RefCell<Cells>,
}

impl Series {
    /// Creates an empty series whose cells hold one scalar kind.
    pub fn typed(graph: Rc<NotifyGraph>, label: impl Into<String>, kind: ScalarKind) -> Self {
        Self::build(graph, label.into(), Cells::Typed(ColumnBuffer::new(kind)))
    }

    /// Creates an empty series whose cells hold any mix of kinds.
    pub fn untyped(graph: Rc<NotifyGraph>, label: impl Into<String>) -> Self {
        Self::build(graph, label.into(), Cells::Any(AnyColumn::new()))
    }

    /// Creates an untyped series seeded with the given values.
    pub fn from_values<I>(graph: Rc<NotifyGraph>, label: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = Value>,
    {
        let column: AnyColumn = values.into_iter().collect();
        Self::build(graph, label.into(), Cells::Any(column))
    }

    fn build(graph: Rc<NotifyGraph>, label: String, cells: Cells) -> Self {
        let node = graph.add_node();
        let changer = graph.changer();
        Self {
            graph,
            node,
            changer,
            label,
            cells: RefCell::new(cells),
        }
    }

    /// The series label.
    #[inline]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The series' node in the notification graph.
    #[inline]
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// The graph this series is bound to.
    #[inline]
    pub fn graph(&self) -> &Rc<NotifyGraph> {
        &self.graph
    }

    /// The cell kind, or None for an untyped series.
    pub fn kind(&self) -> Option<ScalarKind> {
        self.cells.borrow().kind()
    }

    pub fn len(&self) -> usize {
        self.cells.borrow().len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reads the cell at `index`.
    pub fn get(&self, index: usize) -> Result<Value> {
        let cells = self.cells.borrow();
        if index >= cells.len() {
            return Err(Error::index_out_of_bounds(index, cells.len()));
        }
        Ok(cells.get(index))
    }

    /// Reads every cell into owned values.
    pub fn values(&self) -> Vec<Value> {
        self.cells.borrow().values()
    }

    /// Writes the cell at `index` and returns the displaced value.
    ///
    /// Storing a value equal to the current one is a complete no-op: no
    /// transaction opens and no event fires.
    pub fn set(&self, index: usize, value: Value) -> Result<Value> {
        {
            let cells = self.cells.borrow();
            if index >= cells.len() {
                return Err(Error::index_out_of_bounds(index, cells.len()));
            }
            if cells.get(index) == value {
                return Ok(value);
            }
        }
        self.graph.begin_changes(self.node, self.changer);
        let result = self.cells.borrow_mut().set(index, value);
        if result.is_ok() {
            self.graph.set_data_changed(self.node, Change::Value);
        }
        self.graph.finish_changes(self.node, self.changer);
        result
    }

    /// Appends a value.
    pub fn push(&self, value: Value) -> Result<()> {
        self.graph.begin_changes(self.node, self.changer);
        let result = self.cells.borrow_mut().push(value);
        if result.is_ok() {
            self.graph.set_data_changed(self.node, Change::Insert);
        }
        self.graph.finish_changes(self.node, self.changer);
        result
    }

    /// Removes the cell at `index`, shifting successors down.
    pub fn remove_at(&self, index: usize) -> Result<Value> {
        {
            let cells = self.cells.borrow();
            if index >= cells.len() {
                return Err(Error::index_out_of_bounds(index, cells.len()));
            }
        }
        self.graph.begin_changes(self.node, self.changer);
        let result = self.cells.borrow_mut().remove(index);
        if result.is_ok() {
            self.graph.set_data_changed(self.node, Change::Remove);
        }
        self.graph.finish_changes(self.node, self.changer);
        result
    }

    /// Grows or shrinks to `len`; new cells hold the empty value.
    ///
    /// A no-op when the length already matches.
    pub fn resize(&self, len: usize) {
        if self.len() == len {
            return;
        }
        self.graph.begin_changes(self.node, self.changer);
        self.cells.borrow_mut().resize(len);
        self.graph.set_data_changed(self.node, Change::Resize);
        self.graph.finish_changes(self.node, self.changer);
    }

    /// Removes every cell.
    pub fn clear(&self) {
        if self.is_empty() {
            return;
        }
        self.graph.begin_changes(self.node, self.changer);
        self.cells.borrow_mut().clear();
        self.graph.set_data_changed(self.node, Change::Remove);
        self.graph.finish_changes(self.node, self.changer);
    }

    /// Writes the cell at `index` without opening a transaction or
    /// recording a tag.
    ///
    /// For seeding a cache before it has observers; ordinary writes go
    /// through `set`.
    pub fn set_quiet(&self, index: usize, value: Value) -> Result<Value> {
        self.cells.borrow_mut().set(index, value)
    }
}

impl fmt::Debug for Series {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Series")
            .field("label", &self.label)
            .field("node", &self.node)
            .field("len", &self.len())
            .finish()
    }
}

/// Identity comparison: two handles are equal when they are the same node.
impl PartialEq for Series {
    fn eq(&self, other: &Self) -> bool {
        self.node == other.node
    }
}

impl Eq for Series {}

impl Drop for Series {
    fn drop(&mut self) {
        self.graph.remove_node(self.node);
    }
}
