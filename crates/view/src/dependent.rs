//! The lazy invalidate/recompute protocol shared by every cached view.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::Cell;
use tessella_notify::{ListenerId, NodeId, NotifyGraph};

/// Dirty-flag plumbing for a view with a fixed upstream set.
///
/// The upstream set is fixed at construction. A listener on every upstream
/// node sets the dirty flag synchronously when that node fires; the flag
/// starts **true** so the first read always computes. Recomputation itself
/// is the owning view's business, exposed here only as the `ensure_fresh`
/// seam.
pub struct DependentCore {
    graph: Rc<NotifyGraph>,
    dirty: Rc<Cell<bool>>,
    subscriptions: Vec<(NodeId, ListenerId)>,
}

impl DependentCore {
    /// Subscribes to every upstream node; the view starts dirty.
    pub fn new(graph: Rc<NotifyGraph>, upstream: &[NodeId]) -> Self {
        let dirty = Rc::new(Cell::new(true));
        let subscriptions = upstream
            .iter()
            .map(|&node| {
                let flag = dirty.clone();
                let id = graph.subscribe(node, move |_| flag.set(true));
                (node, id)
            })
            .collect();
        Self {
            graph,
            dirty,
            subscriptions,
        }
    }

    /// Returns true if an upstream changed since the last refresh.
    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty.get()
    }

    /// Forces the next read to recompute.
    #[inline]
    pub fn mark_dirty(&self) {
        self.dirty.set(true);
    }

    /// Runs `refresh` if the view is dirty, at most once per dirty period.
    ///
    /// The flag is cleared *before* `refresh` runs, so a re-entrant read
    /// issued from inside the refresh sees the view as already clean and
    /// does not recompute a second time.
    pub fn ensure_fresh(&self, refresh: impl FnOnce()) {
        if self.dirty.get() {
            self.dirty.set(false);
            refresh();
        }
    }
}

impl Drop for DependentCore {
    fn drop(&mut self) {
        for (node, id) in &self.subscriptions {
            self.graph.unsubscribe(*node, *id);
        }
    }
}
