//! The node arena and per-node transaction engine.
//!
//! Nodes are represented by stable integer identifiers in an arena.
//! Containment is an adjacency list of identifiers, and transaction
//! snapshots copy identifier lists rather than object graphs, so the
//! containment relation may freely contain back-references without
//! creating ownership cycles.

use crate::change::{Change, ChangeEvent, ChangeMask};
use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};
use hashbrown::HashSet;

/// Stable identifier of a node in the notification graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Opaque token identifying who is performing a batch of changes.
///
/// Tokens are minted by `NotifyGraph::changer`; a changer may nest its own
/// transactions, and `finish_changes` verifies LIFO pairing against it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Changer(u64);

/// Identifier of a registered listener.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

struct ListenerEntry {
    id: ListenerId,
    callback: Box<dyn Fn(&ChangeEvent)>,
}

/// Per-node state held in the arena.
struct NodeState {
    /// Nodes that semantically hold this one. Non-owning; attach order.
    containers: Vec<NodeId>,
    /// Listeners in registration order. Entries are shared so dispatch can
    /// snapshot the list and invoke callbacks without holding a borrow.
    listeners: Vec<Rc<ListenerEntry>>,
    /// Tags accumulated since the previous fired event.
    pending: ChangeMask,
    /// Active transactions, each paired with the container snapshot taken
    /// when that changer's transaction reached this node.
    changer_stack: Vec<(Changer, Vec<NodeId>)>,
}

impl NodeState {
    fn new() -> Self {
        Self {
            containers: Vec::new(),
            listeners: Vec::new(),
            pending: ChangeMask::new(),
            changer_stack: Vec::new(),
        }
    }
}

/// The change-notification graph.
///
/// All methods take `&self`: state lives behind interior mutability and no
/// borrow is held while listener callbacks run, so callbacks may re-enter
/// the graph (subscribe, open transactions, record further changes).
///
/// Single-writer discipline: the per-node changer stack is the lock in
/// this single-threaded engine. Independent changers whose transactions
/// interleave on a shared node violate LIFO pairing and abort; callers
/// must serialize transactions that touch shared nodes.
pub struct NotifyGraph {
    nodes: RefCell<Vec<Option<NodeState>>>,
    free: RefCell<Vec<u32>>,
    next_changer: Cell<u64>,
    next_listener: Cell<u64>,
}

impl Default for NotifyGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl NotifyGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self {
            nodes: RefCell::new(Vec::new()),
            free: RefCell::new(Vec::new()),
            next_changer: Cell::new(1),
            next_listener: Cell::new(1),
        }
    }

    /// Mints a fresh changer token.
    pub fn changer(&self) -> Changer {
        let id = self.next_changer.get();
        self.next_changer.set(id + 1);
        Changer(id)
    }

    /// Allocates a node and returns its stable identifier.
    pub fn add_node(&self) -> NodeId {
        let mut nodes = self.nodes.borrow_mut();
        if let Some(index) = self.free.borrow_mut().pop() {
            nodes[index as usize] = Some(NodeState::new());
            return NodeId(index);
        }
        nodes.push(Some(NodeState::new()));
        NodeId((nodes.len() - 1) as u32)
    }

    /// Releases a node, detaching it from every container list.
    ///
    /// Listener registrations on the node are dropped with it; explicit
    /// deregistration beforehand is recommended but not required.
    pub fn remove_node(&self, node: NodeId) {
        let mut nodes = self.nodes.borrow_mut();
        if nodes.get_mut(node.index()).map(|s| s.take()).is_none() {
            return;
        }
        for state in nodes.iter_mut().flatten() {
            state.containers.retain(|&c| c != node);
        }
        self.free.borrow_mut().push(node.0);
    }

    /// Returns true if the identifier addresses a live node.
    pub fn contains_node(&self, node: NodeId) -> bool {
        self.nodes
            .borrow()
            .get(node.index())
            .map(|s| s.is_some())
            .unwrap_or(false)
    }

    /// Returns the number of live nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.borrow().iter().filter(|s| s.is_some()).count()
    }

    // ---------------------------------------------------------------
    // Containment
    // ---------------------------------------------------------------

    /// Records that `container` semantically holds `node`.
    ///
    /// The relation is non-owning and may be changed at any time, including
    /// in the middle of an open transaction. Attaching twice is a no-op.
    pub fn add_container(&self, node: NodeId, container: NodeId) {
        let mut nodes = self.nodes.borrow_mut();
        if let Some(Some(state)) = nodes.get_mut(node.index()) {
            if !state.containers.contains(&container) {
                state.containers.push(container);
            }
        }
    }

    /// Removes a containment edge. Returns true if it existed.
    pub fn remove_container(&self, node: NodeId, container: NodeId) -> bool {
        let mut nodes = self.nodes.borrow_mut();
        if let Some(Some(state)) = nodes.get_mut(node.index()) {
            let before = state.containers.len();
            state.containers.retain(|&c| c != container);
            return state.containers.len() != before;
        }
        false
    }

    /// Returns the current container set of the node.
    pub fn containers(&self, node: NodeId) -> Vec<NodeId> {
        self.nodes
            .borrow()
            .get(node.index())
            .and_then(|s| s.as_ref())
            .map(|s| s.containers.clone())
            .unwrap_or_default()
    }

    // ---------------------------------------------------------------
    // Listeners
    // ---------------------------------------------------------------

    /// Registers a listener on the node. Listeners are dispatched in
    /// registration order.
    pub fn subscribe<F>(&self, node: NodeId, callback: F) -> ListenerId
    where
        F: Fn(&ChangeEvent) + 'static,
    {
        let id = ListenerId(self.next_listener.get());
        self.next_listener.set(id.0 + 1);
        let mut nodes = self.nodes.borrow_mut();
        if let Some(Some(state)) = nodes.get_mut(node.index()) {
            state.listeners.push(Rc::new(ListenerEntry {
                id,
                callback: Box::new(callback),
            }));
        }
        id
    }

    /// Removes a listener registration. Returns true if it existed.
    pub fn unsubscribe(&self, node: NodeId, listener: ListenerId) -> bool {
        let mut nodes = self.nodes.borrow_mut();
        if let Some(Some(state)) = nodes.get_mut(node.index()) {
            let before = state.listeners.len();
            state.listeners.retain(|l| l.id != listener);
            return state.listeners.len() != before;
        }
        false
    }

    /// Returns the number of listeners registered on the node.
    pub fn listener_count(&self, node: NodeId) -> usize {
        self.nodes
            .borrow()
            .get(node.index())
            .and_then(|s| s.as_ref())
            .map(|s| s.listeners.len())
            .unwrap_or(0)
    }

    // ---------------------------------------------------------------
    // Transactions
    // ---------------------------------------------------------------

    /// Opens a transaction on the node for the changer.
    ///
    /// Pushes the changer together with a snapshot of the *current*
    /// container set, then recursively opens the same changer's transaction
    /// on every container in that snapshot. The snapshot guarantees
    /// begin/finish symmetry even when containment changes mid-transaction.
    ///
    /// The climb is cycle-guarded like propagation: each call opens one
    /// frame per reachable node, however many containment paths (or
    /// back-references) lead to it.
    pub fn begin_changes(&self, node: NodeId, changer: Changer) {
        let mut visited = HashSet::new();
        self.begin_inner(node, changer, &mut visited);
    }

    fn begin_inner(&self, node: NodeId, changer: Changer, visited: &mut HashSet<NodeId>) {
        if !visited.insert(node) {
            return;
        }
        let snapshot = {
            let mut nodes = self.nodes.borrow_mut();
            match nodes.get_mut(node.index()).and_then(|s| s.as_mut()) {
                Some(state) => {
                    let snapshot = state.containers.clone();
                    state.changer_stack.push((changer, snapshot.clone()));
                    snapshot
                }
                None => return,
            }
        };
        for container in snapshot {
            self.begin_inner(container, changer, visited);
        }
    }

    /// Records a change tag against the node and propagates it upward.
    ///
    /// Propagation walks the *live* container set, not the transaction
    /// snapshot, so containers attached mid-transaction still learn of
    /// subsequent changes. Any visited node whose changer stack is empty
    /// fires its coalesced event immediately.
    pub fn set_data_changed(&self, node: NodeId, change: Change) {
        let mut visited = HashSet::new();
        self.propagate(node, change, &mut visited);
    }

    fn propagate(&self, node: NodeId, change: Change, visited: &mut HashSet<NodeId>) {
        // The containment relation may carry back-references; the visited
        // set keeps live-set propagation from looping. Tag accumulation is
        // idempotent, so visiting once is enough.
        if !visited.insert(node) {
            return;
        }
        let (containers, fire) = {
            let mut nodes = self.nodes.borrow_mut();
            match nodes.get_mut(node.index()).and_then(|s| s.as_mut()) {
                Some(state) => {
                    state.pending.insert(change);
                    (state.containers.clone(), state.changer_stack.is_empty())
                }
                None => return,
            }
        };
        for container in containers {
            self.propagate(container, change, visited);
        }
        if fire {
            self.fire(node);
        }
    }

    /// Closes the changer's transaction on the node.
    ///
    /// Panics if `changer` is not the top of the node's changer stack:
    /// mismatched begin/finish pairing is a programmer error, not a
    /// recoverable condition. When the stack returns to empty the node
    /// fires one event carrying the accumulated tag union, then the close
    /// recurses over the container snapshot taken by the matching
    /// `begin_changes`. The unwind visits each node once, mirroring the
    /// cycle guard on the open side.
    pub fn finish_changes(&self, node: NodeId, changer: Changer) {
        let mut visited = HashSet::new();
        self.finish_inner(node, changer, &mut visited);
    }

    fn finish_inner(&self, node: NodeId, changer: Changer, visited: &mut HashSet<NodeId>) {
        if !visited.insert(node) {
            return;
        }
        let (snapshot, now_idle) = {
            let mut nodes = self.nodes.borrow_mut();
            let state = match nodes.get_mut(node.index()).and_then(|s| s.as_mut()) {
                Some(state) => state,
                None => return,
            };
            match state.changer_stack.last() {
                Some((top, _)) if *top == changer => {}
                Some((top, _)) => panic!(
                    "finish_changes: changer {:?} does not match open transaction {:?}; \
                     begin/finish pairs must unwind in LIFO order",
                    changer, top
                ),
                None => panic!(
                    "finish_changes: no open transaction on node {:?} for changer {:?}",
                    node, changer
                ),
            }
            let snapshot = state.changer_stack.pop().map(|(_, s)| s).unwrap_or_default();
            let now_idle = state.changer_stack.is_empty();
            (snapshot, now_idle)
        };
        if now_idle {
            self.fire(node);
        }
        for container in snapshot {
            self.finish_inner(container, changer, visited);
        }
    }

    /// Returns true if the node has an open transaction.
    pub fn in_transaction(&self, node: NodeId) -> bool {
        self.nodes
            .borrow()
            .get(node.index())
            .and_then(|s| s.as_ref())
            .map(|s| !s.changer_stack.is_empty())
            .unwrap_or(false)
    }

    /// Returns the tags recorded since the node's previous event.
    pub fn pending_changes(&self, node: NodeId) -> ChangeMask {
        self.nodes
            .borrow()
            .get(node.index())
            .and_then(|s| s.as_ref())
            .map(|s| s.pending)
            .unwrap_or_default()
    }

    /// Fires the node's coalesced event if any tags are pending.
    ///
    /// The listener list is snapshotted before invocation, so callbacks
    /// may subscribe, unsubscribe or open new transactions reentrantly;
    /// such mutations take effect from the next event on.
    fn fire(&self, node: NodeId) {
        let (mask, listeners) = {
            let mut nodes = self.nodes.borrow_mut();
            let state = match nodes.get_mut(node.index()).and_then(|s| s.as_mut()) {
                Some(state) => state,
                None => return,
            };
            if state.pending.is_empty() {
                return;
            }
            let mask = core::mem::take(&mut state.pending);
            (mask, state.listeners.clone())
        };
        let event = ChangeEvent {
            source: node,
            changes: mask,
        };
        for listener in listeners {
            (listener.callback)(&event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use core::cell::RefCell;

    /// Collects fired events for assertions.
    fn recorder(
        graph: &NotifyGraph,
        node: NodeId,
    ) -> Rc<RefCell<Vec<ChangeEvent>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = log.clone();
        graph.subscribe(node, move |event| sink.borrow_mut().push(*event));
        log
    }

    #[test]
    fn test_add_remove_node() {
        let graph = NotifyGraph::new();
        let a = graph.add_node();
        let b = graph.add_node();
        assert_ne!(a, b);
        assert_eq!(graph.node_count(), 2);

        graph.remove_node(a);
        assert!(!graph.contains_node(a));
        assert!(graph.contains_node(b));

        // Slot is recycled but the id stays stable per allocation.
        let c = graph.add_node();
        assert_eq!(graph.node_count(), 2);
        assert!(graph.contains_node(c));
    }

    #[test]
    fn test_containers_no_duplicates() {
        let graph = NotifyGraph::new();
        let child = graph.add_node();
        let parent = graph.add_node();
        graph.add_container(child, parent);
        graph.add_container(child, parent);
        assert_eq!(graph.containers(child), vec![parent]);
        assert!(graph.remove_container(child, parent));
        assert!(!graph.remove_container(child, parent));
    }

    #[test]
    fn test_change_outside_transaction_fires_immediately() {
        let graph = NotifyGraph::new();
        let node = graph.add_node();
        let log = recorder(&graph, node);

        graph.set_data_changed(node, Change::Value);
        assert_eq!(log.borrow().len(), 1);
        assert!(log.borrow()[0].changes.contains(Change::Value));
        assert_eq!(log.borrow()[0].source, node);
    }

    #[test]
    fn test_transaction_coalesces_tags() {
        let graph = NotifyGraph::new();
        let node = graph.add_node();
        let log = recorder(&graph, node);

        let changer = graph.changer();
        graph.begin_changes(node, changer);
        graph.set_data_changed(node, Change::Value);
        graph.set_data_changed(node, Change::Insert);
        graph.set_data_changed(node, Change::Value);
        assert!(log.borrow().is_empty());
        graph.finish_changes(node, changer);

        let events = log.borrow();
        assert_eq!(events.len(), 1);
        assert!(events[0].changes.contains(Change::Value));
        assert!(events[0].changes.contains(Change::Insert));
        assert_eq!(events[0].changes.len(), 2);
    }

    #[test]
    fn test_nested_same_changer_fires_once() {
        let graph = NotifyGraph::new();
        let node = graph.add_node();
        let log = recorder(&graph, node);

        let changer = graph.changer();
        graph.begin_changes(node, changer);
        graph.begin_changes(node, changer);
        graph.set_data_changed(node, Change::Insert);
        graph.finish_changes(node, changer);
        // Inner finish: stack not yet empty, no event.
        assert!(log.borrow().is_empty());
        graph.set_data_changed(node, Change::Remove);
        graph.finish_changes(node, changer);

        let events = log.borrow();
        assert_eq!(events.len(), 1);
        assert!(events[0].changes.contains(Change::Insert));
        assert!(events[0].changes.contains(Change::Remove));
    }

    #[test]
    fn test_finish_without_changes_fires_nothing() {
        let graph = NotifyGraph::new();
        let node = graph.add_node();
        let log = recorder(&graph, node);

        let changer = graph.changer();
        graph.begin_changes(node, changer);
        graph.finish_changes(node, changer);
        assert!(log.borrow().is_empty());
    }

    #[test]
    #[should_panic(expected = "LIFO")]
    fn test_mismatched_changer_panics() {
        let graph = NotifyGraph::new();
        let node = graph.add_node();
        let a = graph.changer();
        let b = graph.changer();
        graph.begin_changes(node, a);
        graph.begin_changes(node, b);
        graph.finish_changes(node, a);
    }

    #[test]
    #[should_panic(expected = "no open transaction")]
    fn test_finish_without_begin_panics() {
        let graph = NotifyGraph::new();
        let node = graph.add_node();
        let changer = graph.changer();
        graph.finish_changes(node, changer);
    }

    #[test]
    fn test_transaction_climbs_containment() {
        let graph = NotifyGraph::new();
        let series = graph.add_node();
        let table = graph.add_node();
        graph.add_container(series, table);
        let series_log = recorder(&graph, series);
        let table_log = recorder(&graph, table);

        let changer = graph.changer();
        graph.begin_changes(series, changer);
        assert!(graph.in_transaction(table));
        graph.set_data_changed(series, Change::Value);
        assert!(table_log.borrow().is_empty());
        graph.finish_changes(series, changer);

        assert_eq!(series_log.borrow().len(), 1);
        assert_eq!(table_log.borrow().len(), 1);
        assert_eq!(table_log.borrow()[0].source, table);
        assert!(table_log.borrow()[0].changes.contains(Change::Value));
    }

    #[test]
    fn test_container_attached_mid_transaction_sees_later_changes() {
        let graph = NotifyGraph::new();
        let series = graph.add_node();
        let early = graph.add_node();
        let late = graph.add_node();
        graph.add_container(series, early);
        let late_log = recorder(&graph, late);

        let changer = graph.changer();
        graph.begin_changes(series, changer);
        graph.set_data_changed(series, Change::Insert);
        // Attached mid-transaction: not in the begin snapshot, but the
        // live set delivers subsequent tags.
        graph.add_container(series, late);
        graph.set_data_changed(series, Change::Value);
        graph.finish_changes(series, changer);

        // `late` never entered a transaction, so the tag fired on arrival.
        let events = late_log.borrow();
        assert_eq!(events.len(), 1);
        assert!(events[0].changes.contains(Change::Value));
        assert!(!events[0].changes.contains(Change::Insert));
    }

    #[test]
    fn test_container_detached_mid_transaction_still_finished() {
        let graph = NotifyGraph::new();
        let series = graph.add_node();
        let table = graph.add_node();
        graph.add_container(series, table);
        let table_log = recorder(&graph, table);

        let changer = graph.changer();
        graph.begin_changes(series, changer);
        graph.set_data_changed(series, Change::Remove);
        graph.remove_container(series, table);
        graph.set_data_changed(series, Change::Value);
        graph.finish_changes(series, changer);

        // The begin snapshot closes the table's transaction; it carries the
        // first tag but not the one recorded after detachment.
        let events = table_log.borrow();
        assert_eq!(events.len(), 1);
        assert!(events[0].changes.contains(Change::Remove));
        assert!(!events[0].changes.contains(Change::Value));
    }

    #[test]
    fn test_listener_order_is_registration_order() {
        let graph = NotifyGraph::new();
        let node = graph.add_node();
        let order = Rc::new(RefCell::new(Vec::new()));
        for tag in 0..3 {
            let order = order.clone();
            graph.subscribe(node, move |_| order.borrow_mut().push(tag));
        }
        graph.set_data_changed(node, Change::Value);
        assert_eq!(*order.borrow(), vec![0, 1, 2]);
    }

    #[test]
    fn test_unsubscribe() {
        let graph = NotifyGraph::new();
        let node = graph.add_node();
        let log = recorder(&graph, node);
        let extra = graph.subscribe(node, |_| {});
        assert_eq!(graph.listener_count(node), 2);
        assert!(graph.unsubscribe(node, extra));
        assert!(!graph.unsubscribe(node, extra));
        graph.set_data_changed(node, Change::Value);
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn test_reentrant_subscribe_from_callback() {
        let graph = Rc::new(NotifyGraph::new());
        let node = graph.add_node();
        let count = Rc::new(Cell::new(0u32));
        {
            let graph2 = graph.clone();
            let count2 = count.clone();
            graph.subscribe(node, move |event| {
                count2.set(count2.get() + 1);
                // Late registration takes effect from the next event.
                let count3 = count2.clone();
                graph2.subscribe(event.source, move |_| {
                    count3.set(count3.get() + 10);
                });
            });
        }
        graph.set_data_changed(node, Change::Value);
        assert_eq!(count.get(), 1);
        graph.set_data_changed(node, Change::Value);
        // Original + one late listener from the first event.
        assert_eq!(count.get(), 12);
    }

    #[test]
    fn test_cyclic_containment_does_not_loop() {
        let graph = NotifyGraph::new();
        let a = graph.add_node();
        let b = graph.add_node();
        graph.add_container(a, b);
        graph.add_container(b, a);
        let a_log = recorder(&graph, a);
        let b_log = recorder(&graph, b);

        graph.set_data_changed(a, Change::Value);
        assert_eq!(a_log.borrow().len(), 1);
        assert_eq!(b_log.borrow().len(), 1);
    }

    #[test]
    fn test_cyclic_containment_transaction_terminates() {
        let graph = NotifyGraph::new();
        let a = graph.add_node();
        let b = graph.add_node();
        graph.add_container(a, b);
        graph.add_container(b, a);
        let a_log = recorder(&graph, a);
        let b_log = recorder(&graph, b);

        let changer = graph.changer();
        graph.begin_changes(a, changer);
        assert!(graph.in_transaction(a));
        assert!(graph.in_transaction(b));
        graph.set_data_changed(a, Change::Insert);
        graph.set_data_changed(a, Change::Value);
        graph.finish_changes(a, changer);

        assert!(!graph.in_transaction(a));
        assert!(!graph.in_transaction(b));
        for log in [a_log, b_log] {
            let events = log.borrow();
            assert_eq!(events.len(), 1);
            assert!(events[0].changes.contains(Change::Insert));
            assert!(events[0].changes.contains(Change::Value));
        }
    }

    #[test]
    fn test_diamond_containment_opens_one_frame_per_node() {
        let graph = NotifyGraph::new();
        let leaf = graph.add_node();
        let left = graph.add_node();
        let right = graph.add_node();
        let top = graph.add_node();
        graph.add_container(leaf, left);
        graph.add_container(leaf, right);
        graph.add_container(left, top);
        graph.add_container(right, top);
        let top_log = recorder(&graph, top);

        let changer = graph.changer();
        graph.begin_changes(leaf, changer);
        graph.set_data_changed(leaf, Change::Value);
        graph.finish_changes(leaf, changer);

        // Both paths to `top` collapse into one frame and one event.
        assert!(!graph.in_transaction(top));
        assert_eq!(top_log.borrow().len(), 1);
    }

    #[test]
    fn test_event_carries_union_since_previous_event() {
        let graph = NotifyGraph::new();
        let node = graph.add_node();
        let log = recorder(&graph, node);

        let changer = graph.changer();
        graph.begin_changes(node, changer);
        graph.set_data_changed(node, Change::Insert);
        graph.finish_changes(node, changer);

        graph.begin_changes(node, changer);
        graph.set_data_changed(node, Change::Value);
        graph.finish_changes(node, changer);

        let events = log.borrow();
        assert_eq!(events.len(), 2);
        // The second event does not re-carry the first event's tags.
        assert!(!events[1].changes.contains(Change::Insert));
        assert!(events[1].changes.contains(Change::Value));
    }
}
