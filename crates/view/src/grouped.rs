//! Partitioning a series by a key function.

use crate::dependent::DependentCore;
use crate::series::Series;
use alloc::boxed::Box;
use alloc::format;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::RefCell;
use hashbrown::HashMap;
use tessella_collections::OrderedMap;
use tessella_core::Value;
use tessella_notify::{Changer, NodeId, NotifyGraph};

/// A lazily maintained partition of a series.
///
/// Each group is a `Series` in its own right, contained by the grouped
/// view's node, so group-level mutations during a refresh roll up into one
/// coalesced event on the grouped view. Relative element order within a
/// group follows the source.
///
/// Groups persist across refreshes: a key that disappears from the source
/// has its group truncated to length zero but the group object is
/// retained, so external holders observe the emptying rather than a
/// dangling handle. If the key reappears the same object is repopulated.
pub struct GroupedSeries {
    graph: Rc<NotifyGraph>,
    node: NodeId,
    label: String,
    source: Rc<Series>,
    key_fn: Box<dyn Fn(&Value) -> Value>,
    changer: Changer,
    core: DependentCore,
    groups: RefCell<OrderedMap<Value, Rc<Series>>>,
}

impl GroupedSeries {
    pub fn new<F>(label: impl Into<String>, source: Rc<Series>, key_fn: F) -> Self
    where
        F: Fn(&Value) -> Value + 'static,
    {
        let graph = source.graph().clone();
        let node = graph.add_node();
        let changer = graph.changer();
        let core = DependentCore::new(graph.clone(), &[source.node()]);
        Self {
            graph,
            node,
            label: label.into(),
            source,
            key_fn: Box::new(key_fn),
            changer,
            core,
            groups: RefCell::new(OrderedMap::new()),
        }
    }

    #[inline]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[inline]
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// The group for the key, if the key has ever appeared in the source.
    ///
    /// A retained group whose key is currently absent is still returned,
    /// with length zero.
    pub fn group(&self, key: &Value) -> Option<Rc<Series>> {
        self.core.ensure_fresh(|| self.refresh());
        self.groups.borrow().get(key)
    }

    /// Keys of the currently non-empty groups, in first-appearance order.
    pub fn keys(&self) -> Vec<Value> {
        self.core.ensure_fresh(|| self.refresh());
        let groups = self.groups.borrow();
        groups
            .iter()
            .filter(|entry| !entry.value().is_empty())
            .map(|entry| entry.key().clone())
            .collect()
    }

    /// Number of currently non-empty groups.
    pub fn len(&self) -> usize {
        self.core.ensure_fresh(|| self.refresh());
        self.groups
            .borrow()
            .iter()
            .filter(|entry| !entry.value().is_empty())
            .count()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Re-partitions the source and diffs each group against its previous
    /// content through the group's own mutators, so each group reports
    /// exactly what changed in it.
    fn refresh(&self) {
        let values = self.source.values();
        let mut order: Vec<Value> = Vec::new();
        let mut partition: HashMap<Value, Vec<Value>> = HashMap::new();
        for value in values {
            let key = (self.key_fn)(&value);
            let bucket = partition.entry(key.clone()).or_insert_with(Vec::new);
            if bucket.is_empty() {
                order.push(key);
            }
            bucket.push(value);
        }

        self.graph.begin_changes(self.node, self.changer);

        for key in &order {
            let group = self.obtain_group(key);
            let items = &partition[key];
            self.graph.begin_changes(group.node(), self.changer);
            group.resize(items.len());
            for (i, item) in items.iter().enumerate() {
                // No-op for unchanged cells.
                let _ = group.set(i, item.clone());
            }
            self.graph.finish_changes(group.node(), self.changer);
        }

        // Truncate groups whose key disappeared; keep the objects.
        let vanished: Vec<Rc<Series>> = {
            let groups = self.groups.borrow();
            groups
                .iter()
                .filter(|entry| !partition.contains_key(entry.key()) && !entry.value().is_empty())
                .map(|entry| entry.value().clone())
                .collect()
        };
        for group in vanished {
            self.graph.begin_changes(group.node(), self.changer);
            group.resize(0);
            self.graph.finish_changes(group.node(), self.changer);
        }

        self.graph.finish_changes(self.node, self.changer);
    }

    fn obtain_group(&self, key: &Value) -> Rc<Series> {
        if let Some(group) = self.groups.borrow().get(key) {
            return group;
        }
        let label = format!("{}[{}]", self.label, key);
        let group = Rc::new(Series::untyped(self.graph.clone(), label));
        self.graph.add_container(group.node(), self.node);
        self.groups.borrow_mut().put(key.clone(), group.clone());
        group
    }
}

impl Drop for GroupedSeries {
    fn drop(&mut self) {
        self.graph.remove_node(self.node);
    }
}
