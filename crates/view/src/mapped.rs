//! Stateless element-wise pass-through views.

use crate::series::Series;
use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use tessella_core::{Result, Value};
use tessella_notify::{ListenerId, NodeId, NotifyGraph};

/// An element-wise view over a series, computed on demand.
///
/// Holds no cache: every read applies the mapping function to the source
/// cell. Source events are forwarded directly, re-labeled with this view's
/// own node as the event source, tags unchanged. The mapping function is
/// chosen once at construction.
pub struct MappedSeries {
    graph: Rc<NotifyGraph>,
    node: NodeId,
    label: String,
    source: Rc<Series>,
    map: Box<dyn Fn(&Value) -> Value>,
    forward: ListenerId,
}

impl MappedSeries {
    pub fn new<F>(label: impl Into<String>, source: Rc<Series>, map: F) -> Self
    where
        F: Fn(&Value) -> Value + 'static,
    {
        let graph = source.graph().clone();
        let node = graph.add_node();
        // The forwarder must not keep the graph alive from inside the
        // graph's own listener table.
        let weak = Rc::downgrade(&graph);
        let forward = graph.subscribe(source.node(), move |event| {
            let graph = match weak.upgrade() {
                Some(graph) => graph,
                None => return,
            };
            let changer = graph.changer();
            graph.begin_changes(node, changer);
            for tag in event.changes.iter() {
                graph.set_data_changed(node, tag);
            }
            graph.finish_changes(node, changer);
        });
        Self {
            graph,
            node,
            label: label.into(),
            source,
            map: Box::new(map),
            forward,
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

    #[inline]
    pub fn source(&self) -> &Rc<Series> {
        &self.source
    }

    pub fn len(&self) -> usize {
        self.source.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.source.is_empty()
    }

    /// Reads the mapped cell at `index`.
    pub fn get(&self, index: usize) -> Result<Value> {
        Ok((self.map)(&self.source.get(index)?))
    }

    /// Reads every mapped cell.
    pub fn values(&self) -> Vec<Value> {
        self.source.values().iter().map(|v| (self.map)(v)).collect()
    }
}

impl Drop for MappedSeries {
    fn drop(&mut self) {
        self.graph.unsubscribe(self.source.node(), self.forward);
        self.graph.remove_node(self.node);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use core::cell::RefCell;
    use tessella_notify::{Change, ChangeEvent};

    fn doubled() -> (Rc<Series>, MappedSeries) {
        let graph = Rc::new(NotifyGraph::new());
        let source = Rc::new(Series::from_values(
            graph,
            "n",
            [Value::Int32(1), Value::Int32(2)],
        ));
        let mapped = MappedSeries::new("n*2", source.clone(), |v| match v.as_i32() {
            Some(n) => Value::Int32(n * 2),
            None => Value::Empty,
        });
        (source, mapped)
    }

    #[test]
    fn test_reads_compute_on_demand() {
        let (source, mapped) = doubled();
        assert_eq!(mapped.get(0), Ok(Value::Int32(2)));
        assert_eq!(mapped.values(), vec![Value::Int32(2), Value::Int32(4)]);

        source.set(0, Value::Int32(10)).unwrap();
        assert_eq!(mapped.get(0), Ok(Value::Int32(20)));
    }

    #[test]
    fn test_events_forwarded_relabeled() {
        let (source, mapped) = doubled();
        let log = Rc::new(RefCell::new(Vec::<ChangeEvent>::new()));
        let sink = log.clone();
        source
            .graph()
            .subscribe(mapped.node(), move |event| sink.borrow_mut().push(*event));

        source.set(1, Value::Int32(5)).unwrap();
        source.push(Value::Int32(6)).unwrap();

        let events = log.borrow();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].source, mapped.node());
        assert!(events[0].changes.contains(Change::Value));
        assert!(events[1].changes.contains(Change::Insert));
    }

    #[test]
    fn test_drop_stops_forwarding() {
        let (source, mapped) = doubled();
        assert_eq!(source.graph().listener_count(source.node()), 1);
        drop(mapped);
        assert_eq!(source.graph().listener_count(source.node()), 0);
    }
}
