//! Property-based tests for the notification protocol using proptest.

use proptest::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;
use tessella_notify::{Change, ChangeEvent, NodeId, NotifyGraph};

fn change_strategy() -> impl Strategy<Value = Change> {
    prop_oneof![
        Just(Change::Value),
        Just(Change::Insert),
        Just(Change::Remove),
        Just(Change::Replace),
        Just(Change::Reorder),
        Just(Change::Resize),
    ]
}

fn recorder(graph: &NotifyGraph, node: NodeId) -> Rc<RefCell<Vec<ChangeEvent>>> {
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = log.clone();
    graph.subscribe(node, move |event| sink.borrow_mut().push(*event));
    log
}

proptest! {
    /// Any nesting depth with at least one recorded tag fires exactly one
    /// event, and that event carries exactly the union of the tags.
    #[test]
    fn one_event_per_outer_transaction(
        depth in 1usize..6,
        tags in prop::collection::vec(change_strategy(), 1..12),
    ) {
        let graph = NotifyGraph::new();
        let node = graph.add_node();
        let log = recorder(&graph, node);
        let changer = graph.changer();

        for _ in 0..depth {
            graph.begin_changes(node, changer);
        }
        for tag in &tags {
            graph.set_data_changed(node, *tag);
        }
        for _ in 0..depth {
            prop_assert!(log.borrow().is_empty());
            graph.finish_changes(node, changer);
        }

        let events = log.borrow();
        prop_assert_eq!(events.len(), 1);
        for tag in Change::ALL {
            prop_assert_eq!(
                events[0].changes.contains(tag),
                tags.contains(&tag),
                "tag {:?} presence mismatch", tag
            );
        }
    }

    /// A linear containment chain delivers the same coalesced union to
    /// every node in the chain, once each.
    #[test]
    fn chain_propagates_union(
        len in 2usize..6,
        tags in prop::collection::vec(change_strategy(), 1..8),
    ) {
        let graph = NotifyGraph::new();
        let mut chain = Vec::new();
        for _ in 0..len {
            chain.push(graph.add_node());
        }
        for pair in chain.windows(2) {
            graph.add_container(pair[0], pair[1]);
        }
        let logs: Vec<_> = chain.iter().map(|&n| recorder(&graph, n)).collect();

        let changer = graph.changer();
        graph.begin_changes(chain[0], changer);
        for tag in &tags {
            graph.set_data_changed(chain[0], *tag);
        }
        graph.finish_changes(chain[0], changer);

        let first = logs[0].borrow()[0].changes;
        for (node, log) in chain.iter().zip(&logs) {
            let events = log.borrow();
            prop_assert_eq!(events.len(), 1);
            prop_assert_eq!(events[0].source, *node);
            prop_assert_eq!(events[0].changes, first);
        }
    }

    /// Changes recorded with no open transaction fire one event each,
    /// carrying only that tag.
    #[test]
    fn untransacted_changes_fire_individually(
        tags in prop::collection::vec(change_strategy(), 1..8),
    ) {
        let graph = NotifyGraph::new();
        let node = graph.add_node();
        let log = recorder(&graph, node);

        for tag in &tags {
            graph.set_data_changed(node, *tag);
        }

        let events = log.borrow();
        prop_assert_eq!(events.len(), tags.len());
        for (event, tag) in events.iter().zip(&tags) {
            prop_assert!(event.changes.contains(*tag));
            prop_assert_eq!(event.changes.len(), 1);
        }
    }
}
