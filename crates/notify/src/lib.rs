//! Tessella Notify - Transactional change notification graph.
//!
//! This crate implements the change-notification protocol every Tessella
//! node participates in:
//!
//! - `NotifyGraph`: an arena of nodes addressed by stable `NodeId`s, with
//!   containment edges, listener registries and per-node transaction stacks
//! - `Change` / `ChangeMask`: coalesced change-type tags
//! - `Changer`: an opaque token identifying who is performing a batch of
//!   structural changes
//! - `ChangeEvent`: the single coalesced event a node fires once its
//!   transaction stack unwinds to empty
//!
//! # Protocol
//!
//! A mutation opens a transaction with `begin_changes`, which climbs the
//! containment graph through a snapshot of the container set. While the
//! transaction is open, `set_data_changed` records change tags and
//! propagates them through the *live* container set, so containers attached
//! mid-transaction still learn of subsequent changes. `finish_changes`
//! closes the transaction in LIFO order; when a node's stack returns to
//! empty it fires one event carrying the union of every tag recorded since
//! its previous event.
//!
//! # Example
//!
//! ```rust
//! use tessella_notify::{Change, NotifyGraph};
//!
//! let graph = NotifyGraph::new();
//! let series = graph.add_node();
//! let table = graph.add_node();
//! graph.add_container(series, table);
//!
//! let changer = graph.changer();
//! graph.begin_changes(series, changer);
//! graph.set_data_changed(series, Change::Value);
//! graph.set_data_changed(series, Change::Insert);
//! graph.finish_changes(series, changer);
//! // One coalesced event fired on `series` and one on `table`, each
//! // carrying {Value, Insert}.
//! ```

#![no_std]

extern crate alloc;

mod change;
mod graph;

pub use change::{Change, ChangeEvent, ChangeMask};
pub use graph::{Changer, ListenerId, NodeId, NotifyGraph};
