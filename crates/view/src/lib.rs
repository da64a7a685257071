//! Tessella View - Lazily recomputed views over labeled series.
//!
//! Everything derived is a view: an object that answers reads from a cache,
//! recomputes the cache at most once per dirty period, and reports its own
//! changes through the notification graph.
//!
//! - `Series`: the labeled value sequence at the bottom of every view
//!   chain, and the cache every cached view writes into
//! - `DependentCore`: the shared invalidate-lazily/recompute-on-read
//!   protocol
//! - `MappedSeries`: stateless element-wise pass-through, events forwarded
//!   re-labeled
//! - `Reduced`: scalar reductions with a one-element cache; variance reads
//!   a cached mean view, standard deviation reads a cached variance view
//! - `GroupedSeries`: key-function partitioning where every group is a
//!   series of its own and survives disappearing from the data
//!
//! # Example
//!
//! ```rust
//! use std::rc::Rc;
//! use tessella_core::{ScalarKind, Value};
//! use tessella_notify::NotifyGraph;
//! use tessella_view::{Reduced, ReduceOp, Series};
//!
//! let graph = Rc::new(NotifyGraph::new());
//! let prices = Rc::new(Series::typed(graph, "price", ScalarKind::Float64));
//! prices.push(Value::Float64(1.5)).unwrap();
//! prices.push(Value::Float64(2.5)).unwrap();
//!
//! let mean = Reduced::new(prices.clone(), ReduceOp::Mean).unwrap();
//! assert_eq!(mean.value(), Ok(Value::Float64(2.0)));
//!
//! prices.push(Value::Float64(5.0)).unwrap();
//! assert_eq!(mean.value(), Ok(Value::Float64(3.0)));
//! ```

#![no_std]

extern crate alloc;

mod dependent;
mod grouped;
mod mapped;
mod reduce;
mod series;

pub use dependent::DependentCore;
pub use grouped::GroupedSeries;
pub use mapped::MappedSeries;
pub use reduce::{ReduceOp, Reduced};
pub use series::Series;
