//! Scalar reductions with a one-element cache.

use crate::dependent::DependentCore;
use crate::series::Series;
use alloc::format;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};
use core::fmt;
use tessella_core::{Error, Result, ScalarKind, Value};
use tessella_notify::{Change, NodeId, NotifyGraph};

/// The reduction operator, chosen at construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReduceOp {
    Count,
    Sum,
    Product,
    Min,
    Max,
    Mean,
    Variance,
    StdDev,
}

impl fmt::Display for ReduceOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReduceOp::Count => "count",
            ReduceOp::Sum => "sum",
            ReduceOp::Product => "product",
            ReduceOp::Min => "min",
            ReduceOp::Max => "max",
            ReduceOp::Mean => "mean",
            ReduceOp::Variance => "variance",
            ReduceOp::StdDev => "stddev",
        };
        f.write_str(name)
    }
}

/// A lazily recomputed scalar reduction over a series.
///
/// The cache is a single value, invalidated when the source fires and
/// recomputed at most once per dirty period on the next `value()` call.
/// Empty cells are skipped: the reduction ranges over present values.
///
/// Composite reductions reuse their intermediates as views in their own
/// right: a variance reads a cached mean view, a standard deviation reads
/// a cached variance view. Variance is population variance.
///
/// Empty-input results: `Count` → `Int64(0)`, `Sum` → the additive
/// identity of the result kind, `Product` → the multiplicative identity,
/// everything else → `Value::Empty`.
pub struct Reduced {
    graph: Rc<NotifyGraph>,
    node: NodeId,
    label: String,
    source: Rc<Series>,
    op: ReduceOp,
    result_kind: Option<ScalarKind>,
    /// Mean view for variance, variance view for stddev.
    inner: Option<Rc<Reduced>>,
    core: DependentCore,
    cache: RefCell<Value>,
    recomputes: Cell<u64>,
}

impl Reduced {
    /// Builds a reduction over the series.
    ///
    /// The result kind is resolved here, once: numeric operators reject a
    /// non-numeric typed source with `NotNumeric`; `Count`, `Min` and `Max`
    /// admit any kind.
    pub fn new(source: Rc<Series>, op: ReduceOp) -> Result<Rc<Reduced>> {
        let result_kind = Self::resolve_kind(&source, op)?;
        let inner = match op {
            ReduceOp::Variance => Some(Self::new(source.clone(), ReduceOp::Mean)?),
            ReduceOp::StdDev => Some(Self::new(source.clone(), ReduceOp::Variance)?),
            _ => None,
        };
        let graph = source.graph().clone();
        let node = graph.add_node();
        let core = DependentCore::new(graph.clone(), &[source.node()]);
        let label = format!("{}({})", op, source.label());
        Ok(Rc::new(Self {
            graph,
            node,
            label,
            source,
            op,
            result_kind,
            inner,
            core,
            cache: RefCell::new(Value::Empty),
            recomputes: Cell::new(0),
        }))
    }

    fn resolve_kind(source: &Series, op: ReduceOp) -> Result<Option<ScalarKind>> {
        match op {
            ReduceOp::Count => Ok(Some(ScalarKind::Int64)),
            ReduceOp::Min | ReduceOp::Max => Ok(source.kind()),
            ReduceOp::Sum | ReduceOp::Product => match source.kind() {
                // Untyped sources resolve dynamically; the widest kind.
                None => Ok(Some(ScalarKind::Float64)),
                Some(k) if k.is_numeric() => Ok(Some(k)),
                Some(k) => Err(Error::not_numeric(Some(k))),
            },
            ReduceOp::Mean | ReduceOp::Variance | ReduceOp::StdDev => match source.kind() {
                None => Ok(Some(ScalarKind::Float64)),
                Some(k) if k.is_numeric() => Ok(Some(ScalarKind::Float64)),
                Some(k) => Err(Error::not_numeric(Some(k))),
            },
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
    pub fn op(&self) -> ReduceOp {
        self.op
    }

    /// The kind of the reduced value, when statically known.
    #[inline]
    pub fn result_kind(&self) -> Option<ScalarKind> {
        self.result_kind
    }

    /// The intermediate view a composite reduction reads: the mean view of
    /// a variance, the variance view of a standard deviation.
    #[inline]
    pub fn basis(&self) -> Option<&Rc<Reduced>> {
        self.inner.as_ref()
    }

    /// How many times the cache has been recomputed. Diagnostic.
    #[inline]
    pub fn recompute_count(&self) -> u64 {
        self.recomputes.get()
    }

    /// The reduced value, recomputed at most once per dirty period.
    pub fn value(&self) -> Result<Value> {
        let mut outcome = Ok(());
        self.core.ensure_fresh(|| outcome = self.recompute());
        if outcome.is_err() {
            // A failed recompute leaves the cache stale; retry next read.
            self.core.mark_dirty();
        }
        outcome?;
        Ok(self.cache.borrow().clone())
    }

    fn recompute(&self) -> Result<()> {
        self.recomputes.set(self.recomputes.get() + 1);
        let new = self.compute()?;
        let changed = *self.cache.borrow() != new;
        if changed {
            *self.cache.borrow_mut() = new;
            self.graph.set_data_changed(self.node, Change::Value);
        }
        Ok(())
    }

    fn compute(&self) -> Result<Value> {
        let values = self.source.values();
        let present: Vec<&Value> = values.iter().filter(|v| !v.is_empty()).collect();
        let kind = self.result_kind.unwrap_or(ScalarKind::Float64);
        match self.op {
            ReduceOp::Count => Ok(Value::Int64(present.len() as i64)),
            ReduceOp::Min => Ok(present
                .iter()
                .min()
                .map(|v| (*v).clone())
                .unwrap_or(Value::Empty)),
            ReduceOp::Max => Ok(present
                .iter()
                .max()
                .map(|v| (*v).clone())
                .unwrap_or(Value::Empty)),
            ReduceOp::Sum => {
                if present.is_empty() {
                    return Ok(Value::zero_for(kind));
                }
                let mut sum = 0.0;
                for v in &present {
                    sum += Self::numeric(v)?;
                }
                Ok(Value::from_f64_as(kind, sum))
            }
            ReduceOp::Product => {
                if present.is_empty() {
                    return Ok(Value::one_for(kind));
                }
                let mut product = 1.0;
                for v in &present {
                    product *= Self::numeric(v)?;
                }
                Ok(Value::from_f64_as(kind, product))
            }
            ReduceOp::Mean => {
                if present.is_empty() {
                    return Ok(Value::Empty);
                }
                let mut sum = 0.0;
                for v in &present {
                    sum += Self::numeric(v)?;
                }
                Ok(Value::Float64(sum / present.len() as f64))
            }
            ReduceOp::Variance => {
                let mean = match &self.inner {
                    Some(inner) => inner.value()?,
                    None => Value::Empty,
                };
                let m = match mean.as_f64() {
                    Some(m) => m,
                    None => return Ok(Value::Empty),
                };
                let mut sum = 0.0;
                for v in &present {
                    let x = Self::numeric(v)?;
                    sum += (x - m) * (x - m);
                }
                Ok(Value::Float64(sum / present.len() as f64))
            }
            ReduceOp::StdDev => {
                let variance = match &self.inner {
                    Some(inner) => inner.value()?,
                    None => Value::Empty,
                };
                match variance.as_f64() {
                    Some(v) => Ok(Value::Float64(libm::sqrt(v))),
                    None => Ok(Value::Empty),
                }
            }
        }
    }

    fn numeric(value: &Value) -> Result<f64> {
        value
            .as_f64_lossy()
            .ok_or(Error::not_numeric(value.kind()))
    }
}

impl Drop for Reduced {
    fn drop(&mut self) {
        self.graph.remove_node(self.node);
    }
}
