//! Computed Implementation
//!
//! A Computed is a derived value: a cached result of a pure computation
//! over zero or more upstream nodes, refreshed whenever any upstream
//! notifies.
//!
//! # How Computeds Work
//!
//! 1. Construction evaluates the computation once to seed the cache, then
//!    subscribes the new node to every listed upstream.
//!
//! 2. `get` returns the cached value without recomputing.
//!
//! 3. When an upstream notifies, the computation re-runs synchronously,
//!    the cache is refreshed, and the computed's own observers are
//!    notified in turn — so one source write fans depth-first through the
//!    whole dependent subgraph before the write call returns.
//!
//! A computed over N upstreams recomputes once per upstream notification:
//! N independent writes mean up to N recomputations. That is the accepted
//! cost of the push model, not a bug.
//!
//! # Dependencies Are Explicit
//!
//! The computation may read any captured upstream handle, or closed-over
//! external state; nothing restricts it. But reads establish no edges —
//! only the upstream list passed at construction does. The set is fixed
//! for the node's lifetime.

use std::fmt::Debug;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::trace;

use super::observer::{NodeId, Observable, Observer, ObserverList, Readable};

/// Shared interior for a [`Computed`].
struct ComputedInner<T> {
    id: NodeId,
    compute: Box<dyn Fn() -> T + Send + Sync>,
    value: RwLock<T>,
    observers: ObserverList,
}

/// Upstream notifications land here: refresh the cache, then propagate.
/// Recomputation is unconditional — there is no equality short-circuit,
/// so observers fire even when the new value equals the old one.
impl<T> Observer for ComputedInner<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn id(&self) -> NodeId {
        self.id
    }

    fn notify(&self, changed: NodeId) {
        trace!(
            computed = self.id.raw(),
            changed = changed.raw(),
            "recomputing"
        );

        let new_value = (self.compute)();
        *self.value.write() = new_value;

        self.observers.notify_all(self.id);
    }
}

/// A read-only reactive value recomputed from upstream nodes on change.
///
/// Cloning a `Computed` creates a new handle to the **same** inner state.
/// This is the only node kind guaranteed side-effect free from the
/// outside: it exposes no mutation operation at all.
///
/// # Example
///
/// ```rust,ignore
/// let count = Signal::new(2);
///
/// let doubled = Computed::new(
///     {
///         let count = count.clone();
///         move || count.get() * 2
///     },
///     &[&count],
/// );
///
/// assert_eq!(doubled.get(), 4);
/// count.set(5);
/// assert_eq!(doubled.get(), 10);
/// ```
pub struct Computed<T>
where
    T: Clone + Send + Sync + 'static,
{
    inner: Arc<ComputedInner<T>>,
}

impl<T> Computed<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Create a computed from a pure computation and an explicit list of
    /// upstream nodes.
    ///
    /// The computation runs once, immediately, to seed the cache; then the
    /// node subscribes itself to every upstream. Passing the same upstream
    /// twice subscribes twice, which doubles the recomputations per change
    /// of that upstream.
    pub fn new<F>(compute: F, upstream: &[&dyn Observable]) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        let initial = compute();

        let inner = Arc::new(ComputedInner {
            id: NodeId::new(),
            compute: Box::new(compute),
            value: RwLock::new(initial),
            observers: ObserverList::new(),
        });

        let observer: Arc<dyn Observer> = inner.clone();
        for node in upstream {
            node.subscribe(&observer);
        }

        Self { inner }
    }

    /// Get the computed's unique ID.
    pub fn id(&self) -> NodeId {
        self.inner.id
    }

    /// Get the cached value without recomputing.
    pub fn get(&self) -> T {
        self.inner.value.read().clone()
    }

    /// Number of observer entries currently held (dead entries linger
    /// until the next notification pass prunes them).
    pub fn observer_count(&self) -> usize {
        self.inner.observers.len()
    }
}

impl<T> Observable for Computed<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn subscribe(&self, observer: &Arc<dyn Observer>) {
        self.inner.observers.subscribe(observer);
    }

    fn unsubscribe(&self, id: NodeId) {
        self.inner.observers.unsubscribe(id);
    }
}

impl<T> Readable for Computed<T>
where
    T: Clone + Send + Sync + 'static,
{
    type Value = T;

    fn get(&self) -> T {
        self.inner.value.read().clone()
    }
}

impl<T> Observer for Computed<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn id(&self) -> NodeId {
        self.inner.id
    }

    fn notify(&self, changed: NodeId) {
        self.inner.notify(changed);
    }
}

impl<T> Clone for Computed<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Debug for Computed<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Computed")
            .field("id", &self.inner.id)
            .field("observer_count", &self.observer_count())
            .finish()
    }
}
