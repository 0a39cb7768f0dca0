//! Signal Implementation
//!
//! A Signal is the fundamental reactive primitive: a mutable value cell
//! that others can observe.
//!
//! # How Signals Work
//!
//! 1. A signal owns its value and an ordered list of weak observer
//!    references.
//!
//! 2. Writing through `set`, `update`, or `mutate` replaces or mutates the
//!    value, then notifies every live observer depth-first in
//!    subscription order. There is no equality check: writing a value
//!    equal to the current one still notifies.
//!
//! 3. Reading through `get` never subscribes the caller. Observers are
//!    wired explicitly, by passing the signal to a computed or effect at
//!    construction, or by calling `subscribe` directly.
//!
//! # Thread Safety
//!
//! The value is protected by a `parking_lot::RwLock` and the observer list
//! by its own lock, so handles may be cloned across threads. Neither lock
//! is held while observers run, with one exception: `mutate` holds the
//! value write lock while the caller's closure runs.
//!
//! # Readonly Views
//!
//! `as_readonly` returns a second handle type over the same cell with the
//! replacement operations stripped at the type level. See
//! [`ReadonlySignal`] for the one intentional asymmetry.

use std::fmt::Debug;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::trace;

use super::observer::{NodeId, Observable, Observer, ObserverList, Readable, ReactiveError};

/// Shared cell backing a [`Signal`] and its readonly views.
struct SignalInner<T> {
    id: NodeId,
    value: RwLock<T>,
    observers: ObserverList,
}

impl<T> SignalInner<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn get(&self) -> T {
        self.value.read().clone()
    }

    fn replace(&self, value: T) {
        *self.value.write() = value;
        trace!(signal = self.id.raw(), "set");
        self.observers.notify_all(self.id);
    }

    fn mutate_in_place(&self, f: impl FnOnce(&mut T)) {
        {
            let mut guard = self.value.write();
            f(&mut *guard);
        }
        trace!(signal = self.id.raw(), "mutate");
        self.observers.notify_all(self.id);
    }
}

/// A mutable reactive value cell holding a value of type T.
///
/// Cloning a `Signal` creates a new handle to the **same** cell.
///
/// # Example
///
/// ```rust,ignore
/// let count = Signal::new(0);
///
/// // Read the value
/// let value = count.get();
///
/// // Replace the value (notifies observers)
/// count.set(5);
/// ```
pub struct Signal<T>
where
    T: Clone + Send + Sync + 'static,
{
    inner: Arc<SignalInner<T>>,
}

impl<T> Signal<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Create a new signal with the given initial value.
    pub fn new(value: T) -> Self {
        Self {
            inner: Arc::new(SignalInner {
                id: NodeId::new(),
                value: RwLock::new(value),
                observers: ObserverList::new(),
            }),
        }
    }

    /// Get the signal's unique ID.
    pub fn id(&self) -> NodeId {
        self.inner.id
    }

    /// Get the current value.
    ///
    /// Reading never subscribes the caller. To depend on this signal,
    /// pass it to a computed or effect at construction.
    pub fn get(&self) -> T {
        self.inner.get()
    }

    /// Replace the current value and notify all live observers,
    /// depth-first, in subscription order.
    ///
    /// The replacement is unconditional: setting a value equal to the
    /// current one still notifies.
    pub fn set(&self, value: T) {
        self.inner.replace(value);
    }

    /// Replace the value with `f(&current)`, then notify with the same
    /// semantics as [`set`](Signal::set).
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&T) -> T,
    {
        let new_value = {
            let guard = self.inner.value.read();
            f(&*guard)
        };
        self.set(new_value);
    }

    /// Mutate the value in place, then notify.
    ///
    /// Useful for container values that are cheaper to edit than to
    /// replace. Notification happens whether or not `f` changed anything;
    /// it is up to the caller's closure to actually mutate.
    ///
    /// The value write lock is held while `f` runs, so `f` must not read
    /// this signal back through another handle.
    pub fn mutate<F>(&self, f: F)
    where
        F: FnOnce(&mut T),
    {
        self.inner.mutate_in_place(f);
    }

    /// Return a readonly view aliasing this cell.
    ///
    /// The view exposes `get`, `subscribe`, `unsubscribe`, and `mutate`;
    /// `set` and `update` are absent from it at the type level. No state
    /// is copied: reads through the view always agree with this handle.
    pub fn as_readonly(&self) -> ReadonlySignal<T> {
        ReadonlySignal {
            inner: Arc::clone(&self.inner),
        }
    }

    /// Number of observer entries currently held (dead entries linger
    /// until the next notification pass prunes them).
    pub fn observer_count(&self) -> usize {
        self.inner.observers.len()
    }
}

impl<T> Observable for Signal<T>
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

impl<T> Readable for Signal<T>
where
    T: Clone + Send + Sync + 'static,
{
    type Value = T;

    fn get(&self) -> T {
        self.inner.get()
    }
}

/// Sources sit at the roots of the graph and have no upstream, so being
/// notified is an internal-consistency fault: it panics immediately
/// rather than masking a miswired edge.
impl<T> Observer for Signal<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn id(&self) -> NodeId {
        self.inner.id
    }

    fn notify(&self, changed: NodeId) {
        panic!(
            "{}",
            ReactiveError::SourceNotified {
                src: self.inner.id,
                changed,
            }
        );
    }
}

impl<T> Clone for Signal<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Debug for Signal<T>
where
    T: Clone + Send + Sync + Debug + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("id", &self.inner.id)
            .field("value", &self.get())
            .field("observer_count", &self.observer_count())
            .finish()
    }
}

/// A readonly view over a [`Signal`]'s cell.
///
/// Obtained from [`Signal::as_readonly`]. The view aliases the same
/// underlying cell, so reads always agree with the originating handle.
///
/// `set` and `update` are stripped from this type. `mutate` intentionally
/// remains reachable: the view is read*only* with respect to replacement,
/// not in-place mutation. Callers that need a genuinely immutable handle
/// should wrap the view rather than hand it out directly.
pub struct ReadonlySignal<T>
where
    T: Clone + Send + Sync + 'static,
{
    inner: Arc<SignalInner<T>>,
}

impl<T> ReadonlySignal<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Get the underlying signal's unique ID.
    pub fn id(&self) -> NodeId {
        self.inner.id
    }

    /// Get the current value. Same contract as [`Signal::get`].
    pub fn get(&self) -> T {
        self.inner.get()
    }

    /// Mutate the value in place, then notify. Same contract as
    /// [`Signal::mutate`] — see the type-level note on why this remains
    /// available from a readonly view.
    pub fn mutate<F>(&self, f: F)
    where
        F: FnOnce(&mut T),
    {
        self.inner.mutate_in_place(f);
    }

    /// Number of observer entries currently held.
    pub fn observer_count(&self) -> usize {
        self.inner.observers.len()
    }
}

impl<T> Observable for ReadonlySignal<T>
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

impl<T> Readable for ReadonlySignal<T>
where
    T: Clone + Send + Sync + 'static,
{
    type Value = T;

    fn get(&self) -> T {
        self.inner.get()
    }
}

impl<T> Clone for ReadonlySignal<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Debug for ReadonlySignal<T>
where
    T: Clone + Send + Sync + Debug + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReadonlySignal")
            .field("id", &self.inner.id)
            .field("value", &self.get())
            .field("observer_count", &self.observer_count())
            .finish()
    }
}
