//! Observer/Observable Substrate
//!
//! This module defines the two-sided contract every reactive node
//! participates in, plus the shared storage that implements it.
//!
//! # The Two Sides
//!
//! - [`Observer`]: something that reacts to change. Computeds recompute,
//!   effects re-run, and sources fail loudly (they have no upstream, so
//!   being notified is a wiring bug).
//!
//! - [`Observable`]: something whose changes can be observed. Sources and
//!   computeds are observable; effects are terminal sinks and are not.
//!
//! # Ownership
//!
//! An observable never owns its observers. Observers are owned by whoever
//! created them; the observable holds only weak references. When an
//! observer's owner drops the last strong handle, the entry stops
//! upgrading and is pruned lazily on the next notification pass. There is
//! no proactive sweep.
//!
//! # Notification Pass
//!
//! [`ObserverList::notify_all`] snapshots the entry list, releases the
//! lock, then walks the snapshot in subscription order. Each live observer
//! runs its full recursive reaction before the next sibling is visited
//! (depth-first fan-out). Because the lock is released during the walk, a
//! notified callback may subscribe or unsubscribe on the very node that is
//! mid-pass; such structural changes take effect from the next pass.
//! Dead entries seen during the walk are removed in one sweep after the
//! pass completes, never mid-iteration.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use smallvec::SmallVec;
use thiserror::Error;
use tracing::trace;

/// Unique identifier for a node in the dependency graph.
///
/// Identity is what `unsubscribe` matches on, and what notification
/// events are keyed by in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u64);

impl NodeId {
    /// Generate a new unique node ID.
    ///
    /// Uses an atomic counter to ensure uniqueness across threads.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

/// Internal-consistency faults in the dependency graph.
///
/// The graph has exactly one impossible state worth naming: a source node
/// receiving a notification. Every other odd situation (duplicate
/// subscription, unsubscribing an absent id, dead weak references) is
/// ordinary and handled silently.
#[derive(Debug, Error)]
pub enum ReactiveError {
    /// A source node was notified. Sources sit at the roots of the graph
    /// and have no upstream, so this can only happen if an edge was wired
    /// backwards. Surfaced as a panic rather than masked.
    #[error("source node {src:?} was notified by {changed:?}: sources have no upstream")]
    SourceNotified {
        /// The source that received the notification.
        src: NodeId,
        /// The node claiming to have changed.
        changed: NodeId,
    },
}

/// The observer-side contract: react to an upstream change.
pub trait Observer: Send + Sync {
    /// The observer's identity, used for removal and log correlation.
    fn id(&self) -> NodeId;

    /// React to `changed` having a new value.
    ///
    /// The caller has already upgraded the weak reference, so this call
    /// cannot fail due to staleness. What the reaction is depends on the
    /// node kind: recompute-then-propagate, re-run, or fault.
    fn notify(&self, changed: NodeId);
}

/// The read capability shared by source and derived handles.
///
/// Reading returns the current cached value synchronously and never
/// subscribes the caller; dependency edges are declared explicitly at
/// construction, not discovered by reads.
pub trait Readable {
    /// The type of value this node holds.
    type Value;

    /// Return a clone of the current value.
    fn get(&self) -> Self::Value;
}

/// The observable-side contract: let observers register interest.
///
/// Object-safe so heterogeneous upstream lists can be passed as
/// `&[&dyn Observable]`.
pub trait Observable: Send + Sync {
    /// Append a weak reference to `observer` onto this node's list.
    ///
    /// Duplicates are allowed: subscribing one observer twice yields two
    /// notifications per change.
    fn subscribe(&self, observer: &Arc<dyn Observer>);

    /// Remove the first entry matching `id`, if present. No-op otherwise.
    fn unsubscribe(&self, id: NodeId);
}

/// One weak edge in an observer list.
struct Entry {
    id: NodeId,
    observer: Weak<dyn Observer>,
}

/// An ordered list of weak observer references.
///
/// This is the storage behind every observable node. Entries keep the
/// observer's id alongside the weak pointer so `unsubscribe` can match
/// dead entries too.
///
/// Most nodes have a handful of observers, so entries live inline until
/// the list outgrows the stack allocation.
pub struct ObserverList {
    entries: Mutex<SmallVec<[Entry; 4]>>,
}

impl ObserverList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(SmallVec::new()),
        }
    }

    /// Append a weak reference to `observer`. Duplicates are kept.
    pub fn subscribe(&self, observer: &Arc<dyn Observer>) {
        self.entries.lock().push(Entry {
            id: observer.id(),
            observer: Arc::downgrade(observer),
        });
    }

    /// Remove the first entry with a matching id, if any.
    pub fn unsubscribe(&self, id: NodeId) {
        let mut entries = self.entries.lock();
        if let Some(index) = entries.iter().position(|entry| entry.id == id) {
            entries.remove(index);
        }
    }

    /// Notify every live observer, in subscription order, that `changed`
    /// has a new value.
    ///
    /// Iterates a snapshot with the lock released, so a notified callback
    /// may subscribe/unsubscribe on this same list; its change lands on
    /// the next pass. Entries that no longer upgrade are swept after the
    /// pass completes.
    pub fn notify_all(&self, changed: NodeId) {
        let snapshot: Vec<Weak<dyn Observer>> = {
            let entries = self.entries.lock();
            entries
                .iter()
                .map(|entry| Weak::clone(&entry.observer))
                .collect()
        };

        trace!(
            node = changed.raw(),
            observers = snapshot.len(),
            "notifying observers"
        );

        let mut dead = 0usize;
        for weak in &snapshot {
            match weak.upgrade() {
                Some(observer) => observer.notify(changed),
                None => dead += 1,
            }
        }

        // Removal is deferred so the pass above never iterates a list
        // that is shrinking under it.
        if dead > 0 {
            self.entries
                .lock()
                .retain(|entry| entry.observer.strong_count() > 0);
            trace!(node = changed.raw(), pruned = dead, "pruned dead observers");
        }
    }

    /// Number of entries currently held.
    ///
    /// Dead entries linger until the next notification pass prunes them,
    /// so this may overcount live observers between passes.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// True if no entries are held.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl Default for ObserverList {
    fn default() -> Self {
        Self::new()
    }
}
