//! Effect Implementation
//!
//! An Effect is a terminal reactive subscriber: it re-runs a procedure
//! whenever an upstream node notifies, and produces no value.
//!
//! Unlike a computed, an effect does **not** run at construction — the
//! first run happens on the first upstream change. And unlike sources and
//! computeds, an effect is not observable: nothing may depend on it, so
//! it is a leaf of the dependency graph.
//!
//! There is no explicit disposer. The constructor returns the owning
//! handle; dropping every clone of it releases the effect, and upstream
//! nodes prune the dead entry on their next notification pass.

use std::fmt::Debug;
use std::sync::Arc;

use tracing::trace;

use super::observer::{NodeId, Observable, Observer};

/// Shared interior for an [`Effect`].
struct EffectInner {
    id: NodeId,
    run: Box<dyn Fn() + Send + Sync>,
}

impl Observer for EffectInner {
    fn id(&self) -> NodeId {
        self.id
    }

    fn notify(&self, changed: NodeId) {
        trace!(effect = self.id.raw(), changed = changed.raw(), "running");
        (self.run)();
    }
}

/// A side-effecting subscriber that runs a procedure on upstream change.
///
/// Cloning an `Effect` creates a new handle to the **same** inner state.
///
/// # Example
///
/// ```rust,ignore
/// let count = Signal::new(0);
///
/// let logger = Effect::new(
///     {
///         let count = count.clone();
///         move || println!("count is now {}", count.get())
///     },
///     &[&count],
/// );
///
/// count.set(5); // prints: "count is now 5"
/// drop(logger); // no further runs after the next pruning pass
/// ```
#[must_use = "dropping the handle releases the effect; upstream nodes prune it on their next pass"]
pub struct Effect {
    inner: Arc<EffectInner>,
}

impl Effect {
    /// Create an effect from a procedure and an explicit list of upstream
    /// nodes.
    ///
    /// The procedure is *not* run here; the node only subscribes to each
    /// upstream. The first run happens on the first upstream change. Any
    /// return value of the procedure is discarded by construction of the
    /// `Fn()` bound.
    pub fn new<F>(run: F, upstream: &[&dyn Observable]) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        let inner = Arc::new(EffectInner {
            id: NodeId::new(),
            run: Box::new(run),
        });

        let observer: Arc<dyn Observer> = inner.clone();
        for node in upstream {
            node.subscribe(&observer);
        }

        Self { inner }
    }

    /// Get the effect's unique ID.
    ///
    /// Useful for explicit detachment: `upstream.unsubscribe(effect.id())`.
    pub fn id(&self) -> NodeId {
        self.inner.id
    }
}

impl Clone for Effect {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl Debug for Effect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Effect").field("id", &self.inner.id).finish()
    }
}
