//! Integration Tests for the Reactive System
//!
//! These tests verify that signals, computeds, and effects work together
//! correctly: fan-out ordering, diamond propagation, weak-reference
//! lifecycle, and the failure semantics of a notification pass.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use ripple_core::reactive::{Computed, Effect, NodeId, Observable, Observer, Readable, Signal};

struct CountingObserver {
    id: NodeId,
    notified: AtomicUsize,
}

impl CountingObserver {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            id: NodeId::new(),
            notified: AtomicUsize::new(0),
        })
    }

    fn count(&self) -> usize {
        self.notified.load(Ordering::SeqCst)
    }
}

impl Observer for CountingObserver {
    fn id(&self) -> NodeId {
        self.id
    }

    fn notify(&self, _changed: NodeId) {
        self.notified.fetch_add(1, Ordering::SeqCst);
    }
}

/// One write reaches observers in subscription order: the computed
/// subscribed first recomputes before its sibling.
#[test]
fn fan_out_preserves_subscription_order() {
    let order = Arc::new(Mutex::new(Vec::new()));
    let source = Signal::new(0);

    let _first = Computed::new(
        {
            let source = source.clone();
            let order = order.clone();
            move || {
                order.lock().push("first");
                source.get()
            }
        },
        &[&source],
    );

    let _second = Computed::new(
        {
            let source = source.clone();
            let order = order.clone();
            move || {
                order.lock().push("second");
                source.get()
            }
        },
        &[&source],
    );

    // Both computations ran once at construction; start fresh.
    order.lock().clear();

    source.set(1);
    assert_eq!(*order.lock(), vec!["first", "second"]);
}

/// Diamond: S feeds D1 and D2, E depends on both. One write to S runs E
/// exactly twice — once from each branch. No deduplication is performed;
/// this is the expected behavior, not a defect to fix.
#[test]
fn diamond_runs_effect_once_per_branch() {
    let source = Signal::new(0);

    let left = Computed::new(
        {
            let source = source.clone();
            move || source.get() + 1
        },
        &[&source],
    );

    let right = Computed::new(
        {
            let source = source.clone();
            move || source.get() * 2
        },
        &[&source],
    );

    let run_count = Arc::new(AtomicUsize::new(0));
    let _effect = Effect::new(
        {
            let run_count = run_count.clone();
            move || {
                run_count.fetch_add(1, Ordering::SeqCst);
            }
        },
        &[&left, &right],
    );

    source.set(3);
    assert_eq!(run_count.load(Ordering::SeqCst), 2);
}

/// A dropped computed must neither break the write nor be invoked; its
/// dead entry disappears during the pass that discovers it.
#[test]
fn dropped_computed_is_skipped_and_pruned() {
    let source = Signal::new(0);
    let compute_count = Arc::new(AtomicUsize::new(0));

    let computed = Computed::new(
        {
            let source = source.clone();
            let compute_count = compute_count.clone();
            move || {
                compute_count.fetch_add(1, Ordering::SeqCst);
                source.get()
            }
        },
        &[&source],
    );

    assert_eq!(compute_count.load(Ordering::SeqCst), 1);
    assert_eq!(source.observer_count(), 1);

    drop(computed);

    // Must not panic, must not invoke the dropped node.
    source.set(1);
    assert_eq!(compute_count.load(Ordering::SeqCst), 1);
    assert_eq!(source.observer_count(), 0);
}

/// The readonly view reads the same cell at all times. `set`/`update` do
/// not exist on it; `mutate` does, deliberately.
#[test]
fn readonly_view_keeps_mutate_reachable() {
    let source = Signal::new(vec![1]);
    let view = source.as_readonly();

    source.set(vec![1, 2]);
    assert_eq!(view.get(), source.get());

    let run_count = Arc::new(AtomicUsize::new(0));
    let _effect = Effect::new(
        {
            let run_count = run_count.clone();
            move || {
                run_count.fetch_add(1, Ordering::SeqCst);
            }
        },
        &[&view],
    );

    // In-place mutation stays reachable through the view and notifies.
    view.mutate(|v| v.push(3));
    assert_eq!(source.get(), vec![1, 2, 3]);
    assert_eq!(run_count.load(Ordering::SeqCst), 1);
}

/// No equality short-circuit anywhere: writing the same value twice
/// notifies twice.
#[test]
fn identical_writes_notify_each_time() {
    let source = Signal::new(7);
    let run_count = Arc::new(AtomicUsize::new(0));

    let _effect = Effect::new(
        {
            let run_count = run_count.clone();
            move || {
                run_count.fetch_add(1, Ordering::SeqCst);
            }
        },
        &[&source],
    );

    source.set(7);
    source.set(7);
    assert_eq!(run_count.load(Ordering::SeqCst), 2);
}

/// Effects are lazy at construction, eager afterwards.
#[test]
fn effect_first_runs_on_first_change() {
    let source = Signal::new(0);
    let observed = Arc::new(AtomicUsize::new(usize::MAX));

    let _effect = Effect::new(
        {
            let source = source.clone();
            let observed = observed.clone();
            move || {
                observed.store(source.get(), Ordering::SeqCst);
            }
        },
        &[&source],
    );

    assert_eq!(observed.load(Ordering::SeqCst), usize::MAX);

    source.set(9);
    assert_eq!(observed.load(Ordering::SeqCst), 9);
}

/// Subscribing the same upstream twice yields two notifications per
/// change.
#[test]
fn duplicate_upstream_doubles_notifications() {
    let source = Signal::new(0);
    let run_count = Arc::new(AtomicUsize::new(0));

    let _effect = Effect::new(
        {
            let run_count = run_count.clone();
            move || {
                run_count.fetch_add(1, Ordering::SeqCst);
            }
        },
        &[&source, &source],
    );

    source.set(1);
    assert_eq!(run_count.load(Ordering::SeqCst), 2);
}

/// A panic inside a computation propagates unmodified to the writer and
/// aborts the rest of the pass: siblings not yet notified are skipped,
/// already-applied updates stay applied.
#[test]
fn panic_in_computation_aborts_the_pass() {
    let source = Signal::new(0);

    let _poisoned = Computed::new(
        {
            let source = source.clone();
            move || {
                if source.get() > 0 {
                    panic!("computation failed");
                }
                0
            }
        },
        &[&source],
    );

    let sibling_count = Arc::new(AtomicUsize::new(0));
    let _sibling = Computed::new(
        {
            let source = source.clone();
            let sibling_count = sibling_count.clone();
            move || {
                sibling_count.fetch_add(1, Ordering::SeqCst);
                source.get()
            }
        },
        &[&source],
    );

    assert_eq!(sibling_count.load(Ordering::SeqCst), 1);

    let result = catch_unwind(AssertUnwindSafe(|| source.set(1)));
    assert!(result.is_err());

    // The write itself stuck; the sibling after the panicking node was
    // never reached.
    assert_eq!(source.get(), 1);
    assert_eq!(sibling_count.load(Ordering::SeqCst), 1);
}

/// A callback may subscribe to the node currently mid-pass; the new
/// observer is not visited in the same pass, only in later ones.
#[test]
fn subscription_during_notification_lands_next_pass() {
    let source = Signal::new(0);
    let late = CountingObserver::new();
    let subscribed = Arc::new(AtomicBool::new(false));

    let _effect = Effect::new(
        {
            let source = source.clone();
            let late: Arc<dyn Observer> = late.clone();
            let subscribed = subscribed.clone();
            move || {
                if !subscribed.swap(true, Ordering::SeqCst) {
                    source.subscribe(&late);
                }
            }
        },
        &[&source],
    );

    // First pass: the effect subscribes `late`, but the pass iterates the
    // snapshot taken before that — no deadlock, no same-pass delivery.
    source.set(1);
    assert_eq!(late.count(), 0);

    source.set(2);
    assert_eq!(late.count(), 1);
}

/// Explicitly unsubscribing an effect's id detaches it mid-lifetime even
/// while its handle stays alive.
#[test]
fn explicit_unsubscribe_detaches_live_effect() {
    let source = Signal::new(0);
    let run_count = Arc::new(AtomicUsize::new(0));

    let effect = Effect::new(
        {
            let run_count = run_count.clone();
            move || {
                run_count.fetch_add(1, Ordering::SeqCst);
            }
        },
        &[&source],
    );

    source.set(1);
    assert_eq!(run_count.load(Ordering::SeqCst), 1);

    source.unsubscribe(effect.id());
    source.set(2);
    assert_eq!(run_count.load(Ordering::SeqCst), 1);
}

/// `update` and `mutate` feed the same propagation path as `set`.
#[test]
fn update_and_mutate_propagate() {
    let source = Signal::new(2);

    let squared = Computed::new(
        {
            let source = source.clone();
            move || source.get() * source.get()
        },
        &[&source],
    );
    assert_eq!(squared.get(), 4);

    source.update(|v| v + 1);
    assert_eq!(squared.get(), 9);

    source.mutate(|v| *v += 1);
    assert_eq!(squared.get(), 16);
}

/// Sources and computeds expose one uniform read capability.
#[test]
fn readable_capability_is_uniform() {
    fn read_it<R: Readable>(node: &R) -> R::Value {
        node.get()
    }

    let source = Signal::new(5);
    let view = source.as_readonly();
    let doubled = Computed::new(
        {
            let source = source.clone();
            move || source.get() * 2
        },
        &[&source],
    );

    assert_eq!(read_it(&source), 5);
    assert_eq!(read_it(&view), 5);
    assert_eq!(read_it(&doubled), 10);
}
