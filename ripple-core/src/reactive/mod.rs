//! Reactive Primitives
//!
//! This module implements the core reactive system: signals, computeds,
//! and effects, wired together by an explicit dependency graph with
//! push-based invalidation.
//!
//! # Concepts
//!
//! ## Signals
//!
//! A Signal is a mutable value cell others can observe. Writing to it
//! notifies every observer synchronously, depth-first, in subscription
//! order — unconditionally, with no equality short-circuit.
//!
//! ## Computeds
//!
//! A Computed is a derived value: a cached result of a pure computation
//! over explicitly listed upstream nodes. It recomputes inside the
//! notification that reaches it, then propagates to its own observers.
//!
//! ## Effects
//!
//! An Effect is a terminal subscriber that re-runs a procedure on
//! upstream change. It produces no value and nothing can depend on it.
//!
//! # Implementation Notes
//!
//! Dependencies are declared, not discovered: reading a node inside a
//! computation establishes no edge. Each computed/effect names its
//! upstream nodes at construction and the set is fixed for its lifetime.
//!
//! Observables hold their observers weakly. Dropping the last handle to a
//! computed or effect is enough to retire it; upstream nodes prune the
//! dead entry lazily during their next notification pass.

mod observer;
mod signal;
mod computed;
mod effect;

pub use observer::{NodeId, Observable, Observer, ObserverList, Readable, ReactiveError};
pub use signal::{ReadonlySignal, Signal};
pub use computed::Computed;
pub use effect::Effect;
