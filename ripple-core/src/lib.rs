//! Ripple Core
//!
//! This crate provides the core engine for the Ripple reactive state
//! library. It implements:
//!
//! - Mutable state cells (signals)
//! - Derived values recomputed on change (computeds)
//! - Side-effecting subscribers (effects)
//! - The weak-reference subscription substrate wiring them together
//!
//! # Architecture
//!
//! Everything lives in the `reactive` module. The three node kinds share
//! one substrate: an observer-side `notify` contract and an
//! observable-side `subscribe`/`unsubscribe` contract over ordered lists
//! of weak observer references. A write to a signal fans out depth-first
//! through the dependent subgraph — computeds recompute and propagate,
//! effects re-run — all within the call stack of the write.
//!
//! Dependency edges are explicit: each computed/effect names its upstream
//! nodes at construction. There is no automatic dependency tracking, no
//! batching, and no deduplication of diamond-shaped fan-out.
//!
//! # Example
//!
//! ```rust,ignore
//! use ripple_core::reactive::{Computed, Effect, Signal};
//!
//! // Create a signal
//! let count = Signal::new(0);
//!
//! // Create a derived value
//! let doubled = Computed::new(
//!     {
//!         let count = count.clone();
//!         move || count.get() * 2
//!     },
//!     &[&count],
//! );
//!
//! // Create an effect (does not run yet)
//! let printer = Effect::new(
//!     {
//!         let doubled = doubled.clone();
//!         move || println!("doubled: {}", doubled.get())
//!     },
//!     &[&doubled],
//! );
//!
//! // Update the signal
//! count.set(5);
//! // The computed refreshed, then the effect printed: "doubled: 10"
//! ```

pub mod reactive;
