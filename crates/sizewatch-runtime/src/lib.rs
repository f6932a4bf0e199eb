#![forbid(unsafe_code)]

//! Runtime: the shared resize-observer registry and its consumers.
//!
//! # Role in SizeWatch
//! `sizewatch-runtime` multiplexes many (element, callback) registrations
//! onto one platform observation primitive. The primitive is expensive to
//! instantiate; a UI tree with hundreds of observed nodes gets exactly one.
//!
//! # Primary responsibilities
//! - **SharedObserver**: lazy instantiate-on-demand of the primitive,
//!   dispatch routing, full teardown when the last registration leaves.
//! - **ResizeBinding**: RAII lifecycle glue — observe on attach, unobserve
//!   exactly once on detach, memoized rebinds, callback trampoline.
//! - **SizeSignal / adapters**: reactive (`ObservedSize`) and silent
//!   (`ObservedSizeCell`) views of an element's extracted size.
//! - **Headless platform**: deterministic in-memory backend for CI and
//!   host-driven embedding.
//!
//! # Concurrency model
//! Single-threaded and cooperative: everything runs on the UI thread, either
//! synchronously from consumer attach/detach or from a platform-delivered
//! notification batch, and runs to completion without blocking. Nothing here
//! is `Send` or `Sync`; there is nothing to lock.

pub mod adapters;
pub mod binding;
pub mod headless;
pub mod registry;
pub mod signal;

pub use adapters::{ObservedSize, ObservedSizeCell};
pub use binding::ResizeBinding;
pub use headless::HeadlessHost;
pub use registry::{Registration, SharedObserver};
pub use signal::{SizeSignal, SizeSubscription};
