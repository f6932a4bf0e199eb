#![forbid(unsafe_code)]

//! The platform observer seam.
//!
//! The host platform provides an observation primitive that watches elements
//! and delivers batched change notifications. Instantiating one is
//! comparatively expensive, which is the whole reason the runtime multiplexes
//! registrations onto a single instance behind this trait.
//!
//! # Contract
//!
//! - [`observe`](PlatformObserver::observe) on an already-watched element
//!   replaces that element's options; it never duplicates a watch.
//! - [`unobserve`](PlatformObserver::unobserve) on an unwatched element is a
//!   no-op.
//! - [`disconnect`](PlatformObserver::disconnect) stops every watch. The
//!   registry calls it exactly once, immediately before dropping the
//!   instance, so implementations need not tolerate calls afterwards.
//!
//! Notification delivery is out of band: platform glue hands each batch to
//! the runtime registry's dispatch entry point. Everything is
//! single-threaded, so implementations need no `Send`/`Sync`.

use crate::element::ElementId;
use crate::options::ObserveOptions;

/// The underlying observation primitive, owned by the shared registry.
pub trait PlatformObserver {
    /// Start (or reconfigure) platform-level observation of an element.
    fn observe(&mut self, target: ElementId, options: ObserveOptions);

    /// Stop platform-level observation of an element.
    fn unobserve(&mut self, target: ElementId);

    /// Stop every watch; the instance is dropped right after.
    fn disconnect(&mut self);
}

/// Factory used by the registry to instantiate the primitive on demand.
///
/// Called when the first registration arrives and again after a full
/// teardown, so a factory must be able to produce any number of instances
/// over its life.
pub type PlatformFactory = Box<dyn Fn() -> Box<dyn PlatformObserver>>;
