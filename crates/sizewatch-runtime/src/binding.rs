#![forbid(unsafe_code)]

//! Lifecycle binding: per-consumer glue between a component's mount contract
//! and the shared registry.
//!
//! A [`ResizeBinding`] is created at attach time and guarantees removal at
//! detach time: dropping it unobserves its registration. Between those two
//! points it absorbs the churn a component lifecycle produces —
//!
//! - **Callback identity churn**: components hand over a fresh closure on
//!   every re-render. [`set_callback`](ResizeBinding::set_callback) swaps the
//!   stored callback in place (the trampoline), so the registration identity
//!   the registry keys on never changes and the latest closure is always the
//!   one invoked.
//! - **Dependency churn**: [`rebind`](ResizeBinding::rebind) re-registers
//!   only when the target handle or the options actually changed.
//!   Option-equivalent configurations are memoized into a no-op, so a
//!   re-render that rebuilds an equal options value costs nothing.
//!
//! Every successful observe is paired with exactly one unobserve on every
//! exit path: `rebind` unobserves the old record before observing the new
//! one, and `Drop` unobserves whichever record is live.
//!
//! # Example
//!
//! ```
//! use sizewatch_core::{ElementHandle, ElementId, ObserveOptions, Rect, ResizeEntry};
//! use sizewatch_runtime::binding::ResizeBinding;
//! use sizewatch_runtime::headless::HeadlessHost;
//! use sizewatch_runtime::registry::SharedObserver;
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! let host = HeadlessHost::new();
//! let registry = SharedObserver::new(host.factory());
//! let handle = ElementHandle::attached(ElementId::from_raw(1));
//!
//! let seen = Rc::new(Cell::new(0u32));
//! let sink = Rc::clone(&seen);
//! let binding = ResizeBinding::bind(&registry, handle, ObserveOptions::default(), move |_| {
//!     sink.set(sink.get() + 1);
//! });
//!
//! registry.dispatch(&[ResizeEntry::new(
//!     ElementId::from_raw(1),
//!     Rect::sized(64.0, 32.0),
//! )]);
//! assert_eq!(seen.get(), 1);
//!
//! drop(binding); // detach: unobserve runs exactly once
//! assert!(!registry.is_live());
//! ```

use std::rc::Rc;

use sizewatch_core::element::ElementHandle;
use sizewatch_core::entry::ResizeEntry;
use sizewatch_core::options::ObserveOptions;
use tracing::trace;

use crate::registry::{Registration, SharedObserver};

/// RAII binding of one consumer to the shared registry.
#[derive(Debug)]
pub struct ResizeBinding {
    registry: SharedObserver,
    record: Rc<Registration>,
}

impl ResizeBinding {
    /// Build a registration for `target` and observe it.
    ///
    /// If the handle is unattached nothing is registered yet; the consumer
    /// is expected to [`rebind`](Self::rebind) once the element mounts.
    #[must_use]
    pub fn bind(
        registry: &SharedObserver,
        target: ElementHandle,
        options: ObserveOptions,
        on_update: impl FnMut(&ResizeEntry) + 'static,
    ) -> Self {
        let record = Registration::new(target, options, on_update);
        registry.observe(&record);
        Self {
            registry: registry.clone(),
            record,
        }
    }

    /// Swap in the latest consumer callback without re-registering.
    ///
    /// Takes effect synchronously, before the next possible dispatch.
    pub fn set_callback(&self, on_update: impl FnMut(&ResizeEntry) + 'static) {
        self.record.set_callback(on_update);
    }

    /// Re-register against a (possibly) new target or options.
    ///
    /// Memoized: if `target` is the same slot and `options` are equal, this
    /// is a no-op — no platform traffic, no registration churn. Otherwise
    /// the old record is unobserved, and a new record carrying the current
    /// callback is observed.
    pub fn rebind(&mut self, target: ElementHandle, options: ObserveOptions) {
        if self.record.target().same_slot(&target) && self.record.options() == options {
            trace!("rebind skipped: equivalent target and options");
            return;
        }
        self.registry.unobserve(&self.record);
        let callback = self.record.replace_callback(Box::new(|_| {}));
        let record = Registration::from_boxed(target, options, callback);
        self.registry.observe(&record);
        self.record = record;
    }

    /// The live registration record.
    #[must_use]
    pub fn record(&self) -> &Rc<Registration> {
        &self.record
    }

    /// The currently bound target handle.
    #[must_use]
    pub fn target(&self) -> &ElementHandle {
        self.record.target()
    }

    /// The currently bound options.
    #[must_use]
    pub fn options(&self) -> ObserveOptions {
        self.record.options()
    }
}

impl Drop for ResizeBinding {
    fn drop(&mut self) {
        self.registry.unobserve(&self.record);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
