#![forbid(unsafe_code)]

//! Convenience adapters over the shared registry.
//!
//! Both adapters own a [`ResizeBinding`] and reduce each dispatched entry to
//! a [`Size`] with the box edge the consumer asked for. They differ only in
//! how the result is exposed:
//!
//! - [`ObservedSize`] keeps the latest size in a [`SizeSignal`] — read it,
//!   watch its version, or subscribe for change notification. This is the
//!   re-rendering flavor.
//! - [`ObservedSizeCell`] writes the latest size silently into a shared
//!   cell — read it on demand, nothing is ever notified. This is the flavor
//!   for hot paths that poll during layout and must not trigger work.
//!
//! Until the first notification arrives both report [`Size::ZERO`].
//!
//! # Example
//!
//! ```
//! use sizewatch_core::{ElementHandle, ElementId, ObserveOptions, Rect, ResizeEntry};
//! use sizewatch_runtime::adapters::ObservedSize;
//! use sizewatch_runtime::headless::HeadlessHost;
//! use sizewatch_runtime::registry::SharedObserver;
//!
//! let host = HeadlessHost::new();
//! let registry = SharedObserver::new(host.factory());
//! let handle = ElementHandle::attached(ElementId::from_raw(1));
//!
//! let observed = ObservedSize::bind(&registry, handle, ObserveOptions::default());
//! registry.dispatch(&[ResizeEntry::new(
//!     ElementId::from_raw(1),
//!     Rect::sized(120.0, 80.0),
//! )]);
//! assert_eq!(observed.get().width, 120.0);
//! assert_eq!(observed.get().height, 80.0);
//! ```

use std::cell::Cell;
use std::rc::Rc;

use sizewatch_core::element::ElementHandle;
use sizewatch_core::geometry::Size;
use sizewatch_core::options::ObserveOptions;

use crate::binding::ResizeBinding;
use crate::registry::SharedObserver;
use crate::signal::{SizeSignal, SizeSubscription};

// ---------------------------------------------------------------------------
// ObservedSize
// ---------------------------------------------------------------------------

/// Reactive view of one element's size.
#[derive(Debug)]
pub struct ObservedSize {
    binding: ResizeBinding,
    signal: SizeSignal,
}

impl ObservedSize {
    /// Bind `target` and keep its extracted size in a signal.
    #[must_use]
    pub fn bind(registry: &SharedObserver, target: ElementHandle, options: ObserveOptions) -> Self {
        let signal = SizeSignal::default();
        let sink = signal.clone();
        let edge = options.box_edge;
        let binding = ResizeBinding::bind(registry, target, options, move |entry| {
            sink.set(entry.size(edge));
        });
        Self { binding, signal }
    }

    /// The latest extracted size; [`Size::ZERO`] before the first
    /// notification.
    #[must_use]
    pub fn get(&self) -> Size {
        self.signal.get()
    }

    /// The backing signal, for version-based dirty checking.
    #[must_use]
    pub fn signal(&self) -> &SizeSignal {
        &self.signal
    }

    /// Subscribe to size changes.
    pub fn subscribe(&self, callback: impl Fn(Size) + 'static) -> SizeSubscription {
        self.signal.subscribe(callback)
    }

    /// Follow the consumer to a new target or options.
    ///
    /// Re-registers only when something actually changed; the reducing
    /// callback is refreshed either way so a changed box edge takes effect.
    pub fn set_target(&mut self, target: ElementHandle, options: ObserveOptions) {
        let sink = self.signal.clone();
        let edge = options.box_edge;
        self.binding.rebind(target, options);
        self.binding.set_callback(move |entry| {
            sink.set(entry.size(edge));
        });
    }

    /// The underlying binding.
    #[must_use]
    pub fn binding(&self) -> &ResizeBinding {
        &self.binding
    }
}

// ---------------------------------------------------------------------------
// ObservedSizeCell
// ---------------------------------------------------------------------------

/// Silent view of one element's size: updated in place, never notifying.
#[derive(Debug)]
pub struct ObservedSizeCell {
    binding: ResizeBinding,
    cell: Rc<Cell<Size>>,
}

impl ObservedSizeCell {
    /// Bind `target` and keep its extracted size in a shared cell.
    #[must_use]
    pub fn bind(registry: &SharedObserver, target: ElementHandle, options: ObserveOptions) -> Self {
        let cell = Rc::new(Cell::new(Size::ZERO));
        let sink = Rc::clone(&cell);
        let edge = options.box_edge;
        let binding = ResizeBinding::bind(registry, target, options, move |entry| {
            sink.set(entry.size(edge));
        });
        Self { binding, cell }
    }

    /// The latest extracted size; [`Size::ZERO`] before the first
    /// notification.
    #[must_use]
    pub fn get(&self) -> Size {
        self.cell.get()
    }

    /// A shared handle to the cell, for consumers that poll from elsewhere.
    #[must_use]
    pub fn shared(&self) -> Rc<Cell<Size>> {
        Rc::clone(&self.cell)
    }

    /// Follow the consumer to a new target or options.
    pub fn set_target(&mut self, target: ElementHandle, options: ObserveOptions) {
        let sink = Rc::clone(&self.cell);
        let edge = options.box_edge;
        self.binding.rebind(target, options);
        self.binding.set_callback(move |entry| {
            sink.set(entry.size(edge));
        });
    }

    /// The underlying binding.
    #[must_use]
    pub fn binding(&self) -> &ResizeBinding {
        &self.binding
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
