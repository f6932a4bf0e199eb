#![forbid(unsafe_code)]

//! Shared observer registry: one platform primitive, many registrations.
//!
//! # Design
//!
//! [`SharedObserver`] owns at most one [`PlatformObserver`] and a flat set of
//! [`Registration`] records. The primitive is instantiated lazily when the
//! first registration arrives and destroyed — full teardown, not idling —
//! when the last one leaves. Dispatch scans the records and routes each
//! notification entry to every record whose handle *currently* points at the
//! entry's target, so a handle whose value changed after registration keeps
//! routing correctly without re-registration.
//!
//! Storage is keyed by record identity (`Rc` pointer), not by element, and
//! each record carries the element the platform is watching on its behalf.
//! When a handle's value drifts from that bookkeeping, the next dispatch
//! repairs the platform side: the stale element is unwatched (unless another
//! record still needs it) and the new value is watched.
//!
//! # Invariants
//!
//! 1. At most one platform primitive exists per registry; it exists whenever
//!    the registration set is non-empty.
//! 2. Entries within a batch are processed in delivery order, and each entry
//!    is routed to every currently-stored record whose handle matches it.
//! 3. No interior borrow is held across a callback invocation, so callbacks
//!    may freely call [`observe`](SharedObserver::observe),
//!    [`unobserve`](SharedObserver::unobserve), or replace other records'
//!    callbacks.
//! 4. A record removed mid-batch receives no further entries from that
//!    batch.
//!
//! # Failure Modes
//!
//! - **Re-entrant self-replacement**: a callback replacing *its own* record's
//!   callback from inside its invocation panics (`RefCell` borrow rules).
//!   This is intentional: it indicates a design bug in the consumer, the
//!   same class of bug as a re-entrant observable set.
//! - **Unattached handles**: observing or unobserving a record whose handle
//!   is unattached is a silent no-op. Worst case the reported size goes
//!   stale; nothing crashes.
//!
//! # Example
//!
//! ```
//! use sizewatch_core::{ElementHandle, ElementId, ObserveOptions, Rect, ResizeEntry};
//! use sizewatch_runtime::headless::HeadlessHost;
//! use sizewatch_runtime::registry::{Registration, SharedObserver};
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! let host = HeadlessHost::new();
//! let registry = SharedObserver::new(host.factory());
//!
//! let handle = ElementHandle::attached(ElementId::from_raw(1));
//! let seen = Rc::new(Cell::new(0u32));
//! let sink = Rc::clone(&seen);
//! let record = Registration::new(handle, ObserveOptions::default(), move |_entry| {
//!     sink.set(sink.get() + 1);
//! });
//!
//! registry.observe(&record);
//! registry.dispatch(&[ResizeEntry::new(
//!     ElementId::from_raw(1),
//!     Rect::sized(120.0, 80.0),
//! )]);
//! assert_eq!(seen.get(), 1);
//!
//! registry.unobserve(&record);
//! assert!(!registry.is_live()); // last registration gone: full teardown
//! ```

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use sizewatch_core::element::{ElementHandle, ElementId};
use sizewatch_core::entry::ResizeEntry;
use sizewatch_core::options::ObserveOptions;
use sizewatch_core::platform::{PlatformFactory, PlatformObserver};
use tracing::{debug, trace};

/// Boxed per-registration update callback.
pub type UpdateFn = Box<dyn FnMut(&ResizeEntry)>;

// ---------------------------------------------------------------------------
// Registration
// ---------------------------------------------------------------------------

/// One consumer's registration: target handle, update callback, options.
///
/// Records are held and compared by identity (the `Rc` allocation). The
/// callback is the only mutable part: refreshing it via
/// [`set_callback`](Registration::set_callback) leaves the identity — and
/// therefore the registry's bookkeeping — undisturbed.
pub struct Registration {
    target: ElementHandle,
    options: ObserveOptions,
    callback: RefCell<UpdateFn>,
    /// The element the platform is currently watching on this record's
    /// behalf. Maintained by the registry; `None` until observed.
    observed: Cell<Option<ElementId>>,
}

impl Registration {
    /// Create a record ready to be handed to [`SharedObserver::observe`].
    #[must_use]
    pub fn new(
        target: ElementHandle,
        options: ObserveOptions,
        on_update: impl FnMut(&ResizeEntry) + 'static,
    ) -> Rc<Self> {
        Self::from_boxed(target, options, Box::new(on_update))
    }

    /// Create a record from an already-boxed callback.
    ///
    /// Used by lifecycle bindings when re-registering: the live callback is
    /// moved from the old record into the new one.
    #[must_use]
    pub fn from_boxed(
        target: ElementHandle,
        options: ObserveOptions,
        callback: UpdateFn,
    ) -> Rc<Self> {
        Rc::new(Self {
            target,
            options,
            callback: RefCell::new(callback),
            observed: Cell::new(None),
        })
    }

    /// The record's target handle.
    #[must_use]
    pub fn target(&self) -> &ElementHandle {
        &self.target
    }

    /// The record's observation options.
    #[must_use]
    pub fn options(&self) -> ObserveOptions {
        self.options
    }

    /// Replace the update callback in place.
    ///
    /// Takes effect synchronously: the very next dispatched entry routed to
    /// this record invokes the new callback, never the stale one.
    ///
    /// # Panics
    ///
    /// Panics if called from inside this record's own callback invocation.
    pub fn set_callback(&self, on_update: impl FnMut(&ResizeEntry) + 'static) {
        *self.callback.borrow_mut() = Box::new(on_update);
    }

    pub(crate) fn replace_callback(&self, with: UpdateFn) -> UpdateFn {
        self.callback.replace(with)
    }

    pub(crate) fn invoke(&self, entry: &ResizeEntry) {
        (self.callback.borrow_mut())(entry);
    }

    pub(crate) fn observed(&self) -> Option<ElementId> {
        self.observed.get()
    }

    pub(crate) fn set_observed(&self, element: Option<ElementId>) {
        self.observed.set(element);
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("target", &self.target)
            .field("options", &self.options)
            .field("observed", &self.observed.get())
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// SharedObserver
// ---------------------------------------------------------------------------

struct RegistryInner {
    factory: PlatformFactory,
    platform: Option<Box<dyn PlatformObserver>>,
    records: Vec<Rc<Registration>>,
}

/// The shared observer registry.
///
/// Cloning a `SharedObserver` creates a new handle to the **same** registry —
/// the intended way to inject it into lifecycle bindings or scope it to a
/// subtree. There is no ambient global instance; whoever owns the tree owns
/// the registry.
pub struct SharedObserver {
    inner: Rc<RefCell<RegistryInner>>,
}

// Manual Clone: shares the same Rc.
impl Clone for SharedObserver {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl fmt::Debug for SharedObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("SharedObserver")
            .field("live", &inner.platform.is_some())
            .field("registrations", &inner.records.len())
            .finish()
    }
}

impl SharedObserver {
    /// Create a registry that instantiates its primitive via `factory`.
    ///
    /// The factory is called on the first registration and again after each
    /// full teardown.
    #[must_use]
    pub fn new(factory: impl Fn() -> Box<dyn PlatformObserver> + 'static) -> Self {
        Self {
            inner: Rc::new(RefCell::new(RegistryInner {
                factory: Box::new(factory),
                platform: None,
                records: Vec::new(),
            })),
        }
    }

    /// Begin observing a record's target.
    ///
    /// Instantiates the platform primitive if this is the first
    /// registration, starts platform-level observation of the target with
    /// the record's options, and stores the record for dispatch routing.
    ///
    /// No-op if the handle is unattached, or if the record is already
    /// stored.
    pub fn observe(&self, record: &Rc<Registration>) {
        let Some(target) = record.target().current() else {
            trace!("observe skipped: handle unattached");
            return;
        };
        let mut inner = self.inner.borrow_mut();
        if inner.records.iter().any(|r| Rc::ptr_eq(r, record)) {
            return;
        }
        if inner.platform.is_none() {
            let platform = (inner.factory)();
            inner.platform = Some(platform);
            debug!("platform observer created");
        }
        if let Some(platform) = inner.platform.as_mut() {
            platform.observe(target, record.options());
        }
        record.set_observed(Some(target));
        inner.records.push(Rc::clone(record));
        debug!(element = %target, registrations = inner.records.len(), "registration added");
    }

    /// Stop observing a record's target and forget the record.
    ///
    /// Platform-level observation of the element stops only when no other
    /// record still watches it. Removing the last record destroys the
    /// primitive entirely; a later [`observe`](Self::observe) builds a fresh
    /// one.
    ///
    /// No-op if the handle is unattached, or if the record was never stored.
    pub fn unobserve(&self, record: &Rc<Registration>) {
        if record.target().current().is_none() {
            trace!("unobserve skipped: handle unattached");
            return;
        }
        let mut inner = self.inner.borrow_mut();
        let Some(position) = inner.records.iter().position(|r| Rc::ptr_eq(r, record)) else {
            return;
        };
        inner.records.remove(position);
        if let Some(watched) = record.observed() {
            record.set_observed(None);
            let still_needed = inner.records.iter().any(|r| r.observed() == Some(watched));
            if !still_needed {
                if let Some(platform) = inner.platform.as_mut() {
                    platform.unobserve(watched);
                }
            }
        }
        debug!(registrations = inner.records.len(), "registration removed");
        if inner.records.is_empty() {
            if let Some(mut platform) = inner.platform.take() {
                platform.disconnect();
                debug!("platform observer torn down");
            }
        }
    }

    /// Deliver a platform notification batch.
    ///
    /// Entries are processed in delivery order. Each entry is routed to
    /// every stored record whose handle currently points at the entry's
    /// target; entries with no match are dropped silently (the element was
    /// unregistered between the platform's measurement pass and dispatch).
    ///
    /// Callbacks may observe or unobserve during dispatch: a record removed
    /// by an earlier callback is skipped for the remaining entries.
    pub fn dispatch(&self, entries: &[ResizeEntry]) {
        self.resync();
        for entry in entries {
            let matched: Vec<Rc<Registration>> = self
                .inner
                .borrow()
                .records
                .iter()
                .filter(|r| r.target().current() == Some(entry.target))
                .cloned()
                .collect();
            if matched.is_empty() {
                trace!(element = %entry.target, "entry dropped: no matching registration");
                continue;
            }
            for record in matched {
                // A callback earlier in this batch may have removed it.
                let still_stored = self
                    .inner
                    .borrow()
                    .records
                    .iter()
                    .any(|r| Rc::ptr_eq(r, &record));
                if !still_stored {
                    trace!(element = %entry.target, "entry skipped: record removed mid-batch");
                    continue;
                }
                record.invoke(entry);
            }
        }
    }

    /// Number of stored registrations.
    #[must_use]
    pub fn registration_count(&self) -> usize {
        self.inner.borrow().records.len()
    }

    /// Whether the platform primitive currently exists.
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.inner.borrow().platform.is_some()
    }

    /// Repair platform-side observation for handles whose value changed
    /// since registration.
    ///
    /// Runs at the start of every dispatch: for each record whose handle no
    /// longer matches its bookkeeping, the stale element is unwatched
    /// (unless another record still needs it) and the handle's new value,
    /// if any, is watched.
    fn resync(&self) {
        let mut inner = self.inner.borrow_mut();
        let RegistryInner {
            platform, records, ..
        } = &mut *inner;
        let Some(platform) = platform.as_mut() else {
            return;
        };
        for record in records.iter() {
            let current = record.target().current();
            let watched = record.observed();
            if current == watched {
                continue;
            }
            if let Some(stale) = watched {
                record.set_observed(None);
                let still_needed = records.iter().any(|r| r.observed() == Some(stale));
                if !still_needed {
                    platform.unobserve(stale);
                }
            }
            if let Some(fresh) = current {
                platform.observe(fresh, record.options());
                record.set_observed(Some(fresh));
                trace!(element = %fresh, "registration repaired to swapped target");
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
