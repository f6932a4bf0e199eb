#![forbid(unsafe_code)]

//! Headless platform observer for CI testing and host-driven embedding.
//!
//! [`HeadlessHost`] plays the platform's role without any real layout
//! engine: it mints [`PlatformObserver`] instances whose every call is
//! recorded against shared host state. Tests drive a registry with the
//! host's factory, synthesize [`ResizeEntry`] batches by hand, and assert on
//! what the "platform" was asked to do:
//!
//! - how many primitive instances were ever created, and how many are live
//! - which elements are currently watched, and with which options
//! - how many full disconnects happened
//!
//! # Example
//!
//! ```
//! use sizewatch_core::{ElementHandle, ElementId, ObserveOptions};
//! use sizewatch_runtime::headless::HeadlessHost;
//! use sizewatch_runtime::registry::{Registration, SharedObserver};
//!
//! let host = HeadlessHost::new();
//! let registry = SharedObserver::new(host.factory());
//!
//! let handle = ElementHandle::attached(ElementId::from_raw(1));
//! let record = Registration::new(handle, ObserveOptions::default(), |_| {});
//! registry.observe(&record);
//!
//! assert_eq!(host.instances_created(), 1);
//! assert!(host.is_watching(ElementId::from_raw(1)));
//! ```

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use sizewatch_core::element::ElementId;
use sizewatch_core::options::ObserveOptions;
use sizewatch_core::platform::{PlatformFactory, PlatformObserver};

#[derive(Default)]
struct HostState {
    instances_created: u64,
    instances_live: u64,
    disconnects: u64,
    observe_calls: u64,
    unobserve_calls: u64,
    next_instance: u64,
    /// Live watches across all instances: (instance, element, options).
    watches: Vec<(u64, ElementId, ObserveOptions)>,
}

impl HostState {
    fn drop_instance_watches(&mut self, instance: u64) {
        self.watches.retain(|(owner, _, _)| *owner != instance);
    }
}

/// Shared state behind every observer a [`HeadlessHost`] mints.
///
/// Cloning shares the state; all accessors reflect the union of the live
/// instances.
#[derive(Clone, Default)]
pub struct HeadlessHost {
    state: Rc<RefCell<HostState>>,
}

impl HeadlessHost {
    /// Create a host with no instances and no watches.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A factory minting observers that record into this host.
    #[must_use]
    pub fn factory(&self) -> PlatformFactory {
        let state = Rc::clone(&self.state);
        Box::new(move || {
            let instance = {
                let mut state = state.borrow_mut();
                state.instances_created += 1;
                state.instances_live += 1;
                state.next_instance += 1;
                state.next_instance
            };
            let observer: Box<dyn PlatformObserver> = Box::new(HeadlessObserver {
                instance,
                state: Rc::clone(&state),
            });
            observer
        })
    }

    /// Instances ever created by this host's factory.
    #[must_use]
    pub fn instances_created(&self) -> u64 {
        self.state.borrow().instances_created
    }

    /// Instances currently alive (created minus dropped).
    #[must_use]
    pub fn live_instances(&self) -> u64 {
        self.state.borrow().instances_live
    }

    /// Full disconnects performed across all instances.
    #[must_use]
    pub fn disconnects(&self) -> u64 {
        self.state.borrow().disconnects
    }

    /// Total `observe` calls across all instances, including
    /// reconfigurations of an already-watched element.
    #[must_use]
    pub fn observe_calls(&self) -> u64 {
        self.state.borrow().observe_calls
    }

    /// Total `unobserve` calls across all instances.
    #[must_use]
    pub fn unobserve_calls(&self) -> u64 {
        self.state.borrow().unobserve_calls
    }

    /// Whether any live instance currently watches `element`.
    #[must_use]
    pub fn is_watching(&self, element: ElementId) -> bool {
        self.state
            .borrow()
            .watches
            .iter()
            .any(|(_, watched, _)| *watched == element)
    }

    /// Number of live watches across all instances.
    #[must_use]
    pub fn watch_count(&self) -> usize {
        self.state.borrow().watches.len()
    }

    /// The options the platform currently holds for `element`, if watched.
    #[must_use]
    pub fn options_for(&self, element: ElementId) -> Option<ObserveOptions> {
        self.state
            .borrow()
            .watches
            .iter()
            .find(|(_, watched, _)| *watched == element)
            .map(|(_, _, options)| *options)
    }
}

impl fmt::Debug for HeadlessHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("HeadlessHost")
            .field("instances_created", &state.instances_created)
            .field("instances_live", &state.instances_live)
            .field("watches", &state.watches.len())
            .finish()
    }
}

/// One minted primitive instance.
struct HeadlessObserver {
    instance: u64,
    state: Rc<RefCell<HostState>>,
}

impl PlatformObserver for HeadlessObserver {
    fn observe(&mut self, target: ElementId, options: ObserveOptions) {
        let mut state = self.state.borrow_mut();
        state.observe_calls += 1;
        let slot = state
            .watches
            .iter_mut()
            .find(|(owner, watched, _)| *owner == self.instance && *watched == target);
        match slot {
            // Re-observe replaces options, never duplicates the watch.
            Some((_, _, existing)) => *existing = options,
            None => state.watches.push((self.instance, target, options)),
        }
    }

    fn unobserve(&mut self, target: ElementId) {
        let mut state = self.state.borrow_mut();
        state.unobserve_calls += 1;
        state
            .watches
            .retain(|(owner, watched, _)| !(*owner == self.instance && *watched == target));
    }

    fn disconnect(&mut self) {
        let mut state = self.state.borrow_mut();
        state.disconnects += 1;
        state.drop_instance_watches(self.instance);
    }
}

impl Drop for HeadlessObserver {
    fn drop(&mut self) {
        let mut state = self.state.borrow_mut();
        state.instances_live = state.instances_live.saturating_sub(1);
        state.drop_instance_watches(self.instance);
    }
}
