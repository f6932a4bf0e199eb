#![forbid(unsafe_code)]

//! Change-notifying size state for value-returning consumers.
//!
//! # Design
//!
//! [`SizeSignal`] wraps a [`Size`] in shared, reference-counted storage
//! (`Rc<RefCell<..>>`). Setting an unchanged value is a no-op; setting a
//! changed value bumps a version counter and notifies live subscribers in
//! registration order. Subscribers are stored as weak references and handed
//! back as RAII [`SizeSubscription`] guards; dead entries are pruned lazily
//! during notification.
//!
//! The version counter exists for render loops that prefer dirty-checking
//! over callbacks: compare against the last version seen and re-render on
//! mismatch.
//!
//! # Failure Modes
//!
//! - **Re-entrant set**: calling `set()` from within a subscriber callback
//!   panics (`RefCell` borrow rules). Re-entrant mutation indicates a design
//!   bug in the subscriber graph.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use sizewatch_core::geometry::Size;

type SubscriberRc = Rc<dyn Fn(Size)>;
type SubscriberWeak = Weak<dyn Fn(Size)>;

struct SignalInner {
    value: Size,
    version: u64,
    subscribers: Vec<SubscriberWeak>,
}

/// A shared, version-tracked size with change notification.
///
/// Cloning a `SizeSignal` creates a new handle to the **same** inner state.
///
/// # Invariants
///
/// 1. `version` increments by exactly 1 on each value-changing set.
/// 2. `set(v)` where `v == current` is a no-op.
/// 3. Subscribers are notified in registration order.
/// 4. Dead subscribers (dropped guards) are pruned lazily.
pub struct SizeSignal {
    inner: Rc<RefCell<SignalInner>>,
}

// Manual Clone: shares the same Rc.
impl Clone for SizeSignal {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl Default for SizeSignal {
    fn default() -> Self {
        Self::new(Size::ZERO)
    }
}

impl fmt::Debug for SizeSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("SizeSignal")
            .field("value", &inner.value)
            .field("version", &inner.version)
            .field("subscriber_count", &inner.subscribers.len())
            .finish()
    }
}

impl SizeSignal {
    /// Create a signal holding `initial` at version 0.
    #[must_use]
    pub fn new(initial: Size) -> Self {
        Self {
            inner: Rc::new(RefCell::new(SignalInner {
                value: initial,
                version: 0,
                subscribers: Vec::new(),
            })),
        }
    }

    /// The current size.
    #[must_use]
    pub fn get(&self) -> Size {
        self.inner.borrow().value
    }

    /// Set a new size. Notifies subscribers only if the value changed.
    ///
    /// # Panics
    ///
    /// Panics if called re-entrantly from within a subscriber callback.
    pub fn set(&self, value: Size) {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.value == value {
                return;
            }
            inner.value = value;
            inner.version += 1;
        }
        self.notify();
    }

    /// Current version. Increments by 1 on each value-changing set.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.borrow().version
    }

    /// Subscribe to size changes.
    ///
    /// Returns a guard; dropping it unsubscribes the callback (it will not
    /// run after drop, though its slot lingers until the next notification
    /// prunes it).
    pub fn subscribe(&self, callback: impl Fn(Size) + 'static) -> SizeSubscription {
        let strong: SubscriberRc = Rc::new(callback);
        self.inner
            .borrow_mut()
            .subscribers
            .push(Rc::downgrade(&strong));
        SizeSubscription { _guard: strong }
    }

    /// Number of registered subscribers, dead ones included until pruned.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().subscribers.len()
    }

    /// Notify live subscribers and prune dead ones.
    fn notify(&self) {
        // Collect live callbacks first so no borrow is held during calls.
        let (value, callbacks) = {
            let mut inner = self.inner.borrow_mut();
            inner.subscribers.retain(|w| w.strong_count() > 0);
            let callbacks: Vec<SubscriberRc> =
                inner.subscribers.iter().filter_map(Weak::upgrade).collect();
            (inner.value, callbacks)
        };
        for callback in &callbacks {
            callback(value);
        }
    }
}

/// RAII guard for a size subscriber; dropping it unsubscribes.
pub struct SizeSubscription {
    _guard: SubscriberRc,
}

impl fmt::Debug for SizeSubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SizeSubscription").finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn get_set_basic() {
        let signal = SizeSignal::default();
        assert_eq!(signal.get(), Size::ZERO);
        assert_eq!(signal.version(), 0);

        signal.set(Size::new(120.0, 80.0));
        assert_eq!(signal.get(), Size::new(120.0, 80.0));
        assert_eq!(signal.version(), 1);
    }

    #[test]
    fn equal_set_is_noop() {
        let signal = SizeSignal::new(Size::new(10.0, 10.0));
        let count = Rc::new(Cell::new(0u32));
        let sink = Rc::clone(&count);
        let _sub = signal.subscribe(move |_| sink.set(sink.get() + 1));

        signal.set(Size::new(10.0, 10.0));
        assert_eq!(signal.version(), 0);
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn subscriber_receives_new_value() {
        let signal = SizeSignal::default();
        let last = Rc::new(Cell::new(Size::ZERO));
        let sink = Rc::clone(&last);
        let _sub = signal.subscribe(move |size| sink.set(size));

        signal.set(Size::new(3.0, 4.0));
        assert_eq!(last.get(), Size::new(3.0, 4.0));
    }

    #[test]
    fn drop_guard_unsubscribes() {
        let signal = SizeSignal::default();
        let count = Rc::new(Cell::new(0u32));
        let sink = Rc::clone(&count);
        let sub = signal.subscribe(move |_| sink.set(sink.get() + 1));

        signal.set(Size::new(1.0, 1.0));
        assert_eq!(count.get(), 1);

        drop(sub);
        signal.set(Size::new(2.0, 2.0));
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn notification_order_is_registration_order() {
        let signal = SizeSignal::default();
        let log = Rc::new(RefCell::new(Vec::new()));

        let log_a = Rc::clone(&log);
        let _a = signal.subscribe(move |_| log_a.borrow_mut().push('A'));
        let log_b = Rc::clone(&log);
        let _b = signal.subscribe(move |_| log_b.borrow_mut().push('B'));

        signal.set(Size::new(1.0, 1.0));
        assert_eq!(*log.borrow(), vec!['A', 'B']);
    }

    #[test]
    fn dead_subscribers_pruned_on_notify() {
        let signal = SizeSignal::default();
        let _keep = signal.subscribe(|_| {});
        let dead = signal.subscribe(|_| {});
        drop(dead);
        assert_eq!(signal.subscriber_count(), 2);

        signal.set(Size::new(1.0, 1.0));
        assert_eq!(signal.subscriber_count(), 1);
    }

    #[test]
    fn clone_shares_state() {
        let a = SizeSignal::default();
        let b = a.clone();

        a.set(Size::new(5.0, 6.0));
        assert_eq!(b.get(), Size::new(5.0, 6.0));
        assert_eq!(b.version(), 1);
    }

    #[test]
    fn version_monotonic_over_changes() {
        let signal = SizeSignal::default();
        for i in 1..=10 {
            signal.set(Size::new(i as f64, 0.0));
        }
        assert_eq!(signal.version(), 10);
    }
}
