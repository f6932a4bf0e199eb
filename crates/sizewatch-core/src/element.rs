#![forbid(unsafe_code)]

//! Element identity and the indirect target handle.
//!
//! # Design
//!
//! The host platform mints an opaque [`ElementId`] per live element. A
//! consumer never holds an id directly; it holds an [`ElementHandle`], an
//! indirect reference whose current value the host rewrites as the element
//! mounts, unmounts, or is swapped for another. Two handles are "the same"
//! when they share a slot (`Rc` pointer identity), regardless of what the
//! slot currently contains — registries key their bookkeeping on slot
//! identity so a value change never disturbs a registration.
//!
//! # Example
//!
//! ```
//! use sizewatch_core::element::{ElementHandle, ElementId};
//!
//! let handle = ElementHandle::unattached();
//! assert!(handle.current().is_none());
//!
//! let shared = handle.clone(); // same slot
//! handle.attach(ElementId::from_raw(7));
//! assert_eq!(shared.current(), Some(ElementId::from_raw(7)));
//! assert!(handle.same_slot(&shared));
//! assert!(!handle.same_slot(&ElementHandle::unattached()));
//! ```

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

/// Opaque identity of a live element, minted by the host platform.
///
/// Ids compare by value; the registry only ever tests them for equality
/// against the targets carried by notification entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ElementId(u64);

impl ElementId {
    /// Wrap a host-assigned raw identity.
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// The host-assigned raw identity.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The indirect, possibly-changing reference to an observed element.
///
/// Cloning a handle shares the slot: all clones see the same current value
/// and count as the same handle for registry bookkeeping.
#[derive(Clone, Default)]
pub struct ElementHandle {
    slot: Rc<Cell<Option<ElementId>>>,
}

impl ElementHandle {
    /// A handle whose element has not mounted yet.
    #[must_use]
    pub fn unattached() -> Self {
        Self::default()
    }

    /// A handle already pointing at a live element.
    #[must_use]
    pub fn attached(id: ElementId) -> Self {
        let handle = Self::default();
        handle.attach(id);
        handle
    }

    /// Point the handle at a live element. Called by the host on mount or
    /// when the element is swapped.
    pub fn attach(&self, id: ElementId) {
        self.slot.set(Some(id));
    }

    /// Clear the handle. Called by the host on unmount.
    pub fn detach(&self) {
        self.slot.set(None);
    }

    /// The element the handle currently points at, if any.
    #[must_use]
    pub fn current(&self) -> Option<ElementId> {
        self.slot.get()
    }

    /// Whether the handle currently points at a live element.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.slot.get().is_some()
    }

    /// Handle identity: do `self` and `other` share a slot?
    #[must_use]
    pub fn same_slot(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.slot, &other.slot)
    }
}

impl fmt::Debug for ElementHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementHandle")
            .field("current", &self.current())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unattached_has_no_current() {
        let handle = ElementHandle::unattached();
        assert!(handle.current().is_none());
        assert!(!handle.is_attached());
    }

    #[test]
    fn attach_detach_round_trip() {
        let handle = ElementHandle::unattached();
        handle.attach(ElementId::from_raw(3));
        assert_eq!(handle.current(), Some(ElementId::from_raw(3)));
        handle.detach();
        assert!(handle.current().is_none());
    }

    #[test]
    fn clones_share_the_slot() {
        let a = ElementHandle::attached(ElementId::from_raw(1));
        let b = a.clone();
        assert!(a.same_slot(&b));

        b.attach(ElementId::from_raw(2));
        assert_eq!(a.current(), Some(ElementId::from_raw(2)));
    }

    #[test]
    fn distinct_slots_with_equal_values_differ() {
        let a = ElementHandle::attached(ElementId::from_raw(9));
        let b = ElementHandle::attached(ElementId::from_raw(9));
        assert!(!a.same_slot(&b));
        assert_eq!(a.current(), b.current());
    }

    #[test]
    fn display_raw_id() {
        assert_eq!(ElementId::from_raw(42).to_string(), "#42");
    }
}
