#![forbid(unsafe_code)]

//! Core: element identity, box-model geometry, and the platform observer seam.
//!
//! # Role in SizeWatch
//! `sizewatch-core` is the data layer. It owns the vocabulary shared between
//! the host platform and the runtime: element identities and handles, the
//! geometry delivered by resize notifications, observation options, and the
//! [`PlatformObserver`] trait behind which the platform's native observation
//! primitive lives.
//!
//! # Primary responsibilities
//! - **ElementHandle**: the indirect, possibly-changing reference to an
//!   observed element. Handle identity is slot identity, not value equality.
//! - **ResizeEntry**: one change notification, carrying the target identity
//!   and its freshly measured box sizes.
//! - **Box-model extraction**: [`ResizeEntry::size`] reduces an entry to a
//!   width/height pair for a chosen [`BoxEdge`], with a `(0, 0)` fallback
//!   when the requested measurement is absent.
//! - **Platform seam**: [`PlatformObserver`] and [`PlatformFactory`], the
//!   contract the runtime's shared registry drives.
//!
//! # How it fits in the system
//! The runtime (`sizewatch-runtime`) multiplexes many registrations onto one
//! `PlatformObserver` and routes dispatched [`ResizeEntry`] batches back to
//! per-registration callbacks. This crate stays free of registry policy so
//! platform backends only ever depend on the seam, not the runtime.

pub mod element;
pub mod entry;
pub mod geometry;
pub mod options;
pub mod platform;

pub use element::{ElementHandle, ElementId};
pub use entry::ResizeEntry;
pub use geometry::{BoxSize, Rect, Size};
pub use options::{BoxEdge, ObserveOptions};
pub use platform::{PlatformFactory, PlatformObserver};
