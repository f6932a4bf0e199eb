#![forbid(unsafe_code)]

//! Resize notification entries and box-model size extraction.
//!
//! A [`ResizeEntry`] is one element's worth of a notification batch: the
//! target identity, its content rect, and whichever per-box measurements the
//! platform supplied. Platforms differ in which box sizes they report, so
//! every box size is optional and extraction falls back to `(0, 0)` rather
//! than failing — a stale size is acceptable, a crash is not.
//!
//! # Example
//!
//! ```
//! use sizewatch_core::element::ElementId;
//! use sizewatch_core::entry::ResizeEntry;
//! use sizewatch_core::geometry::{BoxSize, Rect, Size};
//! use sizewatch_core::options::BoxEdge;
//!
//! let entry = ResizeEntry::new(ElementId::from_raw(1), Rect::sized(120.0, 80.0))
//!     .with_border_box(BoxSize::new(128.0, 88.0));
//!
//! assert_eq!(entry.size(BoxEdge::ContentBox), Size::new(120.0, 80.0));
//! assert_eq!(entry.size(BoxEdge::BorderBox), Size::new(128.0, 88.0));
//! // Absent measurement: fallback, not an error.
//! assert_eq!(entry.size(BoxEdge::DevicePixelContentBox), Size::ZERO);
//! ```

use crate::element::ElementId;
use crate::geometry::{BoxSize, Rect, Size};
use crate::options::BoxEdge;

/// One change notification for one element.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResizeEntry {
    /// The element whose size changed.
    pub target: ElementId,
    /// The element's content rect. Always reported.
    pub content_rect: Rect,
    /// Content-box measurement, when the platform reports one.
    pub content_box_size: Option<BoxSize>,
    /// Border-box measurement, when the platform reports one.
    pub border_box_size: Option<BoxSize>,
    /// Device-pixel content-box measurement, when the platform reports one.
    pub device_pixel_content_box_size: Option<BoxSize>,
}

impl ResizeEntry {
    /// An entry carrying only the always-present content rect.
    #[must_use]
    pub fn new(target: ElementId, content_rect: Rect) -> Self {
        Self {
            target,
            content_rect,
            content_box_size: None,
            border_box_size: None,
            device_pixel_content_box_size: None,
        }
    }

    /// Attach a content-box measurement.
    #[must_use]
    pub fn with_content_box(mut self, size: BoxSize) -> Self {
        self.content_box_size = Some(size);
        self
    }

    /// Attach a border-box measurement.
    #[must_use]
    pub fn with_border_box(mut self, size: BoxSize) -> Self {
        self.border_box_size = Some(size);
        self
    }

    /// Attach a device-pixel content-box measurement.
    #[must_use]
    pub fn with_device_pixel_content_box(mut self, size: BoxSize) -> Self {
        self.device_pixel_content_box_size = Some(size);
        self
    }

    /// Extract the size for the requested box edge.
    ///
    /// Content-box extraction prefers the explicit content-box measurement
    /// and falls back to the content rect, which is always present. The
    /// other edges fall back to [`Size::ZERO`] when their measurement is
    /// absent.
    #[must_use]
    pub fn size(&self, edge: BoxEdge) -> Size {
        match edge {
            BoxEdge::ContentBox => self
                .content_box_size
                .map(BoxSize::to_size)
                .unwrap_or_else(|| self.content_rect.size()),
            BoxEdge::BorderBox => self
                .border_box_size
                .map(BoxSize::to_size)
                .unwrap_or(Size::ZERO),
            BoxEdge::DevicePixelContentBox => self
                .device_pixel_content_box_size
                .map(BoxSize::to_size)
                .unwrap_or(Size::ZERO),
        }
    }
}
