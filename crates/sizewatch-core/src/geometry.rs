#![forbid(unsafe_code)]

//! Box-model geometry carried by resize notifications.
//!
//! All dimensions are `f64` logical pixels (device pixels for the
//! device-pixel content box). The types here are plain `Copy` data with no
//! behavior beyond construction and axis mapping.

// ---------------------------------------------------------------------------
// Size
// ---------------------------------------------------------------------------

/// A measured width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    /// The zero size, used as the fallback when a requested box-model
    /// measurement is absent from an entry.
    pub const ZERO: Self = Self {
        width: 0.0,
        height: 0.0,
    };

    /// Create a new size.
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

// ---------------------------------------------------------------------------
// BoxSize
// ---------------------------------------------------------------------------

/// A box-model measurement in logical axes.
///
/// Platforms report box sizes along the inline and block axes. SizeWatch
/// assumes horizontal writing mode: inline maps to width, block to height.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoxSize {
    pub inline_size: f64,
    pub block_size: f64,
}

impl BoxSize {
    /// Create a new box size.
    #[must_use]
    pub const fn new(inline_size: f64, block_size: f64) -> Self {
        Self {
            inline_size,
            block_size,
        }
    }

    /// Map the logical axes onto a width/height pair.
    #[must_use]
    pub const fn to_size(self) -> Size {
        Size::new(self.inline_size, self.block_size)
    }
}

// ---------------------------------------------------------------------------
// Rect
// ---------------------------------------------------------------------------

/// A positioned rectangle: the content rect of an observed element.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle.
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// A rectangle at the origin with the given dimensions.
    #[must_use]
    pub const fn sized(width: f64, height: f64) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    /// The rectangle's dimensions, position discarded.
    #[must_use]
    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}
