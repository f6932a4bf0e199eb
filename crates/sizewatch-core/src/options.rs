#![forbid(unsafe_code)]

//! Observation configuration.
//!
//! The single recognized option selects which box-model measurement the
//! consumer wants reported. The serialized form uses the platform's
//! kebab-case names (`content-box`, `border-box`, `device-pixel-content-box`).

/// Which box-model measurement to report for an observed element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum BoxEdge {
    /// The content area only.
    #[default]
    ContentBox,
    /// Content plus padding and border.
    BorderBox,
    /// The content area in device pixels, unaffected by zoom rounding.
    DevicePixelContentBox,
}

/// Options attached to a registration.
///
/// Option-equivalent values compare equal, which is what lifecycle bindings
/// rely on to suppress spurious re-registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObserveOptions {
    pub box_edge: BoxEdge,
}

impl ObserveOptions {
    /// Options reporting the given box edge.
    #[must_use]
    pub const fn new(box_edge: BoxEdge) -> Self {
        Self { box_edge }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_content_box() {
        assert_eq!(ObserveOptions::default().box_edge, BoxEdge::ContentBox);
    }

    #[test]
    fn option_equivalence() {
        assert_eq!(
            ObserveOptions::new(BoxEdge::BorderBox),
            ObserveOptions::new(BoxEdge::BorderBox)
        );
        assert_ne!(
            ObserveOptions::default(),
            ObserveOptions::new(BoxEdge::BorderBox)
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn box_edge_uses_platform_names() {
        assert_eq!(
            serde_json::to_string(&BoxEdge::DevicePixelContentBox).unwrap(),
            "\"device-pixel-content-box\""
        );
        let edge: BoxEdge = serde_json::from_str("\"border-box\"").unwrap();
        assert_eq!(edge, BoxEdge::BorderBox);
    }
}
