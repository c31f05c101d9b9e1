//! Regions, host signals, and scroll geometry.

use crate::model::ElementHandle;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A scrollable area being monitored.
///
/// Equality is identity: the viewport is a singleton and elements compare
/// by their host handle, never by what they contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    /// The top-level viewport.
    Viewport,
    /// A specific element inside the page.
    Element(ElementHandle),
}

impl Region {
    /// Whether this is the top-level viewport.
    pub fn is_viewport(&self) -> bool {
        matches!(self, Region::Viewport)
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Region::Viewport => f.write_str("viewport"),
            Region::Element(handle) => write!(f, "element{}", handle),
        }
    }
}

/// Named signals the host can deliver for a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Signal {
    /// Native scroll of the region's content.
    Scroll,
    /// Mouse wheel over the region.
    Wheel,
    /// Finger placed on the region.
    TouchStart,
    /// Finger lifted.
    TouchEnd,
    /// Finger dragged.
    TouchMove,
    /// Pointer entered the region.
    MouseEnter,
    /// Pointer left the region.
    MouseLeave,
}

impl Signal {
    /// Every signal, in declaration order.
    pub const ALL: [Signal; 7] = [
        Signal::Scroll,
        Signal::Wheel,
        Signal::TouchStart,
        Signal::TouchEnd,
        Signal::TouchMove,
        Signal::MouseEnter,
        Signal::MouseLeave,
    ];

    /// Host-facing signal name.
    pub fn name(self) -> &'static str {
        match self {
            Signal::Scroll => "scroll",
            Signal::Wheel => "wheel",
            Signal::TouchStart => "touch-start",
            Signal::TouchEnd => "touch-end",
            Signal::TouchMove => "touch-move",
            Signal::MouseEnter => "mouse-enter",
            Signal::MouseLeave => "mouse-leave",
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Vertical geometry of a region, in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Geometry {
    /// Full height of the content, including the part scrolled out of view.
    pub content_height: i64,
    /// Height of the visible part.
    pub visible_height: i64,
    /// Current scroll offset from the top.
    pub scroll_offset: i64,
}

impl Geometry {
    /// Build geometry from content height, visible height and offset.
    pub const fn new(content_height: i64, visible_height: i64, scroll_offset: i64) -> Self {
        Self {
            content_height,
            visible_height,
            scroll_offset,
        }
    }

    /// Whether the remaining content fits within the visible area plus `margin`.
    ///
    /// Inclusive: sitting exactly on the margin counts as the bottom.
    /// Computed in `i128` so host-reported extremes cannot overflow.
    pub fn is_near_bottom(&self, margin: u32) -> bool {
        let remaining = i128::from(self.content_height) - i128::from(self.scroll_offset);
        remaining <= i128::from(self.visible_height) + i128::from(margin)
    }

    /// Whether content exactly fills the visible area.
    ///
    /// Such a region never shows a scrollbar, so the host never emits a
    /// native scroll signal for it.
    pub fn fills_exactly(&self) -> bool {
        self.content_height == self.visible_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn near_bottom_when_remaining_within_margin() {
        // 1000 - 150 = 850 <= 800 + 75 = 875
        let g = Geometry::new(1000, 800, 150);
        assert!(g.is_near_bottom(75));
    }

    #[test]
    fn not_near_bottom_when_remaining_exceeds_margin() {
        // 1000 - 100 = 900 > 875
        let g = Geometry::new(1000, 800, 100);
        assert!(!g.is_near_bottom(75));
    }

    #[test]
    fn near_bottom_is_inclusive_at_margin() {
        // 1000 - 125 = 875 == 875
        let g = Geometry::new(1000, 800, 125);
        assert!(g.is_near_bottom(75));
        let just_above = Geometry::new(1000, 800, 124);
        assert!(!just_above.is_near_bottom(75));
    }

    #[test]
    fn near_bottom_survives_extreme_geometry() {
        // remaining exceeds i64::MAX
        assert!(!Geometry::new(i64::MAX, 800, -1).is_near_bottom(75));
        // remaining below i64::MIN
        assert!(Geometry::new(i64::MIN, 0, 1).is_near_bottom(0));
        assert!(Geometry::new(0, i64::MAX, 0).is_near_bottom(u32::MAX));
        assert!(!Geometry::new(i64::MAX, i64::MIN, i64::MIN).is_near_bottom(u32::MAX));
    }

    #[test]
    fn fills_exactly_only_on_equal_heights() {
        assert!(Geometry::new(600, 600, 0).fills_exactly());
        assert!(!Geometry::new(601, 600, 0).fills_exactly());
        assert!(!Geometry::new(300, 600, 0).fills_exactly());
    }

    #[test]
    fn signal_display_matches_serialized_name() {
        for signal in Signal::ALL {
            let json = serde_json::to_string(&signal).unwrap();
            assert_eq!(json, format!("\"{}\"", signal));
        }
    }

    #[test]
    fn signal_serializes_as_kebab_case() {
        let json = serde_json::to_string(&Signal::MouseEnter).unwrap();
        assert_eq!(json, r#""mouse-enter""#);
    }

    #[test]
    fn region_display() {
        assert_eq!(Region::Viewport.to_string(), "viewport");
        assert_eq!(
            Region::Element(ElementHandle::new(4)).to_string(),
            "element#4"
        );
    }
}
