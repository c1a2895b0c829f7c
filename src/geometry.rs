//! # Slot Geometry
//!
//! Every rotating line owns two text layers that only ever rest in one of two
//! horizontal positions: in view at `x = 0`, or parked exactly one display
//! width to the right. The rotation engine reasons about [`SlotPosition`]
//! values only; this module is the single place where those positions become
//! pixel frames.

use embedded_graphics::{prelude::*, primitives::Rectangle};

/// Resting position of a line slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotPosition {
    /// Fully on screen at horizontal offset 0
    InView,
    /// Fully off screen, one display width to the right
    Parked,
}

impl SlotPosition {
    /// Horizontal offset of this position for a display `display_width` pixels wide.
    pub const fn offset_x(self, display_width: u32) -> i32 {
        match self {
            SlotPosition::InView => 0,
            SlotPosition::Parked => display_width as i32,
        }
    }

    /// Map a live horizontal offset back to a resting position.
    ///
    /// Returns `None` for any intermediate offset, which only happens while a
    /// slide is in flight.
    pub const fn from_offset(x: i32, display_width: u32) -> Option<Self> {
        if x == 0 {
            Some(SlotPosition::InView)
        } else if x == display_width as i32 {
            Some(SlotPosition::Parked)
        } else {
            None
        }
    }
}

/// Fixed vertical band occupied by one rotating line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LineGeometry {
    /// Top edge of both slots
    pub y: i32,
    /// Display width; also the width of each slot
    pub width: u32,
    /// Slot height
    pub height: u32,
}

impl LineGeometry {
    pub const fn new(y: i32, width: u32, height: u32) -> Self {
        Self { y, width, height }
    }

    /// Frame of a slot resting at `position`.
    pub const fn frame(&self, position: SlotPosition) -> Rectangle {
        Rectangle::new(
            Point::new(position.offset_x(self.width), self.y),
            Size::new(self.width, self.height),
        )
    }

    /// Frame an outgoing slot slides to: one display width left of view.
    ///
    /// Slots never rest here; the outgoing slide's stopped handler moves the
    /// slot straight back to [`SlotPosition::Parked`].
    pub const fn exit_frame(&self) -> Rectangle {
        Rectangle::new(
            Point::new(-(self.width as i32), self.y),
            Size::new(self.width, self.height),
        )
    }

    /// Resting position of a live frame, if it is at rest.
    pub const fn position_of(&self, frame: &Rectangle) -> Option<SlotPosition> {
        SlotPosition::from_offset(frame.top_left.x, self.width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offsets_roundtrip_through_positions() {
        for position in [SlotPosition::InView, SlotPosition::Parked] {
            let x = position.offset_x(144);
            assert_eq!(SlotPosition::from_offset(x, 144), Some(position));
        }
    }

    #[test]
    fn test_intermediate_offset_is_not_at_rest() {
        assert_eq!(SlotPosition::from_offset(72, 144), None);
        assert_eq!(SlotPosition::from_offset(-144, 144), None);
    }

    #[test]
    fn test_line_frames() {
        let geometry = LineGeometry::new(50, 144, 50);

        let in_view = geometry.frame(SlotPosition::InView);
        assert_eq!(in_view.top_left, Point::new(0, 50));
        assert_eq!(in_view.size, Size::new(144, 50));

        let parked = geometry.frame(SlotPosition::Parked);
        assert_eq!(parked.top_left, Point::new(144, 50));

        assert_eq!(geometry.exit_frame().top_left, Point::new(-144, 50));
        assert_eq!(geometry.position_of(&parked), Some(SlotPosition::Parked));
    }
}
