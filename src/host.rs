//! # Host Platform Seam
//!
//! The watchface never draws or animates anything itself. It creates text
//! layers, moves their frames and schedules frame animations through the
//! [`Host`] trait, the same way a watch app drives its platform's layer and
//! animation services. [`Compositor`](crate::compositor::Compositor) is the
//! in-process implementation used by the binary and the tests.

use crate::animation::{AnimationId, StoppedHandler, Timing};
use embedded_graphics::{primitives::Rectangle, text::Alignment};

/// Opaque handle to a text layer owned by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayerId(pub(crate) usize);

/// Typeface family of a text layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Font {
    /// Large bold face for the hour line
    Bold,
    /// Large light face for the minute lines
    Light,
    /// Small face for date, weather and battery
    Small,
    /// Small bold face for the weekday
    SmallBold,
}

/// Presentation of a text layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextStyle {
    pub font: Font,
    pub alignment: Alignment,
}

impl TextStyle {
    pub const fn new(font: Font, alignment: Alignment) -> Self {
        Self { font, alignment }
    }
}

/// Layer and animation services provided by the platform.
///
/// Handles to destroyed layers or animations stay valid to pass around:
/// every operation on them is a no-op, and queries report "absent".
pub trait Host {
    /// Create a text layer at `frame`. New layers show no text.
    fn create_text_layer(&mut self, frame: Rectangle, style: TextStyle) -> LayerId;

    /// Destroy a layer. Animations targeting it keep their handles but stop moving anything.
    fn destroy_layer(&mut self, layer: LayerId);

    /// Current frame of a layer, `None` once destroyed.
    fn layer_frame(&self, layer: LayerId) -> Option<Rectangle>;

    fn set_layer_frame(&mut self, layer: LayerId, frame: Rectangle);

    /// Replace the text shown by a layer.
    fn set_layer_text(&mut self, layer: LayerId, text: &str);

    /// Create and schedule an animation moving `layer` from its current frame to `to`.
    ///
    /// The start frame is captured when the animation is scheduled. `on_stopped`
    /// runs exactly once: on completion, or when the animation is unscheduled.
    fn animate_frame(
        &mut self,
        layer: LayerId,
        to: Rectangle,
        timing: Timing,
        on_stopped: Option<StoppedHandler>,
    ) -> AnimationId;

    /// Whether the animation is still running.
    fn is_scheduled(&self, animation: AnimationId) -> bool;

    /// Stop a running animation where it is, firing its stopped handler with `finished = false`.
    fn unschedule(&mut self, animation: AnimationId);

    /// Release an animation, unscheduling it first if it is still running.
    fn destroy_animation(&mut self, animation: AnimationId);
}
