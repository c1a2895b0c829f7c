//! # Frame Animation Primitives
//!
//! Types shared between the rotation engine and whatever [`Host`](crate::host::Host)
//! runs the animations: timing curves, the timing of a single slide, opaque
//! animation handles and the stopped-handler callback type.

use embedded_graphics::{prelude::*, primitives::Rectangle};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Duration of every line slide
pub const SLIDE_DURATION: Duration = Duration::from_millis(400);

/// Timing curve applied to animation progress.
///
/// These mirror the curves a watch platform offers for property animations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Curve {
    /// Constant speed: `t`
    Linear,
    /// Slow start: `t³`
    EaseIn,
    /// Slow end: `1 - (1-t)³`
    #[default]
    EaseOut,
    /// Slow start and end
    EaseInOut,
}

impl Curve {
    /// Map linear progress (clamped to 0.0-1.0) onto this curve.
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);

        match self {
            Curve::Linear => t,
            Curve::EaseIn => t * t * t,
            Curve::EaseOut => {
                let inv = 1.0 - t;
                1.0 - inv * inv * inv
            }
            Curve::EaseInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let inv = -2.0 * t + 2.0;
                    1.0 - inv * inv * inv / 2.0
                }
            }
        }
    }
}

/// How long an animation runs and how its progress is shaped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timing {
    pub duration: Duration,
    pub curve: Curve,
}

impl Default for Timing {
    fn default() -> Self {
        Timing {
            duration: SLIDE_DURATION,
            curve: Curve::EaseOut,
        }
    }
}

/// Opaque handle to an animation owned by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnimationId(pub(crate) u32);

/// Callback run once when an animation stops.
///
/// Receives the animated layer's frame and whether the animation ran to
/// completion (`false` when it was unscheduled early).
pub type StoppedHandler = Box<dyn FnOnce(&mut Rectangle, bool)>;

/// Interpolate a frame's origin between `from` and `to`.
///
/// `progress` is already eased. The size is always taken from `to`.
pub fn interpolate(from: Rectangle, to: Rectangle, progress: f32) -> Rectangle {
    let lerp = |a: i32, b: i32| a + ((b - a) as f32 * progress).round() as i32;

    Rectangle::new(
        Point::new(
            lerp(from.top_left.x, to.top_left.x),
            lerp(from.top_left.y, to.top_left.y),
        ),
        to.size,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_curves_hit_endpoints() {
        for curve in [Curve::Linear, Curve::EaseIn, Curve::EaseOut, Curve::EaseInOut] {
            assert!((curve.apply(0.0) - 0.0).abs() < 1e-6, "{curve:?} at 0");
            assert!((curve.apply(1.0) - 1.0).abs() < 1e-6, "{curve:?} at 1");
        }
    }

    #[test]
    fn test_ease_out_front_loads_progress() {
        assert!(Curve::EaseOut.apply(0.5) > 0.5);
        assert!(Curve::EaseIn.apply(0.5) < 0.5);
        // Out of range input is clamped
        assert_eq!(Curve::EaseOut.apply(2.0), 1.0);
    }

    #[test]
    fn test_interpolate_origin() {
        let from = Rectangle::new(Point::new(144, 13), Size::new(144, 50));
        let to = Rectangle::new(Point::new(0, 13), Size::new(144, 50));

        assert_eq!(interpolate(from, to, 0.0), from);
        assert_eq!(interpolate(from, to, 1.0), to);
        assert_eq!(interpolate(from, to, 0.5).top_left, Point::new(72, 13));
    }

    #[test]
    fn test_default_timing() {
        let timing = Timing::default();
        assert_eq!(timing.duration, Duration::from_millis(400));
        assert_eq!(timing.curve, Curve::EaseOut);
    }
}
