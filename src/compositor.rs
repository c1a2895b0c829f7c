//! # In-Process Compositor
//!
//! A small retained-mode layer tree with a property-animation scheduler,
//! implementing [`Host`] for the watchface.
//!
//! ## Scheduling Model
//!
//! Nothing moves on its own. The owner of the event loop calls
//! [`Compositor::advance`] with the elapsed wall time between frames; every
//! scheduled animation steps its layer's origin along its timing curve and,
//! once it reaches its target, fires its stopped handler. All of this runs on
//! the caller's thread between watchface callbacks, so the rotation engine
//! never observes an animation half-way through a step.
//!
//! Completed animations are not freed automatically; their owner releases
//! them with [`Host::destroy_animation`], exactly like platform property
//! animations.

use crate::animation::{interpolate, AnimationId, StoppedHandler, Timing};
use crate::host::{Host, LayerId, TextStyle};
use embedded_graphics::{prelude::*, primitives::Rectangle};
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, trace};

/// A text layer in the tree.
#[derive(Clone, Debug)]
struct TextLayer {
    frame: Rectangle,
    text: String,
    style: TextStyle,
}

/// Read-only view of a live layer, used by the renderers.
#[derive(Clone, Copy, Debug)]
pub struct LayerView<'a> {
    pub id: LayerId,
    pub frame: Rectangle,
    pub text: &'a str,
    pub style: TextStyle,
}

struct FrameAnimation {
    layer: LayerId,
    from: Rectangle,
    to: Rectangle,
    timing: Timing,
    elapsed: Duration,
    scheduled: bool,
    on_stopped: Option<StoppedHandler>,
}

impl std::fmt::Debug for FrameAnimation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameAnimation")
            .field("layer", &self.layer)
            .field("from", &self.from)
            .field("to", &self.to)
            .field("elapsed", &self.elapsed)
            .field("scheduled", &self.scheduled)
            .field("has_stopped_handler", &self.on_stopped.is_some())
            .finish()
    }
}

/// Layer tree plus animation scheduler.
#[derive(Debug)]
pub struct Compositor {
    bounds: Size,
    layers: Vec<Option<TextLayer>>,
    animations: BTreeMap<AnimationId, FrameAnimation>,
    next_animation: u32,
}

impl Compositor {
    /// Create an empty compositor for a screen of `bounds` pixels.
    pub fn new(bounds: Size) -> Self {
        Self {
            bounds,
            layers: Vec::new(),
            animations: BTreeMap::new(),
            next_animation: 0,
        }
    }

    /// Screen size.
    pub fn bounds(&self) -> Size {
        self.bounds
    }

    /// Text currently shown by a layer, `None` once destroyed.
    pub fn layer_text(&self, layer: LayerId) -> Option<&str> {
        self.layer(layer).map(|l| l.text.as_str())
    }

    /// Live layers in creation order, which is also their drawing order.
    pub fn layers(&self) -> impl Iterator<Item = LayerView<'_>> {
        self.layers.iter().enumerate().filter_map(|(index, slot)| {
            slot.as_ref().map(|layer| LayerView {
                id: LayerId(index),
                frame: layer.frame,
                text: &layer.text,
                style: layer.style,
            })
        })
    }

    /// Number of live layers.
    pub fn layer_count(&self) -> usize {
        self.layers.iter().filter(|l| l.is_some()).count()
    }

    /// Number of allocated (not yet destroyed) animations, scheduled or not.
    pub fn animation_count(&self) -> usize {
        self.animations.len()
    }

    /// Number of allocated animations targeting `layer`.
    pub fn animations_on(&self, layer: LayerId) -> usize {
        self.animations
            .values()
            .filter(|a| a.layer == layer)
            .count()
    }

    /// Whether any animation is still running.
    pub fn is_animating(&self) -> bool {
        self.animations.values().any(|a| a.scheduled)
    }

    /// Step every scheduled animation by `elapsed`.
    ///
    /// Animations that reach their target are unscheduled and their stopped
    /// handlers run with `finished = true`, in scheduling order.
    pub fn advance(&mut self, elapsed: Duration) {
        let mut finished = Vec::new();

        for (id, animation) in self.animations.iter_mut() {
            if !animation.scheduled {
                continue;
            }

            animation.elapsed = (animation.elapsed + elapsed).min(animation.timing.duration);
            let progress = if animation.timing.duration.is_zero() {
                1.0
            } else {
                animation.elapsed.as_secs_f32() / animation.timing.duration.as_secs_f32()
            };

            let frame = if progress >= 1.0 {
                animation.to
            } else {
                interpolate(
                    animation.from,
                    animation.to,
                    animation.timing.curve.apply(progress),
                )
            };

            if let Some(Some(layer)) = self.layers.get_mut(animation.layer.0) {
                layer.frame = frame;
            }

            if progress >= 1.0 {
                animation.scheduled = false;
                finished.push(*id);
            }
        }

        for id in finished {
            trace!(?id, "animation finished");
            self.fire_stopped(id, true);
        }
    }

    fn layer(&self, layer: LayerId) -> Option<&TextLayer> {
        self.layers.get(layer.0).and_then(Option::as_ref)
    }

    fn layer_mut(&mut self, layer: LayerId) -> Option<&mut TextLayer> {
        self.layers.get_mut(layer.0).and_then(Option::as_mut)
    }

    /// Run an animation's stopped handler once, against its layer's frame.
    fn fire_stopped(&mut self, id: AnimationId, finished: bool) {
        let Some(animation) = self.animations.get_mut(&id) else {
            return;
        };
        let Some(handler) = animation.on_stopped.take() else {
            return;
        };
        let target = animation.layer;

        match self.layer_mut(target) {
            Some(layer) => handler(&mut layer.frame, finished),
            None => debug!(?id, "stopped handler skipped, layer already destroyed"),
        }
    }
}

impl Host for Compositor {
    fn create_text_layer(&mut self, frame: Rectangle, style: TextStyle) -> LayerId {
        self.layers.push(Some(TextLayer {
            frame,
            text: String::new(),
            style,
        }));
        LayerId(self.layers.len() - 1)
    }

    fn destroy_layer(&mut self, layer: LayerId) {
        if let Some(slot) = self.layers.get_mut(layer.0) {
            if slot.take().is_some() {
                trace!(?layer, "layer destroyed");
            }
        }
    }

    fn layer_frame(&self, layer: LayerId) -> Option<Rectangle> {
        self.layer(layer).map(|l| l.frame)
    }

    fn set_layer_frame(&mut self, layer: LayerId, frame: Rectangle) {
        if let Some(l) = self.layer_mut(layer) {
            l.frame = frame;
        }
    }

    fn set_layer_text(&mut self, layer: LayerId, text: &str) {
        if let Some(l) = self.layer_mut(layer) {
            l.text.clear();
            l.text.push_str(text);
        }
    }

    fn animate_frame(
        &mut self,
        layer: LayerId,
        to: Rectangle,
        timing: Timing,
        on_stopped: Option<StoppedHandler>,
    ) -> AnimationId {
        let id = AnimationId(self.next_animation);
        self.next_animation = self.next_animation.wrapping_add(1);

        let from = self.layer_frame(layer).unwrap_or(to);
        self.animations.insert(
            id,
            FrameAnimation {
                layer,
                from,
                to,
                timing,
                elapsed: Duration::ZERO,
                scheduled: true,
                on_stopped,
            },
        );
        trace!(?id, ?layer, from = ?from.top_left, to = ?to.top_left, "animation scheduled");
        id
    }

    fn is_scheduled(&self, animation: AnimationId) -> bool {
        self.animations
            .get(&animation)
            .is_some_and(|a| a.scheduled)
    }

    fn unschedule(&mut self, animation: AnimationId) {
        let Some(entry) = self.animations.get_mut(&animation) else {
            return;
        };
        if !entry.scheduled {
            return;
        }
        entry.scheduled = false;
        trace!(id = ?animation, "animation unscheduled");
        self.fire_stopped(animation, false);
    }

    fn destroy_animation(&mut self, animation: AnimationId) {
        self.unschedule(animation);
        self.animations.remove(&animation);
    }
}
