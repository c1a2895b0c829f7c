//! # Rotating Text Line
//!
//! One of the three word-clock rows. Each line double-buffers its text across
//! two layers ("slots"): one rests in view, the other rests parked just off the
//! right edge of the screen. A rotation writes the new text into the parked
//! slot and slides both slots left together, so the new words push the old
//! ones off screen.
//!
//! ## State Machine
//!
//! ```text
//!            text changed                 text changed (redirect)
//! Settled ───────────────▶ Transitioning ◀──────────────┐
//!    ▲                          │   └────────────────────┘
//!    └──────────────────────────┘
//!        both slides stopped
//! ```
//!
//! While [`LineState::Settled`], which slot is visible is read back from the
//! live layer geometry. While [`LineState::Transitioning`], the slot sliding
//! in is treated as visible, so a second rotation arriving mid-slide writes
//! into the slot that is on its way out and redirects both slides from
//! wherever they currently are. Only a completed outgoing slide parks its
//! slot; a cancelled one leaves it at its interpolated offset.
//!
//! ## Animation Handles
//!
//! Each slot holds at most one animation handle. Any previous handle for a
//! slot is unscheduled and destroyed before a new slide is created for it,
//! and teardown does the same for both slots before destroying the layers.

use crate::animation::{AnimationId, StoppedHandler, Timing};
use crate::buffer::{truncate, TextBuffer};
use crate::geometry::{LineGeometry, SlotPosition};
use crate::host::{Host, LayerId, TextStyle};
use embedded_graphics::primitives::Rectangle;
use tracing::{debug, trace, warn};

/// One of the two layers of a line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Slot {
    /// Starts in view
    A,
    /// Starts parked
    B,
}

impl Slot {
    pub const fn index(self) -> usize {
        match self {
            Slot::A => 0,
            Slot::B => 1,
        }
    }

    pub const fn other(self) -> Slot {
        match self {
            Slot::A => Slot::B,
            Slot::B => Slot::A,
        }
    }
}

/// Per-line rotation state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineState {
    /// No slide running; slot geometry is at rest.
    Settled,
    /// Slides running; `incoming` is the slot moving into view.
    Transitioning { incoming: Slot },
}

/// Whether replacing `current` with `candidate` is a visible change.
///
/// `candidate` is compared as it would be stored, i.e. after truncation to the
/// line buffer capacity, so an over-long string that is already shown does not
/// rotate again.
pub fn needs_update(current: &str, candidate: &str) -> bool {
    let candidate = truncate(candidate);

    // Blanking a line is a change, blank to blank is not
    if candidate.is_empty() {
        return !current.is_empty();
    }

    current.as_bytes() != candidate.as_bytes()
}

/// A double-buffered, sliding text row.
#[derive(Debug)]
pub struct Line {
    geometry: LineGeometry,
    layers: [LayerId; 2],
    buffers: [TextBuffer; 2],
    animations: [Option<AnimationId>; 2],
    state: LineState,
    released: bool,
}

impl Line {
    /// Create both slot layers: slot A in view, slot B parked. Buffers start empty.
    pub fn new<H: Host>(host: &mut H, geometry: LineGeometry, style: TextStyle) -> Self {
        let a = host.create_text_layer(geometry.frame(SlotPosition::InView), style);
        let b = host.create_text_layer(geometry.frame(SlotPosition::Parked), style);

        Self {
            geometry,
            layers: [a, b],
            buffers: [TextBuffer::new(), TextBuffer::new()],
            animations: [None, None],
            state: LineState::Settled,
            released: false,
        }
    }

    pub fn geometry(&self) -> LineGeometry {
        self.geometry
    }

    pub fn layer(&self, slot: Slot) -> LayerId {
        self.layers[slot.index()]
    }

    pub fn buffer(&self, slot: Slot) -> &TextBuffer {
        &self.buffers[slot.index()]
    }

    /// Animation handle currently held for `slot`, running or completed.
    pub fn animation(&self, slot: Slot) -> Option<AnimationId> {
        self.animations[slot.index()]
    }

    /// Last known state, without consulting the host.
    pub fn state(&self) -> LineState {
        self.state
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    /// Slot currently resting in view, read from live geometry.
    ///
    /// Only meaningful while settled: mid-slide neither slot is at a resting
    /// offset and this falls back to slot B.
    pub fn in_view_slot<H: Host>(&self, host: &H) -> Slot {
        let frame = host.layer_frame(self.layers[Slot::A.index()]);

        match frame.and_then(|f| self.geometry.position_of(&f)) {
            Some(SlotPosition::InView) => Slot::A,
            Some(SlotPosition::Parked) => Slot::B,
            None => {
                warn!(frame = ?frame, "slot A is not at rest, assuming slot B is in view");
                Slot::B
            }
        }
    }

    /// Refresh the state from the host: a transition ends once neither slot
    /// has a running slide.
    pub fn poll_state<H: Host>(&mut self, host: &H) -> LineState {
        if let LineState::Transitioning { .. } = self.state {
            let running = self
                .animations
                .iter()
                .flatten()
                .any(|&id| host.is_scheduled(id));
            if !running {
                trace!(layer = ?self.layers[0], "line settled");
                self.state = LineState::Settled;
            }
        }
        self.state
    }

    /// Slot whose text is on screen, or on its way onto the screen.
    pub fn visible_slot<H: Host>(&mut self, host: &H) -> Slot {
        match self.poll_state(host) {
            LineState::Settled => self.in_view_slot(host),
            LineState::Transitioning { incoming } => incoming,
        }
    }

    /// Text of [`Line::visible_slot`].
    pub fn visible_text<H: Host>(&mut self, host: &H) -> &str {
        let slot = self.visible_slot(host);
        self.buffers[slot.index()].as_str()
    }

    /// Put `text` in the visible slot without animating.
    ///
    /// Used for the very first frame, before anything has been shown.
    pub fn show_immediately<H: Host>(&mut self, host: &mut H, text: &str) {
        let slot = self.visible_slot(host);
        let stored = self.buffers[slot.index()].write(text);
        host.set_layer_text(self.layers[slot.index()], stored);
    }

    /// Rotate to `text` if it differs from what is shown.
    ///
    /// Returns `true` when a slide was started. Unchanged text leaves buffers,
    /// layers and animations untouched.
    pub fn rotate_to<H: Host>(&mut self, host: &mut H, text: &str, timing: Timing) -> bool {
        if self.released {
            return false;
        }

        let current = self.visible_slot(host);
        if !needs_update(self.buffers[current.index()].as_str(), text) {
            return false;
        }

        // Never touch the visible slot's buffer: write into the other one
        let incoming = current.other();
        let stored = self.buffers[incoming.index()].write(text);
        host.set_layer_text(self.layers[incoming.index()], stored);
        debug!(?incoming, text = stored, "rotating line");

        self.slide_in(host, incoming, timing);
        true
    }

    /// Start the paired slides: `incoming` into view, the other slot out.
    fn slide_in<H: Host>(&mut self, host: &mut H, incoming: Slot, timing: Timing) {
        let outgoing = incoming.other();

        self.release_animation(host, incoming);
        let in_view = self.geometry.frame(SlotPosition::InView);
        let id = host.animate_frame(self.layers[incoming.index()], in_view, timing, None);
        self.animations[incoming.index()] = Some(id);

        self.release_animation(host, outgoing);
        let parked = self.geometry.frame(SlotPosition::Parked);
        // Cancelled slides stay where they are so a redirect picks up from there
        let park: StoppedHandler = Box::new(move |frame: &mut Rectangle, finished| {
            if finished {
                *frame = parked;
            }
        });
        let id = host.animate_frame(
            self.layers[outgoing.index()],
            self.geometry.exit_frame(),
            timing,
            Some(park),
        );
        self.animations[outgoing.index()] = Some(id);

        self.state = LineState::Transitioning { incoming };
    }

    /// Unschedule and destroy the handle held for `slot`, if any.
    fn release_animation<H: Host>(&mut self, host: &mut H, slot: Slot) {
        let Some(id) = self.animations[slot.index()].take() else {
            return;
        };
        if host.is_scheduled(id) {
            host.unschedule(id);
        }
        host.destroy_animation(id);
    }

    /// Cancel both slots' animations, then destroy both layers. Idempotent.
    pub fn release<H: Host>(&mut self, host: &mut H) {
        if self.released {
            return;
        }

        self.release_animation(host, Slot::A);
        self.release_animation(host, Slot::B);
        for layer in self.layers {
            host.destroy_layer(layer);
        }

        self.state = LineState::Settled;
        self.released = true;
    }
}
