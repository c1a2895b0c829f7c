//! # Text Watch Core Library
//!
//! This library drives a word-clock watchface: the time is spelled out on three
//! large text lines ("ten" / "forty" / "two"), surrounded by small date, weekday,
//! weather and battery fields.
//!
//! ## Design Philosophy
//!
//! ### Sliding Double Buffers
//! Each word-clock line owns two text layers and two fixed-capacity buffers. New
//! words are written into the parked, off-screen slot and slid into view while the
//! old words slide out. Lines whose words did not change are never touched, so a
//! minute tick usually animates a single line.
//!
//! ### Host Seam
//! The engine only talks to the platform through the [`host::Host`] trait: create
//! layers, move frames, set text, schedule and cancel frame animations. The
//! in-process [`compositor::Compositor`] implements it and advances animations
//! whenever the event loop hands it elapsed time.
//!
//! ### Single-Threaded Event Model
//! All display state is mutated from one event loop. Slides are fire-and-forget:
//! the engine schedules them and returns, and their stopped handlers run later
//! from inside [`compositor::Compositor::advance`]. Network I/O for weather runs
//! elsewhere and only hands finished messages back to the loop.
//!
//! ## Data Flow
//! 1. **Tick**: the loop detects a new minute and calls [`face::WatchFace::on_tick`]
//! 2. **Words**: [`words::time_to_3words`] spells the time as three lines
//! 3. **Rotate**: each [`line::Line`] compares, writes its parked buffer and slides
//! 4. **Animate**: the compositor steps the slides frame by frame
//! 5. **Render**: [`renderer`] draws the layer tree to a draw target or ASCII

// Module declarations
pub mod animation;
pub mod battery;
pub mod buffer;
pub mod compositor;
pub mod config;
pub mod face;
pub mod geometry;
pub mod host;
pub mod line;
pub mod renderer;
pub mod status;
pub mod weather;
pub mod words;

#[cfg(test)]
mod tests;

pub use face::{TickReport, UnitsChanged, WatchFace};
pub use line::{Line, LineState, Slot};
