//! # Rotation Scenario Tests
//!
//! Whole-tick scenarios for the word-clock lines, run against the in-process
//! compositor with a simulated clock. Each test drives ticks or rotation
//! requests, steps the animation scheduler by hand and then checks slot
//! geometry, buffers and animation handles.

use crate::animation::Timing;
use crate::battery::FixedBattery;
use crate::compositor::Compositor;
use crate::face::{StatusField, UnitsChanged, WatchFace};
use crate::geometry::LineGeometry;
use crate::host::{Font, Host, TextStyle};
use crate::line::{Line, LineState, Slot};
use chrono::{Duration as ChronoDuration, NaiveDate, NaiveDateTime};
use embedded_graphics::{prelude::*, text::Alignment};
use std::time::Duration;

const WIDTH: u32 = 144;
const SETTLE: Duration = Duration::from_secs(1);

fn at(hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 10, 17)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
}

fn start(time: NaiveDateTime, battery: u8) -> (Compositor, WatchFace) {
    let size = Size::new(WIDTH, 168);
    let mut host = Compositor::new(size);
    let mut face = WatchFace::new(&mut host, size, Timing::default());
    face.show_initial(&mut host, time, &FixedBattery(Some(battery)));
    (host, face)
}

fn x_of(host: &Compositor, line: &Line, slot: Slot) -> i32 {
    host.layer_frame(line.layer(slot))
        .expect("line layer should be alive")
        .top_left
        .x
}

/// Assert exactly one slot of every line is in view and the other parked.
fn assert_slots_at_rest(host: &Compositor, face: &WatchFace) {
    for (index, line) in face.lines().iter().enumerate() {
        let mut xs = [x_of(host, line, Slot::A), x_of(host, line, Slot::B)];
        xs.sort_unstable();
        assert_eq!(xs, [0, WIDTH as i32], "line {index} slots at {xs:?}");
    }
}

/// Slots are allowed anywhere on their slide paths, never beyond them.
fn assert_slots_on_slide_paths(host: &Compositor, face: &WatchFace) {
    let width = WIDTH as i32;
    for line in face.lines() {
        for slot in [Slot::A, Slot::B] {
            let x = x_of(host, line, slot);
            assert!((-width..=width).contains(&x), "slot {slot:?} strayed to {x}");
        }
    }
}

/// Run a simulated clock for `minutes`, one tick per minute, settling between ticks.
fn run_minutes(host: &mut Compositor, face: &mut WatchFace, from: NaiveDateTime, minutes: i64) {
    let mut previous = from;
    for step in 1..=minutes {
        let now = from + ChronoDuration::minutes(step);
        face.on_tick(
            host,
            now,
            UnitsChanged::between(previous, now),
            &FixedBattery(Some(50)),
        );
        for _ in 0..5 {
            host.advance(Duration::from_millis(100));
            assert_slots_on_slide_paths(host, face);
        }
        host.advance(SETTLE);
        assert!(face.is_settled(&*host));
        assert_slots_at_rest(host, face);
        previous = now;
    }
}

/// Test that every line keeps one slot in view and one parked across many ticks.
///
/// Three simulated hours cover hour rollovers, blank third lines and split
/// teen words; slots must stay on their slide paths while moving.
#[test]
fn slots_stay_exclusive_across_three_hours_of_ticks() {
    let from = at(9, 55);
    let (mut host, mut face) = start(from, 50);

    run_minutes(&mut host, &mut face, from, 180);

    assert_eq!(face.visible_texts(&host), ["twelve", "fifty", "five"]);
}

/// Test that a tick producing the same words starts no slide.
///
/// Neither buffer of any line may change and no animation handle is created.
#[test]
fn unchanged_words_do_not_rotate_or_touch_buffers() {
    let (mut host, mut face) = start(at(10, 42), 50);
    let before: Vec<_> = face
        .lines()
        .iter()
        .map(|line| (line.buffer(Slot::A).clone(), line.buffer(Slot::B).clone()))
        .collect();

    let report = face.on_tick(
        &mut host,
        at(10, 42),
        UnitsChanged::default(),
        &FixedBattery(Some(50)),
    );

    assert_eq!(report.rotated, 0);
    assert_eq!(host.animation_count(), 0);
    let after: Vec<_> = face
        .lines()
        .iter()
        .map(|line| (line.buffer(Slot::A).clone(), line.buffer(Slot::B).clone()))
        .collect();
    assert_eq!(before, after);
}

/// Test that an hour refresh with unchanged words only updates the battery.
#[test]
fn battery_only_refresh_rotates_nothing() {
    let (mut host, mut face) = start(at(10, 2), 80);
    assert_eq!(face.visible_texts(&host), ["ten", "oh", "two"]);

    // Same words, but the battery reading changed on an hour refresh
    let units = UnitsChanged {
        minute: true,
        hour: true,
        day: false,
    };
    let report = face.on_tick(&mut host, at(10, 2), units, &FixedBattery(Some(75)));

    assert_eq!(report.rotated, 0);
    assert!(report.weather_due);
    assert_eq!(host.animation_count(), 0);
    assert_eq!(
        host.layer_text(face.status_layer(StatusField::Battery)),
        Some("75%")
    );
    assert_eq!(face.visible_texts(&host), ["ten", "oh", "two"]);
}

/// Test that clearing "twelve" to "" rotates to a blank slot.
///
/// The newly visible buffer must be entirely zero so no stale bytes survive.
#[test]
fn clearing_a_line_rotates_to_a_zeroed_blank_slot() {
    let mut host = Compositor::new(Size::new(WIDTH, 168));
    let mut line = Line::new(
        &mut host,
        LineGeometry::new(87, WIDTH, 50),
        TextStyle::new(Font::Light, Alignment::Left),
    );
    line.show_immediately(&mut host, "twelve");

    assert!(line.rotate_to(&mut host, "", Timing::default()));
    host.advance(SETTLE);

    let visible = line.visible_slot(&host);
    assert_eq!(line.state(), LineState::Settled);
    assert_eq!(host.layer_text(line.layer(visible)), Some(""));
    assert!(line.buffer(visible).raw().iter().all(|&b| b == 0));
    // The old words are still parked in the other slot's buffer
    assert_eq!(line.buffer(visible.other()).as_str(), "twelve");
}

/// Test that a minute tick blanking the third line rotates it.
#[test]
fn clearing_happens_on_real_ticks() {
    // 10:09 "ten oh nine" -> 10:10 "ten ten": line two changes, line three blanks
    let (mut host, mut face) = start(at(10, 9), 50);

    let report = face.on_tick(
        &mut host,
        at(10, 10),
        UnitsChanged::between(at(10, 9), at(10, 10)),
        &FixedBattery(Some(50)),
    );
    host.advance(SETTLE);

    assert_eq!(report.rotated, 2);
    assert_eq!(face.visible_texts(&host), ["ten", "ten", ""]);
    assert_slots_at_rest(&host, &face);
}

/// Test that a tick arriving mid-slide ends on the latest words.
///
/// At rest each slot of the redirected line holds exactly one handle.
#[test]
fn second_tick_mid_slide_redirects_to_latest_words() {
    let (mut host, mut face) = start(at(10, 41), 50);

    face.on_tick(
        &mut host,
        at(10, 42),
        UnitsChanged::between(at(10, 41), at(10, 42)),
        &FixedBattery(Some(50)),
    );
    host.advance(Duration::from_millis(150));
    let report = face.on_tick(
        &mut host,
        at(10, 43),
        UnitsChanged::between(at(10, 42), at(10, 43)),
        &FixedBattery(Some(50)),
    );
    assert_eq!(report.rotated, 1);

    host.advance(SETTLE);
    assert!(face.is_settled(&host));
    assert_eq!(face.visible_texts(&host), ["ten", "forty", "three"]);
    assert_slots_at_rest(&host, &face);

    let third = &face.lines()[2];
    assert_eq!(host.animations_on(third.layer(Slot::A)), 1);
    assert_eq!(host.animations_on(third.layer(Slot::B)), 1);
}

/// Test that many rotations at uneven intervals never stack animations.
#[test]
fn burst_of_rotations_keeps_one_animation_per_slot() {
    let mut host = Compositor::new(Size::new(WIDTH, 168));
    let mut line = Line::new(
        &mut host,
        LineGeometry::new(50, WIDTH, 50),
        TextStyle::new(Font::Light, Alignment::Left),
    );
    line.show_immediately(&mut host, "zero");

    let words = ["one", "two", "three", "four", "five", "six", "seven", "eight"];
    for (i, word) in words.iter().cycle().take(40).enumerate() {
        line.rotate_to(&mut host, word, Timing::default());
        assert!(host.animations_on(line.layer(Slot::A)) <= 1);
        assert!(host.animations_on(line.layer(Slot::B)) <= 1);

        // Uneven gaps: some rotations land mid-slide, some after settling
        host.advance(Duration::from_millis((i as u64 * 37) % 450));
    }

    host.advance(SETTLE);
    assert_eq!(line.poll_state(&host), LineState::Settled);
    assert_eq!(line.visible_text(&host), "eight");
    assert!(host.animation_count() <= 2);

    let mut xs = [x_of(&host, &line, Slot::A), x_of(&host, &line, Slot::B)];
    xs.sort_unstable();
    assert_eq!(xs, [0, WIDTH as i32]);
}

/// Test that teardown during a slide releases everything and can run twice.
#[test]
fn teardown_mid_slide_is_idempotent() {
    let (mut host, mut face) = start(at(10, 59), 50);
    face.on_tick(
        &mut host,
        at(11, 0),
        UnitsChanged::between(at(10, 59), at(11, 0)),
        &FixedBattery(Some(50)),
    );
    host.advance(Duration::from_millis(120));
    assert!(host.is_animating());

    face.teardown(&mut host);
    assert_eq!(host.animation_count(), 0);
    assert_eq!(host.layer_count(), 0);

    face.teardown(&mut host);
    host.advance(SETTLE);
    assert_eq!(host.animation_count(), 0);
    assert!(face.lines().iter().all(|line| line.is_released()));
}

/// Test that a redirected line moves smoothly.
///
/// Sampled every 10 ms, no slot moves more than a few pixels per step. The
/// only allowed jump is a finished outgoing slot leaving the left edge and
/// landing on its parked position.
#[test]
fn redirected_slides_never_jump() {
    let (mut host, mut face) = start(at(10, 41), 50);
    let step = Duration::from_millis(10);
    let width = WIDTH as i32;

    let mut last = {
        let line = &face.lines()[2];
        [x_of(&host, line, Slot::A), x_of(&host, line, Slot::B)]
    };
    let mut check = |host: &Compositor, face: &WatchFace| {
        let line = &face.lines()[2];
        let now = [x_of(host, line, Slot::A), x_of(host, line, Slot::B)];
        for (before, after) in last.iter().zip(now.iter()) {
            let parked_after_exit = *before <= -width + 40 && *after == width;
            assert!(
                (before - after).abs() <= 40 || parked_after_exit,
                "slot jumped from {before} to {after}"
            );
        }
        last = now;
    };

    face.on_tick(
        &mut host,
        at(10, 42),
        UnitsChanged::between(at(10, 41), at(10, 42)),
        &FixedBattery(Some(50)),
    );
    for _ in 0..12 {
        host.advance(step);
        check(&host, &face);
    }

    face.on_tick(
        &mut host,
        at(10, 43),
        UnitsChanged::between(at(10, 42), at(10, 43)),
        &FixedBattery(Some(50)),
    );
    check(&host, &face);
    for _ in 0..60 {
        host.advance(step);
        check(&host, &face);
    }

    assert!(face.is_settled(&host));
    assert_eq!(face.visible_texts(&host), ["ten", "forty", "three"]);
    assert_slots_at_rest(&host, &face);
}
