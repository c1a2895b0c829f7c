//! # Watch Face
//!
//! The display context: three rotating word-clock lines plus the date,
//! weekday, weather and battery fields, all laid out on one screen.
//!
//! [`WatchFace`] owns every layer it creates and is driven entirely from the
//! outside: the event loop calls [`WatchFace::on_tick`] once per minute,
//! forwards weather messages, and calls [`WatchFace::teardown`] on exit. No
//! method blocks or waits for an animation; slides started on a tick are
//! left to the host's scheduler.

use crate::animation::Timing;
use crate::battery::BatterySource;
use crate::geometry::LineGeometry;
use crate::host::{Font, Host, LayerId, TextStyle};
use crate::line::{Line, LineState};
use crate::status::{
    format_battery, format_date, format_weekday, WeatherInbox, WeatherMessage, BATTERY_UNKNOWN,
    WEATHER_LOADING, WEATHER_UNAVAILABLE,
};
use crate::words::time_to_3words;
use chrono::{NaiveDate, NaiveDateTime, Timelike};
use embedded_graphics::{prelude::*, primitives::Rectangle, text::Alignment};
use tracing::{debug, info};

/// Top edges of the three word-clock lines
const LINE_TOPS: [i32; 3] = [13, 50, 87];
/// Height of a word-clock line
const LINE_HEIGHT: u32 = 50;
/// Width reserved for the battery field at the bottom left
const BATTERY_WIDTH: u32 = 40;
/// Height of the small status rows
const SMALL_ROW_HEIGHT: u32 = 18;
/// Distance of the weekday row from the bottom edge
const DAY_ROW_OFFSET: u32 = 33;
const WEATHER_HEIGHT: u32 = 20;

/// Which time units changed between two ticks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UnitsChanged {
    pub minute: bool,
    pub hour: bool,
    pub day: bool,
}

impl UnitsChanged {
    /// Everything changed; used for the first frame.
    pub const ALL: UnitsChanged = UnitsChanged {
        minute: true,
        hour: true,
        day: true,
    };

    /// Units that rolled over going from `previous` to `now`.
    ///
    /// A larger unit changing implies every smaller one did too.
    pub fn between(previous: NaiveDateTime, now: NaiveDateTime) -> Self {
        let day = previous.date() != now.date();
        let hour = day || previous.hour() != now.hour();
        let minute = hour || previous.minute() != now.minute();
        UnitsChanged { minute, hour, day }
    }
}

/// What a tick did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Lines that started a rotation
    pub rotated: usize,
    /// The hour rolled over and weather should be requested again
    pub weather_due: bool,
}

/// Single-slot status fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusField {
    Date,
    Day,
    Weather,
    Battery,
}

#[derive(Debug)]
struct StatusLayers {
    date: LayerId,
    day: LayerId,
    weather: LayerId,
    battery: LayerId,
}

/// Display context owning all lines and status fields.
#[derive(Debug)]
pub struct WatchFace {
    lines: [Line; 3],
    status: StatusLayers,
    inbox: WeatherInbox,
    timing: Timing,
    torn_down: bool,
}

impl WatchFace {
    /// Build every layer for a screen of `size`.
    ///
    /// Lines start blank; weather shows "loading..." and battery "XX%" until
    /// their first refresh.
    pub fn new<H: Host>(host: &mut H, size: Size, timing: Timing) -> Self {
        let bold = TextStyle::new(Font::Bold, Alignment::Left);
        let light = TextStyle::new(Font::Light, Alignment::Left);
        let lines = [
            Line::new(host, LineGeometry::new(LINE_TOPS[0], size.width, LINE_HEIGHT), bold),
            Line::new(host, LineGeometry::new(LINE_TOPS[1], size.width, LINE_HEIGHT), light),
            Line::new(host, LineGeometry::new(LINE_TOPS[2], size.width, LINE_HEIGHT), light),
        ];

        let bottom_row = size.height.saturating_sub(SMALL_ROW_HEIGHT) as i32;
        let date = host.create_text_layer(
            Rectangle::new(
                Point::new(BATTERY_WIDTH as i32, bottom_row),
                Size::new(size.width.saturating_sub(BATTERY_WIDTH), SMALL_ROW_HEIGHT),
            ),
            TextStyle::new(Font::Small, Alignment::Right),
        );
        let day = host.create_text_layer(
            Rectangle::new(
                Point::new(0, size.height.saturating_sub(DAY_ROW_OFFSET) as i32),
                Size::new(size.width, DAY_ROW_OFFSET),
            ),
            TextStyle::new(Font::SmallBold, Alignment::Right),
        );
        let weather = host.create_text_layer(
            Rectangle::new(Point::zero(), Size::new(size.width, WEATHER_HEIGHT)),
            TextStyle::new(Font::Small, Alignment::Right),
        );
        let battery = host.create_text_layer(
            Rectangle::new(
                Point::new(0, bottom_row),
                Size::new(BATTERY_WIDTH, SMALL_ROW_HEIGHT),
            ),
            TextStyle::new(Font::Small, Alignment::Left),
        );
        host.set_layer_text(weather, WEATHER_LOADING);
        host.set_layer_text(battery, BATTERY_UNKNOWN);

        Self {
            lines,
            status: StatusLayers {
                date,
                day,
                weather,
                battery,
            },
            inbox: WeatherInbox::new(),
            timing,
            torn_down: false,
        }
    }

    pub fn lines(&self) -> &[Line; 3] {
        &self.lines
    }

    pub fn status_layer(&self, field: StatusField) -> LayerId {
        match field {
            StatusField::Date => self.status.date,
            StatusField::Day => self.status.day,
            StatusField::Weather => self.status.weather,
            StatusField::Battery => self.status.battery,
        }
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Text each line shows, or is sliding in.
    pub fn visible_texts<H: Host>(&mut self, host: &H) -> [String; 3] {
        let [a, b, c] = &mut self.lines;
        [
            a.visible_text(host).to_string(),
            b.visible_text(host).to_string(),
            c.visible_text(host).to_string(),
        ]
    }

    /// Whether every line has finished sliding.
    pub fn is_settled<H: Host>(&mut self, host: &H) -> bool {
        self.lines
            .iter_mut()
            .all(|line| line.poll_state(host) == LineState::Settled)
    }

    /// First frame: words, date and battery, without any slide.
    pub fn show_initial<H: Host>(
        &mut self,
        host: &mut H,
        time: NaiveDateTime,
        battery: &dyn BatterySource,
    ) {
        if self.torn_down {
            return;
        }

        let words = time_to_3words(time.hour(), time.minute());
        for (line, text) in self.lines.iter_mut().zip(words.iter()) {
            line.show_immediately(host, text);
        }
        self.on_day_boundary(host, time.date());
        self.refresh_battery(host, battery);
        info!(time = %time.format("%H:%M"), "watchface started");
    }

    /// Minute tick: rotate changed lines, then refresh status fields whose unit rolled over.
    pub fn on_tick<H: Host>(
        &mut self,
        host: &mut H,
        time: NaiveDateTime,
        units: UnitsChanged,
        battery: &dyn BatterySource,
    ) -> TickReport {
        if self.torn_down {
            return TickReport::default();
        }

        let words = time_to_3words(time.hour(), time.minute());
        let mut rotated = 0;
        for (line, text) in self.lines.iter_mut().zip(words.iter()) {
            if line.rotate_to(host, text, self.timing) {
                rotated += 1;
            }
        }
        debug!(time = %time.format("%H:%M"), rotated, "tick");

        if units.day {
            self.on_day_boundary(host, time.date());
        }
        if units.hour {
            self.on_hour_boundary(host, battery);
        }

        TickReport {
            rotated,
            weather_due: units.hour,
        }
    }

    /// Re-format the date and weekday fields.
    pub fn on_day_boundary<H: Host>(&mut self, host: &mut H, date: NaiveDate) {
        host.set_layer_text(self.status.date, &format_date(date));
        host.set_layer_text(self.status.day, &format_weekday(date));
    }

    /// Refresh the battery field. Weather is re-requested by the caller.
    pub fn on_hour_boundary<H: Host>(&mut self, host: &mut H, battery: &dyn BatterySource) {
        self.refresh_battery(host, battery);
    }

    pub fn refresh_battery<H: Host>(&mut self, host: &mut H, battery: &dyn BatterySource) {
        let text = format_battery(battery.charge_percent());
        host.set_layer_text(self.status.battery, &text);
    }

    /// Fold an inbound weather message into the weather field.
    pub fn apply_weather<H: Host>(&mut self, host: &mut H, message: &WeatherMessage) {
        if self.torn_down {
            return;
        }
        let text = self.inbox.receive(message);
        host.set_layer_text(self.status.weather, &text);
    }

    /// A weather message was dropped or the request failed.
    pub fn weather_failed<H: Host>(&mut self, host: &mut H) {
        if self.torn_down {
            return;
        }
        host.set_layer_text(self.status.weather, WEATHER_UNAVAILABLE);
    }

    /// Cancel every line animation, then destroy all layers. Safe to call twice.
    pub fn teardown<H: Host>(&mut self, host: &mut H) {
        if self.torn_down {
            debug!("watchface already torn down");
            return;
        }

        for line in &mut self.lines {
            line.release(host);
        }
        for layer in [
            self.status.date,
            self.status.day,
            self.status.weather,
            self.status.battery,
        ] {
            host.destroy_layer(layer);
        }

        self.torn_down = true;
        info!("watchface torn down");
    }
}
