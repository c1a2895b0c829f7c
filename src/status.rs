//! # Status Field Text
//!
//! Formatting for the four single-slot status fields shown around the word
//! clock, and the inbox that turns weather messages into the weather field.
//!
//! ## Weather Messages
//!
//! Weather arrives as a list of key/value tuples, the same shape a phone
//! companion app sends to the watch:
//!
//! | key | meaning          | value  |
//! |-----|------------------|--------|
//! | 0   | temperature (°C) | int    |
//! | 1   | daily low (°C)   | int    |
//! | 2   | daily high (°C)  | int    |
//! | 3   | conditions       | string |
//!
//! Values persist between messages, so a partial message only replaces the
//! fields it carries. Conditions starting with `X` mean "no weather
//! available" and the field shows a bare `X`.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::error;

/// Weather field text before the first message arrives
pub const WEATHER_LOADING: &str = "loading...";

/// Weather field text when no weather is available
pub const WEATHER_UNAVAILABLE: &str = "X";

/// Battery field text before a charge level is known
pub const BATTERY_UNKNOWN: &str = "XX%";

/// Longest weather string shown
const WEATHER_MAX_LEN: usize = 31;

/// English ordinal suffix for a day of the month.
pub fn day_suffix(day: u32) -> &'static str {
    match day {
        1 | 21 | 31 => "st",
        2 | 22 => "nd",
        3 | 23 => "rd",
        _ => "th",
    }
}

/// Date field text, e.g. "october 17th".
pub fn format_date(date: NaiveDate) -> String {
    let day = date.day();
    format!("{} {}{}", date.format("%B"), day, day_suffix(day)).to_lowercase()
}

/// Weekday field text, e.g. "saturday".
pub fn format_weekday(date: NaiveDate) -> String {
    date.format("%A").to_string().to_lowercase()
}

/// Battery field text, e.g. "85%".
pub fn format_battery(charge_percent: Option<u8>) -> String {
    match charge_percent {
        Some(percent) => format!("{}%", percent.min(100)),
        None => BATTERY_UNKNOWN.to_string(),
    }
}

/// Known weather message keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageKey {
    Temperature,
    Low,
    High,
    Conditions,
}

impl MessageKey {
    pub const fn code(self) -> u32 {
        match self {
            MessageKey::Temperature => 0,
            MessageKey::Low => 1,
            MessageKey::High => 2,
            MessageKey::Conditions => 3,
        }
    }
}

impl TryFrom<u32> for MessageKey {
    type Error = u32;

    fn try_from(code: u32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(MessageKey::Temperature),
            1 => Ok(MessageKey::Low),
            2 => Ok(MessageKey::High),
            3 => Ok(MessageKey::Conditions),
            other => Err(other),
        }
    }
}

/// Value carried by one message tuple.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TupleValue {
    Int(i32),
    Text(String),
}

impl std::fmt::Display for TupleValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TupleValue::Int(value) => write!(f, "{value}"),
            TupleValue::Text(value) => f.write_str(value),
        }
    }
}

/// One key/value pair of a message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tuple {
    pub key: u32,
    pub value: TupleValue,
}

impl Tuple {
    pub fn new(key: MessageKey, value: TupleValue) -> Self {
        Self {
            key: key.code(),
            value,
        }
    }
}

/// An inbound weather message.
pub type WeatherMessage = Vec<Tuple>;

/// Accumulates weather message fields and renders the weather field.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WeatherInbox {
    temperature: String,
    low: String,
    high: String,
    conditions: String,
}

impl WeatherInbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a message into the inbox and return the new weather field text.
    ///
    /// Unknown keys are logged and skipped.
    pub fn receive(&mut self, message: &[Tuple]) -> String {
        for tuple in message {
            match MessageKey::try_from(tuple.key) {
                Ok(MessageKey::Temperature) => self.temperature = tuple.value.to_string(),
                Ok(MessageKey::Low) => self.low = tuple.value.to_string(),
                Ok(MessageKey::High) => self.high = tuple.value.to_string(),
                Ok(MessageKey::Conditions) => self.conditions = tuple.value.to_string(),
                Err(key) => error!("App key: {} not found", key),
            }
        }
        self.text()
    }

    /// Weather field text for the fields received so far.
    pub fn text(&self) -> String {
        if self.conditions.starts_with('X') {
            return WEATHER_UNAVAILABLE.to_string();
        }

        let mut text = format!(
            "{}C ({}/{}) {}",
            self.temperature, self.low, self.high, self.conditions
        );
        if text.len() > WEATHER_MAX_LEN {
            let mut end = WEATHER_MAX_LEN;
            while !text.is_char_boundary(end) {
                end -= 1;
            }
            text.truncate(end);
        }
        text
    }
}
