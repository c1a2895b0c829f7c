//! # Word Clock Text
//!
//! Spells a time of day as three short lines of English:
//!
//! | time  | line 1 | line 2  | line 3 |
//! |-------|--------|---------|--------|
//! | 10:00 | ten    | o'clock |        |
//! | 10:05 | ten    | oh      | five   |
//! | 10:13 | ten    | thir    | teen   |
//! | 10:15 | ten    | fifteen |        |
//! | 10:42 | ten    | forty   | two    |
//!
//! Teen words longer than seven letters do not fit the large font on one
//! line and are split into stem and "teen".

const UNITS: [&str; 20] = [
    "", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten", "eleven",
    "twelve", "thirteen", "fourteen", "fifteen", "sixteen", "seventeen", "eighteen", "nineteen",
];

const TENS: [&str; 6] = ["", "", "twenty", "thirty", "forty", "fifty"];

/// Longest teen word kept on a single line
const MAX_TEEN_LEN: usize = 7;

/// Hour word for a 24-hour `hour`; midnight and noon are both "twelve".
pub fn hour_word(hour: u32) -> &'static str {
    match hour % 12 {
        0 => "twelve",
        h => UNITS[h as usize],
    }
}

/// Spell `hour:minute` as three lines. Minutes past 59 wrap.
pub fn time_to_3words(hour: u32, minute: u32) -> [String; 3] {
    let minute = (minute % 60) as usize;
    let line1 = hour_word(hour).to_string();

    let (line2, line3) = match minute {
        0 => ("o'clock".to_string(), String::new()),
        1..=9 => ("oh".to_string(), UNITS[minute].to_string()),
        10..=19 => {
            let word = UNITS[minute];
            match word.strip_suffix("teen") {
                Some(stem) if word.len() > MAX_TEEN_LEN => (stem.to_string(), "teen".to_string()),
                _ => (word.to_string(), String::new()),
            }
        }
        _ => (
            TENS[minute / 10].to_string(),
            UNITS[minute % 10].to_string(),
        ),
    };

    [line1, line2, line3]
}
