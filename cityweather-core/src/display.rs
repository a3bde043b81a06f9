//! Formatting of readings and times for human-readable output.

use chrono::{DateTime, TimeZone};
use std::fmt::Display;

pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S %Z";

/// Visibility in kilometres with one decimal, or `N/A` when unknown (0 m).
pub fn format_visibility(visibility_m: f64) -> String {
    if visibility_m == 0.0 {
        "N/A".to_string()
    } else {
        format!("{:.1} km", visibility_m / 1000.0)
    }
}

/// Capitalize the first letter of every word and lowercase the rest.
///
/// A word starts after any non-alphabetic character, so `"light rain/snow"`
/// becomes `"Light Rain/Snow"`.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;

    for ch in text.chars() {
        if ch.is_alphabetic() {
            if at_word_start {
                out.extend(ch.to_uppercase());
            } else {
                out.extend(ch.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(ch);
            at_word_start = true;
        }
    }

    out
}

pub fn format_time<Tz>(time: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    time.format(TIME_FORMAT).to_string()
}
