//! Strict `hh:mm:ss` timestamps.

use once_cell::sync::Lazy;
use regex_lite::Regex;

static TIME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d\d:\d\d:\d\d$").expect("valid time regex"));

/// Whether `value` is exactly two digits per field.
pub fn is_valid_time(value: &str) -> bool {
    TIME_REGEX.is_match(value)
}

/// Converts `hh:mm:ss` to milliseconds, `None` if the format is wrong.
pub fn time_to_millis(value: &str) -> Option<u64> {
    if !is_valid_time(value) {
        return None;
    }

    let mut fields = value.split(':').map(|f| f.parse::<u64>());
    let hours = fields.next()?.ok()?;
    let minutes = fields.next()?.ok()?;
    let seconds = fields.next()?.ok()?;

    Some(((hours * 60 + minutes) * 60 + seconds) * 1000)
}

/// Formats milliseconds as `hh:mm:ss`, dropping sub-second precision.
///
/// Hours are not wrapped at 24.
pub fn millis_to_time(millis: u64) -> String {
    let total_seconds = millis / 1000;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}
