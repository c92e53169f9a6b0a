//! Local calendar-day bucketing shared by every calculator

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;

const DAY_FORMAT: &str = "%Y-%m-%d";

/// Canonical `YYYY-MM-DD` key of the local day a date/timestamp string falls on.
///
/// Accepts RFC 3339 instants (shifted into `tz`), offset-less date-times
/// (already local wall-clock) and plain dates. Returns `None` for blank or
/// unparseable input.
pub fn day_key(input: &str, tz: Tz) -> Option<String> {
    parse_local_day(input, tz).map(date_key)
}

pub fn parse_local_day(input: &str, tz: Tz) -> Option<NaiveDate> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    if let Ok(instant) = DateTime::parse_from_rfc3339(input) {
        return Some(instant.with_timezone(&tz).date_naive());
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.date());
    }
    NaiveDate::parse_from_str(input, DAY_FORMAT).ok()
}

/// Local day of a stored instant
pub fn local_day(instant: &DateTime<Utc>, tz: Tz) -> NaiveDate {
    instant.with_timezone(&tz).date_naive()
}

pub fn date_key(date: NaiveDate) -> String {
    date.format(DAY_FORMAT).to_string()
}

/// Every calendar day from `start` to `end`, both inclusive
pub fn each_day(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    start.iter_days().take_while(move |day| *day <= end)
}
