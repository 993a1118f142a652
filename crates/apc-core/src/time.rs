//! Timestamp parsing for NIS values.
//!
//! apcupsd writes timestamps in one of two layouts:
//!
//! ```text
//! 2016-09-06 22:13:28 -0400        (long)
//! Tue Sep  6 22:13:28 EDT 2016     (Unix date)
//! ```
//!
//! Some fields carry `N/A` when the event has never happened.

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone};

use crate::error::DecodeError;

/// Layout of the long timestamp format.
pub const TIME_FORMAT_LONG: &str = "%Y-%m-%d %H:%M:%S %z";

/// Long layout as accepted on input: fractional seconds are optional.
const TIME_PARSE_LONG: &str = "%Y-%m-%d %H:%M:%S%.f %z";

/// Layout of the Unix date format, without weekday and zone.
const TIME_FORMAT_UNIX: &str = "%b %d %H:%M:%S%.f %Y";

/// Largest hour offset accepted in a `GMT+h` zone.
const MAX_GMT_OFFSET_HOURS: i32 = 23;

const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Parses a timestamp that may be `N/A`.
///
/// `N/A` yields `Ok(None)`. Otherwise the long layout is tried first, then the
/// Unix date layout; the first match wins.
pub fn parse_optional_time(value: &str) -> Result<Option<DateTime<FixedOffset>>, DecodeError> {
    if value == "N/A" {
        return Ok(None);
    }

    if let Ok(time) = DateTime::parse_from_str(value, TIME_PARSE_LONG) {
        return Ok(Some(time));
    }
    if let Some(time) = parse_unix_date(value) {
        return Ok(Some(time));
    }

    Err(DecodeError::InvalidTime(value.to_string()))
}

/// Parses `Mon Jan _2 15:04:05 MST 2006`.
///
/// Zone abbreviations carry no offset information, so the result is pinned to
/// UTC. `GMT+h` and `GMT-h` zones keep their offset. The weekday is checked
/// for syntax only.
fn parse_unix_date(value: &str) -> Option<DateTime<FixedOffset>> {
    let fields: Vec<&str> = value.split_whitespace().collect();
    let [weekday, month, day, clock, zone, year] = fields.as_slice() else {
        return None;
    };

    if !WEEKDAYS.contains(weekday) {
        return None;
    }
    let offset = zone_offset(zone)?;

    let rest = format!("{month} {day} {clock} {year}");
    let naive = NaiveDateTime::parse_from_str(&rest, TIME_FORMAT_UNIX).ok()?;
    offset.from_local_datetime(&naive).single()
}

/// Offset for a zone field: `GMT+h`/`GMT-h`, or UTC for an abbreviation of
/// three or more uppercase letters.
fn zone_offset(zone: &str) -> Option<FixedOffset> {
    if let Some(hours) = zone.strip_prefix("GMT").filter(|h| !h.is_empty()) {
        if !hours.starts_with(['+', '-']) {
            return None;
        }
        let hours: i32 = hours.parse().ok()?;
        if hours.abs() > MAX_GMT_OFFSET_HOURS {
            return None;
        }
        return FixedOffset::east_opt(hours * 3600);
    }

    if zone.len() < 3 || !zone.chars().all(|c| c.is_ascii_uppercase()) {
        return None;
    }
    FixedOffset::east_opt(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_not_available_is_none() {
        assert_eq!(parse_optional_time("N/A").unwrap(), None);
    }

    #[test]
    fn test_long_format_keeps_offset() {
        let time = parse_optional_time("2016-09-06 22:13:28 -0400")
            .unwrap()
            .unwrap();
        let edt = FixedOffset::west_opt(4 * 3600).unwrap();
        assert_eq!(
            time,
            edt.with_ymd_and_hms(2016, 9, 6, 22, 13, 28).unwrap()
        );
        assert_eq!(time.offset().local_minus_utc(), -4 * 3600);
    }

    #[test]
    fn test_unix_date_format() {
        let time = parse_optional_time("Tue Sep  6 22:13:28 EDT 2016")
            .unwrap()
            .unwrap();
        assert_eq!(time.year(), 2016);
        assert_eq!(time.month(), 9);
        assert_eq!(time.day(), 6);
        assert_eq!(time.hour(), 22);
        assert_eq!(time.offset().local_minus_utc(), 0);
    }

    #[test]
    fn test_long_format_fractional_seconds() {
        let time = parse_optional_time("2016-09-06 22:13:28.5 -0400")
            .unwrap()
            .unwrap();
        assert_eq!(time.second(), 28);
        assert_eq!(time.nanosecond(), 500_000_000);
        assert_eq!(time.offset().local_minus_utc(), -4 * 3600);
    }

    #[test]
    fn test_unix_date_gmt_offset_zone() {
        let time = parse_optional_time("Sun Mar  1 10:00:00 GMT+1 2020")
            .unwrap()
            .unwrap();
        let plus_one = FixedOffset::east_opt(3600).unwrap();
        assert_eq!(
            time,
            plus_one.with_ymd_and_hms(2020, 3, 1, 10, 0, 0).unwrap()
        );

        let time = parse_optional_time("Sun Mar  1 10:00:00 GMT-5 2020")
            .unwrap()
            .unwrap();
        assert_eq!(time.offset().local_minus_utc(), -5 * 3600);
    }

    #[test]
    fn test_unix_date_rejects_bad_gmt_offset() {
        assert!(parse_optional_time("Sun Mar  1 10:00:00 GMT+30 2020").is_err());
        assert!(parse_optional_time("Sun Mar  1 10:00:00 GMT1 2020").is_err());
    }

    #[test]
    fn test_unix_date_ignores_weekday_mismatch() {
        assert!(parse_optional_time("Mon Sep  6 22:13:28 UTC 2016").is_ok());
    }

    #[test]
    fn test_unparseable_names_value() {
        let err = parse_optional_time("sometime last week").unwrap_err();
        assert_eq!(err, DecodeError::InvalidTime("sometime last week".to_string()));
    }

    #[test]
    fn test_lowercase_na_is_not_special() {
        assert!(parse_optional_time("n/a").is_err());
    }
}
