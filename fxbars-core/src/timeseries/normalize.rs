//! Broker-local timestamps to canonical reference time.
//!
//! The broker clock runs on its own daylight-saving calendar:
//!
//! - April through September: summer.
//! - October: summer until the last Sunday of the month at 01:00, winter from then on.
//! - March: winter until the last Sunday of the month at 01:00, summer from then on.
//! - November through February: winter.
//!
//! Canonical time is broker time plus 6 hours in summer and plus 7 hours in winter.
//! The host time zone database is never consulted.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Timelike};
use fxbars_types::FxError;

/// Hours added to broker time while the broker observes its summer offset.
pub const SUMMER_SHIFT_HOURS: i64 = 6;
/// Hours added to broker time while the broker observes its winter offset.
pub const WINTER_SHIFT_HOURS: i64 = 7;

/// Hour of the last Sunday of March/October at which the offset switches.
const SWITCH_HOUR: u32 = 1;

/// Parse a broker timestamp of the form `yyyy.MM.dd[ HH:mm]`.
///
/// Month, day, hour and minute are two digits each; the time of day is
/// separated from the date by one or more whitespace characters and defaults
/// to `00:00` when absent.
///
/// # Errors
/// Returns `InvalidTimestampFormat` when the text does not match the pattern
/// or names a date that does not exist.
pub fn parse_broker_time(raw: &str) -> Result<NaiveDateTime, FxError> {
    let err = || FxError::invalid_timestamp(raw);

    let (date_part, time_part) = match raw.find(char::is_whitespace) {
        Some(idx) => {
            let rest = raw[idx..].trim_start();
            if rest.is_empty() {
                return Err(err());
            }
            (&raw[..idx], Some(rest))
        }
        None => (raw, None),
    };

    let date = parse_date(date_part).ok_or_else(err)?;
    let time = match time_part {
        Some(t) => parse_time(t).ok_or_else(err)?,
        None => NaiveTime::MIN,
    };
    Ok(date.and_time(time))
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    let b = s.as_bytes();
    if b.len() != 10 || b[4] != b'.' || b[7] != b'.' {
        return None;
    }
    let year = digits(&b[0..4])?;
    let month = digits(&b[5..7])?;
    let day = digits(&b[8..10])?;
    NaiveDate::from_ymd_opt(i32::try_from(year).ok()?, month, day)
}

fn parse_time(s: &str) -> Option<NaiveTime> {
    let b = s.as_bytes();
    if b.len() != 5 || b[2] != b':' {
        return None;
    }
    NaiveTime::from_hms_opt(digits(&b[0..2])?, digits(&b[3..5])?, 0)
}

fn digits(b: &[u8]) -> Option<u32> {
    b.iter().try_fold(0u32, |acc, &d| {
        d.is_ascii_digit().then(|| acc * 10 + u32::from(d - b'0'))
    })
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let (ny, nm) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(ny, nm, 1)
        .and_then(|d| d.pred_opt())
        .map_or(31, |d| d.day())
}

/// Whether `at` is at or past 01:00 on the last Sunday of its month.
///
/// The most recent Sunday on or before `at` is the month's last Sunday exactly
/// when a further week would run past the end of the month.
fn passed_last_sunday_switch(at: NaiveDateTime) -> bool {
    let since_sunday = at.weekday().num_days_from_sunday();
    let recent_sunday = i64::from(at.day()) - i64::from(since_sunday);
    let month_len = i64::from(days_in_month(at.year(), at.month()));
    if recent_sunday + 7 <= month_len {
        return false;
    }
    !(since_sunday == 0 && at.hour() < SWITCH_HOUR)
}

/// Classify a broker-local instant as summer (`true`) or winter (`false`).
///
/// ```
/// use chrono::NaiveDate;
/// use fxbars_core::timeseries::normalize::is_summer_time;
///
/// // 2023-03-26 is the last Sunday of March.
/// let day = NaiveDate::from_ymd_opt(2023, 3, 26).unwrap();
/// assert!(!is_summer_time(day.and_hms_opt(0, 59, 0).unwrap()));
/// assert!(is_summer_time(day.and_hms_opt(1, 0, 0).unwrap()));
/// ```
#[must_use]
pub fn is_summer_time(at: NaiveDateTime) -> bool {
    match at.month() {
        4..=9 => true,
        10 => !passed_last_sunday_switch(at),
        3 => passed_last_sunday_switch(at),
        _ => false,
    }
}

/// Shift applied to broker time to reach canonical time.
#[must_use]
pub fn canonical_shift(at: NaiveDateTime) -> TimeDelta {
    if is_summer_time(at) {
        TimeDelta::hours(SUMMER_SHIFT_HOURS)
    } else {
        TimeDelta::hours(WINTER_SHIFT_HOURS)
    }
}

/// Convert a parsed broker-local instant into canonical time.
#[must_use]
pub fn to_canonical(at: NaiveDateTime) -> NaiveDateTime {
    at + canonical_shift(at)
}

/// Parse a raw broker timestamp and convert it to canonical time.
///
/// ```
/// use fxbars_core::timeseries::normalize::normalize;
///
/// let summer = normalize("2023.07.15 10:00").unwrap();
/// assert_eq!(summer.to_string(), "2023-07-15 16:00:00");
///
/// let winter = normalize("2023.12.01 10:00").unwrap();
/// assert_eq!(winter.to_string(), "2023-12-01 17:00:00");
/// ```
///
/// # Errors
/// Returns `InvalidTimestampFormat` if `raw` is malformed.
pub fn normalize(raw: &str) -> Result<NaiveDateTime, FxError> {
    parse_broker_time(raw).map(to_canonical)
}
