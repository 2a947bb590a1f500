//! Period bucketing: canonical timestamps to fix times.
//!
//! Bucketing is additive, not floor-based: the fix time of a bar is its
//! canonical timestamp advanced by exactly one period. The feed delivers one
//! raw candle per period stamped with the period's opening instant, so the
//! fix time is the instant the bar closes. Two candles only share a fix time
//! when their canonical timestamps are equal.

use chrono::{NaiveDateTime, TimeDelta};
use fxbars_types::{Candle, FixTime, FxError, Granularity, RawCandle};
use rust_decimal::{Decimal, RoundingStrategy};

use super::normalize::normalize;

/// Advance a canonical timestamp by one period.
#[must_use]
pub fn shift_by_period(canonical: NaiveDateTime, period: TimeDelta) -> FixTime {
    FixTime::new(canonical + period)
}

/// Fix time of a canonical timestamp at the given granularity.
///
/// ```
/// use chrono::NaiveDate;
/// use fxbars_core::Granularity;
/// use fxbars_core::timeseries::bucket::bucket_of;
///
/// let canonical = NaiveDate::from_ymd_opt(2023, 7, 15).unwrap().and_hms_opt(16, 0, 0).unwrap();
/// let fix = bucket_of(canonical, Granularity::H1).unwrap();
/// assert_eq!(fix.to_string(), "2023-07-15 17:00:00");
/// ```
///
/// # Errors
/// Returns `InvalidGranularity` for `Granularity::Unknown`.
pub fn bucket_of(canonical: NaiveDateTime, granularity: Granularity) -> Result<FixTime, FxError> {
    Ok(shift_by_period(canonical, granularity.duration()?))
}

/// Normalize a raw broker timestamp and bucket it in one step.
///
/// # Errors
/// Returns `InvalidTimestampFormat` for a malformed timestamp (checked first)
/// or `InvalidGranularity` for `Granularity::Unknown`.
pub fn fix_time_of(raw: &str, granularity: Granularity) -> Result<FixTime, FxError> {
    let canonical = normalize(raw)?;
    bucket_of(canonical, granularity)
}

/// Round a price half away from zero, as a fixed-scale SQL `DECIMAL` column would.
#[must_use]
pub fn round_price(price: Decimal, price_scale: u32) -> Decimal {
    price.round_dp_with_strategy(price_scale, RoundingStrategy::MidpointAwayFromZero)
}

/// Turn a feed candle into a storable candle: normalize and bucket its
/// timestamp, and round prices to `price_scale` decimal places.
///
/// # Errors
/// Same as [`fix_time_of`].
pub fn to_stored(
    raw: &RawCandle,
    granularity: Granularity,
    price_scale: u32,
) -> Result<Candle, FxError> {
    Ok(Candle {
        fix_time: fix_time_of(&raw.time, granularity)?,
        open: round_price(raw.open, price_scale),
        high: round_price(raw.high, price_scale),
        low: round_price(raw.low, price_scale),
        close: round_price(raw.close, price_scale),
        tick_volume: raw.tick_volume,
    })
}
