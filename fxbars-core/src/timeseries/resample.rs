//! Multi-timeframe resampling with a synthesized in-progress bar.
//!
//! Stored upper-granularity bars are closed bars. The upper period that is
//! still forming at the anchor has no stored row, so it is rebuilt from the
//! lower-granularity bars stamped after the latest closed upper bar.

use fxbars_types::{Candle, FixTime, FxError, Granularity};
use rust_decimal::Decimal;

use crate::store::FixRange;

/// Fix-time window holding the lower bars of the still-open upper period.
///
/// Everything after the latest closed upper bar and at or before the anchor.
/// Without a closed upper bar the window is unbounded in the past.
#[must_use]
pub fn contributor_window(latest_closed: Option<&Candle>, anchor: FixTime) -> FixRange {
    match latest_closed {
        Some(c) => FixRange::between(c.fix_time, anchor),
        None => FixRange::until(anchor),
    }
}

/// Build the in-progress upper bar stamped at `anchor`.
///
/// `contributors` must be sorted oldest first. The latest closed upper bar
/// takes part in the high/low extremes only when its fix time lies inside the
/// upper period ending at `anchor`.
///
/// # Errors
/// `NoUpperAnchor` when `contributors` is empty, `InvalidGranularity` for
/// `Granularity::Unknown`.
pub fn synthesize_in_progress(
    contributors: &[Candle],
    latest_closed: Option<&Candle>,
    anchor: FixTime,
    upper: Granularity,
) -> Result<Candle, FxError> {
    let period = upper.duration()?;
    let (Some(first), Some(last), Some((mut high, mut low))) =
        (contributors.first(), contributors.last(), extremes(contributors))
    else {
        return Err(FxError::NoUpperAnchor {
            anchor: anchor.to_string(),
        });
    };
    let tick_volume = contributors
        .iter()
        .fold(0i64, |acc, c| acc.saturating_add(c.tick_volume));

    if let Some(closed) = latest_closed {
        let period_start = anchor.naive() - period;
        if closed.fix_time.naive() > period_start && closed.fix_time <= anchor {
            high = high.max(closed.high);
            low = low.min(closed.low);
        }
    }

    Ok(Candle {
        fix_time: anchor,
        open: first.open,
        high,
        low,
        close: last.close,
        tick_volume,
    })
}

/// Resample a lower-granularity series into the upper-granularity view at `anchor`.
///
/// `lower` may arrive in any order. `upper_closed` holds stored upper bars;
/// only those at or before `anchor` are used, newest first, at most `limit` of
/// them. The newest one bounds the in-progress window and the rest are
/// returned unchanged after the synthesized bar.
///
/// ```
/// use fxbars_core::{Candle, Decimal, FixTime, Granularity};
/// use fxbars_core::timeseries::resample::resample;
///
/// let bar = |t: &str, o: i64, h: i64, l: i64, c: i64| Candle {
///     fix_time: FixTime::parse(t).unwrap(),
///     open: Decimal::new(o, 0),
///     high: Decimal::new(h, 0),
///     low: Decimal::new(l, 0),
///     close: Decimal::new(c, 0),
///     tick_volume: 1,
/// };
/// let upper = vec![
///     bar("2023-07-15 16:00:00", 1, 5, 1, 4),
///     bar("2023-07-15 15:00:00", 2, 6, 2, 3),
/// ];
/// let lower = vec![
///     bar("2023-07-15 16:15:00", 4, 7, 3, 5),
///     bar("2023-07-15 16:30:00", 5, 9, 4, 6),
/// ];
/// let anchor = FixTime::parse("2023-07-15 16:30:00").unwrap();
/// let out = resample(lower, upper, anchor, Granularity::H1, 10).unwrap();
/// assert_eq!(out.len(), 2);
/// assert_eq!(out[0].fix_time, anchor);
/// assert_eq!((out[0].open, out[0].close), (Decimal::new(4, 0), Decimal::new(6, 0)));
/// assert_eq!(out[1].fix_time.to_string(), "2023-07-15 15:00:00");
/// ```
///
/// # Errors
/// `NoUpperAnchor` when no lower bar falls in the in-progress window,
/// `InsufficientData` when the result would hold fewer than two rows, and
/// `InvalidGranularity` for `Granularity::Unknown`.
pub fn resample(
    lower: Vec<Candle>,
    mut upper_closed: Vec<Candle>,
    anchor: FixTime,
    upper: Granularity,
    limit: usize,
) -> Result<Vec<Candle>, FxError> {
    upper_closed.retain(|c| c.fix_time <= anchor);
    upper_closed.sort_by(|a, b| b.fix_time.cmp(&a.fix_time));
    upper_closed.truncate(limit);

    let latest_closed = upper_closed.first();
    let window = contributor_window(latest_closed, anchor);

    let mut contributors: Vec<Candle> = lower
        .into_iter()
        .filter(|c| window.contains(c.fix_time))
        .collect();
    contributors.sort_by_key(|c| c.fix_time);

    let in_progress = synthesize_in_progress(&contributors, latest_closed, anchor, upper)?;

    let mut out = Vec::with_capacity(upper_closed.len());
    out.push(in_progress);
    out.extend(upper_closed.into_iter().skip(1));

    if out.len() < 2 {
        return Err(FxError::InsufficientData { rows: out.len() });
    }
    Ok(out)
}

/// Extremes of a non-empty run of candles as `(high, low)`.
#[must_use]
pub fn extremes(candles: &[Candle]) -> Option<(Decimal, Decimal)> {
    let first = candles.first()?;
    Some(candles.iter().fold((first.high, first.low), |(h, l), c| {
        (h.max(c.high), l.min(c.low))
    }))
}
