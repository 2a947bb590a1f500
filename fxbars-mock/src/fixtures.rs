//! Deterministic feed candles for tests and examples.

use chrono::{NaiveDateTime, TimeDelta};
use fxbars_core::RawCandle;
use rust_decimal::Decimal;

/// Format a broker-local instant the way the feed stamps candles.
#[must_use]
pub fn broker_time(at: NaiveDateTime) -> String {
    at.format("%Y.%m.%d %H:%M").to_string()
}

/// `count` feed candles `step` apart starting at broker-local `start`.
///
/// Prices climb by one pip per candle from 1.10000; each candle spans five
/// pips above and four below its open and closes one pip up. Tick volume is
/// `100 + i`.
#[must_use]
pub fn raw_series(start: NaiveDateTime, step: TimeDelta, count: usize) -> Vec<RawCandle> {
    let pip = Decimal::new(1, 4);
    let base = Decimal::new(110_000, 5);
    (0..count)
        .map(|i| {
            let n = i64::try_from(i).unwrap_or(i64::MAX);
            let open = base + pip * Decimal::from(n);
            let steps = i32::try_from(i).unwrap_or(i32::MAX);
            RawCandle {
                time: broker_time(start + step * steps),
                open,
                high: open + pip * Decimal::from(5),
                low: open - pip * Decimal::from(4),
                close: open + pip,
                tick_volume: 100 + n,
            }
        })
        .collect()
}

/// A single feed candle with explicit prices.
#[must_use]
pub fn raw(
    time: &str,
    open: Decimal,
    high: Decimal,
    low: Decimal,
    close: Decimal,
    tick_volume: i64,
) -> RawCandle {
    RawCandle {
        time: time.to_string(),
        high,
        open,
        close,
        low,
        tick_volume,
    }
}
