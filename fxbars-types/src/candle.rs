use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::FixTime;

/// A stored (or synthesized) OHLC bar keyed by its fix time.
///
/// OHLC consistency (`low <= open, close <= high`) is not enforced; upstream
/// data is trusted as delivered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candle {
    /// Bucket identifier within its series.
    pub fix_time: FixTime,
    /// Opening price.
    #[serde(with = "rust_decimal::serde::float")]
    pub open: Decimal,
    /// Highest price.
    #[serde(with = "rust_decimal::serde::float")]
    pub high: Decimal,
    /// Lowest price.
    #[serde(with = "rust_decimal::serde::float")]
    pub low: Decimal,
    /// Closing price.
    #[serde(with = "rust_decimal::serde::float")]
    pub close: Decimal,
    /// Number of ticks aggregated into the bar.
    pub tick_volume: i64,
}

/// A candle as delivered by the broker feed, before normalization.
///
/// `time` is in the broker's local clock, formatted `yyyy.MM.dd[ HH:mm]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCandle {
    /// Broker-local timestamp text.
    pub time: String,
    /// Highest price.
    #[serde(with = "rust_decimal::serde::float")]
    pub high: Decimal,
    /// Opening price.
    #[serde(with = "rust_decimal::serde::float")]
    pub open: Decimal,
    /// Closing price.
    #[serde(with = "rust_decimal::serde::float")]
    pub close: Decimal,
    /// Lowest price.
    #[serde(with = "rust_decimal::serde::float")]
    pub low: Decimal,
    /// Number of ticks in the bar.
    #[serde(default)]
    pub tick_volume: i64,
}
