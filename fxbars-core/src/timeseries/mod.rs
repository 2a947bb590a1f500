//! Pure time-series computation: no I/O, no shared state.
//!
//! - `normalize`: broker-local timestamps to canonical time
//! - `bucket`: canonical timestamps to fix times
//! - `resample`: lower-granularity bars to the upper-granularity view
/// Broker daylight-saving calendar and timestamp parsing.
pub mod normalize;
/// Additive period bucketing and stored-candle construction.
pub mod bucket;
/// Multi-timeframe resampling.
pub mod resample;
