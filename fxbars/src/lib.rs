//! fxbars ingests forex OHLC candles and serves multi-timeframe views of them.
//!
//! Overview
//! - Write path: feed candles stamped in broker-local time are normalized to
//!   canonical time, bucketed to fix times, rounded, and upserted in one
//!   transaction (`FxBars::upload`).
//! - Read path: stored upper-granularity bars are combined with a synthesized
//!   in-progress bar built from lower-granularity bars (`FxBars::candles`).
//! - Housekeeping: per-pair listings, per-series fix-time summaries, and
//!   all-or-nothing deletion of whole granularities.
//! - `api`: a transport-facing adapter that validates raw text parameters and
//!   wraps every outcome in a status envelope.
//!
//! Key behaviors and trade-offs
//! - Bucketing is additive: a bar's fix time is its canonical timestamp plus one
//!   period. The feed delivers one candle per period, so no flooring happens.
//! - Upserts are last-write-wins per `(pair, granularity, fix time)`.
//! - Resampled bars are never persisted; every read recomputes them.
//! - Store failures are surfaced as-is without retry.
//!
//! Examples
//! ```rust,ignore
//! use std::sync::Arc;
//! use fxbars::{FxBars, Granularity, PairId};
//! use fxbars_mock::MemoryStore;
//!
//! let fx = FxBars::builder()
//!     .with_store(Arc::new(MemoryStore::new()))
//!     .build()
//!     .await?;
//! let eurusd = PairId::new("EURUSD")?;
//! let written = fx.upload(&eurusd, Granularity::M15, &raw_candles).await?;
//! ```
//!
//! See `fxbars/examples/` for a runnable end-to-end demonstration.
#![warn(missing_docs)]

pub mod api;
pub(crate) mod core;
mod router;

pub use core::{FxBars, FxBarsBuilder};
pub use router::util::collapse_errors;

// Re-export core types for convenience
pub use fxbars_core::{
    BarStore, Candle, CandleQuery, Decimal, ErrorClass, FixRange, FixTime, FxConfig, FxError,
    Granularity, LimitBounds, PairId, QueryParams, RawCandle, StoreTx,
};
