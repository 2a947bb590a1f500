//! fxbars-core
//!
//! Core computation and contracts shared across the fxbars workspace.
//!
//! - `types`: common data structures (granularities, pairs, candles, errors).
//! - `timeseries`: time normalization, period bucketing and resampling.
//! - `validate`: request parameter checks.
//! - `store`: the `BarStore` and `StoreTx` traits and the scoped transaction.
//!
//! Async runtime
//! -------------
//! The store traits are `async_trait` interfaces; request deadlines use the
//! Tokio timer, so bounded transactions must run inside a Tokio runtime. The
//! computation in `timeseries` and `validate` is synchronous and performs no
//! I/O.
#![warn(missing_docs)]

/// Candle store contracts.
pub mod store;
/// Time-series computation.
pub mod timeseries;
pub mod types;
/// Parameter validation.
pub mod validate;

pub use store::{
    BarStore, Deadline, FixRange, StoreTx, in_transaction, in_transaction_within, with_deadline,
};
pub use timeseries::bucket::{bucket_of, fix_time_of, to_stored};
pub use timeseries::normalize::{is_summer_time, normalize};
pub use timeseries::resample::resample;
pub use types::*;
pub use validate::{CandleQuery, QueryParams};
