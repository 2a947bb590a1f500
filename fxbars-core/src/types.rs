//! Re-export of the shared fxbars data types.
// Downstream crates can depend on `fxbars-core` alone.

pub use fxbars_types::{
    Candle, Decimal, ErrorClass, FixTime, FxConfig, FxError, Granularity, LimitBounds, PairId,
    RawCandle,
};
