//! fxbars-specific data transfer objects and configuration primitives.
#![warn(missing_docs)]

mod candle;
mod config;
mod error;
mod fix_time;
mod granularity;
mod pair;

pub use candle::{Candle, RawCandle};
pub use config::{FxConfig, LimitBounds};
pub use error::{ErrorClass, FxError};
pub use fix_time::FixTime;
pub use granularity::Granularity;
pub use pair::PairId;

pub use rust_decimal::Decimal;
