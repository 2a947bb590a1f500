pub mod candles;
pub mod delete;
pub mod pairs;
pub mod upload;

pub mod util;
