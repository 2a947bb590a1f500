use std::sync::Arc;

use chrono::{NaiveDate, TimeDelta};
use fxbars::{CandleQuery, FixTime, FxBars, Granularity, PairId};
use fxbars_mock::MemoryStore;
use fxbars_mock::fixtures::raw_series;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Set RUST_LOG=fxbars=debug (with --features tracing) to see the spans.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // 1. Build the service over an in-memory store.
    let fx = FxBars::builder()
        .with_store(Arc::new(MemoryStore::new()))
        .build()
        .await?;

    // 2. Upload a summer morning of hourly and quarter-hour bars, stamped in
    //    broker time.
    let eurusd = PairId::new("EURUSD")?;
    let morning = NaiveDate::from_ymd_opt(2023, 7, 15)
        .and_then(|d| d.and_hms_opt(8, 0, 0))
        .ok_or("invalid start time")?;
    let quarter_start = morning + TimeDelta::hours(2);
    let hourly = raw_series(morning, TimeDelta::hours(1), 3);
    let quarter = raw_series(quarter_start, TimeDelta::minutes(15), 5);
    fx.upload(&eurusd, Granularity::H1, &hourly).await?;
    fx.upload(&eurusd, Granularity::M15, &quarter).await?;
    println!(
        "stored H1 fix times: {:?}",
        fx.summary(&eurusd, Granularity::H1).await?
    );

    // 3. Ask for the hourly view at 17:15; the first row is the open hour.
    let query = CandleQuery {
        pair: eurusd.clone(),
        lower: Granularity::M15,
        upper: Granularity::H1,
        anchor: FixTime::parse("2023-07-15 17:15:00")?,
        limit: 10,
    };
    for candle in fx.candles(&query).await? {
        println!(
            "{}  O {}  H {}  L {}  C {}  V {}",
            candle.fix_time, candle.open, candle.high, candle.low, candle.close, candle.tick_volume
        );
    }

    // 4. Release the store.
    fx.shutdown(Ok(())).await?;
    Ok(())
}
