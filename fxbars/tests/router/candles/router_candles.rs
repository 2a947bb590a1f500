use fxbars::{Decimal, FxError};

use crate::helpers::*;

fn px(pips: i64) -> Decimal {
    Decimal::new(pips, 5)
}

#[tokio::test]
async fn in_progress_bar_then_closed_bars() {
    let (fx, _store, _ctl) = fx_with_store().await;
    load_summer_day(&fx).await;

    let out = fx.candles(&query("2023-07-15 17:15:00", 10)).await.unwrap();
    let times: Vec<String> = out.iter().map(|c| c.fix_time.to_string()).collect();
    assert_eq!(
        times,
        ["2023-07-15 17:15:00", "2023-07-15 16:00:00", "2023-07-15 15:00:00"]
    );

    // Only the 17:15 quarter contributes; the 17:00 hour bar lies inside the
    // period and widens the extremes.
    let head = &out[0];
    assert_eq!(head.open, px(110_040));
    assert_eq!(head.close, px(110_050));
    assert_eq!(head.high, px(110_090));
    assert_eq!(head.low, px(109_980));
    assert_eq!(head.tick_volume, 104);
}

#[tokio::test]
async fn contributors_span_the_open_period() {
    let (fx, _store, _ctl) = fx_with_store().await;
    load_summer_day(&fx).await;

    let out = fx.candles(&query("2023-07-15 16:30:00", 10)).await.unwrap();
    assert_eq!(out.len(), 2);
    let head = &out[0];
    assert_eq!(head.fix_time, fix("2023-07-15 16:30:00"));
    assert_eq!(head.open, px(110_000));
    assert_eq!(head.close, px(110_020));
    assert_eq!(head.high, px(110_060));
    assert_eq!(head.low, px(109_960));
    assert_eq!(head.tick_volume, 201);
    assert_eq!(out[1].fix_time, fix("2023-07-15 15:00:00"));
}

#[tokio::test]
async fn anchor_on_a_closed_bar_has_no_contributors() {
    let (fx, _store, _ctl) = fx_with_store().await;
    load_summer_day(&fx).await;

    let err = fx.candles(&query("2023-07-15 17:00:00", 10)).await.unwrap_err();
    assert_eq!(
        err,
        FxError::NoUpperAnchor {
            anchor: "2023-07-15 17:00:00".into()
        }
    );
}

#[tokio::test]
async fn limit_of_one_leaves_a_single_row() {
    let (fx, _store, _ctl) = fx_with_store().await;
    load_summer_day(&fx).await;

    let err = fx.candles(&query("2023-07-15 17:15:00", 1)).await.unwrap_err();
    assert_eq!(err, FxError::InsufficientData { rows: 1 });

    let out = fx.candles(&query("2023-07-15 17:15:00", 2)).await.unwrap();
    assert_eq!(out.len(), 2);
}

#[tokio::test]
async fn reads_never_write() {
    let (fx, _store, ctl) = fx_with_store().await;
    load_summer_day(&fx).await;
    let commits = ctl.commits().await;

    fx.candles(&query("2023-07-15 17:15:00", 10)).await.unwrap();
    assert_eq!(ctl.commits().await, commits);
    assert_eq!(
        fx.summary(&pair(EURUSD), fxbars::Granularity::H1).await.unwrap().len(),
        3
    );
}
