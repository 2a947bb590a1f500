use chrono::TimeDelta;
use fxbars::{FxError, Granularity};
use fxbars_mock::fixtures::raw_series;

use crate::helpers::*;

#[tokio::test]
async fn empty_store_lists_nothing() {
    let (fx, _store, _ctl) = fx_with_store().await;
    assert!(fx.pairs().await.unwrap().is_empty());
    assert!(fx.pair_detail(&pair(EURUSD)).await.unwrap().is_empty());
    assert!(fx.summary(&pair(EURUSD), Granularity::H1).await.unwrap().is_empty());
}

#[tokio::test]
async fn pairs_are_sorted_and_distinct() {
    let (fx, _store, _ctl) = fx_with_store().await;
    let yen = raw_series(broker(2023, 7, 15, 8, 0), TimeDelta::hours(1), 2);
    fx.upload(&pair(USDJPY), Granularity::H1, &yen).await.unwrap();
    load_summer_day(&fx).await;

    assert_eq!(fx.pairs().await.unwrap(), [pair(EURUSD), pair(USDJPY)]);
}

#[tokio::test]
async fn detail_counts_in_ordinal_order() {
    let (fx, _store, _ctl) = fx_with_store().await;
    load_summer_day(&fx).await;

    assert_eq!(
        fx.pair_detail(&pair(EURUSD)).await.unwrap(),
        [(Granularity::M15, 5), (Granularity::H1, 3)]
    );
}

#[tokio::test]
async fn summary_is_oldest_first() {
    let (fx, _store, _ctl) = fx_with_store().await;
    load_summer_day(&fx).await;

    assert_eq!(
        fx.summary(&pair(EURUSD), Granularity::H1).await.unwrap(),
        [
            fix("2023-07-15 15:00:00"),
            fix("2023-07-15 16:00:00"),
            fix("2023-07-15 17:00:00"),
        ]
    );
}

#[tokio::test]
async fn summary_rejects_unknown_granularity() {
    let (fx, _store, _ctl) = fx_with_store().await;
    assert!(matches!(
        fx.summary(&pair(EURUSD), Granularity::Unknown).await,
        Err(FxError::InvalidGranularity { .. })
    ));
}
