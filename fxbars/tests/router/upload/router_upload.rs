use chrono::TimeDelta;
use fxbars::{BarStore, Decimal, FixRange, FxError, Granularity};
use fxbars_mock::Op;
use fxbars_mock::fixtures::{raw, raw_series};

use crate::helpers::*;

#[tokio::test]
async fn upload_normalizes_and_buckets() {
    let (fx, _store, _ctl) = fx_with_store().await;
    let eurusd = pair(EURUSD);
    let rows = vec![
        raw("2023.07.15 10:00", Decimal::ONE, Decimal::TWO, Decimal::ONE, Decimal::TWO, 5),
        raw("2023.12.01 10:00", Decimal::ONE, Decimal::TWO, Decimal::ONE, Decimal::TWO, 5),
    ];
    assert_eq!(fx.upload(&eurusd, Granularity::H1, &rows).await.unwrap(), 2);

    let fixes = fx.summary(&eurusd, Granularity::H1).await.unwrap();
    assert_eq!(fixes, [fix("2023-07-15 17:00:00"), fix("2023-12-01 18:00:00")]);
}

#[tokio::test]
async fn upload_rounds_prices_to_scale() {
    let (fx, store, _ctl) = fx_with_store().await;
    let eurusd = pair(EURUSD);
    let rows = vec![raw(
        "2023.07.15 10:00",
        Decimal::new(1_100_005, 6),
        Decimal::new(1_100_109, 6),
        Decimal::new(1_099_991, 6),
        Decimal::new(1_100_050, 6),
        1,
    )];
    fx.upload(&eurusd, Granularity::M5, &rows).await.unwrap();

    let stored = store
        .scan(&eurusd, Granularity::M5, FixRange::until(fix("2023-07-15 16:05:00")), None)
        .await
        .unwrap();
    assert_eq!(stored.len(), 1);
    let c = &stored[0];
    assert_eq!(c.fix_time, fix("2023-07-15 16:05:00"));
    assert_eq!(c.open, Decimal::new(110_001, 5));
    assert_eq!(c.high, Decimal::new(110_011, 5));
    assert_eq!(c.low, Decimal::new(109_999, 5));
    assert_eq!(c.close, Decimal::new(110_005, 5));
}

#[tokio::test]
async fn reupload_is_last_write_wins() {
    let (fx, store, _ctl) = fx_with_store().await;
    let eurusd = pair(EURUSD);
    let one = Decimal::ONE;
    let two = Decimal::TWO;
    let first = vec![raw("2023.07.15 10:00", one, one, one, one, 1)];
    let second = vec![raw("2023.07.15 10:00", two, two, two, two, 2)];
    fx.upload(&eurusd, Granularity::H1, &first).await.unwrap();
    fx.upload(&eurusd, Granularity::H1, &second).await.unwrap();

    let rows = store
        .scan(&eurusd, Granularity::H1, FixRange::until(fix("2030-01-01 00:00:00")), None)
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].close, Decimal::TWO);
    assert_eq!(rows[0].tick_volume, 2);
}

#[tokio::test]
async fn upload_is_chunked_in_one_transaction() {
    let (store, ctl) = fxbars_mock::MemoryStore::new_with_controller();
    let fx = fxbars::FxBars::builder()
        .with_store(std::sync::Arc::new(store))
        .max_batch_rows(2)
        .build()
        .await
        .unwrap();
    let rows = raw_series(broker(2023, 7, 15, 0, 0), TimeDelta::minutes(1), 5);
    assert_eq!(fx.upload(&pair(EURUSD), Granularity::M1, &rows).await.unwrap(), 5);
    assert_eq!(ctl.calls(Op::Upsert).await, 3);
    assert_eq!(ctl.calls(Op::Begin).await, 1);
    assert_eq!(ctl.commits().await, 1);
}

#[tokio::test]
async fn bad_input_never_reaches_the_store() {
    let (fx, _store, ctl) = fx_with_store().await;
    let eurusd = pair(EURUSD);

    assert_eq!(
        fx.upload(&eurusd, Granularity::H1, &[]).await,
        Err(FxError::EmptyInput)
    );
    assert!(matches!(
        fx.upload(&eurusd, Granularity::Unknown, &[]).await,
        Err(FxError::InvalidGranularity { .. })
    ));

    let mut rows = raw_series(broker(2023, 7, 15, 0, 0), TimeDelta::hours(1), 3);
    rows[2].time = "2023/07/15 02:00".into();
    assert!(matches!(
        fx.upload(&eurusd, Granularity::H1, &rows).await,
        Err(FxError::InvalidTimestampFormat { .. })
    ));
    assert_eq!(ctl.calls(Op::Begin).await, 0);
    assert!(fx.pairs().await.unwrap().is_empty());
}
