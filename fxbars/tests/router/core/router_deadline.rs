use std::sync::Arc;
use std::time::Duration;

use fxbars::{FxBars, FxError, Granularity};
use fxbars_mock::fixtures::raw_series;
use fxbars_mock::{MemoryStore, MemoryStoreController, MockBehavior, Op};

use crate::helpers::*;

async fn fx_with_deadline() -> (FxBars, MemoryStoreController) {
    let (store, ctl) = MemoryStore::new_with_controller();
    let fx = FxBars::builder()
        .with_store(Arc::new(store))
        .request_timeout(Duration::from_millis(250))
        .build()
        .await
        .unwrap();
    (fx, ctl)
}

#[tokio::test(start_paused = true)]
async fn stalled_read_times_out() {
    let (fx, ctl) = fx_with_deadline().await;
    load_summer_day(&fx).await;
    ctl.set_behavior(Op::Scan, MockBehavior::Hang).await;

    let err = fx.candles(&query("2023-07-15 17:15:00", 10)).await.unwrap_err();
    assert_eq!(
        err,
        FxError::RequestTimeout {
            operation: "candles".into()
        }
    );
}

#[tokio::test(start_paused = true)]
async fn stalled_listing_times_out() {
    let (fx, ctl) = fx_with_deadline().await;
    ctl.set_behavior(Op::ListPairs, MockBehavior::Hang).await;

    let err = fx.pairs().await.unwrap_err();
    assert!(matches!(err, FxError::RequestTimeout { .. }));
}

#[tokio::test(start_paused = true)]
async fn stalled_upload_writes_nothing() {
    let (fx, ctl) = fx_with_deadline().await;
    ctl.set_behavior(Op::Commit, MockBehavior::Hang).await;

    let batch = raw_series(broker(2023, 7, 15, 8, 0), chrono::TimeDelta::hours(1), 3);
    let err = fx
        .upload(&pair(EURUSD), Granularity::H1, &batch)
        .await
        .unwrap_err();
    assert_eq!(
        err,
        FxError::RequestTimeout {
            operation: "upload".into()
        }
    );

    ctl.clear_all_behaviors().await;
    assert!(fx.summary(&pair(EURUSD), Granularity::H1).await.unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn stalled_upsert_rolls_back() {
    let (fx, ctl) = fx_with_deadline().await;
    ctl.set_behavior(Op::Upsert, MockBehavior::Hang).await;

    let batch = raw_series(broker(2023, 7, 15, 8, 0), chrono::TimeDelta::hours(1), 3);
    let err = fx
        .upload(&pair(EURUSD), Granularity::H1, &batch)
        .await
        .unwrap_err();
    assert!(matches!(err, FxError::RequestTimeout { .. }));
    assert_eq!(ctl.calls(Op::Begin).await, 1);
    assert_eq!(ctl.commits().await, 0);
    assert_eq!(ctl.rollbacks().await, 1);

    ctl.clear_all_behaviors().await;
    assert!(fx.summary(&pair(EURUSD), Granularity::H1).await.unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn stalled_delete_rolls_back() {
    let (fx, ctl) = fx_with_deadline().await;
    load_summer_day(&fx).await;
    ctl.set_behavior(Op::Delete, MockBehavior::Hang).await;

    let err = fx
        .delete(&pair(EURUSD), &[Granularity::H1])
        .await
        .unwrap_err();
    assert_eq!(
        err,
        FxError::RequestTimeout {
            operation: "delete".into()
        }
    );
    assert_eq!(ctl.rollbacks().await, 1);

    ctl.clear_all_behaviors().await;
    assert_eq!(
        fx.summary(&pair(EURUSD), Granularity::H1).await.unwrap().len(),
        3
    );
}
