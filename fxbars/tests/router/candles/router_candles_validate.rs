use std::sync::Arc;

use fxbars::{FxBars, FxError, Granularity, LimitBounds};
use fxbars_mock::{MemoryStore, Op};

use crate::helpers::*;

#[tokio::test]
async fn query_outside_bounds_is_rejected_before_store_access() {
    let (fx, _store, ctl) = fx_with_store().await;

    let err = fx.candles(&query("2023-07-15 17:15:00", 0)).await.unwrap_err();
    assert!(matches!(err, FxError::InvalidLimit { min: 1, max: 100, .. }));

    let err = fx.candles(&query("2023-07-15 17:15:00", 101)).await.unwrap_err();
    assert!(matches!(err, FxError::InvalidLimit { .. }));

    let mut q = query("2023-07-15 17:15:00", 10);
    q.upper = Granularity::M5;
    assert!(matches!(
        fx.candles(&q).await,
        Err(FxError::InvalidGranularity { .. })
    ));

    assert_eq!(ctl.calls(Op::Scan).await, 0);
}

#[tokio::test]
async fn configured_bounds_apply() {
    let fx = FxBars::builder()
        .with_store(Arc::new(MemoryStore::new()))
        .limit_bounds(LimitBounds { min: 1, max: 500 })
        .build()
        .await
        .unwrap();
    load_summer_day(&fx).await;
    let out = fx.candles(&query("2023-07-15 17:15:00", 500)).await.unwrap();
    assert_eq!(out.len(), 3);
}

#[tokio::test]
async fn store_failures_surface_unchanged() {
    let (fx, _store, ctl) = fx_with_store().await;
    load_summer_day(&fx).await;
    ctl.fail_next(Op::Scan, FxError::store("fxbars-mock", "connection reset"))
        .await;
    let err = fx.candles(&query("2023-07-15 17:15:00", 10)).await.unwrap_err();
    assert_eq!(err, FxError::store("fxbars-mock", "connection reset"));
}
