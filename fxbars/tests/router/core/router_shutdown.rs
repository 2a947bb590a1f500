use fxbars::FxError;
use fxbars_mock::{MockBehavior, Op};

use crate::helpers::*;

#[tokio::test]
async fn clean_shutdown_closes_store() {
    let (fx, _store, ctl) = fx_with_store().await;
    fx.shutdown(Ok(())).await.unwrap();
    assert_eq!(ctl.calls(Op::Close).await, 1);
    assert!(matches!(
        fx.pairs().await,
        Err(FxError::StoreUnavailable(_))
    ));
}

#[tokio::test]
async fn transport_failure_still_closes_store() {
    let (fx, _store, ctl) = fx_with_store().await;
    let transport = FxError::StoreUnavailable("listener stuck".into());
    let err = fx.shutdown(Err(transport.clone())).await.unwrap_err();
    assert_eq!(err, transport);
    assert_eq!(ctl.calls(Op::Close).await, 1);
}

#[tokio::test]
async fn both_failures_are_aggregated() {
    let (fx, _store, ctl) = fx_with_store().await;
    let close = FxError::store("fxbars-mock", "close failed");
    ctl.set_behavior(Op::Close, MockBehavior::Fail(close.clone()))
        .await;
    let transport = FxError::StoreUnavailable("listener stuck".into());

    let err = fx.shutdown(Err(transport.clone())).await.unwrap_err();
    assert_eq!(err, FxError::Aggregate(vec![transport, close]));
}
