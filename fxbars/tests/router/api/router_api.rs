use fxbars::QueryParams;
use fxbars::api::{Api, ResponseClass, UploadPayload};
use serde_json::json;

use crate::helpers::*;

fn body(data: Vec<fxbars::RawCandle>) -> String {
    serde_json::to_string(&UploadPayload { data }).unwrap()
}

async fn seeded_api() -> Api {
    let (fx, _store, _ctl) = fx_with_store().await;
    let api = Api::new(fx);
    let (hourly, quarter) = summer_day();
    for (time_type, rows) in [("H1", hourly), ("M15", quarter)] {
        let reply = api.post_data(EURUSD, time_type, &body(rows)).await;
        assert_eq!(reply.class, ResponseClass::Ok, "{:?}", reply.envelope.status);
    }
    api
}

fn params<'a>(fix_time: &'a str, limit: &'a str) -> QueryParams<'a> {
    QueryParams {
        pair: EURUSD,
        lower: "M15",
        upper: "H1",
        fix_time,
        limit,
    }
}

#[tokio::test]
async fn get_data_answers_with_candles() {
    let api = seeded_api().await;
    let reply = api.get_data(params("2023-07-15 17:15:00", "10")).await;
    assert_eq!(reply.class, ResponseClass::Ok);

    let v: serde_json::Value = serde_json::from_str(&reply.envelope.to_json().unwrap()).unwrap();
    assert_eq!(v["status"], json!({ "code": 0, "message": "OK" }));
    let times: Vec<&str> = v["candles"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["fixTime"].as_str().unwrap())
        .collect();
    assert_eq!(
        times,
        ["2023-07-15 17:15:00", "2023-07-15 16:00:00", "2023-07-15 15:00:00"]
    );
    assert_eq!(v["candles"][0]["tickVolume"], json!(104));
}

#[tokio::test]
async fn get_data_validates_in_order() {
    let api = seeded_api().await;

    let cases = [
        (QueryParams { pair: "EURUS", ..params("bad", "0") }, 0x8005),
        (QueryParams { lower: "m15", ..params("bad", "0") }, 0x8003),
        (QueryParams { upper: "M5", ..params("bad", "0") }, 0x8003),
        (params("2023-07-15T17:15:00", "0"), 0x8008),
        (params("2023-07-15 17:15:00", "101"), 0x8007),
    ];
    for (p, code) in cases {
        let reply = api.get_data(p).await;
        assert_eq!(reply.class, ResponseClass::ClientError, "{p:?}");
        assert_eq!(reply.envelope.status.code, code, "{p:?}");
        assert!(reply.envelope.payload.candles.is_empty());
    }
}

#[tokio::test]
async fn data_gaps_are_server_errors() {
    let api = seeded_api().await;

    let reply = api.get_data(params("2023-07-15 17:00:00", "10")).await;
    assert_eq!(reply.class, ResponseClass::ServerError);
    assert_eq!(reply.envelope.status.code, 0x800A);

    let reply = api.get_data(params("2023-07-15 17:15:00", "1")).await;
    assert_eq!(reply.class, ResponseClass::ServerError);
    assert_eq!(reply.envelope.status.code, 0x8009);
}

#[tokio::test]
async fn post_data_rejects_bad_requests() {
    let (fx, _store, ctl) = fx_with_store().await;
    let api = Api::new(fx);

    // Granularity is checked before the pair and the body.
    let reply = api.post_data("eurusd", "H2", "garbage").await;
    assert_eq!(reply.envelope.status.code, 0x8003);

    let reply = api.post_data("eurusd", "H1", "garbage").await;
    assert_eq!(reply.envelope.status.code, 0x8005);

    let reply = api.post_data(EURUSD, "H1", "garbage").await;
    assert_eq!(reply.class, ResponseClass::ClientError);
    assert_eq!(reply.envelope.status.code, 0x800D);

    let reply = api.post_data(EURUSD, "H1", r#"{"data":[]}"#).await;
    assert_eq!(reply.envelope.status.code, 0x8006);

    let bad_time = r#"{"data":[{"time":"2023-07-15 10:00","open":1.1,"high":1.2,"low":1.0,"close":1.15,"tickVolume":1}]}"#;
    let reply = api.post_data(EURUSD, "H1", bad_time).await;
    assert_eq!(reply.envelope.status.code, 0x8002);

    assert_eq!(ctl.calls(fxbars_mock::Op::Begin).await, 0);
}

#[tokio::test]
async fn listings_and_details() {
    let api = seeded_api().await;

    let v = serde_json::to_value(&api.pair_list().await.envelope).unwrap();
    assert_eq!(v["pairs"], json!(["EURUSD"]));

    let v = serde_json::to_value(&api.pair_detail(EURUSD).await.envelope).unwrap();
    assert_eq!(
        v["details"],
        json!([
            { "timeType": 2, "countData": 5 },
            { "timeType": 4, "countData": 3 },
        ])
    );

    let v = serde_json::to_value(&api.data_summary(EURUSD, "H1").await.envelope).unwrap();
    assert_eq!(
        v["fixTimes"],
        json!([
            "2023-07-15 15:00:00",
            "2023-07-15 16:00:00",
            "2023-07-15 17:00:00",
        ])
    );

    let reply = api.data_summary(EURUSD, "Hourly").await;
    assert_eq!(reply.class, ResponseClass::ClientError);
}

#[tokio::test]
async fn delete_data_purges_named_series() {
    let api = seeded_api().await;

    let reply = api.delete_data(EURUSD, &["M15", "M15"]).await;
    assert_eq!(reply.class, ResponseClass::Ok);
    let v = serde_json::to_value(&api.pair_detail(EURUSD).await.envelope).unwrap();
    assert_eq!(v["details"], json!([{ "timeType": 4, "countData": 3 }]));

    let reply = api.delete_data(EURUSD, &[]).await;
    assert_eq!(reply.envelope.status.code, 0x8003);

    let reply = api.delete_data(EURUSD, &["H1", "Monthly"]).await;
    assert_eq!(reply.envelope.status.code, 0x8003);
    assert_eq!(
        api.data_summary(EURUSD, "H1").await.envelope.payload.fix_times.len(),
        3
    );
}
