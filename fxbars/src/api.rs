//! Response envelope and a string-parameter adapter for transports.
//!
//! Every operation answers with a [`Status`] (code `0` and message `"OK"` on
//! success, the error's code and message otherwise) flattened next to an
//! operation-specific payload. On failure the payload is empty.

use std::sync::Arc;

use fxbars_core::validate::{self, QueryParams};
use fxbars_core::{Candle, ErrorClass, FixTime, FxError, PairId, RawCandle};
use serde::{Deserialize, Serialize};

use crate::FxBars;

/// Outcome status carried by every response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    /// `0` on success, otherwise [`FxError::code`].
    pub code: u16,
    /// `"OK"` on success, otherwise the error message.
    pub message: String,
}

impl Status {
    /// Success status.
    #[must_use]
    pub fn ok() -> Self {
        Self {
            code: 0,
            message: "OK".to_string(),
        }
    }

    /// Status describing `err`.
    #[must_use]
    pub fn from_error(err: &FxError) -> Self {
        Self {
            code: err.code(),
            message: err.to_string(),
        }
    }
}

/// Status plus payload, serialized as one flat JSON object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// Outcome status.
    pub status: Status,
    /// Operation-specific fields.
    #[serde(flatten)]
    pub payload: T,
}

impl<T: Serialize> Envelope<T> {
    /// Encode as JSON.
    ///
    /// # Errors
    /// Propagates `serde_json` failures.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Payload of operations that return nothing but a status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Empty {}

/// `{"candles": [...]}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandlesPayload {
    /// Resampled candles, in-progress bar first.
    pub candles: Vec<Candle>,
}

/// `{"pairs": [...]}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairsPayload {
    /// Pairs with stored data.
    pub pairs: Vec<PairId>,
}

/// One row of a pair detail listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailRow {
    /// Granularity ordinal (0 for `M1` up to 7 for `Weekly`).
    pub time_type: u8,
    /// Stored row count.
    pub count_data: u64,
}

/// `{"details": [{"timeType": .., "countData": ..}, ...]}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailsPayload {
    /// Rows in ordinal order.
    pub details: Vec<DetailRow>,
}

/// `{"fixTimes": [...]}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixTimesPayload {
    /// Stored fix times, oldest first.
    pub fix_times: Vec<FixTime>,
}

/// Upload request body: `{"data": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadPayload {
    /// Feed candles.
    pub data: Vec<RawCandle>,
}

/// How a transport should classify the response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseClass {
    /// The operation succeeded.
    Ok,
    /// The request was rejected.
    ClientError,
    /// The request was valid but could not be served.
    ServerError,
}

/// A response ready for the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply<T> {
    /// Response classification.
    pub class: ResponseClass,
    /// Serializable body.
    pub envelope: Envelope<T>,
}

impl<T: Default> Reply<T> {
    /// Wrap an operation outcome; failures carry the default (empty) payload.
    pub fn from_result(result: Result<T, FxError>) -> Self {
        match result {
            Ok(payload) => Self {
                class: ResponseClass::Ok,
                envelope: Envelope {
                    status: Status::ok(),
                    payload,
                },
            },
            Err(err) => Self {
                class: match err.class() {
                    ErrorClass::Client => ResponseClass::ClientError,
                    ErrorClass::Server => ResponseClass::ServerError,
                },
                envelope: Envelope {
                    status: Status::from_error(&err),
                    payload: T::default(),
                },
            },
        }
    }
}

/// Adapter that takes parameters as raw text, validates them, and answers
/// with a [`Reply`].
#[derive(Clone)]
pub struct Api {
    fx: Arc<FxBars>,
}

impl Api {
    /// Serve requests with `fx`.
    #[must_use]
    pub const fn new(fx: Arc<FxBars>) -> Self {
        Self { fx }
    }

    /// Store an upload body for one series.
    ///
    /// Checks run in order: granularity, pair, body, non-empty payload.
    pub async fn post_data(&self, pair: &str, time_type: &str, body: &str) -> Reply<Empty> {
        Reply::from_result(
            async {
                let granularity = validate::granularity(time_type)?;
                let pair = validate::pair(pair)?;
                let payload: UploadPayload = serde_json::from_str(body)
                    .map_err(|e| FxError::InvalidPayload(e.to_string()))?;
                self.fx.upload(&pair, granularity, &payload.data).await?;
                Ok::<_, FxError>(Empty {})
            }
            .await,
        )
    }

    /// Resampled candles for a read request.
    pub async fn get_data(&self, params: QueryParams<'_>) -> Reply<CandlesPayload> {
        Reply::from_result(
            async {
                let query = validate::query(params, self.fx.cfg.limit)?;
                let candles = self.fx.candles(&query).await?;
                Ok::<_, FxError>(CandlesPayload { candles })
            }
            .await,
        )
    }

    /// Purge the named granularities of one pair.
    pub async fn delete_data(&self, pair: &str, time_types: &[&str]) -> Reply<Empty> {
        Reply::from_result(
            async {
                let (pair, granularities) = validate::delete(pair, time_types)?;
                self.fx.delete(&pair, &granularities).await?;
                Ok::<_, FxError>(Empty {})
            }
            .await,
        )
    }

    /// Stored fix times of one series.
    pub async fn data_summary(&self, pair: &str, time_type: &str) -> Reply<FixTimesPayload> {
        Reply::from_result(
            async {
                let pair = validate::pair(pair)?;
                let granularity = validate::granularity(time_type)?;
                let fix_times = self.fx.summary(&pair, granularity).await?;
                Ok::<_, FxError>(FixTimesPayload { fix_times })
            }
            .await,
        )
    }

    /// Pairs with stored data.
    pub async fn pair_list(&self) -> Reply<PairsPayload> {
        Reply::from_result(self.fx.pairs().await.map(|pairs| PairsPayload { pairs }))
    }

    /// Row counts per granularity for one pair.
    pub async fn pair_detail(&self, pair: &str) -> Reply<DetailsPayload> {
        Reply::from_result(
            async {
                let pair = validate::pair(pair)?;
                let details = self
                    .fx
                    .pair_detail(&pair)
                    .await?
                    .into_iter()
                    .filter_map(|(g, count_data)| {
                        g.ordinal().map(|time_type| DetailRow {
                            time_type,
                            count_data,
                        })
                    })
                    .collect();
                Ok::<_, FxError>(DetailsPayload { details })
            }
            .await,
        )
    }
}
