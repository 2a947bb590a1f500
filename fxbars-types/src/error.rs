use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for the fxbars workspace.
///
/// Every variant maps to a stable numeric status code (see [`FxError::code`]) so
/// that transports can report failures without inspecting messages. Validation
/// failures are client errors; data gaps and store failures are server errors.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum FxError {
    /// The candle store is unreachable or misconfigured.
    #[error("candle store unavailable: {0}")]
    StoreUnavailable(String),

    /// A raw candle timestamp did not match `yyyy.MM.dd[ HH:mm]`.
    #[error("unexpected timestamp format: {raw:?} (expected yyyy.MM.dd[ HH:mm])")]
    InvalidTimestampFormat {
        /// The rejected input.
        raw: String,
    },

    /// The granularity name is not one of the canonical names.
    #[error("invalid granularity: {name:?}")]
    InvalidGranularity {
        /// The rejected name (empty when none was supplied).
        name: String,
    },

    /// Several independent failures, reported together.
    #[error("multiple errors occurred: {}", join_messages(.0))]
    Aggregate(Vec<FxError>),

    /// The pair identifier is not six uppercase ASCII letters.
    #[error("invalid pair identifier {value:?}: expected 6 uppercase letters A-Z")]
    InvalidPairIdentifier {
        /// The rejected input.
        value: String,
    },

    /// A request body could not be decoded.
    #[error("malformed payload: {0}")]
    InvalidPayload(String),

    /// An upload carried no candles.
    #[error("at least one candle is required")]
    EmptyInput,

    /// The row limit is unparsable or outside the accepted bound.
    #[error("invalid limit {value:?}: expected an integer between {min} and {max}")]
    InvalidLimit {
        /// The rejected input.
        value: String,
        /// Smallest accepted limit.
        min: u32,
        /// Largest accepted limit.
        max: u32,
    },

    /// The anchor fix time did not match `yyyy-MM-dd HH:mm:ss`.
    #[error("invalid fix time {value:?}: expected yyyy-MM-dd HH:mm:ss")]
    InvalidFixTime {
        /// The rejected input.
        value: String,
    },

    /// Resampling produced fewer than two rows; the uploaded data has a gap.
    #[error(
        "not enough data to answer the request ({rows} row(s)); check the uploaded data or the request parameters"
    )]
    InsufficientData {
        /// Number of rows the resampler could produce.
        rows: usize,
    },

    /// No lower-granularity bars fall inside the still-open upper period.
    #[error(
        "no upper-granularity data anchors the requested time {anchor}; check the uploaded data"
    )]
    NoUpperAnchor {
        /// The anchor fix time, formatted.
        anchor: String,
    },

    /// A request did not finish within the configured deadline.
    #[error("request timed out: {operation}")]
    RequestTimeout {
        /// The operation that was cut off.
        operation: String,
    },

    /// Configuration values were rejected.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The store reported a failure while serving a request.
    #[error("{store} failed: {msg}")]
    Store {
        /// Store implementation name.
        store: String,
        /// Human-readable error message.
        msg: String,
    },
}

/// Coarse classification used by transports to pick a response class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorClass {
    /// The request itself was malformed; retrying it unchanged cannot succeed.
    Client,
    /// The request was valid but could not be served.
    Server,
}

fn join_messages(errors: &[FxError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl FxError {
    /// Helper: build a `Store` error with the store name and message.
    pub fn store(store: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Store {
            store: store.into(),
            msg: msg.into(),
        }
    }

    /// Helper: build an `InvalidTimestampFormat` error for a raw input.
    pub fn invalid_timestamp(raw: impl Into<String>) -> Self {
        Self::InvalidTimestampFormat { raw: raw.into() }
    }

    /// Helper: build an `InvalidGranularity` error for a name.
    pub fn invalid_granularity(name: impl Into<String>) -> Self {
        Self::InvalidGranularity { name: name.into() }
    }

    /// Helper: build an `InvalidLimit` error carrying the accepted bound.
    pub fn invalid_limit(value: impl Into<String>, min: u32, max: u32) -> Self {
        Self::InvalidLimit {
            value: value.into(),
            min,
            max,
        }
    }

    /// Stable numeric status code. `0` is reserved for success.
    #[must_use]
    pub const fn code(&self) -> u16 {
        match self {
            Self::StoreUnavailable(_) => 0x8001,
            Self::InvalidTimestampFormat { .. } => 0x8002,
            Self::InvalidGranularity { .. } => 0x8003,
            Self::Aggregate(_) => 0x8004,
            Self::InvalidPairIdentifier { .. } => 0x8005,
            Self::EmptyInput => 0x8006,
            Self::InvalidLimit { .. } => 0x8007,
            Self::InvalidFixTime { .. } => 0x8008,
            Self::InsufficientData { .. } => 0x8009,
            Self::NoUpperAnchor { .. } => 0x800A,
            Self::InvalidConfig(_) => 0x800B,
            Self::RequestTimeout { .. } => 0x800C,
            Self::InvalidPayload(_) => 0x800D,
            Self::Store { .. } => 0x8FFF,
        }
    }

    /// Whether the failure is attributable to the caller or to the service.
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::InvalidTimestampFormat { .. }
            | Self::InvalidGranularity { .. }
            | Self::InvalidPairIdentifier { .. }
            | Self::EmptyInput
            | Self::InvalidPayload(_)
            | Self::InvalidLimit { .. }
            | Self::InvalidFixTime { .. } => ErrorClass::Client,
            Self::StoreUnavailable(_)
            | Self::Aggregate(_)
            | Self::InsufficientData { .. }
            | Self::NoUpperAnchor { .. }
            | Self::InvalidConfig(_)
            | Self::RequestTimeout { .. }
            | Self::Store { .. } => ErrorClass::Server,
        }
    }

    /// Flatten nested `Aggregate` structures into a plain vector.
    ///
    /// This preserves other error variants as-is and unwraps recursively.
    #[must_use]
    pub fn flatten(self) -> Vec<Self> {
        match self {
            Self::Aggregate(list) => list.into_iter().flat_map(Self::flatten).collect(),
            other => vec![other],
        }
    }

    /// Collapse a list of independent failures into at most one error.
    ///
    /// - No failures → `None`.
    /// - Exactly one failure (after flattening) → that failure.
    /// - Otherwise → `Aggregate` holding all of them in order.
    #[must_use]
    pub fn collapse(errors: Vec<Self>) -> Option<Self> {
        let mut flat: Vec<Self> = errors.into_iter().flat_map(Self::flatten).collect();
        match flat.len() {
            0 => None,
            1 => flat.pop(),
            _ => Some(Self::Aggregate(flat)),
        }
    }
}
