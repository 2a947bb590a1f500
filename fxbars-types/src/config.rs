//! Configuration types shared by the orchestrator and stores.

use serde::{Deserialize, Serialize};

use crate::FxError;

/// Inclusive bounds on the number of rows a read may request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitBounds {
    /// Smallest accepted limit (at least 1).
    pub min: u32,
    /// Largest accepted limit.
    pub max: u32,
}

impl Default for LimitBounds {
    fn default() -> Self {
        Self { min: 1, max: 100 }
    }
}

impl LimitBounds {
    /// Whether `value` lies within the bounds.
    #[must_use]
    pub const fn contains(&self, value: u32) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Global configuration for the `FxBars` orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FxConfig {
    /// Maximum number of candles sent to the store in one upsert batch.
    pub max_batch_rows: usize,
    /// Accepted row limits for reads.
    pub limit: LimitBounds,
    /// Decimal places retained for stored prices.
    pub price_scale: u32,
    /// Deadline for one whole request, in milliseconds. `None` waits indefinitely.
    pub request_timeout_ms: Option<u64>,
}

impl Default for FxConfig {
    fn default() -> Self {
        Self {
            max_batch_rows: 1000,
            limit: LimitBounds::default(),
            price_scale: 5,
            request_timeout_ms: None,
        }
    }
}

impl FxConfig {
    /// Largest supported `price_scale`.
    pub const MAX_PRICE_SCALE: u32 = 28;

    /// Parse a JSON configuration document. Missing keys take their defaults.
    ///
    /// # Errors
    /// Returns `InvalidConfig` if the document is malformed or fails [`FxConfig::validate`].
    pub fn from_json_str(json: &str) -> Result<Self, FxError> {
        let cfg: Self =
            serde_json::from_str(json).map_err(|e| FxError::InvalidConfig(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check internal consistency.
    ///
    /// # Errors
    /// Returns `InvalidConfig` for a zero batch size, a zero or inverted limit
    /// bound, an unsupported price scale, or a zero request timeout.
    pub fn validate(&self) -> Result<(), FxError> {
        if self.max_batch_rows == 0 {
            return Err(FxError::InvalidConfig(
                "max_batch_rows must be greater than zero".into(),
            ));
        }
        if self.limit.min == 0 || self.limit.min > self.limit.max {
            return Err(FxError::InvalidConfig(format!(
                "limit bounds must satisfy 1 <= min <= max (got {}..={})",
                self.limit.min, self.limit.max
            )));
        }
        if self.price_scale > Self::MAX_PRICE_SCALE {
            return Err(FxError::InvalidConfig(format!(
                "price_scale must be at most {} (got {})",
                Self::MAX_PRICE_SCALE,
                self.price_scale
            )));
        }
        if self.request_timeout_ms == Some(0) {
            return Err(FxError::InvalidConfig(
                "request_timeout_ms must be greater than zero when set".into(),
            ));
        }
        Ok(())
    }
}
