use std::sync::Arc;
use std::time::Duration;

use fxbars_core::{BarStore, Deadline, FxConfig, FxError, LimitBounds, with_deadline};

/// Service core that validates requests and runs them against one candle store.
pub struct FxBars {
    pub(crate) store: Arc<dyn BarStore>,
    pub(crate) cfg: FxConfig,
}

/// Builder for constructing an `FxBars` instance with custom configuration.
pub struct FxBarsBuilder {
    store: Option<Arc<dyn BarStore>>,
    cfg: FxConfig,
}

impl Default for FxBarsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FxBarsBuilder {
    /// Create a new builder with default configuration and no store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            store: None,
            cfg: FxConfig::default(),
        }
    }

    /// Use `store` for every request. A later call replaces an earlier one.
    #[must_use]
    pub fn with_store(mut self, store: Arc<dyn BarStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Replace the whole configuration.
    #[must_use]
    pub fn config(mut self, cfg: FxConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Maximum number of candles per upsert batch.
    #[must_use]
    pub const fn max_batch_rows(mut self, rows: usize) -> Self {
        self.cfg.max_batch_rows = rows;
        self
    }

    /// Accepted bounds for read row limits.
    #[must_use]
    pub const fn limit_bounds(mut self, bounds: LimitBounds) -> Self {
        self.cfg.limit = bounds;
        self
    }

    /// Decimal places retained for stored prices.
    #[must_use]
    pub const fn price_scale(mut self, scale: u32) -> Self {
        self.cfg.price_scale = scale;
        self
    }

    /// Deadline for one whole request.
    #[must_use]
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.cfg.request_timeout_ms = Some(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX));
        self
    }

    /// Validate the configuration and check that the store answers.
    ///
    /// # Errors
    /// Returns `InvalidConfig` for inconsistent settings and `StoreUnavailable`
    /// when no store was registered or it fails its ping.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "fxbars::core::build", skip(self), err)
    )]
    pub async fn build(self) -> Result<FxBars, FxError> {
        self.cfg.validate()?;
        let Some(store) = self.store else {
            return Err(FxError::StoreUnavailable(
                "no store registered; add one via with_store(...)".to_string(),
            ));
        };
        store.ping().await.map_err(|e| match e {
            FxError::StoreUnavailable(_) => e,
            other => FxError::StoreUnavailable(other.to_string()),
        })?;
        #[cfg(feature = "tracing")]
        tracing::info!(store = store.name(), "candle store ready");
        Ok(FxBars {
            store,
            cfg: self.cfg,
        })
    }
}

impl FxBars {
    /// Start building a new `FxBars` instance.
    ///
    /// ```rust,ignore
    /// use std::sync::Arc;
    /// use fxbars::FxBars;
    /// use fxbars_mock::MemoryStore;
    ///
    /// let fx = FxBars::builder()
    ///     .with_store(Arc::new(MemoryStore::new()))
    ///     .max_batch_rows(500)
    ///     .build()
    ///     .await?;
    /// ```
    #[must_use]
    pub fn builder() -> FxBarsBuilder {
        FxBarsBuilder::new()
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &FxConfig {
        &self.cfg
    }

    /// Name of the underlying store.
    #[must_use]
    pub fn store_name(&self) -> &'static str {
        self.store.name()
    }

    /// Deadline for a request starting now, if one is configured.
    pub(crate) fn deadline(&self, operation: &'static str) -> Option<Deadline> {
        self.cfg
            .request_timeout_ms
            .map(|ms| Deadline::after(operation, Duration::from_millis(ms)))
    }

    /// Run `fut` under the configured request deadline, if any.
    pub(crate) async fn with_request_deadline<T, Fut>(
        &self,
        operation: &'static str,
        fut: Fut,
    ) -> Result<T, FxError>
    where
        Fut: Future<Output = Result<T, FxError>>,
    {
        with_deadline(self.deadline(operation), fut).await
    }
}
