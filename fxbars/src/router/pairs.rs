use fxbars_core::{FixTime, FxError, Granularity, PairId};

use crate::FxBars;

impl FxBars {
    /// Pairs with at least one stored candle.
    ///
    /// # Errors
    /// The store's failure.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "fxbars::router::pairs", skip(self), err)
    )]
    pub async fn pairs(&self) -> Result<Vec<PairId>, FxError> {
        self.with_request_deadline("pairs", self.store.list_pairs())
            .await
    }

    /// Stored row count per granularity for one pair, in ordinal order.
    /// Granularities without rows are omitted.
    ///
    /// # Errors
    /// The store's failure.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "fxbars::router::pair_detail", skip(self), fields(pair = %pair), err)
    )]
    pub async fn pair_detail(&self, pair: &PairId) -> Result<Vec<(Granularity, u64)>, FxError> {
        let counts = self
            .with_request_deadline("pair_detail", self.store.count_by_granularity(pair))
            .await?;
        Ok(counts
            .into_iter()
            .filter(|(g, n)| g.is_known() && *n > 0)
            .collect())
    }

    /// Every stored fix time of one series, oldest first.
    ///
    /// # Errors
    /// `InvalidGranularity` for `Granularity::Unknown`, or the store's failure.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "fxbars::router::summary",
            skip(self),
            fields(pair = %pair, granularity = %granularity),
            err,
        )
    )]
    pub async fn summary(
        &self,
        pair: &PairId,
        granularity: Granularity,
    ) -> Result<Vec<FixTime>, FxError> {
        if !granularity.is_known() {
            return Err(FxError::invalid_granularity(granularity.as_str()));
        }
        self.with_request_deadline("summary", self.store.fix_times(pair, granularity))
            .await
    }
}
