use fxbars_core::{FxError, Granularity, PairId, RawCandle, in_transaction_within, to_stored};

use crate::FxBars;

impl FxBars {
    /// Normalize, bucket and store a batch of feed candles for one series.
    ///
    /// Every candle is converted before the store is touched, so one bad
    /// timestamp rejects the whole batch. The converted candles are written in
    /// chunks of at most `max_batch_rows` inside one transaction: either all
    /// chunks land or none do. Candles that share a fix time overwrite each
    /// other, the later one winning.
    ///
    /// Returns the number of candles written.
    ///
    /// # Errors
    /// `EmptyInput`, `InvalidGranularity`, `InvalidTimestampFormat`, or the
    /// store's failure.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "fxbars::router::upload",
            skip(self, raw),
            fields(pair = %pair, granularity = %granularity, rows = raw.len()),
            err,
        )
    )]
    pub async fn upload(
        &self,
        pair: &PairId,
        granularity: Granularity,
        raw: &[RawCandle],
    ) -> Result<usize, FxError> {
        if !granularity.is_known() {
            return Err(FxError::invalid_granularity(granularity.as_str()));
        }
        if raw.is_empty() {
            return Err(FxError::EmptyInput);
        }
        let candles = raw
            .iter()
            .map(|c| to_stored(c, granularity, self.cfg.price_scale))
            .collect::<Result<Vec<_>, _>>()?;

        let batch = self.cfg.max_batch_rows.max(1);
        let pair = pair.clone();
        in_transaction_within(self.store.as_ref(), self.deadline("upload"), move |tx| {
            Box::pin(async move {
                for chunk in candles.chunks(batch) {
                    tx.upsert_batch(&pair, granularity, chunk).await?;
                }
                Ok(candles.len())
            })
        })
        .await
    }
}
