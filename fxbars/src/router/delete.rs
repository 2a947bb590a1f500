use fxbars_core::validate::distinct;
use fxbars_core::{FxError, Granularity, PairId, in_transaction_within};

use crate::FxBars;

impl FxBars {
    /// Purge every candle of the given granularities for one pair, together
    /// with their fix-time index, in a single transaction.
    ///
    /// Duplicates are collapsed. Returns the purged granularities in ordinal order.
    ///
    /// # Errors
    /// `InvalidGranularity` for an empty set or an unknown granularity, or the
    /// store's failure.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "fxbars::router::delete",
            skip(self, granularities),
            fields(pair = %pair, granularities = granularities.len()),
            err,
        )
    )]
    pub async fn delete(
        &self,
        pair: &PairId,
        granularities: &[Granularity],
    ) -> Result<Vec<Granularity>, FxError> {
        let mut targets = granularities.to_vec();
        distinct(&mut targets)?;
        let pair = pair.clone();
        in_transaction_within(self.store.as_ref(), self.deadline("delete"), move |tx| {
            Box::pin(async move {
                tx.delete_granularities(&pair, &targets).await?;
                Ok(targets)
            })
        })
        .await
    }
}
