use fxbars_core::timeseries::resample::{contributor_window, resample};
use fxbars_core::{Candle, CandleQuery, FixRange, FxError};

use crate::FxBars;

impl FxBars {
    /// Upper-granularity view of one pair as of the query's anchor.
    ///
    /// The first row is the in-progress upper bar synthesized from the lower
    /// bars stored after the latest closed upper bar; the closed upper bars
    /// that precede it follow, newest first. Nothing is written back.
    ///
    /// # Errors
    /// `InvalidGranularity`/`InvalidLimit` for a query outside the configured
    /// bounds, `NoUpperAnchor`, `InsufficientData`, or the store's failure.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "fxbars::router::candles",
            skip(self, query),
            fields(
                pair = %query.pair,
                lower = %query.lower,
                upper = %query.upper,
                anchor = %query.anchor,
                limit = query.limit,
            ),
            err,
        )
    )]
    pub async fn candles(&self, query: &CandleQuery) -> Result<Vec<Candle>, FxError> {
        query.check(self.cfg.limit)?;
        self.with_request_deadline("candles", async {
            let closed = self
                .store
                .scan(
                    &query.pair,
                    query.upper,
                    FixRange::until(query.anchor),
                    Some(query.limit),
                )
                .await?;
            let window = contributor_window(closed.first(), query.anchor);
            let lower = self
                .store
                .scan(&query.pair, query.lower, window, None)
                .await?;
            #[cfg(feature = "tracing")]
            tracing::debug!(
                closed = closed.len(),
                contributors = lower.len(),
                "resampling"
            );
            resample(lower, closed, query.anchor, query.upper, query.limit)
        })
        .await
    }
}
