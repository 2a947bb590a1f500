use fxbars_core::FxError;

use crate::FxBars;

/// Collapse independent failures into one outcome: `Ok` when there are none,
/// the failure itself when there is one, `Aggregate` otherwise.
///
/// # Errors
/// See above.
pub fn collapse_errors(errors: Vec<FxError>) -> Result<(), FxError> {
    FxError::collapse(errors).map_or(Ok(()), Err)
}

impl FxBars {
    /// Release the store after the transport has stopped.
    ///
    /// `transport` is the outcome of stopping the surrounding transport. The
    /// store is closed regardless, and both failures are reported together.
    ///
    /// # Errors
    /// The transport's failure, the store's close failure, or `Aggregate` of both.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "fxbars::router::shutdown", skip(self, transport), err)
    )]
    pub async fn shutdown(&self, transport: Result<(), FxError>) -> Result<(), FxError> {
        let mut errors = Vec::new();
        if let Err(e) = transport {
            #[cfg(feature = "tracing")]
            tracing::warn!(error = %e, "transport shutdown failed");
            errors.push(e);
        }
        if let Err(e) = self.store.close().await {
            #[cfg(feature = "tracing")]
            tracing::warn!(store = self.store.name(), error = %e, "store close failed");
            errors.push(e);
        }
        collapse_errors(errors)
    }
}
