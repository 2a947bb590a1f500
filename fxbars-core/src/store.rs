//! Candle store contracts and the scoped unit of work.
//!
//! A store keeps one series per `(pair, granularity)`, keyed by fix time.
//! Writes go through a [`StoreTx`] obtained from [`BarStore::begin`]; nothing a
//! transaction does is visible to readers until it commits.

use std::collections::BTreeMap;
use std::panic::AssertUnwindSafe;
use std::time::Duration;

use async_trait::async_trait;
use futures::FutureExt;
use futures::future::BoxFuture;
use fxbars_types::{Candle, FixTime, FxError, Granularity, PairId};
use tokio::time::Instant;

/// Half-open window of fix times: `after < fix_time <= until`.
///
/// `after == None` leaves the window unbounded in the past.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixRange {
    /// Exclusive lower bound.
    pub after: Option<FixTime>,
    /// Inclusive upper bound.
    pub until: FixTime,
}

impl FixRange {
    /// Everything at or before `until`.
    #[must_use]
    pub const fn until(until: FixTime) -> Self {
        Self { after: None, until }
    }

    /// Everything strictly after `after` and at or before `until`.
    #[must_use]
    pub const fn between(after: FixTime, until: FixTime) -> Self {
        Self {
            after: Some(after),
            until,
        }
    }

    /// Whether `t` lies inside the window.
    #[must_use]
    pub fn contains(&self, t: FixTime) -> bool {
        t <= self.until && self.after.is_none_or(|a| t > a)
    }
}

/// Durable keyed store of candle series.
#[async_trait]
pub trait BarStore: Send + Sync {
    /// Short store name used in errors and logs.
    fn name(&self) -> &'static str;

    /// Check that the store is reachable and usable.
    async fn ping(&self) -> Result<(), FxError>;

    /// Open a unit of work.
    async fn begin(&self) -> Result<Box<dyn StoreTx>, FxError>;

    /// Candles of one series inside `range`, newest first, at most `limit` rows
    /// when a limit is given.
    async fn scan(
        &self,
        pair: &PairId,
        granularity: Granularity,
        range: FixRange,
        limit: Option<usize>,
    ) -> Result<Vec<Candle>, FxError>;

    /// Every stored fix time of one series, oldest first.
    async fn fix_times(
        &self,
        pair: &PairId,
        granularity: Granularity,
    ) -> Result<Vec<FixTime>, FxError>;

    /// Pairs that have at least one stored candle.
    async fn list_pairs(&self) -> Result<Vec<PairId>, FxError>;

    /// Row count per granularity for one pair; granularities without rows are omitted.
    async fn count_by_granularity(
        &self,
        pair: &PairId,
    ) -> Result<BTreeMap<Granularity, u64>, FxError>;

    /// Release the store's resources. Further calls fail with `StoreUnavailable`.
    async fn close(&self) -> Result<(), FxError>;
}

/// An open unit of work against a [`BarStore`].
///
/// Exactly one of [`StoreTx::commit`] or [`StoreTx::rollback`] resolves it.
#[async_trait]
pub trait StoreTx: Send {
    /// Insert candles, overwriting any stored candle with the same fix time.
    async fn upsert_batch(
        &mut self,
        pair: &PairId,
        granularity: Granularity,
        candles: &[Candle],
    ) -> Result<(), FxError>;

    /// Remove every candle (and any derived index) of the given granularities.
    async fn delete_granularities(
        &mut self,
        pair: &PairId,
        granularities: &[Granularity],
    ) -> Result<(), FxError>;

    /// Make all staged changes visible.
    async fn commit(self: Box<Self>) -> Result<(), FxError>;

    /// Discard all staged changes.
    async fn rollback(self: Box<Self>) -> Result<(), FxError>;
}

/// Instant after which a request is abandoned with `RequestTimeout`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    operation: &'static str,
    at: Instant,
}

impl Deadline {
    /// A deadline `timeout` from now for `operation`.
    #[must_use]
    pub fn after(operation: &'static str, timeout: Duration) -> Self {
        Self {
            operation,
            at: Instant::now() + timeout,
        }
    }

    /// Name reported when the deadline expires.
    #[must_use]
    pub const fn operation(&self) -> &'static str {
        self.operation
    }

    fn expired(&self) -> FxError {
        FxError::RequestTimeout {
            operation: self.operation.to_string(),
        }
    }
}

/// Run `fut`, giving up with `RequestTimeout` once `deadline` passes.
///
/// # Errors
/// The error of `fut`, or `RequestTimeout`.
pub async fn with_deadline<T, Fut>(deadline: Option<Deadline>, fut: Fut) -> Result<T, FxError>
where
    Fut: Future<Output = Result<T, FxError>>,
{
    match deadline {
        Some(d) => tokio::time::timeout_at(d.at, fut)
            .await
            .unwrap_or_else(|_| Err(d.expired())),
        None => fut.await,
    }
}

/// Run `work` inside a transaction on `store`.
///
/// Commits when `work` returns `Ok`, rolls back when it returns `Err` or
/// panics. A panic is resumed after the rollback. If the rollback itself fails,
/// both failures are reported as one `Aggregate`.
///
/// # Errors
/// Returns the error of `begin`, of `work`, or of the commit.
pub async fn in_transaction<T, F>(store: &dyn BarStore, work: F) -> Result<T, FxError>
where
    T: Send,
    F: for<'a> FnOnce(&'a mut dyn StoreTx) -> BoxFuture<'a, Result<T, FxError>> + Send,
{
    in_transaction_within(store, None, work).await
}

/// [`in_transaction`] bounded by `deadline`.
///
/// When the deadline passes while `work` runs, the transaction is rolled back
/// and `RequestTimeout` is returned. The rollback itself is not bounded. A
/// commit cut off by the deadline has already been issued and is not rolled
/// back.
///
/// # Errors
/// As [`in_transaction`], plus `RequestTimeout`.
pub async fn in_transaction_within<T, F>(
    store: &dyn BarStore,
    deadline: Option<Deadline>,
    work: F,
) -> Result<T, FxError>
where
    T: Send,
    F: for<'a> FnOnce(&'a mut dyn StoreTx) -> BoxFuture<'a, Result<T, FxError>> + Send,
{
    let mut tx = with_deadline(deadline, store.begin()).await?;
    #[cfg(feature = "tracing")]
    tracing::debug!(store = store.name(), "transaction started");

    let guarded = AssertUnwindSafe(work(tx.as_mut())).catch_unwind().map(Ok);
    let raced = with_deadline(deadline, guarded).await;
    let outcome = match raced {
        Ok(Ok(result)) => result,
        Ok(Err(panic)) => {
            #[cfg(feature = "tracing")]
            tracing::warn!(store = store.name(), "transaction rolled back after panic");
            if let Err(_rollback_err) = tx.rollback().await {
                #[cfg(feature = "tracing")]
                tracing::warn!(
                    store = store.name(),
                    error = %_rollback_err,
                    "rollback after panic failed"
                );
            }
            std::panic::resume_unwind(panic)
        }
        Err(expired) => Err(expired),
    };

    match outcome {
        Ok(value) => {
            with_deadline(deadline, tx.commit()).await?;
            #[cfg(feature = "tracing")]
            tracing::debug!(store = store.name(), "transaction committed");
            Ok(value)
        }
        Err(err) => {
            #[cfg(feature = "tracing")]
            tracing::warn!(store = store.name(), error = %err, "transaction rolled back");
            match tx.rollback().await {
                Ok(()) => Err(err),
                Err(rollback_err) => Err(FxError::Aggregate(vec![err, rollback_err])),
            }
        }
    }
}
