//! In-memory candle store for tests and examples.
//!
//! [`MemoryStore`] implements [`BarStore`] on top of ordered maps. Writes are
//! staged inside a transaction and applied under a single lock on commit, so
//! readers never observe a partially applied unit of work. A
//! [`MemoryStoreController`] drives failures from the outside.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use fxbars_core::{BarStore, Candle, FixRange, FixTime, FxError, Granularity, PairId, StoreTx};

pub mod fixtures;

const STORE_NAME: &str = "fxbars-mock";

/// Store operation a behavior can be attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    /// `BarStore::ping`.
    Ping,
    /// `BarStore::begin`.
    Begin,
    /// `BarStore::scan`.
    Scan,
    /// `BarStore::fix_times`.
    FixTimes,
    /// `BarStore::list_pairs`.
    ListPairs,
    /// `BarStore::count_by_granularity`.
    Count,
    /// `StoreTx::upsert_batch`.
    Upsert,
    /// `StoreTx::delete_granularities`.
    Delete,
    /// `StoreTx::commit`.
    Commit,
    /// `StoreTx::rollback`.
    Rollback,
    /// `BarStore::close`.
    Close,
}

/// Instruction for how an operation should behave.
#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Fail every call with the provided error.
    Fail(FxError),
    /// Fail the next call only, then behave normally.
    FailOnce(FxError),
    /// Fail the `call`-th call of the operation (counting from 1 over the
    /// store's lifetime), then behave normally.
    FailAt {
        /// 1-based call number.
        call: usize,
        /// Error to return.
        error: FxError,
    },
    /// Hang indefinitely (simulate a stalled connection).
    Hang,
}

type SeriesKey = (PairId, Granularity);

#[derive(Default)]
struct Data {
    series: BTreeMap<SeriesKey, BTreeMap<FixTime, Candle>>,
    // Derived fix-time index, rebuilt for every series touched by an upsert.
    index: BTreeMap<SeriesKey, BTreeSet<FixTime>>,
}

impl Data {
    fn apply(&mut self, op: Staged) {
        match op {
            Staged::Upsert {
                pair,
                granularity,
                candles,
            } => {
                let key = (pair, granularity);
                let rows = self.series.entry(key.clone()).or_default();
                for c in candles {
                    rows.insert(c.fix_time, c);
                }
                let fixes = rows.keys().copied().collect();
                self.index.insert(key, fixes);
            }
            Staged::Delete {
                pair,
                granularities,
            } => {
                for g in granularities {
                    let key = (pair.clone(), g);
                    self.series.remove(&key);
                    self.index.remove(&key);
                }
            }
        }
    }
}

#[derive(Default)]
struct InternalState {
    data: Data,
    rules: HashMap<Op, MockBehavior>,
    calls: HashMap<Op, usize>,
    commits: usize,
    rollbacks: usize,
    closed: bool,
}

impl InternalState {
    fn take_rule(&mut self, op: Op) -> Option<MockBehavior> {
        let seen = self.calls.get(&op).copied().unwrap_or(0);
        let rule = match self.rules.get(&op)? {
            MockBehavior::FailAt { call, .. } if *call != seen => return None,
            rule => rule.clone(),
        };
        if matches!(rule, MockBehavior::FailOnce(_) | MockBehavior::FailAt { .. }) {
            self.rules.remove(&op);
        }
        Some(rule)
    }
}

enum Staged {
    Upsert {
        pair: PairId,
        granularity: Granularity,
        candles: Vec<Candle>,
    },
    Delete {
        pair: PairId,
        granularities: Vec<Granularity>,
    },
}

async fn enter(state: &Mutex<InternalState>, op: Op) -> Result<(), FxError> {
    let behavior = {
        let mut guard = state.lock().await;
        *guard.calls.entry(op).or_default() += 1;
        if guard.closed {
            return Err(FxError::StoreUnavailable(format!(
                "{STORE_NAME} is closed"
            )));
        }
        guard.take_rule(op)
    };
    match behavior {
        None => Ok(()),
        Some(
            MockBehavior::Fail(e) | MockBehavior::FailOnce(e) | MockBehavior::FailAt { error: e, .. },
        ) => Err(e),
        Some(MockBehavior::Hang) => std::future::pending().await,
    }
}

/// Controller handle used by tests to drive a [`MemoryStore`] from the outside.
pub struct MemoryStoreController {
    state: Arc<Mutex<InternalState>>,
}

impl MemoryStoreController {
    /// Attach a behavior to an operation, replacing any previous one.
    pub async fn set_behavior(&self, op: Op, behavior: MockBehavior) {
        self.state.lock().await.rules.insert(op, behavior);
    }

    /// Fail the next call of `op` with `err`.
    pub async fn fail_next(&self, op: Op, err: FxError) {
        self.set_behavior(op, MockBehavior::FailOnce(err)).await;
    }

    /// Remove every attached behavior.
    pub async fn clear_all_behaviors(&self) {
        self.state.lock().await.rules.clear();
    }

    /// Number of calls seen for `op`, including failed ones.
    pub async fn calls(&self, op: Op) -> usize {
        self.state.lock().await.calls.get(&op).copied().unwrap_or(0)
    }

    /// Number of committed transactions.
    pub async fn commits(&self) -> usize {
        self.state.lock().await.commits
    }

    /// Number of rolled-back transactions.
    pub async fn rollbacks(&self) -> usize {
        self.state.lock().await.rollbacks
    }

    /// Stored fix-time index of one series, bypassing fault injection.
    pub async fn indexed_fix_times(&self, pair: &PairId, granularity: Granularity) -> Vec<FixTime> {
        let guard = self.state.lock().await;
        guard
            .data
            .index
            .get(&(pair.clone(), granularity))
            .map(|s| s.iter().copied().collect())
            .unwrap_or_default()
    }
}

/// In-memory [`BarStore`].
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<InternalState>>,
}

impl MemoryStore {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty store plus a controller for fault injection.
    #[must_use]
    pub fn new_with_controller() -> (Self, MemoryStoreController) {
        let store = Self::new();
        let controller = MemoryStoreController {
            state: Arc::clone(&store.state),
        };
        (store, controller)
    }
}

#[async_trait]
impl BarStore for MemoryStore {
    fn name(&self) -> &'static str {
        STORE_NAME
    }

    async fn ping(&self) -> Result<(), FxError> {
        enter(&self.state, Op::Ping)
            .await
            .map_err(|e| match e {
                FxError::StoreUnavailable(_) => e,
                other => FxError::StoreUnavailable(other.to_string()),
            })
    }

    async fn begin(&self) -> Result<Box<dyn StoreTx>, FxError> {
        enter(&self.state, Op::Begin).await?;
        Ok(Box::new(MemoryTx {
            state: Arc::clone(&self.state),
            staged: Vec::new(),
        }))
    }

    async fn scan(
        &self,
        pair: &PairId,
        granularity: Granularity,
        range: FixRange,
        limit: Option<usize>,
    ) -> Result<Vec<Candle>, FxError> {
        enter(&self.state, Op::Scan).await?;
        let guard = self.state.lock().await;
        let Some(rows) = guard.data.series.get(&(pair.clone(), granularity)) else {
            return Ok(Vec::new());
        };
        let newest_first = rows
            .range(..=range.until)
            .rev()
            .map(|(_, c)| c)
            .take_while(|c| range.contains(c.fix_time))
            .cloned();
        Ok(match limit {
            Some(n) => newest_first.take(n).collect(),
            None => newest_first.collect(),
        })
    }

    async fn fix_times(
        &self,
        pair: &PairId,
        granularity: Granularity,
    ) -> Result<Vec<FixTime>, FxError> {
        enter(&self.state, Op::FixTimes).await?;
        let guard = self.state.lock().await;
        Ok(guard
            .data
            .index
            .get(&(pair.clone(), granularity))
            .map(|s| s.iter().copied().collect())
            .unwrap_or_default())
    }

    async fn list_pairs(&self) -> Result<Vec<PairId>, FxError> {
        enter(&self.state, Op::ListPairs).await?;
        let guard = self.state.lock().await;
        let pairs: BTreeSet<PairId> = guard
            .data
            .series
            .iter()
            .filter(|(_, rows)| !rows.is_empty())
            .map(|((p, _), _)| p.clone())
            .collect();
        Ok(pairs.into_iter().collect())
    }

    async fn count_by_granularity(
        &self,
        pair: &PairId,
    ) -> Result<BTreeMap<Granularity, u64>, FxError> {
        enter(&self.state, Op::Count).await?;
        let guard = self.state.lock().await;
        Ok(guard
            .data
            .series
            .iter()
            .filter(|((p, _), rows)| p == pair && !rows.is_empty())
            .map(|((_, g), rows)| (*g, u64::try_from(rows.len()).unwrap_or(u64::MAX)))
            .collect())
    }

    async fn close(&self) -> Result<(), FxError> {
        let behavior = {
            let mut guard = self.state.lock().await;
            *guard.calls.entry(Op::Close).or_default() += 1;
            guard.take_rule(Op::Close)
        };
        match behavior {
            Some(
                MockBehavior::Fail(e)
                | MockBehavior::FailOnce(e)
                | MockBehavior::FailAt { error: e, .. },
            ) => Err(e),
            Some(MockBehavior::Hang) => std::future::pending().await,
            None => {
                self.state.lock().await.closed = true;
                Ok(())
            }
        }
    }
}

struct MemoryTx {
    state: Arc<Mutex<InternalState>>,
    staged: Vec<Staged>,
}

#[async_trait]
impl StoreTx for MemoryTx {
    async fn upsert_batch(
        &mut self,
        pair: &PairId,
        granularity: Granularity,
        candles: &[Candle],
    ) -> Result<(), FxError> {
        enter(&self.state, Op::Upsert).await?;
        if !granularity.is_known() {
            return Err(FxError::invalid_granularity(granularity.as_str()));
        }
        self.staged.push(Staged::Upsert {
            pair: pair.clone(),
            granularity,
            candles: candles.to_vec(),
        });
        Ok(())
    }

    async fn delete_granularities(
        &mut self,
        pair: &PairId,
        granularities: &[Granularity],
    ) -> Result<(), FxError> {
        enter(&self.state, Op::Delete).await?;
        self.staged.push(Staged::Delete {
            pair: pair.clone(),
            granularities: granularities.to_vec(),
        });
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), FxError> {
        let Self { state, staged } = *self;
        enter(&state, Op::Commit).await?;
        let mut guard = state.lock().await;
        for op in staged {
            guard.data.apply(op);
        }
        guard.commits += 1;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), FxError> {
        let Self { state, staged } = *self;
        drop(staged);
        let outcome = enter(&state, Op::Rollback).await;
        state.lock().await.rollbacks += 1;
        outcome
    }
}
