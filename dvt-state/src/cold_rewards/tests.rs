//! Tests for the cold rewards engine.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use dvt_chain::{
    amount::{Amount, NonNegative},
    block::{Height, HeightDiff},
    parameters::ColdRewardParams,
    transparent, ShutdownSignal,
};

use crate::{
    store::CandidateCursor, ColdRewards, ColdRewardsError, MemoryRewardStore, RewardCandidate,
    RewardStore, StoreErrorPolicy,
};

mod prop;

/// The minimum reward age used by these tests.
const MIN_REWARD_BLOCKS: u32 = 50;

/// Cold reward constants with small values, so tests can use short chains.
fn test_params() -> ColdRewardParams {
    ColdRewardParams {
        min_reward_blocks: MIN_REWARD_BLOCKS,
        min_reward_balance: Amount::<NonNegative>::new_from_coins(500),
        max_reward: Amount::<NonNegative>::new_from_coins(100),
    }
}

/// A reward formula type that can be named in test engine types.
type TestFormula = fn(Height, HeightDiff, Amount<NonNegative>) -> Amount<NonNegative>;

/// Pays the whole balance, so rewards are always positive and usually capped.
fn full_balance(_height: Height, _age: HeightDiff, balance: Amount<NonNegative>) -> Amount<NonNegative> {
    balance
}

/// Returns an engine using `store`, the test constants, and the full balance formula.
fn test_engine<S: RewardStore>(
    store: S,
    policy: StoreErrorPolicy,
) -> ColdRewards<S, TestFormula> {
    ColdRewards::new(store, test_params(), policy, ShutdownSignal::new())
        .with_formula(full_balance as TestFormula)
}

/// Returns a candidate record for `outpoint`, worth `coins`, eligible from `height`.
fn candidate(outpoint: transparent::OutPoint, coins: i64, height: u32) -> RewardCandidate {
    RewardCandidate::new(
        outpoint,
        dvt_chain::arbitrary::fake_output(coins, outpoint.index as u8),
        Height(height),
    )
}

/// A store wrapper that fails reads or writes on demand.
#[derive(Debug, Default)]
struct FailingStore {
    inner: MemoryRewardStore,

    /// Fail `put`, `erase` and `flush` while set.
    fail_writes: Arc<AtomicBool>,

    /// Fail only `put` while set.
    fail_puts: Arc<AtomicBool>,

    /// Fail cursor reads after this many candidates.
    fail_cursor_after: Option<usize>,
}

impl FailingStore {
    fn write_error() -> ColdRewardsError {
        ColdRewardsError::StoreWrite("injected write failure".into())
    }
}

impl RewardStore for FailingStore {
    fn contains(&self, outpoint: &transparent::OutPoint) -> Result<bool, ColdRewardsError> {
        self.inner.contains(outpoint)
    }

    fn get(&self, outpoint: &transparent::OutPoint) -> Result<RewardCandidate, ColdRewardsError> {
        self.inner.get(outpoint)
    }

    fn put(&mut self, candidate: RewardCandidate) -> Result<(), ColdRewardsError> {
        if self.fail_writes.load(Ordering::SeqCst) || self.fail_puts.load(Ordering::SeqCst) {
            return Err(Self::write_error());
        }
        self.inner.put(candidate)
    }

    fn erase(&mut self, outpoint: &transparent::OutPoint) -> Result<(), ColdRewardsError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Self::write_error());
        }
        self.inner.erase(outpoint)
    }

    fn flush(&mut self) -> Result<(), ColdRewardsError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Self::write_error());
        }
        self.inner.flush()
    }

    fn cursor(&self) -> CandidateCursor<'_> {
        match self.fail_cursor_after {
            None => self.inner.cursor(),
            Some(limit) => Box::new(self.inner.cursor().take(limit).chain(std::iter::once(Err::<
                RewardCandidate,
                _,
            >(
                ColdRewardsError::StoreRead("injected read failure".into()),
            )))),
        }
    }
}
