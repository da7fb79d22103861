//! The cold rewards engine: index updates, reward selection, and reward commits.
//!
//! # Correctness
//!
//! Every node must make the same selection from the same chain, so the engine
//! only reads the index through [`RewardStore::cursor`], which iterates in
//! canonical key order, and only computes rewards with the configured
//! [`RewardFormula`].

use std::sync::{Mutex, MutexGuard, PoisonError};

use dvt_chain::{
    parameters::{AnnualRateFormula, ColdRewardParams, Network},
    transparent,
    ShutdownSignal,
};

use crate::{
    ColdRewardsError, Config, DiskRewardStore, RewardCandidate, RewardStore, StoreErrorPolicy,
};

mod commit;
mod select;
mod update;

#[cfg(test)]
mod tests;

pub use select::SelectedReward;
pub use update::BlockSource;

// Doc-only imports
#[allow(unused_imports)]
use dvt_chain::parameters::RewardFormula;

/// The cold rewards consensus rule state for a single chain.
///
/// The store is protected by a mutex, which is held for the whole of each
/// public operation. So index updates, selections and commits never interleave.
///
/// If an operation panics while it holds the lock, for example in a custom
/// [`RewardFormula`], the index might be partly updated. Every later operation
/// returns [`ColdRewardsError::Poisoned`], and the index must be rebuilt.
#[derive(Debug)]
pub struct ColdRewards<S, F = AnnualRateFormula> {
    /// The reward index.
    store: Mutex<S>,

    /// The network's cold reward constants.
    params: ColdRewardParams,

    /// The reward formula.
    formula: F,

    /// What to do when an index update fails.
    policy: StoreErrorPolicy,

    /// Stops long selection scans when the node shuts down.
    shutdown: ShutdownSignal,
}

impl<S> ColdRewards<S, AnnualRateFormula>
where
    S: RewardStore,
{
    /// Returns a new engine using `store` as its index, with the default reward formula.
    pub fn new(
        store: S,
        params: ColdRewardParams,
        policy: StoreErrorPolicy,
        shutdown: ShutdownSignal,
    ) -> Self {
        ColdRewards {
            store: Mutex::new(store),
            params,
            formula: AnnualRateFormula,
            policy,
            shutdown,
        }
    }
}

impl ColdRewards<DiskRewardStore, AnnualRateFormula> {
    /// Opens the persistent reward index for `network`, and returns an engine using it.
    pub fn open(
        config: &Config,
        network: Network,
        shutdown: ShutdownSignal,
    ) -> Result<Self, ColdRewardsError> {
        let store = DiskRewardStore::open(config, network)?;

        Ok(ColdRewards::new(
            store,
            network.cold_reward_params(),
            config.store_error_policy,
            shutdown,
        ))
    }
}

impl<S, F> ColdRewards<S, F>
where
    S: RewardStore,
{
    /// Replaces the reward formula.
    pub fn with_formula<F2>(self, formula: F2) -> ColdRewards<S, F2> {
        ColdRewards {
            store: self.store,
            params: self.params,
            formula,
            policy: self.policy,
            shutdown: self.shutdown,
        }
    }

    /// Returns the cold reward constants used by this engine.
    pub fn params(&self) -> ColdRewardParams {
        self.params
    }

    /// Returns the configured store error policy.
    pub fn policy(&self) -> StoreErrorPolicy {
        self.policy
    }

    /// Returns the indexed candidate for `outpoint`.
    pub fn candidate(
        &self,
        outpoint: &transparent::OutPoint,
    ) -> Result<RewardCandidate, ColdRewardsError> {
        self.lock()?.get(outpoint)
    }

    /// Returns the number of indexed candidates.
    pub fn candidate_count(&self) -> Result<usize, ColdRewardsError> {
        self.lock()?.len()
    }

    /// Consumes the engine and returns its store.
    ///
    /// The store is returned even if an earlier operation panicked,
    /// so it can be inspected or cleared.
    pub fn into_store(self) -> S {
        self.store
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Locks the store for the duration of an operation.
    fn lock(&self) -> Result<MutexGuard<'_, S>, ColdRewardsError> {
        self.store.lock().map_err(|_| {
            error!("cold rewards index is unusable: an earlier operation panicked");
            ColdRewardsError::Poisoned
        })
    }

    /// Applies the store error policy to `error`, from `operation`.
    ///
    /// Returns the error if it must abort the current operation.
    fn handle_store_error(
        &self,
        error: ColdRewardsError,
        operation: &'static str,
    ) -> Result<(), ColdRewardsError> {
        match self.policy {
            StoreErrorPolicy::LogAndContinue if error.is_store_failure() => {
                warn!(
                    ?error,
                    operation, "ignoring cold rewards store failure, the index might be inconsistent"
                );
                metrics::counter!("state.cold_rewards.store.ignored.error.count").increment(1);

                Ok(())
            }
            _ => Err(error),
        }
    }
}
