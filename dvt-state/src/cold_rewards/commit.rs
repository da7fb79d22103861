//! Reward commits: resetting the eligibility height of rewarded candidates.

use tracing::instrument;

use dvt_chain::{block::Height, transparent};

use crate::{ColdRewardsError, RewardCandidate, RewardStore};

use super::{ColdRewards, SelectedReward};

impl<S, F> ColdRewards<S, F>
where
    S: RewardStore,
{
    /// Records that `selected` was paid in the block at `new_height`.
    ///
    /// The candidate's age restarts from `new_height`, so it is not rewarded
    /// again until it matures again.
    pub fn commit(
        &self,
        selected: &SelectedReward,
        new_height: Height,
    ) -> Result<(), ColdRewardsError> {
        self.reset_candidate_height(&selected.outpoint, new_height)
    }

    /// Replaces the record for `outpoint` with one that has the same output,
    /// and is eligible from `new_height`.
    ///
    /// Returns [`ColdRewardsError::RecordNotFound`] if `outpoint` is not in the
    /// index. In that case, the index is not modified.
    ///
    /// The record is replaced by a single write, so a failed write never
    /// removes the candidate.
    #[instrument(skip(self), fields(%outpoint))]
    pub fn reset_candidate_height(
        &self,
        outpoint: &transparent::OutPoint,
        new_height: Height,
    ) -> Result<(), ColdRewardsError> {
        let mut store = self.lock()?;

        let candidate = store.get(outpoint)?;
        let old_height = candidate.eligible_height;

        debug!(
            value = ?candidate.output.value,
            coins = candidate.output.value.whole_coins(),
            ?old_height,
            "resetting rewarded candidate"
        );

        let candidate = RewardCandidate {
            eligible_height: new_height,
            ..candidate
        };

        if let Err(error) = store.put(candidate) {
            self.handle_store_error(error, "reset rewarded candidate")?;
        }

        info!(?old_height, ?new_height, "reset cold reward candidate height");
        metrics::counter!("state.cold_rewards.candidate.reset.count").increment(1);

        Ok(())
    }
}
