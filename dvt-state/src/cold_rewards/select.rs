//! Reward selection: the deterministic scan for the candidate owed a reward.

use tracing::instrument;

use dvt_chain::{
    amount::{Amount, NonNegative},
    block::Height,
    parameters::RewardFormula,
    transparent,
};

use crate::{ColdRewardsError, RewardCandidate, RewardStore};

use super::ColdRewards;

/// The candidate selected for a reward at a height, and its payment.
///
/// Returned by [`ColdRewards::select`], and passed to [`ColdRewards::commit`]
/// once a block paying it has been accepted.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct SelectedReward {
    /// The rewarded candidate's outpoint.
    pub outpoint: transparent::OutPoint,

    /// The candidate's eligibility height when it was selected.
    pub eligible_height: Height,

    /// The reward payment: the capped reward amount, paid to the candidate's lock script.
    pub payment: transparent::Output,
}

impl SelectedReward {
    /// Returns the reward amount.
    pub fn amount(&self) -> Amount<NonNegative> {
        self.payment.value
    }
}

impl<S, F> ColdRewards<S, F>
where
    S: RewardStore,
    F: RewardFormula,
{
    /// Selects the candidate owed a reward in the block at `height`, if any.
    ///
    /// Scans every candidate in canonical key order. The selected candidate
    /// has the lowest eligibility height of all the candidates that:
    /// - are older than the minimum reward age, and
    /// - have a positive reward.
    ///
    /// When several candidates have the same eligibility height, the first one
    /// in key order is selected. The reward is capped at the maximum reward.
    ///
    /// Does not modify the index. Store read failures always fail the selection,
    /// because a partial scan could select a different reward from other nodes.
    ///
    /// Returns [`ColdRewardsError::Cancelled`] if the node starts shutting down
    /// during the scan.
    #[instrument(skip(self))]
    pub fn select(&self, height: Height) -> Result<Option<SelectedReward>, ColdRewardsError> {
        let store = self.lock()?;

        let mut best: Option<(RewardCandidate, Amount<NonNegative>)> = None;
        // Only candidates eligible before this height can be selected.
        let mut best_height = height;
        let mut scanned: usize = 0;

        for candidate in store.cursor() {
            if self.shutdown.is_shutting_down() {
                info!(?height, scanned, "cancelled cold reward selection");
                return Err(ColdRewardsError::Cancelled);
            }

            let candidate = candidate?;
            scanned += 1;

            if candidate.eligible_height >= best_height {
                continue;
            }

            let age = height - candidate.eligible_height;
            if !self.params.is_mature(age) {
                continue;
            }

            let balance = candidate.output.value;
            let reward = self.formula.reward(height, age, balance);

            debug!(
                outpoint = %candidate.outpoint,
                eligible_height = ?candidate.eligible_height,
                balance_coins = balance.whole_coins(),
                age,
                reward = ?reward,
                "checked cold reward candidate"
            );

            if reward <= Amount::<NonNegative>::zero() {
                continue;
            }

            best_height = candidate.eligible_height;
            best = Some((candidate, self.params.cap(reward)));
        }

        let Some((candidate, reward)) = best else {
            debug!(?height, scanned, "no cold reward due");
            return Ok(None);
        };

        info!(
            ?height,
            outpoint = %candidate.outpoint,
            eligible_height = ?candidate.eligible_height,
            reward = ?reward,
            reward_coins = reward.whole_coins(),
            scanned,
            "selected cold reward"
        );
        metrics::gauge!("state.cold_rewards.selected.reward").set(reward.satoshis() as f64);
        metrics::gauge!("state.cold_rewards.selected.height").set(height.0 as f64);

        Ok(Some(SelectedReward {
            outpoint: candidate.outpoint,
            eligible_height: candidate.eligible_height,
            payment: transparent::Output {
                value: reward,
                lock_script: candidate.output.lock_script,
            },
        }))
    }
}
