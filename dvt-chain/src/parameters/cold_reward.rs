//! Cold reward consensus parameters and the reward formula.

use crate::{
    amount::{Amount, NonNegative, MAX_MONEY},
    block::{Height, HeightDiff},
};

/// The per-network constants of the cold rewards rule.
///
/// These values are consensus-critical: every node on a network must use the same ones.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ColdRewardParams {
    /// An output is only rewarded once its age is strictly greater than this many blocks.
    pub min_reward_blocks: u32,

    /// Outputs below this value never enter the reward index.
    pub min_reward_balance: Amount<NonNegative>,

    /// The largest reward paid in a single block.
    pub max_reward: Amount<NonNegative>,
}

impl ColdRewardParams {
    /// Returns `true` if an output of `value` should be tracked as a reward candidate.
    pub fn is_candidate_value(&self, value: Amount<NonNegative>) -> bool {
        value >= self.min_reward_balance
    }

    /// Returns `true` if a candidate with `age` is old enough to be rewarded.
    pub fn is_mature(&self, age: HeightDiff) -> bool {
        age > HeightDiff::from(self.min_reward_blocks)
    }

    /// Caps `reward` at [`ColdRewardParams::max_reward`].
    pub fn cap(&self, reward: Amount<NonNegative>) -> Amount<NonNegative> {
        reward.min(self.max_reward)
    }
}

/// Computes the uncapped reward for a candidate.
///
/// Implementations must be pure functions of their arguments, because every
/// node has to compute the same reward for the same candidate.
pub trait RewardFormula {
    /// Returns the reward for a candidate of value `balance`, that has been
    /// unspent for `age` blocks, selected at `height`.
    fn reward(
        &self,
        height: Height,
        age: HeightDiff,
        balance: Amount<NonNegative>,
    ) -> Amount<NonNegative>;
}

impl<F> RewardFormula for F
where
    F: Fn(Height, HeightDiff, Amount<NonNegative>) -> Amount<NonNegative>,
{
    fn reward(
        &self,
        height: Height,
        age: HeightDiff,
        balance: Amount<NonNegative>,
    ) -> Amount<NonNegative> {
        self(height, age, balance)
    }
}

/// The default reward formula: simple interest at an annual percentage rate
/// that steps down with each chain year.
///
/// `reward = balance * rate(height) * age / (100 * BLOCKS_PER_YEAR)`, rounded down.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct AnnualRateFormula;

impl AnnualRateFormula {
    /// The number of 2 minute blocks in a 365 day year.
    pub const BLOCKS_PER_YEAR: u32 = 262_800;

    /// The annual rate in percent, by chain year. Later years use the last rate.
    pub const RATES: [u32; 5] = [15, 12, 9, 7, 5];

    /// Returns the annual rate, in percent, at `height`.
    pub fn rate(height: Height) -> u32 {
        let year = (height.0 / Self::BLOCKS_PER_YEAR) as usize;

        Self::RATES
            .get(year)
            .or(Self::RATES.last())
            .copied()
            .unwrap_or_default()
    }
}

impl RewardFormula for AnnualRateFormula {
    fn reward(
        &self,
        height: Height,
        age: HeightDiff,
        balance: Amount<NonNegative>,
    ) -> Amount<NonNegative> {
        if age <= 0 {
            return Amount::zero();
        }

        let numerator = i128::from(balance.satoshis())
            * i128::from(Self::rate(height))
            * i128::from(age);
        let denominator = 100 * i128::from(Self::BLOCKS_PER_YEAR);

        // Both operands are positive, so this rounds down.
        let reward = (numerator / denominator).min(i128::from(MAX_MONEY));

        reward.try_into().unwrap_or_else(|_| {
            tracing::warn!(?reward, "cold reward outside the valid amount range");
            Amount::zero()
        })
    }
}
