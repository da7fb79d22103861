//! Cold reward payments in coinbase transactions.

use tracing::instrument;

use dvt_chain::{
    amount::{Amount, NonNegative},
    block::{Block, Height},
    parameters::RewardFormula,
    transaction::Transaction,
    transparent,
};
use dvt_state::{ColdRewards, ColdRewardsError, RewardStore, SelectedReward};

use crate::error::ColdRewardError;

use super::COLD_REWARD_OUTPUT_INDEX;

/// The cold reward paid by a valid block.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ValidReward {
    /// The reward amount paid by the block's coinbase, or zero if no reward was due.
    pub expected_reward: Amount<NonNegative>,

    /// The rewarded candidate, if a reward was due.
    ///
    /// Pass it to [`ColdRewards::commit`] once the block is accepted.
    pub selected: Option<SelectedReward>,
}

/// Returns the cold reward that must be paid by the block at `height`,
/// and the coinbase output that pays it.
///
/// Returns `None` if no reward is due.
pub fn cold_reward_output<S, F>(
    engine: &ColdRewards<S, F>,
    height: Height,
) -> Result<Option<(SelectedReward, transparent::Output)>, ColdRewardError>
where
    S: RewardStore,
    F: RewardFormula,
{
    Ok(engine.select(height)?.map(|selected| {
        let payment = selected.payment.clone();
        (selected, payment)
    }))
}

/// Appends the cold reward payment for the block at `height` to `coinbase`.
///
/// Nothing is appended if no reward is due. Otherwise `coinbase` must only have
/// its miner output, so that the payment is at the position checked by
/// [`cold_reward_is_valid`]. If it has any other number of outputs, returns
/// [`ColdRewardError::TemplateOutputs`] and leaves `coinbase` unchanged.
#[instrument(skip(engine, coinbase))]
pub fn fill_coinbase<S, F>(
    engine: &ColdRewards<S, F>,
    coinbase: &mut Transaction,
    height: Height,
) -> Result<Option<SelectedReward>, ColdRewardError>
where
    S: RewardStore,
    F: RewardFormula,
{
    let Some((selected, payment)) = cold_reward_output(engine, height)? else {
        return Ok(None);
    };

    if coinbase.outputs.len() != COLD_REWARD_OUTPUT_INDEX {
        return Err(ColdRewardError::TemplateOutputs {
            outputs: coinbase.outputs.len(),
        });
    }

    debug!(
        outpoint = %selected.outpoint,
        reward_coins = payment.value.whole_coins(),
        "adding cold reward payment to coinbase"
    );
    coinbase.outputs.push(payment);

    Ok(Some(selected))
}

/// Returns the cold reward paid by `block` if its coinbase pays exactly the
/// reward due at `height`, or the rule it breaks.
///
/// If a reward is due, the second coinbase output must be the reward payment.
/// Otherwise, the coinbase must only have one output.
///
/// Must be called before `block` is applied to the reward index.
#[instrument(skip(engine, block), fields(%block))]
pub fn cold_reward_is_valid<S, F>(
    engine: &ColdRewards<S, F>,
    block: &Block,
    height: Height,
) -> Result<ValidReward, ColdRewardError>
where
    S: RewardStore,
    F: RewardFormula,
{
    let result = check_coinbase_payment(engine, block, height);

    match &result {
        Err(error) if error.is_invalid_block() => {
            warn!(?error, "rejected block with an invalid cold reward payment");
            metrics::counter!("consensus.cold_reward.rejected.block.count").increment(1);
        }
        Err(error) => info!(?error, "could not finish the cold reward check"),
        Ok(_) => {}
    }

    result
}

/// Compares the coinbase outputs of `block` with the reward due at `height`.
fn check_coinbase_payment<S, F>(
    engine: &ColdRewards<S, F>,
    block: &Block,
    height: Height,
) -> Result<ValidReward, ColdRewardError>
where
    S: RewardStore,
    F: RewardFormula,
{
    let coinbase = block.coinbase().ok_or(ColdRewardError::NoCoinbase)?;

    match cold_reward_output(engine, height)? {
        Some((selected, expected)) => match coinbase.outputs.get(COLD_REWARD_OUTPUT_INDEX) {
            Some(actual) if *actual == expected => Ok(ValidReward {
                expected_reward: expected.value,
                selected: Some(selected),
            }),
            Some(actual) => Err(ColdRewardError::WrongPayment {
                expected,
                actual: actual.clone(),
            }),
            None => Err(ColdRewardError::MissingPayment { expected }),
        },
        None if coinbase.outputs.len() == 1 => Ok(ValidReward {
            expected_reward: Amount::zero(),
            selected: None,
        }),
        None => Err(ColdRewardError::UnearnedPayment {
            outputs: coinbase.outputs.len(),
        }),
    }
}

/// Checks the cold reward paid by `block`, then updates the reward index with it.
///
/// After the index is updated, the rewarded candidate's age is reset to `height`.
/// If the block also spends the rewarded output, there is nothing left to reset,
/// so the missing record is ignored.
///
/// Invalid blocks do not change the index.
pub fn connect_block<S, F>(
    engine: &ColdRewards<S, F>,
    block: &Block,
    height: Height,
) -> Result<ValidReward, ColdRewardError>
where
    S: RewardStore,
    F: RewardFormula,
{
    let valid = cold_reward_is_valid(engine, block, height)?;

    engine.apply_block(height, &block.transactions)?;

    if let Some(selected) = &valid.selected {
        match engine.commit(selected, height) {
            Ok(()) => {}
            Err(ColdRewardsError::RecordNotFound(outpoint)) => {
                info!(
                    %outpoint,
                    ?height,
                    "rewarded output was spent in the rewarded block"
                );
            }
            Err(error) => return Err(error.into()),
        }
    }

    metrics::counter!("consensus.cold_reward.connected.block.count").increment(1);

    Ok(valid)
}
