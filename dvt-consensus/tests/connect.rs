//! Cold reward payments across a chain of connected blocks,
//! using the on-disk reward index and the regtest reward constants.

use std::sync::Arc;

use color_eyre::eyre::Result;

use dvt_chain::{
    amount::{Amount, NonNegative},
    arbitrary::{fake_output, fake_transaction},
    block::{Block, Height},
    parameters::{AnnualRateFormula, Network, RewardFormula},
    transaction::Transaction,
    transparent::OutPoint,
    ShutdownSignal,
};
use dvt_consensus::{
    block::{cold_reward_is_valid, connect_block, fill_coinbase},
    ColdRewardError,
};
use dvt_state::{ColdRewards, Config, DiskRewardStore, SelectedReward};

type Engine = ColdRewards<DiskRewardStore>;

/// Returns a block template at `height` containing `transactions`,
/// and the reward it pays.
fn template(
    engine: &Engine,
    height: Height,
    transactions: Vec<Transaction>,
) -> Result<(Block, Option<SelectedReward>)> {
    let mut coinbase = Transaction::new_coinbase(height, vec![fake_output(50, 0)]);
    let selected = fill_coinbase(engine, &mut coinbase, height)?;

    let block = std::iter::once(coinbase)
        .chain(transactions)
        .map(Arc::new)
        .collect::<Vec<_>>()
        .into();

    Ok((block, selected))
}

/// Builds and connects empty template blocks for `heights`,
/// and returns the heights that paid a reward.
fn connect_empty_blocks(
    engine: &Engine,
    heights: impl IntoIterator<Item = u32>,
) -> Result<Vec<Height>> {
    let mut rewarded = Vec::new();

    for height in heights.into_iter().map(Height) {
        let (block, selected) = template(engine, height, Vec::new())?;
        let valid = connect_block(engine, &block, height)?;

        assert_eq!(valid.selected, selected);
        if selected.is_some() {
            rewarded.push(height);
        }
    }

    Ok(rewarded)
}

#[test]
fn cold_rewards_are_paid_periodically() -> Result<()> {
    dvt_test::init();

    let network = Network::Regtest;
    let params = network.cold_reward_params();
    let engine = ColdRewards::open(&Config::ephemeral(), network, ShutdownSignal::new())?;

    let balance = Amount::<NonNegative>::new_from_coins(1_000);
    let funding = fake_transaction(Vec::new(), vec![fake_output(1_000, 1)], 1);
    let funded = OutPoint {
        hash: funding.hash(),
        index: 0,
    };

    let (block, selected) = template(&engine, Height(1), vec![funding])?;
    assert_eq!(selected, None);
    connect_block(&engine, &block, Height(1))?;

    let maturity = params.min_reward_blocks + 1;
    let first_reward = 1 + maturity;

    assert_eq!(connect_empty_blocks(&engine, 2..first_reward)?, Vec::new());

    // The first reward is paid once the output is old enough.
    let height = Height(first_reward);
    let (block, selected) = template(&engine, height, Vec::new())?;
    let selected = selected.expect("the funded output is owed a reward");

    let expected = params.cap(AnnualRateFormula.reward(height, maturity.into(), balance));
    assert!(expected > Amount::<NonNegative>::zero());
    assert_eq!(selected.outpoint, funded);
    assert_eq!(selected.amount(), expected);

    let valid = connect_block(&engine, &block, height)?;
    assert_eq!(valid.expected_reward, expected);
    assert_eq!(engine.candidate(&funded)?.eligible_height, height);

    // Then the output has to mature again.
    let second_reward = first_reward + maturity;
    assert_eq!(
        connect_empty_blocks(&engine, first_reward + 1..=second_reward)?,
        vec![Height(second_reward)]
    );

    Ok(())
}

#[test]
fn peer_blocks_without_the_reward_are_rejected() -> Result<()> {
    dvt_test::init();

    let network = Network::Regtest;
    let params = network.cold_reward_params();
    let engine = ColdRewards::open(&Config::ephemeral(), network, ShutdownSignal::new())?;

    let funding = fake_transaction(Vec::new(), vec![fake_output(1_000, 1)], 1);
    let funded = OutPoint {
        hash: funding.hash(),
        index: 0,
    };
    let (block, _) = template(&engine, Height(1), vec![funding])?;
    connect_block(&engine, &block, Height(1))?;

    let height = Height(2 + params.min_reward_blocks);

    // A peer block that only pays the miner.
    let coinbase = Transaction::new_coinbase(height, vec![fake_output(50, 0)]);
    let peer_block = Block::from(vec![Arc::new(coinbase)]);

    let error = connect_block(&engine, &peer_block, height).expect_err("reward is missing");
    assert!(matches!(error, ColdRewardError::MissingPayment { .. }));
    assert!(error.is_invalid_block());

    // The rejected block did not reset the reward.
    assert_eq!(engine.candidate(&funded)?.eligible_height, Height(1));

    // The block the miner would have made is still valid.
    let (block, selected) = template(&engine, height, Vec::new())?;
    assert_eq!(cold_reward_is_valid(&engine, &block, height)?.selected, selected);

    Ok(())
}

#[test]
fn reward_for_an_output_spent_in_the_same_block() -> Result<()> {
    dvt_test::init();

    let network = Network::Regtest;
    let params = network.cold_reward_params();
    let engine = ColdRewards::open(&Config::ephemeral(), network, ShutdownSignal::new())?;

    let funding = fake_transaction(Vec::new(), vec![fake_output(1_000, 1)], 1);
    let funded = OutPoint {
        hash: funding.hash(),
        index: 0,
    };
    let (block, _) = template(&engine, Height(1), vec![funding])?;
    connect_block(&engine, &block, Height(1))?;

    let height = Height(2 + params.min_reward_blocks);
    let spend = fake_transaction(vec![funded], vec![fake_output(999, 2)], 2);
    let change = OutPoint {
        hash: spend.hash(),
        index: 0,
    };

    let (block, selected) = template(&engine, height, vec![spend])?;
    assert_eq!(
        selected.map(|selected| selected.outpoint),
        Some(funded),
        "the reward is selected before the block is applied"
    );

    connect_block(&engine, &block, height)?;

    assert!(engine.candidate(&funded).is_err());
    assert_eq!(engine.candidate(&change)?.eligible_height, height);
    assert_eq!(engine.candidate_count()?, 1);

    Ok(())
}
