//! Randomised property tests for the cold rewards engine.

use std::{collections::BTreeMap, env};

use proptest::{prelude::*, sample::Index};

use dvt_chain::{
    arbitrary::{fake_block, fake_output, fake_transaction},
    parameters::Network,
    transaction,
    transparent::{OutPoint, Output},
};

use crate::{Config, DiskRewardStore};

use super::*;

/// The default number of proptest cases for tests that only use memory stores.
const DEFAULT_COLD_REWARDS_PROPTEST_CASES: u32 = 64;

/// The default number of proptest cases for tests that open on-disk stores.
const DEFAULT_DISK_STORE_PROPTEST_CASES: u32 = 4;

/// Returns the number of proptest cases, using the `PROPTEST_CASES` env var if it is set.
fn proptest_cases(default: u32) -> u32 {
    env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Returns a strategy for candidates with frequent key and height collisions.
fn candidate_strategy() -> impl Strategy<Value = RewardCandidate> {
    (0..8u8, 0..300u32, 0..2_000i64, 0..30u32).prop_map(|(hash_byte, index, coins, height)| {
        let outpoint = OutPoint {
            hash: transaction::Hash([hash_byte; 32]),
            index,
        };

        candidate(outpoint, coins, height * 10)
    })
}

/// A fake transaction described by its spends and outputs.
///
/// Spends are indexes into the outpoints created earlier in the test chain.
#[derive(Clone, Debug)]
struct FakeTransaction {
    spends: Vec<Index>,
    output_coins: Vec<i64>,
}

fn fake_transaction_strategy() -> impl Strategy<Value = FakeTransaction> {
    (
        prop::collection::vec(any::<Index>(), 0..3),
        prop::collection::vec(0..1_500i64, 1..4),
    )
        .prop_map(|(spends, output_coins)| FakeTransaction {
            spends,
            output_coins,
        })
}

/// Returns a strategy for a chain of fake blocks, each a list of fake transactions.
fn fake_chain_strategy() -> impl Strategy<Value = Vec<Vec<FakeTransaction>>> {
    prop::collection::vec(prop::collection::vec(fake_transaction_strategy(), 0..4), 1..12)
}

/// Returns the serialized form of `outpoint`, which sets the canonical order.
fn model_key(outpoint: &OutPoint) -> ([u8; 32], [u8; 4]) {
    (outpoint.hash.0, outpoint.index.to_le_bytes())
}

/// Returns the candidates indexed by `candidates`, with later duplicates
/// replacing earlier ones, keyed in canonical order.
fn model_index(
    candidates: impl IntoIterator<Item = RewardCandidate>,
) -> BTreeMap<([u8; 32], [u8; 4]), RewardCandidate> {
    candidates
        .into_iter()
        .map(|candidate| (model_key(&candidate.outpoint), candidate))
        .collect()
}

/// Returns the outpoint, eligibility height and payment that should be selected at `height`.
fn model_selection(
    index: &BTreeMap<([u8; 32], [u8; 4]), RewardCandidate>,
    height: Height,
) -> Option<(OutPoint, Height, Output)> {
    let params = test_params();
    let mut best: Option<&RewardCandidate> = None;

    for candidate in index.values() {
        let age = height - candidate.eligible_height;
        let reward = full_balance(height, age, candidate.output.value);

        let is_older = best.map_or(true, |best| {
            candidate.eligible_height < best.eligible_height
        });

        if candidate.eligible_height < height
            && age > HeightDiff::from(params.min_reward_blocks)
            && reward > Amount::<NonNegative>::zero()
            && is_older
        {
            best = Some(candidate);
        }
    }

    best.map(|candidate| {
        let value = std::cmp::min(candidate.output.value, params.max_reward);

        (
            candidate.outpoint,
            candidate.eligible_height,
            Output {
                value,
                lock_script: candidate.output.lock_script.clone(),
            },
        )
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(proptest_cases(DEFAULT_COLD_REWARDS_PROPTEST_CASES)))]

    /// Check that selection picks the oldest mature candidate with a positive
    /// reward, breaking ties by key order, and that it is repeatable.
    #[test]
    fn selection_matches_model(
        candidates in prop::collection::vec(candidate_strategy(), 0..40),
        height in 0..400u32,
    ) {
        dvt_test::init();

        let height = Height(height);
        let model = model_index(candidates.clone());

        let engine = test_engine(
            candidates.into_iter().collect::<MemoryRewardStore>(),
            StoreErrorPolicy::Propagate,
        );

        let selected = engine.select(height)?;
        let expected = model_selection(&model, height);

        prop_assert_eq!(
            selected.clone().map(|selected| (selected.outpoint, selected.eligible_height, selected.payment)),
            expected
        );

        if let Some(selected) = &selected {
            prop_assert!(selected.eligible_height < height);
            prop_assert!(height - selected.eligible_height > HeightDiff::from(MIN_REWARD_BLOCKS));
            prop_assert!(selected.amount() <= test_params().max_reward);
            prop_assert!(selected.amount() > Amount::<NonNegative>::zero());
        }

        prop_assert_eq!(engine.select(height)?, selected);
        prop_assert_eq!(engine.candidate_count()?, model.len());
    }

    /// Check that a committed reward resets the candidate's age, and keeps its output.
    #[test]
    fn commit_resets_selected_candidate(
        candidates in prop::collection::vec(candidate_strategy(), 1..40),
        height in 0..400u32,
    ) {
        dvt_test::init();

        let height = Height(height);
        let engine = test_engine(
            candidates.into_iter().collect::<MemoryRewardStore>(),
            StoreErrorPolicy::Propagate,
        );
        let count = engine.candidate_count()?;

        if let Some(selected) = engine.select(height)? {
            let before = engine.candidate(&selected.outpoint)?;

            engine.commit(&selected, height)?;

            let after = engine.candidate(&selected.outpoint)?;
            prop_assert_eq!(after.eligible_height, height);
            prop_assert_eq!(after.output, before.output);
            prop_assert_eq!(engine.candidate_count()?, count);

            let reselected = engine.select(height)?;
            prop_assert_ne!(
                reselected.map(|reselected| reselected.outpoint),
                Some(selected.outpoint)
            );
        }
    }

    /// Check that the index matches a model of the unspent outputs above the
    /// minimum balance, after any sequence of blocks.
    #[test]
    fn index_tracks_unspent_candidate_outputs(chain in fake_chain_strategy()) {
        dvt_test::init();

        let params = test_params();
        let engine = test_engine(MemoryRewardStore::new(), StoreErrorPolicy::Propagate);

        let mut model = BTreeMap::new();
        let mut created: Vec<OutPoint> = Vec::new();
        let mut seed = 0;

        for (block_index, fake_transactions) in chain.into_iter().enumerate() {
            let height = Height(block_index as u32 + 1);
            let mut transactions = Vec::new();
            let mut expect_change = false;

            for fake in fake_transactions {
                let spends: Vec<OutPoint> = if created.is_empty() {
                    Vec::new()
                } else {
                    fake.spends.iter().map(|index| *index.get(&created)).collect()
                };
                let outputs = fake
                    .output_coins
                    .iter()
                    .map(|coins| fake_output(*coins, (seed % 256) as u8))
                    .collect();

                seed += 1;
                let transaction = fake_transaction(spends.clone(), outputs, seed);
                let hash = transaction.hash();

                for spend in spends {
                    expect_change |= model.remove(&model_key(&spend)).is_some();
                }
                for (index, output) in transaction.outputs.iter().enumerate() {
                    let outpoint = OutPoint::from_usize(hash, index);
                    created.push(outpoint);

                    if params.is_candidate_value(output.value) {
                        expect_change = true;
                        model.insert(
                            model_key(&outpoint),
                            RewardCandidate::new(outpoint, output.clone(), height),
                        );
                    }
                }

                transactions.push(transaction);
            }

            let block = fake_block(height, transactions);
            prop_assert_eq!(engine.apply_block(height, &block.transactions)?, expect_change);
        }

        let store = engine.into_store();
        let indexed: Vec<RewardCandidate> = store.cursor().collect::<Result<_, _>>()?;
        let expected: Vec<RewardCandidate> = model.into_values().collect();

        prop_assert_eq!(indexed, expected);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(proptest_cases(DEFAULT_DISK_STORE_PROPTEST_CASES)))]

    /// Check that the on-disk and in-memory stores make the same selections.
    #[test]
    fn disk_and_memory_stores_agree(
        candidates in prop::collection::vec(candidate_strategy(), 0..40),
        heights in prop::collection::vec(0..400u32, 1..4),
    ) {
        dvt_test::init();

        let mut disk = DiskRewardStore::open(&Config::ephemeral(), Network::Regtest)?;
        for candidate in candidates.iter().cloned() {
            disk.put(candidate)?;
        }
        disk.flush()?;

        let disk = test_engine(disk, StoreErrorPolicy::Propagate);
        let memory = test_engine(
            candidates.into_iter().collect::<MemoryRewardStore>(),
            StoreErrorPolicy::Propagate,
        );

        for height in heights {
            let height = Height(height);

            let selected = disk.select(height)?;
            prop_assert_eq!(&selected, &memory.select(height)?);

            if let Some(selected) = selected {
                disk.commit(&selected, height)?;
                memory.commit(&selected, height)?;
            }
        }

        let disk = disk.into_store();
        let memory = memory.into_store();

        let disk_candidates: Vec<RewardCandidate> = disk.cursor().collect::<Result<_, _>>()?;
        let memory_candidates: Vec<RewardCandidate> = memory.cursor().collect::<Result<_, _>>()?;

        prop_assert_eq!(disk_candidates, memory_candidates);
    }
}
