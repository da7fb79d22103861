//! Strategies and fake chain builders for tests.

use std::{ops::RangeInclusive, sync::Arc};

use proptest::prelude::*;

use crate::{
    amount::{Amount, NonNegative},
    block::{Block, Height},
    transaction::{self, Transaction},
    transparent::{Input, OutPoint, Output, Script},
};

/// Returns a strategy for outputs with values in `satoshis`, and short lock scripts.
pub fn output_strategy(satoshis: RangeInclusive<i64>) -> BoxedStrategy<Output> {
    (satoshis, proptest::collection::vec(any::<u8>(), 1..8))
        .prop_map(|(value, script)| Output {
            value: value
                .try_into()
                .expect("strategy ranges are valid amounts"),
            lock_script: Script::new(&script),
        })
        .boxed()
}

/// Returns an output paying `coins` to a script derived from `tag`.
pub fn fake_output(coins: i64, tag: u8) -> Output {
    Output {
        value: Amount::<NonNegative>::new_from_coins(coins),
        lock_script: Script::new(&[0x76, 0xa9, tag]),
    }
}

/// Returns an outpoint that does not exist in any fake chain.
///
/// Spending it has no effect on the reward index.
pub fn unknown_outpoint(seed: u32) -> OutPoint {
    let mut hash = [0xee; 32];
    hash[..4].copy_from_slice(&seed.to_be_bytes());

    OutPoint {
        hash: transaction::Hash(hash),
        index: seed,
    }
}

/// Returns a block at `height` containing a coinbase, then `transactions`.
pub fn fake_block(height: Height, transactions: Vec<Transaction>) -> Block {
    let coinbase = Transaction::new_coinbase(height, vec![fake_output(50, 0)]);

    std::iter::once(coinbase)
        .chain(transactions)
        .map(Arc::new)
        .collect::<Vec<_>>()
        .into()
}

/// Returns a transaction spending `spends` and creating `outputs`.
///
/// Transactions without real spends spend a unique unknown outpoint, so that
/// their hashes differ.
pub fn fake_transaction(spends: Vec<OutPoint>, outputs: Vec<Output>, seed: u32) -> Transaction {
    let inputs = if spends.is_empty() {
        vec![Input::spend(unknown_outpoint(seed))]
    } else {
        spends.into_iter().map(Input::spend).collect()
    };

    Transaction::new(inputs, outputs)
}
