//! Cold reward checks for blocks.
//!
//! Block templates and received blocks use the same reward selection,
//! so a node accepts exactly the coinbase payments it would have produced.

mod cold_reward;


pub use cold_reward::{
    cold_reward_is_valid, cold_reward_output, connect_block, fill_coinbase, ValidReward,
};

/// The position of the cold reward payment in the coinbase outputs.
///
/// The first output pays the miner.
pub const COLD_REWARD_OUTPUT_INDEX: usize = 1;
