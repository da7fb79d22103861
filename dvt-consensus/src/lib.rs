//! Implementation of the DeVault cold reward consensus rule.
//!
//! Each block's coinbase transaction pays at most one cold reward, to the
//! oldest sufficiently large unspent output in the reward index. Miners use
//! the same selection to fill block templates that validating nodes use to
//! check received blocks, so the two paths always agree.
//!
//! The reward index itself is maintained by `dvt-state`. This crate runs the
//! checks that decide whether a block is valid:
//! - [`block::cold_reward_output`] and [`block::fill_coinbase`] build the payment
//!   for a new block,
//! - [`block::cold_reward_is_valid`] checks the payment in a received block, and
//! - [`block::connect_block`] checks a block, then updates the index with it.

#![allow(clippy::try_err)]

#[macro_use]
extern crate tracing;

pub mod block;
pub mod error;

pub use block::ValidReward;
pub use error::ColdRewardError;
