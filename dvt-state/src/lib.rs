//! Cold reward index storage and bookkeeping for DeVault.
//!
//! The [`ColdRewards`] engine keeps an ordered index of large unspent outputs,
//! selects the output that is owed a reward at each height, and resets the
//! eligibility height of rewarded outputs.

#![doc(html_root_url = "https://docs.rs/dvt_state")]
#![warn(missing_docs)]
#![allow(clippy::try_err)]
#![deny(clippy::await_holding_lock)]
#![forbid(unsafe_code)]

#[macro_use]
extern crate tracing;

mod cold_rewards;
mod config;
pub mod constants;
mod error;
mod store;

pub use cold_rewards::{BlockSource, ColdRewards, SelectedReward};
pub use config::{Config, StoreErrorPolicy};
pub use error::{BoxError, ColdRewardsError};
pub use store::{
    disk_format::{FromDisk, IntoDisk},
    DiskRewardStore, MemoryRewardStore, RewardCandidate, RewardStore,
};
