//! Consensus parameters for each DeVault network.

mod cold_reward;


use std::{fmt, str::FromStr};

use thiserror::Error;

#[cfg(any(test, feature = "proptest-impl"))]
use proptest_derive::Arbitrary;

use crate::amount::{Amount, NonNegative};

pub use cold_reward::{AnnualRateFormula, ColdRewardParams, RewardFormula};

/// An enum describing the possible network choices.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[cfg_attr(any(test, feature = "proptest-impl"), derive(Arbitrary))]
pub enum Network {
    /// The production mainnet.
    #[default]
    Mainnet,

    /// The public test network.
    Testnet,

    /// A local regression test network.
    Regtest,
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.lowercase_name())
    }
}

impl Network {
    /// Returns the cold reward consensus parameters for this network.
    pub fn cold_reward_params(&self) -> ColdRewardParams {
        match self {
            Network::Mainnet => ColdRewardParams {
                // 30 days of 2 minute blocks
                min_reward_blocks: 21_600,
                min_reward_balance: Amount::<NonNegative>::new_from_coins(1_000),
                max_reward: Amount::<NonNegative>::new_from_coins(50_000),
            },
            Network::Testnet => ColdRewardParams {
                // 1 day
                min_reward_blocks: 720,
                min_reward_balance: Amount::<NonNegative>::new_from_coins(100),
                max_reward: Amount::<NonNegative>::new_from_coins(50_000),
            },
            Network::Regtest => ColdRewardParams {
                min_reward_blocks: 10,
                min_reward_balance: Amount::<NonNegative>::new_from_coins(1),
                max_reward: Amount::<NonNegative>::new_from_coins(100),
            },
        }
    }

    /// Return the lowercase network name.
    pub fn lowercase_name(&self) -> String {
        format!("{self:?}").to_ascii_lowercase()
    }
}

impl FromStr for Network {
    type Err = InvalidNetworkError;

    fn from_str(string: &str) -> Result<Self, Self::Err> {
        match string.to_lowercase().as_str() {
            "mainnet" => Ok(Network::Mainnet),
            "testnet" => Ok(Network::Testnet),
            "regtest" => Ok(Network::Regtest),
            _ => Err(InvalidNetworkError(string.to_owned())),
        }
    }
}

#[derive(Clone, Debug, Error)]
#[error("Invalid network: {0}")]
/// An error indicating that the network name was not recognised.
pub struct InvalidNetworkError(String);
