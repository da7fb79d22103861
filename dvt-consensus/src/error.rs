//! Errors that can occur when checking the cold reward consensus rule.
//!
//! Each rejection variant corresponds to part of the rule, so blocks are never
//! rejected for a reason that isn't listed here.

use thiserror::Error;

use dvt_chain::transparent;
use dvt_state::ColdRewardsError;

/// An error checking the cold reward payment in a block's coinbase.
#[derive(Error, Debug)]
pub enum ColdRewardError {
    #[error("block has no coinbase transaction")]
    NoCoinbase,

    #[error("coinbase is missing the cold reward payment: expected {expected:?}")]
    MissingPayment { expected: transparent::Output },

    #[error("coinbase has the wrong cold reward payment: expected {expected:?}, got {actual:?}")]
    WrongPayment {
        expected: transparent::Output,
        actual: transparent::Output,
    },

    #[error("coinbase has {outputs} outputs, but no cold reward is due, so it must have 1 output")]
    UnearnedPayment { outputs: usize },

    #[error("coinbase template has {outputs} outputs, but the cold reward payment must follow a single miner output")]
    TemplateOutputs { outputs: usize },

    #[error("could not read the cold rewards index")]
    Index(#[from] ColdRewardsError),
}

impl ColdRewardError {
    /// Returns `true` if this error means the block breaks the cold reward rule.
    ///
    /// Other errors mean the check could not be completed,
    /// because of an index failure or node shutdown.
    /// The block might still be valid.
    ///
    /// Template errors come from block construction, not validation.
    pub fn is_invalid_block(&self) -> bool {
        !matches!(
            self,
            ColdRewardError::Index(_) | ColdRewardError::TemplateOutputs { .. }
        )
    }
}
