//! The reward candidate store: an ordered index of outputs that can earn cold rewards.
//!
//! Stores iterate candidates in the byte order of their serialized outpoint keys.
//! Every node must use the same order, because reward selection breaks ties
//! by taking the first candidate in iteration order.

use dvt_chain::{block::Height, transparent};

use crate::ColdRewardsError;

mod disk;
pub(crate) mod disk_db;
pub mod disk_format;
mod memory;


pub use disk::DiskRewardStore;
pub use memory::MemoryRewardStore;

/// An unspent output that is tracked by the reward index.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct RewardCandidate {
    /// The output reference, which is also the index key.
    pub outpoint: transparent::OutPoint,

    /// The indexed output: its value and lock script.
    pub output: transparent::Output,

    /// The height the output was created at, or the height it was last rewarded at.
    ///
    /// Reward age is measured from this height.
    pub eligible_height: Height,
}

impl RewardCandidate {
    /// Returns a new candidate for `output`.
    pub fn new(
        outpoint: transparent::OutPoint,
        output: transparent::Output,
        eligible_height: Height,
    ) -> Self {
        Self {
            outpoint,
            output,
            eligible_height,
        }
    }
}

/// An iterator over every candidate in a store, in canonical key order.
pub type CandidateCursor<'s> =
    Box<dyn Iterator<Item = Result<RewardCandidate, ColdRewardsError>> + 's>;

/// A persistent ordered key-value index from outpoints to reward candidates.
///
/// Read failures are reported as [`ColdRewardsError::StoreRead`], and
/// write failures as [`ColdRewardsError::StoreWrite`].
pub trait RewardStore {
    /// Returns `true` if `outpoint` is in the index.
    fn contains(&self, outpoint: &transparent::OutPoint) -> Result<bool, ColdRewardsError>;

    /// Returns the candidate for `outpoint`.
    ///
    /// Returns [`ColdRewardsError::RecordNotFound`] if it is not in the index.
    fn get(&self, outpoint: &transparent::OutPoint) -> Result<RewardCandidate, ColdRewardsError>;

    /// Inserts `candidate`, keyed by its outpoint, overwriting any existing record.
    ///
    /// The write is visible to later reads immediately.
    fn put(&mut self, candidate: RewardCandidate) -> Result<(), ColdRewardsError>;

    /// Removes `outpoint` from the index. Removing a missing outpoint is not an error.
    fn erase(&mut self, outpoint: &transparent::OutPoint) -> Result<(), ColdRewardsError>;

    /// Makes previous writes durable.
    fn flush(&mut self) -> Result<(), ColdRewardsError>;

    /// Returns a new iterator over all candidates, ordered by their canonical key bytes.
    ///
    /// Each call starts a fresh traversal from the first key.
    fn cursor(&self) -> CandidateCursor<'_>;

    /// Returns the number of candidates in the index.
    fn len(&self) -> Result<usize, ColdRewardsError> {
        self.cursor()
            .try_fold(0, |count, candidate| candidate.map(|_| count + 1))
    }

    /// Returns `true` if the index has no candidates.
    fn is_empty(&self) -> Result<bool, ColdRewardsError> {
        match self.cursor().next() {
            None => Ok(true),
            Some(candidate) => candidate.map(|_| false),
        }
    }
}
