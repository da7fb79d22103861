//! An in-memory reward candidate store, for tests and short-lived nodes.

use std::collections::BTreeMap;

use dvt_chain::transparent;

use crate::{
    store::{
        disk_format::{IntoDisk, OUTPOINT_DISK_BYTES},
        CandidateCursor, RewardCandidate, RewardStore,
    },
    ColdRewardsError,
};

/// A reward index held in memory.
///
/// Candidates are ordered by the same key bytes as [`DiskRewardStore`](crate::DiskRewardStore),
/// so both stores select the same rewards from the same contents.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct MemoryRewardStore {
    candidates: BTreeMap<[u8; OUTPOINT_DISK_BYTES], RewardCandidate>,
}

impl MemoryRewardStore {
    /// Returns a new empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl FromIterator<RewardCandidate> for MemoryRewardStore {
    fn from_iter<I: IntoIterator<Item = RewardCandidate>>(iter: I) -> Self {
        MemoryRewardStore {
            candidates: iter
                .into_iter()
                .map(|candidate| (candidate.outpoint.as_bytes(), candidate))
                .collect(),
        }
    }
}

impl RewardStore for MemoryRewardStore {
    fn contains(&self, outpoint: &transparent::OutPoint) -> Result<bool, ColdRewardsError> {
        Ok(self.candidates.contains_key(&outpoint.as_bytes()))
    }

    fn get(&self, outpoint: &transparent::OutPoint) -> Result<RewardCandidate, ColdRewardsError> {
        self.candidates
            .get(&outpoint.as_bytes())
            .cloned()
            .ok_or(ColdRewardsError::RecordNotFound(*outpoint))
    }

    fn put(&mut self, candidate: RewardCandidate) -> Result<(), ColdRewardsError> {
        self.candidates
            .insert(candidate.outpoint.as_bytes(), candidate);

        Ok(())
    }

    fn erase(&mut self, outpoint: &transparent::OutPoint) -> Result<(), ColdRewardsError> {
        self.candidates.remove(&outpoint.as_bytes());

        Ok(())
    }

    fn flush(&mut self) -> Result<(), ColdRewardsError> {
        Ok(())
    }

    fn cursor(&self) -> CandidateCursor<'_> {
        Box::new(self.candidates.values().cloned().map(Ok))
    }

    fn len(&self) -> Result<usize, ColdRewardsError> {
        Ok(self.candidates.len())
    }
}
