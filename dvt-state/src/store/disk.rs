//! The RocksDB-backed reward candidate store.

use dvt_chain::{parameters::Network, transparent};

use crate::{
    constants::COLD_REWARD_BY_OUTPOINT,
    store::{
        disk_db::{DiskDb, DiskWriteBatch},
        disk_format::CandidateValue,
        CandidateCursor, RewardCandidate, RewardStore,
    },
    ColdRewardsError, Config,
};

/// A persistent reward index, stored in the `cold_reward_by_outpoint` column family.
///
/// Each `put` and `erase` is written to the database as its own batch,
/// so it is visible to the next read.
#[derive(Clone, Debug)]
pub struct DiskRewardStore {
    db: DiskDb,
}

impl DiskRewardStore {
    /// Opens or creates the reward index for `network`, as configured by `config`.
    pub fn open(config: &Config, network: Network) -> Result<Self, ColdRewardsError> {
        let db = DiskDb::new(config, network)?;

        Ok(DiskRewardStore { db })
    }

    /// Returns the path of the database files.
    pub fn path(&self) -> &std::path::Path {
        self.db.path()
    }

    /// Returns the network this index was opened for.
    pub fn network(&self) -> Network {
        self.db.network()
    }

    fn write_batch(
        &self,
        update: impl FnOnce(&mut DiskWriteBatch, rocksdb::ColumnFamilyRef<'_>),
    ) -> Result<(), ColdRewardsError> {
        let cf = self
            .db
            .cf_handle(COLD_REWARD_BY_OUTPOINT)
            .ok_or_else(|| {
                ColdRewardsError::StoreWrite(
                    format!("missing column family {COLD_REWARD_BY_OUTPOINT}").into(),
                )
            })?;

        let mut batch = DiskWriteBatch::new();
        update(&mut batch, cf);

        self.db.write(batch)
    }
}

impl RewardStore for DiskRewardStore {
    fn contains(&self, outpoint: &transparent::OutPoint) -> Result<bool, ColdRewardsError> {
        let cf = self.db.required_cf_handle(COLD_REWARD_BY_OUTPOINT)?;

        self.db.zs_contains(&cf, outpoint)
    }

    fn get(&self, outpoint: &transparent::OutPoint) -> Result<RewardCandidate, ColdRewardsError> {
        let cf = self.db.required_cf_handle(COLD_REWARD_BY_OUTPOINT)?;

        self.db
            .zs_get::<_, _, CandidateValue>(&cf, outpoint)?
            .map(|value| value.into_candidate(*outpoint))
            .ok_or(ColdRewardsError::RecordNotFound(*outpoint))
    }

    fn put(&mut self, candidate: RewardCandidate) -> Result<(), ColdRewardsError> {
        self.write_batch(|batch, cf| {
            batch.zs_insert(&cf, candidate.outpoint, CandidateValue::from(&candidate))
        })
    }

    fn erase(&mut self, outpoint: &transparent::OutPoint) -> Result<(), ColdRewardsError> {
        self.write_batch(|batch, cf| batch.zs_delete(&cf, outpoint))
    }

    fn flush(&mut self) -> Result<(), ColdRewardsError> {
        self.db.flush()
    }

    fn cursor(&self) -> CandidateCursor<'_> {
        let cf = match self.db.required_cf_handle(COLD_REWARD_BY_OUTPOINT) {
            Ok(cf) => cf,
            Err(error) => return Box::new(std::iter::once(Err::<RewardCandidate, _>(error))),
        };

        Box::new(
            self.db
                .zs_forward_iter::<_, transparent::OutPoint, CandidateValue>(&cf)
                .map(|item| item.map(|(outpoint, value)| value.into_candidate(outpoint))),
        )
    }
}
