//! Index updates for connected blocks.

use std::sync::Arc;

use tracing::instrument;

use dvt_chain::{
    block::Height,
    transaction::Transaction,
    transparent::OutPoint,
};

use crate::{BoxError, ColdRewardsError, RewardCandidate, RewardStore};

use super::ColdRewards;

/// Provides the transactions of blocks in the best chain.
pub trait BlockSource {
    /// Returns the transactions of the best chain block at `height`, in block order.
    fn block_transactions(&self, height: Height) -> Result<Vec<Arc<Transaction>>, BoxError>;
}

impl<S, F> ColdRewards<S, F>
where
    S: RewardStore,
{
    /// Updates the reward index with the transactions of the block connected at `height`.
    ///
    /// Outputs spent by the block are removed from the index, then outputs
    /// created by the block with at least the minimum reward balance are added,
    /// eligible from `height`. Coinbase transactions are skipped.
    ///
    /// Each transaction's inputs are processed before its outputs, and
    /// transactions are processed in block order. So outputs created and spent
    /// in the same block are not left in the index.
    ///
    /// Returns `true` if the index was modified, or a modification was attempted.
    #[instrument(skip(self, transactions), fields(transactions = transactions.len()))]
    pub fn apply_block(
        &self,
        height: Height,
        transactions: &[Arc<Transaction>],
    ) -> Result<bool, ColdRewardsError> {
        let mut store = self.lock()?;
        let mut changed = false;

        let mut erased: u64 = 0;
        let mut inserted: u64 = 0;

        for transaction in transactions.iter().filter(|tx| !tx.is_coinbase()) {
            for outpoint in transaction.spent_outpoints() {
                let is_candidate = match store.contains(&outpoint) {
                    Ok(is_candidate) => is_candidate,
                    Err(error) => {
                        self.handle_store_error(error, "check spent output")?;
                        continue;
                    }
                };

                if !is_candidate {
                    continue;
                }

                changed = true;

                match store.erase(&outpoint) {
                    Ok(()) => {
                        debug!(%outpoint, "removed spent cold reward candidate");
                        erased += 1;
                    }
                    Err(error) => self.handle_store_error(error, "erase spent output")?,
                }
            }

            let hash = transaction.hash();

            for (index, output) in transaction.outputs.iter().enumerate() {
                if !self.params.is_candidate_value(output.value) {
                    continue;
                }

                changed = true;

                let candidate =
                    RewardCandidate::new(OutPoint::from_usize(hash, index), output.clone(), height);
                let outpoint = candidate.outpoint;

                match store.put(candidate) {
                    Ok(()) => {
                        debug!(
                            %outpoint,
                            value = ?output.value,
                            coins = output.value.whole_coins(),
                            "added cold reward candidate"
                        );
                        inserted += 1;
                    }
                    Err(error) => self.handle_store_error(error, "insert new output")?,
                }
            }
        }

        if changed {
            if let Err(error) = store.flush() {
                self.handle_store_error(error, "flush")?;
            }
        }

        metrics::counter!("state.cold_rewards.candidate.inserted.count").increment(inserted);
        metrics::counter!("state.cold_rewards.candidate.erased.count").increment(erased);

        Ok(changed)
    }

    /// Fetches the transactions of the block at `height` from `blocks`,
    /// then updates the index with them using [`ColdRewards::apply_block`].
    pub fn apply_block_from(
        &self,
        height: Height,
        blocks: &dyn BlockSource,
    ) -> Result<bool, ColdRewardsError> {
        let transactions = blocks
            .block_transactions(height)
            .map_err(|source| ColdRewardsError::BlockUnavailable { height, source })?;

        self.apply_block(height, &transactions)
    }
}
