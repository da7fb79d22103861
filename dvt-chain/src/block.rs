//! Blocks and block-related structures (heights, coinbase access).

mod height;

#[cfg(test)]
mod tests;

use std::{fmt, sync::Arc};

pub use height::{Height, HeightDiff};

use crate::{transaction::Transaction, transparent};

/// A DeVault block, as seen by the cold rewards consensus rule.
///
/// Block headers are validated and stored by the block storage layer,
/// so only the transactions are kept here.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// The block transactions.
    ///
    /// The first transaction must be the coinbase transaction.
    pub transactions: Vec<Arc<Transaction>>,
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut fmter = f.debug_struct("Block");
        if let Some(height) = self.coinbase_height() {
            fmter.field("height", &height);
        }

        fmter
            .field("transactions", &self.transactions.len())
            .finish()
    }
}

impl Block {
    /// Returns the coinbase transaction, if the first transaction is a coinbase.
    pub fn coinbase(&self) -> Option<&Arc<Transaction>> {
        self.transactions.first().filter(|tx| tx.is_coinbase())
    }

    /// Return the block height reported in the coinbase transaction, if any.
    pub fn coinbase_height(&self) -> Option<Height> {
        self.transactions
            .first()
            .and_then(|tx| tx.inputs.first())
            .and_then(|input| match input {
                transparent::Input::Coinbase { ref height, .. } => Some(*height),
                _ => None,
            })
    }
}

impl From<Vec<Arc<Transaction>>> for Block {
    fn from(transactions: Vec<Arc<Transaction>>) -> Self {
        Block { transactions }
    }
}
