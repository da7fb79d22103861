//! Transactions and transaction-related structures.

use std::io;

use byteorder::{LittleEndian, WriteBytesExt};

mod hash;


pub use hash::Hash;

use crate::{
    block,
    serialization::DvtSerialize,
    transparent::{self, CoinbaseData},
};

/// The transaction version used by [`Transaction::new_coinbase`] and
/// [`Transaction::new`].
pub const CURRENT_VERSION: u32 = 2;

/// A DeVault transaction.
///
/// A transaction is an encoded data structure that facilitates the transfer of
/// value between two public key addresses. Everything is designed to ensure
/// that transactions can be created, propagated on the network, validated, and
/// finally added to the global ledger of transactions (the blockchain).
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The transaction version.
    pub version: u32,
    /// The transparent inputs to the transaction.
    pub inputs: Vec<transparent::Input>,
    /// The transparent outputs from the transaction.
    pub outputs: Vec<transparent::Output>,
    /// The earliest time or block height that this transaction can be added to the
    /// chain.
    pub lock_time: u32,
}

impl Transaction {
    /// Returns a new transaction with `inputs` and `outputs`.
    pub fn new(inputs: Vec<transparent::Input>, outputs: Vec<transparent::Output>) -> Self {
        Transaction {
            version: CURRENT_VERSION,
            inputs,
            outputs,
            lock_time: 0,
        }
    }

    /// Returns a new coinbase transaction for `height`, paying `outputs`.
    pub fn new_coinbase(height: block::Height, outputs: Vec<transparent::Output>) -> Self {
        Transaction::new(
            vec![transparent::Input::Coinbase {
                height,
                data: CoinbaseData::new(Vec::new()),
                sequence: u32::MAX,
            }],
            outputs,
        )
    }

    /// Compute the hash (id) of this transaction.
    pub fn hash(&self) -> Hash {
        Hash::from(self)
    }

    /// Returns `true` if this transaction is a coinbase transaction.
    ///
    /// A coinbase transaction has exactly one input, and that input creates new coins.
    pub fn is_coinbase(&self) -> bool {
        self.inputs.len() == 1
            && matches!(
                self.inputs.first(),
                Some(transparent::Input::Coinbase { .. })
            )
    }

    /// Returns the outpoints spent by this transaction.
    pub fn spent_outpoints(&self) -> impl Iterator<Item = transparent::OutPoint> + '_ {
        self.inputs.iter().filter_map(transparent::Input::outpoint)
    }
}

impl DvtSerialize for Transaction {
    fn dvt_serialize<W: io::Write>(&self, mut writer: W) -> Result<(), io::Error> {
        writer.write_u32::<LittleEndian>(self.version)?;
        self.inputs.dvt_serialize(&mut writer)?;
        self.outputs.dvt_serialize(&mut writer)?;
        writer.write_u32::<LittleEndian>(self.lock_time)?;
        Ok(())
    }
}
