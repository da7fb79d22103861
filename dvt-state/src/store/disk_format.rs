//! Serialization formats for the reward index.
//!
//! # Correctness
//!
//! [`crate::constants::DATABASE_FORMAT_VERSION`] must be incremented each time
//! the database format (column, serialization, etc) changes.

use thiserror::Error;

use dvt_chain::{
    amount::{self, Amount, NonNegative},
    block::Height,
    transaction,
    transparent::{self, Script},
};


/// The number of bytes used to store a [`transparent::OutPoint`] key.
///
/// The consensus serialization of the outpoint: 32 bytes of transaction hash,
/// then a 4 byte little-endian output index.
pub const OUTPOINT_DISK_BYTES: usize = 32 + 4;

/// The number of bytes used to store an eligibility [`Height`].
pub const HEIGHT_DISK_BYTES: usize = 4;

/// The number of bytes used to store an output value.
pub const AMOUNT_DISK_BYTES: usize = 8;

/// An error decoding a stored record.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum DiskFormatError {
    /// The record has the wrong length.
    #[error("stored {type_name} has {actual} bytes, expected {expected}")]
    Length {
        /// The type being decoded.
        type_name: &'static str,
        /// The expected length, or minimum length for variable-length types.
        expected: usize,
        /// The stored length.
        actual: usize,
    },

    /// The stored value is not a valid output amount.
    #[error("stored output value is invalid: {0}")]
    Amount(#[from] amount::Error),
}

/// Helper type for writing types to disk as raw bytes.
/// Also used to convert key types to raw bytes for disk lookups.
pub trait IntoDisk {
    /// The type used to write bytes to disk,
    /// and compare a value as a key to on-disk keys.
    type Bytes: AsRef<[u8]>;

    /// Converts the current type into serialized raw bytes.
    fn as_bytes(&self) -> Self::Bytes;
}

/// Helper type for reading types from disk as raw bytes.
pub trait FromDisk: Sized {
    /// Converts raw disk bytes back into the deserialized type.
    ///
    /// Returns an error if the bytes are not a valid encoding, which means
    /// the database is corrupt.
    fn from_bytes(bytes: impl AsRef<[u8]>) -> Result<Self, DiskFormatError>;
}

// Generic serialization impls

impl<'a, T> IntoDisk for &'a T
where
    T: IntoDisk,
{
    type Bytes = T::Bytes;

    fn as_bytes(&self) -> Self::Bytes {
        T::as_bytes(*self)
    }
}

fn check_len(
    type_name: &'static str,
    bytes: &[u8],
    expected: usize,
) -> Result<(), DiskFormatError> {
    if bytes.len() == expected {
        Ok(())
    } else {
        Err(DiskFormatError::Length {
            type_name,
            expected,
            actual: bytes.len(),
        })
    }
}

// Key format

impl IntoDisk for transparent::OutPoint {
    type Bytes = [u8; OUTPOINT_DISK_BYTES];

    fn as_bytes(&self) -> Self::Bytes {
        let mut bytes = [0; OUTPOINT_DISK_BYTES];

        // Same bytes as the consensus serialization, so the index iterates
        // in serialized outpoint order.
        bytes[..32].copy_from_slice(&self.hash.0);
        bytes[32..].copy_from_slice(&self.index.to_le_bytes());

        bytes
    }
}

impl FromDisk for transparent::OutPoint {
    fn from_bytes(bytes: impl AsRef<[u8]>) -> Result<Self, DiskFormatError> {
        let bytes = bytes.as_ref();
        check_len("OutPoint", bytes, OUTPOINT_DISK_BYTES)?;

        let (hash, index) = bytes.split_at(32);

        Ok(transparent::OutPoint {
            hash: transaction::Hash(hash.try_into().expect("length is checked above")),
            index: u32::from_le_bytes(index.try_into().expect("length is checked above")),
        })
    }
}

// Value format

impl IntoDisk for Height {
    type Bytes = [u8; HEIGHT_DISK_BYTES];

    fn as_bytes(&self) -> Self::Bytes {
        self.0.to_be_bytes()
    }
}

impl FromDisk for Height {
    fn from_bytes(bytes: impl AsRef<[u8]>) -> Result<Self, DiskFormatError> {
        let bytes = bytes.as_ref();
        check_len("Height", bytes, HEIGHT_DISK_BYTES)?;

        Ok(Height(u32::from_be_bytes(
            bytes.try_into().expect("length is checked above"),
        )))
    }
}

impl IntoDisk for Amount<NonNegative> {
    type Bytes = [u8; AMOUNT_DISK_BYTES];

    fn as_bytes(&self) -> Self::Bytes {
        self.to_bytes()
    }
}

impl FromDisk for Amount<NonNegative> {
    fn from_bytes(bytes: impl AsRef<[u8]>) -> Result<Self, DiskFormatError> {
        let bytes = bytes.as_ref();
        check_len("Amount", bytes, AMOUNT_DISK_BYTES)?;

        Ok(Amount::from_bytes(
            bytes.try_into().expect("length is checked above"),
        )?)
    }
}

/// The stored value of a reward candidate: everything except its outpoint key.
///
/// Stored as the eligibility height, the output value, then the raw lock script bytes.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CandidateValue {
    /// The candidate's eligibility height.
    pub eligible_height: Height,

    /// The indexed output.
    pub output: transparent::Output,
}

impl IntoDisk for CandidateValue {
    type Bytes = Vec<u8>;

    fn as_bytes(&self) -> Self::Bytes {
        let script = self.output.lock_script.as_raw_bytes();

        let mut bytes =
            Vec::with_capacity(HEIGHT_DISK_BYTES + AMOUNT_DISK_BYTES + script.len());
        bytes.extend_from_slice(&self.eligible_height.as_bytes());
        bytes.extend_from_slice(&self.output.value.as_bytes());
        bytes.extend_from_slice(script);

        bytes
    }
}

impl FromDisk for CandidateValue {
    fn from_bytes(bytes: impl AsRef<[u8]>) -> Result<Self, DiskFormatError> {
        let bytes = bytes.as_ref();
        let fixed_len = HEIGHT_DISK_BYTES + AMOUNT_DISK_BYTES;

        if bytes.len() < fixed_len {
            return Err(DiskFormatError::Length {
                type_name: "CandidateValue",
                expected: fixed_len,
                actual: bytes.len(),
            });
        }

        let (height, rest) = bytes.split_at(HEIGHT_DISK_BYTES);
        let (value, script) = rest.split_at(AMOUNT_DISK_BYTES);

        Ok(CandidateValue {
            eligible_height: Height::from_bytes(height)?,
            output: transparent::Output {
                value: <Amount<NonNegative> as FromDisk>::from_bytes(value)?,
                lock_script: Script::new(script),
            },
        })
    }
}

impl From<&crate::RewardCandidate> for CandidateValue {
    fn from(candidate: &crate::RewardCandidate) -> Self {
        CandidateValue {
            eligible_height: candidate.eligible_height,
            output: candidate.output.clone(),
        }
    }
}

impl CandidateValue {
    /// Returns the full candidate stored under `outpoint`.
    pub fn into_candidate(self, outpoint: transparent::OutPoint) -> crate::RewardCandidate {
        crate::RewardCandidate {
            outpoint,
            output: self.output,
            eligible_height: self.eligible_height,
        }
    }
}
