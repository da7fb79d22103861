//! Consensus-critical serialization.
//!
//! This module contains the consensus-critical serialization used to compute
//! transaction ids. Deserializing blocks and transactions is handled by the
//! block storage layer, not by this crate.

mod error;
mod write_dvt;

pub use error::SerializationError;
pub use write_dvt::WriteDvtExt;

use std::io;

/// Consensus-critical serialization for DeVault.
///
/// This trait provides a generic serialization for consensus-critical
/// formats, such as transactions and transaction ids. It is intended
/// for use only in consensus-critical contexts; in other contexts, such as
/// internal storage, it would be preferable to use Serde.
pub trait DvtSerialize: Sized {
    /// Write `self` to the given `writer` using the canonical format.
    ///
    /// This function has a `dvt_` prefix to alert the reader that the
    /// serialization in use is consensus-critical serialization, rather than
    /// some other kind of serialization.
    ///
    /// Notice that the error type is [`std::io::Error`]; this indicates that
    /// serialization MUST be infallible up to errors in the underlying writer.
    fn dvt_serialize<W: io::Write>(&self, writer: W) -> Result<(), io::Error>;

    /// Helper function to construct a vec to serialize the current struct into
    fn dvt_serialize_to_vec(&self) -> Result<Vec<u8>, io::Error> {
        let mut data = Vec::new();
        self.dvt_serialize(&mut data)?;
        Ok(data)
    }
}

/// Serialize a `Vec` as a compactsize number of items, then the items.
impl<T: DvtSerialize> DvtSerialize for Vec<T> {
    fn dvt_serialize<W: io::Write>(&self, mut writer: W) -> Result<(), io::Error> {
        writer.write_compactsize(self.len() as u64)?;
        for item in self {
            item.dvt_serialize(&mut writer)?;
        }
        Ok(())
    }
}
