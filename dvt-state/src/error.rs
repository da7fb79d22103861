//! Error types for the cold rewards index.

use std::path::PathBuf;

use thiserror::Error;

use dvt_chain::{block::Height, transparent};

/// A boxed [`std::error::Error`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// An error from the cold rewards index or its store.
#[derive(Debug, Error)]
pub enum ColdRewardsError {
    /// The store could not be opened.
    #[error("could not open the cold rewards store at {path:?}: {source}")]
    StoreOpen {
        /// The database path.
        path: PathBuf,
        /// The underlying failure.
        source: BoxError,
    },

    /// Reading from the store failed, or a stored record could not be decoded.
    #[error("cold rewards store read failed: {0}")]
    StoreRead(BoxError),

    /// Writing to the store failed.
    #[error("cold rewards store write failed: {0}")]
    StoreWrite(BoxError),

    /// The outpoint has no record in the index.
    #[error("no cold reward candidate for outpoint {0}")]
    RecordNotFound(transparent::OutPoint),

    /// The block to index could not be read from block storage.
    #[error("could not read the block at {height:?} for cold reward indexing: {source}")]
    BlockUnavailable {
        /// The requested block height.
        height: Height,
        /// The underlying failure.
        source: BoxError,
    },

    /// The operation was interrupted because the node is shutting down.
    #[error("cold reward selection cancelled: the node is shutting down")]
    Cancelled,

    /// An earlier operation panicked while it was using the index.
    #[error("cold rewards index is unusable: an earlier operation panicked")]
    Poisoned,
}

impl ColdRewardsError {
    /// Returns `true` if this error is a store read or write failure.
    ///
    /// Store failures are subject to the configured
    /// [`StoreErrorPolicy`](crate::StoreErrorPolicy).
    pub fn is_store_failure(&self) -> bool {
        matches!(
            self,
            ColdRewardsError::StoreRead(_) | ColdRewardsError::StoreWrite(_)
        )
    }
}
