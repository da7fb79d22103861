//! Provides low-level access to RocksDB using reward index types.
//!
//! This module makes sure that:
//! - all disk writes happen inside a RocksDB transaction
//!   ([`rocksdb::WriteBatch`]), and
//! - format-specific invariants are maintained.
//!
//! # Correctness
//!
//! [`crate::constants::DATABASE_FORMAT_VERSION`] must be incremented
//! each time the database format (column, serialization, etc) changes.

use std::{fmt::Debug, path::Path, sync::Arc};

use rocksdb::ColumnFamilyDescriptor;
use tempfile::TempDir;

use dvt_chain::parameters::Network;

use crate::{
    constants::{COLD_REWARDS_DATABASE_KIND, COLUMN_FAMILIES_IN_CODE, DATABASE_FORMAT_VERSION},
    store::disk_format::{FromDisk, IntoDisk},
    ColdRewardsError, Config,
};

/// The [`rocksdb::ThreadMode`] used by the database.
pub type DBThreadMode = rocksdb::SingleThreaded;

/// The [`rocksdb`] database type, including thread mode.
pub type DB = rocksdb::DBWithThreadMode<DBThreadMode>;

/// Wrapper struct to ensure low-level database access goes through the correct API.
///
/// `rocksdb` allows concurrent writes through a shared reference,
/// so database instances are cloneable. When the final clone is dropped,
/// the database is closed, and any ephemeral files are deleted.
#[derive(Clone, Debug)]
pub struct DiskDb {
    /// The configured network for this database.
    network: Network,

    /// The shared inner RocksDB database.
    ///
    /// Declared before `ephemeral_dir`, so the database is closed before its
    /// temporary directory is deleted.
    db: Arc<DB>,

    /// The temporary directory holding an ephemeral database.
    ///
    /// `None` for persistent databases.
    ephemeral_dir: Option<Arc<TempDir>>,
}

/// Wrapper struct to ensure low-level database writes go through the correct API.
///
/// [`rocksdb::WriteBatch`] is a batched set of database updates,
/// which must be written to the database using `DiskDb::write(batch)`.
#[must_use = "batches must be written to the database"]
#[derive(Default)]
pub struct DiskWriteBatch {
    /// The inner RocksDB write batch.
    batch: rocksdb::WriteBatch,
}

impl Debug for DiskWriteBatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiskWriteBatch")
            .field("batch", &format!("{} bytes", self.batch.size_in_bytes()))
            .finish()
    }
}

impl DiskWriteBatch {
    /// Creates and returns a new transactional batch write.
    pub fn new() -> Self {
        DiskWriteBatch::default()
    }

    /// Serialize and insert the given key and value into a rocksdb column family,
    /// overwriting any existing `value` for `key`.
    pub fn zs_insert<C, K, V>(&mut self, cf: &C, key: K, value: V)
    where
        C: rocksdb::AsColumnFamilyRef,
        K: IntoDisk + Debug,
        V: IntoDisk,
    {
        let key_bytes = key.as_bytes();
        let value_bytes = value.as_bytes();
        self.batch.put_cf(cf, key_bytes, value_bytes);
    }

    /// Remove the given key from a rocksdb column family, if it exists.
    pub fn zs_delete<C, K>(&mut self, cf: &C, key: K)
    where
        C: rocksdb::AsColumnFamilyRef,
        K: IntoDisk + Debug,
    {
        let key_bytes = key.as_bytes();
        self.batch.delete_cf(cf, key_bytes);
    }
}

impl DiskDb {
    /// The size of the in-memory write buffer, in megabytes.
    const MEMTABLE_RAM_CACHE_MEGABYTES: usize = 16;

    /// Opens or creates the reward index database for `network`,
    /// with the reward index column families.
    ///
    /// Ephemeral databases are created in a new temporary directory.
    pub fn new(config: &Config, network: Network) -> Result<DiskDb, ColdRewardsError> {
        let (path, ephemeral_dir) = if config.ephemeral {
            let dir = tempfile::Builder::new()
                .prefix(&format!(
                    "dvt-{COLD_REWARDS_DATABASE_KIND}-v{DATABASE_FORMAT_VERSION}-{network}-"
                ))
                .tempdir()
                .map_err(|source| ColdRewardsError::StoreOpen {
                    path: std::env::temp_dir(),
                    source: source.into(),
                })?;

            (dir.path().to_path_buf(), Some(Arc::new(dir)))
        } else {
            (config.db_path(network), None)
        };

        let db_options = DiskDb::options();
        let column_families = COLUMN_FAMILIES_IN_CODE
            .iter()
            .map(|cf_name| ColumnFamilyDescriptor::new(*cf_name, db_options.clone()));

        match DB::open_cf_descriptors(&db_options, &path, column_families) {
            Ok(db) => {
                info!(
                    ephemeral = config.ephemeral,
                    "opened cold rewards index at {}",
                    path.display()
                );

                Ok(DiskDb {
                    network,
                    db: Arc::new(db),
                    ephemeral_dir,
                })
            }
            Err(source) => Err(ColdRewardsError::StoreOpen {
                path,
                source: source.into(),
            }),
        }
    }

    /// Returns the configured network for this database.
    pub fn network(&self) -> Network {
        self.network
    }

    /// Returns the `Path` where the files used by this database are located.
    pub fn path(&self) -> &Path {
        self.db.path()
    }

    /// Returns `true` if this database is deleted when it is dropped.
    pub fn is_ephemeral(&self) -> bool {
        self.ephemeral_dir.is_some()
    }

    /// Returns the column family handle for `cf_name`.
    pub fn cf_handle(&self, cf_name: &str) -> Option<rocksdb::ColumnFamilyRef<'_>> {
        self.db.cf_handle(cf_name)
    }

    /// Returns the column family handle for `cf_name`, or a read error if it is missing.
    pub fn required_cf_handle(
        &self,
        cf_name: &'static str,
    ) -> Result<rocksdb::ColumnFamilyRef<'_>, ColdRewardsError> {
        self.cf_handle(cf_name)
            .ok_or_else(|| ColdRewardsError::StoreRead(format!("missing column family {cf_name}").into()))
    }

    // Read methods

    /// Returns the value for `key` in the rocksdb column family `cf`, if present.
    pub fn zs_get<C, K, V>(&self, cf: &C, key: &K) -> Result<Option<V>, ColdRewardsError>
    where
        C: rocksdb::AsColumnFamilyRef,
        K: IntoDisk,
        V: FromDisk,
    {
        let key_bytes = key.as_bytes();

        // We use `get_pinned_cf` to avoid taking ownership of the serialized
        // value, because we're going to deserialize it anyways, which avoids an
        // extra copy
        let value_bytes = self
            .db
            .get_pinned_cf(cf, key_bytes)
            .map_err(|e| ColdRewardsError::StoreRead(e.into()))?;

        value_bytes
            .map(V::from_bytes)
            .transpose()
            .map_err(|e| ColdRewardsError::StoreRead(e.into()))
    }

    /// Returns `true` if the rocksdb column family `cf` contains `key`.
    pub fn zs_contains<C, K>(&self, cf: &C, key: &K) -> Result<bool, ColdRewardsError>
    where
        C: rocksdb::AsColumnFamilyRef,
        K: IntoDisk,
    {
        let key_bytes = key.as_bytes();

        // We use `get_pinned_cf` to avoid taking ownership of the serialized
        // value, because we don't use the value at all. This avoids an extra copy.
        self.db
            .get_pinned_cf(cf, key_bytes)
            .map(|value| value.is_some())
            .map_err(|e| ColdRewardsError::StoreRead(e.into()))
    }

    /// Returns a forward iterator over all the items in `cf`.
    ///
    /// RocksDB iterators are ordered by increasing key bytes.
    /// Each item is decoded as it is read, and read or decoding failures
    /// are returned as [`ColdRewardsError::StoreRead`].
    pub fn zs_forward_iter<C, K, V>(
        &self,
        cf: &C,
    ) -> impl Iterator<Item = Result<(K, V), ColdRewardsError>> + '_
    where
        C: rocksdb::AsColumnFamilyRef,
        K: FromDisk,
        V: FromDisk,
    {
        self.db
            .iterator_cf(cf, rocksdb::IteratorMode::Start)
            .map(|result| {
                let (key, value) = result.map_err(|e| ColdRewardsError::StoreRead(e.into()))?;

                let key = K::from_bytes(key).map_err(|e| ColdRewardsError::StoreRead(e.into()))?;
                let value =
                    V::from_bytes(value).map_err(|e| ColdRewardsError::StoreRead(e.into()))?;

                Ok((key, value))
            })
    }

    // Write methods

    /// Writes `batch` to the database.
    pub fn write(&self, batch: DiskWriteBatch) -> Result<(), ColdRewardsError> {
        self.db
            .write(batch.batch)
            .map_err(|e| ColdRewardsError::StoreWrite(e.into()))
    }

    /// Flushes the in-memory write buffers to disk.
    pub fn flush(&self) -> Result<(), ColdRewardsError> {
        self.db
            .flush()
            .map_err(|e| ColdRewardsError::StoreWrite(e.into()))
    }

    // Private methods

    /// Returns the database options for the reward index database.
    fn options() -> rocksdb::Options {
        let mut opts = rocksdb::Options::default();
        let mut block_based_opts = rocksdb::BlockBasedOptions::default();

        const ONE_MEGABYTE: usize = 1024 * 1024;

        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        // Use the recommended Ribbon filter setting for all column families.
        block_based_opts.set_ribbon_filter(9.9);

        // Use the recommended LZ4 compression type.
        //
        // https://github.com/facebook/rocksdb/wiki/Compression#configuration
        opts.set_compression_type(rocksdb::DBCompressionType::Lz4);

        // Tune level-style database file compaction.
        opts.optimize_level_style_compaction(Self::MEMTABLE_RAM_CACHE_MEGABYTES * ONE_MEGABYTE);

        // Set the block-based options
        opts.set_block_based_table_factory(&block_based_opts);

        opts
    }
}

impl Drop for DiskDb {
    fn drop(&mut self) {
        // Only the last clone closes the database.
        if Arc::strong_count(&self.db) > 1 {
            return;
        }

        let path = self.path().to_path_buf();

        if let Err(error) = self.db.flush() {
            info!(
                ?error,
                ?path,
                "unexpected error flushing cold rewards index to disk during shutdown"
            );
        }

        if self.is_ephemeral() {
            debug!(?path, "removing temporary cold rewards index files");
        }
    }
}
