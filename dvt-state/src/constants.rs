//! Constants that impact cold reward storage.

/// The directory name used to distinguish the cold rewards database from other
/// node databases or flat files.
pub const COLD_REWARDS_DATABASE_KIND: &str = "cold_rewards";

/// The database format version, incremented each time the on-disk database
/// format changes.
///
/// Changes include:
/// - adding or deleting a column family, or
/// - changing a column family's key or value format.
pub const DATABASE_FORMAT_VERSION: u32 = 1;

/// The column family holding the reward index, keyed by outpoint.
pub const COLD_REWARD_BY_OUTPOINT: &str = "cold_reward_by_outpoint";

/// All the column families used by the cold rewards database.
pub const COLUMN_FAMILIES_IN_CODE: &[&str] = &[COLD_REWARD_BY_OUTPOINT];
