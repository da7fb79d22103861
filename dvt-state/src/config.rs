//! Cold rewards storage configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use dvt_chain::parameters::Network;

use crate::constants::{COLD_REWARDS_DATABASE_KIND, DATABASE_FORMAT_VERSION};

/// What the cold rewards engine does when an index update fails in the store.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreErrorPolicy {
    /// Abort the operation and return the error to the caller.
    #[default]
    Propagate,

    /// Log a warning and keep processing the rest of the operation.
    ///
    /// Nodes using this policy can silently diverge from the rest of the network
    /// after a store failure.
    LogAndContinue,
}

/// Configuration for the cold rewards index.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct Config {
    /// The root directory for storing cached data.
    ///
    /// The reward index can be rebuilt from the chain, so it is stored with
    /// other cached data. Each network has a separate index, stored in
    /// `cold_rewards/v1/<network>` under this directory.
    ///
    /// The default directory is platform dependent, based on
    /// [`dirs::cache_dir()`](https://docs.rs/dirs/latest/dirs/fn.cache_dir.html):
    ///
    /// |Platform | Value                                       | Example                          |
    /// | ------- | ------------------------------------------- | -------------------------------- |
    /// | Linux   | `$XDG_CACHE_HOME/dvt` or `$HOME/.cache/dvt` | /home/alice/.cache/dvt           |
    /// | macOS   | `$HOME/Library/Caches/dvt`                  | /Users/Alice/Library/Caches/dvt  |
    /// | Windows | `{FOLDERID_LocalAppData}\dvt`               | C:\Users\Alice\AppData\Local\dvt |
    /// | Other   | `std::env::current_dir()/cache/dvt`         |                                  |
    pub cache_dir: PathBuf,

    /// Whether to use an ephemeral database.
    ///
    /// Ephemeral databases are stored in a temporary directory,
    /// which is deleted when the store is dropped.
    ///
    /// Set to `false` by default. If this is set to `true`, [`cache_dir`] is ignored.
    ///
    /// [`cache_dir`]: struct.Config.html#structfield.cache_dir
    pub ephemeral: bool,

    /// What to do when a reward index update fails in the store.
    ///
    /// Reading the index during reward selection always fails the selection,
    /// regardless of this setting.
    pub store_error_policy: StoreErrorPolicy,
}

impl Config {
    /// Returns the path of the reward index database for `network`,
    /// relative to `root`.
    pub fn db_path_in(root: impl Into<PathBuf>, network: Network) -> PathBuf {
        root.into()
            .join(COLD_REWARDS_DATABASE_KIND)
            .join(format!("v{DATABASE_FORMAT_VERSION}"))
            .join(network.lowercase_name())
    }

    /// Returns the path of the persistent reward index database for `network`.
    ///
    /// Ephemeral databases use a temporary directory instead.
    pub fn db_path(&self, network: Network) -> PathBuf {
        Self::db_path_in(&self.cache_dir, network)
    }

    /// Construct a config for an ephemeral database
    pub fn ephemeral() -> Self {
        Config {
            ephemeral: true,
            ..Config::default()
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let cache_dir = dirs::cache_dir()
            .unwrap_or_else(|| std::env::current_dir().unwrap_or_default().join("cache"))
            .join("dvt");

        Self {
            cache_dir,
            ephemeral: false,
            store_error_policy: StoreErrorPolicy::default(),
        }
    }
}
