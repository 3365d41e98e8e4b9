//! Configuration for opening the on-device store.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub const DEFAULT_MAP_SIZE: usize = 10 * 1024 * 1024;
pub const DEFAULT_MAX_DBS: u32 = 1;
pub const DEFAULT_DB_NAME: &str = "akademix";

/// Settings for the LMDB environment backing [`AppDbState`](crate::local_db_state::AppDbState).
///
/// Only `name` is required in the JSON form:
///
/// ```rust
/// use akademix_core::local_db_config::StoreConfig;
///
/// let config = StoreConfig::from_json(r#"{"name":"feed"}"#)?;
/// assert_eq!(config.db_dir().to_str(), Some("feed.lmdb"));
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreConfig {
    /// Path prefix of the environment directory; `.lmdb` is appended.
    pub name: String,
    #[serde(default = "default_map_size")]
    pub map_size: usize,
    #[serde(default = "default_max_dbs")]
    pub max_dbs: u32,
}

fn default_map_size() -> usize {
    DEFAULT_MAP_SIZE
}

fn default_max_dbs() -> u32 {
    DEFAULT_MAX_DBS
}

impl StoreConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            map_size: DEFAULT_MAP_SIZE,
            max_dbs: DEFAULT_MAX_DBS,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn db_dir(&self) -> PathBuf {
        PathBuf::from(format!("{}.lmdb", self.name))
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DB_NAME)
    }
}
