//! LMDB-backed key-value namespace.

use std::fs;

use lmdb::{Database, DatabaseFlags, Environment, Transaction, WriteFlags};
use log::{debug, info};

use crate::error::{StoreError, StoreResult};
use crate::key_value::KeyValueStore;
use crate::local_db_config::StoreConfig;

const DB_NAME: &str = "akademix";

/// One LMDB environment holding the whole namespace in a single named database.
///
/// Every operation runs in its own transaction, so a read followed by a write
/// from the caller is not atomic.
pub struct AppDbState {
    env: Environment,
    db: Database,
    config: StoreConfig,
}

impl AppDbState {
    pub fn init(config: StoreConfig) -> StoreResult<Self> {
        let dir = config.db_dir();
        fs::create_dir_all(&dir)?;

        let env = Environment::new()
            .set_max_dbs(config.max_dbs)
            .set_map_size(config.map_size)
            .open(&dir)?;
        let db = env.create_db(Some(DB_NAME), DatabaseFlags::empty())?;

        info!("Opened LMDB environment at {}", dir.display());
        Ok(Self { env, db, config })
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Flushes to disk; the environment is released when `self` drops.
    pub fn close_database(self) -> StoreResult<()> {
        self.env.sync(true)?;
        info!("Closed LMDB environment at {}", self.config.db_dir().display());
        Ok(())
    }
}

impl KeyValueStore for AppDbState {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let txn = self.env.begin_ro_txn()?;
        let value = match txn.get(self.db, &key) {
            Ok(bytes) => Some(
                String::from_utf8(bytes.to_vec())
                    .map_err(|e| StoreError::Storage(format!("Invalid UTF-8 under '{key}': {e}")))?,
            ),
            Err(lmdb::Error::NotFound) => None,
            Err(e) => return Err(e.into()),
        };
        txn.commit()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut txn = self.env.begin_rw_txn()?;
        txn.put(self.db, &key, &value, WriteFlags::empty())?;
        txn.commit()?;
        debug!("Wrote {} bytes under '{}'", value.len(), key);
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<bool> {
        let mut txn = self.env.begin_rw_txn()?;
        let existed = match txn.del(self.db, &key, None) {
            Ok(()) => true,
            Err(lmdb::Error::NotFound) => false,
            Err(e) => return Err(e.into()),
        };
        txn.commit()?;
        Ok(existed)
    }

    fn clear(&self) -> StoreResult<()> {
        let mut txn = self.env.begin_rw_txn()?;
        txn.clear_db(self.db)?;
        txn.commit()?;
        info!("Cleared all records in {}", self.config.db_dir().display());
        Ok(())
    }
}
