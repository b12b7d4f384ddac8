//! Key-value backends for persisted graph snapshots

use rocksdb::{ColumnFamilyDescriptor, Options, DB};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, RwLock};
use thiserror::Error;
use tracing::{debug, info};

const SNAPSHOT_CF: &str = "snapshots";

/// Storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    /// RocksDB error
    #[error("RocksDB error: {0}")]
    RocksDb(#[from] rocksdb::Error),

    /// Stored bytes are not valid UTF-8
    #[error("stored value is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("column family error: {0}")]
    ColumnFamily(String),

    #[error("storage lock poisoned")]
    LockPoisoned,
}

pub type StorageResult<T> = Result<T, StorageError>;

/// A string-to-string store
pub trait KeyValueStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;
}

/// Process-local store, lost on exit
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let entries = self.entries.read().map_err(|_| StorageError::LockPoisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut entries = self.entries.write().map_err(|_| StorageError::LockPoisoned)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// RocksDB-backed store
pub struct RocksDbStore {
    db: Arc<DB>,
}

impl RocksDbStore {
    /// Open or create a store at `path`
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        info!("Opening snapshot storage at: {:?}", path.as_ref());

        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);
        opts.set_compression_type(rocksdb::DBCompressionType::Lz4);
        opts.set_wal_recovery_mode(rocksdb::DBRecoveryMode::PointInTime);

        let cf_descriptors = vec![
            ColumnFamilyDescriptor::new("default", Options::default()),
            ColumnFamilyDescriptor::new(SNAPSHOT_CF, Self::snapshot_cf_options()),
        ];
        let db = DB::open_cf_descriptors(&opts, path.as_ref(), cf_descriptors)?;

        info!("Snapshot storage opened successfully");
        Ok(Self { db: Arc::new(db) })
    }

    /// Snapshots are large JSON blobs, compress them harder
    fn snapshot_cf_options() -> Options {
        let mut opts = Options::default();
        opts.set_compression_type(rocksdb::DBCompressionType::Zstd);
        opts
    }

    /// Flush memtables to disk
    pub fn flush(&self) -> StorageResult<()> {
        self.db.flush()?;
        Ok(())
    }
}

impl KeyValueStore for RocksDbStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let cf = self
            .db
            .cf_handle(SNAPSHOT_CF)
            .ok_or_else(|| StorageError::ColumnFamily(SNAPSHOT_CF.to_string()))?;
        match self.db.get_cf(&cf, key.as_bytes())? {
            Some(bytes) => Ok(Some(String::from_utf8(bytes)?)),
            None => Ok(None),
        }
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let cf = self
            .db
            .cf_handle(SNAPSHOT_CF)
            .ok_or_else(|| StorageError::ColumnFamily(SNAPSHOT_CF.to_string()))?;
        self.db.put_cf(&cf, key.as_bytes(), value.as_bytes())?;
        debug!(key, bytes = value.len(), "stored snapshot");
        Ok(())
    }
}
