//! Persistence layer
//!
//! Graphs are saved as JSON snapshots under namespaced keys
//! (`"<namespace>::<name>"`) in any [`KeyValueStore`]: an in-process
//! [`MemoryStore`] or a RocksDB-backed [`RocksDbStore`].

pub mod snapshot;
pub mod storage;

pub use snapshot::GraphSnapshot;
pub use storage::{KeyValueStore, MemoryStore, RocksDbStore, StorageError, StorageResult};

use crate::config::DbConfig;
use crate::graph::GraphStore;
use thiserror::Error;
use tracing::info;

/// Persistence errors
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Snapshot encoding error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no data path configured for on-disk storage")]
    NoDataPath,
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Saves and loads whole graphs by name
pub struct PersistenceManager<S: KeyValueStore> {
    store: S,
    namespace: String,
    default_name: String,
}

impl<S: KeyValueStore> PersistenceManager<S> {
    pub fn new(store: S, config: &DbConfig) -> Self {
        PersistenceManager {
            store,
            namespace: config.namespace.clone(),
            default_name: config.default_graph.clone(),
        }
    }

    /// Storage key for `name`, or for the default graph name
    pub fn key(&self, name: Option<&str>) -> String {
        format!("{}::{}", self.namespace, name.unwrap_or(&self.default_name))
    }

    /// Snapshot `graph` and store it, replacing any previous snapshot
    pub fn persist(&self, graph: &GraphStore, name: Option<&str>) -> PersistenceResult<()> {
        let key = self.key(name);
        let json = graph.to_json()?;
        self.store.set(&key, &json)?;
        info!(
            key = %key,
            vertices = graph.vertex_count(),
            edges = graph.edge_count(),
            "persisted graph"
        );
        Ok(())
    }

    /// Load a stored graph; `None` when nothing was stored under the name
    pub fn depersist(&self, name: Option<&str>) -> PersistenceResult<Option<GraphStore>> {
        let key = self.key(name);
        let Some(json) = self.store.get(&key)? else {
            info!(key = %key, "no stored graph");
            return Ok(None);
        };
        let graph = GraphStore::from_json(&json)?;
        info!(
            key = %key,
            vertices = graph.vertex_count(),
            edges = graph.edge_count(),
            "restored graph"
        );
        Ok(Some(graph))
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

impl PersistenceManager<MemoryStore> {
    pub fn in_memory(config: &DbConfig) -> Self {
        Self::new(MemoryStore::new(), config)
    }
}

impl PersistenceManager<RocksDbStore> {
    /// Open the RocksDB store at the configured data path
    pub fn open_rocksdb(config: &DbConfig) -> PersistenceResult<Self> {
        let path = config.data_path.as_ref().ok_or(PersistenceError::NoDataPath)?;
        let store = RocksDbStore::open(path)?;
        Ok(Self::new(store, config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{EdgeRecord, VertexRecord};

    fn graph() -> GraphStore {
        GraphStore::from_records(
            vec![VertexRecord::with_id(1), VertexRecord::with_id(2)],
            vec![EdgeRecord::new(1, 2, "knows")],
        )
    }

    #[test]
    fn test_keys() {
        let manager = PersistenceManager::in_memory(&DbConfig::default());
        assert_eq!(manager.key(None), "db::graph");
        assert_eq!(manager.key(Some("family")), "db::family");

        let config = DbConfig {
            namespace: "app".to_string(),
            default_graph: "main".to_string(),
            ..DbConfig::default()
        };
        assert_eq!(PersistenceManager::in_memory(&config).key(None), "app::main");
    }

    #[test]
    fn test_persist_and_depersist() {
        let manager = PersistenceManager::in_memory(&DbConfig::default());
        assert!(manager.depersist(None).unwrap().is_none());

        manager.persist(&graph(), None).unwrap();
        manager.persist(&GraphStore::new(), Some("empty")).unwrap();
        assert_eq!(manager.store().len(), 2);

        let restored = manager.depersist(None).unwrap().unwrap();
        assert_eq!(restored.vertex_count(), 2);
        assert_eq!(restored.edge_count(), 1);

        let empty = manager.depersist(Some("empty")).unwrap().unwrap();
        assert_eq!(empty.vertex_count(), 0);
    }

    #[test]
    fn test_corrupt_snapshot() {
        let manager = PersistenceManager::in_memory(&DbConfig::default());
        manager.store().set("db::graph", "{broken").unwrap();
        assert!(matches!(manager.depersist(None), Err(PersistenceError::Json(_))));
    }

    #[test]
    fn test_rocksdb_requires_data_path() {
        assert!(matches!(
            PersistenceManager::open_rocksdb(&DbConfig::default()),
            Err(PersistenceError::NoDataPath)
        ));
    }
}
