//! In-process chunk store

use super::{ChunkRecord, ChunkStore, KeyCursor, ScanScope};
use crate::error::StoreResult;
use crate::key::ChunkCoordinate;
use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::trace;

/// Chunk store backed by an ordered map.
///
/// Clones share the same map. Contents are lost when the last clone drops.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Arc<RwLock<BTreeMap<ChunkCoordinate, Bytes>>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored chunks
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Whether the store holds no chunks
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

#[async_trait]
impl ChunkStore for MemoryStore {
    async fn put(&self, record: ChunkRecord) -> StoreResult<()> {
        trace!("Storing {} bytes at {}", record.data.len(), record.key);
        self.records.write().insert(record.key, record.data);
        Ok(())
    }

    async fn get(&self, key: ChunkCoordinate) -> StoreResult<Option<ChunkRecord>> {
        Ok(self
            .records
            .read()
            .get(&key)
            .map(|data| ChunkRecord::new(key, data.clone())))
    }

    async fn delete(&self, key: ChunkCoordinate) -> StoreResult<bool> {
        Ok(self.records.write().remove(&key).is_some())
    }

    async fn index_scan(&self, scope: ScanScope) -> StoreResult<KeyCursor> {
        let records = self.records.read();
        let keys = match scope {
            ScanScope::All => records.keys().copied().collect(),
            ScanScope::World(world_id) => {
                let start = ChunkCoordinate::new(world_id, i32::MIN, i32::MIN);
                let end = ChunkCoordinate::new(world_id, i32::MAX, i32::MAX);
                records.range(start..=end).map(|(key, _)| *key).collect()
            }
        };
        Ok(KeyCursor::new(keys))
    }
}
