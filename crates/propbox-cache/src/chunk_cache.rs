//! Per-chunk prop cache

use crate::config::CacheConfig;
use crate::error::{CacheError, CacheResult};
use crate::key::{ChunkCoordinate, ChunkPosition};
use crate::stats::{ChunkCacheStats, ChunkCacheStatsSnapshot};
use crate::store::{ChunkRecord, ChunkStore, DiskStore, MemoryStore, ScanScope};
use bytes::Bytes;
use propbox_formats::{Prop, hash_props, pack, pack_props, unpack, unpack_props};
use tracing::{debug, trace};

/// A chunk read back from the cache
#[derive(Debug, Clone, PartialEq)]
pub struct CachedChunk {
    /// Batch hash of `props`
    pub hash: u32,
    /// Props in stored order
    pub props: Vec<Prop>,
}

/// Persistent cache of prop packs, one per chunk
///
/// Each chunk is stored as a single native-order prop pack. Reads decode the
/// pack and compute its batch hash; a stored entry that fails to decode is
/// reported as an error rather than a miss.
#[derive(Debug)]
pub struct ChunkCache<S: ChunkStore = DiskStore> {
    store: S,
    stats: ChunkCacheStats,
}

impl ChunkCache<DiskStore> {
    /// Open the on-disk cache described by `config`, provisioning it if needed.
    pub async fn open(config: CacheConfig) -> CacheResult<Self> {
        config.validate().map_err(CacheError::InvalidConfiguration)?;

        let store = DiskStore::from_config(&config);
        store.open().await?;
        debug!("Opened chunk cache at {:?}", store.root());

        Ok(Self::with_store(store))
    }
}

impl ChunkCache<MemoryStore> {
    /// Cache that lives only as long as the process
    pub fn in_memory() -> Self {
        Self::with_store(MemoryStore::new())
    }
}

impl<S: ChunkStore> ChunkCache<S> {
    /// Wrap an existing store
    pub fn with_store(store: S) -> Self {
        Self {
            store,
            stats: ChunkCacheStats::new(),
        }
    }

    /// Underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Pack `props` and store them as the chunk at (world, x, z), replacing
    /// any previous contents.
    pub async fn put(&self, world_id: u32, x: i32, z: i32, props: &[Prop]) -> CacheResult<()> {
        let data = pack_props(props)?;
        self.put_record(ChunkCoordinate::new(world_id, x, z), data)
            .await
    }

    /// Store an already packed chunk.
    ///
    /// The pack is validated first and rewritten in native byte order, so
    /// foreign-order packs are accepted and invalid ones never reach the store.
    pub async fn put_packed(&self, world_id: u32, x: i32, z: i32, data: &[u8]) -> CacheResult<()> {
        let records = unpack(data)?;
        let data = pack(&records)?;
        self.put_record(ChunkCoordinate::new(world_id, x, z), data)
            .await
    }

    async fn put_record(&self, key: ChunkCoordinate, data: Vec<u8>) -> CacheResult<()> {
        let len = data.len();
        self.store.put(ChunkRecord::new(key, data)).await?;
        self.stats.record_put(len);
        trace!("Cached {} bytes for chunk {}", len, key);
        Ok(())
    }

    /// Load the chunk at (world, x, z).
    ///
    /// Returns `None` if nothing is stored there, or if the stored entry has
    /// no bytes at all.
    pub async fn get(&self, world_id: u32, x: i32, z: i32) -> CacheResult<Option<CachedChunk>> {
        let key = ChunkCoordinate::new(world_id, x, z);

        let data = match self.store.get(key).await? {
            Some(ChunkRecord { data, .. }) if !data.is_empty() => data,
            _ => {
                self.stats.record_miss();
                trace!("Cache miss for chunk {}", key);
                return Ok(None);
            }
        };

        let props = Self::decode(&data)?;
        self.stats.record_hit(data.len());
        trace!("Cache hit for chunk {} ({} props)", key, props.len());

        Ok(Some(CachedChunk {
            hash: hash_props(&props),
            props,
        }))
    }

    fn decode(data: &Bytes) -> CacheResult<Vec<Prop>> {
        Ok(unpack_props(data)?)
    }

    /// Whether a chunk is stored at (world, x, z). Does not decode the entry.
    pub async fn contains(&self, world_id: u32, x: i32, z: i32) -> CacheResult<bool> {
        Ok(self
            .store
            .get(ChunkCoordinate::new(world_id, x, z))
            .await?
            .is_some_and(|record| !record.data.is_empty()))
    }

    /// Positions of every chunk stored for `world_id`, in ascending (x, z)
    /// order. Other worlds are never included.
    pub async fn available_coordinates(&self, world_id: u32) -> CacheResult<Vec<ChunkPosition>> {
        let cursor = self.store.index_scan(ScanScope::World(world_id)).await?;
        Ok(cursor.map(|key| key.position()).collect())
    }

    /// Remove the chunk at (world, x, z). Removing an absent chunk succeeds.
    ///
    /// Returns whether a chunk was removed.
    pub async fn delete(&self, world_id: u32, x: i32, z: i32) -> CacheResult<bool> {
        let removed = self
            .store
            .delete(ChunkCoordinate::new(world_id, x, z))
            .await?;
        if removed {
            self.stats.record_deletes(1);
        }
        Ok(removed)
    }

    /// Remove every chunk of one world, returning how many were removed.
    pub async fn wipe_world(&self, world_id: u32) -> CacheResult<usize> {
        let removed = self.delete_scope(ScanScope::World(world_id)).await?;
        debug!("Wiped {} chunks of world {}", removed, world_id);
        Ok(removed)
    }

    /// Remove every chunk of every world, returning how many were removed.
    pub async fn clear(&self) -> CacheResult<usize> {
        let removed = self.delete_scope(ScanScope::All).await?;
        debug!("Cleared {} chunks", removed);
        Ok(removed)
    }

    async fn delete_scope(&self, scope: ScanScope) -> CacheResult<usize> {
        let mut removed = 0;
        for key in self.store.index_scan(scope).await? {
            if self.store.delete(key).await? {
                removed += 1;
            }
        }
        self.stats.record_deletes(removed);
        self.store.sweep(scope).await?;
        Ok(removed)
    }

    /// Current statistics
    pub fn stats(&self) -> ChunkCacheStatsSnapshot {
        self.stats.snapshot()
    }

    /// Zero all statistics counters
    pub fn reset_stats(&self) {
        self.stats.reset();
    }
}
