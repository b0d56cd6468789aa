//! Storage backends for packed chunks
//!
//! A [`ChunkStore`] persists one opaque byte blob per [`ChunkCoordinate`] and
//! can enumerate keys either for the whole store or for a single world. Two
//! backends ship with the crate:
//!
//! - [`DiskStore`]: one file per chunk under a versioned directory
//! - [`MemoryStore`]: ordered in-process map, for tests and ephemeral use
//!
//! Stores know nothing about the pack format. Validation and decoding happen
//! in [`ChunkCache`](crate::ChunkCache).

pub mod disk;
pub mod memory;

pub use disk::{DiskStore, STORE_VERSION};
pub use memory::MemoryStore;

use crate::error::StoreResult;
use crate::key::ChunkCoordinate;
use async_trait::async_trait;
use bytes::Bytes;

/// One stored chunk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkRecord {
    /// Where the chunk lives
    pub key: ChunkCoordinate,
    /// Packed props
    pub data: Bytes,
}

impl ChunkRecord {
    /// Create a new record
    pub fn new(key: ChunkCoordinate, data: impl Into<Bytes>) -> Self {
        Self {
            key,
            data: data.into(),
        }
    }

    /// World the record belongs to
    pub const fn world_id(&self) -> u32 {
        self.key.world_id
    }
}

/// Which keys an index scan visits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanScope {
    /// Every key in the store
    All,
    /// Only keys of one world
    World(u32),
}

impl ScanScope {
    /// Whether `key` falls inside this scope
    pub const fn contains(&self, key: &ChunkCoordinate) -> bool {
        match self {
            Self::All => true,
            Self::World(world_id) => key.world_id == *world_id,
        }
    }
}

/// Keys produced by an index scan, in ascending order
#[derive(Debug)]
pub struct KeyCursor {
    keys: std::vec::IntoIter<ChunkCoordinate>,
}

impl KeyCursor {
    /// Cursor over already collected keys. The keys are sorted.
    pub fn new(mut keys: Vec<ChunkCoordinate>) -> Self {
        keys.sort_unstable();
        Self {
            keys: keys.into_iter(),
        }
    }
}

impl Iterator for KeyCursor {
    type Item = ChunkCoordinate;

    fn next(&mut self) -> Option<Self::Item> {
        self.keys.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.keys.size_hint()
    }
}

impl ExactSizeIterator for KeyCursor {}

/// Persistent key-value storage for packed chunks
///
/// Every call is self-contained: implementations open whatever they need,
/// perform the operation, and release it before returning. Concurrent calls
/// from independent tasks are allowed.
#[async_trait]
pub trait ChunkStore: Send + Sync {
    /// Insert or replace the record at `record.key`.
    async fn put(&self, record: ChunkRecord) -> StoreResult<()>;

    /// Returns None if no record is stored at `key`.
    async fn get(&self, key: ChunkCoordinate) -> StoreResult<Option<ChunkRecord>>;

    /// Returns true if a record was present and removed.
    async fn delete(&self, key: ChunkCoordinate) -> StoreResult<bool>;

    /// Enumerate keys without loading record payloads.
    async fn index_scan(&self, scope: ScanScope) -> StoreResult<KeyCursor>;

    /// Reclaim space left behind by deleted records in `scope`. Called after
    /// bulk deletes; records themselves are never touched.
    async fn sweep(&self, _scope: ScanScope) -> StoreResult<()> {
        Ok(())
    }
}
