//! Persistent per-chunk cache of world props
//!
#![allow(clippy::module_name_repetitions)] // Clear naming is preferred
#![allow(clippy::missing_errors_doc)] // Errors are described by the error enums
//! Props placed in a world are grouped into chunks, one grid cell each,
//! addressed by `(world, x, z)`. This crate stores each chunk as a single
//! prop pack and hands back decoded props together with their batch hash,
//! so callers can tell cheaply whether a chunk changed.
//!
//! # Example
//!
//! ```no_run
//! use propbox_cache::{CacheConfig, ChunkCache};
//! use propbox_formats::Prop;
//!
//! # async fn example() -> propbox_cache::CacheResult<()> {
//! let cache = ChunkCache::open(CacheConfig::default()).await?;
//!
//! let props = vec![Prop::new(1, 1, 42, 1_700_000_000, "lamp")];
//! cache.put(1, 0, -3, &props).await?;
//!
//! if let Some(chunk) = cache.get(1, 0, -3).await? {
//!     println!("{} props, hash {:08x}", chunk.props.len(), chunk.hash);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Backends
//!
//! [`ChunkCache`] is generic over a [`ChunkStore`]. The default is the
//! file-backed [`DiskStore`]; [`ChunkCache::in_memory`] uses [`MemoryStore`].

#![warn(missing_docs)]

pub mod chunk_cache;
pub mod config;
pub mod error;
pub mod key;
pub mod stats;
pub mod store;

pub use chunk_cache::{CachedChunk, ChunkCache};
pub use config::{CacheConfig, default_base_dir};
pub use error::{CacheError, CacheResult, StoreError, StoreResult};
pub use key::{ChunkCoordinate, ChunkPosition};
pub use stats::ChunkCacheStatsSnapshot;
pub use store::{ChunkRecord, ChunkStore, DiskStore, KeyCursor, MemoryStore, ScanScope};

use std::path::Path;

/// Ensure a directory exists, creating it if necessary
pub(crate) async fn ensure_dir(path: impl AsRef<Path>) -> std::io::Result<()> {
    let path = path.as_ref();
    if tokio::fs::metadata(path).await.is_err() {
        tokio::fs::create_dir_all(path).await?;
    }
    Ok(())
}
