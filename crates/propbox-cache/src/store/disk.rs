//! File-backed chunk store
//!
//! Layout under the store root:
//!
//! ```text
//! <root>/STORE_VERSION          schema version, written on first open
//! <root>/world-<id>/<x>_<z>.pack
//! ```
//!
//! Each chunk is one file, so the world directory doubles as the per-world
//! index. Writes go to a unique temporary file in the same directory and are
//! renamed into place, so readers never observe a partial chunk.

use super::{ChunkRecord, ChunkStore, KeyCursor, ScanScope};
use crate::config::CacheConfig;
use crate::ensure_dir;
use crate::error::{StoreError, StoreResult};
use crate::key::ChunkCoordinate;
use async_trait::async_trait;
use bytes::Bytes;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::fs::DirEntry;
use tracing::{debug, trace, warn};

/// On-disk schema version
pub const STORE_VERSION: u32 = 1;

const VERSION_FILE: &str = "STORE_VERSION";
const WORLD_PREFIX: &str = "world-";
const RECORD_EXTENSION: &str = ".pack";
const TMP_EXTENSION: &str = ".tmp";

/// Temporary files older than this are leftovers of interrupted writes
pub const STALE_TMP_AGE: Duration = Duration::from_secs(300);

/// Chunk store keeping one file per chunk
#[derive(Debug)]
pub struct DiskStore {
    root: PathBuf,
    tmp_counter: AtomicU64,
}

impl DiskStore {
    /// Create a store rooted at `root`. Nothing is touched until first use.
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self {
            root: root.into(),
            tmp_counter: AtomicU64::new(0),
        }
    }

    /// Create a store at the location named by `config`
    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(config.store_path())
    }

    /// Store root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Open the store, provisioning it on first use.
    ///
    /// Creates the root directory and version marker if absent and fails with
    /// [`StoreError::VersionMismatch`] if an existing marker disagrees.
    pub async fn open(&self) -> StoreResult<&Path> {
        let version_path = self.root.join(VERSION_FILE);

        match tokio::fs::read_to_string(&version_path).await {
            Ok(found) => {
                let found = found.trim();
                if found.parse::<u32>().ok() != Some(STORE_VERSION) {
                    return Err(StoreError::VersionMismatch {
                        expected: STORE_VERSION,
                        found: found.to_string(),
                    });
                }
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                ensure_dir(&self.root).await?;
                self.write_atomic(&version_path, STORE_VERSION.to_string().as_bytes())
                    .await?;
                debug!(
                    "Provisioned chunk store v{} at {:?}",
                    STORE_VERSION, self.root
                );
            }
            Err(e) => return Err(e.into()),
        }

        Ok(&self.root)
    }

    fn world_dir(root: &Path, world_id: u32) -> PathBuf {
        root.join(format!("{WORLD_PREFIX}{world_id}"))
    }

    fn record_path(root: &Path, key: ChunkCoordinate) -> PathBuf {
        Self::world_dir(root, key.world_id).join(format!("{}_{}{RECORD_EXTENSION}", key.x, key.z))
    }

    fn parse_world_dir(name: &str) -> Option<u32> {
        name.strip_prefix(WORLD_PREFIX)?.parse().ok()
    }

    fn parse_record_name(name: &str) -> Option<(i32, i32)> {
        let (x, z) = name.strip_suffix(RECORD_EXTENSION)?.split_once('_')?;
        Some((x.parse().ok()?, z.parse().ok()?))
    }

    async fn write_atomic(&self, path: &Path, data: &[u8]) -> std::io::Result<()> {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        // Unique per writer so concurrent puts to one key never share a temp file
        let temp_path = path.with_file_name(format!(
            "{file_name}.{}.{}{TMP_EXTENSION}",
            std::process::id(),
            self.tmp_counter.fetch_add(1, Ordering::Relaxed)
        ));

        let write_result = async {
            tokio::fs::write(&temp_path, data).await?;
            tokio::fs::rename(&temp_path, path).await
        }
        .await;

        if write_result.is_err() {
            let _ = tokio::fs::remove_file(&temp_path).await;
        }

        write_result
    }

    async fn world_dirs(root: &Path) -> StoreResult<Vec<(u32, PathBuf)>> {
        let mut dirs = Vec::new();
        let mut entries = tokio::fs::read_dir(root).await?;
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_dir() {
                continue;
            }
            if let Some(world_id) = Self::parse_world_dir(&entry.file_name().to_string_lossy()) {
                dirs.push((world_id, entry.path()));
            }
        }
        Ok(dirs)
    }

    async fn is_stale(entry: &DirEntry) -> bool {
        entry
            .metadata()
            .await
            .and_then(|metadata| metadata.modified())
            .ok()
            .and_then(|modified| modified.elapsed().ok())
            .is_some_and(|age| age >= STALE_TMP_AGE)
    }

    /// Remove stale temporary files from a world directory, then the
    /// directory itself once nothing is left in it.
    async fn sweep_world(dir: &Path) -> StoreResult<usize> {
        let mut entries = match tokio::fs::read_dir(dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };

        let mut removed = 0;
        let mut remaining = 0;
        while let Some(entry) = entries.next_entry().await? {
            let is_tmp = entry.file_name().to_string_lossy().ends_with(TMP_EXTENSION);
            if is_tmp && Self::is_stale(&entry).await {
                match tokio::fs::remove_file(entry.path()).await {
                    Ok(()) => {
                        trace!("Removed stale temporary file: {:?}", entry.path());
                        removed += 1;
                        continue;
                    }
                    Err(e) if e.kind() == ErrorKind::NotFound => continue,
                    Err(e) => return Err(e.into()),
                }
            }
            remaining += 1;
        }

        if remaining == 0 {
            match tokio::fs::remove_dir(dir).await {
                Ok(()) => trace!("Removed empty world directory: {:?}", dir),
                // Refilled by a concurrent put
                Err(e) if matches!(e.kind(), ErrorKind::NotFound | ErrorKind::DirectoryNotEmpty) => {}
                Err(e) => return Err(e.into()),
            }
        }

        Ok(removed)
    }

    async fn scan_world(dir: &Path, world_id: u32, keys: &mut Vec<ChunkCoordinate>) -> StoreResult<()> {
        let mut entries = match tokio::fs::read_dir(dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e.into()),
        };

        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            match Self::parse_record_name(&name) {
                Some((x, z)) => keys.push(ChunkCoordinate::new(world_id, x, z)),
                None if name.ends_with(TMP_EXTENSION) => {}
                None => warn!("Skipping unrecognized file in chunk store: {:?}", entry.path()),
            }
        }

        Ok(())
    }
}

#[async_trait]
impl ChunkStore for DiskStore {
    async fn put(&self, record: ChunkRecord) -> StoreResult<()> {
        let root = self.open().await?;
        ensure_dir(Self::world_dir(root, record.key.world_id)).await?;

        let path = Self::record_path(root, record.key);
        trace!("Writing {} bytes to chunk store: {}", record.data.len(), record.key);
        if let Err(e) = self.write_atomic(&path, &record.data).await {
            if e.kind() != ErrorKind::NotFound {
                return Err(e.into());
            }
            // World directory was swept by a concurrent bulk delete
            ensure_dir(Self::world_dir(root, record.key.world_id)).await?;
            self.write_atomic(&path, &record.data).await?;
        }

        Ok(())
    }

    async fn get(&self, key: ChunkCoordinate) -> StoreResult<Option<ChunkRecord>> {
        let root = self.open().await?;
        let path = Self::record_path(root, key);

        match tokio::fs::read(&path).await {
            Ok(data) => {
                trace!("Read {} bytes from chunk store: {}", data.len(), key);
                Ok(Some(ChunkRecord::new(key, Bytes::from(data))))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, key: ChunkCoordinate) -> StoreResult<bool> {
        let root = self.open().await?;
        let path = Self::record_path(root, key);

        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                trace!("Removed chunk store entry: {}", key);
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn index_scan(&self, scope: ScanScope) -> StoreResult<KeyCursor> {
        let root = self.open().await?;
        let mut keys = Vec::new();

        match scope {
            ScanScope::World(world_id) => {
                Self::scan_world(&Self::world_dir(root, world_id), world_id, &mut keys).await?;
            }
            ScanScope::All => {
                for (world_id, dir) in Self::world_dirs(root).await? {
                    Self::scan_world(&dir, world_id, &mut keys).await?;
                }
            }
        }

        Ok(KeyCursor::new(keys))
    }

    async fn sweep(&self, scope: ScanScope) -> StoreResult<()> {
        let root = self.open().await?;

        let dirs = match scope {
            ScanScope::World(world_id) => vec![Self::world_dir(root, world_id)],
            ScanScope::All => Self::world_dirs(root)
                .await?
                .into_iter()
                .map(|(_, dir)| dir)
                .collect(),
        };

        let mut removed = 0;
        for dir in dirs {
            removed += Self::sweep_world(&dir).await?;
        }
        if removed > 0 {
            debug!("Swept {} stale temporary files from {:?}", removed, root);
        }

        Ok(())
    }
}
