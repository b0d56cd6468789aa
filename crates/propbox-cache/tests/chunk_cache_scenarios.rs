//! Chunk cache behaviour, exercised against both store backends

#![allow(clippy::unwrap_used)]

use pretty_assertions::assert_eq;
use propbox_cache::{
    CacheConfig, CacheError, ChunkCache, ChunkPosition, ChunkStore, DiskStore, StoreError,
};
use propbox_formats::{Prop, endian, hash_props, pack_props};
use tempfile::TempDir;

fn p1() -> Prop {
    Prop::new(11, 1, 500, 1_700_000_000, "bench")
        .with_position(-12.5, 0.0, 130.25)
        .with_rotation(90.0, 0.0, 0.0)
        .with_description("A wooden bench")
}

fn p2() -> Prop {
    Prop::new(4, 1, 501, 1_700_000_050, "torch")
        .with_position(-10.0, 1.5, 131.0)
        .with_action("create light 255 160 64")
}

async fn disk_cache() -> (TempDir, ChunkCache<DiskStore>) {
    let dir = TempDir::new().unwrap();
    let cache = ChunkCache::open(CacheConfig::new(dir.path()))
        .await
        .unwrap();
    (dir, cache)
}

async fn populated_round_trip<S: ChunkStore>(cache: &ChunkCache<S>) {
    let props = vec![p1(), p2()];
    cache.put(1, -4, 13, &props).await.unwrap();

    let chunk = cache.get(1, -4, 13).await.unwrap().unwrap();
    assert_eq!(chunk.hash, hash_props(&props));
    assert_eq!(chunk.props, props);
}

async fn empty_chunk_differs_from_missing<S: ChunkStore>(cache: &ChunkCache<S>) {
    assert!(cache.get(1, -4, 13).await.unwrap().is_none());

    cache.put(1, -4, 13, &[]).await.unwrap();
    let chunk = cache.get(1, -4, 13).await.unwrap().unwrap();
    assert_eq!(chunk.hash, 0);
    assert!(chunk.props.is_empty());
}

async fn unknown_coordinate_is_none<S: ChunkStore>(cache: &ChunkCache<S>) {
    cache.put(1, 0, 0, &[p1()]).await.unwrap();
    assert!(cache.get(1, 0, 1).await.unwrap().is_none());
    assert!(cache.get(2, 0, 0).await.unwrap().is_none());
}

async fn delete_unknown_is_noop<S: ChunkStore>(cache: &ChunkCache<S>) {
    cache.put(1, 2, 2, &[p1()]).await.unwrap();

    assert!(!cache.delete(1, 9, 9).await.unwrap());
    assert!(!cache.delete(7, 2, 2).await.unwrap());

    assert!(cache.contains(1, 2, 2).await.unwrap());
    assert_eq!(cache.get(1, 2, 2).await.unwrap().unwrap().props, vec![p1()]);
}

async fn wipe_world_keeps_others<S: ChunkStore>(cache: &ChunkCache<S>) {
    for (x, z) in [(0, 0), (-1, 5), (3, -3)] {
        cache.put(3, x, z, &[p1()]).await.unwrap();
    }
    for (x, z) in [(0, 0), (8, 8)] {
        cache.put(4, x, z, &[p2()]).await.unwrap();
    }

    assert_eq!(cache.wipe_world(3).await.unwrap(), 3);
    assert!(cache.available_coordinates(3).await.unwrap().is_empty());
    assert_eq!(
        cache.available_coordinates(4).await.unwrap(),
        vec![ChunkPosition { x: 0, z: 0 }, ChunkPosition { x: 8, z: 8 }]
    );

    // Wiping an empty world succeeds
    assert_eq!(cache.wipe_world(3).await.unwrap(), 0);
}

async fn clear_empties_every_world<S: ChunkStore>(cache: &ChunkCache<S>) {
    for world_id in [1, 2, 3] {
        cache.put(world_id, 0, 0, &[p1()]).await.unwrap();
        cache.put(world_id, 1, -1, &[]).await.unwrap();
    }

    assert_eq!(cache.clear().await.unwrap(), 6);
    for world_id in [1, 2, 3] {
        assert!(cache.available_coordinates(world_id).await.unwrap().is_empty());
    }
    assert_eq!(cache.stats().deletes, 6);
}

async fn put_packed_normalizes_foreign_order<S: ChunkStore>(cache: &ChunkCache<S>) {
    let foreign = p2()
        .serialize_with_endian(endian::reverse_endian(endian::native_endian()))
        .unwrap();

    cache
        .put_packed(5, 0, 0, &pack_props(&[p1()]).unwrap())
        .await
        .unwrap();
    assert_eq!(cache.get(5, 0, 0).await.unwrap().unwrap().props, vec![p1()]);

    let pack = propbox_formats::pack(&[foreign]).unwrap();
    cache.put_packed(5, 1, 0, &pack).await.unwrap();
    assert_eq!(cache.get(5, 1, 0).await.unwrap().unwrap().props, vec![p2()]);
}

macro_rules! scenario_tests {
    ($($name:ident),* $(,)?) => {
        mod memory {
            $(
                #[tokio::test]
                async fn $name() {
                    let cache = super::ChunkCache::in_memory();
                    super::$name(&cache).await;
                }
            )*
        }

        mod disk {
            $(
                #[tokio::test]
                async fn $name() {
                    let (_dir, cache) = super::disk_cache().await;
                    super::$name(&cache).await;
                }
            )*
        }
    };
}

scenario_tests!(
    populated_round_trip,
    empty_chunk_differs_from_missing,
    unknown_coordinate_is_none,
    delete_unknown_is_noop,
    wipe_world_keeps_others,
    clear_empties_every_world,
);

#[tokio::test]
async fn disk_cache_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let config = CacheConfig::new(dir.path()).with_name("persisted");

    {
        let cache = ChunkCache::open(config.clone()).await.unwrap();
        cache.put(1, -4, 13, &[p1(), p2()]).await.unwrap();
    }

    let cache = ChunkCache::open(config).await.unwrap();
    let chunk = cache.get(1, -4, 13).await.unwrap().unwrap();
    assert_eq!(chunk.props, vec![p1(), p2()]);
    assert_eq!(
        cache.available_coordinates(1).await.unwrap(),
        vec![ChunkPosition { x: -4, z: 13 }]
    );
}

#[tokio::test]
async fn disk_cache_rejects_newer_store() {
    let dir = TempDir::new().unwrap();
    let config = CacheConfig::new(dir.path());
    std::fs::create_dir_all(config.store_path()).unwrap();
    std::fs::write(config.store_path().join("STORE_VERSION"), "99").unwrap();

    assert!(matches!(
        ChunkCache::open(config).await,
        Err(CacheError::Store(StoreError::VersionMismatch { .. }))
    ));
}

#[tokio::test]
async fn open_rejects_invalid_config() {
    let dir = TempDir::new().unwrap();
    let config = CacheConfig::new(dir.path()).with_name("");
    assert!(matches!(
        ChunkCache::open(config).await,
        Err(CacheError::InvalidConfiguration(_))
    ));
}

#[tokio::test]
async fn put_packed_accepts_foreign_packs() {
    put_packed_normalizes_foreign_order(&ChunkCache::in_memory()).await;
    let (_dir, cache) = disk_cache().await;
    put_packed_normalizes_foreign_order(&cache).await;
}

#[tokio::test]
async fn concurrent_puts_to_distinct_chunks() {
    let (_dir, cache) = disk_cache().await;
    let cache = std::sync::Arc::new(cache);

    let mut handles = Vec::new();
    for x in 0..16 {
        let cache = cache.clone();
        handles.push(tokio::spawn(async move {
            cache.put(9, x, -x, &[p1()]).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(cache.available_coordinates(9).await.unwrap().len(), 16);
    assert_eq!(cache.stats().puts, 16);
}

#[tokio::test]
async fn disk_bulk_deletes_remove_world_directories() {
    let (_dir, cache) = disk_cache().await;
    cache.put(1, 0, 0, &[p1()]).await.unwrap();
    cache.put(2, 5, 5, &[]).await.unwrap();

    cache.wipe_world(1).await.unwrap();
    assert!(!cache.store().root().join("world-1").exists());
    assert!(cache.store().root().join("world-2").exists());

    cache.clear().await.unwrap();
    let leftovers: Vec<_> = std::fs::read_dir(cache.store().root())
        .unwrap()
        .map(|entry| entry.unwrap().file_name())
        .collect();
    assert_eq!(leftovers, vec![std::ffi::OsString::from("STORE_VERSION")]);

    // The store stays usable after a clear
    cache.put(1, 0, 0, &[p2()]).await.unwrap();
    assert_eq!(cache.get(1, 0, 0).await.unwrap().unwrap().props, vec![p2()]);
}
