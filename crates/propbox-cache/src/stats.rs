//! Chunk cache statistics

#![allow(clippy::cast_precision_loss)] // Hit rate accepts precision loss

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Live counters, updated lock-free from concurrent operations
#[derive(Debug, Default)]
pub struct ChunkCacheStats {
    hits: AtomicU64,
    misses: AtomicU64,
    puts: AtomicU64,
    deletes: AtomicU64,
    bytes_written: AtomicU64,
    bytes_read: AtomicU64,
}

impl ChunkCacheStats {
    /// Create zeroed counters
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub(crate) fn record_hit(&self, bytes: usize) {
        self.hits.fetch_add(1, Ordering::Relaxed);
        self.bytes_read.fetch_add(bytes as u64, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_put(&self, bytes: usize) {
        self.puts.fetch_add(1, Ordering::Relaxed);
        self.bytes_written.fetch_add(bytes as u64, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_deletes(&self, count: usize) {
        self.deletes.fetch_add(count as u64, Ordering::Relaxed);
    }

    /// Reset all counters to zero
    pub fn reset(&self) {
        for counter in [
            &self.hits,
            &self.misses,
            &self.puts,
            &self.deletes,
            &self.bytes_written,
            &self.bytes_read,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
    }

    /// Point-in-time copy of the counters
    pub fn snapshot(&self) -> ChunkCacheStatsSnapshot {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let lookups = hits + misses;

        ChunkCacheStatsSnapshot {
            hits,
            misses,
            puts: self.puts.load(Ordering::Relaxed),
            deletes: self.deletes.load(Ordering::Relaxed),
            bytes_written: self.bytes_written.load(Ordering::Relaxed),
            bytes_read: self.bytes_read.load(Ordering::Relaxed),
            hit_rate: if lookups == 0 {
                0.0
            } else {
                hits as f64 / lookups as f64
            },
        }
    }
}

/// Cache statistics snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkCacheStatsSnapshot {
    /// Lookups that returned a chunk
    pub hits: u64,
    /// Lookups that found nothing
    pub misses: u64,
    /// Chunks written
    pub puts: u64,
    /// Chunks removed, including those removed by bulk wipes
    pub deletes: u64,
    /// Packed bytes written
    pub bytes_written: u64,
    /// Packed bytes read on hits
    pub bytes_read: u64,
    /// hits / (hits + misses), 0.0 before the first lookup
    pub hit_rate: f64,
}
