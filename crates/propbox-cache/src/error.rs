//! Error types for cache operations

use propbox_formats::FormatError;
use thiserror::Error;

/// Failures reported by a [`ChunkStore`](crate::store::ChunkStore) backend
#[derive(Debug, Error)]
pub enum StoreError {
    /// IO error while opening, reading or writing the store
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The store on disk was created by an incompatible version
    #[error("Store version mismatch: expected {expected}, found {found:?}")]
    VersionMismatch {
        /// Version this build understands
        expected: u32,
        /// Version marker found on disk
        found: String,
    },
}

/// Errors that can occur during chunk cache operations
#[derive(Debug, Error)]
pub enum CacheError {
    /// Stored or supplied bytes are not a valid pack
    #[error("Format error: {0}")]
    Format(#[from] FormatError),

    /// The underlying store failed
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Invalid cache configuration
    #[error("Invalid cache configuration: {0}")]
    InvalidConfiguration(String),
}

impl From<std::io::Error> for CacheError {
    fn from(err: std::io::Error) -> Self {
        Self::Store(StoreError::Io(err))
    }
}

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Result type alias for cache operations
pub type CacheResult<T> = Result<T, CacheError>;
