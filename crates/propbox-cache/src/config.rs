//! Chunk cache configuration

use crate::error::{CacheError, CacheResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Default store name within the base directory
pub const DEFAULT_STORE_NAME: &str = "chunks";

/// Get the default propbox cache directory
///
/// Returns a path like:
/// - Linux: `~/.cache/propbox`
/// - macOS: `~/Library/Caches/propbox`
/// - Windows: `C:\Users\{user}\AppData\Local\propbox`
pub fn default_base_dir() -> CacheResult<PathBuf> {
    dirs::cache_dir()
        .map(|dir| dir.join("propbox"))
        .ok_or_else(|| {
            CacheError::InvalidConfiguration("no cache directory on this platform".to_string())
        })
}

/// Configuration for a persistent chunk cache
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Directory holding one or more named stores
    pub base_dir: PathBuf,
    /// Name of the store, also its directory name under `base_dir`
    pub name: String,
}

/// Base directory used when the platform has no cache directory
pub const FALLBACK_BASE_DIR: &str = ".propbox";

fn base_dir_or_fallback(resolved: CacheResult<PathBuf>) -> PathBuf {
    resolved.unwrap_or_else(|e| {
        warn!("{e}, falling back to {FALLBACK_BASE_DIR:?} in the working directory");
        PathBuf::from(FALLBACK_BASE_DIR)
    })
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            base_dir: base_dir_or_fallback(default_base_dir()),
            name: DEFAULT_STORE_NAME.to_string(),
        }
    }
}

impl CacheConfig {
    /// Create a config rooted at the given directory
    pub fn new<P: Into<PathBuf>>(base_dir: P) -> Self {
        Self {
            base_dir: base_dir.into(),
            ..Self::default()
        }
    }

    /// Set the store name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the base directory
    pub fn with_base_dir<P: Into<PathBuf>>(mut self, base_dir: P) -> Self {
        self.base_dir = base_dir.into();
        self
    }

    /// Directory of the store itself
    pub fn store_path(&self) -> PathBuf {
        self.base_dir.join(&self.name)
    }

    /// Load a config from a JSON file. Missing fields take their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> CacheResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            CacheError::InvalidConfiguration(format!("{}: {e}", path.display()))
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.name.is_empty() {
            return Err("store name cannot be empty".to_string());
        }

        if self.name == "." || self.name == ".." || self.name.contains(['/', '\\']) {
            return Err(format!("store name '{}' is not a plain directory name", self.name));
        }

        if self.base_dir.as_os_str().is_empty() {
            return Err("base directory cannot be empty".to_string());
        }

        Ok(())
    }
}
