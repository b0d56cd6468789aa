//! propbox client library
//!
//! This library provides the core functionality for the propbox CLI tool.

pub mod commands;
pub mod output;

pub use crate::commands::{chunks::handle as handle_chunks, inspect::handle as handle_inspect};

use clap::Subcommand;
use propbox_cache::{CacheConfig, CacheResult};
use std::path::PathBuf;

#[derive(Subcommand, Debug)]
pub enum ChunkCommands {
    /// List the cached chunk positions of a world
    Coords {
        /// World id
        world: u32,
    },

    /// Show the props and hash of one chunk
    #[command(allow_negative_numbers = true)]
    Show {
        /// World id
        world: u32,
        /// Chunk column
        x: i32,
        /// Chunk row
        z: i32,
    },

    /// Store props into a chunk, replacing its contents
    #[command(allow_negative_numbers = true)]
    Import {
        /// World id
        world: u32,
        /// Chunk column
        x: i32,
        /// Chunk row
        z: i32,
        /// JSON array of props, or a raw pack with --packed
        file: PathBuf,
        /// Treat the input file as a binary prop pack
        #[arg(long)]
        packed: bool,
    },

    /// Write one chunk out as a binary prop pack
    #[command(allow_negative_numbers = true)]
    Export {
        /// World id
        world: u32,
        /// Chunk column
        x: i32,
        /// Chunk row
        z: i32,
        /// Output file
        file: PathBuf,
    },

    /// Remove one chunk
    #[command(allow_negative_numbers = true)]
    Delete {
        /// World id
        world: u32,
        /// Chunk column
        x: i32,
        /// Chunk row
        z: i32,
    },

    /// Remove every chunk of a world
    Wipe {
        /// World id
        world: u32,
    },

    /// Remove every chunk of every world
    Clear,
}

/// Output format for commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    Text,
    /// JSON output
    Json,
    /// Pretty-printed JSON
    JsonPretty,
}

/// Where the cache lives, as resolved from flags and the config file
#[derive(Debug, Clone, Default)]
pub struct CacheLocation {
    /// JSON config file
    pub config: Option<PathBuf>,
    /// Overrides the configured base directory
    pub cache_dir: Option<PathBuf>,
    /// Overrides the configured store name
    pub store: Option<String>,
}

impl CacheLocation {
    /// Build the effective cache config. Flags win over the config file.
    pub fn resolve(&self) -> CacheResult<CacheConfig> {
        let mut config = match &self.config {
            Some(path) => CacheConfig::from_file(path)?,
            None => CacheConfig::default(),
        };

        if let Some(dir) = &self.cache_dir {
            config = config.with_base_dir(dir);
        }
        if let Some(name) = &self.store {
            config = config.with_name(name);
        }

        Ok(config)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("propbox.json");
        std::fs::write(&path, r#"{ "base_dir": "/srv/props", "name": "live" }"#).unwrap();

        let location = CacheLocation {
            config: Some(path.clone()),
            cache_dir: None,
            store: Some("staging".to_string()),
        };
        let config = location.resolve().unwrap();
        assert_eq!(config.base_dir, PathBuf::from("/srv/props"));
        assert_eq!(config.name, "staging");

        let location = CacheLocation {
            config: Some(path),
            cache_dir: Some(dir.path().to_path_buf()),
            store: None,
        };
        let config = location.resolve().unwrap();
        assert_eq!(config.store_path(), dir.path().join("live"));
    }
}
