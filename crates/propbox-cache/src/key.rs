//! Chunk keys

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifies one chunk: a grid cell of one world.
///
/// Ordering is by world first, so all chunks of a world are contiguous in
/// ordered collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkCoordinate {
    /// World id
    pub world_id: u32,
    /// Grid column, may be negative
    pub x: i32,
    /// Grid row, may be negative
    pub z: i32,
}

impl ChunkCoordinate {
    /// Create a new coordinate
    pub const fn new(world_id: u32, x: i32, z: i32) -> Self {
        Self { world_id, x, z }
    }

    /// Position within the world
    pub const fn position(&self) -> ChunkPosition {
        ChunkPosition {
            x: self.x,
            z: self.z,
        }
    }

    /// String form used in logs and on the command line, `world:x:z`.
    pub fn as_cache_key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ChunkCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.world_id, self.x, self.z)
    }
}

/// Error returned when parsing a `world:x:z` string fails
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid chunk key '{0}', expected world:x:z")]
pub struct ParseChunkKeyError(String);

impl FromStr for ChunkCoordinate {
    type Err = ParseChunkKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseChunkKeyError(s.to_string());
        let mut parts = s.split(':');
        let (Some(world), Some(x), Some(z), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(err());
        };

        Ok(Self {
            world_id: world.parse().map_err(|_| err())?,
            x: x.parse().map_err(|_| err())?,
            z: z.parse().map_err(|_| err())?,
        })
    }
}

/// A chunk's position within its world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkPosition {
    /// Grid column
    pub x: i32,
    /// Grid row
    pub z: i32,
}
