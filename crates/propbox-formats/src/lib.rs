//! Binary codecs for placed world props
//!
#![allow(clippy::cast_possible_truncation)] // Intentional for binary format parsing
#![allow(clippy::cast_possible_wrap)] // Intentional for binary operations
#![allow(clippy::cast_lossless)] // Sometimes clearer than From
#![allow(clippy::module_name_repetitions)] // Clear naming is preferred
#![allow(clippy::float_cmp)] // Round-trip tests compare exact bits
#![allow(clippy::return_self_not_must_use)] // Builder patterns
//! This crate provides the byte-exact formats used to persist and exchange
//! props, the objects placed in a world:
//!
//! - **Endian cue**: 4-byte sentinel at the start of every structure that lets
//!   a reader detect and undo a byte order mismatch
//! - **Prop record**: fixed 0x42-byte header plus UTF-8 text
//! - **Prop pack**: count-prefixed concatenation of prop records, one pack per
//!   chunk
//! - **Batch hash**: 32-bit fingerprint over a list of props
//!
//! All functions are pure and synchronous, and never return a partially
//! decoded prop.

#![warn(missing_docs)]

pub mod endian;
pub mod error;
pub mod hash;
pub mod pack;
pub mod prop;

pub use error::{FormatError, Result};
pub use hash::hash_props;
pub use pack::{pack, pack_props, unpack, unpack_props};
pub use prop::Prop;

/// Common trait for self-contained binary formats
pub trait PropFormat: Sized {
    /// Parse from bytes
    fn parse(data: &[u8]) -> Result<Self>;

    /// Build to bytes
    fn build(&self) -> Result<Vec<u8>>;

    /// Verify that `data` rebuilds to the same bytes.
    ///
    /// Only native-order input with no trailing bytes can pass.
    fn verify_round_trip(data: &[u8]) -> Result<bool> {
        let parsed = Self::parse(data)?;
        let rebuilt = parsed.build()?;
        Ok(data == rebuilt.as_slice())
    }
}
