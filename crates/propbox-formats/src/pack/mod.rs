//! Prop pack format
//!
//! A pack is an 8-byte header `[cue:4][count:4]` followed by `count` prop
//! records back to back. Record lengths are not stored in the pack; each is
//! recomputed from the text lengths inside the record, so packs can only be
//! read front to back.
//!
//! # Usage
//!
//! ```rust
//! use propbox_formats::pack::{pack_props, unpack_props};
//! use propbox_formats::prop::Prop;
//!
//! # fn main() -> Result<(), propbox_formats::FormatError> {
//! let props = vec![
//!     Prop::new(1, 3, 9, 1_000, "wall.rwx"),
//!     Prop::new(2, 3, 9, 2_000, "door.rwx").with_description("front door"),
//! ];
//!
//! let data = pack_props(&props)?;
//! assert_eq!(unpack_props(&data)?, props);
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod header;
pub mod reader;

pub use builder::{pack, pack_props};
pub use header::{PACK_HEADER_SIZE, PackHeader};
pub use reader::{PackReader, PackRecord, PackRecords};

use crate::error::Result;
use crate::prop::Prop;

/// Split a pack into its individual record buffers, in order.
///
/// Records are returned as stored; each one carries its own cue.
pub fn unpack(data: &[u8]) -> Result<Vec<Vec<u8>>> {
    PackReader::new(data)?
        .records()
        .map(|record| record.map(|r| r.bytes.to_vec()))
        .collect()
}

/// Split a pack and decode every record.
pub fn unpack_props(data: &[u8]) -> Result<Vec<Prop>> {
    PackReader::new(data)?
        .records()
        .map(|record| record.and_then(|r| Prop::deserialize(r.bytes)))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::FormatError;
    use crate::endian::{native_endian, reverse_endian};
    use crate::prop::swap_fixed_fields;

    #[test]
    fn test_unpack_empty() {
        let data = pack_props(&[]).unwrap();
        assert!(unpack(&data).unwrap().is_empty());
        assert!(unpack_props(&data).unwrap().is_empty());
    }

    #[test]
    fn test_count_exceeds_buffer() {
        let mut data = pack_props(&[Prop::new(1, 1, 1, 1, "")]).unwrap();
        data[4..8].copy_from_slice(&2u32.to_ne_bytes());
        let err = unpack(&data).unwrap_err();
        assert!(matches!(
            err,
            FormatError::TruncatedPack {
                expected: 140,
                actual: 74
            }
        ));
    }

    #[test]
    fn test_record_runs_past_end() {
        let data = pack_props(&[Prop::new(1, 1, 1, 1, "name")]).unwrap();
        let err = unpack(&data[..data.len() - 1]).unwrap_err();
        assert!(matches!(
            err,
            FormatError::TruncatedPack {
                expected: 78,
                actual: 77
            }
        ));
    }

    #[test]
    fn test_foreign_pack() {
        let props = vec![Prop::new(1, 1, 1, 1, "one"), Prop::new(2, 1, 1, 2, "two")];
        let foreign = reverse_endian(native_endian());

        // Build a pack as a machine of the opposite byte order would
        let mut data = Vec::new();
        data.extend_from_slice(&swap_fixed_fields_header(&pack_props(&[]).unwrap(), 2));
        for prop in &props {
            data.extend_from_slice(&prop.serialize_with_endian(foreign).unwrap());
        }

        assert_eq!(unpack_props(&data).unwrap(), props);

        // Records come back as stored, repacking normalizes them
        let records = unpack(&data).unwrap();
        assert_eq!(swap_fixed_fields(&records[0]).unwrap(), props[0].serialize().unwrap());
        let repacked = pack(&records).unwrap();
        assert_eq!(repacked, pack_props(&props).unwrap());
    }

    /// Byte-reverse a native pack header and set its count
    fn swap_fixed_fields_header(native: &[u8], count: u32) -> Vec<u8> {
        let mut header = native[..8].to_vec();
        header[4..8].copy_from_slice(&count.to_ne_bytes());
        header[..4].reverse();
        header[4..8].reverse();
        header
    }
}
