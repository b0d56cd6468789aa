//! Pack envelope header

use binrw::{BinRead, BinResult, BinWrite, Endian};
use std::io::{Read, Seek, Write};

use crate::endian::{CUE_SIZE, cue_bytes};

/// Size of the pack header: cue plus entry count.
pub const PACK_HEADER_SIZE: usize = 8;

/// `[cue:4][count:4]` at the start of every pack
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackHeader {
    /// Number of records that follow
    pub entry_count: u32,
}

impl PackHeader {
    /// Create a header for `entry_count` records
    pub const fn new(entry_count: u32) -> Self {
        Self { entry_count }
    }

    /// Smallest pack size that can hold the declared records.
    pub fn min_pack_len(&self) -> u64 {
        PACK_HEADER_SIZE as u64 + u64::from(self.entry_count) * crate::prop::HEADER_SIZE as u64
    }
}

impl BinRead for PackHeader {
    type Args<'a> = ();

    fn read_options<R: Read + Seek>(
        reader: &mut R,
        endian: Endian,
        _args: Self::Args<'_>,
    ) -> BinResult<Self> {
        let pos = reader.stream_position()?;
        let mut cue = [0u8; CUE_SIZE];
        reader.read_exact(&mut cue)?;
        if cue != cue_bytes(endian) {
            return Err(binrw::Error::BadMagic {
                pos,
                found: Box::new(cue),
            });
        }

        Ok(Self {
            entry_count: u32::read_options(reader, endian, ())?,
        })
    }
}

impl BinWrite for PackHeader {
    type Args<'a> = ();

    fn write_options<W: Write + Seek>(
        &self,
        writer: &mut W,
        endian: Endian,
        _args: Self::Args<'_>,
    ) -> BinResult<()> {
        writer.write_all(&cue_bytes(endian))?;
        self.entry_count.write_options(writer, endian, ())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_header_bytes() {
        let mut buf = Vec::new();
        PackHeader::new(3)
            .write_options(&mut Cursor::new(&mut buf), Endian::Little, ())
            .unwrap();
        assert_eq!(buf, [0x04, 0x03, 0x02, 0x01, 0x03, 0x00, 0x00, 0x00]);

        let header = PackHeader::read_options(&mut Cursor::new(&buf), Endian::Little, ()).unwrap();
        assert_eq!(header.entry_count, 3);
    }

    #[test]
    fn test_wrong_order_rejected() {
        let buf = [0x01, 0x02, 0x03, 0x04, 0x00, 0x00, 0x00, 0x01];
        assert!(PackHeader::read_options(&mut Cursor::new(&buf), Endian::Little, ()).is_err());
        let header = PackHeader::read_options(&mut Cursor::new(&buf), Endian::Big, ()).unwrap();
        assert_eq!(header.entry_count, 1);
    }

    #[test]
    fn test_min_pack_len() {
        assert_eq!(PackHeader::new(0).min_pack_len(), 8);
        assert_eq!(PackHeader::new(2).min_pack_len(), 8 + 2 * 0x42);
        assert_eq!(
            PackHeader::new(u32::MAX).min_pack_len(),
            8 + u64::from(u32::MAX) * 0x42
        );
    }
}
