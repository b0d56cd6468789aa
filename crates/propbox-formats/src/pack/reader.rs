//! Sequential pack record walker

use binrw::BinRead;
use std::io::Cursor;

use crate::endian::detect_at;
use crate::error::{FormatError, Result};
use crate::pack::header::{PACK_HEADER_SIZE, PackHeader};
use crate::prop::{HEADER_SIZE, record_len};

/// One record inside a pack
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackRecord<'a> {
    /// Raw record bytes, in the byte order the record announces
    pub bytes: &'a [u8],
    /// Offset of the following record
    pub next_offset: usize,
}

/// Validated view over a pack buffer
#[derive(Debug, Clone, Copy)]
pub struct PackReader<'a> {
    data: &'a [u8],
    header: PackHeader,
}

impl<'a> PackReader<'a> {
    /// Check the pack header and that the buffer can hold the declared
    /// number of records.
    pub fn new(data: &'a [u8]) -> Result<Self> {
        if data.len() < PACK_HEADER_SIZE {
            return Err(FormatError::InvalidPayload {
                expected: PACK_HEADER_SIZE,
                actual: data.len(),
            });
        }

        let endian = detect_at(data)?;
        let header = PackHeader::read_options(&mut Cursor::new(data), endian, ())?;

        let min_len = header.min_pack_len();
        if (data.len() as u64) < min_len {
            return Err(FormatError::TruncatedPack {
                expected: min_len,
                actual: data.len(),
            });
        }

        Ok(Self { data, header })
    }

    /// Number of records the header declares
    pub fn entry_count(&self) -> u32 {
        self.header.entry_count
    }

    /// Walk the records in order.
    pub fn records(&self) -> PackRecords<'a> {
        PackRecords {
            data: self.data,
            offset: PACK_HEADER_SIZE,
            remaining: self.header.entry_count,
            failed: false,
        }
    }
}

/// Iterator over the records of a pack.
///
/// A record's length lives in its own header, so each record has to be
/// sized before the next one can be located. The iterator stops after the
/// first error.
#[derive(Debug, Clone)]
pub struct PackRecords<'a> {
    data: &'a [u8],
    offset: usize,
    remaining: u32,
    failed: bool,
}

impl<'a> PackRecords<'a> {
    fn next_record(&self) -> Result<PackRecord<'a>> {
        let rest = &self.data[self.offset..];
        if rest.len() < HEADER_SIZE {
            return Err(FormatError::TruncatedPack {
                expected: (self.offset + HEADER_SIZE) as u64,
                actual: self.data.len(),
            });
        }

        let end = self.offset + record_len(rest)?;
        if end > self.data.len() {
            return Err(FormatError::TruncatedPack {
                expected: end as u64,
                actual: self.data.len(),
            });
        }

        Ok(PackRecord {
            bytes: &self.data[self.offset..end],
            next_offset: end,
        })
    }
}

impl<'a> Iterator for PackRecords<'a> {
    type Item = Result<PackRecord<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 || self.failed {
            return None;
        }

        match self.next_record() {
            Ok(record) => {
                self.offset = record.next_offset;
                self.remaining -= 1;
                Some(Ok(record))
            }
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.failed {
            (0, Some(0))
        } else {
            (0, Some(self.remaining as usize))
        }
    }
}

impl std::iter::FusedIterator for PackRecords<'_> {}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::pack::pack;
    use crate::prop::Prop;

    #[test]
    fn test_offsets_chain() {
        let a = Prop::new(1, 1, 1, 1, "a").serialize().unwrap();
        let b = Prop::new(2, 1, 1, 1, "bbbb").serialize().unwrap();
        let data = pack(&[&a, &b]).unwrap();

        let reader = PackReader::new(&data).unwrap();
        assert_eq!(reader.entry_count(), 2);

        let records: Vec<_> = reader.records().collect::<Result<_>>().unwrap();
        assert_eq!(records[0].bytes, a.as_slice());
        assert_eq!(records[0].next_offset, 8 + a.len());
        assert_eq!(records[1].bytes, b.as_slice());
        assert_eq!(records[1].next_offset, data.len());
    }

    #[test]
    fn test_stops_after_error() {
        let a = Prop::new(1, 1, 1, 1, "abc").serialize().unwrap();
        let mut data = pack(&[&a, &a]).unwrap();
        // Corrupt the cue of the second record
        let second = 8 + a.len();
        data[second..second + 4].copy_from_slice(&[0, 0, 0, 0]);

        let mut records = PackReader::new(&data).unwrap().records();
        assert!(records.next().unwrap().is_ok());
        assert!(matches!(
            records.next().unwrap(),
            Err(FormatError::UnknownEndian(_))
        ));
        assert!(records.next().is_none());
    }

    #[test]
    fn test_header_too_short() {
        let err = PackReader::new(&[0x01, 0x02, 0x03]).unwrap_err();
        assert!(matches!(
            err,
            FormatError::InvalidPayload {
                expected: 8,
                actual: 3
            }
        ));
    }
}
