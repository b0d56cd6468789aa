//! Fixed header layout of a prop record
//!
//! The table below is the single description of where each fixed-width field
//! lives. Encoding and decoding walk the fields in this order, and the
//! byte-order normalizer swaps exactly these spans.

use binrw::Endian;

use crate::endian::{detect_at, native_endian};
use crate::error::{FormatError, Result};

/// Size of the fixed header that precedes the text block.
pub const HEADER_SIZE: usize = 0x42;

/// A fixed-width field in the record header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpan {
    /// Field name
    pub name: &'static str,
    /// Offset from the start of the record
    pub offset: usize,
    /// Size in bytes
    pub size: usize,
}

impl FieldSpan {
    const fn new(name: &'static str, offset: usize, size: usize) -> Self {
        Self { name, offset, size }
    }

    /// Byte range covered by this field.
    pub const fn range(&self) -> std::ops::Range<usize> {
        self.offset..self.offset + self.size
    }
}

/// Endianness cue
pub const CUE: FieldSpan = FieldSpan::new("cue", 0x00, 4);
/// Prop id
pub const ID: FieldSpan = FieldSpan::new("id", 0x04, 4);
/// World id
pub const WORLD_ID: FieldSpan = FieldSpan::new("world_id", 0x08, 4);
/// Owner id
pub const USER_ID: FieldSpan = FieldSpan::new("user_id", 0x0c, 4);
/// Milliseconds since the epoch
pub const DATE: FieldSpan = FieldSpan::new("date", 0x10, 8);
/// X position
pub const X: FieldSpan = FieldSpan::new("x", 0x18, 8);
/// Y position
pub const Y: FieldSpan = FieldSpan::new("y", 0x20, 8);
/// Z position
pub const Z: FieldSpan = FieldSpan::new("z", 0x28, 8);
/// Yaw in radians
pub const YAW: FieldSpan = FieldSpan::new("yaw", 0x30, 4);
/// Pitch in radians
pub const PITCH: FieldSpan = FieldSpan::new("pitch", 0x34, 4);
/// Roll in radians
pub const ROLL: FieldSpan = FieldSpan::new("roll", 0x38, 4);
/// Name byte length
pub const NAME_LEN: FieldSpan = FieldSpan::new("name_len", 0x3c, 2);
/// Description byte length
pub const DESCRIPTION_LEN: FieldSpan = FieldSpan::new("description_len", 0x3e, 2);
/// Action byte length
pub const ACTION_LEN: FieldSpan = FieldSpan::new("action_len", 0x40, 2);

/// Every fixed-width field, in on-disk order.
pub const FIXED_FIELDS: [FieldSpan; 14] = [
    CUE,
    ID,
    WORLD_ID,
    USER_ID,
    DATE,
    X,
    Y,
    Z,
    YAW,
    PITCH,
    ROLL,
    NAME_LEN,
    DESCRIPTION_LEN,
    ACTION_LEN,
];

/// Read a u16 length field from a header written in `endian` order.
fn read_len(data: &[u8], span: FieldSpan, endian: Endian) -> usize {
    let bytes = [data[span.offset], data[span.offset + 1]];
    let value = match endian {
        Endian::Big => u16::from_be_bytes(bytes),
        Endian::Little => u16::from_le_bytes(bytes),
    };
    usize::from(value)
}

/// Lengths of the name, description and action text, in that order.
///
/// `data` must hold at least [`HEADER_SIZE`] bytes.
pub(crate) fn text_lengths(data: &[u8], endian: Endian) -> [usize; 3] {
    [
        read_len(data, NAME_LEN, endian),
        read_len(data, DESCRIPTION_LEN, endian),
        read_len(data, ACTION_LEN, endian),
    ]
}

/// Total length of the record starting at `data[0]`, as declared by its
/// own length fields.
///
/// Only the header is inspected; the text block may be missing.
pub fn record_len(data: &[u8]) -> Result<usize> {
    if data.len() < HEADER_SIZE {
        return Err(FormatError::InvalidPayload {
            expected: HEADER_SIZE,
            actual: data.len(),
        });
    }
    let endian = detect_at(data)?;
    Ok(HEADER_SIZE + text_lengths(data, endian).iter().sum::<usize>())
}

/// Copy of `data` with every fixed-width field byte-reversed.
///
/// The text block is copied untouched. The cue is reversed too, so the
/// result announces the opposite byte order and still decodes to the same
/// prop.
pub fn swap_fixed_fields(data: &[u8]) -> Result<Vec<u8>> {
    if data.len() < HEADER_SIZE {
        return Err(FormatError::InvalidPayload {
            expected: HEADER_SIZE,
            actual: data.len(),
        });
    }
    let mut out = data.to_vec();
    for span in FIXED_FIELDS {
        out[span.range()].reverse();
    }
    Ok(out)
}

/// Validate a record and return a native-order copy of exactly its bytes.
///
/// Foreign-order records are swapped; bytes past the declared text block
/// are dropped.
pub fn normalize(data: &[u8]) -> Result<Vec<u8>> {
    let len = record_len(data)?;
    if data.len() < len {
        return Err(FormatError::InvalidPayload {
            expected: len,
            actual: data.len(),
        });
    }
    let record = &data[..len];
    if detect_at(record)? == native_endian() {
        Ok(record.to_vec())
    } else {
        swap_fixed_fields(record)
    }
}
