//! Pack construction

use binrw::BinWrite;
use std::io::Cursor;

use crate::endian::native_endian;
use crate::error::{FormatError, Result};
use crate::pack::header::{PACK_HEADER_SIZE, PackHeader};
use crate::prop::{Prop, normalize};

/// Concatenate serialized props behind a native-order pack header.
///
/// Every buffer is validated first and rewritten in native order, so a pack
/// never mixes byte orders even when its inputs do.
pub fn pack<B: AsRef<[u8]>>(buffers: &[B]) -> Result<Vec<u8>> {
    let records = buffers
        .iter()
        .map(|b| normalize(b.as_ref()))
        .collect::<Result<Vec<_>>>()?;

    let entry_count =
        u32::try_from(records.len()).map_err(|_| FormatError::TooManyEntries(records.len()))?;
    let total = PACK_HEADER_SIZE + records.iter().map(Vec::len).sum::<usize>();

    let mut buffer = Vec::with_capacity(total);
    PackHeader::new(entry_count).write_options(&mut Cursor::new(&mut buffer), native_endian(), ())?;
    for record in &records {
        buffer.extend_from_slice(record);
    }

    Ok(buffer)
}

/// Serialize and pack a list of props.
pub fn pack_props(props: &[Prop]) -> Result<Vec<u8>> {
    let buffers = props
        .iter()
        .map(Prop::serialize)
        .collect::<Result<Vec<_>>>()?;
    pack(&buffers)
}
