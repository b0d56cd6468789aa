//! Byte order detection
//!
//! Every record and pack header starts with a 4-byte cue: [`ENDIAN_CUE`]
//! written in the writer's byte order. A reader interprets those four bytes
//! natively and compares the result against two sentinels:
//!
//! - [`native_cue`]: the cue as this process writes it, no conversion needed
//! - [`swapped_cue`]: the cue as a machine of the opposite byte order writes
//!   it, every fixed-width field must be byte-swapped
//!
//! Anything else is rejected as [`FormatError::UnknownEndian`].

use binrw::Endian;

use crate::error::{FormatError, Result};

/// Cue value written at offset 0 of every record and pack header.
///
/// No two bytes are equal, so its swapped form can never be mistaken for it.
pub const ENDIAN_CUE: u32 = 0x0102_0304;

/// Size of the cue in bytes.
pub const CUE_SIZE: usize = 4;

/// Byte order of the running process.
pub const fn native_endian() -> Endian {
    if cfg!(target_endian = "big") {
        Endian::Big
    } else {
        Endian::Little
    }
}

/// The opposite of `endian`.
pub const fn reverse_endian(endian: Endian) -> Endian {
    match endian {
        Endian::Big => Endian::Little,
        Endian::Little => Endian::Big,
    }
}

/// Sentinel read back when the cue was written in native order.
pub const fn native_cue() -> u32 {
    ENDIAN_CUE
}

/// Sentinel read back when the cue was written in the opposite order.
pub const fn swapped_cue() -> u32 {
    ENDIAN_CUE.swap_bytes()
}

/// Cue bytes for a structure written in `endian` order.
pub const fn cue_bytes(endian: Endian) -> [u8; CUE_SIZE] {
    match endian {
        Endian::Big => ENDIAN_CUE.to_be_bytes(),
        Endian::Little => ENDIAN_CUE.to_le_bytes(),
    }
}

/// Determine which byte order a structure was written in from its cue.
pub fn detect(cue: [u8; CUE_SIZE]) -> Result<Endian> {
    let value = u32::from_ne_bytes(cue);
    if value == native_cue() {
        Ok(native_endian())
    } else if value == swapped_cue() {
        Ok(reverse_endian(native_endian()))
    } else {
        Err(FormatError::UnknownEndian(cue))
    }
}

/// Read and detect the cue at the start of `data`.
///
/// `data` must be at least [`CUE_SIZE`] bytes; callers check their own
/// minimum length first so they can report it.
pub(crate) fn detect_at(data: &[u8]) -> Result<Endian> {
    let cue: [u8; CUE_SIZE] = data
        .get(..CUE_SIZE)
        .and_then(|b| b.try_into().ok())
        .ok_or(FormatError::InvalidPayload {
            expected: CUE_SIZE,
            actual: data.len(),
        })?;
    detect(cue)
}
