//! Single prop record format
//!
//! A prop record is a fixed 0x42-byte header followed by the UTF-8 text of
//! the name, description and action, concatenated without separators.
//!
//! # Format Overview
//!
//! - Offset 0: endianness cue (see [`crate::endian`])
//! - Offsets 0x04-0x3b: ids, date, position and rotation
//! - Offsets 0x3c-0x41: three u16 text lengths
//! - Offset 0x42: text block
//!
//! All fixed-width fields use the byte order announced by the cue. Readers
//! accept both orders; writers use native order unless asked otherwise.
//!
//! # Usage
//!
//! ```rust
//! use propbox_formats::prop::Prop;
//!
//! # fn main() -> Result<(), propbox_formats::FormatError> {
//! let prop = Prop::new(1, 10, 500, 1_700_000_000_000, "chair.rwx")
//!     .with_position(1.0, 0.0, -3.5)
//!     .with_action("activate url example.com");
//!
//! let data = prop.serialize()?;
//! assert_eq!(data.len(), 0x42 + 9 + 24);
//!
//! let parsed = Prop::deserialize(&data)?;
//! assert_eq!(parsed, prop);
//! # Ok(())
//! # }
//! ```

pub mod layout;
pub mod record;

pub use layout::{FIXED_FIELDS, FieldSpan, HEADER_SIZE, normalize, record_len, swap_fixed_fields};
pub use record::Prop;
