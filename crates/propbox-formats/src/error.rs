//! Error types for the prop and pack codecs

use thiserror::Error;

/// Errors that can occur when parsing or building prop records and packs
#[derive(Debug, Error)]
pub enum FormatError {
    /// Buffer is shorter than the smallest valid record or pack
    #[error("Invalid payload: expected at least {expected} bytes, got {actual}")]
    InvalidPayload {
        /// Minimum number of bytes required
        expected: usize,
        /// Actual buffer size
        actual: usize,
    },

    /// Leading cue matches neither the native nor the swapped sentinel
    #[error("Unknown endianness cue: {0:02x?}")]
    UnknownEndian([u8; 4]),

    /// Declared entry count or a record length runs past the buffer end
    #[error("Truncated pack: expected {expected} bytes, got {actual}")]
    TruncatedPack {
        /// Number of bytes the pack claims to need
        expected: u64,
        /// Actual buffer size
        actual: usize,
    },

    /// A text field does not fit in its 16-bit length slot
    #[error("Field '{field}' is {length} bytes, maximum is 65535")]
    FieldTooLong {
        /// Name of the text field
        field: &'static str,
        /// Encoded byte length
        length: usize,
    },

    /// A text field is not valid UTF-8
    #[error("Field '{field}' is not valid UTF-8")]
    InvalidUtf8 {
        /// Name of the text field
        field: &'static str,
    },

    /// Pack entry count does not fit in the 32-bit count slot
    #[error("Too many pack entries: {0}")]
    TooManyEntries(usize),

    /// Binary read/write error
    #[error("Binary parsing error: {0}")]
    BinRead(String),

    /// IO error during parsing or building
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<binrw::Error> for FormatError {
    fn from(e: binrw::Error) -> Self {
        Self::BinRead(e.to_string())
    }
}

/// Result type alias for codec operations
pub type Result<T> = std::result::Result<T, FormatError>;
