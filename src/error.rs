//! Error types for the biab-decoder library

use std::io;

/// Fatal decoding error, no `Song` is produced.
#[derive(Debug, thiserror::Error)]
pub enum BiabError {
    /// A read would run past the end of the buffer
    #[error("read of {requested} byte(s) at offset {offset} runs past the end of the buffer (length {len})")]
    OutOfBounds {
        offset: usize,
        requested: usize,
        len: usize,
    },

    /// Little-endian reads are limited to 1..=4 bytes
    #[error("invalid little-endian read width {0} (expected 1 to 4 bytes)")]
    InvalidReadWidth(usize),

    /// Buffer ends before the header is complete
    #[error("truncated header: could not read {field} at offset {offset}")]
    HeaderTruncated { field: &'static str, offset: usize },

    /// Style byte does not map to a time signature
    #[error("style index {index} at offset {offset} is outside the style table (0..{table_len})")]
    StyleOutOfRange {
        index: i16,
        offset: usize,
        table_len: usize,
    },

    /// Key byte does not map to a key offset
    #[error("key index {index} at offset {offset} is outside the key table (0..{table_len})")]
    KeyOutOfRange {
        index: u8,
        offset: usize,
        table_len: usize,
    },

    /// No style block marker followed by the style file signature
    #[error("style block not found: no marker 0x{marker:02X} followed by {signature:?} in {len} bytes")]
    StyleBlockNotFound {
        marker: u8,
        signature: String,
        len: usize,
    },

    /// A note event record runs past the end of the buffer
    #[error("event table record {record} at offset {offset} runs past the end of the buffer (length {len})")]
    EventTableTruncated {
        record: usize,
        offset: usize,
        len: usize,
    },

    /// Configuration error
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(String),
}

impl From<io::Error> for BiabError {
    fn from(error: io::Error) -> Self {
        Self::IoError(error.to_string())
    }
}
