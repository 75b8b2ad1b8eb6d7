use thiserror::Error;

/// Errors raised while decoding a database file.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SqliteError {
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Read of {len} bytes at offset {offset} exceeds buffer of {available} bytes")]
    OutOfBounds {
        offset: usize,
        len: usize,
        available: usize,
    },

    #[error("Varint starting at offset {offset} runs past the end of the buffer")]
    VarintTruncated { offset: usize },

    #[error("Unsupported b-tree page type: {0}")]
    UnsupportedPageType(u8),

    #[error("Malformed record header: declared size {header_size}, scan ended at {position}")]
    MalformedRecordHeader { header_size: u64, position: usize },

    #[error("Reserved serial type: {0}")]
    ReservedSerialType(u64),

    #[error("Unsupported text encoding: {0}")]
    UnsupportedTextEncoding(u32),

    #[error("Invalid {encoding} text in column")]
    InvalidText { encoding: &'static str },
}

pub type Result<T> = std::result::Result<T, SqliteError>;
