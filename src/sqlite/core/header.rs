//! SQLite Database Header Implementation
//!
//! Handles parsing of the SQLite database header (first 100 bytes of the file)
//! according to the file format specification.
//!
//! ## Database Header Format (First 100 bytes)
//!
//! - Bytes 0-15: Header string "SQLite format 3\0"
//! - Bytes 16-17: Page size in bytes (big-endian, 1 means 65536)
//! - Byte 18: File format write version
//! - Byte 19: File format read version
//! - Byte 20: Reserved space at end of each page
//! - Bytes 21-23: Maximum embedded payload fraction, minimum embedded payload fraction, leaf payload fraction
//! - Bytes 24-27: File change counter
//! - Bytes 28-31: Size of database file in pages
//! - Bytes 32-35: First freelist trunk page
//! - Bytes 36-39: Total number of freelist pages
//! - Bytes 40-43: Schema cookie
//! - Bytes 44-47: Schema format number
//! - Bytes 48-51: Default page cache size
//! - Bytes 52-55: Largest root b-tree page number
//! - Bytes 56-59: Database text encoding (1:UTF-8, 2:UTF-16le, 3:UTF-16be)
//! - Bytes 60-63: User version
//! - Bytes 64-67: Incremental vacuum mode
//! - Bytes 68-71: Application ID
//! - Bytes 72-91: Reserved for expansion
//! - Bytes 92-95: Version-valid-for number
//! - Bytes 96-99: SQLite version number

use std::borrow::Cow;

use nom::bytes::complete::take;
use nom::number::complete::{be_u16, be_u32, be_u8};
use nom::sequence::tuple;
use nom::IResult;
use tracing::{debug, warn};

use crate::sqlite::error::{Result, SqliteError};

/// Represents the SQLite database header (first 100 bytes)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseHeader {
    /// Header string (bytes 0-15)
    pub magic: [u8; 16],
    /// Page size as stored (bytes 16-17)
    pub page_size: u16,
    /// File format write version (byte 18)
    pub write_version: u8,
    /// File format read version (byte 19)
    pub read_version: u8,
    /// Reserved space at end of each page (byte 20)
    pub reserved_space: u8,
    /// Maximum embedded payload fraction (byte 21)
    pub max_payload_fraction: u8,
    /// Minimum embedded payload fraction (byte 22)
    pub min_payload_fraction: u8,
    /// Leaf payload fraction (byte 23)
    pub leaf_payload_fraction: u8,
    /// File change counter (bytes 24-27)
    pub file_change_counter: u32,
    /// Size of database file in pages (bytes 28-31)
    pub database_size: u32,
    /// First freelist trunk page (bytes 32-35)
    pub first_freelist_trunk: u32,
    /// Total number of freelist pages (bytes 36-39)
    pub total_freelist_pages: u32,
    /// Schema cookie (bytes 40-43)
    pub schema_cookie: u32,
    /// Schema format number (bytes 44-47)
    pub schema_format: u32,
    /// Default page cache size (bytes 48-51)
    pub page_cache_size: u32,
    /// Largest root b-tree page number (bytes 52-55)
    pub largest_root_page: u32,
    /// Database text encoding (bytes 56-59)
    pub text_encoding: u32,
    /// User version (bytes 60-63)
    pub user_version: u32,
    /// Incremental vacuum mode (bytes 64-67)
    pub incremental_vacuum: u32,
    /// Application ID (bytes 68-71)
    pub application_id: u32,
    /// Version valid for number (bytes 92-95)
    pub version_valid_for: u32,
    /// SQLite version number (bytes 96-99)
    pub sqlite_version_number: u32,
}

impl DatabaseHeader {
    /// Size of the SQLite database header in bytes
    pub const HEADER_SIZE: usize = 100;

    /// Magic string that should appear at the start of every SQLite file
    pub const MAGIC_STRING: &'static [u8; 16] = b"SQLite format 3\0";

    /// Parses a database header from the first bytes of the file.
    ///
    /// Only the length is checked. A wrong magic string is logged, not rejected.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let out_of_bounds = SqliteError::OutOfBounds {
            offset: 0,
            len: Self::HEADER_SIZE,
            available: bytes.len(),
        };
        if bytes.len() < Self::HEADER_SIZE {
            return Err(out_of_bounds);
        }

        let (_, header) = parse_fields(&bytes[..Self::HEADER_SIZE]).map_err(|_| out_of_bounds)?;

        if !header.has_valid_magic() {
            warn!("Database header does not start with the SQLite magic string");
        }
        debug!(
            page_size = header.page_size,
            text_encoding = header.text_encoding,
            "Parsed database header"
        );
        Ok(header)
    }

    pub fn has_valid_magic(&self) -> bool {
        &self.magic == Self::MAGIC_STRING
    }

    /// Page size in bytes. The stored value 1 stands for 65536.
    pub fn page_size(&self) -> u32 {
        match self.page_size {
            1 => 65536,
            size => size as u32,
        }
    }

    /// Text encoding used by every TEXT column in the file.
    ///
    /// Codes other than 1, 2 and 3 resolve to [`TextEncoding::Unsupported`],
    /// which fails only once a TEXT value is decoded.
    pub fn encoding(&self) -> TextEncoding {
        TextEncoding::from(self.text_encoding)
    }
}

fn parse_fields(input: &[u8]) -> IResult<&[u8], DatabaseHeader> {
    let (input, magic) = take(16usize)(input)?;
    let (
        input,
        (
            page_size,
            write_version,
            read_version,
            reserved_space,
            max_payload_fraction,
            min_payload_fraction,
            leaf_payload_fraction,
        ),
    ) = tuple((be_u16, be_u8, be_u8, be_u8, be_u8, be_u8, be_u8))(input)?;
    let (
        input,
        (
            file_change_counter,
            database_size,
            first_freelist_trunk,
            total_freelist_pages,
            schema_cookie,
            schema_format,
            page_cache_size,
            largest_root_page,
            text_encoding,
            user_version,
            incremental_vacuum,
            application_id,
        ),
    ) = tuple((
        be_u32, be_u32, be_u32, be_u32, be_u32, be_u32, be_u32, be_u32, be_u32, be_u32, be_u32,
        be_u32,
    ))(input)?;
    let (input, _reserved) = take(20usize)(input)?;
    let (input, (version_valid_for, sqlite_version_number)) = tuple((be_u32, be_u32))(input)?;

    let mut magic_bytes = [0u8; 16];
    magic_bytes.copy_from_slice(magic);

    Ok((
        input,
        DatabaseHeader {
            magic: magic_bytes,
            page_size,
            write_version,
            read_version,
            reserved_space,
            max_payload_fraction,
            min_payload_fraction,
            leaf_payload_fraction,
            file_change_counter,
            database_size,
            first_freelist_trunk,
            total_freelist_pages,
            schema_cookie,
            schema_format,
            page_cache_size,
            largest_root_page,
            text_encoding,
            user_version,
            incremental_vacuum,
            application_id,
            version_valid_for,
            sqlite_version_number,
        },
    ))
}

/// Encoding of TEXT values in the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf8,
    Utf16Le,
    Utf16Be,
    Unsupported(u32),
}

impl From<u32> for TextEncoding {
    fn from(code: u32) -> Self {
        match code {
            1 => TextEncoding::Utf8,
            2 => TextEncoding::Utf16Le,
            3 => TextEncoding::Utf16Be,
            other => TextEncoding::Unsupported(other),
        }
    }
}

impl TextEncoding {
    fn name(&self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "UTF-8",
            TextEncoding::Utf16Le => "UTF-16le",
            TextEncoding::Utf16Be => "UTF-16be",
            TextEncoding::Unsupported(_) => "unsupported",
        }
    }

    /// Decodes a TEXT column. UTF-8 text is borrowed from the buffer.
    pub fn decode<'a>(&self, bytes: &'a [u8]) -> Result<Cow<'a, str>> {
        let invalid = SqliteError::InvalidText {
            encoding: self.name(),
        };

        let to_unit: fn([u8; 2]) -> u16 = match *self {
            TextEncoding::Utf8 => {
                return std::str::from_utf8(bytes)
                    .map(Cow::Borrowed)
                    .map_err(|_| invalid)
            }
            TextEncoding::Utf16Le => u16::from_le_bytes,
            TextEncoding::Utf16Be => u16::from_be_bytes,
            TextEncoding::Unsupported(code) => {
                return Err(SqliteError::UnsupportedTextEncoding(code))
            }
        };

        if bytes.len() % 2 != 0 {
            return Err(invalid);
        }
        let units = bytes.chunks_exact(2).map(|pair| to_unit([pair[0], pair[1]]));
        char::decode_utf16(units)
            .collect::<std::result::Result<String, _>>()
            .map(Cow::Owned)
            .map_err(|_| invalid)
    }
}
