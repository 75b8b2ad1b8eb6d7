//! SQLite Record Format Implementation
//!
//! This module handles parsing SQLite records (rows) according to the file format specification.
//!
//! ## Record Format
//!
//! A record in SQLite represents a single row of data and consists of:
//!
//! - A header containing:
//!   - Header size (varint), counting the size varint itself
//!   - Serial type codes (sequence of varints), one per column
//! - The body: each column's bytes, back to back, in header order
//!
//! The payload length and row id that precede a record on a table leaf page
//! belong to the cell, see [`crate::sqlite::btree::Cell`].

use std::borrow::Cow;
use std::fmt;

use tracing::trace;

use super::cursor::Cursor;
use super::header::TextEncoding;
use super::serial_type::SerialType;
use crate::sqlite::error::{Result, SqliteError};

/// A decoded column value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value<'a> {
    Null,
    Integer(i64),
    Float(f64),
    Text(Cow<'a, str>),
    Blob(&'a [u8]),
}

impl<'a> Value<'a> {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text.as_ref()),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(value) => Some(*value),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl fmt::Display for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Integer(value) => write!(f, "{}", value),
            Value::Float(value) => write!(f, "{}", value),
            Value::Text(text) => write!(f, "{}", text),
            Value::Blob(bytes) => write!(f, "{}", String::from_utf8_lossy(bytes)),
        }
    }
}

/// The serial type list at the front of a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordHeader {
    /// Total header length in bytes, including this varint
    pub header_size: u64,
    /// Raw serial type codes, one per column
    pub serial_types: Vec<u64>,
}

impl RecordHeader {
    /// Reads the header starting at the cursor position.
    ///
    /// Serial types are read until the cursor sits exactly `header_size` bytes
    /// past where the header started. Overshooting that mark is an error.
    pub fn read(cursor: &mut Cursor<'_>) -> Result<Self> {
        let start = cursor.position();
        let header_size = cursor.read_varint()?;

        let end = usize::try_from(header_size)
            .ok()
            .and_then(|size| start.checked_add(size))
            .ok_or(SqliteError::MalformedRecordHeader {
                header_size,
                position: cursor.position() - start,
            })?;

        let mut serial_types = Vec::new();
        while cursor.position() < end {
            serial_types.push(cursor.read_varint()?);
        }

        if cursor.position() != end {
            return Err(SqliteError::MalformedRecordHeader {
                header_size,
                position: cursor.position() - start,
            });
        }

        Ok(Self {
            header_size,
            serial_types,
        })
    }
}

/// A record decoded into typed column values.
#[derive(Debug, Clone, PartialEq)]
pub struct Record<'a> {
    pub header: RecordHeader,
    pub values: Vec<Value<'a>>,
}

impl<'a> Record<'a> {
    /// Decodes the record at the start of `data`.
    pub fn parse(data: &'a [u8], encoding: TextEncoding) -> Result<Self> {
        let mut cursor = Cursor::new(data);
        let header = RecordHeader::read(&mut cursor)?;

        let values = header
            .serial_types
            .iter()
            .map(|&code| read_value(&mut cursor, code, encoding))
            .collect::<Result<Vec<_>>>()?;

        trace!(
            serial_types = ?header.serial_types,
            body_end = cursor.position(),
            "Decoded record"
        );
        Ok(Self { header, values })
    }

    pub fn column_count(&self) -> usize {
        self.values.len()
    }

    pub fn column(&self, index: usize) -> Option<&Value<'a>> {
        self.values.get(index)
    }
}

fn read_value<'a>(cursor: &mut Cursor<'a>, code: u64, encoding: TextEncoding) -> Result<Value<'a>> {
    let serial_type = SerialType::try_from(code)?;
    let bytes = cursor.read_bytes(serial_type.size())?;

    Ok(match serial_type {
        SerialType::Null => Value::Null,
        SerialType::Zero => Value::Integer(0),
        SerialType::One => Value::Integer(1),
        SerialType::Int8
        | SerialType::Int16
        | SerialType::Int24
        | SerialType::Int32
        | SerialType::Int48
        | SerialType::Int64 => Value::Integer(read_signed(bytes)),
        SerialType::Float64 => {
            let mut buf = [0u8; 8];
            buf.copy_from_slice(bytes);
            Value::Float(f64::from_be_bytes(buf))
        }
        SerialType::Text(_) => Value::Text(encoding.decode(bytes)?),
        SerialType::Blob(_) => Value::Blob(bytes),
    })
}

/// Big-endian two's complement integer of 1 to 8 bytes.
fn read_signed(bytes: &[u8]) -> i64 {
    let negative = bytes.first().is_some_and(|b| b & 0x80 != 0);
    let init = if negative { -1i64 } else { 0 };
    bytes.iter().fold(init, |acc, &b| (acc << 8) | b as i64)
}
