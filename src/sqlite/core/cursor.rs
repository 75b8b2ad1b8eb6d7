//! Position-tracking reader over a borrowed byte buffer.

use super::varint::Varint;
use crate::sqlite::error::{Result, SqliteError};

/// Reads big-endian integers and varints from a byte slice.
///
/// Every `read_*` call advances the position past the bytes it consumed. The
/// `*_at` accessors read at an absolute offset and leave the position alone.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Bytes left between the position and the end of the buffer.
    pub fn remaining(&self) -> &'a [u8] {
        self.data.get(self.position..).unwrap_or_default()
    }

    /// Moves the position forward by `n` bytes.
    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.seek(self.position.saturating_add(n))
    }

    /// Sets the absolute position. Seeking to the end of the buffer is allowed.
    pub fn seek(&mut self, position: usize) -> Result<()> {
        if position > self.data.len() {
            return Err(SqliteError::OutOfBounds {
                offset: position,
                len: 0,
                available: self.data.len(),
            });
        }
        self.position = position;
        Ok(())
    }

    /// Borrows `len` bytes at `offset` without moving.
    pub fn bytes_at(&self, offset: usize, len: usize) -> Result<&'a [u8]> {
        offset
            .checked_add(len)
            .and_then(|end| self.data.get(offset..end))
            .ok_or(SqliteError::OutOfBounds {
                offset,
                len,
                available: self.data.len(),
            })
    }

    pub fn u8_at(&self, offset: usize) -> Result<u8> {
        Ok(self.bytes_at(offset, 1)?[0])
    }

    pub fn u16_be_at(&self, offset: usize) -> Result<u16> {
        let b = self.bytes_at(offset, 2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    pub fn u32_be_at(&self, offset: usize) -> Result<u32> {
        let b = self.bytes_at(offset, 4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        let bytes = self.bytes_at(self.position, len)?;
        self.position += len;
        Ok(bytes)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        let value = self.u8_at(self.position)?;
        self.position += 1;
        Ok(value)
    }

    pub fn read_u16_be(&mut self) -> Result<u16> {
        let value = self.u16_be_at(self.position)?;
        self.position += 2;
        Ok(value)
    }

    pub fn read_u32_be(&mut self) -> Result<u32> {
        let value = self.u32_be_at(self.position)?;
        self.position += 4;
        Ok(value)
    }

    /// Decodes a varint and advances past it.
    pub fn read_varint(&mut self) -> Result<u64> {
        let start = self.position;
        let (value, consumed) = self.remaining().read_varint().map_err(|err| match err {
            SqliteError::VarintTruncated { .. } => SqliteError::VarintTruncated { offset: start },
            other => other,
        })?;
        self.position += consumed;
        Ok(value)
    }
}
