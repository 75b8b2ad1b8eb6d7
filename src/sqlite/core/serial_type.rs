//! Record serial types.
//!
//! - 0: NULL
//! - 1: 8-bit signed int
//! - 2: 16-bit signed int
//! - 3: 24-bit signed int
//! - 4: 32-bit signed int
//! - 5: 48-bit signed int
//! - 6: 64-bit signed int
//! - 7: IEEE 754 64-bit float
//! - 8: the integer 0, no stored bytes
//! - 9: the integer 1, no stored bytes
//! - 10,11: reserved for internal use
//! - N >= 12, even: BLOB of (N-12)/2 bytes
//! - N >= 13, odd: TEXT of (N-13)/2 bytes

use crate::sqlite::error::{Result, SqliteError};

/// Storage class and width of one record column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SerialType {
    Null,
    Int8,
    Int16,
    Int24,
    Int32,
    Int48,
    Int64,
    Float64,
    Zero,
    One,
    Blob(usize),
    Text(usize),
}

impl SerialType {
    /// Number of body bytes a column of this type occupies.
    pub fn size(&self) -> usize {
        match self {
            SerialType::Null | SerialType::Zero | SerialType::One => 0,
            SerialType::Int8 => 1,
            SerialType::Int16 => 2,
            SerialType::Int24 => 3,
            SerialType::Int32 => 4,
            SerialType::Int48 => 6,
            SerialType::Int64 | SerialType::Float64 => 8,
            SerialType::Blob(len) | SerialType::Text(len) => *len,
        }
    }
}

impl TryFrom<u64> for SerialType {
    type Error = SqliteError;

    fn try_from(code: u64) -> Result<Self> {
        Ok(match code {
            0 => SerialType::Null,
            1 => SerialType::Int8,
            2 => SerialType::Int16,
            3 => SerialType::Int24,
            4 => SerialType::Int32,
            5 => SerialType::Int48,
            6 => SerialType::Int64,
            7 => SerialType::Float64,
            8 => SerialType::Zero,
            9 => SerialType::One,
            10 | 11 => return Err(SqliteError::ReservedSerialType(code)),
            n if n % 2 == 0 => SerialType::Blob(((n - 12) / 2) as usize),
            n => SerialType::Text(((n - 13) / 2) as usize),
        })
    }
}

/// Byte width of the column described by serial type `code`.
pub fn size_of(code: u64) -> Result<usize> {
    SerialType::try_from(code).map(|serial_type| serial_type.size())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_width_sizes() {
        let expected = [0, 1, 2, 3, 4, 6, 8, 8, 0, 0];
        for (code, size) in expected.into_iter().enumerate() {
            assert_eq!(size_of(code as u64).unwrap(), size, "serial type {}", code);
        }
    }

    #[test]
    fn variable_width_sizes() {
        assert_eq!(size_of(12).unwrap(), 0);
        assert_eq!(size_of(13).unwrap(), 0);
        assert_eq!(size_of(23).unwrap(), 5);
        assert_eq!(size_of(24).unwrap(), 6);
        assert_eq!(SerialType::try_from(23).unwrap(), SerialType::Text(5));
        assert_eq!(SerialType::try_from(24).unwrap(), SerialType::Blob(6));
    }

    #[test]
    fn reserved_codes_are_rejected() {
        assert_eq!(size_of(10), Err(SqliteError::ReservedSerialType(10)));
        assert_eq!(size_of(11), Err(SqliteError::ReservedSerialType(11)));
    }
}
