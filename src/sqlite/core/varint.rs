//! SQLite variable-length integers.
//!
//! A varint is 1 to 9 bytes long. Each of the first eight bytes carries 7 data
//! bits in big-endian order, with the high bit set when another byte follows.
//! A ninth byte, if reached, contributes all 8 of its bits.

use crate::sqlite::error::{Result, SqliteError};

/// Longest possible encoding.
pub const VARINT_MAX_BYTES: usize = 9;

const CONTINUATION_BIT: u8 = 0x80;
const DATA_MASK: u8 = 0x7f;

/// Utility functions for handling SQLite variable-length integers (varints)
pub trait Varint {
    /// Decodes the varint at the start of the slice.
    ///
    /// Returns the value and the number of bytes it occupied.
    fn read_varint(&self) -> Result<(u64, usize)>;
}

impl Varint for [u8] {
    fn read_varint(&self) -> Result<(u64, usize)> {
        decode(self)
    }
}

/// Decodes the varint at the start of `bytes`.
///
/// Fails with [`SqliteError::VarintTruncated`] (offset 0, relative to `bytes`)
/// when the encoding is cut short by the end of the slice.
pub fn decode(bytes: &[u8]) -> Result<(u64, usize)> {
    let mut value = 0u64;

    for (i, &byte) in bytes.iter().take(VARINT_MAX_BYTES).enumerate() {
        if i == VARINT_MAX_BYTES - 1 {
            value = (value << 8) | byte as u64;
            return Ok((value, VARINT_MAX_BYTES));
        }

        value = (value << 7) | (byte & DATA_MASK) as u64;
        if byte & CONTINUATION_BIT == 0 {
            return Ok((value, i + 1));
        }
    }

    Err(SqliteError::VarintTruncated { offset: 0 })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_byte_values_decode_to_themselves() {
        for v in 0u8..0x80 {
            assert_eq!(decode(&[v, 0xff]).unwrap(), (v as u64, 1));
        }
    }

    #[test]
    fn two_byte_values_combine_low_bits() {
        let cases = [(0x81u8, 0x00u8), (0x81, 0x7f), (0xff, 0x7f), (0x80, 0x01)];
        for (b0, b1) in cases {
            let expected = (((b0 & 0x7f) as u64) << 7) | (b1 & 0x7f) as u64;
            assert_eq!(decode(&[b0, b1]).unwrap(), (expected, 2));
        }
    }

    #[test]
    fn schema_record_sizes() {
        // 0x81 0x47 is a typical payload size for a sqlite_schema row.
        assert_eq!([0x81u8, 0x47].read_varint().unwrap(), (199, 2));
    }

    #[test]
    fn three_byte_value() {
        assert_eq!(decode(&[0x81, 0x80, 0x00]).unwrap(), (1 << 14, 3));
    }

    #[test]
    fn ninth_byte_uses_all_eight_bits() {
        let bytes = [0xff; 9];
        assert_eq!(decode(&bytes).unwrap(), (u64::MAX, 9));

        let mut bytes = [0x80u8; 9];
        bytes[8] = 0xff;
        assert_eq!(decode(&bytes).unwrap(), (0xff, 9));
    }

    #[test]
    fn truncated_encoding_is_an_error() {
        assert_eq!(
            decode(&[0x81, 0x82]),
            Err(SqliteError::VarintTruncated { offset: 0 })
        );
        assert_eq!(
            decode(&[]),
            Err(SqliteError::VarintTruncated { offset: 0 })
        );
    }
}
