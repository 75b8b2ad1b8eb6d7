//! Byte-level decoders for the SQLite file format.

pub mod cursor;
pub mod header;
pub mod record;
pub mod schema;
pub mod serial_type;
pub mod varint;
