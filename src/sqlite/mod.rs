//! SQLite File Format Implementation
//!
//! This module implements parsing of SQLite database files according to the SQLite file format specification.
//!
//! Decoding runs leaf-first over one in-memory buffer:
//!
//! 1. [`DatabaseHeader`](self::core::header::DatabaseHeader) reads the first 100 bytes (page size, text encoding)
//! 2. [`btree::BTreePage`] reads page 1's header and cell pointer array
//! 3. [`btree::Cell`] reads each cell's payload size and row id
//! 4. [`Record`](self::core::record::Record) reads the serial types and typed column values
//!
//! [`db::Database`] ties these together. Nothing here performs I/O.

pub mod btree;
pub mod core;
pub mod db;
pub mod error;

pub use db::Database;
pub use error::{Result, SqliteError};
