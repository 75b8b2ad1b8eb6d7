//! B-tree pages.
//!
//! ## B-tree Page Structure
//!
//! Each page in the database file is a B-tree page that contains:
//!
//! - Page header (8 bytes for leaves, 12 for interior pages)
//! - Cell pointer array
//! - Unallocated space
//! - Cell content area
//! - Reserved region
//!
//! On page 1 the 100-byte database header comes first and the page header
//! starts at byte 100. Cell pointers are still measured from byte 0 of the
//! page, so two coordinate systems are in play: offsets relative to the page
//! header, and [`PageOffset`]s relative to the page region itself.

use tracing::{debug, trace};

use crate::sqlite::core::cursor::Cursor;
use crate::sqlite::core::header::{DatabaseHeader, TextEncoding};
use crate::sqlite::core::record::Record;
use crate::sqlite::error::{Result, SqliteError};

/// Kind of b-tree page, from byte 0 of the page header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageType {
    InteriorIndex,
    InteriorTable,
    LeafIndex,
    LeafTable,
}

impl TryFrom<u8> for PageType {
    type Error = SqliteError;

    fn try_from(code: u8) -> Result<Self> {
        match code {
            2 => Ok(PageType::InteriorIndex),
            5 => Ok(PageType::InteriorTable),
            10 => Ok(PageType::LeafIndex),
            13 => Ok(PageType::LeafTable),
            other => Err(SqliteError::UnsupportedPageType(other)),
        }
    }
}

impl PageType {
    pub fn code(&self) -> u8 {
        match self {
            PageType::InteriorIndex => 2,
            PageType::InteriorTable => 5,
            PageType::LeafIndex => 10,
            PageType::LeafTable => 13,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, PageType::LeafIndex | PageType::LeafTable)
    }

    /// Length of the page header for this kind of page.
    pub fn header_size(&self) -> usize {
        if self.is_leaf() {
            8
        } else {
            12
        }
    }
}

/// Represents a B-tree page header
///
/// ## B-tree Page Header Format
///
/// - Byte 0: Page type
/// - Bytes 1-2: First freeblock offset
/// - Bytes 3-4: Number of cells
/// - Bytes 5-6: Cell content offset
/// - Byte 7: Number of fragmented free bytes
/// - Bytes 8-11: Right-most child page (interior pages only)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BTreePageHeader {
    pub page_type: PageType,
    /// Offset to first freeblock
    pub first_freeblock: u16,
    /// Number of cells in page
    pub num_cells: u16,
    /// Offset to cell content area
    pub content_offset: u16,
    /// Number of fragmented free bytes
    pub fragmented_free_bytes: u8,
    pub right_most_pointer: Option<u32>,
}

impl BTreePageHeader {
    /// Parse a B-tree page header from a byte slice
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut cursor = Cursor::new(data);
        let page_type = PageType::try_from(cursor.read_u8()?)?;

        let mut header = Self {
            page_type,
            first_freeblock: cursor.read_u16_be()?,
            num_cells: cursor.read_u16_be()?,
            content_offset: cursor.read_u16_be()?,
            fragmented_free_bytes: cursor.read_u8()?,
            right_most_pointer: None,
        };
        if !page_type.is_leaf() {
            header.right_most_pointer = Some(cursor.read_u32_be()?);
        }

        Ok(header)
    }
}

/// Byte offset measured from the first byte of a page as stored on disk.
///
/// On page 1 this includes the 100-byte database header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PageOffset(pub usize);

/// A table leaf cell: payload size, row id, and the record itself.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell<'a> {
    pub offset: PageOffset,
    pub record_size: u64,
    pub row_id: i64,
    pub record: Record<'a>,
}

impl<'a> Cell<'a> {
    /// Decodes the table leaf cell starting at `offset` within `page`.
    ///
    /// The payload size is taken as-is; the record reads whatever bytes follow
    /// the row id.
    pub fn parse(page: &'a [u8], offset: PageOffset, encoding: TextEncoding) -> Result<Self> {
        let data = page.get(offset.0..).ok_or(SqliteError::OutOfBounds {
            offset: offset.0,
            len: 0,
            available: page.len(),
        })?;

        let mut cursor = Cursor::new(data);
        let record_size = cursor.read_varint()?;
        // Row ids are stored as the two's complement bits of an i64.
        let row_id = cursor.read_varint()? as i64;
        let record = Record::parse(cursor.remaining(), encoding)?;

        trace!(offset = offset.0, record_size, row_id, "Parsed cell");
        Ok(Self {
            offset,
            record_size,
            row_id,
            record,
        })
    }
}

/// Represents a B-tree page in SQLite
#[derive(Debug, Clone)]
pub struct BTreePage<'a> {
    /// Raw page region, starting at the page's first byte on disk
    data: &'a [u8],
    /// Where the page header starts: 100 on page 1, 0 elsewhere
    header_offset: usize,
    header: BTreePageHeader,
    cell_pointers: Vec<PageOffset>,
    encoding: TextEncoding,
}

impl<'a> BTreePage<'a> {
    /// Decodes the header and cell pointer array of the page occupying `data`.
    ///
    /// Cell bodies are left alone until [`BTreePage::cells`] is called.
    pub fn parse(data: &'a [u8], is_first_page: bool, encoding: TextEncoding) -> Result<Self> {
        let header_offset = if is_first_page {
            DatabaseHeader::HEADER_SIZE
        } else {
            0
        };

        let header_bytes = data.get(header_offset..).ok_or(SqliteError::OutOfBounds {
            offset: header_offset,
            len: PageType::LeafTable.header_size(),
            available: data.len(),
        })?;
        let header = BTreePageHeader::parse(header_bytes).map_err(|err| match err {
            SqliteError::OutOfBounds { offset, len, .. } => SqliteError::OutOfBounds {
                offset: header_offset + offset,
                len,
                available: data.len(),
            },
            other => other,
        })?;
        debug!(
            page_type = header.page_type.code(),
            num_cells = header.num_cells,
            "Parsed page header"
        );

        let mut page = Self {
            data,
            header_offset,
            header,
            cell_pointers: Vec::new(),
            encoding,
        };
        page.cell_pointers = page.read_cell_pointers()?;

        Ok(page)
    }

    /// Converts an offset measured from the page header into one measured
    /// from the start of the page region.
    pub fn to_absolute(&self, header_relative: usize) -> PageOffset {
        PageOffset(self.header_offset + header_relative)
    }

    /// Reads the cell pointer array that follows the page header.
    fn read_cell_pointers(&self) -> Result<Vec<PageOffset>> {
        let cursor = Cursor::new(self.data);
        let array_start = self.to_absolute(self.header.page_type.header_size());

        let pointers = (0..self.header.num_cells as usize)
            .map(|i| {
                cursor
                    .u16_be_at(array_start.0 + i * 2)
                    .map(|ptr| PageOffset(ptr as usize))
            })
            .collect::<Result<Vec<_>>>()?;

        trace!(?pointers, "Read cell pointers");
        Ok(pointers)
    }

    pub fn header(&self) -> &BTreePageHeader {
        &self.header
    }

    /// Returns the page type
    pub fn page_type(&self) -> PageType {
        self.header.page_type
    }

    /// Returns number of cells in the page
    pub fn num_cells(&self) -> u16 {
        self.header.num_cells
    }

    pub fn header_offset(&self) -> usize {
        self.header_offset
    }

    pub fn cell_pointers(&self) -> &[PageOffset] {
        &self.cell_pointers
    }

    /// Decodes every cell in cell pointer order. Empty unless this is a
    /// table leaf. Fails on the first cell that does not decode.
    pub fn cells(&self) -> Result<Vec<Cell<'a>>> {
        if self.header.page_type != PageType::LeafTable {
            return Ok(Vec::new());
        }
        self.cell_pointers
            .iter()
            .map(|&offset| Cell::parse(self.data, offset, self.encoding))
            .collect()
    }

    /// Gets raw page data
    pub fn data(&self) -> &'a [u8] {
        self.data
    }
}
