//! Read-only view of a database file held in memory.
//!
//! A SQLite database file consists of one or more pages. The first page (page 1) contains:
//!
//! - Database header (100 bytes)
//! - First page of the sqlite_schema table

use tracing::info;

use super::btree::{BTreePage, Cell, PageType};
use super::core::header::DatabaseHeader;
use super::core::record::Value;
use super::core::schema::{SchemaEntry, INTERNAL_PREFIX, SCHEMA_TBL_NAME_COLUMN};
use super::error::Result;

/// The database header and page 1, decoded from one buffer.
#[derive(Debug, Clone)]
pub struct Database<'a> {
    header: DatabaseHeader,
    page: BTreePage<'a>,
}

impl<'a> Database<'a> {
    /// Decodes the header and the first page of `buffer`.
    ///
    /// `buffer` may hold the whole file or just its first page. When it is
    /// shorter than the declared page size the whole buffer is treated as
    /// page 1.
    pub fn new(buffer: &'a [u8]) -> Result<Self> {
        let header = DatabaseHeader::parse(buffer)?;
        let encoding = header.encoding();

        let page_len = (header.page_size() as usize).min(buffer.len());
        let page = BTreePage::parse(&buffer[..page_len], true, encoding)?;

        info!(
            page_size = header.page_size(),
            cells = page.num_cells(),
            "Opened database"
        );
        Ok(Self { header, page })
    }

    pub fn header(&self) -> &DatabaseHeader {
        &self.header
    }

    /// Page size in bytes
    pub fn page_size(&self) -> u32 {
        self.header.page_size()
    }

    /// Page 1, the root of the sqlite_schema table
    pub fn first_page(&self) -> &BTreePage<'a> {
        &self.page
    }

    pub fn page_type(&self) -> PageType {
        self.page.page_type()
    }

    pub fn cell_count(&self) -> u16 {
        self.page.num_cells()
    }

    /// Decodes every cell on page 1.
    pub fn cells(&self) -> Result<Vec<Cell<'a>>> {
        self.page.cells()
    }

    /// Number of tables, when page 1 is a table leaf and so holds every
    /// schema row itself.
    pub fn table_count(&self) -> Option<u16> {
        (self.page_type() == PageType::LeafTable).then(|| self.cell_count())
    }

    /// Names from the tbl_name column of every schema row, in cell order,
    /// skipping names that start with `sqlite_`.
    pub fn table_names(&self) -> Result<Vec<String>> {
        let names = self
            .cells()?
            .iter()
            .filter_map(|cell| cell.record.column(SCHEMA_TBL_NAME_COLUMN))
            .filter_map(Value::as_text)
            .filter(|name| !name.starts_with(INTERNAL_PREFIX))
            .map(str::to_string)
            .collect();
        Ok(names)
    }

    /// Every row of page 1 that reads as a schema entry.
    pub fn schema(&self) -> Result<Vec<SchemaEntry>> {
        let entries = self
            .cells()?
            .iter()
            .filter_map(|cell| SchemaEntry::from_record(&cell.record))
            .collect();
        Ok(entries)
    }
}
