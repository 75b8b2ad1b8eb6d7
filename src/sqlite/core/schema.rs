use tracing::debug;

use super::record::{Record, Value};

/// Column positions in a `sqlite_schema` row.
pub const SCHEMA_TYPE_COLUMN: usize = 0;
pub const SCHEMA_NAME_COLUMN: usize = 1;
pub const SCHEMA_TBL_NAME_COLUMN: usize = 2;
pub const SCHEMA_ROOTPAGE_COLUMN: usize = 3;
pub const SCHEMA_SQL_COLUMN: usize = 4;

/// Prefix reserved for tables SQLite creates for itself.
pub const INTERNAL_PREFIX: &str = "sqlite_";

/// One row of the `sqlite_schema` table.
///
/// The schema table has 5 columns in order:
/// - type: "table", "index", "view" or "trigger"
/// - name: name of the object
/// - tbl_name: table the object belongs to
/// - rootpage: page number of root b-tree
/// - sql: CREATE statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaEntry {
    pub kind: String,
    pub name: String,
    pub tbl_name: String,
    pub root_page: Option<i64>,
    pub sql: Option<String>,
}

impl SchemaEntry {
    /// Interprets a record as a schema row. Returns `None` when the text
    /// columns are missing.
    pub fn from_record(record: &Record<'_>) -> Option<Self> {
        let text = |index: usize| record.column(index).and_then(Value::as_text).map(String::from);

        let entry = SchemaEntry {
            kind: text(SCHEMA_TYPE_COLUMN)?,
            name: text(SCHEMA_NAME_COLUMN)?,
            tbl_name: text(SCHEMA_TBL_NAME_COLUMN)?,
            root_page: record
                .column(SCHEMA_ROOTPAGE_COLUMN)
                .and_then(Value::as_integer),
            sql: text(SCHEMA_SQL_COLUMN),
        };
        debug!("Schema entry: {} {} on {}", entry.kind, entry.name, entry.tbl_name);
        Some(entry)
    }

    pub fn is_internal(&self) -> bool {
        self.tbl_name.starts_with(INTERNAL_PREFIX)
    }
}
