//! Builders for synthetic database files.

#![allow(dead_code)]

pub const UTF8: u32 = 1;
pub const UTF16LE: u32 = 2;
pub const UTF16BE: u32 = 3;

/// A column value to encode into a record.
#[derive(Debug, Clone)]
pub enum Column {
    Null,
    Int(i64),
    Float(f64),
    Text(String),
    Blob(Vec<u8>),
}

pub fn text(s: &str) -> Column {
    Column::Text(s.to_string())
}

pub fn encode_varint(value: u64) -> Vec<u8> {
    if value > 0x00ff_ffff_ffff_ffff {
        let high = value >> 8;
        let mut out: Vec<u8> = (0..8)
            .rev()
            .map(|i| ((high >> (i * 7)) & 0x7f) as u8 | 0x80)
            .collect();
        out.push(value as u8);
        return out;
    }

    let mut out = vec![(value & 0x7f) as u8];
    let mut rest = value >> 7;
    while rest > 0 {
        out.push((rest & 0x7f) as u8 | 0x80);
        rest >>= 7;
    }
    out.reverse();
    out
}

fn encode_text(s: &str, encoding: u32) -> Vec<u8> {
    match encoding {
        UTF16LE => s.encode_utf16().flat_map(u16::to_le_bytes).collect(),
        UTF16BE => s.encode_utf16().flat_map(u16::to_be_bytes).collect(),
        _ => s.as_bytes().to_vec(),
    }
}

fn encode_column(column: &Column, encoding: u32) -> (u64, Vec<u8>) {
    match column {
        Column::Null => (0, Vec::new()),
        Column::Int(0) => (8, Vec::new()),
        Column::Int(1) => (9, Vec::new()),
        Column::Int(v) => {
            let (serial_type, width) = match *v {
                v if i8::try_from(v).is_ok() => (1, 1),
                v if i16::try_from(v).is_ok() => (2, 2),
                v if (-(1 << 23)..(1 << 23)).contains(&v) => (3, 3),
                v if i32::try_from(v).is_ok() => (4, 4),
                v if (-(1 << 47)..(1 << 47)).contains(&v) => (5, 6),
                _ => (6, 8),
            };
            (serial_type, v.to_be_bytes()[8 - width..].to_vec())
        }
        Column::Float(f) => (7, f.to_be_bytes().to_vec()),
        Column::Text(s) => {
            let bytes = encode_text(s, encoding);
            (bytes.len() as u64 * 2 + 13, bytes)
        }
        Column::Blob(b) => (b.len() as u64 * 2 + 12, b.clone()),
    }
}

/// Encodes a record: header size, serial types, then the body.
pub fn encode_record(columns: &[Column], encoding: u32) -> Vec<u8> {
    let encoded: Vec<(u64, Vec<u8>)> = columns.iter().map(|c| encode_column(c, encoding)).collect();
    let types: Vec<u8> = encoded.iter().flat_map(|(t, _)| encode_varint(*t)).collect();

    let mut size_len = 1;
    let header_size = loop {
        let total = types.len() + size_len;
        let len = encode_varint(total as u64).len();
        if len == size_len {
            break total;
        }
        size_len = len;
    };

    let mut record = encode_varint(header_size as u64);
    record.extend_from_slice(&types);
    for (_, body) in &encoded {
        record.extend_from_slice(body);
    }
    record
}

/// Encodes a table leaf cell around `record`.
pub fn encode_cell(row_id: u64, record: &[u8]) -> Vec<u8> {
    let mut cell = encode_varint(record.len() as u64);
    cell.extend(encode_varint(row_id));
    cell.extend_from_slice(record);
    cell
}

/// A `sqlite_schema` row for a table.
pub fn schema_row(name: &str, root_page: i64) -> Vec<Column> {
    vec![
        text("table"),
        text(name),
        text(name),
        Column::Int(root_page),
        text(&format!("CREATE TABLE {}(id integer primary key, name text)", name)),
    ]
}

/// Builds page 1 of a database: the 100-byte header followed by a b-tree
/// page holding one cell per row, with row ids starting at 1.
pub struct DatabaseBuilder {
    pub page_size: u16,
    pub page_type: u8,
    pub text_encoding: u32,
    pub rows: Vec<Vec<Column>>,
}

impl DatabaseBuilder {
    pub fn new() -> Self {
        Self {
            page_size: 4096,
            page_type: 13,
            text_encoding: UTF8,
            rows: Vec::new(),
        }
    }

    pub fn page_size(mut self, page_size: u16) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn page_type(mut self, page_type: u8) -> Self {
        self.page_type = page_type;
        self
    }

    pub fn text_encoding(mut self, text_encoding: u32) -> Self {
        self.text_encoding = text_encoding;
        self
    }

    pub fn row(mut self, columns: Vec<Column>) -> Self {
        self.rows.push(columns);
        self
    }

    pub fn table(self, name: &str) -> Self {
        let root_page = self.rows.len() as i64 + 2;
        self.row(schema_row(name, root_page))
    }

    pub fn build(&self) -> Vec<u8> {
        let page_len = match self.page_size {
            1 => 65536,
            size => size as usize,
        };
        let mut page = vec![0u8; page_len];

        page[..16].copy_from_slice(b"SQLite format 3\0");
        page[16..18].copy_from_slice(&self.page_size.to_be_bytes());
        page[18] = 1;
        page[19] = 1;
        page[28..32].copy_from_slice(&1u32.to_be_bytes());
        page[56..60].copy_from_slice(&self.text_encoding.to_be_bytes());

        let header_offset = 100;
        let header_size = if self.page_type == 2 || self.page_type == 5 { 12 } else { 8 };

        let mut content_start = page_len;
        let mut pointers = Vec::new();
        for (i, row) in self.rows.iter().enumerate() {
            let cell = encode_cell(i as u64 + 1, &encode_record(row, self.text_encoding));
            content_start -= cell.len();
            page[content_start..content_start + cell.len()].copy_from_slice(&cell);
            pointers.push(content_start as u16);
        }

        page[header_offset] = self.page_type;
        page[header_offset + 3..header_offset + 5]
            .copy_from_slice(&(pointers.len() as u16).to_be_bytes());
        page[header_offset + 5..header_offset + 7]
            .copy_from_slice(&(content_start as u16).to_be_bytes());
        for (i, ptr) in pointers.iter().enumerate() {
            let at = header_offset + header_size + i * 2;
            page[at..at + 2].copy_from_slice(&ptr.to_be_bytes());
        }
        page
    }
}
