//! Flat view of an sfnt's tables.

use read_fonts::FontRef;

use crate::{Error, Result};

pub(crate) struct SfntTable<'a> {
    pub tag: [u8; 4],
    pub checksum: u32,
    pub data: &'a [u8],
}

pub(crate) struct SfntTables<'a> {
    pub flavor: u32,
    /// Sorted by tag.
    pub tables: Vec<SfntTable<'a>>,
}

impl<'a> SfntTables<'a> {
    pub fn parse(data: &'a [u8]) -> Result<Self> {
        let font = FontRef::new(data)?;
        let flavor = font.table_directory.sfnt_version();

        let mut tables = Vec::new();
        for record in font.table_directory.table_records() {
            let tag = record.tag();
            let data = font
                .table_data(tag)
                .ok_or_else(|| Error::MissingTableData(tag.to_string()))?;
            tables.push(SfntTable {
                tag: tag.to_be_bytes(),
                checksum: record.checksum(),
                data: data.as_bytes(),
            });
        }
        tables.sort_by_key(|table| table.tag);

        Ok(Self { flavor, tables })
    }

    /// Size of the sfnt that a decoder reconstructs from these tables.
    pub fn total_sfnt_size(&self) -> usize {
        12 + 16 * self.tables.len() + self.tables.iter().map(|t| padded_len(t.data.len())).sum::<usize>()
    }
}

pub(crate) fn padded_len(len: usize) -> usize {
    (len + 3) & !3
}

pub(crate) fn pad4(buffer: &mut Vec<u8>) {
    buffer.resize(padded_len(buffer.len()), 0);
}
