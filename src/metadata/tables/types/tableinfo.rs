//! Row counts and index widths of the `#~` stream.
//!
//! Column widths in the tables stream depend on the size of the heaps and on the row counts of
//! the referenced tables. [`TableInfo`] holds both and answers width questions for every column
//! kind.

use std::sync::Arc;

use strum::{EnumCount, IntoEnumIterator};

use crate::{
    file::io::{read_le, read_le_at},
    metadata::tables::types::{
        tableid::{Column, MAX_TABLE_ID},
        CodedIndexType, TableId,
    },
    Error::NotSupported,
    Result,
};

/// Heap size flag: `#Strings` indices are 4 bytes
const HEAP_LARGE_STRINGS: u8 = 0x01;
/// Heap size flag: `#GUID` indices are 4 bytes
const HEAP_LARGE_GUID: u8 = 0x02;
/// Heap size flag: `#Blob` indices are 4 bytes
const HEAP_LARGE_BLOB: u8 = 0x04;
/// Heap size flag: four extra bytes follow the row counts
const HEAP_EXTRA_DATA: u8 = 0x40;

/// Row count of one table and the number of bits needed to index it.
#[derive(Clone, Copy, Default, PartialEq, Debug)]
pub struct TableRowInfo {
    /// Number of rows
    pub rows: u32,
    /// Bits needed to represent the largest row index
    pub bits: u8,
    /// True if a simple index into this table takes 4 bytes
    pub is_large: bool,
}

impl TableRowInfo {
    /// Describe a table with `rows` rows
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn new(rows: u32) -> Self {
        let bits = if rows == 0 {
            1
        } else {
            (32 - rows.leading_zeros()) as u8
        };

        Self {
            rows,
            bits,
            is_large: bits > 16,
        }
    }
}

/// Sizes of all tables and heaps of one module.
#[derive(Clone, Default)]
pub struct TableInfo {
    rows: Vec<TableRowInfo>,
    coded_indexes: Vec<u8>,
    is_large_index_str: bool,
    is_large_index_guid: bool,
    is_large_index_blob: bool,
    tables_offset: usize,
}

/// Shared handle to a [`TableInfo`]
pub type TableInfoRef = Arc<TableInfo>;

impl TableInfo {
    /// Read the row counts and heap flags from the start of the `#~` stream
    ///
    /// ## Arguments
    /// * 'data'         - The `#~` stream
    /// * 'valid_bitvec' - Bit vector of present tables
    ///
    /// # Errors
    /// Returns [`crate::Error::NotSupported`] if tables beyond `GenericParamConstraint` are
    /// present, or an error if the row counts run past the stream
    pub fn new(data: &[u8], valid_bitvec: u64) -> Result<Self> {
        if valid_bitvec >> (MAX_TABLE_ID + 1) != 0 {
            return Err(NotSupported);
        }

        let mut rows = vec![TableRowInfo::default(); TableId::COUNT];
        let mut next_row_offset = 24;

        for table_id in TableId::iter() {
            if (valid_bitvec & (1 << table_id as usize)) == 0 {
                continue;
            }

            let row_count = read_le_at::<u32>(data, &mut next_row_offset)?;
            rows[table_id as usize] = TableRowInfo::new(row_count);
        }

        let heap_size_flags = read_le::<u8>(&data[6..])?;
        if heap_size_flags & HEAP_EXTRA_DATA != 0 {
            next_row_offset += 4;
        }

        let mut table_info = TableInfo {
            rows,
            coded_indexes: vec![0; CodedIndexType::COUNT],
            is_large_index_str: heap_size_flags & HEAP_LARGE_STRINGS != 0,
            is_large_index_guid: heap_size_flags & HEAP_LARGE_GUID != 0,
            is_large_index_blob: heap_size_flags & HEAP_LARGE_BLOB != 0,
            tables_offset: next_row_offset,
        };

        table_info.calculate_coded_index_bits();

        Ok(table_info)
    }

    /// Build a `TableInfo` from explicit row counts
    #[cfg(test)]
    pub fn new_test(
        valid_tables: &[(TableId, u32)],
        large_str: bool,
        large_blob: bool,
        large_guid: bool,
    ) -> Self {
        let mut table_info = TableInfo {
            rows: vec![TableRowInfo::default(); TableId::COUNT],
            coded_indexes: vec![0; CodedIndexType::COUNT],
            is_large_index_str: large_str,
            is_large_index_guid: large_guid,
            is_large_index_blob: large_blob,
            tables_offset: 24,
        };

        for valid_table in valid_tables {
            table_info.rows[valid_table.0 as usize] = TableRowInfo::new(valid_table.1);
        }

        table_info.calculate_coded_index_bits();
        table_info
    }

    fn calculate_coded_index_bits(&mut self) {
        for ci_type in CodedIndexType::iter() {
            let max_bits = ci_type
                .tables()
                .iter()
                .map(|table| self.rows[*table as usize].bits)
                .max()
                .unwrap_or(1);

            self.coded_indexes[ci_type as usize] = max_bits + ci_type.tag_bits();
        }
    }

    /// Split a raw coded index into table and row
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the tag is not defined for `coded_index_type`
    pub fn decode_coded_index(
        &self,
        value: u32,
        coded_index_type: CodedIndexType,
    ) -> Result<(TableId, u32)> {
        let tag_bits = coded_index_type.tag_bits();
        let tag = value & ((1 << tag_bits) - 1);
        let row = value >> tag_bits;

        match coded_index_type.table_for_tag(tag) {
            Some(table) => Ok((table, row)),
            None => Err(malformed_error!(
                "Invalid tag {} for coded index {:?}",
                tag,
                coded_index_type
            )),
        }
    }

    /// Offset of the first table row, relative to the start of the `#~` stream
    #[must_use]
    pub fn tables_offset(&self) -> usize {
        self.tables_offset
    }

    /// Row information of `table`
    #[must_use]
    pub fn get(&self, table: TableId) -> &TableRowInfo {
        &self.rows[table as usize]
    }

    /// True if `#Strings` indices are 4 bytes
    #[must_use]
    pub fn is_large_str(&self) -> bool {
        self.is_large_index_str
    }

    /// True if `#GUID` indices are 4 bytes
    #[must_use]
    pub fn is_large_guid(&self) -> bool {
        self.is_large_index_guid
    }

    /// True if `#Blob` indices are 4 bytes
    #[must_use]
    pub fn is_large_blob(&self) -> bool {
        self.is_large_index_blob
    }

    /// True if simple indices into `table_id` are 4 bytes
    #[must_use]
    pub fn is_large(&self, table_id: TableId) -> bool {
        self.rows[table_id as usize].is_large
    }

    /// Width of a `#Strings` index
    #[must_use]
    pub fn str_bytes(&self) -> u8 {
        if self.is_large_index_str {
            4
        } else {
            2
        }
    }

    /// Width of a `#GUID` index
    #[must_use]
    pub fn guid_bytes(&self) -> u8 {
        if self.is_large_index_guid {
            4
        } else {
            2
        }
    }

    /// Width of a `#Blob` index
    #[must_use]
    pub fn blob_bytes(&self) -> u8 {
        if self.is_large_index_blob {
            4
        } else {
            2
        }
    }

    /// Width of a simple index into `table_id`
    #[must_use]
    pub fn table_index_bytes(&self, table_id: TableId) -> u8 {
        if self.is_large(table_id) {
            4
        } else {
            2
        }
    }

    /// Total bits of a coded index of family `coded_index_type`
    #[must_use]
    pub fn coded_index_bits(&self, coded_index_type: CodedIndexType) -> u8 {
        self.coded_indexes[coded_index_type as usize]
    }

    /// Width of a coded index of family `coded_index_type`
    #[must_use]
    pub fn coded_index_bytes(&self, coded_index_type: CodedIndexType) -> u8 {
        if self.coded_index_bits(coded_index_type) > 16 {
            4
        } else {
            2
        }
    }

    /// Width of one row of `table_id`
    #[must_use]
    pub fn row_size(&self, table_id: TableId) -> u32 {
        table_id
            .columns()
            .iter()
            .map(|column| u32::from(self.column_bytes(*column)))
            .sum()
    }

    fn column_bytes(&self, column: Column) -> u8 {
        match column {
            Column::U16 => 2,
            Column::U32 => 4,
            Column::Str => self.str_bytes(),
            Column::Guid => self.guid_bytes(),
            Column::Blob => self.blob_bytes(),
            Column::Table(table) => self.table_index_bytes(table),
            Column::Coded(ci_type) => self.coded_index_bytes(ci_type),
        }
    }
}
