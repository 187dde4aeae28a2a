//! Header of the `#~` stream (ECMA-335 II.24.2.6).
//!
//! After the fixed header come the row counts of the present tables, optionally four bytes
//! of extra data, and then the tables themselves, back to back in table-number order.

use std::sync::Arc;

use strum::{EnumCount, IntoEnumIterator};

use crate::{
    file::io::read_le,
    metadata::tables::{MetadataTable, RowReadable, TableId, TableInfo, TableInfoRef},
    Result,
};

/// The decoded `#~` header with the location of every present table.
///
/// # Examples
///
/// ```rust,no_run
/// use asminfo::metadata::{streams::TablesHeader, tables::CustomAttributeRaw};
///
/// # fn example(tables: &TablesHeader) -> asminfo::Result<()> {
/// if let Some(attributes) = tables.table::<CustomAttributeRaw>() {
///     for row in attributes.iter() {
///         let row = row?;
///         println!("{} on {}", row.constructor.token, row.parent.token);
///     }
/// }
/// # Ok(())
/// # }
/// ```
pub struct TablesHeader<'a> {
    /// Major version of the table schema, 2
    pub major_version: u8,
    /// Minor version of the table schema, 0
    pub minor_version: u8,
    /// Bit vector of present tables
    pub valid: u64,
    /// Bit vector of sorted tables
    pub sorted: u64,
    /// Row counts and index widths
    pub info: TableInfoRef,
    data: &'a [u8],
    table_offsets: Vec<usize>,
}

impl<'a> TablesHeader<'a> {
    /// Read the header and locate all tables in the `#~` stream
    ///
    /// ## Arguments
    /// * 'data' - The `#~` stream
    ///
    /// # Errors
    /// Returns an error if the header is truncated, declares no tables, declares tables this
    /// crate cannot size, or if the tables do not fit the stream
    pub fn from(data: &'a [u8]) -> Result<TablesHeader<'a>> {
        if data.len() < 24 {
            return Err(out_of_bounds_error!());
        }

        let valid_bitvec = read_le::<u64>(&data[8..])?;
        if valid_bitvec == 0 {
            return Err(malformed_error!("No valid rows in any of the tables"));
        }

        let info = Arc::new(TableInfo::new(data, valid_bitvec)?);

        let mut table_offsets = vec![0; TableId::COUNT];
        let mut current_offset = info.tables_offset() as u64;
        for table_id in TableId::iter() {
            table_offsets[table_id as usize] = current_offset as usize;

            let rows = u64::from(info.get(table_id).rows);
            current_offset += rows * u64::from(info.row_size(table_id));
        }

        if current_offset > data.len() as u64 {
            return Err(malformed_error!(
                "Tables need {} bytes but the #~ stream holds only {}",
                current_offset,
                data.len()
            ));
        }

        Ok(TablesHeader {
            major_version: read_le::<u8>(&data[4..])?,
            minor_version: read_le::<u8>(&data[5..])?,
            valid: valid_bitvec,
            sorted: read_le::<u64>(&data[16..])?,
            info,
            data,
            table_offsets,
        })
    }

    /// Number of present tables
    #[must_use]
    pub fn table_count(&self) -> u32 {
        self.valid.count_ones()
    }

    /// Check if `table_id` has rows
    #[must_use]
    pub fn has_table(&self, table_id: TableId) -> bool {
        self.info.get(table_id).rows > 0
    }

    /// Row count of `table_id`, 0 if the table is absent
    #[must_use]
    pub fn row_count(&self, table_id: TableId) -> u32 {
        self.info.get(table_id).rows
    }

    /// Typed access to the table holding rows of type `T`, `None` if it has no rows
    #[must_use]
    pub fn table<T: RowReadable>(&self) -> Option<MetadataTable<'a, T>> {
        let rows = self.row_count(T::TABLE_ID);
        if rows == 0 {
            return None;
        }

        let offset = self.table_offsets[T::TABLE_ID as usize];
        MetadataTable::new(&self.data[offset..], rows, self.info.clone()).ok()
    }
}
