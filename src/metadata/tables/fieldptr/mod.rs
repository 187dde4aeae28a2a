//! The `FieldPtr` table (0x03).
//!
//! Only present in unoptimized metadata. When it exists, `TypeDef::field_list` indexes this
//! table and each row points at the actual `Field` row.

use crate::metadata::token::Token;

mod reader;

/// A row of the `FieldPtr` table.
#[derive(Clone, Debug)]
pub struct FieldPtrRaw {
    /// Row id
    pub rid: u32,
    /// Metadata token
    pub token: Token,
    /// Offset of the row in the table data
    pub offset: usize,
    /// The referenced `Field` row
    pub field: u32,
}
