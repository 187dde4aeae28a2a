//! The `MethodPtr` table (0x05).
//!
//! Indirection between `TypeDef::method_list` and `MethodDef`, present only in unoptimized
//! metadata.

use crate::metadata::token::Token;

mod reader;

/// A row of the `MethodPtr` table.
#[derive(Clone, Debug)]
pub struct MethodPtrRaw {
    /// Row id
    pub rid: u32,
    /// Metadata token
    pub token: Token,
    /// Offset of the row in the table data
    pub offset: usize,
    /// The referenced `MethodDef` row
    pub method: u32,
}
