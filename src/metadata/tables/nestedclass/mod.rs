//! The `NestedClass` table (0x29, ECMA-335 II.22.32).
//!
//! Maps each nested `TypeDef` to its enclosing `TypeDef`.

use crate::metadata::token::Token;

mod reader;

/// A row of the `NestedClass` table.
#[derive(Clone, Debug)]
pub struct NestedClassRaw {
    /// Row id
    pub rid: u32,
    /// Metadata token
    pub token: Token,
    /// Offset of the row in the table data
    pub offset: usize,
    /// The nested `TypeDef` row
    pub nested_class: u32,
    /// The enclosing `TypeDef` row
    pub enclosing_class: u32,
}
