//! The `TypeDef` table (0x02, ECMA-335 II.22.37).
//!
//! Types defined in this module. The field and method lists are run-length encoded: a type
//! owns the rows from its own list index up to the next type's list index, or to the end of
//! the table for the last type.

use crate::metadata::{tables::CodedIndex, token::Token};

mod reader;

/// Type attribute bits used when naming types (ECMA-335 II.23.1.15).
#[allow(non_snake_case)]
pub mod TypeAttributes {
    /// Mask for the visibility bits
    pub const VISIBILITY_MASK: u32 = 0x0000_0007;
    /// Lowest of the nested visibilities; any value at or above it marks a nested type
    pub const NESTED_PUBLIC: u32 = 0x0000_0002;
}

/// A row of the `TypeDef` table.
#[derive(Clone, Debug)]
pub struct TypeDefRaw {
    /// Row id
    pub rid: u32,
    /// Metadata token
    pub token: Token,
    /// Offset of the row in the table data
    pub offset: usize,
    /// `TypeAttributes` bit mask
    pub flags: u32,
    /// `#Strings` index of the simple name
    pub type_name: u32,
    /// `#Strings` index of the namespace
    pub type_namespace: u32,
    /// `TypeDefOrRef` coded index of the base type, null for interfaces and `<Module>`
    pub extends: CodedIndex,
    /// First row of this type's fields in the `Field` (or `FieldPtr`) table
    pub field_list: u32,
    /// First row of this type's methods in the `MethodDef` (or `MethodPtr`) table
    pub method_list: u32,
}

impl TypeDefRaw {
    /// True if the visibility bits mark this type as nested
    #[must_use]
    pub fn is_nested(&self) -> bool {
        (self.flags & TypeAttributes::VISIBILITY_MASK) >= TypeAttributes::NESTED_PUBLIC
    }
}
