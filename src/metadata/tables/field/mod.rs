//! The `Field` table (0x04, ECMA-335 II.22.15).
//!
//! Needed to find the underlying type of enums defined in this module: the instance field
//! `value__` of an enum carries it in its signature.

use crate::metadata::token::Token;

mod reader;

/// Field attribute bits (ECMA-335 II.23.1.5).
#[allow(non_snake_case)]
pub mod FieldAttributes {
    /// The field belongs to the type rather than to instances
    pub const STATIC: u32 = 0x0010;
    /// The field is a compile-time constant
    pub const LITERAL: u32 = 0x0040;
}

/// A row of the `Field` table.
#[derive(Clone, Debug)]
pub struct FieldRaw {
    /// Row id
    pub rid: u32,
    /// Metadata token
    pub token: Token,
    /// Offset of the row in the table data
    pub offset: usize,
    /// `FieldAttributes` bit mask
    pub flags: u32,
    /// `#Strings` index of the name
    pub name: u32,
    /// `#Blob` index of the field signature
    pub signature: u32,
}

impl FieldRaw {
    /// True for fields that exist once per instance
    #[must_use]
    pub fn is_instance(&self) -> bool {
        self.flags & (FieldAttributes::STATIC | FieldAttributes::LITERAL) == 0
    }
}
