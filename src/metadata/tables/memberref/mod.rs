//! The `MemberRef` table (0x0A, ECMA-335 II.22.25).
//!
//! Attribute constructors defined in other assemblies are `.ctor` MemberRefs whose class is
//! the TypeRef of the attribute type.

use crate::metadata::{tables::CodedIndex, token::Token};

mod reader;

/// A row of the `MemberRef` table.
#[derive(Clone, Debug)]
pub struct MemberRefRaw {
    /// Row id
    pub rid: u32,
    /// Metadata token
    pub token: Token,
    /// Offset of the row in the table data
    pub offset: usize,
    /// `MemberRefParent` coded index of the declaring type
    pub class: CodedIndex,
    /// `#Strings` index of the member name
    pub name: u32,
    /// `#Blob` index of the member signature
    pub signature: u32,
}
