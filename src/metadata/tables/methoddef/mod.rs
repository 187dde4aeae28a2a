//! The `MethodDef` table (0x06, ECMA-335 II.22.26).
//!
//! Attributes whose type is defined in the same module use a `MethodDef` constructor; its
//! owning type is found through the method lists of the `TypeDef` table.

use crate::metadata::token::Token;

mod reader;

/// A row of the `MethodDef` table.
#[derive(Clone, Debug)]
pub struct MethodDefRaw {
    /// Row id
    pub rid: u32,
    /// Metadata token
    pub token: Token,
    /// Offset of the row in the table data
    pub offset: usize,
    /// RVA of the method body, 0 for abstract and extern methods
    pub rva: u32,
    /// `MethodImplAttributes` bit mask
    pub impl_flags: u32,
    /// `MethodAttributes` bit mask
    pub flags: u32,
    /// `#Strings` index of the name
    pub name: u32,
    /// `#Blob` index of the method signature
    pub signature: u32,
    /// First row of this method's parameters in the `Param` table
    pub param_list: u32,
}
