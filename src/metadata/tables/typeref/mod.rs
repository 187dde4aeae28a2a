//! The `TypeRef` table (0x01, ECMA-335 II.22.38).
//!
//! References to types defined elsewhere. Attribute types from the base class library are
//! almost always TypeRefs scoped to an `AssemblyRef`; nested types are scoped to the TypeRef
//! of their enclosing type.

use crate::metadata::{tables::CodedIndex, token::Token};

mod reader;

/// A row of the `TypeRef` table.
#[derive(Clone, Debug)]
pub struct TypeRefRaw {
    /// Row id
    pub rid: u32,
    /// Metadata token
    pub token: Token,
    /// Offset of the row in the table data
    pub offset: usize,
    /// `ResolutionScope` coded index: Module, ModuleRef, AssemblyRef or an enclosing TypeRef
    pub resolution_scope: CodedIndex,
    /// `#Strings` index of the simple name
    pub type_name: u32,
    /// `#Strings` index of the namespace
    pub type_namespace: u32,
}
