//! The `CustomAttribute` table (0x0C, ECMA-335 II.22.10).
//!
//! Each row attaches one attribute instance to a parent: the parent coded index selects the
//! target (the `Assembly` row for assembly-level attributes), the type coded index selects the
//! constructor and the value is a blob in the `#Blob` heap holding the serialized arguments.

use crate::metadata::{tables::CodedIndex, token::Token};

mod reader;

/// A row of the `CustomAttribute` table.
#[derive(Clone, Debug)]
pub struct CustomAttributeRaw {
    /// Row id
    pub rid: u32,
    /// Metadata token
    pub token: Token,
    /// Offset of the row in the table data
    pub offset: usize,
    /// `HasCustomAttribute` coded index of the attribute target
    pub parent: CodedIndex,
    /// `CustomAttributeType` coded index of the constructor, a MethodDef or MemberRef
    pub constructor: CodedIndex,
    /// `#Blob` index of the serialized arguments, 0 when there are none
    pub value: u32,
}
