//! The `Module` table (0x00, ECMA-335 II.22.30).
//!
//! Exactly one row describing the module in this image. Custom attributes attached to it are
//! module-level, not assembly-level.

use crate::metadata::token::Token;

mod reader;

/// A row of the `Module` table.
#[derive(Clone, Debug)]
pub struct ModuleRaw {
    /// Row id
    pub rid: u32,
    /// Metadata token
    pub token: Token,
    /// Offset of the row in the table data
    pub offset: usize,
    /// Reserved, shall be zero
    pub generation: u32,
    /// `#Strings` index of the module name
    pub name: u32,
    /// `#GUID` index of the module version id
    pub mvid: u32,
    /// `#GUID` index, reserved
    pub encid: u32,
    /// `#GUID` index, reserved
    pub encbaseid: u32,
}
