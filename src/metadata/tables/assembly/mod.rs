//! The `Assembly` table (0x20, ECMA-335 II.22.2).
//!
//! Present with a single row in assembly manifests; netmodules have no row. Assembly-level
//! attributes use this row as their parent.

use crate::metadata::token::Token;

mod reader;

/// A row of the `Assembly` table.
#[derive(Clone, Debug)]
pub struct AssemblyRaw {
    /// Row id
    pub rid: u32,
    /// Metadata token
    pub token: Token,
    /// Offset of the row in the table data
    pub offset: usize,
    /// Hash algorithm of the file hashes
    pub hash_alg_id: u32,
    /// Major version
    pub major_version: u32,
    /// Minor version
    pub minor_version: u32,
    /// Build number
    pub build_number: u32,
    /// Revision number
    pub revision_number: u32,
    /// `AssemblyFlags` bit mask
    pub flags: u32,
    /// `#Blob` index of the public key
    pub public_key: u32,
    /// `#Strings` index of the simple name
    pub name: u32,
    /// `#Strings` index of the culture
    pub culture: u32,
}
