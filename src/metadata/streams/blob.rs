//! The `#Blob` heap (ECMA-335 II.24.2.4).
//!
//! Signatures and custom attribute values live here. Each entry is prefixed with its length
//! as a compressed unsigned integer.

use crate::{file::parser::Parser, Result};

/// A view over the `#Blob` heap.
///
/// # Examples
///
/// ```rust
/// use asminfo::metadata::streams::Blob;
///
/// let data = [0x00, 0x03, 0x41, 0x42, 0x43];
/// let blob = Blob::from(&data)?;
/// assert_eq!(blob.get(1)?, &[0x41, 0x42, 0x43]);
/// assert!(blob.get(0)?.is_empty());
/// # Ok::<(), asminfo::Error>(())
/// ```
pub struct Blob<'a> {
    data: &'a [u8],
}

impl<'a> Blob<'a> {
    /// Wrap the heap bytes
    ///
    /// ## Arguments
    /// * 'data' - The stream contents
    ///
    /// # Errors
    /// Returns an error if the heap is empty or does not start with the empty blob
    pub fn from(data: &'a [u8]) -> Result<Blob<'a>> {
        if data.is_empty() || data[0] != 0 {
            return Err(malformed_error!("Invalid memory for #Blob heap"));
        }

        Ok(Blob { data })
    }

    /// The bytes of the entry at `index`, without its length prefix
    ///
    /// ## Arguments
    /// * 'index' - Byte offset into the heap, as stored in a table column
    ///
    /// # Errors
    /// Returns an error if the offset or the declared length fall outside the heap
    pub fn get(&self, index: usize) -> Result<&'a [u8]> {
        let Some(tail) = self.data.get(index..) else {
            return Err(out_of_bounds_error!());
        };

        let mut parser = Parser::new(tail);
        let len = parser.read_compressed_uint()? as usize;
        parser.read_bytes(len)
    }
}
