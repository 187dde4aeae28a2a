//! The `#Strings` heap (ECMA-335 II.24.2.3).
//!
//! Identifiers referenced by the tables: type names, namespaces, member names. Entries are
//! null-terminated UTF-8 and addressed by byte offset.

use std::ffi::CStr;

use crate::Result;

/// A view over the `#Strings` heap.
///
/// # Examples
///
/// ```rust
/// use asminfo::metadata::streams::Strings;
///
/// let data = [0x00, b'A', b'c', b'm', b'e', 0x00];
/// let strings = Strings::from(&data)?;
/// assert_eq!(strings.get(1)?, "Acme");
/// assert_eq!(strings.get(0)?, "");
/// # Ok::<(), asminfo::Error>(())
/// ```
pub struct Strings<'a> {
    data: &'a [u8],
}

impl<'a> Strings<'a> {
    /// Wrap the heap bytes
    ///
    /// ## Arguments
    /// * 'data' - The stream contents
    ///
    /// # Errors
    /// Returns an error if the heap is empty or does not start with the empty string
    pub fn from(data: &'a [u8]) -> Result<Strings<'a>> {
        if data.is_empty() || data[0] != 0 {
            return Err(malformed_error!("Provided #Strings heap is empty"));
        }

        Ok(Strings { data })
    }

    /// The identifier starting at `index`
    ///
    /// ## Arguments
    /// * 'index' - Byte offset into the heap, as stored in a table column
    ///
    /// # Errors
    /// Returns an error if the offset is outside the heap, the entry is not terminated or it is
    /// not valid UTF-8
    pub fn get(&self, index: usize) -> Result<&'a str> {
        let Some(tail) = self.data.get(index..) else {
            return Err(out_of_bounds_error!());
        };

        let Ok(entry) = CStr::from_bytes_until_nul(tail) else {
            return Err(malformed_error!("Unterminated string at index - {}", index));
        };

        entry
            .to_str()
            .map_err(|_| malformed_error!("Invalid string at index - {}", index))
    }
}
