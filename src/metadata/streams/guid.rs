//! The `#GUID` heap (ECMA-335 II.24.2.5).
//!
//! A plain array of 16-byte GUIDs addressed by 1-based index.

use crate::Result;

/// A view over the `#GUID` heap.
pub struct Guid<'a> {
    data: &'a [u8],
}

impl<'a> Guid<'a> {
    /// Wrap the heap bytes
    ///
    /// ## Arguments
    /// * 'data' - The stream contents
    ///
    /// # Errors
    /// Returns an error if the heap cannot hold a single GUID
    pub fn from(data: &'a [u8]) -> Result<Guid<'a>> {
        if data.len() < 16 {
            return Err(malformed_error!("Data for #GUID heap is too small"));
        }

        Ok(Guid { data })
    }

    /// The GUID at the 1-based `index`
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] for index 0 or an index past the end of the heap
    pub fn get(&self, index: usize) -> Result<uguid::Guid> {
        if index < 1 {
            return Err(out_of_bounds_error!());
        }

        let start = (index - 1) * 16;
        let Some(bytes) = self.data.get(start..start + 16) else {
            return Err(out_of_bounds_error!());
        };

        let mut buffer = [0u8; 16];
        buffer.copy_from_slice(bytes);

        Ok(uguid::Guid::from_bytes(buffer))
    }
}
