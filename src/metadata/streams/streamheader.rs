//! Stream headers of the metadata root (ECMA-335 II.24.2.2).

use crate::{file::io::read_le, Result};

/// Stream names a metadata root may declare. `#-` is the uncompressed table stream and `#Pdb`
/// appears in portable PDB images; neither needs special treatment to find attributes.
const KNOWN_STREAMS: [&str; 7] = ["#~", "#-", "#Strings", "#US", "#Blob", "#GUID", "#Pdb"];

/// Location and name of one metadata stream.
///
/// The header is variable length: two `u32` fields followed by a null-terminated ASCII name
/// padded to a multiple of four bytes.
///
/// # Examples
///
/// ```rust
/// use asminfo::metadata::streams::StreamHeader;
///
/// let bytes = [0x6C, 0x00, 0x00, 0x00, 0x10, 0x00, 0x00, 0x00, b'#', b'~', 0x00, 0x00];
/// let header = StreamHeader::from(&bytes)?;
/// assert_eq!(header.name, "#~");
/// assert_eq!(header.header_size(), 12);
/// # Ok::<(), asminfo::Error>(())
/// ```
pub struct StreamHeader {
    /// Offset of the stream, relative to the metadata root
    pub offset: u32,
    /// Size of the stream in bytes
    pub size: u32,
    /// Name of the stream, at most 32 characters
    pub name: String,
}

impl StreamHeader {
    /// Read a stream header from the start of `data`
    ///
    /// ## Arguments
    /// * 'data' - The bytes starting at the stream header
    ///
    /// # Errors
    /// Returns an error if the data is too short, the name is not terminated within 32 bytes or
    /// the name is not a known stream
    pub fn from(data: &[u8]) -> Result<StreamHeader> {
        if data.len() < 9 {
            return Err(out_of_bounds_error!());
        }

        let name_area = &data[8..data.len().min(8 + 32)];
        let Some(name_len) = name_area.iter().position(|byte| *byte == 0) else {
            return Err(malformed_error!("Stream header name is not terminated"));
        };

        let name: String = name_area[..name_len].iter().map(|byte| char::from(*byte)).collect();
        if !KNOWN_STREAMS.contains(&name.as_str()) {
            return Err(malformed_error!("Invalid stream header name - {}", name));
        }

        Ok(StreamHeader {
            offset: read_le::<u32>(data)?,
            size: read_le::<u32>(&data[4..])?,
            name,
        })
    }

    /// Size of this header in the root, including the padded name
    #[must_use]
    pub fn header_size(&self) -> usize {
        8 + ((self.name.len() + 1 + 3) & !3)
    }
}
