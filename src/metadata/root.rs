//! Metadata root (ECMA-335 II.24.2.1).
//!
//! The root starts with the `BSJB` signature, a version string and the list of stream
//! headers. Every stream range is checked against the metadata blob before it is used.

use crate::{
    file::io::{read_le, read_le_at},
    metadata::streams::StreamHeader,
    Result,
};

/// Magic value at the start of the metadata root ("BSJB")
pub const CIL_HEADER_MAGIC: u32 = 0x424A_5342;

/// The decoded metadata root.
pub struct Root {
    /// Magic signature, [`CIL_HEADER_MAGIC`]
    pub signature: u32,
    /// Major version, 1
    pub major_version: u16,
    /// Minor version, 1
    pub minor_version: u16,
    /// Version string, e.g. `v4.0.30319`, without padding
    pub version: String,
    /// Reserved flags
    pub flags: u16,
    /// The stream headers, in declaration order
    pub stream_headers: Vec<StreamHeader>,
}

impl Root {
    /// Read the metadata root from the start of the metadata blob.
    ///
    /// ## Arguments
    /// * 'data' - The complete metadata blob (`meta_data_size` bytes at `meta_data_rva`)
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] or [`crate::Error::Malformed`] if the root or a
    /// stream range does not fit the blob
    pub fn read(data: &[u8]) -> Result<Root> {
        if data.len() < 36 {
            return Err(out_of_bounds_error!());
        }

        let signature = read_le::<u32>(data)?;
        if signature != CIL_HEADER_MAGIC {
            return Err(malformed_error!(
                "CIL_HEADER_MAGIC does not match - 0x{:08X}",
                signature
            ));
        }

        let version_length = read_le_at::<u32>(data, &mut 12)? as usize;
        let Some(version_end) = version_length.checked_add(16) else {
            return Err(malformed_error!(
                "Version string length causing integer overflow - {}",
                version_length
            ));
        };

        // Flags and stream count follow the padded version string
        if version_end + 4 > data.len() {
            return Err(out_of_bounds_error!());
        }

        let version_bytes = &data[16..version_end];
        let version_len = version_bytes
            .iter()
            .position(|byte| *byte == 0)
            .unwrap_or(version_bytes.len());
        let version = String::from_utf8_lossy(&version_bytes[..version_len]).into_owned();

        let mut offset = version_end;
        let flags = read_le_at::<u16>(data, &mut offset)?;
        let stream_count = read_le_at::<u16>(data, &mut offset)?;
        if stream_count == 0 || stream_count > 6 {
            return Err(malformed_error!("Invalid stream count - {}", stream_count));
        }

        let mut stream_headers: Vec<StreamHeader> = Vec::with_capacity(stream_count as usize);
        for _ in 0..stream_count {
            if offset >= data.len() {
                return Err(out_of_bounds_error!());
            }

            let header = StreamHeader::from(&data[offset..])?;
            match header.offset.checked_add(header.size) {
                Some(end) if end as usize <= data.len() => {}
                Some(_) => return Err(out_of_bounds_error!()),
                None => {
                    return Err(malformed_error!(
                        "Stream offset and size cause integer overflow - {} + {}",
                        header.offset,
                        header.size
                    ))
                }
            }

            if stream_headers.iter().any(|known| known.name == header.name) {
                return Err(malformed_error!("Duplicate stream - {}", header.name));
            }

            offset += header.header_size();
            stream_headers.push(header);
        }

        Ok(Root {
            signature,
            major_version: read_le::<u16>(&data[4..])?,
            minor_version: read_le::<u16>(&data[6..])?,
            version,
            flags,
            stream_headers,
        })
    }

    /// The header of the stream named `name`, if present
    #[must_use]
    pub fn stream(&self, name: &str) -> Option<&StreamHeader> {
        self.stream_headers.iter().find(|stream| stream.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[rustfmt::skip]
    const ROOT: [u8; 76] = [
        0x42, 0x53, 0x4A, 0x42, // signature
        0x01, 0x00, 0x01, 0x00, // version 1.1
        0x00, 0x00, 0x00, 0x00, // reserved
        0x0C, 0x00, 0x00, 0x00, // version length
        b'v', b'4', b'.', b'0', b'.', b'3', b'0', b'3', b'1', b'9', 0x00, 0x00,
        0x00, 0x00, // flags
        0x03, 0x00, // streams
        0x4C, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, b'#', b'~', 0x00, 0x00,
        0x4C, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        b'#', b'S', b't', b'r', b'i', b'n', b'g', b's', 0x00, 0x00, 0x00, 0x00,
        0x4C, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, b'#', b'U', b'S', 0x00,
    ];

    #[test]
    fn crafted() {
        let root = Root::read(&ROOT).unwrap();

        assert_eq!(root.signature, CIL_HEADER_MAGIC);
        assert_eq!(root.major_version, 1);
        assert_eq!(root.minor_version, 1);
        assert_eq!(root.version, "v4.0.30319");
        assert_eq!(root.stream_headers.len(), 3);
        assert_eq!(root.stream_headers[0].name, "#~");
        assert_eq!(root.stream_headers[1].name, "#Strings");
        assert_eq!(root.stream_headers[2].name, "#US");
        assert!(root.stream("#Strings").is_some());
        assert!(root.stream("#Blob").is_none());
    }

    #[test]
    fn bad_signature() {
        let mut data = ROOT;
        data[0] = 0x00;
        assert!(matches!(Root::read(&data), Err(Error::Malformed { .. })));
    }

    #[test]
    fn stream_out_of_range() {
        let mut data = ROOT;
        // #~ claims 0x10 bytes at offset 0x4C of a 0x4C byte blob
        data[36] = 0x10;
        assert!(matches!(Root::read(&data), Err(Error::OutOfBounds)));
    }

    #[test]
    fn duplicate_stream() {
        let mut data = ROOT;
        data[72..76].copy_from_slice(b"#~\0\0");
        assert!(matches!(Root::read(&data), Err(Error::Malformed { .. })));
    }

    #[test]
    fn truncated() {
        assert!(matches!(Root::read(&ROOT[..30]), Err(Error::OutOfBounds)));
    }
}
