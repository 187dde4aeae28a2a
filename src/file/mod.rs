//! PE container access.
//!
//! A managed assembly is a PE/COFF image whose CLR runtime header data directory points at the
//! CLI header and, through it, at the ECMA-335 metadata. This module loads such an image from
//! disk or memory, validates that it carries a CLR runtime header, and translates RVAs into
//! file offsets so that the metadata can be located.
//!
//! # Key Components
//!
//! - [`crate::file::File`] - The loaded image: backend data plus the goblin PE view over it
//! - [`crate::file::Backend`] - Trait for data sources
//! - [`crate::file::parser::Parser`] - Cursor for decoding metadata structures
//! - [`crate::file::io`] - Bounds-checked little-endian reads
//!
//! # Data Sources
//!
//! - **Physical files** - read-only memory maps ([`physical::Physical`])
//! - **Memory buffers** - owned byte vectors ([`memory::Memory`])
//!
//! # References
//!
//! - Microsoft PE/COFF Specification
//! - ECMA-335 6th Edition, Partition II - PE File Format

pub mod io;
pub mod parser;

mod memory;
mod physical;

use std::path::Path;

use crate::{Error::Empty, Result};
use goblin::pe::{section_table::SectionTable, PE};
use memory::Memory;
use ouroboros::self_referencing;
use physical::Physical;

/// Backend trait for file data sources.
///
/// Abstracts over where the image bytes live. All implementations must be thread-safe.
pub trait Backend: Send + Sync {
    /// Returns a slice of the data at the given offset and length.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::OutOfBounds`] if the requested range is out of bounds.
    fn data_slice(&self, offset: usize, len: usize) -> Result<&[u8]>;

    /// Returns the entire data buffer.
    fn data(&self) -> &[u8];

    /// Returns the total length of the data buffer.
    fn len(&self) -> usize;
}

#[self_referencing]
/// A loaded PE image with a CLR runtime header.
///
/// Owns its data source and the goblin [`PE`] parsed from it. Construction fails for inputs that
/// are empty, are not PE images, or are PE images without managed metadata.
///
/// # Examples
///
/// ```rust,no_run
/// use asminfo::File;
/// use std::path::Path;
///
/// let file = File::from_file(Path::new("bin/Release/Acme.dll"))?;
///
/// let (clr_rva, clr_size) = file.clr();
/// let clr_offset = file.rva_to_offset(clr_rva)?;
/// let clr_header = file.data_slice(clr_offset, clr_size)?;
/// println!("CLI header starts with: {:02x?}", &clr_header[..8]);
/// # Ok::<(), asminfo::Error>(())
/// ```
pub struct File {
    /// The underlying data source (memory or file).
    data: Box<dyn Backend>,
    /// The parsed PE structure, referencing the data.
    #[borrows(data)]
    #[not_covariant]
    pe: PE<'this>,
}

impl File {
    /// Memory-map and load the PE file at `file`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be opened or mapped
    /// - The file is empty
    /// - The file is not a valid PE image
    /// - The PE image does not contain a CLR runtime header
    pub fn from_file(file: &Path) -> Result<File> {
        let input = Physical::new(file)?;

        Self::load(input)
    }

    /// Load a PE image from an owned buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if the buffer is empty, is not a valid PE image or carries no CLR
    /// runtime header.
    pub fn from_mem(data: Vec<u8>) -> Result<File> {
        let input = Memory::new(data);

        Self::load(input)
    }

    fn load<T: Backend + 'static>(data: T) -> Result<File> {
        if data.len() == 0 {
            return Err(Empty);
        }

        let data = Box::new(data);

        File::try_new(data, |data| {
            let pe = PE::parse(data.data())?;

            let Some(optional_header) = pe.header.optional_header else {
                return Err(malformed_error!("File does not have an OptionalHeader"));
            };

            match optional_header.data_directories.get_clr_runtime_header() {
                Some(clr) if clr.virtual_address != 0 && clr.size != 0 => Ok(pe),
                _ => Err(malformed_error!(
                    "File does not have a CLR runtime header directory"
                )),
            }
        })
    }

    /// Returns the total size of the loaded image in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.with_data(|data| data.len())
    }

    /// True if the image holds no data. A successfully loaded [`File`] is never empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// RVA and size of the CLR runtime header, as recorded in the data directories.
    #[must_use]
    pub fn clr(&self) -> (usize, usize) {
        self.with_pe(|pe| {
            // Presence of both was verified by `load`
            pe.header
                .optional_header
                .and_then(|header| {
                    header
                        .data_directories
                        .get_clr_runtime_header()
                        .map(|clr| (clr.virtual_address as usize, clr.size as usize))
                })
                .unwrap_or((0, 0))
        })
    }

    /// The section table of the image.
    pub fn sections(&self) -> impl Iterator<Item = &SectionTable> {
        self.with_pe(|pe| pe.sections.iter())
    }

    /// The complete image data.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        self.with_data(|data| data.data())
    }

    /// A bounds-checked slice of the image.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::OutOfBounds`] if the range is not inside the image.
    pub fn data_slice(&self, offset: usize, len: usize) -> Result<&[u8]> {
        self.with_data(|data| data.data_slice(offset, len))
    }

    /// Translate a relative virtual address into a file offset.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Malformed`] if no section contains `rva`, or if a section header
    /// describes a range that overflows.
    pub fn rva_to_offset(&self, rva: usize) -> Result<usize> {
        let rva = u32::try_from(rva)
            .map_err(|_| malformed_error!("RVA too large to fit in u32: {}", rva))?;

        for section in self.sections() {
            // Some linkers leave VirtualSize at zero; the raw size bounds the section then
            let extent = section.virtual_size.max(section.size_of_raw_data);
            let Some(section_max) = section.virtual_address.checked_add(extent) else {
                return Err(malformed_error!(
                    "Section malformed, causing integer overflow - {} + {}",
                    section.virtual_address,
                    extent
                ));
            };

            if section.virtual_address <= rva && rva < section_max {
                return Ok((rva - section.virtual_address) as usize
                    + section.pointer_to_raw_data as usize);
            }
        }

        Err(malformed_error!(
            "RVA could not be converted to offset - {}",
            rva
        ))
    }
}
