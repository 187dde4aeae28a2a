//! CLI header (`IMAGE_COR20_HEADER`, ECMA-335 II.25.3.3).
//!
//! The CLR runtime header data directory of a managed PE image points at this 72-byte
//! structure. For reading attributes only the metadata RVA and size matter, but the whole
//! header is validated so that arbitrary native images or garbage are rejected early with a
//! precise message.

use bitflags::bitflags;

use crate::{file::parser::Parser, Result};

bitflags! {
    #[derive(PartialEq, Eq, Debug, Clone, Copy)]
    /// Runtime flags of the CLI header (`COMIMAGE_FLAGS_*`)
    pub struct CorFlags : u32 {
        /// The image contains only IL code
        const IL_ONLY = 0x0001;
        /// The image can only be loaded into a 32-bit process
        const REQUIRED_32BIT = 0x0002;
        /// The image is an IL library
        const IL_LIBRARY = 0x0004;
        /// The image carries a strong name signature
        const STRONG_NAME_SIGNED = 0x0008;
        /// The entry point token refers to a native entry point
        const NATIVE_ENTRYPOINT = 0x0010;
        /// Debug information is tracked
        const TRACK_DEBUG_DATA = 0x0001_0000;
        /// The image prefers to run as 32-bit
        const PREFERRED_32BIT = 0x0002_0000;
    }
}

/// The decoded CLI header.
pub struct Cor20Header {
    /// Size of the header in bytes, always 72
    pub cb: u32,
    /// Minimum runtime major version
    pub major_runtime_version: u16,
    /// Minimum runtime minor version
    pub minor_runtime_version: u16,
    /// RVA of the metadata root
    pub meta_data_rva: u32,
    /// Size of the metadata in bytes
    pub meta_data_size: u32,
    /// Runtime flags
    pub flags: CorFlags,
    /// Entry point MethodDef/File token, or native RVA
    pub entry_point_token: u32,
    /// RVA of the managed resources
    pub resource_rva: u32,
    /// Size of the managed resources
    pub resource_size: u32,
    /// RVA of the strong name signature
    pub strong_name_signature_rva: u32,
    /// Size of the strong name signature
    pub strong_name_signature_size: u32,
    /// RVA of the VTable fixups
    pub vtable_fixups_rva: u32,
    /// Size of the VTable fixups
    pub vtable_fixups_size: u32,
    /// RVA of the ReadyToRun / managed native header
    pub managed_native_header_rva: u32,
    /// Size of the ReadyToRun / managed native header
    pub managed_native_header_size: u32,
}

impl Cor20Header {
    /// Read and validate a CLI header.
    ///
    /// ## Arguments
    /// * 'data' - The bytes starting at the CLI header
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] for short input and [`crate::Error::Malformed`]
    /// for any field that violates ECMA-335
    pub fn read(data: &[u8]) -> Result<Cor20Header> {
        if data.len() < 72 {
            return Err(out_of_bounds_error!());
        }

        let mut parser = Parser::new(data);

        let cb = parser.read_le::<u32>()?;
        if cb != 72 {
            return Err(malformed_error!(
                "Invalid CLR header size: expected 72, got {}",
                cb
            ));
        }

        let major_runtime_version = parser.read_le::<u16>()?;
        let minor_runtime_version = parser.read_le::<u16>()?;
        if major_runtime_version == 0 || major_runtime_version > 10 {
            return Err(malformed_error!(
                "Invalid major runtime version: {}",
                major_runtime_version
            ));
        }

        let meta_data_rva = parser.read_le::<u32>()?;
        let meta_data_size = parser.read_le::<u32>()?;
        if meta_data_rva == 0 || meta_data_size == 0 {
            return Err(malformed_error!("Image does not reference any metadata"));
        }

        if meta_data_size > 0x1000_0000 {
            return Err(malformed_error!(
                "Metadata size {} exceeds reasonable limit (256MB)",
                meta_data_size
            ));
        }

        let raw_flags = parser.read_le::<u32>()?;
        let Some(flags) = CorFlags::from_bits(raw_flags) else {
            return Err(malformed_error!(
                "Invalid CLR flags: 0x{:08X} contains undefined bits",
                raw_flags
            ));
        };

        let entry_point_token = parser.read_le::<u32>()?;

        let (resource_rva, resource_size) = read_directory(&mut parser, "Resources")?;
        let (strong_name_signature_rva, strong_name_signature_size) =
            read_directory(&mut parser, "StrongNameSignature")?;

        let (code_manager_rva, code_manager_size) = read_directory(&mut parser, "CodeManagerTable")?;
        if code_manager_rva != 0 || code_manager_size != 0 {
            return Err(malformed_error!(
                "Code Manager Table fields must be zero (reserved)"
            ));
        }

        let (vtable_fixups_rva, vtable_fixups_size) = read_directory(&mut parser, "VTableFixups")?;

        let (export_jumps_rva, export_jumps_size) =
            read_directory(&mut parser, "ExportAddressTableJumps")?;
        if export_jumps_rva != 0 || export_jumps_size != 0 {
            return Err(malformed_error!(
                "Export Address Table Jump fields must be zero (reserved)"
            ));
        }

        let (managed_native_header_rva, managed_native_header_size) =
            read_directory(&mut parser, "ManagedNativeHeader")?;

        Ok(Cor20Header {
            cb,
            major_runtime_version,
            minor_runtime_version,
            meta_data_rva,
            meta_data_size,
            flags,
            entry_point_token,
            resource_rva,
            resource_size,
            strong_name_signature_rva,
            strong_name_signature_size,
            vtable_fixups_rva,
            vtable_fixups_size,
            managed_native_header_rva,
            managed_native_header_size,
        })
    }
}

/// Read an RVA/size pair; either both are zero or neither is.
fn read_directory(parser: &mut Parser, name: &str) -> Result<(u32, u32)> {
    let rva = parser.read_le::<u32>()?;
    let size = parser.read_le::<u32>()?;

    if (rva == 0) != (size == 0) {
        return Err(malformed_error!(
            "{} directory is inconsistent - rva 0x{:08X}, size {}",
            name,
            rva,
            size
        ));
    }

    Ok((rva, size))
}
