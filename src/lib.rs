// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![allow(clippy::too_many_arguments)]
//#![deny(unsafe_code)]
// - 'file/physical.rs' uses mmap to map a file into memory

//! # asminfo
//!
//! Reads the assembly-level info attributes (`AssemblyVersion`, `AssemblyCompany`,
//! `InternalsVisibleTo`, ...) of a compiled .NET assembly without loading or executing it.
//! Built in pure Rust, `asminfo` parses the PE container and the ECMA-335 metadata directly,
//! so it works on any platform and never requires the .NET runtime.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use asminfo::reflect_assembly_info;
//!
//! let info = reflect_assembly_info("./bin/Release/MyShinyNewAssembly.dll")?;
//! println!("Version: {:?}", info.version());
//! println!("Informational version: {:?}", info.informational_version());
//!
//! if let Some(friends) = info.internals_visible_to() {
//!     for friend in friends {
//!         println!("InternalsVisibleTo: {}", friend);
//!     }
//! }
//! # Ok::<(), asminfo::Error>(())
//! ```
//!
//! ## Host abstractions
//!
//! Build hosts that virtualize the file system or the working directory can supply their own
//! [`FileSystem`] and [`Environment`] implementations:
//!
//! ```rust,no_run
//! use asminfo::{AssemblyInfoReflector, PhysicalFileSystem, ProcessEnvironment, ReflectorConfig};
//!
//! let reflector = AssemblyInfoReflector::with_config(
//!     PhysicalFileSystem,
//!     ProcessEnvironment,
//!     ReflectorConfig::buffered(),
//! );
//! let info = reflector.reflect("artifacts/Acme.Core.dll")?;
//! println!("Company: {:?}", info.company());
//! # Ok::<(), asminfo::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`reflector`] - Path resolution, the known attribute set and the [`ParseResult`]
//! - [`metadata`] - ECMA-335 metadata reader (headers, streams, tables, signatures and
//!   custom attribute values) and the [`ModuleView`] over a loaded module
//! - [`File`] and [`Parser`] - PE container access and the byte-level cursor
//! - [`Error`] and [`Result`] - Error handling
//!
//! ## Standards Compliance
//!
//! The metadata reader follows the **ECMA-335 specification** (6th edition), Partition II.
//!
//! ### References
//!
//! - [ECMA-335 Standard](https://ecma-international.org/wp-content/uploads/ECMA-335_6th_edition_june_2012.pdf) - Official CLI specification
//!
//! ## Development and Testing
//!
//! ```bash
//! cargo test
//!
//! # Fuzz the module loader
//! cargo +nightly fuzz run moduleview --release
//! ```
#[macro_use]
pub(crate) mod error;
pub(crate) mod file;

/// Shared functionality which is used in unit- and integration-tests
#[cfg(test)]
pub(crate) mod test;

/// Static ECMA-335 metadata reader.
///
/// This module contains the pieces required to walk from a loaded PE file to the decoded
/// custom attributes of its assembly:
///
/// - CLI header ([`metadata::cor20header`]) and metadata root ([`metadata::root`])
/// - Heaps and the tables stream ([`metadata::streams`])
/// - Table schema, coded indexes and typed row access ([`metadata::tables`])
/// - Method and field signatures ([`metadata::signatures`])
/// - Custom attribute value blobs ([`metadata::customattributes`])
/// - The [`metadata::view::ModuleView`] tying it all together
pub mod metadata;

/// Assembly info reflection.
///
/// Resolves the input path, loads the module and decodes the fixed set of assembly-level
/// info attributes into a [`ParseResult`].
pub mod reflector;

/// `asminfo` Result type
///
/// A type alias for `std::result::Result<T, Error>` where the error type is always [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// `asminfo` Error type
///
/// See [`Error`] for the error taxonomy.
pub use error::Error;

/// Raw PE file access, used by [`ModuleView`] to reach the CLI header and metadata.
pub use file::{parser::Parser, File};

/// Loaded module with resolved assembly-level attributes.
pub use metadata::view::ModuleView;

pub use reflector::{
    reflect_assembly_info, AssemblyInfoReflector, Environment, FileSystem, KnownAttribute,
    LoadMode, ParseResult, PhysicalFileSystem, ProcessEnvironment, ReflectorConfig,
};
