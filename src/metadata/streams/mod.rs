//! Metadata streams.
//!
//! The metadata root lists the streams of a module. Reading attributes needs four of them:
//!
//! - **`#~`** ([`TablesHeader`]) - the metadata tables. `#-` is accepted as an alias.
//! - **`#Strings`** ([`Strings`]) - UTF-8 identifiers: type names, namespaces, member names
//! - **`#Blob`** ([`Blob`]) - signatures and serialized custom attribute values
//! - **`#GUID`** ([`Guid`]) - the module version id
//!
//! `#US` (string literals of IL code) and `#Pdb` are tolerated but never read.
//!
//! # References
//!
//! - ECMA-335 6th Edition, Partition II, Section 24.2.2 - Stream Headers

mod blob;
mod guid;
mod streamheader;
mod strings;
mod tablesheader;

pub use blob::Blob;
pub use guid::Guid;
pub use streamheader::StreamHeader;
pub use strings::Strings;
pub use tablesheader::TablesHeader;
