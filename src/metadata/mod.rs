//! ECMA-335 metadata of a loaded module.
//!
//! The reader walks from the CLI header to the decoded assembly attributes:
//!
//! 1. [`cor20header::Cor20Header`] - located through data directory 14 of the PE image
//! 2. [`root::Root`] - the `BSJB` metadata root with the stream directory
//! 3. [`streams`] - the `#~` tables stream and the `#Strings`, `#Blob` and `#GUID` heaps
//! 4. [`tables`] - schema, index widths and typed access to the rows
//! 5. [`signatures`] - constructor and field signatures
//! 6. [`customattributes`] - the serialized attribute arguments
//!
//! [`view::ModuleView`] owns the loaded file and exposes the result of all steps.
//!
//! # References
//!
//! - ECMA-335 6th Edition, Partition II, Sections 22-25

pub mod cor20header;
pub mod customattributes;
pub mod root;
pub mod signatures;
pub mod streams;
pub mod tables;
pub mod token;
pub mod view;
