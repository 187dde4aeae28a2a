//! Method and field signature parsing.
//!
//! Custom attribute blobs are not self-describing: the fixed arguments are laid out according to
//! the parameter list of the attribute constructor. This module decodes that parameter list from
//! the `MethodDefSig`/`MethodRefSig` of the constructor, and the `FieldSig` of the `value__`
//! field of enum types, which decides the width of enum arguments.
//!
//! # Examples
//!
//! ```rust
//! use asminfo::metadata::signatures::{parse_method_signature, TypeSignature};
//!
//! // instance void .ctor(bool)
//! let signature = parse_method_signature(&[0x20, 0x01, 0x01, 0x02])?;
//! assert_eq!(signature.params[0].base, TypeSignature::Boolean);
//! # Ok::<(), asminfo::Error>(())
//! ```
//!
//! # References
//!
//! - ECMA-335 6th Edition, Partition II, Section 23.2 - Blobs and Signatures

mod parser;
mod types;

pub use parser::SignatureParser;
pub use types::*;

use crate::Result;

/// Parse a method signature blob
///
/// # Errors
/// Returns an error if the blob is not a valid method signature
pub fn parse_method_signature(data: &[u8]) -> Result<SignatureMethod> {
    let mut parser = SignatureParser::new(data);
    parser.parse_method_signature()
}

/// Parse a field signature blob
///
/// # Errors
/// Returns an error if the blob is not a valid field signature
pub fn parse_field_signature(data: &[u8]) -> Result<SignatureField> {
    let mut parser = SignatureParser::new(data);
    parser.parse_field_signature()
}
