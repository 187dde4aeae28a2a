//! Custom attribute value decoding.
//!
//! A custom attribute row references its constructor and a `#Blob` entry holding the
//! serialized arguments:
//! - **Prolog** - the marker `0x0001`
//! - **Fixed arguments** - constructor parameter values in declaration order
//! - **Named arguments** - a `u16` count followed by field and property assignments
//!
//! Fixed arguments can only be decoded once the constructor parameter types are known as
//! [`ArgumentKind`]s; [`crate::metadata::view::ModuleView`] resolves those from the
//! constructor signature before calling into [`CustomAttributeParser`].
//!
//! # Examples
//!
//! ```rust
//! use asminfo::metadata::customattributes::{
//!     parse_custom_attribute_data, ArgumentKind, CustomAttributeArgument,
//! };
//!
//! // [ComVisible(false)]
//! let value = parse_custom_attribute_data(&[0x01, 0x00, 0x00, 0x00, 0x00], &[ArgumentKind::Boolean])?;
//! assert_eq!(value.fixed_args, vec![CustomAttributeArgument::Bool(false)]);
//! # Ok::<(), asminfo::Error>(())
//! ```
//!
//! # References
//!
//! - ECMA-335 6th Edition, Partition II, Section 23.3 - Custom Attributes

mod parser;
mod types;

pub use parser::CustomAttributeParser;
pub use types::*;

use crate::Result;

/// Decode a custom attribute value blob for a constructor taking `params`
///
/// # Errors
/// Returns an error if the blob does not match the constructor or is malformed
pub fn parse_custom_attribute_data(
    data: &[u8],
    params: &[ArgumentKind],
) -> Result<CustomAttributeValue> {
    let mut parser = CustomAttributeParser::new(data);
    parser.parse_custom_attribute(params)
}
