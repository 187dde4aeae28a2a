//! Decoder for custom attribute value blobs (ECMA-335 II.23.3).
//!
//! A blob starts with the prolog `0x0001`, followed by one value per constructor parameter,
//! a `u16` count of named arguments and the named arguments themselves. Fixed arguments carry
//! no type information; their layout is given by [`ArgumentKind`]s resolved from the
//! constructor signature. Named arguments and boxed objects carry an inline type tag.

use crate::{
    file::parser::Parser,
    metadata::customattributes::{
        ArgumentKind, CustomAttributeArgument, CustomAttributeNamedArgument,
        CustomAttributeValue, SERIALIZATION_TYPE,
    },
    Error::RecursionLimit,
    Result,
};

/// Maximum nesting of arrays and boxed objects inside one argument
const MAX_NESTING_DEPTH: usize = 50;

/// Marker byte of a null string or null type
const NULL_STRING: u8 = 0xFF;

/// Decodes a single custom attribute blob.
///
/// # Examples
///
/// ```rust
/// use asminfo::metadata::customattributes::{
///     ArgumentKind, CustomAttributeArgument, CustomAttributeParser,
/// };
///
/// // [AssemblyCompany("Acme")]
/// let blob = [0x01, 0x00, 0x04, b'A', b'c', b'm', b'e', 0x00, 0x00];
/// let value = CustomAttributeParser::new(&blob).parse_custom_attribute(&[ArgumentKind::String])?;
///
/// assert_eq!(
///     value.fixed_args[0],
///     CustomAttributeArgument::String(Some("Acme".to_string()))
/// );
/// # Ok::<(), asminfo::Error>(())
/// ```
pub struct CustomAttributeParser<'a> {
    parser: Parser<'a>,
    depth: usize,
}

impl<'a> CustomAttributeParser<'a> {
    /// Create a parser over a value blob
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        CustomAttributeParser {
            parser: Parser::new(data),
            depth: 0,
        }
    }

    /// Decode the blob for a constructor taking `params`
    ///
    /// ## Arguments
    /// * 'params' - The constructor parameter kinds, in declaration order
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] for a wrong prolog or invalid tags,
    /// [`crate::Error::OutOfBounds`] if the blob ends early, and
    /// [`crate::Error::RecursionLimit`] for excessively nested values
    pub fn parse_custom_attribute(
        &mut self,
        params: &[ArgumentKind],
    ) -> Result<CustomAttributeValue> {
        let prolog = self.parser.read_le::<u16>()?;
        if prolog != 0x0001 {
            return Err(malformed_error!(
                "Invalid custom attribute prolog - expected 0x0001, got 0x{:04X}",
                prolog
            ));
        }

        let mut fixed_args = Vec::with_capacity(params.len());
        for kind in params {
            fixed_args.push(self.parse_value(kind)?);
        }

        // Some compilers omit the trailing count when there are no named arguments
        let mut named_args = Vec::new();
        if self.parser.remaining() >= 2 {
            let num_named = self.parser.read_le::<u16>()?;
            for _ in 0..num_named {
                named_args.push(self.parse_named_argument()?);
            }
        }

        Ok(CustomAttributeValue {
            fixed_args,
            named_args,
        })
    }

    fn parse_named_argument(&mut self) -> Result<CustomAttributeNamedArgument> {
        let is_field = match self.parser.read_le::<u8>()? {
            SERIALIZATION_TYPE::FIELD => true,
            SERIALIZATION_TYPE::PROPERTY => false,
            other => {
                return Err(malformed_error!(
                    "Invalid field/property indicator: 0x{:02X}",
                    other
                ))
            }
        };

        let arg_type = self.parse_kind()?;
        let Some(name) = self.parse_string()? else {
            return Err(malformed_error!("Named argument without a name"));
        };
        let value = self.parse_value(&arg_type)?;

        Ok(CustomAttributeNamedArgument {
            is_field,
            name,
            arg_type,
            value,
        })
    }

    /// Read an inline `FieldOrPropType`
    fn parse_kind(&mut self) -> Result<ArgumentKind> {
        self.depth += 1;
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(RecursionLimit(MAX_NESTING_DEPTH));
        }

        let result = self.parse_kind_tag();
        self.depth -= 1;
        result
    }

    fn parse_kind_tag(&mut self) -> Result<ArgumentKind> {
        let tag = self.parser.read_le::<u8>()?;
        match tag {
            SERIALIZATION_TYPE::STRING => Ok(ArgumentKind::String),
            SERIALIZATION_TYPE::TYPE => Ok(ArgumentKind::Type),
            SERIALIZATION_TYPE::TAGGED_OBJECT => Ok(ArgumentKind::Object),
            SERIALIZATION_TYPE::SZARRAY => Ok(ArgumentKind::SzArray(Box::new(self.parse_kind()?))),
            SERIALIZATION_TYPE::ENUM => {
                let Some(name) = self.parse_string()? else {
                    return Err(malformed_error!("Enum argument without a type name"));
                };

                // The blob does not carry the enum width, assume int32
                Ok(ArgumentKind::Enum {
                    name,
                    underlying: SERIALIZATION_TYPE::I4,
                })
            }
            _ => primitive_kind(tag).ok_or_else(|| {
                malformed_error!("Unsupported serialization type tag: 0x{:02X}", tag)
            }),
        }
    }

    fn parse_value(&mut self, kind: &ArgumentKind) -> Result<CustomAttributeArgument> {
        self.depth += 1;
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(RecursionLimit(MAX_NESTING_DEPTH));
        }

        let result = self.parse_value_of(kind);
        self.depth -= 1;
        result
    }

    fn parse_value_of(&mut self, kind: &ArgumentKind) -> Result<CustomAttributeArgument> {
        match kind {
            ArgumentKind::Boolean => Ok(CustomAttributeArgument::Bool(
                self.parser.read_le::<u8>()? != 0,
            )),
            ArgumentKind::Char => {
                let value = self.parser.read_le::<u16>()?;
                Ok(CustomAttributeArgument::Char(
                    char::from_u32(u32::from(value)).unwrap_or('\u{FFFD}'),
                ))
            }
            ArgumentKind::I1 => Ok(CustomAttributeArgument::I1(self.parser.read_le::<i8>()?)),
            ArgumentKind::U1 => Ok(CustomAttributeArgument::U1(self.parser.read_le::<u8>()?)),
            ArgumentKind::I2 => Ok(CustomAttributeArgument::I2(self.parser.read_le::<i16>()?)),
            ArgumentKind::U2 => Ok(CustomAttributeArgument::U2(self.parser.read_le::<u16>()?)),
            ArgumentKind::I4 => Ok(CustomAttributeArgument::I4(self.parser.read_le::<i32>()?)),
            ArgumentKind::U4 => Ok(CustomAttributeArgument::U4(self.parser.read_le::<u32>()?)),
            ArgumentKind::I8 => Ok(CustomAttributeArgument::I8(self.parser.read_le::<i64>()?)),
            ArgumentKind::U8 => Ok(CustomAttributeArgument::U8(self.parser.read_le::<u64>()?)),
            ArgumentKind::R4 => Ok(CustomAttributeArgument::R4(self.parser.read_le::<f32>()?)),
            ArgumentKind::R8 => Ok(CustomAttributeArgument::R8(self.parser.read_le::<f64>()?)),
            ArgumentKind::I => {
                #[allow(clippy::cast_possible_truncation)]
                let value = if cfg!(target_pointer_width = "64") {
                    self.parser.read_le::<i64>()? as isize
                } else {
                    self.parser.read_le::<i32>()? as isize
                };
                Ok(CustomAttributeArgument::I(value))
            }
            ArgumentKind::U => {
                #[allow(clippy::cast_possible_truncation)]
                let value = if cfg!(target_pointer_width = "64") {
                    self.parser.read_le::<u64>()? as usize
                } else {
                    self.parser.read_le::<u32>()? as usize
                };
                Ok(CustomAttributeArgument::U(value))
            }
            ArgumentKind::String => Ok(CustomAttributeArgument::String(self.parse_string()?)),
            ArgumentKind::Type => Ok(CustomAttributeArgument::Type(self.parse_string()?)),
            ArgumentKind::Object => {
                let boxed = self.parse_kind()?;
                self.parse_value(&boxed)
            }
            ArgumentKind::Enum { name, underlying } => {
                let Some(underlying_kind) = primitive_kind(*underlying) else {
                    return Err(malformed_error!(
                        "Invalid underlying type 0x{:02X} for enum '{}'",
                        underlying,
                        name
                    ));
                };

                Ok(CustomAttributeArgument::Enum(
                    name.clone(),
                    Box::new(self.parse_value_of(&underlying_kind)?),
                ))
            }
            ArgumentKind::SzArray(element) => {
                let length = self.parser.read_le::<i32>()?;
                if length == -1 {
                    return Ok(CustomAttributeArgument::Array(None));
                }
                if length < 0 {
                    return Err(malformed_error!("Invalid array length: {}", length));
                }

                #[allow(clippy::cast_sign_loss)]
                let length = length as usize;
                let mut elements = Vec::with_capacity(length.min(self.parser.remaining()));
                for _ in 0..length {
                    elements.push(self.parse_value(element)?);
                }

                Ok(CustomAttributeArgument::Array(Some(elements)))
            }
        }
    }

    /// Read a `SerString`: `None` for the null marker, lossy UTF-8 otherwise
    fn parse_string(&mut self) -> Result<Option<String>> {
        if self.parser.peek_byte()? == NULL_STRING {
            self.parser.advance()?;
            return Ok(None);
        }

        let length = self.parser.read_compressed_uint()?;
        let bytes = self.parser.read_bytes(length as usize)?;

        Ok(Some(String::from_utf8_lossy(bytes).into_owned()))
    }
}

/// The kind of a primitive `SERIALIZATION_TYPE` tag
fn primitive_kind(tag: u8) -> Option<ArgumentKind> {
    match tag {
        SERIALIZATION_TYPE::BOOLEAN => Some(ArgumentKind::Boolean),
        SERIALIZATION_TYPE::CHAR => Some(ArgumentKind::Char),
        SERIALIZATION_TYPE::I1 => Some(ArgumentKind::I1),
        SERIALIZATION_TYPE::U1 => Some(ArgumentKind::U1),
        SERIALIZATION_TYPE::I2 => Some(ArgumentKind::I2),
        SERIALIZATION_TYPE::U2 => Some(ArgumentKind::U2),
        SERIALIZATION_TYPE::I4 => Some(ArgumentKind::I4),
        SERIALIZATION_TYPE::U4 => Some(ArgumentKind::U4),
        SERIALIZATION_TYPE::I8 => Some(ArgumentKind::I8),
        SERIALIZATION_TYPE::U8 => Some(ArgumentKind::U8),
        SERIALIZATION_TYPE::R4 => Some(ArgumentKind::R4),
        SERIALIZATION_TYPE::R8 => Some(ArgumentKind::R8),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    fn parse(blob: &[u8], params: &[ArgumentKind]) -> Result<CustomAttributeValue> {
        CustomAttributeParser::new(blob).parse_custom_attribute(params)
    }

    #[test]
    fn empty_blob() {
        let value = parse(&[0x01, 0x00], &[]).unwrap();
        assert!(value.fixed_args.is_empty());
        assert!(value.named_args.is_empty());

        let value = parse(&[0x01, 0x00, 0x00, 0x00], &[]).unwrap();
        assert!(value.named_args.is_empty());
    }

    #[test]
    fn invalid_prolog() {
        assert!(matches!(
            parse(&[0x00, 0x01, 0x00, 0x00], &[]),
            Err(Error::Malformed { .. })
        ));
        assert!(matches!(parse(&[0x01], &[]), Err(Error::OutOfBounds)));
    }

    #[test]
    fn string_arguments() {
        #[rustfmt::skip]
        let blob = [
            0x01, 0x00,
            0x07, b'1', b'.', b'2', b'.', b'3', b'.', b'4',
            0xFF,
            0x00,
            0x00, 0x00,
        ];

        let value = parse(
            &blob,
            &[ArgumentKind::String, ArgumentKind::String, ArgumentKind::String],
        )
        .unwrap();

        assert_eq!(
            value.fixed_args,
            vec![
                CustomAttributeArgument::String(Some("1.2.3.4".to_string())),
                CustomAttributeArgument::String(None),
                CustomAttributeArgument::String(Some(String::new())),
            ]
        );
    }

    #[test]
    fn primitive_arguments() {
        #[rustfmt::skip]
        let blob = [
            0x01, 0x00,
            0x01,                   // true
            0x41, 0x00,             // 'A'
            0xFE,                   // -2
            0x34, 0x12,             // 0x1234
            0xFF, 0xFF, 0xFF, 0xFF, // -1
            0x00, 0x00, 0xC0, 0x3F, // 1.5
        ];

        let value = parse(
            &blob,
            &[
                ArgumentKind::Boolean,
                ArgumentKind::Char,
                ArgumentKind::I1,
                ArgumentKind::U2,
                ArgumentKind::I4,
                ArgumentKind::R4,
            ],
        )
        .unwrap();

        assert_eq!(
            value.fixed_args,
            vec![
                CustomAttributeArgument::Bool(true),
                CustomAttributeArgument::Char('A'),
                CustomAttributeArgument::I1(-2),
                CustomAttributeArgument::U2(0x1234),
                CustomAttributeArgument::I4(-1),
                CustomAttributeArgument::R4(1.5),
            ]
        );
    }

    #[test]
    fn enum_and_type_arguments() {
        #[rustfmt::skip]
        let blob = [
            0x01, 0x00,
            0x02, 0x00,                     // enum over int16
            0x0D, b'S', b'y', b's', b't', b'e', b'm', b'.', b'S', b't', b'r', b'i', b'n', b'g',
        ];

        let value = parse(
            &blob,
            &[
                ArgumentKind::Enum {
                    name: "Acme.Level".to_string(),
                    underlying: SERIALIZATION_TYPE::I2,
                },
                ArgumentKind::Type,
            ],
        )
        .unwrap();

        assert_eq!(
            value.fixed_args[0],
            CustomAttributeArgument::Enum(
                "Acme.Level".to_string(),
                Box::new(CustomAttributeArgument::I2(2))
            )
        );
        assert_eq!(
            value.fixed_args[1],
            CustomAttributeArgument::Type(Some("System.String".to_string()))
        );
    }

    #[test]
    fn array_arguments() {
        #[rustfmt::skip]
        let blob = [
            0x01, 0x00,
            0x02, 0x00, 0x00, 0x00,
            0x01, b'A',
            0x01, b'B',
            0xFF, 0xFF, 0xFF, 0xFF, // null array
        ];

        let strings = ArgumentKind::SzArray(Box::new(ArgumentKind::String));
        let value = parse(&blob, &[strings.clone(), strings]).unwrap();

        assert_eq!(
            value.fixed_args,
            vec![
                CustomAttributeArgument::Array(Some(vec![
                    CustomAttributeArgument::String(Some("A".to_string())),
                    CustomAttributeArgument::String(Some("B".to_string())),
                ])),
                CustomAttributeArgument::Array(None),
            ]
        );

        let blob = [0x01, 0x00, 0xFE, 0xFF, 0xFF, 0xFF];
        assert!(parse(&blob, &[ArgumentKind::SzArray(Box::new(ArgumentKind::I4))]).is_err());

        // Declared length larger than the blob
        let blob = [0x01, 0x00, 0x00, 0x00, 0x00, 0x10, 0x01];
        assert!(matches!(
            parse(&blob, &[ArgumentKind::SzArray(Box::new(ArgumentKind::U1))]),
            Err(Error::OutOfBounds)
        ));
    }

    #[test]
    fn boxed_object_argument() {
        #[rustfmt::skip]
        let blob = [
            0x01, 0x00,
            0x08, 0x2A, 0x00, 0x00, 0x00,    // int32 42
            0x1D, 0x02, 0x01, 0x00, 0x00, 0x00, 0x01, // bool[] { true }
        ];

        let value = parse(&blob, &[ArgumentKind::Object, ArgumentKind::Object]).unwrap();
        assert_eq!(value.fixed_args[0], CustomAttributeArgument::I4(42));
        assert_eq!(
            value.fixed_args[1],
            CustomAttributeArgument::Array(Some(vec![CustomAttributeArgument::Bool(true)]))
        );
    }

    #[test]
    fn named_arguments() {
        #[rustfmt::skip]
        let blob = [
            0x01, 0x00,
            0x02, 0x00,
            // property string Name = "x"
            0x54, 0x0E, 0x04, b'N', b'a', b'm', b'e', 0x01, b'x',
            // field Acme.Mode Mode = 3
            0x53, 0x55, 0x09, b'A', b'c', b'm', b'e', b'.', b'M', b'o', b'd', b'e',
            0x04, b'M', b'o', b'd', b'e', 0x03, 0x00, 0x00, 0x00,
        ];

        let value = parse(&blob, &[]).unwrap();
        assert_eq!(value.named_args.len(), 2);

        let name = &value.named_args[0];
        assert!(!name.is_field);
        assert_eq!(name.name, "Name");
        assert_eq!(name.arg_type, ArgumentKind::String);
        assert_eq!(
            name.value,
            CustomAttributeArgument::String(Some("x".to_string()))
        );

        let mode = &value.named_args[1];
        assert!(mode.is_field);
        assert_eq!(mode.name, "Mode");
        assert_eq!(
            mode.value,
            CustomAttributeArgument::Enum(
                "Acme.Mode".to_string(),
                Box::new(CustomAttributeArgument::I4(3))
            )
        );
    }

    #[test]
    fn invalid_named_arguments() {
        let blob = [0x01, 0x00, 0x01, 0x00, 0x52, 0x0E, 0x01, b'x', 0x00];
        assert!(matches!(parse(&blob, &[]), Err(Error::Malformed { .. })));

        let blob = [0x01, 0x00, 0x01, 0x00, 0x54, 0x22, 0x01, b'x', 0x00];
        assert!(matches!(parse(&blob, &[]), Err(Error::Malformed { .. })));

        let blob = [0x01, 0x00, 0x01, 0x00, 0x54, 0x0E, 0xFF, 0x00];
        assert!(matches!(parse(&blob, &[]), Err(Error::Malformed { .. })));
    }

    #[test]
    fn nesting_limit() {
        // object[] { object[] { object[] { ... } } }
        let mut blob = vec![0x01, 0x00];
        for _ in 0..MAX_NESTING_DEPTH {
            blob.extend_from_slice(&[0x1D, 0x51, 0x01, 0x00, 0x00, 0x00]);
        }
        blob.extend_from_slice(&[0x08, 0x00, 0x00, 0x00, 0x00]);

        assert!(matches!(
            parse(&blob, &[ArgumentKind::Object]),
            Err(Error::RecursionLimit(_))
        ));
    }
}
