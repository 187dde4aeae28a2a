//! Values and types of serialized custom attribute arguments (ECMA-335 II.23.3).

/// A decoded custom attribute blob
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CustomAttributeValue {
    /// Arguments passed to the constructor, in parameter order
    pub fixed_args: Vec<CustomAttributeArgument>,
    /// Fields and properties set after construction
    pub named_args: Vec<CustomAttributeNamedArgument>,
}

/// A single decoded argument value
#[derive(Debug, Clone, PartialEq)]
pub enum CustomAttributeArgument {
    /// Boolean value
    Bool(bool),
    /// UTF-16 code unit, unpaired surrogates become U+FFFD
    Char(char),
    /// Signed 8-bit integer
    I1(i8),
    /// Unsigned 8-bit integer
    U1(u8),
    /// Signed 16-bit integer
    I2(i16),
    /// Unsigned 16-bit integer
    U2(u16),
    /// Signed 32-bit integer
    I4(i32),
    /// Unsigned 32-bit integer
    U4(u32),
    /// Signed 64-bit integer
    I8(i64),
    /// Unsigned 64-bit integer
    U8(u64),
    /// 32-bit floating point
    R4(f32),
    /// 64-bit floating point
    R8(f64),
    /// Native signed integer
    I(isize),
    /// Native unsigned integer
    U(usize),
    /// A string, `None` for the null string
    String(Option<String>),
    /// A `System.Type` as its serialized type name, `None` for null
    Type(Option<String>),
    /// An enum value: the enum type name and its underlying value
    Enum(String, Box<CustomAttributeArgument>),
    /// A single-dimensional array, `None` for the null array
    Array(Option<Vec<CustomAttributeArgument>>),
}

/// A field or property assignment
#[derive(Debug, Clone, PartialEq)]
pub struct CustomAttributeNamedArgument {
    /// `true` for a field, `false` for a property
    pub is_field: bool,
    /// Name of the field or property
    pub name: String,
    /// Declared type of the member
    pub arg_type: ArgumentKind,
    /// Assigned value
    pub value: CustomAttributeArgument,
}

/// How an argument is laid out in the blob.
///
/// Fixed arguments get their kind from the constructor signature, named arguments and boxed
/// `System.Object` values carry it inline as a [`SERIALIZATION_TYPE`] tag.
#[derive(Debug, Clone, PartialEq)]
#[allow(missing_docs)]
pub enum ArgumentKind {
    Boolean,
    Char,
    I1,
    U1,
    I2,
    U2,
    I4,
    U4,
    I8,
    U8,
    R4,
    R8,
    I,
    U,
    String,
    /// `System.Type`
    Type,
    /// `System.Object`, the value is preceded by its own type tag
    Object,
    /// An enum with its full name and the [`SERIALIZATION_TYPE`] of its underlying integer
    Enum { name: String, underlying: u8 },
    /// A single-dimensional array of the given element kind
    SzArray(Box<ArgumentKind>),
}

/// `CorSerializationType` tags (ECMA-335 II.23.3)
#[allow(non_snake_case, missing_docs)]
pub mod SERIALIZATION_TYPE {
    pub const BOOLEAN: u8 = 0x02;
    pub const CHAR: u8 = 0x03;
    pub const I1: u8 = 0x04;
    pub const U1: u8 = 0x05;
    pub const I2: u8 = 0x06;
    pub const U2: u8 = 0x07;
    pub const I4: u8 = 0x08;
    pub const U4: u8 = 0x09;
    pub const I8: u8 = 0x0A;
    pub const U8: u8 = 0x0B;
    pub const R4: u8 = 0x0C;
    pub const R8: u8 = 0x0D;
    pub const STRING: u8 = 0x0E;
    pub const SZARRAY: u8 = 0x1D;
    pub const TYPE: u8 = 0x50;
    pub const TAGGED_OBJECT: u8 = 0x51;
    pub const FIELD: u8 = 0x53;
    pub const PROPERTY: u8 = 0x54;
    pub const ENUM: u8 = 0x55;
}
