use std::path::PathBuf;

use thiserror::Error;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

macro_rules! out_of_bounds_error {
    () => {
        crate::Error::OutOfBounds
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// The variants fall into three groups, matching the ways a single reflection call can fail:
///
/// # Error Categories
///
/// ## Call boundary and path resolution
/// - [`Error::InvalidArgument`] - An argument was missing (e.g. an empty path)
/// - [`Error::FileNotFound`] - The resolved path does not reference an existing file
///
/// ## Unreadable module
/// These are raised by the binary reader and are surfaced unmodified:
/// - [`Error::Malformed`] - Corrupted or invalid file structure
/// - [`Error::OutOfBounds`] - Attempted to read beyond file or heap boundaries
/// - [`Error::NotSupported`] - Unsupported file format or feature
/// - [`Error::Empty`] - Empty input provided
/// - [`Error::FileError`] - Filesystem I/O errors
/// - [`Error::GoblinErr`] - PE parsing errors from the goblin crate
/// - [`Error::RecursionLimit`] - Maximum nesting depth exceeded
///
/// ## Attribute decoding
/// - [`Error::DuplicateAttribute`] - A single-valued attribute was applied more than once
/// - [`Error::MissingArgument`] - A matched attribute carries no constructor argument
/// - [`Error::TypeConversionInvalid`] - An argument could not be converted to the requested form
///
/// # Examples
///
/// ```rust,no_run
/// use asminfo::{reflect_assembly_info, Error};
///
/// match reflect_assembly_info("bin/Release/Acme.dll") {
///     Ok(info) => println!("Version: {:?}", info.version()),
///     Err(Error::FileNotFound(path)) => eprintln!("missing: {}", path.display()),
///     Err(Error::Malformed { message, file, line }) => {
///         eprintln!("Malformed file: {} ({}:{})", message, file, line);
///     }
///     Err(e) => eprintln!("Other error: {}", e),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    // Call boundary
    /// A required argument was not supplied.
    ///
    /// The associated value names the argument. Raised before any I/O takes place.
    #[error("Argument '{0}' must not be empty")]
    InvalidArgument(&'static str),

    /// The assembly file does not exist.
    ///
    /// Carries the absolute path that was checked.
    #[error("Assembly file '{}' does not exist.", .0.display())]
    FileNotFound(PathBuf),

    // File parsing Errors
    /// The file is damaged and could not be parsed.
    ///
    /// This error indicates that the file structure is corrupted or doesn't
    /// conform to the expected .NET PE format. The error includes the source
    /// location where the malformation was detected for debugging purposes.
    ///
    /// # Fields
    ///
    /// * `message` - Detailed description of what was malformed
    /// * `file` - Source file where the error was detected
    /// * `line` - Source line where the error was detected
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// An out of bound access was attempted while parsing the file.
    ///
    /// This error occurs when trying to read data beyond the end of the file,
    /// a stream or a blob.
    #[error("Out of Bound read would have occurred!")]
    OutOfBounds,

    /// This file type is not supported.
    ///
    /// Indicates that the input uses metadata features this reader does not handle,
    /// such as tables outside of the ECMA-335 range.
    #[error("This file type is not supported")]
    NotSupported,

    /// Provided input was empty.
    #[error("Provided input was empty")]
    Empty,

    /// File I/O error.
    ///
    /// Wraps standard I/O errors that can occur while opening or mapping the file.
    #[error("{0}")]
    FileError(#[from] std::io::Error),

    /// Error from the goblin crate during PE parsing.
    #[error("{0}")]
    GoblinErr(#[from] goblin::error::Error),

    /// Recursion limit reached.
    ///
    /// Signature decoding and nested type-name resolution are bounded. The associated
    /// value shows the limit that was reached.
    #[error("Reach the maximum recursion level allowed - {0}")]
    RecursionLimit(usize),

    // Attribute decoding
    /// A single-valued attribute kind was found more than once on the assembly.
    ///
    /// The associated value is the full name of the attribute type.
    #[error("Attribute '{0}' is applied more than once")]
    DuplicateAttribute(String),

    /// A matched attribute has no constructor argument to read.
    ///
    /// The associated value is the full name of the attribute type.
    #[error("Attribute '{0}' has no constructor argument")]
    MissingArgument(String),

    /// The requested type conversion is not possible.
    ///
    /// Raised when a decoded argument can not be rendered in the form the
    /// attribute kind requires, e.g. a non-boolean value for a boolean attribute.
    #[error("The requested type conversion is not possible")]
    TypeConversionInvalid,
}
