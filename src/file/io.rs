//! Bounds-checked little-endian reads.
//!
//! Every multi-byte field in the PE container and in ECMA-335 metadata is stored little-endian.
//! The helpers here read primitive values out of byte slices without panicking: a read that
//! would run past the end of the slice fails with [`crate::Error::OutOfBounds`].
//!
//! - [`CilIO`] - conversion from a fixed-size byte array into a primitive
//! - [`read_le`] - read a value from the start of a slice
//! - [`read_le_at`] - read a value at an offset and advance the offset
//! - [`read_le_at_dyn`] - read a 2- or 4-byte heap/table index depending on the index width
//!
//! # Examples
//!
//! ```rust,ignore
//! use asminfo::file::io::{read_le, read_le_at};
//!
//! let data = [0x42, 0x53, 0x4A, 0x42, 0x01, 0x00];
//! assert_eq!(read_le::<u32>(&data)?, 0x424A_5342);
//!
//! let mut offset = 4;
//! assert_eq!(read_le_at::<u16>(&data, &mut offset)?, 1);
//! assert_eq!(offset, 6);
//! # Ok::<(), asminfo::Error>(())
//! ```

use crate::Result;

/// Primitive types that can be decoded from their little-endian byte representation.
pub trait CilIO: Sized {
    /// Associated type representing the byte array type for this numeric type.
    type Bytes: Sized + for<'a> TryFrom<&'a [u8]>;

    /// Read T from a byte buffer in little-endian
    fn from_le_bytes(bytes: Self::Bytes) -> Self;
}

macro_rules! impl_cil_io {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl CilIO for $ty {
                type Bytes = [u8; std::mem::size_of::<$ty>()];

                fn from_le_bytes(bytes: Self::Bytes) -> Self {
                    <$ty>::from_le_bytes(bytes)
                }
            }
        )+
    };
}

impl_cil_io!(u8, i8, u16, i16, u32, i32, u64, i64, f32, f64);

/// Read a `T` from the start of `data`.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if `data` is shorter than `T`
pub fn read_le<T: CilIO>(data: &[u8]) -> Result<T> {
    let mut offset = 0_usize;
    read_le_at(data, &mut offset)
}

/// Read a `T` at `offset` and advance `offset` past it.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if the read would pass the end of `data`
pub fn read_le_at<T: CilIO>(data: &[u8], offset: &mut usize) -> Result<T> {
    let type_len = std::mem::size_of::<T>();
    let Some(end) = offset.checked_add(type_len) else {
        return Err(out_of_bounds_error!());
    };

    let Some(bytes) = data.get(*offset..end) else {
        return Err(out_of_bounds_error!());
    };

    let Ok(read) = bytes.try_into() else {
        return Err(out_of_bounds_error!());
    };

    *offset = end;

    Ok(T::from_le_bytes(read))
}

/// Read a 4-byte value if `is_large`, otherwise a 2-byte value widened to `u32`.
///
/// Metadata heap and table indexes use this variable width encoding.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if the read would pass the end of `data`
pub fn read_le_at_dyn(data: &[u8], offset: &mut usize, is_large: bool) -> Result<u32> {
    if is_large {
        read_le_at::<u32>(data, offset)
    } else {
        Ok(u32::from(read_le_at::<u16>(data, offset)?))
    }
}
