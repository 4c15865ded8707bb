//! Numeric element columns.
//!
//! All integer kinds are stored little-endian, matching the element codec's
//! wire format (§6). `Date` and `DateTime` share the `u16`/`u32` storage of
//! `UInt16`/`UInt32` but carry their own [`ElementKind`] tag — the on-disk
//! element codec is opaque to this layer (§1), so no calendar arithmetic is
//! implemented here.

use super::{
    column_value::ColumnValue,
    ElementColumn,
};
use crate::{
    types::ElementKind,
    Error,
    Result,
};
use bytes::{
    Buf,
    BufMut,
    BytesMut,
};

/// Types that can be read/written as fixed-size little-endian values.
pub trait FixedSize: Copy + Send + Sync + 'static {
    /// Byte width of one value.
    const WIDTH: usize;
    /// Read one value from the front of `buffer`, advancing it.
    fn read_from(buffer: &mut &[u8]) -> Result<Self>;
    /// Write one value to `buffer`.
    fn write_to(&self, buffer: &mut BytesMut);
    /// Decode from a little-endian byte slice of exactly `WIDTH` bytes.
    fn from_le_bytes_slice(bytes: &[u8]) -> Self;
    /// Encode as a little-endian byte vector of `WIDTH` bytes.
    fn to_le_bytes_vec(&self) -> Vec<u8>;
}

macro_rules! impl_fixed_size {
    ($ty:ty, $width:expr, $get:ident, $put:ident) => {
        impl FixedSize for $ty {
            const WIDTH: usize = $width;

            fn read_from(buffer: &mut &[u8]) -> Result<Self> {
                if buffer.len() < $width {
                    return Err(Error::LogicalError(format!(
                        "buffer underflow reading {}: need {} bytes, have {}",
                        stringify!($ty),
                        $width,
                        buffer.len()
                    )));
                }
                Ok(buffer.$get())
            }

            fn write_to(&self, buffer: &mut BytesMut) {
                buffer.$put(*self);
            }

            fn from_le_bytes_slice(bytes: &[u8]) -> Self {
                let arr: [u8; $width] = bytes.try_into().expect("exact width slice");
                <$ty>::from_le_bytes(arr)
            }

            fn to_le_bytes_vec(&self) -> Vec<u8> {
                self.to_le_bytes().to_vec()
            }
        }
    };
}

impl_fixed_size!(u8, 1, get_u8, put_u8);
impl_fixed_size!(u16, 2, get_u16_le, put_u16_le);
impl_fixed_size!(u32, 4, get_u32_le, put_u32_le);
impl_fixed_size!(u64, 8, get_u64_le, put_u64_le);
impl_fixed_size!(i8, 1, get_i8, put_i8);
impl_fixed_size!(i16, 2, get_i16_le, put_i16_le);
impl_fixed_size!(i32, 4, get_i32_le, put_i32_le);
impl_fixed_size!(i64, 8, get_i64_le, put_i64_le);

/// Maps a Rust primitive to its default dictionary [`ElementKind`].
pub trait ToElementKind {
    /// The element kind this Rust type represents by default.
    fn to_element_kind() -> ElementKind;
}

macro_rules! impl_to_element_kind {
    ($ty:ty, $kind:expr) => {
        impl ToElementKind for $ty {
            fn to_element_kind() -> ElementKind {
                $kind
            }
        }
    };
}

impl_to_element_kind!(i8, ElementKind::Int8);
impl_to_element_kind!(i16, ElementKind::Int16);
impl_to_element_kind!(i32, ElementKind::Int32);
impl_to_element_kind!(i64, ElementKind::Int64);
impl_to_element_kind!(u8, ElementKind::UInt8);
impl_to_element_kind!(u16, ElementKind::UInt16);
impl_to_element_kind!(u32, ElementKind::UInt32);
impl_to_element_kind!(u64, ElementKind::UInt64);

/// A column of fixed-width numeric values.
///
/// `kind` is tracked separately from `T` so that `Date` (`u16`) and
/// `DateTime` (`u32`) can reuse `UInt16`/`UInt32` storage under a distinct
/// element-kind tag.
pub struct ColumnVector<T: FixedSize> {
    kind: ElementKind,
    data: Vec<T>,
}

impl<T: FixedSize + ToElementKind> ColumnVector<T> {
    /// A new, empty column tagged with `T`'s default element kind.
    pub fn new() -> Self {
        Self { kind: T::to_element_kind(), data: Vec::new() }
    }
}

impl<T: FixedSize + ToElementKind> Default for ColumnVector<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: FixedSize> ColumnVector<T> {
    /// A new, empty column tagged with an explicit element kind (used for
    /// `Date`/`DateTime`, which reuse `u16`/`u32` storage).
    pub fn new_as(kind: ElementKind) -> Self {
        Self { kind, data: Vec::new() }
    }

    /// Value at `index`.
    pub fn at(&self, index: usize) -> T {
        self.data[index]
    }

    /// Append a raw value (bypassing the [`ColumnValue`] tagging).
    pub fn append_raw(&mut self, value: T) {
        self.data.push(value);
    }

    /// All stored values.
    pub fn data(&self) -> &[T] {
        &self.data
    }
}

impl<T: FixedSize> ElementColumn for ColumnVector<T> {
    fn kind(&self) -> ElementKind {
        self.kind
    }

    fn len(&self) -> usize {
        self.data.len()
    }

    fn clear(&mut self) {
        self.data.clear();
    }

    fn reserve(&mut self, additional: usize) {
        self.data.reserve(additional);
    }

    fn get_value(&self, index: usize) -> ColumnValue {
        ColumnValue::new(self.kind, self.data[index].to_le_bytes_vec())
    }

    fn append_value(&mut self, value: &ColumnValue) -> Result<()> {
        value.expect_kind(self.kind)?;
        self.data.push(T::from_le_bytes_slice(&value.data));
        Ok(())
    }

    fn serialize_binary_bulk(&self, buffer: &mut BytesMut) -> Result<()> {
        for value in &self.data {
            value.write_to(buffer);
        }
        Ok(())
    }

    fn deserialize_binary_bulk(
        &mut self,
        buffer: &mut &[u8],
        limit: usize,
    ) -> Result<()> {
        self.data.reserve(limit);
        for _ in 0..limit {
            self.data.push(T::read_from(buffer)?);
        }
        Ok(())
    }

    fn clone_empty(&self) -> Box<dyn ElementColumn> {
        Box::new(ColumnVector::<T>::new_as(self.kind))
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}
