//! # Element Column Abstraction
//!
//! The dictionary codec (§4) is built on top of plain columns of the
//! permitted element kinds (§3): these are the values a [`UniqueColumn`]
//! stores and the values the wire-level bulk element codec (§6) reads and
//! writes. Nullability lives one level up, inside the dictionary's id
//! assignment (id 0 reserved for null) — these columns themselves are
//! always non-nullable, matching "the non-null values form a nested
//! column accessible independently" (§3).
//!
//! [`ElementColumn`] is a trimmed-down analogue of a generic columnar
//! engine's `Column` trait: just enough surface for the dictionary state
//! machine to store, hash-dedup, slice, and bulk (de)serialize values.
//!
//! [`UniqueColumn`]: crate::dictionary::UniqueColumn

/// [`ColumnValue`] — a type-tagged, owned value pulled out of (or destined
/// for) an [`ElementColumn`], used for hashing and single-value transfer.
pub mod column_value;
/// Variable-length string and fixed-length string element columns.
pub mod string;
/// Numeric (and Date/DateTime, which are opaque integers at this layer)
/// element columns.
pub mod numeric;

pub use column_value::ColumnValue;
pub use numeric::ColumnVector;
pub use string::{
    ColumnFixedString,
    ColumnString,
};

use crate::{
    types::ElementKind,
    Result,
};
use bytes::BytesMut;

/// A plain (non-nullable) column of one of the permitted dictionary
/// element kinds.
///
/// Implementations back both the persistent nested storage inside a
/// [`UniqueColumn`](crate::dictionary::UniqueColumn) and the transient
/// "additional keys" / "overflow" columns built per block.
pub trait ElementColumn: Send + Sync {
    /// The element kind this column stores.
    fn kind(&self) -> ElementKind;

    /// Number of values currently stored.
    fn len(&self) -> usize;

    /// Whether the column holds no values.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop all stored values.
    fn clear(&mut self);

    /// Reserve storage for at least `additional` more values.
    fn reserve(&mut self, additional: usize);

    /// Read the value at `index` as an owned, type-tagged [`ColumnValue`].
    fn get_value(&self, index: usize) -> ColumnValue;

    /// Append one value, which must carry this column's element kind.
    fn append_value(&mut self, value: &ColumnValue) -> Result<()>;

    /// Bulk-serialize every stored value to `buffer` using this element
    /// kind's wire format (§6's `serialize_binary_bulk`).
    fn serialize_binary_bulk(&self, buffer: &mut BytesMut) -> Result<()>;

    /// Bulk-deserialize `limit` values from `buffer`, appending them
    /// (§6's `deserialize_binary_bulk`).
    fn deserialize_binary_bulk(
        &mut self,
        buffer: &mut &[u8],
        limit: usize,
    ) -> Result<()>;

    /// An empty column of the same element kind.
    fn clone_empty(&self) -> Box<dyn ElementColumn>;

    /// Downcast support for tests and callers that need the concrete type.
    fn as_any(&self) -> &dyn std::any::Any;

    /// Mutable downcast support.
    fn as_any_mut(&mut self) -> &mut dyn std::any::Any;
}

/// Construct an empty [`ElementColumn`] for the given element kind (part of
/// C6's factory responsibility, §4.6).
pub fn new_element_column(kind: ElementKind) -> Box<dyn ElementColumn> {
    use crate::types::ElementKind::*;
    match kind {
        Int8 => Box::new(ColumnVector::<i8>::new()),
        Int16 => Box::new(ColumnVector::<i16>::new()),
        Int32 => Box::new(ColumnVector::<i32>::new()),
        Int64 => Box::new(ColumnVector::<i64>::new()),
        UInt8 => Box::new(ColumnVector::<u8>::new()),
        UInt16 => Box::new(ColumnVector::<u16>::new()),
        UInt32 => Box::new(ColumnVector::<u32>::new()),
        UInt64 => Box::new(ColumnVector::<u64>::new()),
        Date => Box::new(ColumnVector::<u16>::new_as(ElementKind::Date)),
        DateTime => Box::new(ColumnVector::<u32>::new_as(ElementKind::DateTime)),
        String => Box::new(ColumnString::new()),
        FixedString(size) => Box::new(ColumnFixedString::new(size)),
    }
}
