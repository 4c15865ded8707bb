//! # Dictionary Column Codec
//!
//! A dictionary-encoded column codec for a columnar analytical storage
//! engine, modeled on ClickHouse's `LowCardinality` wire format: a column
//! is serialized as a **keys stream** of distinct values and an **indexes
//! stream** of per-row references into those values, with a long-lived
//! global dictionary coordinated against a per-block additional-keys
//! spillover once the global dictionary's budget is exhausted.
//!
//! # Quick Start
//!
//! ```
//! use dictionary_column_codec::column::ColumnValue;
//! use dictionary_column_codec::dictionary::{
//!     build_column,
//!     DictionaryDeserializer,
//!     DictionarySerializer,
//!     SerializerSettings,
//! };
//! use dictionary_column_codec::io::{SubstreamReader, SubstreamWriter};
//! use dictionary_column_codec::types::ElementKind;
//! use bytes::BytesMut;
//!
//! # fn example() -> dictionary_column_codec::Result<()> {
//! let mut column = build_column("WithDictionary(String)")?;
//! for s in ["a", "b", "a"] {
//!     column.append_value(&ColumnValue::new(ElementKind::String, s.as_bytes().to_vec()))?;
//! }
//!
//! let settings = SerializerSettings { max_dictionary_size: 1024, use_new_dictionary_on_overflow: false };
//! let mut serializer = DictionarySerializer::new(ElementKind::String, false, settings);
//! let mut keys = BytesMut::new();
//! let mut indexes = BytesMut::new();
//! {
//!     let mut writer = SubstreamWriter::new(&mut keys, &mut indexes);
//!     serializer.write_prefix(&mut writer)?;
//!     serializer.serialize_block(&column, 0, column.len(), &mut writer)?;
//!     serializer.write_suffix(&mut writer)?;
//! }
//!
//! let mut keys_slice = &keys[..];
//! let mut indexes_slice = &indexes[..];
//! let mut decoded = build_column("WithDictionary(String)")?;
//! let mut deserializer = DictionaryDeserializer::new(ElementKind::String, false);
//! let mut reader = SubstreamReader::new(&mut keys_slice, &mut indexes_slice);
//! deserializer.read_prefix(&mut reader)?;
//! deserializer.deserialize_block(&mut decoded, 3, &mut reader)?;
//! assert_eq!(decoded.len(), 3);
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`dictionary`] - the codec core: index-type header, unique column,
//!   dictionary-encoded column, serializer, deserializer, and factory (C1-C6)
//! - [`column`] - the element column abstraction the codec stores values in
//! - [`types`] - the `WithDictionary(T)` element type grammar and parser
//! - [`io`] - substream routing and varint/string buffer helpers
//! - [`error`] - error types and the `Result` alias

#![warn(missing_docs)]

/// Element column abstraction: numeric, string, and fixed-string columns.
pub mod column;
/// The dictionary-encoded column codec (C1-C6).
pub mod dictionary;
/// Error types and `Result` alias.
pub mod error;
/// Substream routing and buffer utilities.
pub mod io;
/// The `WithDictionary(T)` element type grammar and parser.
pub mod types;

pub use error::{
    Error,
    Result,
};
