//! Type guard & factory (C6, §4.6): validates a `WithDictionary(T)` type
//! string and builds the codec pieces for it.
//!
//! Construction dispatches on the parsed [`ElementKind`] via
//! [`new_element_column`](crate::column::new_element_column) — string,
//! fixed string, date, datetime, and each integer width already get their
//! own `ElementColumn` impl there, so this layer only needs to carry the
//! kind and nullability through to [`UniqueColumn`], [`DictionarySerializer`],
//! and [`DictionaryDeserializer`].

use crate::{
    types::{
        parse_with_dictionary,
        DictElementType,
    },
    Result,
};

use super::{
    DictionaryDeserializer,
    DictionaryEncodedColumn,
    DictionarySerializer,
    SerializerSettings,
};

/// Parse a `WithDictionary(T)` type string and build the matching empty
/// [`DictionaryEncodedColumn`]. Fails with [`crate::Error::IllegalTypeOfArgument`]
/// or [`crate::Error::NumberOfArgumentsDoesntMatch`] per §4.6.
pub fn build_column(type_name: &str) -> Result<DictionaryEncodedColumn> {
    let element_type = parse_with_dictionary(type_name)?;
    Ok(column_for(element_type))
}

/// An empty [`DictionaryEncodedColumn`] for an already-validated type.
pub fn column_for(element_type: DictElementType) -> DictionaryEncodedColumn {
    DictionaryEncodedColumn::new(element_type.kind, element_type.nullable)
}

/// Build a [`DictionarySerializer`] for an already-validated type.
pub fn serializer_for(
    element_type: DictElementType,
    settings: SerializerSettings,
) -> DictionarySerializer {
    DictionarySerializer::new(element_type.kind, element_type.nullable, settings)
}

/// Build a [`DictionaryDeserializer`] for an already-validated type.
pub fn deserializer_for(element_type: DictElementType) -> DictionaryDeserializer {
    DictionaryDeserializer::new(element_type.kind, element_type.nullable)
}
