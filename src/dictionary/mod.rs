//! # Dictionary-Encoded Column Codec
//!
//! The core of this crate (§1, §2): a binary serialization/deserialization
//! state machine that represents a column as a keys stream of distinct
//! values and an indexes stream of per-row references into those values,
//! coordinating a long-lived global dictionary against a per-block
//! additional-keys spillover.
//!
//! | Module | Component |
//! |--------|-----------|
//! | [`index_type`] | C1 — per-block header |
//! | [`unique_column`] | C2 — global dictionary / unique value set |
//! | [`encoded_column`] | C3 — `D(T)` = (dictionary, ids) |
//! | [`serializer`] | C4 — encode state machine |
//! | [`deserializer`] | C5 — decode state machine |
//! | [`factory`] | C6 — type guard & construction |

/// C1: the per-block index-type header.
pub mod index_type;
/// C2: the global dictionary / unique value set.
pub mod unique_column;
/// C3: the dictionary-encoded column pairing a dictionary with ids.
pub mod encoded_column;
/// C4: the encoder state machine.
pub mod serializer;
/// C5: the decoder state machine.
pub mod deserializer;
/// C6: the type guard and construction entry points.
pub mod factory;

pub use encoded_column::DictionaryEncodedColumn;
pub use deserializer::DictionaryDeserializer;
pub use factory::{
    build_column,
    column_for,
    deserializer_for,
    serializer_for,
};
pub use index_type::{
    IndexType,
    IndexWidth,
};
pub use serializer::{
    DictionarySerializer,
    SerializerSettings,
};
pub use unique_column::UniqueColumn;

pub use crate::column::column_value::compute_hash_key;
