//! Deserialization state machine (C5, §4.5): drives prefix → per-block
//! decoding, owning the decoder-side global dictionary and the pending
//! additional-keys/row-count state a block may leave unfinished across
//! `deserialize` calls.

use crate::{
    column::{
        new_element_column,
        ColumnValue,
        ElementColumn,
    },
    io::SubstreamReader,
    types::ElementKind,
    Error,
    Result,
};
use bytes::Buf;
use std::{
    cell::RefCell,
    rc::Rc,
};

use super::{
    index_type::{
        unpack_ids,
        IndexType,
    },
    DictionaryEncodedColumn,
    UniqueColumn,
};

/// Drives one decode session: one `read_prefix`, any number of
/// `deserialize_block` calls.
pub struct DictionaryDeserializer {
    kind: ElementKind,
    nullable: bool,
    key_version: Option<u64>,
    global_dictionary: Option<Rc<RefCell<UniqueColumn>>>,
    last_index_type: Option<IndexType>,
    additional_keys: Option<Vec<ColumnValue>>,
    num_pending_rows: u64,
}

impl DictionaryDeserializer {
    /// A new deserializer for the given element type.
    pub fn new(kind: ElementKind, nullable: bool) -> Self {
        Self {
            kind,
            nullable,
            key_version: None,
            global_dictionary: None,
            last_index_type: None,
            additional_keys: None,
            num_pending_rows: 0,
        }
    }

    /// Read and validate the keys-stream version word, and reset decoder
    /// state for a new session.
    pub fn read_prefix(&mut self, reader: &mut SubstreamReader) -> Result<()> {
        let keys = reader
            .keys
            .as_deref_mut()
            .ok_or_else(|| Error::LogicalError("keys stream required for prefix".to_string()))?;
        if keys.len() < 8 {
            return Err(Error::LogicalError("not enough data for key version".to_string()));
        }
        let version = keys.get_u64_le();
        if version != 1 {
            return Err(Error::LogicalError(format!(
                "unsupported dictionary key version: {version}"
            )));
        }
        self.key_version = Some(version);
        self.global_dictionary = None;
        self.last_index_type = None;
        self.additional_keys = None;
        self.num_pending_rows = 0;
        Ok(())
    }

    /// Decode up to `limit` rows into `column`, carrying any partial block
    /// state forward to the next call (§4.5).
    pub fn deserialize_block(
        &mut self,
        column: &mut DictionaryEncodedColumn,
        mut limit: usize,
        reader: &mut SubstreamReader,
    ) -> Result<()> {
        while limit > 0 {
            if self.num_pending_rows == 0 {
                let indexes_is_empty = reader.indexes.as_deref().map(|s| s.is_empty()).unwrap_or(true);
                if indexes_is_empty {
                    break;
                }
                let indexes = reader.indexes.as_deref_mut().unwrap();
                let header = IndexType::deserialize(indexes)?;
                self.last_index_type = Some(header);

                if header.need_global_dictionary && self.global_dictionary.is_none() {
                    let keys_stream = reader.keys.as_deref_mut().ok_or_else(|| {
                        Error::LogicalError("keys stream required for global dictionary block".to_string())
                    })?;
                    let nested = read_nested_bulk(keys_stream, self.kind)?;
                    let mut dict = UniqueColumn::new(self.kind, self.nullable);
                    dict.set_nested(nested);
                    self.global_dictionary = Some(Rc::new(RefCell::new(dict)));
                }

                if header.has_additional_keys {
                    let indexes = reader.indexes.as_deref_mut().unwrap();
                    let nested = read_nested_bulk(indexes, self.kind)?;
                    let values = (0..nested.len()).map(|i| nested.get_value(i)).collect();
                    self.additional_keys = Some(values);
                } else {
                    self.additional_keys = None;
                }

                let indexes = reader.indexes.as_deref_mut().unwrap();
                if indexes.len() < 8 {
                    return Err(Error::LogicalError("not enough data for row count".to_string()));
                }
                self.num_pending_rows = indexes.get_u64_le();
            }

            let header = self.last_index_type.expect("set above when num_pending_rows was 0");
            let n = limit.min(self.num_pending_rows as usize);
            let indexes = reader
                .indexes
                .as_deref_mut()
                .ok_or_else(|| Error::LogicalError("indexes stream required to read ids".to_string()))?;
            let ids = unpack_ids(indexes, header.width, n)?;

            self.apply_block_ids(column, &header, &ids)?;

            limit -= n;
            self.num_pending_rows -= n as u64;
        }
        Ok(())
    }

    fn apply_block_ids(
        &self,
        column: &mut DictionaryEncodedColumn,
        header: &IndexType,
        ids: &[u64],
    ) -> Result<()> {
        let offset = self.nullable as u64;

        // Case A: pure global reference, no additional keys.
        if header.need_global_dictionary && !header.has_additional_keys {
            let global = self
                .global_dictionary
                .as_ref()
                .ok_or_else(|| Error::LogicalError("missing global dictionary".to_string()))?;
            if column.is_empty() {
                column.set_shared_dictionary(Rc::clone(global))?;
                column.append_ids_from_own_dictionary(ids);
            } else if Rc::ptr_eq(&column.dictionary(), global) {
                column.append_ids_from_own_dictionary(ids);
            } else {
                for &id in ids {
                    let value = global.borrow().value_for_id(id);
                    column.append_value(&value)?;
                }
            }
            return Ok(());
        }

        // Case B: additional keys only, no global dictionary in play.
        if !header.need_global_dictionary {
            let additional = self
                .additional_keys
                .as_deref()
                .unwrap_or(&[]);
            for &id in ids {
                let value = if self.nullable && id == 0 {
                    ColumnValue::null(self.kind)
                } else {
                    additional[(id - offset) as usize].clone()
                };
                column.append_value(&value)?;
            }
            return Ok(());
        }

        // Case C: both global and additional keys.
        let global = self
            .global_dictionary
            .as_ref()
            .ok_or_else(|| Error::LogicalError("missing global dictionary".to_string()))?;
        let global_len = global.borrow().len();
        let additional = self.additional_keys.as_deref().unwrap_or(&[]);
        for &id in ids {
            let value = if id < global_len {
                global.borrow().value_for_id(id)
            } else {
                additional[(id - global_len) as usize].clone()
            };
            column.append_value(&value)?;
        }
        Ok(())
    }
}

fn read_nested_bulk(buffer: &mut &[u8], kind: ElementKind) -> Result<Box<dyn ElementColumn>> {
    if buffer.len() < 8 {
        return Err(Error::LogicalError("not enough data for key count".to_string()));
    }
    let num_keys = buffer.get_u64_le() as usize;
    let mut column = new_element_column(kind);
    column.deserialize_binary_bulk(buffer, num_keys)?;
    Ok(column)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dictionary::{
            serializer::{
                DictionarySerializer,
                SerializerSettings,
            },
            DictionaryEncodedColumn,
        },
        io::SubstreamWriter,
    };
    use bytes::BytesMut;

    fn v(s: &str) -> ColumnValue {
        ColumnValue::new(ElementKind::String, s.as_bytes().to_vec())
    }

    fn round_trip(values: &[ColumnValue], settings: SerializerSettings, nullable: bool) -> Vec<ColumnValue> {
        let mut column = DictionaryEncodedColumn::new(ElementKind::String, nullable);
        for value in values {
            column.append_value(value).unwrap();
        }

        let mut serializer = DictionarySerializer::new(ElementKind::String, nullable, settings);
        let mut keys_buf = BytesMut::new();
        let mut indexes_buf = BytesMut::new();
        {
            let mut writer = SubstreamWriter::new(&mut keys_buf, &mut indexes_buf);
            serializer.write_prefix(&mut writer).unwrap();
            serializer.serialize_block(&column, 0, column.len(), &mut writer).unwrap();
            serializer.write_suffix(&mut writer).unwrap();
        }

        let mut keys_slice = &keys_buf[..];
        let mut indexes_slice = &indexes_buf[..];
        let mut decoded = DictionaryEncodedColumn::new(ElementKind::String, nullable);
        let mut deserializer = DictionaryDeserializer::new(ElementKind::String, nullable);
        {
            let mut reader = SubstreamReader::new(&mut keys_slice, &mut indexes_slice);
            deserializer.read_prefix(&mut reader).unwrap();
            deserializer.deserialize_block(&mut decoded, values.len(), &mut reader).unwrap();
        }

        (0..decoded.len()).map(|i| decoded.get_value(i)).collect()
    }

    #[test]
    fn strings_within_budget_round_trip() {
        let values: Vec<_> = ["a", "b", "a", "c", "b", "a"].iter().map(|s| v(s)).collect();
        let settings =
            SerializerSettings { max_dictionary_size: 16, use_new_dictionary_on_overflow: false };
        let decoded = round_trip(&values, settings, false);
        assert_eq!(decoded, values);
    }

    #[test]
    fn overflow_into_additional_keys_round_trips() {
        let values: Vec<_> = ["a", "b", "c", "d", "e"].iter().map(|s| v(s)).collect();
        let settings =
            SerializerSettings { max_dictionary_size: 2, use_new_dictionary_on_overflow: false };
        let decoded = round_trip(&values, settings, false);
        assert_eq!(decoded, values);
    }

    #[test]
    fn disabled_global_dictionary_round_trips() {
        let values: Vec<_> = ["a", "b", "a", "c"].iter().map(|s| v(s)).collect();
        let settings =
            SerializerSettings { max_dictionary_size: 0, use_new_dictionary_on_overflow: false };
        let decoded = round_trip(&values, settings, false);
        assert_eq!(decoded, values);
    }

    #[test]
    fn nullable_strings_round_trip() {
        let values = vec![v("x"), ColumnValue::null(ElementKind::String), v("x"), v("y"), ColumnValue::null(ElementKind::String)];
        let settings =
            SerializerSettings { max_dictionary_size: 16, use_new_dictionary_on_overflow: false };
        let decoded = round_trip(&values, settings, true);
        assert_eq!(decoded, values);
    }

    #[test]
    fn malformed_header_is_rejected() {
        let mut keys_buf = BytesMut::new();
        use bytes::BufMut;
        keys_buf.put_u64_le(1);
        let mut indexes_buf = BytesMut::new();
        indexes_buf.put_u64_le(0x400); // bit 10 set

        let mut keys_slice = &keys_buf[..];
        let mut indexes_slice = &indexes_buf[..];
        let mut decoded = DictionaryEncodedColumn::new(ElementKind::String, false);
        let mut deserializer = DictionaryDeserializer::new(ElementKind::String, false);

        let mut reader = SubstreamReader::new(&mut keys_slice, &mut indexes_slice);
        deserializer.read_prefix(&mut reader).unwrap();
        let err = deserializer.deserialize_block(&mut decoded, 1, &mut reader).unwrap_err();
        assert!(matches!(err, Error::LogicalError(_)));
    }

    #[test]
    fn version_gate_rejects_unknown_version() {
        let mut keys_buf = BytesMut::new();
        use bytes::BufMut;
        keys_buf.put_u64_le(2);
        let mut indexes_buf = BytesMut::new();

        let mut keys_slice = &keys_buf[..];
        let mut indexes_slice = &indexes_buf[..];
        let mut deserializer = DictionaryDeserializer::new(ElementKind::String, false);
        let mut reader = SubstreamReader::new(&mut keys_slice, &mut indexes_slice);
        let err = deserializer.read_prefix(&mut reader).unwrap_err();
        assert!(matches!(err, Error::LogicalError(_)));
    }

    #[test]
    fn partial_reads_match_a_single_call() {
        let values: Vec<_> = ["a", "b", "a", "c", "b", "a", "d", "d"].iter().map(|s| v(s)).collect();
        let settings =
            SerializerSettings { max_dictionary_size: 16, use_new_dictionary_on_overflow: false };

        let mut column = DictionaryEncodedColumn::new(ElementKind::String, false);
        for value in &values {
            column.append_value(value).unwrap();
        }
        let mut serializer = DictionarySerializer::new(ElementKind::String, false, settings);
        let mut keys_buf = BytesMut::new();
        let mut indexes_buf = BytesMut::new();
        {
            let mut writer = SubstreamWriter::new(&mut keys_buf, &mut indexes_buf);
            serializer.write_prefix(&mut writer).unwrap();
            serializer.serialize_block(&column, 0, column.len(), &mut writer).unwrap();
            serializer.write_suffix(&mut writer).unwrap();
        }

        let mut keys_slice = &keys_buf[..];
        let mut indexes_slice = &indexes_buf[..];
        let mut decoded = DictionaryEncodedColumn::new(ElementKind::String, false);
        let mut deserializer = DictionaryDeserializer::new(ElementKind::String, false);
        let mut reader = SubstreamReader::new(&mut keys_slice, &mut indexes_slice);
        deserializer.read_prefix(&mut reader).unwrap();
        deserializer.deserialize_block(&mut decoded, 3, &mut reader).unwrap();
        deserializer.deserialize_block(&mut decoded, values.len() - 3, &mut reader).unwrap();

        let result: Vec<_> = (0..decoded.len()).map(|i| decoded.get_value(i)).collect();
        assert_eq!(result, values);
    }
}
