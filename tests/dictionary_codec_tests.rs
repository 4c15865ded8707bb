//! Integration tests for the dictionary column codec: the concrete
//! scenarios and universal invariants.

use bytes::BytesMut;
use dictionary_column_codec::{
    column::ColumnValue,
    dictionary::{
        DictionaryDeserializer,
        DictionaryEncodedColumn,
        DictionarySerializer,
        SerializerSettings,
    },
    io::{
        SubstreamReader,
        SubstreamWriter,
    },
    types::ElementKind,
    Error,
};
use proptest::prelude::*;

fn string_value(s: &str) -> ColumnValue {
    ColumnValue::new(ElementKind::String, s.as_bytes().to_vec())
}

fn u32_value(v: u32) -> ColumnValue {
    ColumnValue::new(ElementKind::UInt32, v.to_le_bytes().to_vec())
}

fn encode(
    values: &[ColumnValue],
    kind: ElementKind,
    nullable: bool,
    settings: SerializerSettings,
) -> (BytesMut, BytesMut) {
    let mut column = DictionaryEncodedColumn::new(kind, nullable);
    for value in values {
        column.append_value(value).unwrap();
    }

    let mut serializer = DictionarySerializer::new(kind, nullable, settings);
    let mut keys = BytesMut::new();
    let mut indexes = BytesMut::new();
    {
        let mut writer = SubstreamWriter::new(&mut keys, &mut indexes);
        serializer.write_prefix(&mut writer).unwrap();
        serializer.serialize_block(&column, 0, column.len(), &mut writer).unwrap();
        serializer.write_suffix(&mut writer).unwrap();
    }
    (keys, indexes)
}

fn decode_all(
    keys: &BytesMut,
    indexes: &BytesMut,
    kind: ElementKind,
    nullable: bool,
    n: usize,
) -> Vec<ColumnValue> {
    let mut keys_slice = &keys[..];
    let mut indexes_slice = &indexes[..];
    let mut column = DictionaryEncodedColumn::new(kind, nullable);
    let mut deserializer = DictionaryDeserializer::new(kind, nullable);
    let mut reader = SubstreamReader::new(&mut keys_slice, &mut indexes_slice);
    deserializer.read_prefix(&mut reader).unwrap();
    deserializer.deserialize_block(&mut column, n, &mut reader).unwrap();
    (0..column.len()).map(|i| column.get_value(i)).collect()
}

#[test]
fn s1_strings_within_budget() {
    let values: Vec<_> = ["a", "b", "a", "c", "b", "a"].iter().map(|s| string_value(s)).collect();
    let settings =
        SerializerSettings { max_dictionary_size: 16, use_new_dictionary_on_overflow: false };
    let (keys, indexes) = encode(&values, ElementKind::String, false, settings);

    // version word
    assert_eq!(&keys[0..8], &1u64.to_le_bytes());
    // header: width u8, need_global set, no additional keys
    let header = u64::from_le_bytes(indexes[0..8].try_into().unwrap());
    assert_eq!(header, 1 << 8);

    let decoded = decode_all(&keys, &indexes, ElementKind::String, false, values.len());
    assert_eq!(decoded, values);
}

#[test]
fn s2_overflow_into_additional_keys() {
    let values: Vec<_> = [1u32, 2, 3, 4, 5].iter().map(|v| u32_value(*v)).collect();
    let settings =
        SerializerSettings { max_dictionary_size: 2, use_new_dictionary_on_overflow: false };
    let (keys, indexes) = encode(&values, ElementKind::UInt32, false, settings);

    let header = u64::from_le_bytes(indexes[0..8].try_into().unwrap());
    assert_eq!(header, (1 << 8) | (1 << 9)); // need_global + has_additional

    let decoded = decode_all(&keys, &indexes, ElementKind::UInt32, false, values.len());
    assert_eq!(decoded, values);
}

#[test]
fn s3_new_dictionary_on_overflow() {
    let values: Vec<_> = [1u32, 2, 3, 4, 5].iter().map(|v| u32_value(*v)).collect();
    let settings =
        SerializerSettings { max_dictionary_size: 2, use_new_dictionary_on_overflow: true };
    let (keys, indexes) = encode(&values, ElementKind::UInt32, false, settings);
    let decoded = decode_all(&keys, &indexes, ElementKind::UInt32, false, values.len());
    assert_eq!(decoded, values);
}

#[test]
fn s4_nullable_strings() {
    let values = vec![
        string_value("x"),
        ColumnValue::null(ElementKind::String),
        string_value("x"),
        string_value("y"),
        ColumnValue::null(ElementKind::String),
    ];
    let settings =
        SerializerSettings { max_dictionary_size: 16, use_new_dictionary_on_overflow: false };
    let (keys, indexes) = encode(&values, ElementKind::String, true, settings);
    let decoded = decode_all(&keys, &indexes, ElementKind::String, true, values.len());
    assert_eq!(decoded, values);
}

#[test]
fn s5_multi_block_append() {
    let first: Vec<_> = ["a", "b", "a"].iter().map(|s| string_value(s)).collect();
    let second: Vec<_> = ["c", "a", "d"].iter().map(|s| string_value(s)).collect();
    let settings =
        SerializerSettings { max_dictionary_size: 16, use_new_dictionary_on_overflow: false };

    let mut column = DictionaryEncodedColumn::new(ElementKind::String, false);
    for value in first.iter().chain(second.iter()) {
        column.append_value(value).unwrap();
    }

    let mut serializer = DictionarySerializer::new(ElementKind::String, false, settings);
    let mut keys = BytesMut::new();
    let mut indexes = BytesMut::new();
    {
        let mut writer = SubstreamWriter::new(&mut keys, &mut indexes);
        serializer.write_prefix(&mut writer).unwrap();
        serializer.serialize_block(&column, 0, first.len(), &mut writer).unwrap();
        serializer.serialize_block(&column, first.len(), second.len(), &mut writer).unwrap();
        serializer.write_suffix(&mut writer).unwrap();
    }

    let expected: Vec<_> = first.into_iter().chain(second).collect();
    let decoded = decode_all(&keys, &indexes, ElementKind::String, false, expected.len());
    assert_eq!(decoded, expected);
}

#[test]
fn s6_malformed_header_is_logical_error() {
    use bytes::BufMut;
    let mut keys = BytesMut::new();
    keys.put_u64_le(1);
    let mut indexes = BytesMut::new();
    indexes.put_u64_le(0x400); // bit 10 set

    let mut keys_slice = &keys[..];
    let mut indexes_slice = &indexes[..];
    let mut column = DictionaryEncodedColumn::new(ElementKind::String, false);
    let mut deserializer = DictionaryDeserializer::new(ElementKind::String, false);
    let mut reader = SubstreamReader::new(&mut keys_slice, &mut indexes_slice);
    deserializer.read_prefix(&mut reader).unwrap();
    let err = deserializer.deserialize_block(&mut column, 1, &mut reader).unwrap_err();
    assert!(matches!(err, Error::LogicalError(_)));
}

#[test]
fn version_gate_rejects_non_one() {
    use bytes::BufMut;
    let mut keys = BytesMut::new();
    keys.put_u64_le(42);
    let mut indexes = BytesMut::new();

    let mut keys_slice = &keys[..];
    let mut indexes_slice = &indexes[..];
    let mut deserializer = DictionaryDeserializer::new(ElementKind::String, false);
    let mut reader = SubstreamReader::new(&mut keys_slice, &mut indexes_slice);
    let err = deserializer.read_prefix(&mut reader).unwrap_err();
    assert!(matches!(err, Error::LogicalError(_)));
}

#[test]
fn header_well_formedness_every_combination_round_trips() {
    use dictionary_column_codec::dictionary::{
        IndexType,
        IndexWidth,
    };
    for width in [IndexWidth::U8, IndexWidth::U16, IndexWidth::U32, IndexWidth::U64] {
        for need_global in [false, true] {
            for has_additional in [false, true] {
                let header =
                    IndexType { width, need_global_dictionary: need_global, has_additional_keys: has_additional };
                let mut buf = BytesMut::new();
                header.serialize(&mut buf);
                assert_eq!(buf.len(), 8);
                let mut slice = &buf[..];
                assert_eq!(IndexType::deserialize(&mut slice).unwrap(), header);
            }
        }
    }
}

#[test]
fn cut_and_compact_is_idempotent() {
    let mut column = DictionaryEncodedColumn::new(ElementKind::String, false);
    for s in ["a", "b", "c", "b", "a", "d"] {
        column.append_value(&string_value(s)).unwrap();
    }
    let once = column.cut_and_compact(0, column.len());
    let twice = once.cut_and_compact(0, once.len());
    assert_eq!(once.dictionary().borrow().len(), twice.dictionary().borrow().len());
    for i in 0..once.len() {
        assert_eq!(once.get_value(i), twice.get_value(i));
    }
}

proptest! {
    #[test]
    fn round_trip_holds_for_arbitrary_strings(
        values in prop::collection::vec("[a-e]{1,3}", 0..40),
        max_dictionary_size in 1u64..6,
        use_new_dictionary_on_overflow in any::<bool>(),
    ) {
        let values: Vec<_> = values.iter().map(|s| string_value(s)).collect();
        let settings = SerializerSettings { max_dictionary_size, use_new_dictionary_on_overflow };
        let (keys, indexes) = encode(&values, ElementKind::String, false, settings);
        let decoded = decode_all(&keys, &indexes, ElementKind::String, false, values.len());
        prop_assert_eq!(decoded, values);
    }

    #[test]
    fn partial_reads_match_a_single_call(
        values in prop::collection::vec("[a-c]{1,2}", 1..30),
        split in 0usize..30,
    ) {
        let values: Vec<_> = values.iter().map(|s| string_value(s)).collect();
        let split = split.min(values.len());
        let settings =
            SerializerSettings { max_dictionary_size: 8, use_new_dictionary_on_overflow: false };
        let (keys, indexes) = encode(&values, ElementKind::String, false, settings);

        let mut keys_slice = &keys[..];
        let mut indexes_slice = &indexes[..];
        let mut column = DictionaryEncodedColumn::new(ElementKind::String, false);
        let mut deserializer = DictionaryDeserializer::new(ElementKind::String, false);
        let mut reader = SubstreamReader::new(&mut keys_slice, &mut indexes_slice);
        deserializer.read_prefix(&mut reader).unwrap();
        deserializer.deserialize_block(&mut column, split, &mut reader).unwrap();
        deserializer.deserialize_block(&mut column, values.len() - split, &mut reader).unwrap();

        let decoded: Vec<_> = (0..column.len()).map(|i| column.get_value(i)).collect();
        prop_assert_eq!(decoded, values);
    }
}
