//! Serialization state machine (C4, §4.4): drives prefix → per-block →
//! suffix encoding, owning the encoder-side global dictionary and its
//! overflow/flush policy.

use crate::{
    column::{
        new_element_column,
        ColumnValue,
        ElementColumn,
    },
    io::SubstreamWriter,
    types::ElementKind,
    Error,
    Result,
};
use bytes::{
    BufMut,
    BytesMut,
};

use super::{
    index_type::{
        pack_ids,
        IndexType,
    },
    DictionaryEncodedColumn,
    UniqueColumn,
};

/// Tunables recognized by [`DictionarySerializer`] (§4.4).
#[derive(Debug, Clone, Copy)]
pub struct SerializerSettings {
    /// Target maximum entries in the global dictionary. `0` disables the
    /// global dictionary: every block carries its own additional-keys-only
    /// dictionary instead.
    pub max_dictionary_size: u64,
    /// When the global dictionary reaches `max_dictionary_size`, flush it
    /// into the keys stream and start a fresh one instead of growing past
    /// the budget until the suffix.
    ///
    /// The decoder identifies a dictionary block on the keys stream purely
    /// by session position (the first block that needs a global dictionary
    /// reads it; every later block reuses the cached copy), so only one
    /// dictionary flush is supported per encode session — whether that
    /// flush happens mid-session (this option) or at [`write_suffix`].
    /// [`serialize_block`] returns [`crate::Error::LogicalError`] rather
    /// than silently emitting a second flush a decoder would misread.
    ///
    /// [`write_suffix`]: DictionarySerializer::write_suffix
    /// [`serialize_block`]: DictionarySerializer::serialize_block
    pub use_new_dictionary_on_overflow: bool,
}

impl Default for SerializerSettings {
    fn default() -> Self {
        Self { max_dictionary_size: 0, use_new_dictionary_on_overflow: false }
    }
}

/// Drives one encode session: one `write_prefix`, any number of
/// `serialize_block` calls, one `write_suffix`.
pub struct DictionarySerializer {
    settings: SerializerSettings,
    kind: ElementKind,
    nullable: bool,
    global_dictionary: UniqueColumn,
    dictionary_flushed: bool,
}

impl DictionarySerializer {
    /// A new serializer for the given element type and settings.
    pub fn new(kind: ElementKind, nullable: bool, settings: SerializerSettings) -> Self {
        Self {
            settings,
            kind,
            nullable,
            global_dictionary: UniqueColumn::new(kind, nullable),
            dictionary_flushed: false,
        }
    }

    /// Write the keys-stream version word and reset encoder state.
    pub fn write_prefix(&mut self, writer: &mut SubstreamWriter) -> Result<()> {
        let keys = writer
            .keys
            .as_deref_mut()
            .ok_or_else(|| Error::LogicalError("keys stream required for prefix".to_string()))?;
        keys.put_u64_le(1);
        self.global_dictionary = UniqueColumn::new(self.kind, self.nullable);
        self.dictionary_flushed = false;
        Ok(())
    }

    /// Write `self.global_dictionary`'s nested column to the keys stream and
    /// start a fresh, empty global dictionary. Errors if a dictionary was
    /// already flushed earlier this session (see
    /// [`SerializerSettings::use_new_dictionary_on_overflow`]).
    fn flush_global_dictionary(&mut self, keys_stream: &mut BytesMut) -> Result<()> {
        if self.dictionary_flushed {
            return Err(Error::LogicalError(
                "a global dictionary was already flushed this session; only one dictionary \
                 flush per session is supported"
                    .to_string(),
            ));
        }
        write_nested_bulk(keys_stream, self.global_dictionary.nested_not_nullable_column())?;
        self.global_dictionary = UniqueColumn::new(self.kind, self.nullable);
        self.dictionary_flushed = true;
        Ok(())
    }

    /// Encode `column[offset..offset+limit)` as one block (§4.4 steps 1-10).
    pub fn serialize_block(
        &mut self,
        column: &DictionaryEncodedColumn,
        offset: usize,
        limit: usize,
        writer: &mut SubstreamWriter,
    ) -> Result<()> {
        match (writer.keys.as_deref_mut(), writer.indexes.as_deref_mut()) {
            (None, None) => return Ok(()),
            (Some(_), Some(_)) => {}
            _ => {
                return Err(Error::LogicalError(
                    "exactly one of keys/indexes stream is missing".to_string(),
                ));
            }
        }

        let limit = limit.min(column.len() - offset);
        let sub = column.cut_and_compact(offset, limit);
        let mut positions = sub.ids().to_vec();

        let nested = sub.dictionary();
        let nested = nested.borrow();
        let nested_column = nested.nested_not_nullable_column();
        let mut keys: Vec<ColumnValue> =
            (0..nested_column.len()).map(|i| nested_column.get_value(i)).collect();
        drop(nested);

        let need_global = self.settings.max_dictionary_size > 0;
        if need_global {
            let (mapping, overflow) = self
                .global_dictionary
                .insert_range_with_overflow_budgeted(&keys, self.settings.max_dictionary_size)?;
            let offset_bit = self.nullable as u64;
            positions = positions
                .into_iter()
                .map(|p| if self.nullable && p == 0 { 0 } else { mapping[(p - offset_bit) as usize] })
                .collect();
            keys = overflow;
        }

        let need_additional_keys = !keys.is_empty();
        let need_write_global =
            self.settings.use_new_dictionary_on_overflow
                && self.global_dictionary.len() >= self.settings.max_dictionary_size
                && self.settings.max_dictionary_size > 0;

        let max_id = positions.iter().copied().max().unwrap_or(0);
        let header = IndexType::classify(max_id, need_global, need_additional_keys);

        let indexes = writer.indexes.as_deref_mut().unwrap();
        header.serialize(indexes);

        if need_write_global {
            let keys_stream = writer.keys.as_deref_mut().unwrap();
            self.flush_global_dictionary(keys_stream)?;
        }

        let indexes = writer.indexes.as_deref_mut().unwrap();
        if need_additional_keys {
            let mut additional = new_element_column(self.kind);
            for key in &keys {
                additional.append_value(key)?;
            }
            write_nested_bulk(indexes, additional.as_ref())?;
        }

        indexes.put_u64_le(positions.len() as u64);
        pack_ids(indexes, &positions, header.width);

        Ok(())
    }

    /// Flush any remaining global dictionary to the keys stream.
    pub fn write_suffix(&mut self, writer: &mut SubstreamWriter) -> Result<()> {
        if self.settings.max_dictionary_size == 0 || self.global_dictionary.is_empty() {
            return Ok(());
        }
        let keys_stream = writer
            .keys
            .as_deref_mut()
            .ok_or_else(|| Error::LogicalError("keys stream required for suffix".to_string()))?;
        self.flush_global_dictionary(keys_stream)
    }
}

fn write_nested_bulk(buffer: &mut BytesMut, column: &dyn ElementColumn) -> Result<()> {
    buffer.put_u64_le(column.len() as u64);
    column.serialize_binary_bulk(buffer)
}
