//! Per-block index-type header (C1, §4.1).
//!
//! A single little-endian `u64` word precedes every index block: its low
//! byte selects the packed index width, bit 8 says the block needs a
//! global-dictionary lookup, bit 9 says it carries an additional-keys
//! payload. Every other bit must be zero — a decoder that sees one set has
//! found a corrupt or foreign stream and must stop rather than guess.

use crate::{
    Error,
    Result,
};
use bytes::{
    Buf,
    BufMut,
    BytesMut,
};

const NEED_GLOBAL_DICTIONARY_BIT: u64 = 1 << 8;
const HAS_ADDITIONAL_KEYS_BIT: u64 = 1 << 9;
const WIDTH_MASK: u64 = 0xFF;

/// The packed width of one index-block's indexes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexWidth {
    /// Indexes packed as `u8`.
    U8 = 0,
    /// Indexes packed as `u16`.
    U16 = 1,
    /// Indexes packed as `u32`.
    U32 = 2,
    /// Indexes packed as `u64`.
    U64 = 3,
}

impl IndexWidth {
    /// The smallest width whose unsigned range covers `max_id`.
    pub fn smallest_fitting(max_id: u64) -> Self {
        if max_id <= u8::MAX as u64 {
            IndexWidth::U8
        } else if max_id <= u16::MAX as u64 {
            IndexWidth::U16
        } else if max_id <= u32::MAX as u64 {
            IndexWidth::U32
        } else {
            IndexWidth::U64
        }
    }

    /// Byte width of one packed index of this width.
    pub fn byte_width(&self) -> usize {
        match self {
            IndexWidth::U8 => 1,
            IndexWidth::U16 => 2,
            IndexWidth::U32 => 4,
            IndexWidth::U64 => 8,
        }
    }

    fn code(&self) -> u64 {
        *self as u64
    }

    fn from_code(code: u64) -> Result<Self> {
        match code {
            0 => Ok(IndexWidth::U8),
            1 => Ok(IndexWidth::U16),
            2 => Ok(IndexWidth::U32),
            3 => Ok(IndexWidth::U64),
            other => Err(Error::LogicalError(format!(
                "unknown index width code: {other}"
            ))),
        }
    }
}

/// The decoded form of the per-block header word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexType {
    /// Width of the packed indexes that follow.
    pub width: IndexWidth,
    /// Whether this block's indexes may reference the global dictionary.
    pub need_global_dictionary: bool,
    /// Whether this block carries an additional-keys payload.
    pub has_additional_keys: bool,
}

impl IndexType {
    /// Classify a block from the largest id it will emit and the two flags
    /// the caller already knows (§4.1).
    pub fn classify(
        max_id: u64,
        need_global_dictionary: bool,
        has_additional_keys: bool,
    ) -> Self {
        Self {
            width: IndexWidth::smallest_fitting(max_id),
            need_global_dictionary,
            has_additional_keys,
        }
    }

    /// Write the header word to the indexes stream.
    pub fn serialize(&self, buffer: &mut BytesMut) {
        let mut word = self.width.code();
        if self.need_global_dictionary {
            word |= NEED_GLOBAL_DICTIONARY_BIT;
        }
        if self.has_additional_keys {
            word |= HAS_ADDITIONAL_KEYS_BIT;
        }
        buffer.put_u64_le(word);
    }

    /// Read and validate a header word from the indexes stream.
    pub fn deserialize(buffer: &mut &[u8]) -> Result<Self> {
        if buffer.len() < 8 {
            return Err(Error::LogicalError(
                "not enough data for index-type header".to_string(),
            ));
        }
        let word = buffer.get_u64_le();

        let need_global_dictionary = word & NEED_GLOBAL_DICTIONARY_BIT != 0;
        let has_additional_keys = word & HAS_ADDITIONAL_KEYS_BIT != 0;
        let residue = word & !(NEED_GLOBAL_DICTIONARY_BIT | HAS_ADDITIONAL_KEYS_BIT);

        if residue > 3 {
            return Err(Error::LogicalError(format!(
                "malformed index-type header: 0x{word:x}"
            )));
        }

        Ok(Self {
            width: IndexWidth::from_code(residue & WIDTH_MASK)?,
            need_global_dictionary,
            has_additional_keys,
        })
    }
}

/// Pack `ids` at `width`, little-endian, appending to `buffer` (the tail
/// end of §6's per-block wire format: "`num_rows` packed integers at the
/// declared width").
pub fn pack_ids(buffer: &mut BytesMut, ids: &[u64], width: IndexWidth) {
    for &id in ids {
        match width {
            IndexWidth::U8 => buffer.put_u8(id as u8),
            IndexWidth::U16 => buffer.put_u16_le(id as u16),
            IndexWidth::U32 => buffer.put_u32_le(id as u32),
            IndexWidth::U64 => buffer.put_u64_le(id),
        }
    }
}

/// Unpack `count` ids at `width` from the front of `buffer`.
pub fn unpack_ids(buffer: &mut &[u8], width: IndexWidth, count: usize) -> Result<Vec<u64>> {
    let total = count * width.byte_width();
    if buffer.len() < total {
        return Err(Error::LogicalError(format!(
            "not enough data for {count} packed ids of width {}: need {total}, have {}",
            width.byte_width(),
            buffer.len()
        )));
    }
    let mut ids = Vec::with_capacity(count);
    for _ in 0..count {
        let id = match width {
            IndexWidth::U8 => buffer.get_u8() as u64,
            IndexWidth::U16 => buffer.get_u16_le() as u64,
            IndexWidth::U32 => buffer.get_u32_le() as u64,
            IndexWidth::U64 => buffer.get_u64_le(),
        };
        ids.push(id);
    }
    Ok(ids)
}
