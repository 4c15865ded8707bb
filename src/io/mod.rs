//! Substream routing (§6) for the dictionary codec.
//!
//! This codec never talks to a socket directly: the host storage layer
//! hands it exactly two named substreams relative to its own column path —
//! `…/DictionaryKeys` and `…/DictionaryIndexes` — and the codec reads or
//! writes through whichever of the two is present for the call at hand.
//!
//! [`SubstreamWriter`] and [`SubstreamReader`] model the `path + getter`
//! contract directly: each substream slot is `Option`, so "stream absent"
//! is representable exactly as §4.4 step 1 and §4.5 require, without the
//! codec needing to know anything about how the host resolves paths.

pub mod buffer_utils;

use bytes::BytesMut;

/// The two substreams this codec is concerned with (§6). The codec
/// announces both to the host's *enumerate streams* callback: the keys
/// sub-path recursively (so the element codec can advertise its own
/// substreams), then the indexes sub-path as a leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Substream {
    /// `…/DictionaryKeys` — carries the version word and global-dictionary
    /// blocks.
    DictionaryKeys,
    /// `…/DictionaryIndexes` — carries index-type headers, additional-keys
    /// blocks, and packed indexes.
    DictionaryIndexes,
}

/// The write side of substream routing, handed to
/// [`DictionarySerializer`](crate::dictionary::DictionarySerializer).
///
/// A `None` slot means the host getter resolved no stream for that
/// substream at this path.
pub struct SubstreamWriter<'a> {
    /// The keys stream, if the host provided one.
    pub keys: Option<&'a mut BytesMut>,
    /// The indexes stream, if the host provided one.
    pub indexes: Option<&'a mut BytesMut>,
}

impl<'a> SubstreamWriter<'a> {
    /// Build a writer over both substreams.
    pub fn new(keys: &'a mut BytesMut, indexes: &'a mut BytesMut) -> Self {
        Self { keys: Some(keys), indexes: Some(indexes) }
    }
}

/// The read side of substream routing, handed to
/// [`DictionaryDeserializer`](crate::dictionary::DictionaryDeserializer).
pub struct SubstreamReader<'a> {
    /// The keys stream, if the host provided one.
    pub keys: Option<&'a mut &'a [u8]>,
    /// The indexes stream, if the host provided one.
    pub indexes: Option<&'a mut &'a [u8]>,
}

impl<'a> SubstreamReader<'a> {
    /// Build a reader over both substreams.
    pub fn new(keys: &'a mut &'a [u8], indexes: &'a mut &'a [u8]) -> Self {
        Self { keys: Some(keys), indexes: Some(indexes) }
    }
}
