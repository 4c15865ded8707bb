//! [`ColumnValue`] — an owned, type-tagged value pulled out of (or destined
//! for) an [`ElementColumn`](super::ElementColumn).
//!
//! This is the single-value counterpart to the bulk element codec (§6's
//! `serialize_binary`/`deserialize_binary`), and what a [`UniqueColumn`]
//! hashes to dedupe incoming keys (§4.2).
//!
//! [`UniqueColumn`]: crate::dictionary::UniqueColumn

use crate::{
    types::ElementKind,
    Error,
    Result,
};
use std::collections::hash_map::DefaultHasher;
use std::hash::{
    Hash,
    Hasher,
};

/// A value read from (or to be appended to) an element column.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnValue {
    /// The element kind this value belongs to.
    pub kind: ElementKind,
    /// Whether this value represents the dictionary's reserved null entry.
    /// When `true`, `data` is empty.
    pub is_null: bool,
    /// The value's little-endian wire bytes (empty when `is_null`).
    pub data: Vec<u8>,
}

impl ColumnValue {
    /// A non-null value with the given element kind and wire bytes.
    pub fn new(kind: ElementKind, data: Vec<u8>) -> Self {
        Self { kind, is_null: false, data }
    }

    /// The reserved null value for a nullable dictionary of this kind.
    pub fn null(kind: ElementKind) -> Self {
        Self { kind, is_null: true, data: Vec::new() }
    }

    /// Fail with [`Error::TypeMismatch`] unless this value's kind matches
    /// `expected`.
    pub fn expect_kind(&self, expected: ElementKind) -> Result<()> {
        if self.kind != expected {
            return Err(Error::TypeMismatch {
                expected: expected.name(),
                actual: self.kind.name(),
            });
        }
        Ok(())
    }
}

/// Dual hash of a value's bytes, used by a `UniqueColumn` for O(1) dedup.
/// Null always hashes to `(0, 0)` and is never looked up against a
/// non-null value's hash within the same dictionary, since the unique
/// column tracks `is_null` membership separately from its hash map.
pub fn compute_hash_key(value: &ColumnValue) -> (u64, u64) {
    if value.is_null {
        return (0, 0);
    }

    let mut hasher = DefaultHasher::new();
    value.data.hash(&mut hasher);
    let hash1 = hasher.finish();

    let hash2 = fnv1a_64(&value.data);

    (hash1, hash2)
}

/// FNV-1a 64-bit hash: simple, fast, good distribution, and dependency-free.
fn fnv1a_64(data: &[u8]) -> u64 {
    const FNV_OFFSET_BASIS: u64 = 0xcbf29ce484222325;
    const FNV_PRIME: u64 = 0x100000001b3;

    let mut hash = FNV_OFFSET_BASIS;
    for &byte in data {
        hash ^= byte as u64;
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}
