//! Global dictionary / unique-value set (C2, §4.2).
//!
//! Grounded on the teacher's `ColumnLowCardinality`: a nested column of
//! distinct values plus a `HashMap<(u64, u64), u64>` from
//! [`compute_hash_key`] to dense id, rebuilt here to also carry a reserved
//! null id and a budgeted overflow path the teacher's fixed-UInt64,
//! no-global-dictionary version never needed.

use crate::{
    column::{
        new_element_column,
        ColumnValue,
        ElementColumn,
    },
    types::ElementKind,
    Error,
    Result,
};
use std::collections::HashMap;

use super::compute_hash_key;

/// An append-only set of distinct values of element kind `T`, assigning
/// each a stable dense id. When `nullable`, id `0` is permanently reserved
/// for null and every non-null value's id is one more than its position in
/// `nested`.
pub struct UniqueColumn {
    nullable: bool,
    nested: Box<dyn ElementColumn>,
    index: HashMap<(u64, u64), u64>,
}

impl UniqueColumn {
    /// A new, empty dictionary for the given element kind.
    pub fn new(kind: ElementKind, nullable: bool) -> Self {
        Self { nullable, nested: new_element_column(kind), index: HashMap::new() }
    }

    /// The element kind stored by this dictionary (never the `Nullable`
    /// wrapper — nullability is tracked separately).
    pub fn kind(&self) -> ElementKind {
        self.nested.kind()
    }

    /// Whether this dictionary reserves id 0 for null.
    pub fn nullable(&self) -> bool {
        self.nullable
    }

    /// Total dictionary size, including the reserved null id if nullable.
    pub fn len(&self) -> u64 {
        self.nested.len() as u64 + self.nullable as u64
    }

    /// Whether the dictionary (ignoring the reserved null slot) is empty.
    pub fn is_empty(&self) -> bool {
        self.nested.is_empty()
    }

    fn id_offset(&self) -> u64 {
        self.nullable as u64
    }

    /// The non-null values of the dictionary, in id order, as a plain
    /// column — exactly what gets bulk-serialized into a global-dictionary
    /// or additional-keys block (§6).
    pub fn nested_not_nullable_column(&self) -> &dyn ElementColumn {
        self.nested.as_ref()
    }

    /// Replace the nested non-null values wholesale (used when installing
    /// a freshly deserialized global-dictionary or additional-keys block).
    /// The index map is rebuilt from scratch.
    pub fn set_nested(&mut self, nested: Box<dyn ElementColumn>) {
        self.index.clear();
        self.index.reserve(nested.len());
        for i in 0..nested.len() {
            let value = nested.get_value(i);
            let hash = compute_hash_key(&value);
            self.index.insert(hash, i as u64 + self.nullable as u64);
        }
        self.nested = nested;
    }

    /// The value currently assigned to `id`.
    pub fn value_for_id(&self, id: u64) -> ColumnValue {
        if self.nullable && id == 0 {
            return ColumnValue::null(self.nested.kind());
        }
        self.nested.get_value((id - self.id_offset()) as usize)
    }

    /// Insert a single value (budget-free), returning its id. Repeated
    /// insertion of an equal value returns the same id.
    pub fn insert_value(&mut self, value: &ColumnValue) -> Result<u64> {
        if value.is_null {
            if !self.nullable {
                return Err(Error::LogicalError(
                    "cannot insert null into a non-nullable dictionary".to_string(),
                ));
            }
            return Ok(0);
        }

        let hash = compute_hash_key(value);
        if let Some(&id) = self.index.get(&hash) {
            return Ok(id);
        }
        self.nested.append_value(value)?;
        let id = self.nested.len() as u64 - 1 + self.id_offset();
        self.index.insert(hash, id);
        Ok(id)
    }

    /// Budgeted bulk insert (§4.2). Inserts proceed densely while
    /// `len() < max_dict_size`; anything that would grow the dictionary
    /// past the budget is instead appended to the returned overflow list,
    /// numbered contiguously from `len()` (the dictionary's size *after*
    /// every in-budget insert of this call, per the post-insertion
    /// numbering decoders assume). A `null` input always maps to id 0 and
    /// never counts against the budget or the overflow.
    pub fn insert_range_with_overflow(
        &mut self,
        keys: &[ColumnValue],
    ) -> Result<(Vec<u64>, Vec<ColumnValue>)> {
        self.insert_range_with_overflow_budgeted(keys, u64::MAX)
    }

    /// As [`Self::insert_range_with_overflow`], with an explicit budget.
    pub fn insert_range_with_overflow_budgeted(
        &mut self,
        keys: &[ColumnValue],
        max_dict_size: u64,
    ) -> Result<(Vec<u64>, Vec<ColumnValue>)> {
        let mut mapping = Vec::with_capacity(keys.len());
        let mut overflow: Vec<ColumnValue> = Vec::new();
        let mut overflow_index: HashMap<(u64, u64), u64> = HashMap::new();

        for value in keys {
            if value.is_null {
                if !self.nullable {
                    return Err(Error::LogicalError(
                        "cannot insert null into a non-nullable dictionary".to_string(),
                    ));
                }
                mapping.push(0);
                continue;
            }

            let hash = compute_hash_key(value);
            if let Some(&id) = self.index.get(&hash) {
                mapping.push(id);
                continue;
            }

            if self.len() < max_dict_size {
                mapping.push(self.insert_value(value)?);
                continue;
            }

            if let Some(&pos) = overflow_index.get(&hash) {
                mapping.push(self.len() + pos);
            } else {
                let pos = overflow.len() as u64;
                overflow.push(value.clone());
                overflow_index.insert(hash, pos);
                mapping.push(self.len() + pos);
            }
        }

        Ok((mapping, overflow))
    }
}
