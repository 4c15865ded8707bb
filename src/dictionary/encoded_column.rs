//! Dictionary-encoded column `D(T)` (C3, §4.3): a dictionary paired with a
//! vector of ids into it.
//!
//! The dictionary is shared by `Rc<RefCell<_>>` rather than by value: many
//! blocks decoded in the same session point at the same global dictionary,
//! and `cut_and_compact` hands the encoder a fresh, privately-owned one for
//! its sub-range. There is always exactly one writer (whoever is currently
//! appending or installing a new dictionary) and the type never hands out
//! a reference back to its own consumers, so there is no cycle to worry
//! about.

use crate::{
    column::ColumnValue,
    types::ElementKind,
    Error,
    Result,
};
use std::{
    cell::RefCell,
    rc::Rc,
};

use super::UniqueColumn;

/// A logical column of `T` represented as `(dictionary, ids)` (§3's `D(T)`).
pub struct DictionaryEncodedColumn {
    nullable: bool,
    dictionary: Rc<RefCell<UniqueColumn>>,
    ids: Vec<u64>,
}

impl DictionaryEncodedColumn {
    /// A new, empty dictionary-encoded column over its own fresh dictionary.
    pub fn new(kind: ElementKind, nullable: bool) -> Self {
        Self {
            nullable,
            dictionary: Rc::new(RefCell::new(UniqueColumn::new(kind, nullable))),
            ids: Vec::new(),
        }
    }

    /// Logical length (`|I|`).
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether the column holds no rows.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Whether this column's element type is nullable.
    pub fn nullable(&self) -> bool {
        self.nullable
    }

    /// The element kind carried by this column's dictionary.
    pub fn kind(&self) -> ElementKind {
        self.dictionary.borrow().kind()
    }

    /// A clone of the shared dictionary handle.
    pub fn dictionary(&self) -> Rc<RefCell<UniqueColumn>> {
        Rc::clone(&self.dictionary)
    }

    /// The raw ids, one per row.
    pub fn ids(&self) -> &[u64] {
        &self.ids
    }

    /// The largest id currently in use, or 0 if empty — used to classify
    /// the index width of a block built from this column (§4.1).
    pub fn max_id(&self) -> u64 {
        self.ids.iter().copied().max().unwrap_or(0)
    }

    /// The value at `index`.
    pub fn get_value(&self, index: usize) -> ColumnValue {
        self.dictionary.borrow().value_for_id(self.ids[index])
    }

    /// Append one value, inserting it into the shared dictionary if it is
    /// not already present.
    pub fn append_value(&mut self, value: &ColumnValue) -> Result<()> {
        let id = self.dictionary.borrow_mut().insert_value(value)?;
        self.ids.push(id);
        Ok(())
    }

    /// **set_shared_dictionary** (§4.3): install `dict` as this column's
    /// dictionary. Requires the column currently holds no rows.
    pub fn set_shared_dictionary(&mut self, dict: Rc<RefCell<UniqueColumn>>) -> Result<()> {
        if !self.ids.is_empty() {
            return Err(Error::LogicalError(
                "set_shared_dictionary requires an empty column".to_string(),
            ));
        }
        self.dictionary = dict;
        Ok(())
    }

    /// Append raw ids that already refer to this column's current
    /// dictionary (the Case A reconstruction path, §4.5).
    pub fn append_ids_from_own_dictionary(&mut self, ids: &[u64]) {
        self.ids.extend_from_slice(ids);
    }

    /// **insert_range_from_dictionary_encoded** (§4.3): append
    /// `|indexes_column|` rows whose values are
    /// `keys_column[indexes_column[i]]`. `keys_column[i]` is addressed
    /// directly by position — `keys` need not be (and typically is not)
    /// this column's own dictionary.
    pub fn insert_range_from_dictionary_encoded(
        &mut self,
        keys: &[ColumnValue],
        indexes: &[u64],
    ) -> Result<()> {
        for &idx in indexes {
            let value = &keys[idx as usize];
            self.append_value(value)?;
        }
        Ok(())
    }

    /// **insert_range_from** (§4.3): `other` must share this column's
    /// dictionary by identity; appends `other.ids[offset..offset+count)`
    /// directly with no remapping.
    pub fn insert_range_from(
        &mut self,
        other: &DictionaryEncodedColumn,
        offset: usize,
        count: usize,
    ) -> Result<()> {
        if !Rc::ptr_eq(&self.dictionary, &other.dictionary) {
            return Err(Error::LogicalError(
                "insert_range_from requires a shared dictionary".to_string(),
            ));
        }
        self.ids.extend_from_slice(&other.ids[offset..offset + count]);
        Ok(())
    }

    /// **cut_and_compact** (§4.3): the sub-range `[offset, offset+limit)`
    /// as a fresh, densely-numbered `D(T)` containing exactly the distinct
    /// values that range references — no unused ids, no gaps.
    pub fn cut_and_compact(&self, offset: usize, limit: usize) -> DictionaryEncodedColumn {
        let mut compacted = DictionaryEncodedColumn::new(self.kind(), self.nullable);
        let mut remap: std::collections::HashMap<u64, u64> = std::collections::HashMap::new();

        for &old_id in &self.ids[offset..offset + limit] {
            if self.nullable && old_id == 0 {
                compacted.ids.push(0);
                continue;
            }
            if let Some(&new_id) = remap.get(&old_id) {
                compacted.ids.push(new_id);
                continue;
            }
            let value = self.dictionary.borrow().value_for_id(old_id);
            let new_id = compacted.dictionary.borrow_mut().insert_value(&value).unwrap();
            remap.insert(old_id, new_id);
            compacted.ids.push(new_id);
        }

        compacted
    }
}
