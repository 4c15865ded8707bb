//! String element columns.
//!
//! `String` (variable-length) and `FixedString(N)` (fixed-length, zero
//! padded) both store raw bytes rather than requiring valid UTF-8 — the
//! dictionary codec never interprets string contents, only hashes and
//! copies them.
//!
//! **Wire format**, matching the teacher's varint-length convention in
//! [`crate::io::buffer_utils`]:
//! ```text
//! String:      [length: varint][bytes: u8 * length]   (per element)
//! FixedString: [bytes: u8 * N]                        (per element)
//! ```

use super::{
    column_value::ColumnValue,
    ElementColumn,
};
use crate::{
    io::buffer_utils,
    types::ElementKind,
    Error,
    Result,
};
use bytes::{
    Buf,
    BytesMut,
};

/// A column of variable-length byte strings.
#[derive(Default)]
pub struct ColumnString {
    data: Vec<Vec<u8>>,
}

impl ColumnString {
    /// A new, empty `String` column.
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    /// Append one string's bytes directly (bypassing [`ColumnValue`]).
    pub fn append_bytes(&mut self, bytes: impl Into<Vec<u8>>) {
        self.data.push(bytes.into());
    }

    /// The raw bytes at `index`.
    pub fn at(&self, index: usize) -> &[u8] {
        &self.data[index]
    }
}

impl ElementColumn for ColumnString {
    fn kind(&self) -> ElementKind {
        ElementKind::String
    }

    fn len(&self) -> usize {
        self.data.len()
    }

    fn clear(&mut self) {
        self.data.clear();
    }

    fn reserve(&mut self, additional: usize) {
        self.data.reserve(additional);
    }

    fn get_value(&self, index: usize) -> ColumnValue {
        ColumnValue::new(ElementKind::String, self.data[index].clone())
    }

    fn append_value(&mut self, value: &ColumnValue) -> Result<()> {
        value.expect_kind(ElementKind::String)?;
        self.data.push(value.data.clone());
        Ok(())
    }

    fn serialize_binary_bulk(&self, buffer: &mut BytesMut) -> Result<()> {
        for s in &self.data {
            buffer_utils::write_varint(buffer, s.len() as u64);
            buffer.extend_from_slice(s);
        }
        Ok(())
    }

    fn deserialize_binary_bulk(
        &mut self,
        buffer: &mut &[u8],
        limit: usize,
    ) -> Result<()> {
        self.data.reserve(limit);
        for _ in 0..limit {
            let len = buffer_utils::read_varint(buffer)? as usize;
            if buffer.len() < len {
                return Err(Error::LogicalError(format!(
                    "not enough data for String: need {len}, have {}",
                    buffer.len()
                )));
            }
            self.data.push(buffer[..len].to_vec());
            buffer.advance(len);
        }
        Ok(())
    }

    fn clone_empty(&self) -> Box<dyn ElementColumn> {
        Box::new(ColumnString::new())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

/// A column of fixed-length, zero-padded byte strings.
pub struct ColumnFixedString {
    string_size: usize,
    data: Vec<u8>,
}

impl ColumnFixedString {
    /// A new, empty `FixedString(size)` column.
    pub fn new(size: usize) -> Self {
        Self { string_size: size, data: Vec::new() }
    }

    /// Append one value's bytes, zero-padding (or truncation-rejecting) to
    /// `string_size`.
    pub fn append_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        if bytes.len() > self.string_size {
            return Err(Error::InvalidArgument(format!(
                "value of {} bytes does not fit FixedString({})",
                bytes.len(),
                self.string_size
            )));
        }
        self.data.extend_from_slice(bytes);
        self.data.resize(self.data.len() + (self.string_size - bytes.len()), 0);
        Ok(())
    }

    /// The raw (zero-padded) bytes at `index`.
    pub fn at(&self, index: usize) -> &[u8] {
        let start = index * self.string_size;
        &self.data[start..start + self.string_size]
    }

    /// The fixed size in bytes.
    pub fn fixed_size(&self) -> usize {
        self.string_size
    }
}

impl ElementColumn for ColumnFixedString {
    fn kind(&self) -> ElementKind {
        ElementKind::FixedString(self.string_size)
    }

    fn len(&self) -> usize {
        if self.string_size == 0 {
            0
        } else {
            self.data.len() / self.string_size
        }
    }

    fn clear(&mut self) {
        self.data.clear();
    }

    fn reserve(&mut self, additional: usize) {
        self.data.reserve(additional * self.string_size);
    }

    fn get_value(&self, index: usize) -> ColumnValue {
        ColumnValue::new(self.kind(), self.at(index).to_vec())
    }

    fn append_value(&mut self, value: &ColumnValue) -> Result<()> {
        value.expect_kind(self.kind())?;
        self.data.extend_from_slice(&value.data);
        Ok(())
    }

    fn serialize_binary_bulk(&self, buffer: &mut BytesMut) -> Result<()> {
        buffer.extend_from_slice(&self.data);
        Ok(())
    }

    fn deserialize_binary_bulk(
        &mut self,
        buffer: &mut &[u8],
        limit: usize,
    ) -> Result<()> {
        let total = limit * self.string_size;
        if buffer.len() < total {
            return Err(Error::LogicalError(format!(
                "not enough data for {limit} FixedString({}) values: need {total}, have {}",
                self.string_size,
                buffer.len()
            )));
        }
        self.data.extend_from_slice(&buffer[..total]);
        buffer.advance(total);
        Ok(())
    }

    fn clone_empty(&self) -> Box<dyn ElementColumn> {
        Box::new(ColumnFixedString::new(self.string_size))
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}
