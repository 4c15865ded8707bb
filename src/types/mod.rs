//! # Dictionary Element Type System
//!
//! This module describes the element types a dictionary-encoded column may
//! carry, and the `WithDictionary(T)` wrapper type that selects this codec.
//!
//! ## Admitted Element Kinds
//!
//! - Integers: `Int8/16/32/64`, `UInt8/16/32/64`
//! - `Date` — 16-bit days since epoch (opaque to this layer)
//! - `DateTime` — 32-bit seconds since epoch (opaque to this layer)
//! - `String` — variable-length
//! - `FixedString(N)` — fixed-length
//!
//! Any of the above may be wrapped in `Nullable(...)`. Any other element
//! type is rejected at construction with
//! [`Error::IllegalTypeOfArgument`](crate::Error::IllegalTypeOfArgument).
//!
//! `Nullable(WithDictionary(...))` and `WithDictionary(WithDictionary(...))`
//! are not part of this grammar: nullability is carried *inside*
//! `WithDictionary`, exactly as ClickHouse requires
//! `LowCardinality(Nullable(T))` rather than `Nullable(LowCardinality(T))`.

mod parser;

pub use parser::parse_with_dictionary;

use crate::{
    Error,
    Result,
};

/// The inner element kind carried by a dictionary, stripped of nullability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// 8-bit signed integer.
    Int8,
    /// 16-bit signed integer.
    Int16,
    /// 32-bit signed integer.
    Int32,
    /// 64-bit signed integer.
    Int64,
    /// 8-bit unsigned integer.
    UInt8,
    /// 16-bit unsigned integer.
    UInt16,
    /// 32-bit unsigned integer.
    UInt32,
    /// 64-bit unsigned integer.
    UInt64,
    /// 16-bit day count since 1970-01-01.
    Date,
    /// 32-bit seconds since the Unix epoch.
    DateTime,
    /// Variable-length string.
    String,
    /// Fixed-length string of the given byte size.
    FixedString(usize),
}

impl ElementKind {
    /// The textual name as it would appear in a type string.
    pub fn name(&self) -> String {
        match self {
            ElementKind::Int8 => "Int8".to_string(),
            ElementKind::Int16 => "Int16".to_string(),
            ElementKind::Int32 => "Int32".to_string(),
            ElementKind::Int64 => "Int64".to_string(),
            ElementKind::UInt8 => "UInt8".to_string(),
            ElementKind::UInt16 => "UInt16".to_string(),
            ElementKind::UInt32 => "UInt32".to_string(),
            ElementKind::UInt64 => "UInt64".to_string(),
            ElementKind::Date => "Date".to_string(),
            ElementKind::DateTime => "DateTime".to_string(),
            ElementKind::String => "String".to_string(),
            ElementKind::FixedString(size) => format!("FixedString({size})"),
        }
    }

    /// Parse a bare (non-nullable) element type name.
    ///
    /// Accepts `Int8`..`Int64`, `UInt8`..`UInt64`, `Date`, `DateTime`,
    /// `String`, and `FixedString(N)`. Anything else is
    /// [`Error::IllegalTypeOfArgument`].
    pub fn from_name(name: &str) -> Result<Self> {
        let name = name.trim();
        if let Some(rest) = name.strip_prefix("FixedString(") {
            let rest = rest
                .strip_suffix(')')
                .ok_or_else(|| Error::IllegalTypeOfArgument(name.to_string()))?;
            let size: usize = rest
                .trim()
                .parse()
                .map_err(|_| Error::IllegalTypeOfArgument(name.to_string()))?;
            return Ok(ElementKind::FixedString(size));
        }
        match name {
            "Int8" => Ok(ElementKind::Int8),
            "Int16" => Ok(ElementKind::Int16),
            "Int32" => Ok(ElementKind::Int32),
            "Int64" => Ok(ElementKind::Int64),
            "UInt8" => Ok(ElementKind::UInt8),
            "UInt16" => Ok(ElementKind::UInt16),
            "UInt32" => Ok(ElementKind::UInt32),
            "UInt64" => Ok(ElementKind::UInt64),
            "Date" => Ok(ElementKind::Date),
            "DateTime" => Ok(ElementKind::DateTime),
            "String" => Ok(ElementKind::String),
            other => Err(Error::IllegalTypeOfArgument(other.to_string())),
        }
    }
}

/// The full element type `T` carried by a dictionary: an [`ElementKind`]
/// plus an optional nullable modifier (§3, §4.6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DictElementType {
    /// The inner, non-nullable element kind.
    pub kind: ElementKind,
    /// Whether a null-mask bit is carried per element (id 0 reserved).
    pub nullable: bool,
}

impl DictElementType {
    /// A non-nullable element type.
    pub fn new(kind: ElementKind) -> Self {
        Self { kind, nullable: false }
    }

    /// A nullable element type.
    pub fn nullable(kind: ElementKind) -> Self {
        Self { kind, nullable: true }
    }

    /// The textual type name, e.g. `Nullable(String)` or `FixedString(16)`.
    pub fn name(&self) -> String {
        if self.nullable {
            format!("Nullable({})", self.kind.name())
        } else {
            self.kind.name()
        }
    }
}
