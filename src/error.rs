//! Error types for the dictionary column codec.
//!
//! All fallible operations in this crate return [`Result<T>`], which is an
//! alias for `std::result::Result<T, Error>`.

use thiserror::Error;

/// Errors that can occur while constructing, encoding, or decoding a
/// dictionary-encoded column.
#[derive(Error, Debug)]
pub enum Error {
    /// `T` is not a permitted dictionary element type.
    #[error("Illegal type of argument: {0}")]
    IllegalTypeOfArgument(String),

    /// The `WithDictionary(...)` factory received a number of inner-type
    /// arguments other than one.
    #[error("Number of arguments doesn't match: WithDictionary expects exactly one inner type, got {0}")]
    NumberOfArgumentsDoesntMatch(usize),

    /// An invariant of the wire format or codec state machine was broken:
    /// a required substream was missing, the version word was unknown, an
    /// index-type width was unrecognized, or a header was malformed.
    #[error("Logical error: {0}")]
    LogicalError(String),

    /// An I/O error on the underlying substream (distinct from a malformed
    /// in-band header, which is always `LogicalError`).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid UTF-8 was encountered while decoding a `String` element.
    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// An invalid argument was provided to a function (e.g. an out-of-range
    /// slice).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A type mismatch between an expected and an actual column type.
    #[error("Type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        /// The type that was expected.
        expected: String,
        /// The type that was received.
        actual: String,
    },
}

/// A type alias for `std::result::Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
