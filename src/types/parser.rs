//! Minimal recursive-descent parser for the `WithDictionary(T)` grammar
//! (§6, §4.6): `WithDictionary(` then either a bare element type name or
//! `Nullable(` + element type name + `)`, then `)`.
//!
//! This is a small, purpose-built parser rather than a general type-string
//! tokenizer: the dictionary codec only ever needs to parse its own wrapper
//! type plus one level of `Nullable`.

use super::{
    DictElementType,
    ElementKind,
};
use crate::{
    Error,
    Result,
};

/// Parse a `WithDictionary(T)` type string, validating `T` and arity.
///
/// # Errors
///
/// - [`Error::NumberOfArgumentsDoesntMatch`] if the outer wrapper does not
///   carry exactly one inner type argument.
/// - [`Error::IllegalTypeOfArgument`] if the (possibly `Nullable`-wrapped)
///   inner type is not one of the permitted element kinds.
pub fn parse_with_dictionary(type_name: &str) -> Result<DictElementType> {
    let trimmed = type_name.trim();
    let inner = strip_wrapper(trimmed, "WithDictionary")
        .ok_or_else(|| Error::IllegalTypeOfArgument(trimmed.to_string()))?;

    let args = split_top_level_args(inner);
    if args.len() != 1 {
        return Err(Error::NumberOfArgumentsDoesntMatch(args.len()));
    }
    let arg = args[0].trim();

    if let Some(nullable_inner) = strip_wrapper(arg, "Nullable") {
        let kind = ElementKind::from_name(nullable_inner.trim())?;
        Ok(DictElementType::nullable(kind))
    } else {
        let kind = ElementKind::from_name(arg)?;
        Ok(DictElementType::new(kind))
    }
}

/// If `input` is `name(...)`, return the text between the matching
/// parentheses; otherwise `None`.
fn strip_wrapper<'a>(input: &'a str, name: &str) -> Option<&'a str> {
    let rest = input.strip_prefix(name)?;
    let rest = rest.trim_start();
    let inner = rest.strip_prefix('(')?;
    let inner = inner.strip_suffix(')')?;
    Some(inner)
}

/// Split a comma-separated argument list, respecting nested parentheses
/// (needed so `WithDictionary(FixedString(16))`'s single argument isn't
/// split on a comma that belongs to a deeper nesting level).
fn split_top_level_args(input: &str) -> Vec<&str> {
    if input.trim().is_empty() {
        return Vec::new();
    }
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0usize;
    for (i, c) in input.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth -= 1,
            ',' if depth == 0 => {
                parts.push(&input[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&input[start..]);
    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_element_type() {
        let t = parse_with_dictionary("WithDictionary(String)").unwrap();
        assert_eq!(t.kind, ElementKind::String);
        assert!(!t.nullable);
    }

    #[test]
    fn parses_nullable_element_type() {
        let t = parse_with_dictionary("WithDictionary(Nullable(String))").unwrap();
        assert_eq!(t.kind, ElementKind::String);
        assert!(t.nullable);
    }

    #[test]
    fn parses_fixed_string() {
        let t = parse_with_dictionary("WithDictionary(FixedString(16))").unwrap();
        assert_eq!(t.kind, ElementKind::FixedString(16));
    }

    #[test]
    fn rejects_illegal_inner_type() {
        let err = parse_with_dictionary("WithDictionary(Array)").unwrap_err();
        assert!(matches!(err, Error::IllegalTypeOfArgument(_)));
    }

    #[test]
    fn rejects_wrong_arity() {
        let err = parse_with_dictionary("WithDictionary(String, UInt8)").unwrap_err();
        assert!(matches!(err, Error::NumberOfArgumentsDoesntMatch(2)));
    }

    #[test]
    fn rejects_non_wrapper_input() {
        let err = parse_with_dictionary("String").unwrap_err();
        assert!(matches!(err, Error::IllegalTypeOfArgument(_)));
    }
}
