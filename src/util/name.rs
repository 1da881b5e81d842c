//! Name grammar shared by the lexer and the tree.
//!
//! A name starts with an ASCII letter or `_` and continues with ASCII
//! letters, digits, `_`, `:`, `-`, or `.`. This is a deliberate subset of
//! the XML `Name` production: non-ASCII letters are not accepted, and a name
//! may not start with a digit, `-`, `.`, or `:`.

use crate::error::SyntaxError;

/// Returns `true` if `b` may start a name.
#[must_use]
pub fn is_name_start_char(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

/// Returns `true` if `b` may appear after the first character of a name.
#[must_use]
pub fn is_name_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'_' | b':' | b'-' | b'.')
}

/// Returns `true` if `name` satisfies the name grammar.
#[must_use]
pub fn is_valid_name(name: &str) -> bool {
    let bytes = name.as_bytes();
    match bytes.split_first() {
        Some((&first, rest)) => is_name_start_char(first) && rest.iter().all(|&b| is_name_char(b)),
        None => false,
    }
}

/// Checks `name` against the name grammar.
///
/// # Errors
///
/// Returns [`SyntaxError`] if `name` is empty or contains a character the
/// grammar does not allow at that position.
///
/// # Examples
///
/// ```
/// use xmlarbor::util::name::validate_name;
///
/// assert!(validate_name("svg:rect").is_ok());
/// assert!(validate_name("1abc").is_err());
/// ```
pub fn validate_name(name: &str) -> Result<(), SyntaxError> {
    if name.is_empty() {
        return Err(SyntaxError::new("empty name"));
    }
    if !is_valid_name(name) {
        return Err(SyntaxError::new(format!("invalid name '{name}'")));
    }
    Ok(())
}
