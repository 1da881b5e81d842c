//! Error types for lexing, parsing, and tree mutation.
//!
//! Two kinds of failure exist, both carrying a human-readable message:
//!
//! - [`SyntaxError`]: the input text (or a name/text value supplied to a
//!   mutation) is malformed. Errors raised while reading markup carry the
//!   [`SourceLocation`] of the offending token.
//! - [`DomError`]: a structural request would violate a tree invariant
//!   (second root element, child under a leaf, cycle, foreign node, ...).
//!
//! [`Error`] wraps both for operations that can raise either kind. Every
//! operation that fails leaves the tree exactly as it was.

use std::fmt;

/// Source location within a markup string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceLocation {
    /// 1-based line number.
    pub line: u32,
    /// 1-based column number (in characters, not bytes).
    pub column: u32,
    /// 0-based byte offset from the start of the input.
    pub byte_offset: usize,
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Malformed input text.
///
/// Raised for unexpected or missing tokens, mismatched close tags, repeated
/// attributes, invalid names, `<`/`>` inside a text value, and unterminated
/// constructs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    /// Human-readable error message.
    pub message: String,
    /// Where in the source text the error occurred. `None` for errors raised
    /// by programmatic mutation rather than by reading markup.
    pub location: Option<SourceLocation>,
}

impl SyntaxError {
    /// Creates a syntax error that is not tied to a position in any input.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            location: None,
        }
    }

    /// Creates a syntax error at the given source location.
    pub fn at(message: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            message: message.into(),
            location: Some(location),
        }
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.location {
            Some(loc) => write!(f, "syntax error at {loc}: {}", self.message),
            None => write!(f, "syntax error: {}", self.message),
        }
    }
}

impl std::error::Error for SyntaxError {}

/// A request that would violate a structural invariant of the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomError {
    /// Human-readable error message.
    pub message: String,
}

impl DomError {
    /// Creates a new `DomError` with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for DomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DOM error: {}", self.message)
    }
}

impl std::error::Error for DomError {}

/// Either kind of engine error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Malformed text.
    Syntax(SyntaxError),
    /// Structural invariant violation.
    Dom(DomError),
}

impl Error {
    /// Returns the human-readable message of the wrapped error.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Syntax(e) => &e.message,
            Self::Dom(e) => &e.message,
        }
    }

    /// Returns `true` if this is a [`SyntaxError`].
    #[must_use]
    pub fn is_syntax(&self) -> bool {
        matches!(self, Self::Syntax(_))
    }

    /// Returns `true` if this is a [`DomError`].
    #[must_use]
    pub fn is_dom(&self) -> bool {
        matches!(self, Self::Dom(_))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Syntax(e) => fmt::Display::fmt(e, f),
            Self::Dom(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Syntax(e) => Some(e),
            Self::Dom(e) => Some(e),
        }
    }
}

impl From<SyntaxError> for Error {
    fn from(e: SyntaxError) -> Self {
        Self::Syntax(e)
    }
}

impl From<DomError> for Error {
    fn from(e: DomError) -> Self {
        Self::Dom(e)
    }
}
