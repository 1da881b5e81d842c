//! Markup parser.
//!
//! A hand-rolled recursive descent parser that pulls tokens from the
//! [`Lexer`](crate::lexer::Lexer) with a two-token lookahead and builds a
//! [`Document`]. There is no error recovery: the first problem aborts the
//! parse and no partial document is returned.

mod xml;

use crate::error::Error;
use crate::tree::Document;

/// Default maximum element nesting depth.
pub const DEFAULT_MAX_DEPTH: u32 = 256;

/// Parse options.
///
/// Use the builder pattern to configure options:
///
/// ```
/// use xmlarbor::parser::ParseOptions;
///
/// let opts = ParseOptions::default().max_depth(16);
/// assert_eq!(opts.max_depth, 16);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Maximum element nesting depth (default: 256). The root element is at
    /// depth 1.
    pub max_depth: u32,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ParseOptions {
    /// Sets the maximum element nesting depth.
    #[must_use]
    pub fn max_depth(mut self, max: u32) -> Self {
        self.max_depth = max;
        self
    }
}

/// Parses a markup string with default options.
///
/// # Errors
///
/// Returns [`Error::Syntax`] if the input is malformed and [`Error::Dom`] if
/// it describes a tree that breaks a document invariant.
pub fn parse_str(input: &str) -> Result<Document, Error> {
    parse_str_with_options(input, &ParseOptions::default())
}

/// Parses a markup string with the given options.
///
/// # Errors
///
/// Returns [`Error::Syntax`] if the input is malformed or nests deeper than
/// [`ParseOptions::max_depth`], and [`Error::Dom`] if it describes a tree
/// that breaks a document invariant.
pub fn parse_str_with_options(input: &str, options: &ParseOptions) -> Result<Document, Error> {
    xml::XmlParser::new(input, options)?.parse()
}
