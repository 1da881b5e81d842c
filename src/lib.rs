//! # xmlarbor
//!
//! A small XML engine: a modal lexer, a recursive descent parser, an
//! arena-backed document tree with invariant-preserving mutation, and a
//! pretty-printing serializer.
//!
//! ## Quick Start
//!
//! ```
//! use xmlarbor::Document;
//!
//! let mut doc = Document::parse_str("<root><child>Hello</child></root>").unwrap();
//! let root = doc.root_element().unwrap();
//! assert_eq!(doc.node_name(root), "root");
//!
//! let extra = doc.create_element("extra").unwrap();
//! doc.append_child(root, extra).unwrap();
//! doc.set_attribute(extra, "id", "7").unwrap();
//! assert_eq!(
//!     doc.serialize(2),
//!     "<root>\n  <child>Hello</child>\n  <extra id=\"7\"/>\n</root>\n"
//! );
//! ```
//!
//! Namespaces, DTD validation, and entity expansion are not supported:
//! names are plain strings, doctypes are kept as opaque text, and `&amp;`
//! is just four characters of text.

mod tracing_macros;

pub mod encoding;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod serial;
pub mod tree;
pub mod util;

// Re-export primary types at the crate root for convenience.
pub use error::{DomError, Error, SourceLocation, SyntaxError};
pub use tree::{Document, NodeId, NodeKind, NodeType};

/// Parses a markup string into a [`Document`] with default options.
///
/// # Errors
///
/// See [`parser::parse_str`].
pub fn parse(text: &str) -> Result<Document, Error> {
    parser::parse_str(text)
}
