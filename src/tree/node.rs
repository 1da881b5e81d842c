//! Node type definitions.
//!
//! The `NodeKind` enum is the closed set of node variants in a document
//! tree. Each variant carries only its own payload; navigation links live in
//! `NodeData`.

use std::collections::BTreeMap;
use std::fmt;

/// The kind of a node and its associated data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// The document node. There is exactly one per `Document`.
    Document,

    /// An element node, e.g., `<div class="x">`.
    Element {
        /// The tag name.
        name: String,
        /// Attributes keyed by name. Iteration order is lexicographic by
        /// key, which is also the serialization order.
        attributes: BTreeMap<String, String>,
    },

    /// A text node. Never contains `<` or `>`.
    Text {
        /// The raw text.
        content: String,
    },

    /// A CDATA section, e.g., `<![CDATA[...]]>`.
    CData {
        /// The raw section content (unrestricted).
        content: String,
    },

    /// A comment node, e.g., `<!-- ... -->`.
    Comment {
        /// The comment text without the `<!--` and `-->` delimiters.
        content: String,
    },
}

impl NodeKind {
    /// Creates an element payload with no attributes.
    #[must_use]
    pub fn element(name: impl Into<String>) -> Self {
        Self::Element {
            name: name.into(),
            attributes: BTreeMap::new(),
        }
    }

    /// Returns the type tag of this kind.
    #[must_use]
    pub fn node_type(&self) -> NodeType {
        match self {
            Self::Document => NodeType::Document,
            Self::Element { .. } => NodeType::Element,
            Self::Text { .. } => NodeType::Text,
            Self::CData { .. } => NodeType::CDataSection,
            Self::Comment { .. } => NodeType::Comment,
        }
    }
}

/// Payload-free node type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    /// See [`NodeKind::Element`].
    Element,
    /// See [`NodeKind::Text`].
    Text,
    /// See [`NodeKind::CData`].
    CDataSection,
    /// See [`NodeKind::Comment`].
    Comment,
    /// See [`NodeKind::Document`].
    Document,
}

impl NodeType {
    /// Returns the display name of this node type.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Element => "Element",
            Self::Text => "Text",
            Self::CDataSection => "CDATASection",
            Self::Comment => "Comment",
            Self::Document => "Document",
        }
    }

    /// Returns `true` for kinds that may never own children.
    #[must_use]
    pub fn is_leaf(self) -> bool {
        matches!(self, Self::Text | Self::CDataSection | Self::Comment)
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
