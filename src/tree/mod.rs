//! Arena-based document tree.
//!
//! All nodes live in a `Vec` owned by the [`Document`] and are referenced by
//! [`NodeId`], a newtype over `NonZeroU32`. Parent, child, and sibling links
//! are stored as ids, so the only ownership path is the arena itself: a node
//! belongs to the subtree of whatever parent it is linked under, and removing
//! it from that parent frees its whole subtree.
//!
//! Every mutating method validates its request completely before touching
//! any link, so a failed call leaves the tree unchanged.

mod node;

pub use node::{NodeKind, NodeType};

use std::collections::BTreeMap;
use std::num::NonZeroU32;

use crate::error::{DomError, Error, SyntaxError};
use crate::tracing_macros::trace;
use crate::util::name::validate_name;

/// A typed index into the document's node arena.
///
/// `NodeId` is a newtype over `NonZeroU32`, meaning it can never be zero
/// and `Option<NodeId>` has the same size as `NodeId` (niche optimization).
///
/// An id is only meaningful for the `Document` that created it. Ids are never
/// reused, so an id whose node was removed stays invalid; passing an id from
/// another document is not detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct NodeId(NonZeroU32);

impl NodeId {
    /// Creates a `NodeId` from a raw index.
    ///
    /// # Panics
    ///
    /// Panics if `index` is 0.
    #[allow(clippy::expect_used, clippy::cast_possible_truncation)]
    fn from_index(index: usize) -> Self {
        Self(NonZeroU32::new(index as u32).expect("NodeId index must be non-zero"))
    }

    fn as_index(self) -> usize {
        self.0.get() as usize
    }

    /// Converts this `NodeId` to a raw `u32`. The value is always non-zero.
    #[must_use]
    pub fn into_raw(self) -> u32 {
        self.0.get()
    }

    /// Creates a `NodeId` from a raw `u32`, if non-zero.
    #[must_use]
    pub fn from_raw(raw: u32) -> Option<Self> {
        NonZeroU32::new(raw).map(Self)
    }
}

/// Storage for a single node in the document arena.
#[derive(Debug, Clone)]
pub struct NodeData {
    /// What kind of node this is and its payload.
    pub kind: NodeKind,
    /// Parent node. `None` for the document node and for detached nodes.
    pub parent: Option<NodeId>,
    /// First child node.
    pub first_child: Option<NodeId>,
    /// Last child node (for O(1) append).
    pub last_child: Option<NodeId>,
    /// Next sibling.
    pub next_sibling: Option<NodeId>,
    /// Previous sibling.
    pub prev_sibling: Option<NodeId>,
}

impl NodeData {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            first_child: None,
            last_child: None,
            next_sibling: None,
            prev_sibling: None,
        }
    }
}

/// An XML document.
///
/// The `Document` owns every node in an arena. Navigation goes through
/// `&Document`, mutation through `&mut Document`. Nodes made with the
/// `create_*` methods start out detached and join the tree with
/// [`append_child`](Document::append_child) or
/// [`insert_before`](Document::insert_before).
///
/// # Examples
///
/// ```
/// use xmlarbor::Document;
///
/// let mut doc = Document::parse_str("<a><b/></a>").unwrap();
/// let root = doc.root_element().unwrap();
/// let c = doc.create_element("c").unwrap();
/// doc.append_child(root, c).unwrap();
/// assert_eq!(doc.child_count(root), 2);
/// ```
#[derive(Debug, Clone)]
pub struct Document {
    /// The node arena. Index 0 is unused (placeholder for `NonZeroU32`);
    /// `None` marks a freed slot.
    nodes: Vec<Option<NodeData>>,
    /// The document node id (not the root element).
    root: NodeId,
    /// Verbatim `<?xml ... ?>` prolog text, if any.
    prolog: Option<String>,
    /// Verbatim `<!DOCTYPE ...>` text, if any.
    doctype: Option<String>,
}

impl Document {
    /// Creates a new empty document containing only the document node.
    #[must_use]
    pub fn new() -> Self {
        let mut nodes = Vec::with_capacity(64);
        nodes.push(None);
        nodes.push(Some(NodeData::new(NodeKind::Document)));
        Self {
            nodes,
            root: NodeId::from_index(1),
            prolog: None,
            doctype: None,
        }
    }

    /// Parses a markup string into a `Document`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Syntax`] for malformed text and [`Error::Dom`] for
    /// well-formed text that breaks a document invariant (a second root
    /// element or doctype).
    ///
    /// # Examples
    ///
    /// ```
    /// use xmlarbor::Document;
    ///
    /// let doc = Document::parse_str("<root><child/></root>").unwrap();
    /// assert_eq!(doc.node_name(doc.root_element().unwrap()), "root");
    /// ```
    pub fn parse_str(input: &str) -> Result<Self, Error> {
        crate::parser::parse_str(input)
    }

    /// Parses markup from raw bytes, detecting the encoding first.
    ///
    /// See [`crate::encoding::decode_to_utf8`] for the detection rules.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Syntax`] if the bytes cannot be decoded, plus every
    /// error [`parse_str`](Self::parse_str) can return.
    pub fn parse_bytes(input: &[u8]) -> Result<Self, Error> {
        let text = crate::encoding::decode_to_utf8(input)
            .map_err(|e| SyntaxError::new(e.to_string()))?;
        crate::parser::parse_str(&text)
    }

    /// Pretty-prints the whole document with `indent_width` spaces per level.
    ///
    /// # Examples
    ///
    /// ```
    /// use xmlarbor::Document;
    ///
    /// let doc = Document::parse_str("<a><b/></a>").unwrap();
    /// assert_eq!(doc.serialize(2), "<a>\n  <b/>\n</a>\n");
    /// ```
    #[must_use]
    pub fn serialize(&self, indent_width: usize) -> String {
        crate::serial::serialize(self, indent_width)
    }

    // --- Document properties ---

    /// Returns the document node id.
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Returns the root element (the single top-level element), if any.
    #[must_use]
    pub fn root_element(&self) -> Option<NodeId> {
        self.children(self.root)
            .find(|&id| self.node_type(id) == Some(NodeType::Element))
    }

    /// Returns the recorded prolog text.
    #[must_use]
    pub fn prolog(&self) -> Option<&str> {
        self.prolog.as_deref()
    }

    /// Sets or clears the prolog text.
    pub fn set_prolog(&mut self, prolog: Option<String>) {
        self.prolog = prolog;
    }

    /// Returns the recorded doctype text.
    #[must_use]
    pub fn doctype(&self) -> Option<&str> {
        self.doctype.as_deref()
    }

    /// Records the doctype declaration.
    ///
    /// # Errors
    ///
    /// Returns [`DomError`] if a doctype is already recorded.
    pub fn set_doctype(&mut self, doctype: impl Into<String>) -> Result<(), DomError> {
        if self.doctype.is_some() {
            return Err(DomError::new("document can't have more than one doctype"));
        }
        self.doctype = Some(doctype.into());
        Ok(())
    }

    // --- Node access ---

    /// Returns `true` if `id` refers to a live node of this document.
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    /// Returns the `NodeData` for `id`, or `None` if it was freed or never
    /// belonged to this document.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&NodeData> {
        self.nodes.get(id.as_index()).and_then(Option::as_ref)
    }

    /// Returns a reference to the `NodeData` for the given node.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not refer to a live node.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn node(&self, id: NodeId) -> &NodeData {
        self.get(id).expect("node does not exist in this document")
    }

    #[allow(clippy::expect_used)]
    fn node_mut(&mut self, id: NodeId) -> &mut NodeData {
        self.nodes
            .get_mut(id.as_index())
            .and_then(Option::as_mut)
            .expect("node does not exist in this document")
    }

    /// Returns the type tag of a node.
    #[must_use]
    pub fn node_type(&self, id: NodeId) -> Option<NodeType> {
        self.get(id).map(|n| n.kind.node_type())
    }

    /// Returns the tag name of an element, or `""` for every other kind.
    #[must_use]
    pub fn node_name(&self, id: NodeId) -> &str {
        match self.get(id).map(|n| &n.kind) {
            Some(NodeKind::Element { name, .. }) => name,
            _ => "",
        }
    }

    /// Returns the stored value of a text, CDATA, or comment node.
    ///
    /// Elements and the document node have no value; use
    /// [`text_content`](Self::text_content) for their text.
    #[must_use]
    pub fn node_value(&self, id: NodeId) -> Option<&str> {
        match self.get(id).map(|n| &n.kind) {
            Some(
                NodeKind::Text { content }
                | NodeKind::CData { content }
                | NodeKind::Comment { content },
            ) => Some(content),
            _ => None,
        }
    }

    /// Returns the text of a node.
    ///
    /// Text, CDATA, and comment nodes return their value. An element (or the
    /// document node) with exactly one child that is a text node returns
    /// that child's value; otherwise the values of every descendant text
    /// node are joined with single spaces, in document order.
    #[must_use]
    pub fn text_content(&self, id: NodeId) -> String {
        if let Some(value) = self.node_value(id) {
            return value.to_string();
        }

        if let Some(only) = self.first_child(id).filter(|&c| self.next_sibling(c).is_none()) {
            if let Some(NodeKind::Text { content }) = self.get(only).map(|n| &n.kind) {
                return content.clone();
            }
        }

        let texts: Vec<&str> = self
            .descendants(id)
            .filter_map(|d| match &self.node(d).kind {
                NodeKind::Text { content } => Some(content.as_str()),
                _ => None,
            })
            .collect();
        texts.join(" ")
    }

    // --- Attributes ---

    fn attribute_map(&self, id: NodeId) -> Option<&BTreeMap<String, String>> {
        match self.get(id).map(|n| &n.kind) {
            Some(NodeKind::Element { attributes, .. }) => Some(attributes),
            _ => None,
        }
    }

    fn attribute_map_mut(&mut self, id: NodeId) -> Result<&mut BTreeMap<String, String>, DomError> {
        match self.nodes.get_mut(id.as_index()).and_then(Option::as_mut) {
            Some(NodeData {
                kind: NodeKind::Element { attributes, .. },
                ..
            }) => Ok(attributes),
            Some(data) => Err(DomError::new(format!(
                "{} node cannot have attributes",
                data.kind.node_type()
            ))),
            None => Err(missing_node()),
        }
    }

    /// Returns the attributes of a node in ascending name order.
    ///
    /// Non-element nodes yield nothing.
    pub fn attributes(&self, id: NodeId) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.attribute_map(id)
            .into_iter()
            .flatten()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns the value of an attribute on an element.
    #[must_use]
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.attribute_map(id)
            .and_then(|attrs| attrs.get(name))
            .map(String::as_str)
    }

    /// Returns `true` if the element has an attribute called `name`.
    #[must_use]
    pub fn has_attribute(&self, id: NodeId, name: &str) -> bool {
        self.attribute_map(id)
            .is_some_and(|attrs| attrs.contains_key(name))
    }

    /// Sets an attribute, overwriting any previous value.
    ///
    /// The name is not validated here; only the parser enforces name and
    /// uniqueness rules.
    ///
    /// # Errors
    ///
    /// Returns [`DomError`] if `id` is not a live element.
    pub fn set_attribute(
        &mut self,
        id: NodeId,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), DomError> {
        self.attribute_map_mut(id)?.insert(name.into(), value.into());
        Ok(())
    }

    /// Removes an attribute, returning its previous value.
    ///
    /// # Errors
    ///
    /// Returns [`DomError`] if `id` is not a live element.
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> Result<Option<String>, DomError> {
        Ok(self.attribute_map_mut(id)?.remove(name))
    }

    // --- Navigation ---

    /// Returns the parent of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Returns the first child of a node.
    #[must_use]
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.first_child)
    }

    /// Returns the last child of a node.
    #[must_use]
    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.last_child)
    }

    /// Returns the next sibling of a node.
    #[must_use]
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.next_sibling)
    }

    /// Returns the previous sibling of a node.
    #[must_use]
    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.prev_sibling)
    }

    /// Returns an iterator over the children of a node.
    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            doc: self,
            next: self.first_child(id),
        }
    }

    /// Returns an iterator over a node and its ancestors (walking up to root).
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            doc: self,
            next: self.contains(id).then_some(id),
        }
    }

    /// Returns an iterator over all descendants of a node in document order
    /// (pre-order, depth-first). The node itself is not included.
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        Descendants {
            doc: self,
            root: id,
            next: self.first_child(id),
        }
    }

    /// Returns the number of children of a node.
    #[must_use]
    pub fn child_count(&self, id: NodeId) -> usize {
        self.children(id).count()
    }

    /// Returns the child at `index`, or `None` if out of range.
    #[must_use]
    pub fn child_at(&self, id: NodeId, index: usize) -> Option<NodeId> {
        self.children(id).nth(index)
    }

    /// Returns the 0-based position of a node among its siblings, or `None`
    /// for a node without a parent.
    #[must_use]
    pub fn index_in_parent(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).position(|c| c == id)
    }

    /// Collects every element below `id` whose name equals `name`, in
    /// document order. The wildcard `"*"` matches every element.
    ///
    /// # Examples
    ///
    /// ```
    /// use xmlarbor::Document;
    ///
    /// let doc = Document::parse_str("<a><b/><c><b/></c></a>").unwrap();
    /// assert_eq!(doc.find_descendants_by_tag(doc.root(), "b").len(), 2);
    /// assert_eq!(doc.find_descendants_by_tag(doc.root(), "*").len(), 4);
    /// ```
    #[must_use]
    pub fn find_descendants_by_tag(&self, id: NodeId, name: &str) -> Vec<NodeId> {
        self.descendants(id)
            .filter(|&d| match &self.node(d).kind {
                NodeKind::Element { name: tag, .. } => name == "*" || tag == name,
                _ => false,
            })
            .collect()
    }

    /// Returns the number of live nodes, including the document node.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.iter().flatten().count()
    }

    // --- Construction ---

    /// Allocates a new, detached node in the arena and returns its `NodeId`.
    ///
    /// No validation happens here; the public `create_*` methods check
    /// names and text first.
    pub(crate) fn create_node(&mut self, kind: NodeKind) -> NodeId {
        let index = self.nodes.len();
        self.nodes.push(Some(NodeData::new(kind)));
        NodeId::from_index(index)
    }

    /// Creates a detached element.
    ///
    /// A node that is never attached stays allocated until it is passed to
    /// [`discard`](Self::discard) or the document is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`SyntaxError`] if `name` does not satisfy the name grammar.
    pub fn create_element(&mut self, name: &str) -> Result<NodeId, SyntaxError> {
        validate_name(name)?;
        Ok(self.create_node(NodeKind::element(name)))
    }

    /// Creates a detached text node.
    ///
    /// # Errors
    ///
    /// Returns [`SyntaxError`] if `text` contains `<` or `>`.
    pub fn create_text(&mut self, text: &str) -> Result<NodeId, SyntaxError> {
        check_text(text)?;
        Ok(self.create_node(NodeKind::Text {
            content: text.to_string(),
        }))
    }

    /// Creates a detached comment node. Comment text is unrestricted.
    pub fn create_comment(&mut self, text: &str) -> NodeId {
        self.create_node(NodeKind::Comment {
            content: text.to_string(),
        })
    }

    /// Creates a detached CDATA section. Its content is unrestricted.
    pub fn create_cdata(&mut self, text: &str) -> NodeId {
        self.create_node(NodeKind::CData {
            content: text.to_string(),
        })
    }

    // --- Mutation ---

    /// Moves `child` under `parent` as its last child.
    ///
    /// If `child` is currently attached elsewhere it is detached first.
    ///
    /// # Errors
    ///
    /// Returns [`DomError`] if either node does not exist, if `parent` is a
    /// leaf kind, if `child` is not a permitted child kind of `parent`
    /// (including a second root element under the document), or if `child`
    /// is `parent` or one of its ancestors.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.check_adoption(parent, child)?;
        self.detach(child);
        self.link_last(parent, child);
        trace!(?parent, ?child, "appended child");
        Ok(())
    }

    /// Moves `new_child` under `parent`, immediately before `ref_child`.
    ///
    /// # Errors
    ///
    /// Returns [`DomError`] if `ref_child` is not currently a child of
    /// `parent`, plus every error [`append_child`](Self::append_child) can
    /// return.
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        new_child: NodeId,
        ref_child: NodeId,
    ) -> Result<(), DomError> {
        if !self.contains(ref_child) {
            return Err(missing_node());
        }
        if self.parent(ref_child) != Some(parent) {
            return Err(DomError::new("reference node is not a child of this node"));
        }
        self.check_adoption(parent, new_child)?;
        if new_child == ref_child {
            return Ok(());
        }

        self.detach(new_child);
        self.node_mut(new_child).parent = Some(parent);
        if let Some(prev) = self.node(ref_child).prev_sibling {
            self.node_mut(prev).next_sibling = Some(new_child);
            self.node_mut(new_child).prev_sibling = Some(prev);
        } else {
            self.node_mut(parent).first_child = Some(new_child);
        }
        self.node_mut(new_child).next_sibling = Some(ref_child);
        self.node_mut(ref_child).prev_sibling = Some(new_child);
        trace!(?parent, ?new_child, ?ref_child, "inserted child");
        Ok(())
    }

    /// Detaches `old_child` from `parent` and frees its whole subtree.
    ///
    /// # Errors
    ///
    /// Returns [`DomError`] if `old_child` does not exist or is not
    /// currently a child of `parent`.
    pub fn remove_child(&mut self, parent: NodeId, old_child: NodeId) -> Result<(), DomError> {
        if !self.contains(parent) || !self.contains(old_child) {
            return Err(missing_node());
        }
        if self.parent(old_child) != Some(parent) {
            return Err(DomError::new("node is not a child of this node"));
        }
        self.detach(old_child);
        self.free_subtree(old_child);
        trace!(?parent, ?old_child, "removed child");
        Ok(())
    }

    /// Frees a detached node and everything below it.
    ///
    /// Nodes from the `create_*` methods live in the arena until they are
    /// attached and later removed, or discarded here.
    ///
    /// # Errors
    ///
    /// Returns [`DomError`] if `id` does not exist, is the document node, or
    /// is still attached to a parent.
    pub fn discard(&mut self, id: NodeId) -> Result<(), DomError> {
        if !self.contains(id) {
            return Err(missing_node());
        }
        if id == self.root {
            return Err(DomError::new("the document node cannot be discarded"));
        }
        if self.parent(id).is_some() {
            return Err(DomError::new("node is still attached; use remove_child"));
        }
        self.free_subtree(id);
        Ok(())
    }

    /// Renames an element.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Dom`] if `id` is not a live element and
    /// [`Error::Syntax`] if `name` does not satisfy the name grammar.
    pub fn set_name(&mut self, id: NodeId, name: &str) -> Result<(), Error> {
        let Some(data) = self.get(id) else {
            return Err(missing_node().into());
        };
        if data.kind.node_type() != NodeType::Element {
            return Err(DomError::new(format!(
                "{} node cannot be renamed",
                data.kind.node_type()
            ))
            .into());
        }
        validate_name(name)?;
        if let NodeKind::Element { name: current, .. } = &mut self.node_mut(id).kind {
            *current = name.to_string();
        }
        Ok(())
    }

    /// Replaces the text of a node.
    ///
    /// Text nodes take the value directly and reject `<` and `>`; CDATA and
    /// comment nodes take it unrestricted. An element drops all of its
    /// children and receives a single new text child holding `text`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Syntax`] if a text value contains `<` or `>`, and
    /// [`Error::Dom`] if `id` does not exist or is the document node.
    pub fn set_text_content(&mut self, id: NodeId, text: &str) -> Result<(), Error> {
        let Some(node_type) = self.node_type(id) else {
            return Err(missing_node().into());
        };

        match node_type {
            NodeType::Document => {
                return Err(DomError::new("Document node has no text content").into());
            }
            NodeType::Text | NodeType::Element => check_text(text)?,
            NodeType::CDataSection | NodeType::Comment => {}
        }

        if node_type == NodeType::Element {
            while let Some(child) = self.first_child(id) {
                self.detach(child);
                self.free_subtree(child);
            }
            let text_node = self.create_node(NodeKind::Text {
                content: text.to_string(),
            });
            self.link_last(id, text_node);
            return Ok(());
        }

        if let NodeKind::Text { content }
        | NodeKind::CData { content }
        | NodeKind::Comment { content } = &mut self.node_mut(id).kind
        {
            *content = text.to_string();
        }
        Ok(())
    }

    // --- Internal link maintenance ---

    /// Validates that `child` may become a child of `parent`.
    fn check_adoption(&self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        let (Some(parent_type), Some(child_type)) = (self.node_type(parent), self.node_type(child))
        else {
            return Err(missing_node());
        };

        if parent_type.is_leaf() {
            return Err(DomError::new(format!(
                "{parent_type} node cannot have child nodes"
            )));
        }
        if child_type == NodeType::Document {
            return Err(DomError::new("cannot append a Document node"));
        }
        if parent_type == NodeType::Document {
            if !matches!(child_type, NodeType::Element | NodeType::Comment) {
                return Err(DomError::new(format!(
                    "Document node cannot have a child of type {child_type}"
                )));
            }
            if child_type == NodeType::Element
                && self.root_element().is_some_and(|existing| existing != child)
            {
                return Err(DomError::new(
                    "document can't have more than one root element",
                ));
            }
        }
        if self.ancestors(parent).any(|a| a == child) {
            return Err(DomError::new(
                "cannot attach a node to itself or to one of its descendants",
            ));
        }
        Ok(())
    }

    fn link_last(&mut self, parent: NodeId, child: NodeId) {
        self.node_mut(child).parent = Some(parent);
        if let Some(last) = self.node(parent).last_child {
            self.node_mut(last).next_sibling = Some(child);
            self.node_mut(child).prev_sibling = Some(last);
            self.node_mut(parent).last_child = Some(child);
        } else {
            self.node_mut(parent).first_child = Some(child);
            self.node_mut(parent).last_child = Some(child);
        }
    }

    /// Unlinks a node from its parent and siblings. No-op for detached nodes.
    fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.node(id).parent else {
            return;
        };

        let prev = self.node(id).prev_sibling;
        let next = self.node(id).next_sibling;

        match prev {
            Some(p) => self.node_mut(p).next_sibling = next,
            None => self.node_mut(parent).first_child = next,
        }

        match next {
            Some(n) => self.node_mut(n).prev_sibling = prev,
            None => self.node_mut(parent).last_child = prev,
        }

        let data = self.node_mut(id);
        data.parent = None;
        data.prev_sibling = None;
        data.next_sibling = None;
    }

    /// Frees a detached node and all of its descendants.
    fn free_subtree(&mut self, id: NodeId) {
        let doomed: Vec<NodeId> = std::iter::once(id).chain(self.descendants(id)).collect();
        for d in doomed {
            self.nodes[d.as_index()] = None;
        }
        trace!(?id, "freed subtree");
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

fn missing_node() -> DomError {
    DomError::new("node does not exist in this document")
}

fn check_text(text: &str) -> Result<(), SyntaxError> {
    if text.contains(['<', '>']) {
        return Err(SyntaxError::new("text cannot contain '<' or '>'"));
    }
    Ok(())
}

// --- Iterators ---

/// Iterator over the children of a node.
pub struct Children<'a> {
    doc: &'a Document,
    next: Option<NodeId>,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.doc.next_sibling(current);
        Some(current)
    }
}

/// Iterator over a node and its ancestors.
pub struct Ancestors<'a> {
    doc: &'a Document,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.doc.parent(current);
        Some(current)
    }
}

/// Pre-order iterator over all descendants of a node.
pub struct Descendants<'a> {
    doc: &'a Document,
    root: NodeId,
    next: Option<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;

        if let Some(child) = self.doc.first_child(current) {
            self.next = Some(child);
            return Some(current);
        }

        let mut node = current;
        loop {
            if node == self.root {
                self.next = None;
                break;
            }
            if let Some(sibling) = self.doc.next_sibling(node) {
                self.next = Some(sibling);
                break;
            }
            match self.doc.parent(node) {
                Some(parent) => node = parent,
                None => {
                    self.next = None;
                    break;
                }
            }
        }
        Some(current)
    }
}
