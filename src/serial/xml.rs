//! Pretty-printing serializer.
//!
//! Every node renders itself at a nesting level, with `level * indent_width`
//! spaces in front of each line it starts:
//!
//! - an element with no children is written as `<name/>`;
//! - an element whose only child is a text node keeps the text on the same
//!   line as its tags;
//! - any other element puts each child on its own lines one level deeper;
//! - text, comment and CDATA values are split into lines, each trimmed, and
//!   empty lines are dropped.
//!
//! Attributes are written in ascending name order. No escaping is applied.

use crate::tree::{Document, NodeId, NodeKind};

/// Options controlling serialization output.
///
/// # Examples
///
/// ```
/// use xmlarbor::Document;
/// use xmlarbor::serial::{serialize_with_options, SerializeOptions};
///
/// let doc = Document::parse_str("<root><child>Hello</child></root>").unwrap();
/// let xml = serialize_with_options(&doc, &SerializeOptions::default().indent_width(4));
/// assert!(xml.contains("    <child>"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerializeOptions {
    /// Spaces per nesting level. Defaults to 2.
    pub indent_width: usize,
}

impl Default for SerializeOptions {
    fn default() -> Self {
        Self { indent_width: 2 }
    }
}

impl SerializeOptions {
    /// Sets the number of spaces per nesting level.
    #[must_use]
    pub fn indent_width(mut self, width: usize) -> Self {
        self.indent_width = width;
        self
    }
}

/// Serializes a whole document.
///
/// The prolog and doctype, when recorded, come first on lines of their own.
///
/// # Examples
///
/// ```
/// use xmlarbor::Document;
/// use xmlarbor::serial::serialize;
///
/// let doc = Document::parse_str("<a><b/></a>").unwrap();
/// assert_eq!(serialize(&doc, 2), "<a>\n  <b/>\n</a>\n");
/// ```
#[must_use]
pub fn serialize(doc: &Document, indent_width: usize) -> String {
    serialize_node(doc, doc.root(), indent_width, 0)
}

/// Serializes a whole document with the given options.
#[must_use]
pub fn serialize_with_options(doc: &Document, options: &SerializeOptions) -> String {
    serialize(doc, options.indent_width)
}

/// Serializes the subtree rooted at `id`, as if it sat at nesting `level`.
///
/// Returns an empty string for an id that is not a live node.
#[must_use]
pub fn serialize_node(doc: &Document, id: NodeId, indent_width: usize, level: usize) -> String {
    let mut out = String::new();
    write_node(doc, id, &mut out, indent_width, level);
    out
}

/// Pending work for [`write_node`]: a node to render, or the closing tag of
/// an element whose children are already queued.
enum Step<'a> {
    Node(NodeId, usize),
    Close(&'a str, usize),
}

/// Renders the subtree at `id` without recursing, so programmatically built
/// trees of any depth serialize on a bounded stack.
fn write_node(doc: &Document, id: NodeId, out: &mut String, width: usize, level: usize) {
    let mut stack = vec![Step::Node(id, level)];

    while let Some(step) = stack.pop() {
        let (id, level) = match step {
            Step::Node(id, level) => (id, level),
            Step::Close(name, level) => {
                out.push_str(&" ".repeat(width * level));
                write_close_tag(out, name);
                continue;
            }
        };
        let Some(data) = doc.get(id) else {
            continue;
        };
        let pad = " ".repeat(width * level);

        match &data.kind {
            NodeKind::Document => {
                for line in [doc.prolog(), doc.doctype()].into_iter().flatten() {
                    out.push_str(line);
                    out.push('\n');
                }
                push_children(doc, id, 0, &mut stack);
            }
            NodeKind::Element { name, attributes } => {
                out.push_str(&pad);
                out.push('<');
                out.push_str(name);
                for (key, value) in attributes {
                    write_attribute(out, key, value);
                }

                let Some(first) = data.first_child else {
                    out.push_str("/>\n");
                    continue;
                };

                out.push('>');
                match &doc.node(first).kind {
                    NodeKind::Text { content } if data.last_child == Some(first) => {
                        out.push_str(&trimmed_lines(content).collect::<Vec<_>>().join("\n"));
                        write_close_tag(out, name);
                    }
                    _ => {
                        out.push('\n');
                        stack.push(Step::Close(name, level));
                        push_children(doc, id, level + 1, &mut stack);
                    }
                }
            }
            NodeKind::Text { content } => {
                for line in trimmed_lines(content) {
                    out.push_str(&pad);
                    out.push_str(line);
                    out.push('\n');
                }
            }
            NodeKind::Comment { content } => {
                write_delimited(out, &pad, "<!--", content, "-->");
            }
            NodeKind::CData { content } => {
                write_delimited(out, &pad, "<![CDATA[", content, "]]>");
            }
        }
    }
}

/// Queues the children of `id` so they pop off `stack` in document order.
fn push_children<'a>(doc: &'a Document, id: NodeId, level: usize, stack: &mut Vec<Step<'a>>) {
    let mut child = doc.last_child(id);
    while let Some(c) = child {
        stack.push(Step::Node(c, level));
        child = doc.prev_sibling(c);
    }
}

fn write_close_tag(out: &mut String, name: &str) {
    out.push_str("</");
    out.push_str(name);
    out.push_str(">\n");
}

/// Writes ` key="value"`, switching to single quotes when the value holds a
/// double quote and no single quote.
fn write_attribute(out: &mut String, key: &str, value: &str) {
    let quote = if value.contains('"') && !value.contains('\'') {
        '\''
    } else {
        '"'
    };
    out.push(' ');
    out.push_str(key);
    out.push('=');
    out.push(quote);
    out.push_str(value);
    out.push(quote);
}

/// Writes a comment or CDATA section: the first line inline after `open`,
/// later lines indented on lines of their own.
fn write_delimited(out: &mut String, pad: &str, open: &str, content: &str, close: &str) {
    out.push_str(pad);
    out.push_str(open);
    let mut last = "";
    for (i, line) in trimmed_lines(content).enumerate() {
        if i > 0 {
            out.push('\n');
            out.push_str(pad);
        }
        out.push_str(line);
        last = line;
    }
    // A trailing `-` would run into `-->`.
    if close == "-->" && last.ends_with('-') {
        out.push(' ');
    }
    out.push_str(close);
    out.push('\n');
}

fn trimmed_lines(value: &str) -> impl Iterator<Item = &str> {
    value
        .split('\n')
        .map(|line| line.trim_matches([' ', '\t', '\r', '\n']))
        .filter(|line| !line.is_empty())
}
