//! Structural invariants under mutation, exercised through the public API.

#![allow(clippy::unwrap_used)]

use pretty_assertions::assert_eq;
use xmlarbor::{parse, Document, NodeId, NodeType};

fn sample() -> (Document, NodeId) {
    let doc = parse("<root><a><x/></a><b>text</b><!--note--></root>").unwrap();
    let root = doc.root_element().unwrap();
    (doc, root)
}

/// Asserts that a failed call left the serialized tree exactly as before.
fn assert_unchanged(doc: &Document, before: &str) {
    assert_eq!(doc.serialize(2), before);
}

// ---------------------------------------------------------------------------
// Single root
// ---------------------------------------------------------------------------

#[test]
fn test_second_root_is_rejected() {
    let (mut doc, root) = sample();
    let before = doc.serialize(2);
    let other = doc.create_element("other").unwrap();

    let err = doc.append_child(doc.root(), other).unwrap_err();
    assert!(err.message.contains("more than one root element"));
    assert_eq!(doc.root_element(), Some(root));
    assert_unchanged(&doc, &before);

    let first = doc.first_child(doc.root()).unwrap();
    assert!(doc.insert_before(doc.root(), other, first).is_err());
    assert_unchanged(&doc, &before);

    let count = doc.node_count();
    doc.discard(other).unwrap();
    assert_eq!(doc.node_count(), count - 1);
    assert_unchanged(&doc, &before);
}

#[test]
fn test_root_can_be_replaced_after_removal() {
    let (mut doc, root) = sample();
    let document = doc.root();
    doc.remove_child(document, root).unwrap();
    assert_eq!(doc.root_element(), None);
    assert_eq!(doc.node_count(), 1);

    let fresh = doc.create_element("fresh").unwrap();
    doc.append_child(document, fresh).unwrap();
    assert_eq!(doc.serialize(2), "<fresh/>\n");
}

// ---------------------------------------------------------------------------
// Leaf kinds
// ---------------------------------------------------------------------------

#[test]
fn test_leaf_kinds_never_take_children() {
    let (mut doc, root) = sample();
    let before = doc.serialize(2);
    let b = doc.find_descendants_by_tag(root, "b")[0];
    let text = doc.first_child(b).unwrap();
    let comment = doc.last_child(root).unwrap();
    let cdata = doc.create_cdata("raw");

    for leaf in [text, comment, cdata] {
        let child = doc.create_element("child").unwrap();
        let err = doc.append_child(leaf, child).unwrap_err();
        assert!(err.message.ends_with("cannot have child nodes"), "{err}");
        assert_eq!(doc.child_count(leaf), 0);
    }

    // A leaf has no children, so no reference node can sit under it.
    let x = doc.find_descendants_by_tag(root, "x")[0];
    let sibling = doc.create_element("s").unwrap();
    let err = doc.insert_before(text, sibling, x).unwrap_err();
    assert_eq!(err.message, "reference node is not a child of this node");
    assert_unchanged(&doc, &before);
}

// ---------------------------------------------------------------------------
// Cycles and moves
// ---------------------------------------------------------------------------

#[test]
fn test_ancestor_cannot_move_below_descendant() {
    let (mut doc, root) = sample();
    let before = doc.serialize(2);
    let a = doc.find_descendants_by_tag(root, "a")[0];
    let x = doc.find_descendants_by_tag(root, "x")[0];

    assert!(doc.append_child(x, a).is_err());
    assert!(doc.append_child(x, root).is_err());
    assert!(doc.append_child(x, x).is_err());
    assert_unchanged(&doc, &before);
}

#[test]
fn test_move_between_parents() {
    let (mut doc, root) = sample();
    let a = doc.find_descendants_by_tag(root, "a")[0];
    let b = doc.find_descendants_by_tag(root, "b")[0];
    let x = doc.find_descendants_by_tag(root, "x")[0];

    doc.append_child(b, x).unwrap();
    assert_eq!(doc.parent(x), Some(b));
    assert_eq!(doc.child_count(a), 0);
    assert_eq!(doc.index_in_parent(x), Some(1));
    assert_eq!(
        doc.serialize(2),
        "<root>\n  <a/>\n  <b>\n    text\n    <x/>\n  </b>\n  <!--note-->\n</root>\n"
    );
}

#[test]
fn test_reorder_siblings() {
    let (mut doc, root) = sample();
    let a = doc.find_descendants_by_tag(root, "a")[0];
    let comment = doc.last_child(root).unwrap();
    doc.insert_before(root, comment, a).unwrap();
    let kinds: Vec<_> = doc.children(root).filter_map(|c| doc.node_type(c)).collect();
    assert_eq!(kinds, vec![NodeType::Comment, NodeType::Element, NodeType::Element]);
    assert_eq!(doc.prev_sibling(a), Some(comment));
    assert_eq!(doc.next_sibling(comment), Some(a));
}

// ---------------------------------------------------------------------------
// Removal
// ---------------------------------------------------------------------------

#[test]
fn test_remove_destroys_subtree() {
    let (mut doc, root) = sample();
    let a = doc.find_descendants_by_tag(root, "a")[0];
    let x = doc.find_descendants_by_tag(root, "x")[0];
    doc.remove_child(root, a).unwrap();

    assert!(!doc.contains(a));
    assert!(!doc.contains(x));
    assert_eq!(doc.find_descendants_by_tag(root, "x"), Vec::<NodeId>::new());
    let err = doc.append_child(root, x).unwrap_err();
    assert!(err.message.contains("does not exist"));
}

#[test]
fn test_remove_requires_direct_child() {
    let (mut doc, root) = sample();
    let before = doc.serialize(2);
    let x = doc.find_descendants_by_tag(root, "x")[0];
    assert!(doc.remove_child(root, x).is_err());
    assert_unchanged(&doc, &before);
}

// ---------------------------------------------------------------------------
// Names and text
// ---------------------------------------------------------------------------

#[test]
fn test_name_grammar() {
    let (mut doc, root) = sample();
    for bad in ["1abc", "", "a b", "-a", ".a", ":a", "a>b"] {
        let err = doc.set_name(root, bad).unwrap_err();
        assert!(err.is_syntax(), "{bad:?} should be a syntax error");
        assert_eq!(doc.node_name(root), "root");
    }
    for good in ["a:b-valid1", "_x", "A.b_c"] {
        doc.set_name(root, good).unwrap();
        assert_eq!(doc.node_name(root), good);
    }
}

#[test]
fn test_set_text_content_replaces_children() {
    let (mut doc, root) = sample();
    let before = doc.serialize(2);
    assert!(doc.set_text_content(root, "a < b").unwrap_err().is_syntax());
    assert_unchanged(&doc, &before);

    doc.set_text_content(root, "plain").unwrap();
    assert_eq!(doc.child_count(root), 1);
    assert_eq!(doc.text_content(root), "plain");
    assert_eq!(doc.serialize(2), "<root>plain</root>\n");
}

#[test]
fn test_text_content_rules() {
    let doc = parse("<p>one<b>two</b><i><u>three</u></i><![CDATA[skip]]></p>").unwrap();
    let p = doc.root_element().unwrap();
    assert_eq!(doc.text_content(p), "one two three");
    assert_eq!(doc.text_content(doc.root()), "one two three");
    let b = doc.find_descendants_by_tag(p, "b")[0];
    assert_eq!(doc.text_content(b), "two");
}

#[test]
fn test_attributes_are_not_validated_programmatically() {
    let (mut doc, root) = sample();
    doc.set_attribute(root, "k", "1").unwrap();
    doc.set_attribute(root, "k", "2").unwrap();
    assert_eq!(doc.attribute(root, "k"), Some("2"));
    assert!(doc.has_attribute(root, "k"));
    assert_eq!(doc.remove_attribute(root, "k").unwrap(), Some("2".to_string()));
    assert!(!doc.has_attribute(root, "k"));
}

#[test]
fn test_find_descendants_wildcard() {
    let (doc, root) = sample();
    let names: Vec<&str> = doc
        .find_descendants_by_tag(doc.root(), "*")
        .into_iter()
        .map(|id| doc.node_name(id))
        .collect();
    assert_eq!(names, vec!["root", "a", "x", "b"]);
    assert_eq!(doc.find_descendants_by_tag(root, "missing").len(), 0);
}

#[test]
fn test_doctype_only_once() {
    let mut doc = parse("<!DOCTYPE root><root/>").unwrap();
    let err = doc.set_doctype("<!DOCTYPE other>").unwrap_err();
    assert!(err.to_string().starts_with("DOM error:"));
    assert_eq!(doc.doctype(), Some("<!DOCTYPE root>"));
}
