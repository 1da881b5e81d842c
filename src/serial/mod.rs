//! Markup serialization.
//!
//! This module turns a `Document` tree (or any subtree) back into indented
//! markup text. Output is a pure projection of the tree: serializing never
//! changes it.

pub mod xml;

pub use xml::{serialize, serialize_node, serialize_with_options, SerializeOptions};
