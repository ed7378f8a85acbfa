//! An in-memory DOM core: a node tree (arena-backed, reference-counted),
//! element attributes, character-data editing, live element collections,
//! explicit traversal objects, and the validation layer that enforces
//! hierarchical invariants on every mutation.
//!
//! Parsers, selectors, rendering, and event dispatch are external
//! collaborators built on top of the primitives exposed here (see §1/§6 of
//! the originating design).

#![warn(rust_2018_idioms)]

mod qname;
pub use qname::{LocalName, Namespace, Prefix, QualifiedName};

mod error;
pub use error::{DomError, Result};

mod character_data;
pub use character_data::{append, delete, insert, replace, substring};

mod attr;
pub use attr::{AttrNode, Attribute};

mod element;
pub use element::Element;

mod node;
pub use node::{DocumentTypeData, Node, NodeData, NodeId, NodeKind, ProcessingInstructionData};

mod document;
pub use document::Document;

mod validation;
pub use validation::{ensure_pre_insert_validity, ensure_pre_remove_validity};

mod tree;
pub use tree::{
    ancestors, count_element_children, descendants_preorder, get_descendant_text_content,
    has_element_child, is_inclusive_descendant, remove_all_children,
};

mod named_node_map;
pub use named_node_map::NamedNodeMap;

mod html_collection;
pub use html_collection::HTMLCollection;

mod element_iterator;
pub use element_iterator::ElementIterator;

mod node_iterator;
pub use node_iterator::{show_bit, FilterResult, NodeFilter, NodeIterator, SHOW_ALL};

mod tree_walker;
pub use tree_walker::TreeWalker;

mod event;
pub use event::Event;

#[cfg(test)]
mod logger;
