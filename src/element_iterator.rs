//! Depth-first pre-order enumeration of Element descendants (§4.7).

use crate::document::Document;
use crate::node::{NodeId, NodeKind};
use crate::tree::next_in_document_order;

/// A simple, non-filtering cursor over a subtree's Element descendants
/// (root excluded). Undefined behavior if the subtree is mutated during
/// iteration — callers must call [`ElementIterator::reset`] and restart.
pub struct ElementIterator {
    root: NodeId,
    cursor: NodeId,
}

impl ElementIterator {
    pub(crate) fn new(root: NodeId) -> Self {
        ElementIterator { root, cursor: root }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn reset(&mut self) {
        self.cursor = self.root;
    }

    /// Advances to, and returns, the next Element descendant in document
    /// order, skipping non-element nodes transparently.
    pub fn next(&mut self, doc: &Document) -> Option<NodeId> {
        let mut node = self.cursor;
        loop {
            node = next_in_document_order(doc, node, self.root)?;
            if doc.get(node).node_type() == NodeKind::Element {
                self.cursor = node;
                return Some(node);
            }
        }
    }
}

impl Document {
    pub fn create_element_iterator(&self, root: NodeId) -> ElementIterator {
        ElementIterator::new(root)
    }
}
