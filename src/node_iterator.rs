//! Stateful, filter-aware, bidirectional pre-order traversal (§4.8).

use std::cell::RefCell;
use std::rc::Rc;

use crate::document::Document;
use crate::node::{NodeId, NodeKind};
use crate::tree::{
    deepest_last_descendant, first_following_not_descendant, is_inclusive_descendant,
    next_in_document_order, previous_in_document_order,
};

/// `whatToShow` bitmask bit for a given [`NodeKind`], following the
/// classic DOM `NodeFilter.SHOW_*` numbering (`1 << (nodeType - 1)`).
pub const fn show_bit(kind: NodeKind) -> u32 {
    1 << (kind as u32 - 1)
}

pub const SHOW_ALL: u32 = u32::MAX;

/// A callback filter's verdict on a candidate node.
///
/// For [`NodeIterator`], `Reject` and `Skip` are equivalent (§4.8); the
/// distinction only matters to [`crate::tree_walker::TreeWalker`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FilterResult {
    Accept,
    Reject,
    Skip,
}

pub type NodeFilter = Rc<dyn Fn(NodeId, &Document) -> FilterResult>;

pub(crate) fn passes_what_to_show(doc: &Document, node: NodeId, what_to_show: u32) -> bool {
    what_to_show & show_bit(doc.get(node).node_type()) != 0
}

pub(crate) fn apply_filter(
    doc: &Document,
    node: NodeId,
    what_to_show: u32,
    filter: Option<&NodeFilter>,
) -> FilterResult {
    if !passes_what_to_show(doc, node, what_to_show) {
        return FilterResult::Skip;
    }
    match filter {
        Some(f) => f(node, doc),
        None => FilterResult::Accept,
    }
}

pub(crate) struct NodeIteratorState {
    pub(crate) root: NodeId,
    pub(crate) what_to_show: u32,
    pub(crate) filter: Option<NodeFilter>,
    pub(crate) reference: NodeId,
    pub(crate) pointer_before_reference: bool,
}

/// A live `NodeIterator`: survives tree mutations that do not remove its
/// `reference` node, and reassigns `reference` per the WHATWG
/// pre-removing-steps algorithm when it does (§4.8, Open Question (c)).
///
/// Cloning a `NodeIterator` shares the same underlying cursor (it is a
/// handle, not a value) — matching how `Document::create_node_iterator`
/// hands callers a live view rather than a snapshot.
#[derive(Clone)]
pub struct NodeIterator {
    pub(crate) state: Rc<RefCell<NodeIteratorState>>,
}

impl NodeIterator {
    pub(crate) fn new(
        doc: &mut Document,
        root: NodeId,
        what_to_show: u32,
        filter: Option<NodeFilter>,
    ) -> Self {
        let state = Rc::new(RefCell::new(NodeIteratorState {
            root,
            what_to_show,
            filter,
            reference: root,
            pointer_before_reference: true,
        }));
        doc.node_iterators.borrow_mut().push(Rc::downgrade(&state));
        NodeIterator { state }
    }

    pub fn root(&self) -> NodeId {
        self.state.borrow().root
    }

    pub fn what_to_show(&self) -> u32 {
        self.state.borrow().what_to_show
    }

    /// `nextNode()`.
    ///
    /// The iterator starts positioned immediately *before* `root`
    /// (`pointer_before_reference = true`, `reference = root`), so the
    /// first call tests `root` itself as a candidate without moving past
    /// it — `root` is a legitimate result if it passes `whatToShow`/the
    /// callback filter, matching real `NodeIterator` semantics (a fresh
    /// `document.createNodeIterator(root).nextNode()` returns `root`).
    pub fn next_node(&self, doc: &Document) -> Option<NodeId> {
        let mut st = self.state.borrow_mut();
        let mut candidate = st.reference;
        loop {
            if st.pointer_before_reference {
                st.pointer_before_reference = false;
            } else {
                candidate = next_in_document_order(doc, candidate, st.root)?;
            }
            if apply_filter(doc, candidate, st.what_to_show, st.filter.as_ref()) == FilterResult::Accept {
                st.reference = candidate;
                return Some(candidate);
            }
        }
    }

    /// `previousNode()`: symmetric in reverse document order.
    ///
    /// Mirrors `nextNode()`: `root` is reachable as a result (the preorder
    /// predecessor of `root`'s first descendant is `root` itself), and
    /// `candidate == st.root` is checked *before* stepping further back —
    /// once `candidate` (not yet moved) is `root`, there is nothing earlier
    /// in the subtree to move to.
    pub fn previous_node(&self, doc: &Document) -> Option<NodeId> {
        let mut st = self.state.borrow_mut();
        let mut candidate = st.reference;
        loop {
            if !st.pointer_before_reference {
                st.pointer_before_reference = true;
            } else {
                if candidate == st.root {
                    return None;
                }
                candidate = previous_in_document_order(doc, candidate, st.root)?;
            }
            if apply_filter(doc, candidate, st.what_to_show, st.filter.as_ref()) == FilterResult::Accept {
                st.reference = candidate;
                return Some(candidate);
            }
        }
    }

    /// Legacy no-op, retained for API shape (§4.8).
    pub fn detach(&self) {}
}

/// Applies the WHATWG pre-removing-steps algorithm to one iterator's state:
/// if `to_be_removed` is an inclusive ancestor of `reference`, reassign
/// `reference` to the nearest following non-removed node (if pointer was
/// before reference and such a node exists within `root`), else to the
/// deepest last descendant of `to_be_removed`'s previous sibling, else to
/// `to_be_removed`'s parent.
pub(crate) fn adjust_for_removal(
    state: &mut NodeIteratorState,
    doc: &Document,
    to_be_removed: NodeId,
) {
    if to_be_removed == state.root
        || !is_inclusive_descendant(doc, state.reference, to_be_removed)
    {
        return;
    }

    if state.pointer_before_reference {
        if let Some(next) = first_following_not_descendant(doc, to_be_removed, state.root) {
            state.reference = next;
            return;
        }
        state.pointer_before_reference = false;
    }

    if let Some(prev) = doc.get(to_be_removed).prev_sibling() {
        state.reference = deepest_last_descendant(doc, prev);
    } else if let Some(parent) = doc.get(to_be_removed).parent() {
        state.reference = parent;
    }
}

impl Document {
    /// `document.createNodeIterator(root, whatToShow, filter)`.
    pub fn create_node_iterator(
        &mut self,
        root: NodeId,
        what_to_show: u32,
        filter: Option<NodeFilter>,
    ) -> NodeIterator {
        NodeIterator::new(self, root, what_to_show, filter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::ensure_logger;

    fn build_tree(doc: &mut Document) -> (NodeId, NodeId, NodeId, NodeId) {
        let root = doc.create_element("div");
        doc.append_child(Document::DOCUMENT_NODE_ID, root).unwrap();
        let a = doc.create_element("a");
        doc.append_child(root, a).unwrap();
        let a1 = doc.create_element("a1");
        doc.append_child(a, a1).unwrap();
        let b = doc.create_element("b");
        doc.append_child(root, b).unwrap();
        (root, a, a1, b)
    }

    #[test]
    fn walks_elements_in_document_order() {
        ensure_logger();
        let mut doc = Document::new();
        let (root, a, a1, b) = build_tree(&mut doc);
        let it = doc.create_node_iterator(root, SHOW_ALL, None);

        // The very first `nextNode()` yields `root` itself: the iterator
        // starts positioned before it, and `root` passes the accept-all
        // filter here.
        assert_eq!(Some(root), it.next_node(&doc));
        assert_eq!(Some(a), it.next_node(&doc));
        assert_eq!(Some(a1), it.next_node(&doc));
        assert_eq!(Some(b), it.next_node(&doc));
        assert_eq!(None, it.next_node(&doc));

        assert_eq!(Some(b), it.previous_node(&doc));
        assert_eq!(Some(a1), it.previous_node(&doc));
        assert_eq!(Some(a), it.previous_node(&doc));
        assert_eq!(Some(root), it.previous_node(&doc));
        assert_eq!(None, it.previous_node(&doc));
    }

    #[test]
    fn reference_reassigned_when_removed() {
        ensure_logger();
        let mut doc = Document::new();
        let (root, a, a1, b) = build_tree(&mut doc);
        let it = doc.create_node_iterator(root, SHOW_ALL, None);

        assert_eq!(Some(root), it.next_node(&doc));
        assert_eq!(Some(a), it.next_node(&doc));
        assert_eq!(Some(a1), it.next_node(&doc));
        // reference is now a1; removing its ancestor `a` must reassign it.
        // `a` has no previous sibling, so the new reference is its parent.
        doc.remove_child(root, a).unwrap();
        assert_eq!(root, it.state.borrow().reference);

        // subsequent traversal still proceeds correctly from there.
        assert_eq!(Some(b), it.next_node(&doc));
    }
}
