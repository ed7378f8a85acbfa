//! Cursor-style filtered traversal (§4.9): `accept`/`reject`/`skip`
//! distinguished from `NodeIterator`'s accept/reject-only filtering.

use crate::document::Document;
use crate::node::NodeId;
use crate::node_iterator::{apply_filter, FilterResult, NodeFilter};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Direction {
    Forward,
    Backward,
}

/// A `TreeWalker`: a single cursor (`currentNode`) over `root`'s subtree,
/// filtered by `whatToShow` and an optional callback.
pub struct TreeWalker {
    root: NodeId,
    what_to_show: u32,
    filter: Option<NodeFilter>,
    current: NodeId,
}

impl TreeWalker {
    pub(crate) fn new(root: NodeId, what_to_show: u32, filter: Option<NodeFilter>) -> Self {
        TreeWalker { root, what_to_show, filter, current: root }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn current_node(&self) -> NodeId {
        self.current
    }

    pub fn set_current_node(&mut self, node: NodeId) {
        self.current = node;
    }

    fn filter(&self, doc: &Document, node: NodeId) -> FilterResult {
        apply_filter(doc, node, self.what_to_show, self.filter.as_ref())
    }

    /// `parentNode()`: stops at the root boundary.
    pub fn parent_node(&mut self, doc: &Document) -> Option<NodeId> {
        let mut node = self.current;
        while node != self.root {
            match doc.get(node).parent() {
                Some(parent) => {
                    node = parent;
                    if self.filter(doc, node) == FilterResult::Accept {
                        self.current = node;
                        return Some(node);
                    }
                }
                None => return None,
            }
        }
        None
    }

    pub fn first_child(&mut self, doc: &Document) -> Option<NodeId> {
        self.traverse_children(doc, Direction::Forward)
    }

    pub fn last_child(&mut self, doc: &Document) -> Option<NodeId> {
        self.traverse_children(doc, Direction::Backward)
    }

    pub fn next_sibling(&mut self, doc: &Document) -> Option<NodeId> {
        self.traverse_siblings(doc, Direction::Forward)
    }

    pub fn previous_sibling(&mut self, doc: &Document) -> Option<NodeId> {
        self.traverse_siblings(doc, Direction::Backward)
    }

    /// `firstChild()`/`lastChild()` shared algorithm: descend into `skip`
    /// subtrees, never into `reject`ed ones, searching siblings (and their
    /// ancestors up to, but not including, `current`) until one is found.
    fn traverse_children(&mut self, doc: &Document, dir: Direction) -> Option<NodeId> {
        let mut node = match dir {
            Direction::Forward => doc.get(self.current).first_child(),
            Direction::Backward => doc.get(self.current).last_child(),
        }?;
        loop {
            match self.filter(doc, node) {
                FilterResult::Accept => {
                    self.current = node;
                    return Some(node);
                }
                FilterResult::Skip => {
                    let child = match dir {
                        Direction::Forward => doc.get(node).first_child(),
                        Direction::Backward => doc.get(node).last_child(),
                    };
                    if let Some(child) = child {
                        node = child;
                        continue;
                    }
                }
                FilterResult::Reject => {}
            }
            // search a sibling, walking up through ancestors as needed,
            // never passing `root` or the original `current`.
            loop {
                let sibling = match dir {
                    Direction::Forward => doc.get(node).next_sibling(),
                    Direction::Backward => doc.get(node).prev_sibling(),
                };
                if let Some(sibling) = sibling {
                    node = sibling;
                    break;
                }
                let parent = doc.get(node).parent();
                match parent {
                    Some(p) if p != self.root && p != self.current => {
                        node = p;
                    }
                    _ => return None,
                }
            }
        }
    }

    /// `previousSibling()`/`nextSibling()` shared algorithm.
    fn traverse_siblings(&mut self, doc: &Document, dir: Direction) -> Option<NodeId> {
        if self.current == self.root {
            return None;
        }
        let mut node = self.current;
        loop {
            let mut sibling = match dir {
                Direction::Forward => doc.get(node).next_sibling(),
                Direction::Backward => doc.get(node).prev_sibling(),
            };
            while sibling.is_none() {
                let parent = doc.get(node).parent();
                match parent {
                    Some(p) if p != self.root && p != self.current => {
                        node = p;
                        sibling = match dir {
                            Direction::Forward => doc.get(node).next_sibling(),
                            Direction::Backward => doc.get(node).prev_sibling(),
                        };
                    }
                    _ => return None,
                }
            }
            node = sibling.unwrap();
            match self.filter(doc, node) {
                FilterResult::Accept => {
                    self.current = node;
                    return Some(node);
                }
                FilterResult::Skip => {
                    let child = match dir {
                        Direction::Forward => doc.get(node).first_child(),
                        Direction::Backward => doc.get(node).last_child(),
                    };
                    if let Some(child) = child {
                        node = child;
                    }
                    // else: loop around, searching node's own siblings next
                }
                FilterResult::Reject => {}
            }
        }
    }

    /// `nextNode()`: full document-order walk, descending into `skip`
    /// subtrees but never `reject`ed ones.
    pub fn next_node(&mut self, doc: &Document) -> Option<NodeId> {
        let mut node = self.current;
        let mut result = FilterResult::Accept;
        loop {
            while result != FilterResult::Reject {
                if let Some(first) = doc.get(node).first_child() {
                    node = first;
                    result = self.filter(doc, node);
                    if result == FilterResult::Accept {
                        self.current = node;
                        return Some(node);
                    }
                } else {
                    break;
                }
            }
            let mut temp = node;
            let mut found_sibling = None;
            loop {
                if temp == self.root {
                    return None;
                }
                if let Some(sibling) = doc.get(temp).next_sibling() {
                    found_sibling = Some(sibling);
                    break;
                }
                match doc.get(temp).parent() {
                    Some(parent) => temp = parent,
                    None => return None,
                }
            }
            node = found_sibling?;
            result = self.filter(doc, node);
            if result == FilterResult::Accept {
                self.current = node;
                return Some(node);
            }
        }
    }

    /// `previousNode()`: symmetric in reverse document order.
    pub fn previous_node(&mut self, doc: &Document) -> Option<NodeId> {
        let mut node = self.current;
        while node != self.root {
            let mut sibling = doc.get(node).prev_sibling();
            while let Some(s) = sibling {
                node = s;
                let mut result = self.filter(doc, node);
                while result != FilterResult::Reject {
                    if let Some(last) = doc.get(node).last_child() {
                        node = last;
                        result = self.filter(doc, node);
                    } else {
                        break;
                    }
                }
                if result == FilterResult::Accept {
                    self.current = node;
                    return Some(node);
                }
                sibling = doc.get(node).prev_sibling();
            }
            if node == self.root {
                return None;
            }
            match doc.get(node).parent() {
                Some(parent) => {
                    node = parent;
                    if node == self.root {
                        return None;
                    }
                    if self.filter(doc, node) == FilterResult::Accept {
                        self.current = node;
                        return Some(node);
                    }
                }
                None => return None,
            }
        }
        None
    }
}

impl Document {
    /// `document.createTreeWalker(root, whatToShow, filter)`.
    pub fn create_tree_walker(
        &self,
        root: NodeId,
        what_to_show: u32,
        filter: Option<NodeFilter>,
    ) -> TreeWalker {
        TreeWalker::new(root, what_to_show, filter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::ensure_logger;
    use crate::node_iterator::{FilterResult as FR, SHOW_ALL};

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
    fn plain_walk_visits_all_elements() {
        ensure_logger();
        let mut doc = Document::new();
        let (root, a, a1, b) = build_tree(&mut doc);
        let mut w = doc.create_tree_walker(root, SHOW_ALL, None);
        assert_eq!(Some(a), w.next_node(&doc));
        assert_eq!(Some(a1), w.next_node(&doc));
        assert_eq!(Some(b), w.next_node(&doc));
        assert_eq!(None, w.next_node(&doc));
    }

    #[test]
    fn s5_reject_skips_subtree_but_skip_descends() {
        ensure_logger();
        let mut doc = Document::new();
        let (root, a, a1, b) = build_tree(&mut doc);

        let reject_a: NodeFilter = std::rc::Rc::new(move |n, _doc| {
            if n == a { FR::Reject } else { FR::Accept }
        });
        let mut w = doc.create_tree_walker(root, SHOW_ALL, Some(reject_a));
        assert_eq!(Some(b), w.next_node(&doc));

        let skip_a: NodeFilter = std::rc::Rc::new(move |n, _doc| {
            if n == a { FR::Skip } else { FR::Accept }
        });
        let mut w2 = doc.create_tree_walker(root, SHOW_ALL, Some(skip_a));
        assert_eq!(Some(a1), w2.next_node(&doc));
        assert_eq!(Some(b), w2.next_node(&doc));
    }

    #[test]
    fn previous_node_reverses_next_node() {
        ensure_logger();
        let mut doc = Document::new();
        let (root, a, a1, b) = build_tree(&mut doc);
        let mut w = doc.create_tree_walker(root, SHOW_ALL, None);
        w.next_node(&doc);
        w.next_node(&doc);
        w.next_node(&doc); // current == b
        assert_eq!(Some(a1), w.previous_node(&doc));
        assert_eq!(Some(a), w.previous_node(&doc));
        assert_eq!(None, w.previous_node(&doc));
    }
}
