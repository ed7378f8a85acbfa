//! `Document`: the node arena, factory, and tag-name index.

use std::cell::RefCell;
use std::collections::HashMap;
use std::convert::TryInto;
use std::num::NonZeroU32;
use std::rc::Weak;

use markup5ever::LocalName;
use tendril::StrTendril;

use crate::attr::{AttrNode, Attribute};
use crate::element::Element;
use crate::error::Result;
use crate::node::{DocumentTypeData, Node, NodeData, NodeId, ProcessingInstructionData};
use crate::node_iterator::NodeIteratorState;
use crate::qname::QualifiedName;

/// A DOM-like container for a tree of nodes.
///
/// Like the teacher's own `marked::dom::Document`, this uses a single
/// `Vec<Node>` arena with `NodeId` indices for parent/child/sibling
/// structure rather than per-node heap allocations — but layered with
/// explicit reference counting: destroyed nodes become [`NodeData::Hole`]
/// rather than being physically removed, so `NodeId`s are never reused and
/// a stale id can never alias a different, later-allocated node.
pub struct Document {
    pub(crate) nodes: Vec<Node>,
    pub(crate) tag_index: HashMap<LocalName, Vec<NodeId>>,
    pub(crate) node_iterators: RefCell<Vec<Weak<RefCell<NodeIteratorState>>>>,
}

impl Document {
    /// The constant `NodeId` of the document node, present in every
    /// `Document`.
    pub const DOCUMENT_NODE_ID: NodeId = NodeId(
        unsafe { NonZeroU32::new_unchecked(1) }
    );

    pub fn new() -> Self {
        Document::with_capacity(8)
    }

    pub fn with_capacity(count: u32) -> Self {
        let mut nodes = Vec::with_capacity(count as usize);
        nodes.push(Node::new(NodeData::Hole));     // index 0: padding
        let mut document_node = Node::new(NodeData::Document);
        // The document node is its own root, so per §3 invariant (d) it is
        // connected from birth; nothing ever attaches *it* to anything.
        document_node.connected = true;
        nodes.push(document_node); // index 1: DOCUMENT_NODE_ID
        Document {
            nodes,
            tag_index: HashMap::new(),
            node_iterators: RefCell::new(Vec::new()),
        }
    }

    /// Total number of arena slots, including holes and the document node
    /// itself; an upper bound on the number of live, reachable nodes.
    pub fn len(&self) -> u32 {
        let n: u32 = self.nodes.len().try_into()
            .expect("Document (u32) node index overflow");
        n - 1 // exclude padding slot
    }

    pub fn is_empty(&self) -> bool {
        self.len() < 2
    }

    fn push_node(&mut self, node: Node) -> NodeId {
        debug_assert!(
            !matches!(node.data(), NodeData::Document | NodeData::Hole),
            "invalid push: {:?}", node.data()
        );
        let next: u32 = self.nodes.len().try_into()
            .expect("Document (u32) node index overflow");
        self.nodes.push(node);
        NodeId(unsafe { NonZeroU32::new_unchecked(next) })
    }

    // -- arena access -----------------------------------------------------

    #[inline]
    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.0.get() as usize]
    }

    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0.get() as usize]
    }

    // -- reference counting ------------------------------------------------

    /// Add one external reference to `id`.
    pub fn acquire(&mut self, id: NodeId) {
        self.get_mut(id).ref_count += 1;
    }

    /// Remove one external reference from `id`. At zero, the node is
    /// destroyed: its children are detached and released (recursively, via
    /// [`crate::tree::remove_all_children`] plus a recursive `release`),
    /// then its payload is dropped and its slot becomes a `Hole`.
    ///
    /// Panics (debug builds) if the node still has a parent when its count
    /// reaches zero — that would corrupt the tree, and indicates a caller
    /// released a reference it did not own (it should have `removeChild`ed
    /// first, or never released what it handed to the tree). See §5/§7.
    pub fn release(&mut self, id: NodeId) {
        let node = self.get_mut(id);
        debug_assert!(node.ref_count > 0, "release on zero ref_count node");
        node.ref_count = node.ref_count.saturating_sub(1);
        if node.ref_count == 0 {
            debug_assert!(
                !node.has_parent(),
                "destroying a node that is still attached to a parent"
            );
            self.destroy(id);
        }
    }

    fn destroy(&mut self, id: NodeId) {
        let children: Vec<NodeId> = self.children(id).collect();
        for child in children {
            self.unlink_only(child);
            self.release(child);
        }
        self.get_mut(id).take_data();
        log::trace!("destroyed node={:?}", id);
    }

    // -- tree mutation ------------------------------------------------------

    /// `insertBefore(new, ref)`, per §4.4. `ref = None` means "at end"
    /// (the `appendChild` case).
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        new: NodeId,
        reference: Option<NodeId>,
    ) -> Result<()> {
        crate::validation::ensure_pre_insert_validity(self, new, parent, reference)?;
        let parent_connected = self.get(parent).is_connected();

        if let NodeData::Fragment { .. } = self.get(new).data() {
            let children: Vec<NodeId> = self.children(new).collect();
            for child in children {
                self.unlink_only(child);
                self.splice_before(parent, child, reference);
                if parent_connected {
                    crate::tree::set_descendants_connected(self, child, true);
                }
            }
        } else {
            if self.get(new).has_parent() {
                self.unlink_only(new);
            }
            self.splice_before(parent, new, reference);
            if parent_connected {
                crate::tree::set_descendants_connected(self, new, true);
            }
        }

        self.get_mut(parent).bump_generation();
        log::trace!("insert_before parent={:?} new={:?} ref={:?}", parent, new, reference);
        Ok(())
    }

    /// `appendChild(new)`: insert at the end of `parent`'s children.
    pub fn append_child(&mut self, parent: NodeId, new: NodeId) -> Result<()> {
        self.insert_before(parent, new, None)
    }

    /// `removeChild(child)`, preceded by pre-remove validation and followed
    /// by connected/tag-index deregistration.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        crate::validation::ensure_pre_remove_validity(self, child, parent)?;
        self.notify_iterators_removing(child);
        if self.get(child).is_connected() {
            crate::tree::set_descendants_connected(self, child, false);
        }
        self.unlink_only(child);
        self.get_mut(parent).bump_generation();
        log::trace!("remove_child parent={:?} child={:?}", parent, child);
        Ok(())
    }

    /// `replaceChild(new, old)`: equivalent to `removeChild(old)` followed
    /// by `insertBefore(new, old.next_sibling)`, validated as one unit.
    pub fn replace_child(
        &mut self,
        parent: NodeId,
        new: NodeId,
        old: NodeId,
    ) -> Result<()> {
        crate::validation::ensure_pre_remove_validity(self, old, parent)?;
        let next = self.get(old).next_sibling();
        let reference = if next == Some(new) { self.get(new).next_sibling() } else { next };
        self.remove_child(parent, old)?;
        self.insert_before(parent, new, reference)
    }

    /// Splice `id` (already unlinked) into `parent`'s child list immediately
    /// before `reference`, or at the end if `reference` is `None`.
    fn splice_before(&mut self, parent: NodeId, id: NodeId, reference: Option<NodeId>) {
        self.get(parent).assert_suitable_parent();
        self.get_mut(id).parent = Some(parent);
        match reference {
            None => {
                if let Some(last) = self.get(parent).last_child {
                    self.get_mut(id).prev_sibling = Some(last);
                    self.get_mut(last).next_sibling = Some(id);
                } else {
                    self.get_mut(parent).first_child = Some(id);
                }
                self.get_mut(parent).last_child = Some(id);
            }
            Some(sibling) => {
                self.get_mut(id).next_sibling = Some(sibling);
                let prev = self.get(sibling).prev_sibling;
                if let Some(prev) = prev {
                    self.get_mut(id).prev_sibling = Some(prev);
                    self.get_mut(prev).next_sibling = Some(id);
                } else {
                    self.get_mut(parent).first_child = Some(id);
                }
                self.get_mut(sibling).prev_sibling = Some(id);
            }
        }
    }

    /// Unlink `id` from its current parent/siblings, without touching
    /// ref-counts. Safe to call on an already-detached node (no-op).
    pub(crate) fn unlink_only(&mut self, id: NodeId) {
        let (parent, prev, next) = {
            let node = self.get_mut(id);
            (node.parent.take(), node.prev_sibling.take(), node.next_sibling.take())
        };
        if let Some(next) = next {
            self.get_mut(next).prev_sibling = prev;
        } else if let Some(parent) = parent {
            self.get_mut(parent).last_child = prev;
        }
        if let Some(prev) = prev {
            self.get_mut(prev).next_sibling = next;
        } else if let Some(parent) = parent {
            self.get_mut(parent).first_child = next;
        }
    }

    // -- iterators over the tree -------------------------------------------

    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(
            self.get(id).first_child(),
            move |&id| self.get(id).next_sibling(),
        )
    }

    // -- cloning -------------------------------------------------------------

    /// `cloneNode(false)`: a fresh, detached, ref-count-1 node with equal
    /// data but zero children.
    pub fn clone_node_shallow(&mut self, id: NodeId) -> NodeId {
        let data = self.get(id).data().clone();
        self.push_node(Node::new(clear_owner(data)))
    }

    /// `cloneNode(true)`: recursively clones `id` and all descendants.
    pub fn clone_node_deep(&mut self, id: NodeId) -> NodeId {
        let new_id = self.clone_node_shallow(id);
        let children: Vec<NodeId> = self.children(id).collect();
        for child in children {
            let new_child = self.clone_node_deep(child);
            self.splice_before(new_id, new_child, None);
        }
        new_id
    }

    // -- tag index -----------------------------------------------------------

    pub(crate) fn register_tag(&mut self, local: LocalName, id: NodeId) {
        self.tag_index.entry(local).or_default().push(id);
    }

    pub(crate) fn deregister_tag(&mut self, local: &LocalName, id: NodeId) {
        if let Some(v) = self.tag_index.get_mut(local) {
            v.retain(|&x| x != id);
        }
    }

    pub fn tagged(&self, local: &str) -> &[NodeId] {
        self.tag_index.get(local).map(|v| v.as_slice()).unwrap_or(&[])
    }

    // -- document-level lookups -----------------------------------------------

    /// The document element: the sole `Element` child of the document node,
    /// if present and unambiguous.
    pub fn root_element(&self) -> Option<NodeId> {
        let mut root = None;
        for child in self.children(Document::DOCUMENT_NODE_ID) {
            match self.get(child).data() {
                NodeData::DocType(_) | NodeData::Comment(_) | NodeData::Pi(_) => {}
                NodeData::Elem(_) => {
                    if root.is_none() {
                        root = Some(child);
                    } else {
                        return None; // more than one: no unambiguous root
                    }
                }
                _ => return None,
            }
        }
        root
    }

    pub fn doc_type(&self) -> Option<NodeId> {
        self.children(Document::DOCUMENT_NODE_ID)
            .find(|&c| matches!(self.get(c).data(), NodeData::DocType(_)))
    }

    // -- iterator registry (NodeIterator reference reassignment) -------------

    pub(crate) fn notify_iterators_removing(&self, to_be_removed: NodeId) {
        let mut regs = self.node_iterators.borrow_mut();
        regs.retain(|w| w.strong_count() > 0);
        for w in regs.iter() {
            if let Some(state) = w.upgrade() {
                crate::node_iterator::adjust_for_removal(
                    &mut state.borrow_mut(), self, to_be_removed,
                );
            }
        }
    }

    // -- factories -------------------------------------------------------------

    pub fn create_element<L: Into<StrTendril>>(&mut self, local: L) -> NodeId {
        self.push_node(Node::new(NodeData::Elem(Element::new(local))))
    }

    pub fn create_element_ns(&mut self, name: QualifiedName) -> NodeId {
        self.push_node(Node::new(NodeData::Elem(Element::new_ns(name))))
    }

    pub fn create_text_node<S: Into<StrTendril>>(&mut self, data: S) -> NodeId {
        self.push_node(Node::new(NodeData::Text(data.into())))
    }

    pub fn create_comment<S: Into<StrTendril>>(&mut self, data: S) -> NodeId {
        self.push_node(Node::new(NodeData::Comment(data.into())))
    }

    pub fn create_cdata_section<S: Into<StrTendril>>(&mut self, data: S) -> NodeId {
        self.push_node(Node::new(NodeData::CData(data.into())))
    }

    pub fn create_processing_instruction<T, D>(&mut self, target: T, data: D) -> NodeId
        where T: Into<StrTendril>, D: Into<StrTendril>
    {
        self.push_node(Node::new(NodeData::Pi(ProcessingInstructionData {
            target: target.into(),
            data: data.into(),
        })))
    }

    pub fn create_document_fragment(&mut self) -> NodeId {
        self.push_node(Node::new(NodeData::Fragment { is_shadow: false }))
    }

    pub fn create_shadow_root(&mut self) -> NodeId {
        self.push_node(Node::new(NodeData::Fragment { is_shadow: true }))
    }

    pub fn create_attribute(&mut self, name: QualifiedName, value: &str) -> NodeId {
        self.push_node(Node::new(NodeData::Attr(
            AttrNode::new(Attribute::new(name, value))
        )))
    }

    pub fn create_document_type<S: Into<StrTendril>>(&mut self, name: S) -> NodeId {
        self.push_node(Node::new(NodeData::DocType(DocumentTypeData { name: name.into() })))
    }
}

impl Default for Document {
    fn default() -> Self {
        Document::new()
    }
}

impl std::ops::Index<NodeId> for Document {
    type Output = Node;

    #[inline]
    fn index(&self, id: NodeId) -> &Node {
        self.get(id)
    }
}

impl std::ops::IndexMut<NodeId> for Document {
    #[inline]
    fn index_mut(&mut self, id: NodeId) -> &mut Node {
        self.get_mut(id)
    }
}

fn clear_owner(mut data: NodeData) -> NodeData {
    if let NodeData::Attr(a) = &mut data {
        a.owner = None;
    }
    data
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::ensure_logger;

    #[test]
    fn empty_document() {
        ensure_logger();
        let doc = Document::new();
        assert_eq!(None, doc.root_element());
        assert_eq!(1, doc.len());
        assert!(doc.is_empty());
    }

    #[test]
    fn one_element_is_root() {
        ensure_logger();
        let mut doc = Document::new();
        let el = doc.create_element("html");
        doc.append_child(Document::DOCUMENT_NODE_ID, el).unwrap();
        assert_eq!(Some(el), doc.root_element());
    }

    #[test]
    fn s6_live_children_growth() {
        ensure_logger();
        let mut doc = Document::new();
        let parent = doc.create_element("div");
        doc.append_child(Document::DOCUMENT_NODE_ID, parent).unwrap();

        let e1 = doc.create_element("span");
        doc.append_child(parent, e1).unwrap();
        assert_eq!(1, doc.children(parent).count());

        let t = doc.create_text_node("hi");
        doc.append_child(parent, t).unwrap();
        assert_eq!(2, doc.children(parent).count());

        let e2 = doc.create_element("b");
        doc.append_child(parent, e2).unwrap();
        assert_eq!(3, doc.children(parent).count());

        doc.remove_child(parent, e1).unwrap();
        assert_eq!(2, doc.children(parent).count());
        let remaining: Vec<_> = doc.children(parent).collect();
        assert_eq!(vec![t, e2], remaining);
    }

    #[test]
    fn round_trip_append_then_remove_restores_list() {
        ensure_logger();
        let mut doc = Document::new();
        let parent = doc.create_element("div");
        doc.append_child(Document::DOCUMENT_NODE_ID, parent).unwrap();
        let a = doc.create_element("a");
        let b = doc.create_element("b");
        doc.append_child(parent, a).unwrap();
        doc.append_child(parent, b).unwrap();

        let before: Vec<_> = doc.children(parent).collect();
        doc.remove_child(parent, a).unwrap();
        assert_eq!(1, doc.get(a).ref_count());
        doc.insert_before(parent, a, Some(b)).unwrap();
        let after: Vec<_> = doc.children(parent).collect();
        assert_eq!(before, after);
    }

    /// Randomized append/remove sequence checking §8 invariants 1-3 hold
    /// after every single mutation, not just at fixed checkpoints. Grounded
    /// on the teacher's own use of `rand` for randomized stress testing
    /// (`ShortRead` in `src/dom/tests.rs`), applied here to tree mutation
    /// instead of buffered reads.
    #[test]
    fn randomized_mutations_preserve_tree_invariants() {
        ensure_logger();
        use rand::Rng;

        let mut doc = Document::new();
        let root = doc.create_element("div");
        doc.append_child(Document::DOCUMENT_NODE_ID, root).unwrap();

        let mut rng = rand::thread_rng();
        for i in 0..500 {
            let attached: Vec<NodeId> = doc.children(root).collect();
            if attached.is_empty() || rng.gen_bool(0.6) {
                let id = if rng.gen_bool(0.7) {
                    doc.create_element(format!("e{}", i))
                } else {
                    doc.create_text_node(format!("t{}", i))
                };
                doc.append_child(root, id).unwrap();
            } else {
                let victim = attached[rng.gen_range(0..attached.len())];
                doc.remove_child(root, victim).unwrap();
            }
            assert_tree_invariants(&doc, root);
        }
    }

    /// §8 invariants 1-3: sibling list / parent consistency, acyclicity,
    /// and connectedness, checked over every child of `node`.
    fn assert_tree_invariants(doc: &Document, node: NodeId) {
        let mut prev = None;
        let mut count = 0;
        for child in doc.children(node) {
            assert_eq!(prev, doc.get(child).prev_sibling(), "sibling link broken");
            assert_eq!(Some(node), doc.get(child).parent(), "parent link broken");
            assert!(
                !crate::tree::is_inclusive_descendant(doc, node, child),
                "cycle: child is an ancestor of its own parent"
            );
            prev = Some(child);
            count += 1;
        }
        if count == 0 {
            assert_eq!(None, doc.get(node).first_child());
            assert_eq!(None, doc.get(node).last_child());
        } else {
            assert_eq!(prev, doc.get(node).last_child());
        }
        assert_eq!(
            doc.get(node).is_connected(),
            crate::tree::is_inclusive_descendant(doc, node, Document::DOCUMENT_NODE_ID),
            "connected flag diverged from reachability to the document"
        );
    }

    #[test]
    fn clone_shallow_then_deep() {
        ensure_logger();
        let mut doc = Document::new();
        let parent = doc.create_element("div");
        doc.append_child(Document::DOCUMENT_NODE_ID, parent).unwrap();
        doc.get_mut(parent).data_mut().as_element_mut().unwrap()
            .set_attribute("id", "p");
        let child = doc.create_text_node("hi");
        doc.append_child(parent, child).unwrap();

        let shallow = doc.clone_node_shallow(parent);
        assert_eq!(0, doc.children(shallow).count());
        assert_eq!(
            "p",
            doc.get(shallow).data().as_element().unwrap()
                .get_attribute("id").unwrap().as_ref()
        );

        let deep = doc.clone_node_deep(parent);
        assert_eq!(1, doc.children(deep).count());
    }
}
