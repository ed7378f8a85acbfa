//! Tree helpers: descendant predicates, text aggregation, connected
//! propagation, bulk detachment (§4.11).

use markup5ever::LocalName;

use crate::document::Document;
use crate::node::{NodeData, NodeId, NodeKind};

/// `isInclusiveDescendant(node, ancestor)`: true iff walking parent links
/// from `node` reaches `ancestor`.
pub fn is_inclusive_descendant(doc: &Document, node: NodeId, ancestor: NodeId) -> bool {
    let mut cur = Some(node);
    while let Some(id) = cur {
        if id == ancestor {
            return true;
        }
        cur = doc.get(id).parent();
    }
    false
}

/// Ancestors of `node`, nearest first, not including `node` itself.
pub fn ancestors(doc: &Document, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
    std::iter::successors(doc.get(node).parent(), move |&id| doc.get(id).parent())
}

/// `getDescendantTextContent(node)`: concatenation of all Text descendants
/// in document order.
pub fn get_descendant_text_content(doc: &Document, node: NodeId) -> String {
    let mut out = String::new();
    collect_text(doc, node, &mut out);
    out
}

fn collect_text(doc: &Document, node: NodeId, out: &mut String) {
    for child in doc.children(node) {
        match doc.get(child).data() {
            NodeData::Text(t) => out.push_str(t),
            _ => collect_text(doc, child, out),
        }
    }
}

/// `setDescendantsConnected(node, bool)`: sets `node` and every descendant's
/// connected flag, registering (or deregistering) Element descendants in
/// the root Document's tag index as it goes.
///
/// Called with the subtree root already spliced into (or about to be
/// unlinked from) a parent; `node` itself is included, matching the
/// "mark new's subtree connected" wording of §4.4 step 5.
pub fn set_descendants_connected(doc: &mut Document, node: NodeId, connected: bool) {
    doc.get_mut(node).connected = connected;
    if let NodeData::Elem(e) = doc.get(node).data() {
        let local = e.name.local.clone();
        if connected {
            doc.register_tag(local, node);
        } else {
            doc.deregister_tag(&local, node);
        }
    }
    let children: Vec<NodeId> = doc.children(node).collect();
    for child in children {
        set_descendants_connected(doc, child, connected);
    }
}

/// `removeAllChildren(node)`: detaches each child in place (clears parent
/// and sibling links) without releasing references — the caller decides
/// whether/when to release.
pub fn remove_all_children(doc: &mut Document, node: NodeId) {
    let children: Vec<NodeId> = doc.children(node).collect();
    for child in children {
        if doc.get(child).is_connected() {
            set_descendants_connected(doc, child, false);
        }
        doc.unlink_only(child);
    }
    doc.get_mut(node).bump_generation();
}

pub fn has_element_child(doc: &Document, node: NodeId) -> bool {
    doc.children(node).any(|c| doc.get(c).node_type() == NodeKind::Element)
}

pub fn count_element_children(doc: &Document, node: NodeId) -> usize {
    doc.children(node).filter(|&c| doc.get(c).node_type() == NodeKind::Element).count()
}

/// Depth-first pre-order descendants of `node` (node itself excluded),
/// collected eagerly — the traversal order `ElementIterator`, `NodeIterator`
/// and `TreeWalker` all build on.
pub fn descendants_preorder(doc: &Document, node: NodeId) -> Vec<NodeId> {
    let mut out = Vec::new();
    push_descendants(doc, node, &mut out);
    out
}

fn push_descendants(doc: &Document, node: NodeId, out: &mut Vec<NodeId>) {
    for child in doc.children(node) {
        out.push(child);
        push_descendants(doc, child, out);
    }
}

/// The next node after `node` in document order within `root`'s subtree,
/// i.e. first child if any, else next sibling, else the next sibling of
/// the nearest ancestor (stopping at `root`). `None` at the end of the
/// subtree.
pub fn next_in_document_order(doc: &Document, node: NodeId, root: NodeId) -> Option<NodeId> {
    if let Some(first) = doc.get(node).first_child() {
        return Some(first);
    }
    let mut cur = node;
    loop {
        if cur == root {
            return None;
        }
        if let Some(next) = doc.get(cur).next_sibling() {
            return Some(next);
        }
        cur = doc.get(cur).parent()?;
    }
}

/// The previous node before `node` in document order within `root`'s
/// subtree: previous sibling's deepest last descendant, else the parent
/// (stopping short of `root`'s own parent).
pub fn previous_in_document_order(doc: &Document, node: NodeId, root: NodeId) -> Option<NodeId> {
    if node == root {
        return None;
    }
    if let Some(prev) = doc.get(node).prev_sibling() {
        return Some(deepest_last_descendant(doc, prev));
    }
    doc.get(node).parent()
}

/// `node` itself if it has no children, else its last child's deepest last
/// descendant.
pub fn deepest_last_descendant(doc: &Document, node: NodeId) -> NodeId {
    let mut cur = node;
    while let Some(last) = doc.get(cur).last_child() {
        cur = last;
    }
    cur
}

/// The first node strictly following `to_be_removed` (and all of its
/// descendants) in document order within `root`'s subtree — used by
/// [`crate::node_iterator`]'s removal-reassignment algorithm (§4.8,
/// Open Question (c)).
pub fn first_following_not_descendant(
    doc: &Document,
    to_be_removed: NodeId,
    root: NodeId,
) -> Option<NodeId> {
    let mut cur = to_be_removed;
    loop {
        if let Some(next) = doc.get(cur).next_sibling() {
            return Some(next);
        }
        if cur == root {
            return None;
        }
        cur = doc.get(cur).parent()?;
    }
}

#[allow(dead_code)]
pub(crate) fn tag_of(local: &str) -> LocalName {
    LocalName::from(local)
}
