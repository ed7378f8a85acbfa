//! Pre-insert and pre-remove hierarchy validation (§4.10).
//!
//! Entry points validate first, commit second: a rejected mutation leaves
//! the tree bit-identical to its pre-call state and bumps no generation —
//! see [`crate::document::Document::insert_before`] /
//! [`crate::document::Document::remove_child`], which call these before
//! touching any link.

use crate::document::Document;
use crate::error::{DomError, Result};
use crate::node::{NodeData, NodeId, NodeKind};
use crate::tree::is_inclusive_descendant;

/// `ensurePreInsertValidity(new, parent, ref)`, per §4.10 rules 1-6.
pub fn ensure_pre_insert_validity(
    doc: &Document,
    new: NodeId,
    parent: NodeId,
    reference: Option<NodeId>,
) -> Result<()> {
    // Rule 1: parent must be Document/DocumentFragment/Element.
    if !matches!(
        doc.get(parent).data(),
        NodeData::Document | NodeData::Fragment { .. } | NodeData::Elem(_)
    ) {
        return Err(DomError::HierarchyRequest(
            "parent must be a Document, DocumentFragment or Element"
        ));
    }

    // Rule 2: new must not be an inclusive ancestor of parent.
    if is_inclusive_descendant(doc, parent, new) {
        return Err(DomError::HierarchyRequest(
            "new node is an inclusive ancestor of parent"
        ));
    }

    // Rule 3: ref, if given, must be a child of parent.
    if let Some(r) = reference {
        if doc.get(r).parent() != Some(parent) {
            return Err(DomError::NotFound("reference node is not a child of parent"));
        }
    }

    // Rule 4: new must be an insertable kind.
    if !doc.get(new).data().is_insertable_kind() {
        return Err(DomError::HierarchyRequest(
            "node kind is not insertable as a child"
        ));
    }

    // Rule 5: Document-specific aggregate rules.
    if matches!(doc.get(parent).data(), NodeData::Document) {
        ensure_document_aggregate_validity(doc, new, parent, reference)?;
    }

    Ok(())
}

/// `ensurePreRemoveValidity(child, parent)`.
pub fn ensure_pre_remove_validity(
    doc: &Document,
    child: NodeId,
    parent: NodeId,
) -> Result<()> {
    if doc.get(child).parent() != Some(parent) {
        return Err(DomError::NotFound("child is not a child of parent"));
    }
    Ok(())
}

/// The child-kind sequence a Document's child list would have *after* `new`
/// is inserted before `reference` (or appended, if `None`) — expanding a
/// DocumentFragment `new` to its own children's kinds, per rule 5's
/// "a DocumentFragment inserted into a Document must itself satisfy
/// post-insert aggregate rules".
fn projected_document_child_kinds(
    doc: &Document,
    new: NodeId,
    parent: NodeId,
    reference: Option<NodeId>,
) -> Vec<NodeKind> {
    let inserted: Vec<NodeKind> = match doc.get(new).data() {
        NodeData::Fragment { .. } =>
            doc.children(new).map(|c| doc.get(c).node_type()).collect(),
        _ => vec![doc.get(new).node_type()],
    };

    let mut out = Vec::new();
    let mut placed = false;
    for existing in doc.children(parent) {
        if Some(existing) == reference {
            out.extend(inserted.iter().copied());
            placed = true;
        }
        out.push(doc.get(existing).node_type());
    }
    if !placed {
        out.extend(inserted);
    }
    out
}

fn ensure_document_aggregate_validity(
    doc: &Document,
    new: NodeId,
    parent: NodeId,
    reference: Option<NodeId>,
) -> Result<()> {
    let kinds = projected_document_child_kinds(doc, new, parent, reference);

    if kinds.iter().any(|k| *k == NodeKind::Text) {
        return Err(DomError::HierarchyRequest("Text cannot be a child of Document"));
    }
    if kinds.iter().filter(|k| **k == NodeKind::Element).count() > 1 {
        return Err(DomError::HierarchyRequest("Document can have at most one Element child"));
    }
    if kinds.iter().filter(|k| **k == NodeKind::DocumentType).count() > 1 {
        return Err(DomError::HierarchyRequest("Document can have at most one DocumentType child"));
    }

    let mut seen_element = false;
    for k in &kinds {
        match k {
            NodeKind::Element => seen_element = true,
            NodeKind::DocumentType if seen_element => {
                return Err(DomError::HierarchyRequest(
                    "DocumentType cannot follow the Element in a Document's child list"
                ));
            }
            _ => {}
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::ensure_logger;

    #[test]
    fn s1_inserting_ancestor_into_descendant_is_rejected() {
        ensure_logger();
        let mut doc = Document::new();
        let root = doc.create_element("div");
        doc.append_child(Document::DOCUMENT_NODE_ID, root).unwrap();
        let child = doc.create_element("span");
        doc.append_child(root, child).unwrap();

        let err = doc.append_child(child, root).unwrap_err();
        assert_eq!(err, DomError::HierarchyRequest(
            "new node is an inclusive ancestor of parent"
        ));
    }

    #[test]
    fn s2_text_child_of_document_is_rejected() {
        ensure_logger();
        let mut doc = Document::new();
        let text = doc.create_text_node("x");
        let err = doc.append_child(Document::DOCUMENT_NODE_ID, text).unwrap_err();
        assert_eq!(err, DomError::HierarchyRequest("Text cannot be a child of Document"));
    }

    #[test]
    fn second_document_element_is_rejected() {
        ensure_logger();
        let mut doc = Document::new();
        let html = doc.create_element("html");
        doc.append_child(Document::DOCUMENT_NODE_ID, html).unwrap();
        let html2 = doc.create_element("html");
        let err = doc.append_child(Document::DOCUMENT_NODE_ID, html2).unwrap_err();
        assert_eq!(err, DomError::HierarchyRequest(
            "Document can have at most one Element child"
        ));
    }

    #[test]
    fn doctype_after_element_is_rejected() {
        ensure_logger();
        let mut doc = Document::new();
        let html = doc.create_element("html");
        doc.append_child(Document::DOCUMENT_NODE_ID, html).unwrap();
        let dt = doc.create_document_type("html");
        let err = doc.append_child(Document::DOCUMENT_NODE_ID, dt).unwrap_err();
        assert_eq!(err, DomError::HierarchyRequest(
            "DocumentType cannot follow the Element in a Document's child list"
        ));
    }

    #[test]
    fn doctype_before_element_is_accepted() {
        ensure_logger();
        let mut doc = Document::new();
        let dt = doc.create_document_type("html");
        doc.append_child(Document::DOCUMENT_NODE_ID, dt).unwrap();
        let html = doc.create_element("html");
        doc.append_child(Document::DOCUMENT_NODE_ID, html).unwrap();
        assert_eq!(Some(html), doc.root_element());
    }

    #[test]
    fn remove_not_a_child_is_not_found() {
        ensure_logger();
        let mut doc = Document::new();
        let a = doc.create_element("a");
        let b = doc.create_element("b");
        doc.append_child(Document::DOCUMENT_NODE_ID, a).unwrap();
        let err = doc.remove_child(a, b).unwrap_err();
        assert_eq!(err, DomError::NotFound("child is not a child of parent"));
    }
}
