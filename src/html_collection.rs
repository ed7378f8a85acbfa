//! Live ordered element views: children / subtree-tagged / document-tagged
//! (§4.6).

use crate::document::Document;
use crate::node::{NodeData, NodeId, NodeKind};
use crate::tree::descendants_preorder;

enum Kind {
    Children(NodeId),
    Tagged { root: NodeId, tag: String },
    ClassName { root: NodeId, token: String },
    DocumentTagged { tag: String },
}

/// A live `HTMLCollection`: every call re-reads current tree state (no
/// cached snapshot; Design Notes permits an optional generation-keyed
/// cache, not implemented here — see §4.6).
pub struct HTMLCollection {
    kind: Kind,
}

impl HTMLCollection {
    pub fn length(&self, doc: &Document) -> usize {
        self.materialize(doc).len()
    }

    pub fn item(&self, doc: &Document, index: usize) -> Option<NodeId> {
        self.materialize(doc).get(index).copied()
    }

    /// `namedItem(key)`: first element (document order) whose `id` equals
    /// `key`, else the first whose `name` attribute equals `key`.
    pub fn named_item(&self, doc: &Document, key: &str) -> Option<NodeId> {
        let items = self.materialize(doc);
        items.iter().copied()
            .find(|&id| element_attr(doc, id, "id") == Some(key))
            .or_else(|| items.iter().copied()
                .find(|&id| element_attr(doc, id, "name") == Some(key)))
    }

    fn materialize(&self, doc: &Document) -> Vec<NodeId> {
        match &self.kind {
            Kind::Children(parent) =>
                doc.children(*parent)
                    .filter(|&c| doc.get(c).node_type() == NodeKind::Element)
                    .collect(),
            Kind::Tagged { root, tag } =>
                descendants_preorder(doc, *root).into_iter()
                    .filter(|&n| matches_tag(doc, n, tag))
                    .collect(),
            Kind::ClassName { root, token } =>
                descendants_preorder(doc, *root).into_iter()
                    .filter(|&n| has_class(doc, n, token))
                    .collect(),
            Kind::DocumentTagged { tag } => {
                if tag == "*" {
                    descendants_preorder(doc, Document::DOCUMENT_NODE_ID).into_iter()
                        .filter(|&n| doc.get(n).node_type() == NodeKind::Element)
                        .collect()
                } else {
                    doc.tagged(tag).to_vec()
                }
            }
        }
    }
}

fn matches_tag(doc: &Document, node: NodeId, tag: &str) -> bool {
    if doc.get(node).node_type() != NodeKind::Element {
        return false;
    }
    tag == "*" || doc.get(node).data().as_element().unwrap().tag_name() == tag
}

fn has_class(doc: &Document, node: NodeId, token: &str) -> bool {
    match doc.get(node).data().as_element() {
        Some(el) => el.get_attribute("class")
            .map(|v| v.split_ascii_whitespace().any(|c| c == token))
            .unwrap_or(false),
        None => false,
    }
}

fn element_attr<'d>(doc: &'d Document, node: NodeId, name: &str) -> Option<&'d str> {
    match doc.get(node).data() {
        NodeData::Elem(e) => e.get_attribute(name).map(|v| v.as_ref()),
        _ => None,
    }
}

impl Document {
    /// `initChildren(parent)`: live element-only view of `parent`'s direct
    /// children.
    pub fn init_children(&self, parent: NodeId) -> HTMLCollection {
        HTMLCollection { kind: Kind::Children(parent) }
    }

    /// `getElementsByTagName(root, tag)`: document-index-backed when `root`
    /// is the document node, else a depth-first subtree scan.
    pub fn get_elements_by_tag_name(&self, root: NodeId, tag: &str) -> HTMLCollection {
        if root == Document::DOCUMENT_NODE_ID {
            HTMLCollection { kind: Kind::DocumentTagged { tag: tag.to_string() } }
        } else {
            HTMLCollection { kind: Kind::Tagged { root, tag: tag.to_string() } }
        }
    }

    pub fn get_elements_by_class_name(&self, root: NodeId, token: &str) -> HTMLCollection {
        HTMLCollection { kind: Kind::ClassName { root, token: token.to_string() } }
    }
}
