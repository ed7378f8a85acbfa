//! An indexed/named view over an Element's attributes (§4.5).

use crate::document::Document;
use crate::error::{DomError, Result};
use crate::node::{NodeData, NodeId};
use crate::qname::QualifiedName;

/// A view bound to one Element. Holds no state of its own beyond the
/// owner's `NodeId` — every query re-reads the element's current attribute
/// list, matching the live-collections philosophy of §4.6/Design Notes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct NamedNodeMap {
    owner: NodeId,
}

impl NamedNodeMap {
    pub(crate) fn new(owner: NodeId) -> Self {
        NamedNodeMap { owner }
    }

    pub fn owner(&self) -> NodeId {
        self.owner
    }

    pub fn length(&self, doc: &Document) -> usize {
        self.element(doc).attrs.len()
    }

    fn element<'d>(&self, doc: &'d Document) -> &'d crate::element::Element {
        doc.get(self.owner).data().as_element()
            .expect("NamedNodeMap owner is not an Element")
    }

    /// `item(i)`: materializes a fresh, detached `Attr` node (ref-count 1,
    /// owner set) around the `i`th attribute, or `None` if out of range.
    pub fn item(&self, doc: &mut Document, index: usize) -> Option<NodeId> {
        let attribute = self.element(doc).attrs.get(index)?.clone();
        Some(self.materialize(doc, attribute))
    }

    pub fn get_named_item(&self, doc: &mut Document, name: &str) -> Option<NodeId> {
        let attribute = self.element(doc).attrs.iter()
            .find(|a| a.name.to_string() == name)?
            .clone();
        Some(self.materialize(doc, attribute))
    }

    pub fn get_named_item_ns(
        &self, doc: &mut Document, ns: Option<&str>, local: &str,
    ) -> Option<NodeId> {
        let attribute = self.element(doc).attrs.iter()
            .find(|a| a.name.local.as_ref() == local && a.name.namespace.as_deref() == ns)?
            .clone();
        Some(self.materialize(doc, attribute))
    }

    fn materialize(&self, doc: &mut Document, attribute: crate::attr::Attribute) -> NodeId {
        let id = doc.create_attribute(attribute.name, &attribute.value);
        doc.get_mut(id).data_mut().as_attr_mut().unwrap().owner = Some(self.owner);
        id
    }

    /// `setNamedItem(attr)`: replaces any existing attribute sharing
    /// `attr`'s (local, namespace), returning the prior value as a freshly
    /// detached, owner-cleared `Attr` node; inserts otherwise.
    pub fn set_named_item(&self, doc: &mut Document, attr: NodeId) -> Result<Option<NodeId>> {
        let incoming = doc.get(attr).data().as_attr()
            .ok_or(DomError::HierarchyRequest("setNamedItem requires an Attr node"))?
            .attribute.clone();
        let prior = self.replace_attribute(doc, incoming);
        doc.get_mut(attr).data_mut().as_attr_mut().unwrap().owner = Some(self.owner);
        Ok(prior)
    }

    pub fn set_named_item_ns(&self, doc: &mut Document, attr: NodeId) -> Result<Option<NodeId>> {
        self.set_named_item(doc, attr)
    }

    fn replace_attribute(
        &self, doc: &mut Document, incoming: crate::attr::Attribute,
    ) -> Option<NodeId> {
        let el = doc.get_mut(self.owner).data_mut().as_element_mut()
            .expect("NamedNodeMap owner is not an Element");
        let existing = el.attrs.iter()
            .position(|a| a.name.matches(&incoming.name));
        let prior = existing.map(|i| el.attrs.remove(i));
        if let Some(i) = existing {
            el.attrs.insert(i, incoming);
        } else {
            el.attrs.push(incoming);
        }
        doc.get_mut(self.owner).bump_generation();
        prior.map(|a| {
            let id = doc.create_attribute(a.name, &a.value);
            id
        })
    }

    /// `removeNamedItem(name)`: returns the removed, owner-cleared `Attr`
    /// node, or `NotFoundError` if no attribute has that name.
    pub fn remove_named_item(&self, doc: &mut Document, name: &str) -> Result<NodeId> {
        self.remove_matching(doc, |a| a.name.to_string() == name)
    }

    pub fn remove_named_item_ns(
        &self, doc: &mut Document, ns: Option<&str>, local: &str,
    ) -> Result<NodeId> {
        self.remove_matching(doc, |a| {
            a.name.local.as_ref() == local && a.name.namespace.as_deref() == ns
        })
    }

    fn remove_matching(
        &self, doc: &mut Document, pred: impl Fn(&crate::attr::Attribute) -> bool,
    ) -> Result<NodeId> {
        let removed = {
            let el = doc.get_mut(self.owner).data_mut().as_element_mut()
                .expect("NamedNodeMap owner is not an Element");
            let i = el.attrs.iter().position(pred)
                .ok_or(DomError::NotFound("no attribute with that name"))?;
            el.attrs.remove(i)
        };
        doc.get_mut(self.owner).bump_generation();
        Ok(doc.create_attribute(removed.name, &removed.value))
    }
}

impl Document {
    pub fn attributes_of(&self, element: NodeId) -> NamedNodeMap {
        debug_assert!(matches!(self.get(element).data(), NodeData::Elem(_)));
        NamedNodeMap::new(element)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::ensure_logger;

    #[test]
    fn s3_set_named_item_returns_prior_with_cleared_owner() {
        ensure_logger();
        let mut doc = Document::new();
        let el = doc.create_element("div");
        doc.get_mut(el).data_mut().as_element_mut().unwrap()
            .set_attribute("id", "old");
        let map = doc.attributes_of(el);

        let new_attr = doc.create_attribute(QualifiedName::new_local("id"), "new");
        let prior = map.set_named_item(&mut doc, new_attr).unwrap().unwrap();

        assert_eq!("old", doc.get(prior).data().as_attr().unwrap().value().as_ref());
        assert_eq!(None, doc.get(prior).data().as_attr().unwrap().owner);
        assert_eq!(
            "new",
            doc.get_mut(el).data_mut().as_element_mut().unwrap().get_attribute("id").unwrap().as_ref()
        );
    }

    #[test]
    fn item_and_length_reflect_order() {
        ensure_logger();
        let mut doc = Document::new();
        let el = doc.create_element("div");
        {
            let e = doc.get_mut(el).data_mut().as_element_mut().unwrap();
            e.set_attribute("id", "x");
            e.set_attribute("class", "y");
        }
        let map = doc.attributes_of(el);
        assert_eq!(2, map.length(&doc));
        let first = map.item(&mut doc, 0).unwrap();
        assert_eq!("id", doc.get(first).data().as_attr().unwrap().name().local.as_ref());
    }

    #[test]
    fn remove_missing_is_not_found() {
        ensure_logger();
        let mut doc = Document::new();
        let el = doc.create_element("div");
        let map = doc.attributes_of(el);
        let err = map.remove_named_item(&mut doc, "id").unwrap_err();
        assert_eq!(err, DomError::NotFound("no attribute with that name"));
    }
}
