//! The attribute value object and its node-facing wrapper.

use tendril::StrTendril;

use crate::node::NodeId;
use crate::qname::QualifiedName;

/// A name/value pair owned by an [`Element`](crate::element::Element).
///
/// This is the value-object half of the spec's Attribute/Attr split: plain
/// data, no tree plumbing. The node-facing wrapper that carries an owner
/// back-reference is [`NodeData::Attr`](crate::node::NodeData::Attr), via
/// [`AttrNode`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attribute {
    pub name: QualifiedName,
    pub value: StrTendril,
}

impl Attribute {
    pub fn new<V>(name: QualifiedName, value: V) -> Self
        where V: Into<StrTendril>
    {
        Attribute { name, value: value.into() }
    }
}

/// The node form of an [`Attribute`]: an `Attr` per spec §3/§4.5.
///
/// `owner` is a weak back-reference to the element whose attribute map
/// materialized this node (or was set via `setAttributeNode`); it never
/// contributes to the owner's `ref_count`. `specified` is always `true` —
/// this core has no DTD-sourced default-value attributes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttrNode {
    pub attribute: Attribute,
    pub owner: Option<NodeId>,
}

impl AttrNode {
    pub fn new(attribute: Attribute) -> Self {
        AttrNode { attribute, owner: None }
    }

    pub fn name(&self) -> &QualifiedName {
        &self.attribute.name
    }

    pub fn value(&self) -> &StrTendril {
        &self.attribute.value
    }

    pub fn set_value<V>(&mut self, value: V)
        where V: Into<StrTendril>
    {
        self.attribute.value = value.into();
    }

    /// Always `true`: this core never represents DTD-default attributes.
    pub fn specified(&self) -> bool {
        true
    }
}
