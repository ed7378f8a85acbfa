//! Elements: a tag name, an ordered attribute list, and DOM-tree membership.

use tendril::StrTendril;

use crate::attr::Attribute;
use crate::qname::QualifiedName;

/// Full (possibly prefixed) attribute-name comparison, per Design Notes (b):
/// case-sensitive by default; with the `html` feature enabled, elements
/// flagged `is_html` compare ASCII-case-insensitively instead. Tag-name/tag
/// index comparison is untouched by this — it stays case-sensitive
/// unconditionally (see `src/document.rs`'s tag index), since Design
/// Notes (b) calls that out as a separate, still-undecided policy axis.
#[cfg(feature = "html")]
#[inline]
fn name_eq(is_html: bool, a: &str, b: &str) -> bool {
    if is_html {
        a.eq_ignore_ascii_case(b)
    } else {
        a == b
    }
}

#[cfg(not(feature = "html"))]
#[inline]
fn name_eq(_is_html: bool, a: &str, b: &str) -> bool {
    a == b
}

/// A markup element: tag name plus an ordered, insertion-order-preserving
/// list of attributes.
///
/// Tag names and (non-namespaced) attribute names are compared
/// case-sensitively at this layer; an HTML-aware ASCII-case-insensitive
/// policy, if wanted, is a pluggable concern for a caller layered on top
/// (Design Notes (b)), gated here only by the presence of the `is_html`
/// hint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Element {
    pub name: QualifiedName,
    pub attrs: Vec<Attribute>,
    pub is_html: bool,
}

impl Element {
    /// Construct a new element with no namespace and no attributes.
    pub fn new<L>(local: L) -> Self
        where L: Into<tendril::StrTendril>
    {
        let local = local.into();
        Element {
            name: QualifiedName::new_local(markup5ever::LocalName::from(&*local)),
            attrs: Vec::new(),
            is_html: false,
        }
    }

    /// Construct a new element with an explicit namespace-qualified name.
    pub fn new_ns(name: QualifiedName) -> Self {
        Element { name, attrs: Vec::new(), is_html: false }
    }

    /// The tag name as it should be rendered back: `prefix:local` when a
    /// prefix is present, else `local`.
    pub fn tag_name(&self) -> String {
        self.name.to_string()
    }

    fn qualified_string_eq(&self, attr: &Attribute, name: &str) -> bool {
        name_eq(self.is_html, &attr.name.to_string(), name)
    }

    /// Look up an attribute by its full (possibly prefixed) name, ignoring
    /// namespace.
    pub fn get_attribute(&self, name: &str) -> Option<&StrTendril> {
        self.attrs.iter()
            .find(|a| self.qualified_string_eq(a, name))
            .map(|a| &a.value)
    }

    /// Look up an attribute by `(namespace, local)`, ignoring prefix.
    pub fn get_attribute_ns(&self, ns: Option<&str>, local: &str)
        -> Option<&StrTendril>
    {
        self.attrs.iter()
            .find(|a| {
                a.name.local.as_ref() == local
                    && a.name.namespace.as_deref() == ns
            })
            .map(|a| &a.value)
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.get_attribute(name).is_some()
    }

    pub fn has_attribute_ns(&self, ns: Option<&str>, local: &str) -> bool {
        self.get_attribute_ns(ns, local).is_some()
    }

    /// Set an attribute's value by full (possibly prefixed) name.
    ///
    /// Updates the value in place, preserving insertion order, if the name
    /// is already present; otherwise appends a new attribute at the end.
    pub fn set_attribute<V>(&mut self, name: &str, value: V)
        where V: Into<StrTendril>
    {
        let is_html = self.is_html;
        if let Some(a) = self.attrs.iter_mut()
            .find(|a| name_eq(is_html, &a.name.to_string(), name))
        {
            a.value = value.into();
        } else {
            self.attrs.push(Attribute::new(
                QualifiedName::new_local(markup5ever::LocalName::from(name)),
                value,
            ));
        }
    }

    /// Set an attribute's value by qualified name, matching on
    /// `(namespace, local)` for the in-place-update check, per
    /// [`QualifiedName::matches`].
    pub fn set_attribute_ns<V>(&mut self, name: QualifiedName, value: V)
        where V: Into<StrTendril>
    {
        if let Some(a) = self.attrs.iter_mut().find(|a| a.name.matches(&name)) {
            a.value = value.into();
        } else {
            self.attrs.push(Attribute::new(name, value));
        }
    }

    /// Remove an attribute by full (possibly prefixed) name, returning its
    /// prior value.
    pub fn remove_attribute(&mut self, name: &str) -> Option<StrTendril> {
        let is_html = self.is_html;
        let i = self.attrs.iter()
            .position(|a| name_eq(is_html, &a.name.to_string(), name))?;
        Some(self.attrs.remove(i).value)
    }

    pub fn remove_attribute_ns(&mut self, ns: Option<&str>, local: &str)
        -> Option<StrTendril>
    {
        let i = self.attrs.iter().position(|a| {
            a.name.local.as_ref() == local && a.name.namespace.as_deref() == ns
        })?;
        Some(self.attrs.remove(i).value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::ensure_logger;

    #[test]
    fn s3_replace_attribute_value_in_place() {
        ensure_logger();
        let mut el = Element::new("div");
        el.set_attribute("id", "old");
        assert_eq!("old", el.get_attribute("id").unwrap().as_ref());

        el.set_attribute("class", "x");
        el.set_attribute("id", "new");
        assert_eq!("new", el.get_attribute("id").unwrap().as_ref());

        // insertion order preserved: id was first, class second
        assert_eq!("id", el.attrs[0].name.local.as_ref());
        assert_eq!("class", el.attrs[1].name.local.as_ref());
    }

    #[test]
    fn has_attribute_matches_get_attribute() {
        let mut el = Element::new("div");
        assert!(!el.has_attribute("id"));
        el.set_attribute("id", "x");
        assert!(el.has_attribute("id"));
        el.remove_attribute("id");
        assert!(!el.has_attribute("id"));
    }

    #[cfg(feature = "html")]
    #[test]
    fn html_hint_enables_case_insensitive_attribute_lookup() {
        ensure_logger();
        let mut el = Element::new("div");
        el.is_html = true;
        el.set_attribute("ID", "x");
        assert_eq!("x", el.get_attribute("id").unwrap().as_ref());
        el.set_attribute("id", "y"); // updates in place, not a second attr
        assert_eq!(1, el.attrs.len());
        assert_eq!("y", el.get_attribute("ID").unwrap().as_ref());
    }

    #[test]
    fn without_html_hint_attribute_lookup_stays_case_sensitive() {
        ensure_logger();
        let mut el = Element::new("div");
        el.set_attribute("ID", "x");
        assert_eq!(None, el.get_attribute("id"));
    }
}
