//! Namespace-aware qualified names.

use std::fmt;

#[doc(no_inline)]
pub use markup5ever::{LocalName, Namespace, Prefix};

/// A `(namespace, prefix, local name)` triple identifying an element tag or
/// attribute name.
///
/// `LocalName`, `Namespace` and `Prefix` are interned atoms (`markup5ever`,
/// the shared foundation crate beneath `html5ever`), so comparing two
/// `QualifiedName`s field-by-field is already the "pointer equality" fast
/// path: interned atoms compare by a cheap inline/pointer check before ever
/// touching the underlying bytes. [`QualifiedName::matches`] gives the
/// second, coarser equality the spec asks for: same `(local, namespace)`,
/// ignoring `prefix`.
///
/// `namespace: None` (no namespace) and `namespace: Some(ns!())` (the empty
/// string namespace) are distinct values, deliberately: callers that mean
/// "no namespace" must say so explicitly rather than relying on the empty
/// atom.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct QualifiedName {
    pub namespace: Option<Namespace>,
    pub prefix: Option<Prefix>,
    pub local: LocalName,
}

impl QualifiedName {
    /// Construct a qualified name with no namespace or prefix.
    pub fn new_local<L>(local: L) -> Self
        where L: Into<LocalName>
    {
        QualifiedName { namespace: None, prefix: None, local: local.into() }
    }

    /// Construct a fully-qualified name.
    pub fn new<N, P, L>(namespace: Option<N>, prefix: Option<P>, local: L) -> Self
        where N: Into<Namespace>, P: Into<Prefix>, L: Into<LocalName>
    {
        QualifiedName {
            namespace: namespace.map(Into::into),
            prefix: prefix.map(Into::into),
            local: local.into(),
        }
    }

    /// Value equality by `(local, namespace)`, ignoring `prefix`.
    pub fn matches(&self, other: &QualifiedName) -> bool {
        self.local == other.local && self.namespace == other.namespace
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(prefix) = &self.prefix {
            write!(f, "{}:{}", prefix, self.local)
        } else {
            write!(f, "{}", self.local)
        }
    }
}
