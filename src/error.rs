//! Error kinds surfaced by tree mutation and character-data operations.

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, DomError>;

/// Errors distinguished by kind, not by message, per the mutation
/// validation contract: callers match on variant, never on display text.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    /// A structural rule was violated: cyclic insertion, a node kind not
    /// allowed as a child of the target parent, or a Document child-list
    /// rule (at most one Element, at most one DocumentType, ...).
    #[error("hierarchy request error: {0}")]
    HierarchyRequest(&'static str),

    /// A reference node passed to `insertBefore`/`replaceChild` is not a
    /// child of the stated parent, or a child passed to `removeChild` is
    /// not a child of the stated parent.
    #[error("not found: {0}")]
    NotFound(&'static str),

    /// A character-data offset is past the end of the buffer.
    #[error("index out of bounds: offset {offset} > length {length}")]
    IndexOutOfBounds { offset: usize, length: usize },

    /// Reserved for qualified-name validation by callers (parsers); the
    /// core does not itself validate name syntax.
    #[error("invalid character in name: {0}")]
    InvalidCharacter(&'static str),
}
