//! DOM capability traits.
//!
//! The selector engine never touches a concrete DOM. Anything that can answer
//! these questions (a live page bridge, the in-memory `formfill-dom` document,
//! or a test double) can be picked from.

use std::hash::Hash;

/// Document-level selector query.
pub trait DocumentQuery {
    /// Number of elements matching `selector`.
    ///
    /// Returns `None` when the selector cannot be evaluated (malformed syntax,
    /// unsupported construct). Callers treat that as "uniqueness unknown".
    fn count_matching(&self, selector: &str) -> Option<usize>;
}

/// Read-only view of one element.
///
/// Handles are cheap to clone. Equality and hashing follow node identity, not
/// structural equality, so two handles to the same node compare equal.
pub trait DomElement: Clone + Eq + Hash {
    type Document: DocumentQuery;

    /// Tag name as reported by the host. Callers lowercase it.
    fn tag_name(&self) -> String;

    /// Attribute lookup. Names are matched case-insensitively.
    fn attribute(&self, name: &str) -> Option<String>;

    /// Concatenated descendant text, untrimmed.
    fn text_content(&self) -> Option<String>;

    fn parent(&self) -> Option<Self>;

    /// Element children in document order.
    fn children(&self) -> Vec<Self>;

    /// The document this element is connected to, if any.
    fn owner_document(&self) -> Option<&Self::Document>;

    /// Lowercase tag name.
    fn tag(&self) -> String {
        self.tag_name().to_lowercase()
    }

    /// Attribute value when present and non-empty.
    fn non_empty_attribute(&self, name: &str) -> Option<String> {
        self.attribute(name).filter(|v| !v.is_empty())
    }
}
