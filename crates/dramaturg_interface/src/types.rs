//! Supporting types for the store seam.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of a stored script document.
///
/// # Examples
///
/// ```
/// use dramaturg_interface::DocumentId;
///
/// let a = DocumentId::new();
/// let b = DocumentId::new();
/// assert_ne!(a, b);
/// assert_eq!(a.to_string().len(), 36);
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
)]
#[serde(transparent)]
pub struct DocumentId(Uuid);

impl DocumentId {
    /// Fresh random id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an id from its hyphenated form.
    pub fn parse(s: &str) -> Option<Self> {
        Uuid::parse_str(s).ok().map(Self)
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

/// A value paired with the revision it was read at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
pub struct Versioned<T> {
    /// Stored value
    value: T,
    /// Revision counter, starting at 1
    revision: u64,
}

impl<T> Versioned<T> {
    /// Pair a value with a revision.
    pub fn new(value: T, revision: u64) -> Self {
        Self { value, revision }
    }

    /// Split into value and revision.
    pub fn into_parts(self) -> (T, u64) {
        (self.value, self.revision)
    }
}
