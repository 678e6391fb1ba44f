//! Document storage error types.

/// Kinds of storage errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum StorageErrorKind {
    /// No document stored under the id
    #[display("Document not found: {}", _0)]
    NotFound(String),
    /// Writer held a stale revision
    #[display("Revision conflict on {}: expected {}, found {}", id, expected, actual)]
    RevisionConflict {
        /// Document id
        id: String,
        /// Revision the writer read
        expected: u64,
        /// Revision currently stored
        actual: u64,
    },
}

/// Storage error with location tracking.
///
/// # Examples
///
/// ```
/// use dramaturg_error::{StorageError, StorageErrorKind};
///
/// let err = StorageError::new(StorageErrorKind::NotFound("abc".to_string()));
/// assert!(format!("{}", err).contains("not found"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Storage Error: {} at line {} in {}", kind, line, file)]
pub struct StorageError {
    /// The kind of error that occurred
    pub kind: StorageErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl StorageError {
    /// Create a new storage error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: StorageErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Whether the failure was a stale-revision write.
    pub fn is_conflict(&self) -> bool {
        matches!(self.kind, StorageErrorKind::RevisionConflict { .. })
    }
}
