//! Script-adaptation pipeline error types.

/// Specific error conditions for the adaptation pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum AdaptationErrorKind {
    /// Caller supplied arguments outside the accepted range
    #[display("Invalid request: {}", _0)]
    InvalidRequest(String),
    /// Model answered a stage with no text
    #[display("Model returned no usable text during {}", _0)]
    EmptyResponse(String),
    /// Neither scene parsing strategy found a scene
    #[display("No scenes could be parsed from the storyboard; please regenerate")]
    NoScenesParsed,
    /// Structured (JSON) response could not be repaired or salvaged
    #[display("Model response could not be parsed as structured data: {}", _0)]
    UnparseableStructure(String),
    /// Document could not be serialized for export
    #[display("Serialization error: {}", _0)]
    Serialization(String),
    /// Summary refresh gave up after repeated revision conflicts
    #[display("Gave up after {} conflicting concurrent updates", _0)]
    ConflictRetriesExhausted(u32),
}

/// Error type for adaptation pipeline operations.
///
/// # Examples
///
/// ```
/// use dramaturg_error::{AdaptationError, AdaptationErrorKind};
///
/// let err = AdaptationError::new(AdaptationErrorKind::NoScenesParsed);
/// assert!(format!("{}", err).contains("No scenes"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Adaptation Error: {} at line {} in {}", kind, line, file)]
pub struct AdaptationError {
    /// The specific error condition
    pub kind: AdaptationErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl AdaptationError {
    /// Create a new AdaptationError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: AdaptationErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
