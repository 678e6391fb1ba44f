//! Model invocation errors.

/// Failure conditions reported by a model driver.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ModelErrorKind {
    /// Request could not be sent or the connection dropped
    #[display("Request failed: {}", _0)]
    Http(String),
    /// Provider answered with a non-success status
    #[display("API error {}: {}", status, message)]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body returned by the provider
        message: String,
    },
    /// Provider rejected the call for exceeding its quota
    #[display("Rate limit exceeded")]
    RateLimit,
    /// No API key was configured or supplied with the request
    #[display("Missing credential: {}", _0)]
    MissingCredential(String),
    /// Response body did not match the expected shape
    #[display("Failed to parse response: {}", _0)]
    ResponseParsing(String),
    /// Provider returned no usable text
    #[display("Model returned an empty completion")]
    EmptyCompletion,
}

/// Model driver error with location tracking.
///
/// # Examples
///
/// ```
/// use dramaturg_error::{ModelError, ModelErrorKind};
///
/// let err = ModelError::new(ModelErrorKind::RateLimit);
/// assert!(format!("{}", err).contains("Rate limit"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Model Error: {} at {}:{}", kind, file, line)]
pub struct ModelError {
    /// The specific error kind
    pub kind: ModelErrorKind,
    /// Line number where error occurred
    pub line: u32,
    /// Source file where error occurred
    pub file: &'static str,
}

impl ModelError {
    /// Create a new model error.
    #[track_caller]
    pub fn new(kind: ModelErrorKind) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
