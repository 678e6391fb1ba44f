//! Top-level error wrapper types.

use crate::{AdaptationError, ConfigError, IoError, JsonError, ModelError, StorageError};

/// Every error condition the workspace can surface.
///
/// # Examples
///
/// ```
/// use dramaturg_error::{DramaturgError, IoError};
///
/// let io_err = IoError::new("Failed to read novel.txt");
/// let err: DramaturgError = io_err.into();
/// assert!(format!("{}", err).contains("I/O Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum DramaturgErrorKind {
    /// JSON serialization/deserialization error
    #[from(JsonError)]
    Json(JsonError),
    /// File or stream I/O error
    #[from(IoError)]
    Io(IoError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Model invocation error
    #[from(ModelError)]
    Model(ModelError),
    /// Adaptation pipeline error
    #[from(AdaptationError)]
    Adaptation(AdaptationError),
    /// Document storage error
    #[from(StorageError)]
    Storage(StorageError),
}

/// Dramaturg error with kind discrimination.
///
/// # Examples
///
/// ```
/// use dramaturg_error::{ConfigError, DramaturgResult};
///
/// fn might_fail() -> DramaturgResult<()> {
///     Err(ConfigError::new("Missing field"))?
/// }
///
/// assert!(might_fail().is_err());
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Dramaturg Error: {}", _0)]
pub struct DramaturgError(Box<DramaturgErrorKind>);

impl DramaturgError {
    /// Create a new error from a kind.
    pub fn new(kind: DramaturgErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &DramaturgErrorKind {
        &self.0
    }

    /// Short cause string for end users, without source locations.
    pub fn user_message(&self) -> String {
        match self.kind() {
            DramaturgErrorKind::Json(e) => e.message.clone(),
            DramaturgErrorKind::Io(e) => e.message.clone(),
            DramaturgErrorKind::Config(e) => e.message.clone(),
            DramaturgErrorKind::Model(e) => e.kind.to_string(),
            DramaturgErrorKind::Adaptation(e) => e.kind.to_string(),
            DramaturgErrorKind::Storage(e) => e.kind.to_string(),
        }
    }
}

// Generic From implementation for any type that converts to DramaturgErrorKind
impl<T> From<T> for DramaturgError
where
    T: Into<DramaturgErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Dramaturg operations.
pub type DramaturgResult<T> = std::result::Result<T, DramaturgError>;
