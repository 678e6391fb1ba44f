//! Error types for the Dramaturg workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - Constructors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use dramaturg_error::{AdaptationError, AdaptationErrorKind, DramaturgResult};
//!
//! fn parse() -> DramaturgResult<usize> {
//!     Err(AdaptationError::new(AdaptationErrorKind::NoScenesParsed))?
//! }
//!
//! let err = parse().unwrap_err();
//! assert!(err.user_message().contains("scene"));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod adaptation;
mod config;
mod error;
mod io;
mod json;
mod model;
mod storage;

pub use adaptation::{AdaptationError, AdaptationErrorKind};
pub use config::ConfigError;
pub use error::{DramaturgError, DramaturgErrorKind, DramaturgResult};
pub use io::IoError;
pub use json::JsonError;
pub use model::{ModelError, ModelErrorKind};
pub use storage::{StorageError, StorageErrorKind};
