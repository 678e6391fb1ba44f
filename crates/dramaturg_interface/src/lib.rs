//! Trait definitions for the Dramaturg script-adaptation pipeline.
//!
//! This crate provides the seams the pipeline depends on: the model driver
//! and the versioned document store.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod traits;
mod types;

pub use traits::{DocumentStore, DramaturgDriver};
pub use types::{DocumentId, Versioned};
