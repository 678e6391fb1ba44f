//! Versioned document storage for Dramaturg.
//!
//! Provides [`InMemoryDocumentStore`], a process-local implementation of the
//! [`DocumentStore`](dramaturg_interface::DocumentStore) seam with
//! compare-and-swap writes.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod memory;

pub use memory::InMemoryDocumentStore;
