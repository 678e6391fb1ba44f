//! Trait definitions for model backends and document persistence.

use crate::{DocumentId, Versioned};
use async_trait::async_trait;
use dramaturg_core::{GenerateRequest, GenerateResponse, ScriptDocument};
use dramaturg_error::DramaturgResult;

/// Core trait that all model backends must implement.
///
/// The pipeline only ever needs one completion per call; there is no
/// streaming or batching surface.
#[async_trait]
pub trait DramaturgDriver: Send + Sync {
    /// Generate model output for an ordered list of messages.
    async fn generate(&self, req: &GenerateRequest) -> DramaturgResult<GenerateResponse>;

    /// Provider name (e.g., "openai", "deepseek", "qwen").
    fn provider_name(&self) -> &'static str;

    /// Model identifier used when the request does not override it.
    fn model_name(&self) -> &str;
}

/// Versioned persistence for script documents.
///
/// Every successful write bumps the revision by one. Writers must present the
/// revision they read; a stale revision is rejected rather than overwritten.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Store a new document at revision 1.
    async fn insert(&self, document: ScriptDocument) -> DramaturgResult<DocumentId>;

    /// Fetch the current value and revision.
    async fn get(&self, id: &DocumentId) -> DramaturgResult<Versioned<ScriptDocument>>;

    /// Replace the document if its revision still equals `expected_revision`.
    ///
    /// Returns the new revision, or a `RevisionConflict` storage error when
    /// another writer got there first.
    async fn compare_and_swap(
        &self,
        id: &DocumentId,
        expected_revision: u64,
        document: ScriptDocument,
    ) -> DramaturgResult<u64>;
}
