//! In-memory document store.

use async_trait::async_trait;
use dramaturg_core::ScriptDocument;
use dramaturg_error::{DramaturgResult, StorageError, StorageErrorKind};
use dramaturg_interface::{DocumentId, DocumentStore, Versioned};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

/// Process-local store keyed by [`DocumentId`].
///
/// Clones share the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDocumentStore {
    documents: Arc<RwLock<HashMap<DocumentId, Versioned<ScriptDocument>>>>,
}

impl InMemoryDocumentStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored documents.
    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    /// Whether the store holds no documents.
    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    #[instrument(skip(self, document), fields(title = %document.metadata.title))]
    async fn insert(&self, document: ScriptDocument) -> DramaturgResult<DocumentId> {
        let id = DocumentId::new();
        self.documents
            .write()
            .await
            .insert(id, Versioned::new(document, 1));
        debug!(%id, "Stored new document");
        Ok(id)
    }

    #[instrument(skip(self))]
    async fn get(&self, id: &DocumentId) -> DramaturgResult<Versioned<ScriptDocument>> {
        self.documents
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| StorageError::new(StorageErrorKind::NotFound(id.to_string())).into())
    }

    #[instrument(skip(self, document))]
    async fn compare_and_swap(
        &self,
        id: &DocumentId,
        expected_revision: u64,
        document: ScriptDocument,
    ) -> DramaturgResult<u64> {
        let mut documents = self.documents.write().await;
        let entry = documents
            .get_mut(id)
            .ok_or_else(|| StorageError::new(StorageErrorKind::NotFound(id.to_string())))?;

        let actual = *entry.revision();
        if actual != expected_revision {
            warn!(actual, "Rejected stale write");
            return Err(StorageError::new(StorageErrorKind::RevisionConflict {
                id: id.to_string(),
                expected: expected_revision,
                actual,
            })
            .into());
        }

        let next = actual + 1;
        *entry = Versioned::new(document, next);
        debug!(revision = next, "Document updated");
        Ok(next)
    }
}
