use chrono::Utc;
use dramaturg_core::{QualityMetrics, ScriptDocument, ScriptMetadata, StoryStructure};
use dramaturg_error::DramaturgErrorKind;
use dramaturg_interface::{DocumentId, DocumentStore};
use dramaturg_storage::InMemoryDocumentStore;

fn document(title: &str) -> ScriptDocument {
    ScriptDocument {
        metadata: ScriptMetadata {
            title: title.to_string(),
            episode_count: 0,
            requested_episodes: 0,
            total_duration: 0,
            story_type: "romance".to_string(),
            generation_timestamp: Utc::now(),
        },
        adaptation_analysis: String::new(),
        adapted_story: String::new(),
        story_structure: StoryStructure::default(),
        episodes: Vec::new(),
        quality_metrics: QualityMetrics::default(),
        raw_content: String::new(),
    }
}

#[tokio::test]
async fn insert_starts_at_revision_one() -> anyhow::Result<()> {
    let store = InMemoryDocumentStore::new();
    let id = store.insert(document("First")).await?;
    let stored = store.get(&id).await?;
    assert_eq!(*stored.revision(), 1);
    assert_eq!(stored.value().metadata.title, "First");
    assert_eq!(store.len().await, 1);
    Ok(())
}

#[tokio::test]
async fn compare_and_swap_bumps_revision() -> anyhow::Result<()> {
    let store = InMemoryDocumentStore::new();
    let id = store.insert(document("First")).await?;
    let revision = store.compare_and_swap(&id, 1, document("Second")).await?;
    assert_eq!(revision, 2);
    assert_eq!(store.get(&id).await?.value().metadata.title, "Second");
    Ok(())
}

#[tokio::test]
async fn stale_writer_is_rejected() -> anyhow::Result<()> {
    let store = InMemoryDocumentStore::new();
    let id = store.insert(document("First")).await?;
    store.compare_and_swap(&id, 1, document("Winner")).await?;

    let err = store
        .compare_and_swap(&id, 1, document("Loser"))
        .await
        .unwrap_err();
    match err.kind() {
        DramaturgErrorKind::Storage(storage) => assert!(storage.is_conflict()),
        other => panic!("unexpected error kind: {other}"),
    }
    assert_eq!(store.get(&id).await?.value().metadata.title, "Winner");
    Ok(())
}

#[tokio::test]
async fn missing_document_is_not_found() {
    let store = InMemoryDocumentStore::new();
    let err = store.get(&DocumentId::new()).await.unwrap_err();
    assert!(err.user_message().contains("not found"));
}
