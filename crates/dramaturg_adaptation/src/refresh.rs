//! Store-backed operations: optimize-and-write and summary refresh.
//!
//! Both read a document with its revision and write back through
//! [`DocumentStore::compare_and_swap`]. A stale optimize write is reported to
//! the caller. A stale summary write re-reads the document and re-applies the
//! summaries only to episodes whose scenes are unchanged.

use crate::adapter::ScriptAdapter;
use crate::prompts;
use crate::repair::parse_lenient;
use dramaturg_core::{Episode, ScriptDocument};
use dramaturg_error::{
    AdaptationError, AdaptationErrorKind, DramaturgError, DramaturgErrorKind, DramaturgResult,
};
use dramaturg_interface::{DocumentId, DocumentStore, DramaturgDriver, Versioned};
use serde::Deserialize;
use std::collections::HashMap;
use std::hash::{DefaultHasher, Hash, Hasher};
use tracing::{debug, info, instrument, warn};

/// Write attempts before a summary refresh gives up.
pub const MAX_REFRESH_ATTEMPTS: u32 = 3;

/// Per-episode summary returned by the model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EpisodeSummary {
    /// Episode the summary belongs to; position is used when absent
    #[serde(alias = "episode", alias = "episode_number")]
    pub episode_number: Option<u32>,
    /// One-sentence core conflict
    #[serde(alias = "core_conflict", alias = "conflict")]
    pub core_conflict: String,
    /// Two or three key events
    #[serde(alias = "key_events", alias = "events")]
    pub key_events: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SummariesPayload {
    Wrapped { episodes: Vec<EpisodeSummary> },
    Bare(Vec<EpisodeSummary>),
}

impl SummariesPayload {
    fn into_summaries(self) -> Vec<EpisodeSummary> {
        let summaries = match self {
            SummariesPayload::Wrapped { episodes } | SummariesPayload::Bare(episodes) => episodes,
        };
        summaries
            .into_iter()
            .enumerate()
            .map(|(i, mut summary)| {
                summary.episode_number.get_or_insert(i as u32 + 1);
                summary
            })
            .collect()
    }
}

/// Hash of an episode's scene content.
pub fn scene_fingerprint(episode: &Episode) -> u64 {
    let mut hasher = DefaultHasher::new();
    for scene in &episode.scenes {
        scene.location.hash(&mut hasher);
        scene.character_actions.hash(&mut hasher);
        scene.dialogue.hash(&mut hasher);
        scene.composition.hash(&mut hasher);
        scene.duration.hash(&mut hasher);
    }
    episode.scenes.len().hash(&mut hasher);
    hasher.finish()
}

fn fingerprints(document: &ScriptDocument) -> HashMap<u32, u64> {
    document
        .episodes
        .iter()
        .map(|e| (e.episode_number, scene_fingerprint(e)))
        .collect()
}

/// Apply `summaries` to episodes whose fingerprint still matches `expected`.
///
/// Returns the updated document and the number of episodes touched.
pub fn apply_summaries(
    document: &ScriptDocument,
    summaries: &[EpisodeSummary],
    expected: &HashMap<u32, u64>,
) -> (ScriptDocument, usize) {
    let mut updated = document.clone();
    let mut applied = 0;
    for summary in summaries {
        let Some(number) = summary.episode_number else {
            continue;
        };
        let Some(episode) = updated.episodes.iter_mut().find(|e| e.episode_number == number)
        else {
            continue;
        };
        if expected.get(&number) != Some(&scene_fingerprint(episode)) {
            debug!(episode = number, "Scenes changed since summary; skipping");
            continue;
        }
        let mut touched = false;
        if !summary.core_conflict.trim().is_empty() {
            episode.core_conflict = summary.core_conflict.trim().to_string();
            touched = true;
        }
        let events = summary
            .key_events
            .iter()
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty())
            .collect::<Vec<_>>();
        if !events.is_empty() {
            episode.key_events = events;
            touched = true;
        }
        if touched {
            applied += 1;
        }
    }
    (updated, applied)
}

fn is_revision_conflict(error: &DramaturgError) -> bool {
    matches!(error.kind(), DramaturgErrorKind::Storage(e) if e.is_conflict())
}

impl<D: DramaturgDriver> ScriptAdapter<D> {
    /// Optimize a stored document and write the result back.
    ///
    /// # Errors
    ///
    /// Anything [`optimize_script`](Self::optimize_script) returns, plus
    /// `RevisionConflict` when the document changed while the model ran.
    #[instrument(skip(self, store, id, content), fields(id = %id))]
    pub async fn optimize_stored<S>(
        &self,
        store: &S,
        id: &DocumentId,
        content: &str,
        duration_per_episode: Option<u32>,
    ) -> DramaturgResult<Versioned<ScriptDocument>>
    where
        S: DocumentStore + ?Sized,
    {
        let (document, revision) = store.get(id).await?.into_parts();
        let optimized = self
            .optimize_script(&document, content, duration_per_episode)
            .await?;
        let revision = store
            .compare_and_swap(id, revision, optimized.clone())
            .await
            .map_err(|e| {
                if is_revision_conflict(&e) {
                    warn!(error = %e, "Document changed during optimization");
                }
                e
            })?;
        info!(revision, "Optimized document stored");
        Ok(Versioned::new(optimized, revision))
    }

    /// Re-derive per-episode core conflicts and key events for a stored document.
    ///
    /// # Errors
    ///
    /// Driver or parse errors from the summary call, store errors, and
    /// `ConflictRetriesExhausted` after [`MAX_REFRESH_ATTEMPTS`] stale writes.
    #[instrument(skip(self, store, id), fields(id = %id))]
    pub async fn refresh_summaries<S>(
        &self,
        store: &S,
        id: &DocumentId,
    ) -> DramaturgResult<Versioned<ScriptDocument>>
    where
        S: DocumentStore + ?Sized,
    {
        let (document, mut revision) = store.get(id).await?.into_parts();
        let (system, user) = prompts::summaries(&document);
        let text = self.complete("summary refresh", system, user).await?;
        let summaries = parse_lenient::<SummariesPayload>(&text)?.into_summaries();
        let expected = fingerprints(&document);
        debug!(summaries = summaries.len(), "Summaries parsed");

        let mut current = document;
        for attempt in 1..=MAX_REFRESH_ATTEMPTS {
            let (updated, applied) = apply_summaries(&current, &summaries, &expected);
            match store.compare_and_swap(id, revision, updated.clone()).await {
                Ok(new_revision) => {
                    info!(applied, revision = new_revision, attempt, "Summaries refreshed");
                    return Ok(Versioned::new(updated, new_revision));
                }
                Err(e) if is_revision_conflict(&e) => {
                    warn!(attempt, error = %e, "Concurrent update; re-reading");
                    let (latest, latest_revision) = store.get(id).await?.into_parts();
                    current = latest;
                    revision = latest_revision;
                }
                Err(e) => return Err(e),
            }
        }
        Err(AdaptationError::new(AdaptationErrorKind::ConflictRetriesExhausted(
            MAX_REFRESH_ATTEMPTS,
        ))
        .into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dramaturg_core::Scene;

    fn episode(number: u32, action: &str) -> Episode {
        Episode {
            episode_number: number,
            scenes: vec![Scene {
                character_actions: action.to_string(),
                duration: 5,
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    #[test]
    fn missing_episode_numbers_follow_position() {
        let payload: SummariesPayload =
            serde_json::from_str(r#"[{"coreConflict": "a"}, {"episode": 5, "conflict": "b"}]"#)
                .unwrap();
        let summaries = payload.into_summaries();
        assert_eq!(summaries[0].episode_number, Some(1));
        assert_eq!(summaries[1].episode_number, Some(5));
        assert_eq!(summaries[1].core_conflict, "b");
    }

    #[test]
    fn fingerprint_tracks_scene_content() {
        assert_eq!(scene_fingerprint(&episode(1, "run")), scene_fingerprint(&episode(2, "run")));
        assert_ne!(scene_fingerprint(&episode(1, "run")), scene_fingerprint(&episode(1, "hide")));
    }
}
