//! Carrying narrative bookkeeping across a storyboard regeneration.

use crate::text::is_non_trivial;
use dramaturg_core::Episode;
use tracing::debug;

/// Merge regenerated episodes with the originals by index.
///
/// Each regenerated episode keeps its scenes, duration and intensity but takes
/// the original's core conflict and hook when those are non-trivial (at least
/// four characters once trimmed), and its key events when non-empty.
/// Episodes beyond the original count are kept as regenerated.
pub fn merge_bookkeeping(original: &[Episode], regenerated: Vec<Episode>) -> Vec<Episode> {
    let mut carried = 0usize;
    let merged = regenerated
        .into_iter()
        .enumerate()
        .map(|(index, mut episode)| {
            if let Some(previous) = original.get(index) {
                if is_non_trivial(&previous.core_conflict) {
                    episode.core_conflict = previous.core_conflict.clone();
                    carried += 1;
                }
                if !previous.key_events.is_empty() {
                    episode.key_events = previous.key_events.clone();
                }
                if is_non_trivial(&previous.hook) {
                    episode.hook = previous.hook.clone();
                }
            }
            episode
        })
        .collect::<Vec<_>>();
    debug!(
        original = original.len(),
        merged = merged.len(),
        carried,
        "Merged episode bookkeeping"
    );
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use dramaturg_core::Scene;

    fn episode(conflict: &str, hook: &str, events: &[&str]) -> Episode {
        Episode {
            core_conflict: conflict.to_string(),
            hook: hook.to_string(),
            key_events: events.iter().map(|e| e.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn non_trivial_originals_win() {
        let original = vec![episode("sister frames her", "You dare?", &["slap"])];
        let mut fresh = episode("new", "hey", &["run"]);
        fresh.scenes = vec![Scene::default()];
        let merged = merge_bookkeeping(&original, vec![fresh]);
        assert_eq!(merged[0].core_conflict, "sister frames her");
        assert_eq!(merged[0].hook, "You dare?");
        assert_eq!(merged[0].key_events, vec!["slap".to_string()]);
        assert_eq!(merged[0].scenes.len(), 1);
    }

    #[test]
    fn trivial_originals_yield_to_regenerated() {
        let original = vec![episode(" ab ", "no", &[])];
        let merged = merge_bookkeeping(&original, vec![episode("fresh conflict", "fresh hook", &["x"])]);
        assert_eq!(merged[0].core_conflict, "fresh conflict");
        assert_eq!(merged[0].hook, "fresh hook");
        assert_eq!(merged[0].key_events, vec!["x".to_string()]);
    }

    #[test]
    fn extra_episodes_are_kept() {
        let original = vec![episode("long conflict", "long hook", &["a"])];
        let merged = merge_bookkeeping(
            &original,
            vec![episode("one", "h1", &[]), episode("two two", "h2", &[])],
        );
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[1].core_conflict, "two two");
    }
}
