//! Narrative bookkeeping derived from an episode's scenes.

use crate::text::{char_len, dedup_preserving_order, truncate_chars};
use dramaturg_core::Scene;

const CONFLICT_MAX_CHARS: usize = 80;
const KEY_EVENT_MAX_CHARS: usize = 40;
const MAX_KEY_EVENTS: usize = 3;
const MIN_CONFLICT_DIALOGUE_CHARS: usize = 6;
const MAX_FLOW_LOCATIONS: usize = 4;

fn joined_notes<'a, I>(notes: I) -> Option<String>
where
    I: Iterator<Item = Option<&'a String>>,
{
    let notes = dedup_preserving_order(
        notes
            .flatten()
            .map(|note| note.trim().to_string())
            .filter(|note| !note.is_empty()),
    );
    (!notes.is_empty()).then(|| truncate_chars(&notes.join("；"), CONFLICT_MAX_CHARS))
}

/// One-sentence summary of the episode's dramatic tension.
///
/// Priority: per-scene conflict notes, then adaptation notes, then the first
/// dialogue line of at least six characters, then a flow of locations.
pub fn core_conflict(scenes: &[Scene]) -> String {
    if let Some(conflict) = joined_notes(scenes.iter().map(|s| s.scene_conflict.as_ref())) {
        return conflict;
    }
    if let Some(notes) = joined_notes(scenes.iter().map(|s| s.adaptation_note.as_ref())) {
        return notes;
    }
    if let Some(line) = scenes
        .iter()
        .map(|s| s.dialogue.trim())
        .find(|d| char_len(d) >= MIN_CONFLICT_DIALOGUE_CHARS)
    {
        return truncate_chars(line, CONFLICT_MAX_CHARS);
    }
    scene_flow(scenes)
}

/// `Scene flow: A → B → C` over distinct consecutive locations.
fn scene_flow(scenes: &[Scene]) -> String {
    let mut locations: Vec<&str> = Vec::new();
    for location in scenes.iter().map(|s| s.location.trim()) {
        if !location.is_empty() && locations.last() != Some(&location) {
            locations.push(location);
        }
    }
    if locations.is_empty() {
        return format!("Scene flow: {} scenes", scenes.len());
    }
    locations.truncate(MAX_FLOW_LOCATIONS);
    format!("Scene flow: {}", locations.join(" → "))
}

/// Up to three distinct scene actions, each cut to forty characters.
pub fn key_events(scenes: &[Scene]) -> Vec<String> {
    let mut events = dedup_preserving_order(
        scenes
            .iter()
            .map(|s| s.character_actions.trim())
            .filter(|a| !a.is_empty())
            .map(|a| truncate_chars(a, KEY_EVENT_MAX_CHARS)),
    );
    events.truncate(MAX_KEY_EVENTS);
    events
}

/// Tension level for episode `index` (0-based) of `total`, scaled to 1..=5.
pub fn conflict_intensity(index: usize, total: usize) -> u8 {
    if total == 0 {
        return 1;
    }
    let scaled = (5 * (index + 1)).div_ceil(total);
    scaled.clamp(1, 5) as u8
}
