//! Episodes: contiguous runs of scenes.

use crate::Scene;
use serde::{Deserialize, Serialize};

/// A contiguous run of scenes bounded by a duration target.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Episode {
    /// 1-based, contiguous episode number
    pub episode_number: u32,
    /// Sum of the scene durations, in seconds
    pub duration: u32,
    /// One-sentence summary of the episode's dramatic tension
    pub core_conflict: String,
    /// Heuristic tension level, 1..=5
    pub conflict_intensity: u8,
    /// Ordered beats worth remembering
    pub key_events: Vec<String>,
    /// Opening line meant to grab attention
    pub hook: String,
    /// Closing line meant to pull viewers into the next episode
    pub cliffhanger: String,
    /// Scenes, numbered 1..N within the episode
    pub scenes: Vec<Scene>,
}

impl Episode {
    /// Sum of the scene durations.
    pub fn scene_duration_total(&self) -> u32 {
        self.scenes.iter().map(|scene| scene.duration).sum()
    }

    /// Resets `duration` from the scenes.
    pub fn recompute_duration(&mut self) {
        self.duration = self.scene_duration_total();
    }
}
