//! The script document: the unit of generation.

use crate::{Episode, QualityMetrics};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Descriptive metadata for a generated script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptMetadata {
    /// Script title
    pub title: String,
    /// Number of episodes in the document
    pub episode_count: u32,
    /// Episode count the caller asked for; 0 when unknown
    #[serde(default)]
    pub requested_episodes: u32,
    /// Total runtime in seconds
    pub total_duration: u32,
    /// Genre label supplied by the caller
    pub story_type: String,
    /// When the episodes were last (re)generated
    pub generation_timestamp: DateTime<Utc>,
}

/// Four narrative phases; descriptive only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoryStructure {
    /// Setup
    pub opening: String,
    /// Rising action
    pub development: String,
    /// Climax
    pub climax: String,
    /// Resolution
    pub resolution: String,
}

/// A complete generated script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptDocument {
    /// Descriptive metadata
    pub metadata: ScriptMetadata,
    /// Adaptation analysis extracted from the first model response
    pub adaptation_analysis: String,
    /// Adapted narrative extracted from the first model response
    pub adapted_story: String,
    /// Narrative phase descriptors
    #[serde(default)]
    pub story_structure: StoryStructure,
    /// Ordered episodes
    pub episodes: Vec<Episode>,
    /// Latest quality evaluation
    pub quality_metrics: QualityMetrics,
    /// Every raw model completion that contributed to this document
    pub raw_content: String,
}

impl ScriptDocument {
    /// Total number of scenes across all episodes.
    pub fn scene_count(&self) -> usize {
        self.episodes.iter().map(|episode| episode.scenes.len()).sum()
    }

    /// Sum of the episode durations.
    pub fn episode_duration_total(&self) -> u32 {
        self.episodes.iter().map(|episode| episode.duration).sum()
    }

    /// Episode count completeness is scored against.
    ///
    /// Documents written before the requested count was recorded fall back
    /// to the produced count.
    pub fn completeness_target(&self) -> u32 {
        if self.metadata.requested_episodes > 0 {
            self.metadata.requested_episodes
        } else {
            self.metadata.episode_count
        }
    }

    /// Average episode length implied by the metadata, if any episodes exist.
    pub fn implied_episode_duration(&self) -> Option<u32> {
        let count = if self.episodes.is_empty() {
            self.metadata.episode_count
        } else {
            self.episodes.len() as u32
        };
        if count == 0 || self.metadata.total_duration == 0 {
            return None;
        }
        Some((self.metadata.total_duration as f64 / count as f64).round() as u32)
    }
}
