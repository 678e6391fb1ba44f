//! Episode-count recommendations.

use serde::{Deserialize, Serialize};

/// Where an episode-count recommendation came from.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisSource {
    /// Parsed from a model response
    #[display("model")]
    Model,
    /// Derived from the content length table
    #[display("heuristic")]
    Heuristic,
}

/// Recommended episode count for a piece of source prose.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EpisodeCountAnalysis {
    /// Recommended number of episodes, 1..=30
    pub recommended_episodes: u32,
    /// Free-text rationale
    pub analysis: String,
    /// Model or heuristic
    pub source: AnalysisSource,
}

impl EpisodeCountAnalysis {
    /// Smallest recommendation ever returned.
    pub const MIN_EPISODES: u32 = 1;
    /// Largest recommendation ever returned.
    pub const MAX_EPISODES: u32 = 30;

    /// Builds an analysis, clamping the count into range.
    pub fn new(recommended_episodes: u32, analysis: impl Into<String>, source: AnalysisSource) -> Self {
        Self {
            recommended_episodes: recommended_episodes.clamp(Self::MIN_EPISODES, Self::MAX_EPISODES),
            analysis: analysis.into(),
            source,
        }
    }
}
