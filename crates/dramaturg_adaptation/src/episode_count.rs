//! Episode-count recommendation helpers.

use crate::repair::parse_lenient;
use crate::text::char_len;
use dramaturg_core::{AnalysisSource, EpisodeCountAnalysis};
use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;

static COUNT_MENTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d{1,3})[ \t]*(?:集|episodes?\b)").expect("Valid episode count regex")
});

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecommendationPayload {
    #[serde(alias = "recommended_episodes", alias = "episodes", alias = "episodeCount")]
    recommended_episodes: u32,
    #[serde(default)]
    analysis: String,
}

/// Episode count from source length alone.
///
/// # Examples
///
/// ```
/// use dramaturg_adaptation::heuristic_episode_count;
///
/// assert_eq!(heuristic_episode_count(&"字".repeat(499)), 2);
/// assert_eq!(heuristic_episode_count(&"字".repeat(2999)), 5);
/// assert_eq!(heuristic_episode_count(&"字".repeat(6000)), 15);
/// ```
pub fn heuristic_episode_count(content: &str) -> u32 {
    match char_len(content.trim()) {
        n if n < 500 => 2,
        n if n < 1500 => 3,
        n if n < 3000 => 5,
        n if n < 6000 => 10,
        _ => 15,
    }
}

/// Analysis built from the length table.
pub fn heuristic_analysis(content: &str) -> EpisodeCountAnalysis {
    let count = heuristic_episode_count(content);
    EpisodeCountAnalysis::new(
        count,
        format!(
            "Recommended {count} episodes from source length ({} characters).",
            char_len(content.trim())
        ),
        AnalysisSource::Heuristic,
    )
}

/// Read a recommendation out of a model response.
///
/// Accepts the requested JSON shape (leniently) and falls back to the first
/// `N集` / `N episodes` mention. Returns `None` when neither is present.
pub fn parse_recommendation(response: &str) -> Option<EpisodeCountAnalysis> {
    if let Ok(payload) = parse_lenient::<RecommendationPayload>(response)
        && payload.recommended_episodes > 0
    {
        let analysis = if payload.analysis.trim().is_empty() {
            response.trim().to_string()
        } else {
            payload.analysis
        };
        return Some(EpisodeCountAnalysis::new(
            payload.recommended_episodes,
            analysis,
            AnalysisSource::Model,
        ));
    }

    let count = COUNT_MENTION
        .captures(response)
        .and_then(|caps| caps[1].parse::<u32>().ok())
        .filter(|n| *n > 0)?;
    Some(EpisodeCountAnalysis::new(
        count,
        response.trim().to_string(),
        AnalysisSource::Model,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_recommendation() {
        let parsed = parse_recommendation(
            "```json\n{\"recommendedEpisodes\": 8, \"analysis\": \"two reversals\"}\n```",
        )
        .unwrap();
        assert_eq!(parsed.recommended_episodes, 8);
        assert_eq!(parsed.analysis, "two reversals");
        assert_eq!(parsed.source, AnalysisSource::Model);
    }

    #[test]
    fn prose_recommendation_is_clamped() {
        let parsed = parse_recommendation("建议改编为 45 集，节奏紧凑。").unwrap();
        assert_eq!(parsed.recommended_episodes, 30);

        let parsed = parse_recommendation("I'd go with 6 episodes.").unwrap();
        assert_eq!(parsed.recommended_episodes, 6);
    }

    #[test]
    fn unreadable_recommendation() {
        assert!(parse_recommendation("It depends on the budget.").is_none());
    }

    #[test]
    fn length_table_boundaries() {
        assert_eq!(heuristic_episode_count(""), 2);
        assert_eq!(heuristic_episode_count(&"a".repeat(500)), 3);
        assert_eq!(heuristic_episode_count(&"a".repeat(1500)), 5);
        assert_eq!(heuristic_episode_count(&"a".repeat(3000)), 10);
        assert_eq!(heuristic_episode_count(&"a".repeat(5999)), 10);
    }
}
