//! Heuristic scoring of an assembled script.

use crate::text::char_len;
use dramaturg_core::{QualityMetrics, QualityStatus, ScriptDocument};
use tracing::{debug, instrument};

const CATHARSIS_MARKERS: &[&str] = &[
    "爽", "反击", "打脸", "逆袭", "复仇", "报仇", "真相", "揭穿", "揭露", "胜利", "解气", "revenge",
    "payback", "triumph", "victory", "comeback", "justice", "exposed", "reveal",
];

const CONTINUITY_MARKERS: &[&str] = &[
    "悬念", "究竟", "到底", "竟然", "没想到", "下一集", "秘密", "真相", "谁", "?", "？", "…", "...",
    "secret", "truth", "who", "what", "next", "suddenly", "but",
];

const MIN_HOOK_CHARS: usize = 5;
const MIN_CONTINUITY_CHARS: usize = 15;

/// Ratio of `part` to `whole`; zero for an empty whole.
fn fraction(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

fn contains_any(text: &str, markers: &[&str]) -> bool {
    let text = text.to_lowercase();
    markers.iter().any(|marker| text.contains(marker))
}

/// Running scores for the five dimensions.
#[derive(Debug)]
struct Scorecard {
    structure: i32,
    conflict: i32,
    pacing: i32,
    dialogue: i32,
    visual: i32,
    issues: Vec<String>,
    suggestions: Vec<String>,
}

impl Scorecard {
    fn seeded() -> Self {
        Self {
            structure: 7,
            conflict: 7,
            pacing: 7,
            dialogue: 7,
            visual: 6,
            issues: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    fn issue(&mut self, issue: impl Into<String>, suggestion: impl Into<String>) {
        self.issues.push(issue.into());
        self.suggestions.push(suggestion.into());
    }

    fn finish(self) -> QualityMetrics {
        let clamp = |score: i32| score.clamp(1, 10) as u8;
        let scores = [
            clamp(self.structure),
            clamp(self.conflict),
            clamp(self.pacing),
            clamp(self.dialogue),
            clamp(self.visual),
        ];
        let sum: u32 = scores.iter().map(|s| u32::from(*s)).sum();
        let overall_score = (f64::from(sum) / 5.0 * 10.0).round() / 10.0;
        let quality_status = QualityStatus::from_score(overall_score);

        let mut suggestions = self.suggestions;
        match quality_status {
            QualityStatus::Fail => suggestions.insert(
                0,
                "Overall quality is below the acceptable bar; regenerate the script or run optimize against the issues below.".to_string(),
            ),
            QualityStatus::RevisionNeeded => suggestions.insert(
                0,
                "Run optimize to address the issues below before production.".to_string(),
            ),
            QualityStatus::Pass => {}
        }

        QualityMetrics {
            structure_score: scores[0],
            conflict_score: scores[1],
            pacing_score: scores[2],
            dialogue_score: scores[3],
            visual_score: scores[4],
            overall_score,
            quality_status,
            issues: self.issues,
            suggestions,
        }
    }
}

/// Score a script across structure, conflict, pacing, dialogue and visual
/// direction.
///
/// `requested_episodes` is the count the caller asked for; completeness is
/// measured against it.
#[instrument(skip(document), fields(episodes = document.episodes.len()))]
pub fn evaluate_quality(document: &ScriptDocument, requested_episodes: u32) -> QualityMetrics {
    let episodes = &document.episodes;
    let episode_count = episodes.len();
    let scenes = episodes.iter().flat_map(|e| e.scenes.iter()).collect::<Vec<_>>();
    let mut card = Scorecard::seeded();

    // 1. episode completeness
    let completeness = if requested_episodes == 0 {
        if episode_count > 0 { 1.0 } else { 0.0 }
    } else {
        episode_count as f64 / f64::from(requested_episodes)
    };
    if completeness >= 1.0 {
        card.structure += 1;
    } else {
        card.structure -= if completeness >= 0.5 { 1 } else { 2 };
        card.issue(
            format!("Only {episode_count} of {requested_episodes} requested episodes were produced"),
            "Regenerate with more source material per episode or lower the episode count",
        );
    }

    // 2. scenes per episode
    let average_scenes = if episode_count == 0 {
        0.0
    } else {
        scenes.len() as f64 / episode_count as f64
    };
    if average_scenes >= 3.0 {
        card.structure += 1;
    } else {
        card.structure -= 1;
        card.issue(
            format!("Episodes average {average_scenes:.1} scenes; at least 3 are needed"),
            "Break long beats into more scenes so each episode has a setup, turn and payoff",
        );
    }

    // 3. conflict escalation
    let intensities = episodes.iter().map(|e| e.conflict_intensity).collect::<Vec<_>>();
    let strictly = intensities.len() >= 2 && intensities.windows(2).all(|w| w[0] < w[1]);
    let loosely = intensities.windows(2).all(|w| w[0] <= w[1]);
    if strictly {
        card.conflict += 2;
    } else if loosely {
        card.conflict += 1;
    } else {
        card.conflict -= 1;
        card.issue(
            "Conflict intensity drops between episodes",
            "Escalate the stakes episode by episode toward the climax",
        );
    }

    // 4. hooks
    let hooks = episodes
        .iter()
        .filter(|e| char_len(e.hook.trim()) >= MIN_HOOK_CHARS)
        .count();
    if fraction(hooks, episode_count) >= 0.8 {
        card.pacing += 1;
    } else {
        card.pacing -= 1;
        card.issue(
            format!("{} of {episode_count} episodes lack an opening hook", episode_count - hooks),
            "Open every episode with a line that grabs attention in the first seconds",
        );
    }

    // 5. cliffhangers
    let cliffhangers = episodes
        .iter()
        .filter(|e| !e.cliffhanger.trim().is_empty())
        .count();
    if fraction(cliffhangers, episode_count) >= 0.7 {
        card.dialogue += 1;
    } else {
        card.dialogue -= 1;
        card.issue(
            format!(
                "{} of {episode_count} episodes lack a closing cliffhanger",
                episode_count - cliffhangers
            ),
            "End each episode on a spoken line that leaves a question open",
        );
    }

    // 6. dialogue coverage
    let with_dialogue = scenes.iter().filter(|s| s.has_dialogue()).count();
    let dialogue_ratio = fraction(with_dialogue, scenes.len());
    if dialogue_ratio >= 0.6 {
        card.dialogue += 1;
    } else if dialogue_ratio < 0.3 {
        card.dialogue -= 2;
        card.issue(
            format!("Only {:.0}% of scenes carry dialogue", dialogue_ratio * 100.0),
            "Give most scenes a spoken line; short dramas are carried by dialogue",
        );
    } else {
        card.suggestions
            .push("Consider adding dialogue to the silent scenes".to_string());
    }

    // 7. composition coverage
    let with_composition = scenes.iter().filter(|s| s.has_composition()).count();
    if fraction(with_composition, scenes.len()) >= 0.5 {
        card.visual += 1;
    } else {
        card.visual -= 1;
        card.issue(
            "Most scenes have no shot or composition direction",
            "Specify a shot type and composition for each scene",
        );
    }

    // 8. key events
    let eventful = episodes.iter().filter(|e| e.key_events.len() >= 2).count();
    if fraction(eventful, episode_count) >= 0.7 {
        card.structure += 1;
    } else {
        card.structure -= 1;
        card.issue(
            "Too many episodes have fewer than two key events",
            "Make sure every episode moves the plot at least twice",
        );
    }

    // 9. payoff
    let payoff = episodes
        .iter()
        .filter(|e| {
            !e.core_conflict.trim().is_empty()
                || e.scenes.iter().any(|s| {
                    contains_any(&s.dialogue, CATHARSIS_MARKERS)
                        || contains_any(&s.emotional_tone, CATHARSIS_MARKERS)
                })
        })
        .count();
    if fraction(payoff, episode_count) >= 0.8 {
        card.conflict += 1;
    } else {
        card.conflict -= 1;
        card.issue(
            "Episodes rarely pay off their conflict",
            "Give each episode a clear conflict and a cathartic turn",
        );
    }

    // 10. cliffhanger continuity
    let continuous = episodes
        .iter()
        .filter(|e| {
            let cliffhanger = e.cliffhanger.trim();
            !cliffhanger.is_empty()
                && (contains_any(cliffhanger, CONTINUITY_MARKERS)
                    || char_len(cliffhanger) >= MIN_CONTINUITY_CHARS)
        })
        .count();
    if fraction(continuous, episode_count) >= 0.6 {
        card.pacing += 1;
    } else {
        card.pacing -= 1;
        card.issue(
            "Cliffhangers do not carry the main line into the next episode",
            "Tie each cliffhanger to an unanswered question from the main plot",
        );
    }

    let metrics = card.finish();
    debug!(
        overall = metrics.overall_score,
        status = %metrics.quality_status,
        issues = metrics.issues.len(),
        "Evaluated script quality"
    );
    metrics
}
