//! Document-level derivations: story structure and title.

use crate::text::truncate_chars;
use dramaturg_core::{Episode, StoryStructure};

const TITLE_MAX_CHARS: usize = 30;
const UNTITLED: &str = "Untitled";

fn range_label(episodes: &[Episode]) -> String {
    match (episodes.first(), episodes.last()) {
        (Some(first), Some(last)) if first.episode_number == last.episode_number => {
            format!("Episode {}", first.episode_number)
        }
        (Some(first), Some(last)) => {
            format!("Episodes {}-{}", first.episode_number, last.episode_number)
        }
        _ => String::new(),
    }
}

fn describe(episodes: &[Episode]) -> String {
    if episodes.is_empty() {
        return String::new();
    }
    let conflicts = episodes
        .iter()
        .map(|e| e.core_conflict.trim())
        .filter(|c| !c.is_empty())
        .collect::<Vec<_>>();
    if conflicts.is_empty() {
        range_label(episodes)
    } else {
        format!("{}: {}", range_label(episodes), conflicts.join(" / "))
    }
}

/// Opening, development, climax and resolution over episode ranges.
///
/// The first episode opens and the last resolves. With three or more
/// episodes the penultimate one is the climax and everything between is
/// development; two episodes leave development and climax empty.
pub fn derive_story_structure(episodes: &[Episode]) -> StoryStructure {
    match episodes.len() {
        0 => StoryStructure::default(),
        1 => {
            let only = describe(episodes);
            StoryStructure {
                opening: only.clone(),
                development: String::new(),
                climax: only.clone(),
                resolution: only,
            }
        }
        2 => StoryStructure {
            opening: describe(&episodes[..1]),
            development: String::new(),
            climax: String::new(),
            resolution: describe(&episodes[1..]),
        },
        n => StoryStructure {
            opening: describe(&episodes[..1]),
            development: describe(&episodes[1..n - 2]),
            climax: describe(&episodes[n - 2..n - 1]),
            resolution: describe(&episodes[n - 1..]),
        },
    }
}

/// Title from the first meaningful line of the source.
pub fn derive_title(content: &str) -> String {
    content
        .lines()
        .map(|line| {
            line.trim()
                .trim_start_matches('#')
                .trim_matches(|c: char| {
                    c.is_whitespace() || matches!(c, '《' | '》' | '"' | '“' | '”' | '*')
                })
        })
        .find(|line| !line.is_empty())
        .map(|line| truncate_chars(line, TITLE_MAX_CHARS))
        .unwrap_or_else(|| UNTITLED.to_string())
}
