//! Prompt templates for each model call.

use dramaturg_core::{Episode, QualityDimension, ScriptDocument};

const ADAPTATION_SYSTEM: &str = "You are a senior short-drama screenwriter. You adapt prose into \
vertical short-drama stories with a fast opening hook, escalating conflict, frequent reversals and \
a cliffhanger at the end of every episode.";

const STORYBOARD_SYSTEM: &str = "You are a storyboard artist for vertical short dramas. You break an \
adapted story into numbered scenes with precise shot, action and dialogue direction. You follow \
the requested format exactly and never add commentary.";

const ANALYST_SYSTEM: &str = "You are a short-drama development editor. You answer with JSON only.";

const DESIGNER_SYSTEM: &str = "You are a production designer for short dramas. You answer with JSON only.";

/// The storyboard block format every storyboard prompt asks for.
const SCENE_FORMAT: &str = "\
Scene 1: <location>
- Shot type: <close-up / medium / wide / establishing ...>
- Composition: <framing and camera movement>
- Character actions: <what the characters do>
- Dialogue: <speaker>: \"<spoken line>\" (write \"none\" if silent)
- Emotional tone: <tone>
- Background music: <music cue>
- Sound effects: <effects>
- Lighting: <lighting>
- Color tone: <palette>
- Props: <props>
- Adaptation note: <how this departs from the source>
- Scene conflict: <the tension in this scene>";

/// System and user prompts for the story adaptation call.
pub(crate) fn adaptation(
    content: &str,
    episode_count: u32,
    duration_per_episode: u32,
    story_type: &str,
) -> (String, String) {
    let user = format!(
        "Adapt the following source into a {story_type} short drama of {episode_count} episodes, \
about {duration_per_episode} seconds each.\n\n\
Answer in exactly two sections:\n\
===analysis===\n\
【主线】the main line\n【结构】the episode structure\n【策略】the adaptation strategy\n\
Also list: 主角 (protagonist), 目标 (goal), 冲突 (conflict), 情感锚点 (emotional anchor), \
钩子 (hook), 反转 (reversal), one per line as `key: value`.\n\
===story===\n\
The adapted story as continuous prose. Do not include scene headers or shot fields.\n\n\
Source:\n{content}"
    );
    (ADAPTATION_SYSTEM.to_string(), user)
}

/// System and user prompts for the storyboard breakdown call.
pub(crate) fn storyboard(
    adapted_story: &str,
    episode_count: u32,
    duration_per_episode: u32,
    story_type: &str,
) -> (String, String) {
    let total = u64::from(episode_count) * u64::from(duration_per_episode);
    let user = format!(
        "Break this {story_type} short-drama story into scenes. The finished drama runs \
{episode_count} episodes of about {duration_per_episode} seconds ({total} seconds total), so plan \
scenes of 3 to 15 seconds each and at least three scenes per episode. Open with a hook line and \
close every few scenes on a cliffhanger line.\n\n\
Use exactly this format for every scene, numbering scenes consecutively:\n{SCENE_FORMAT}\n\n\
Story:\n{adapted_story}"
    );
    (STORYBOARD_SYSTEM.to_string(), user)
}

fn episode_bookkeeping(episodes: &[Episode]) -> String {
    let mut out = String::new();
    for episode in episodes {
        out.push_str(&format!(
            "Episode {}: core conflict: {}; key events: {}\n",
            episode.episode_number,
            episode.core_conflict,
            if episode.key_events.is_empty() {
                "(none)".to_string()
            } else {
                episode.key_events.join(" / ")
            }
        ));
    }
    out
}

/// System and user prompts for the optimize call.
pub(crate) fn optimization(
    document: &ScriptDocument,
    adapted_story: &str,
    failing: &[QualityDimension],
    target_seconds: u32,
) -> (String, String) {
    let mut directives = String::new();
    for dimension in failing {
        let directive = match dimension {
            QualityDimension::Structure => {
                "Give every episode at least three scenes and two distinct plot events."
            }
            QualityDimension::Conflict => {
                "Escalate conflict episode by episode and pay it off with a cathartic turn."
            }
            QualityDimension::Pacing => {
                "Open each episode with a strong hook line and end it on a cliffhanger that carries the main line forward."
            }
            QualityDimension::Dialogue => {
                "Give most scenes a spoken line and end each episode on a spoken cliffhanger."
            }
            QualityDimension::Visual => "Specify shot type and composition for every scene.",
        };
        directives.push_str(&format!("- Improve {dimension}: {directive}\n"));
    }
    for issue in &document.quality_metrics.issues {
        directives.push_str(&format!("- Fix: {issue}\n"));
    }
    if directives.is_empty() {
        directives.push_str("- Tighten pacing and sharpen dialogue.\n");
    }

    let user = format!(
        "Rewrite the storyboard for this {} short drama. Keep the story and the per-episode \
bookkeeping below; improve only what the directives ask for. Each episode runs about \
{target_seconds} seconds.\n\n\
Directives:\n{directives}\n\
Existing episodes:\n{}\n\
Use exactly this format for every scene:\n{SCENE_FORMAT}\n\n\
Story:\n{adapted_story}",
        document.metadata.story_type,
        episode_bookkeeping(&document.episodes),
    );
    (STORYBOARD_SYSTEM.to_string(), user)
}

/// System and user prompts for the episode-count recommendation.
pub(crate) fn episode_count(content: &str) -> (String, String) {
    let user = format!(
        "Recommend how many short-drama episodes (1 to 30, about one minute each) this source \
supports. Answer as JSON: {{\"recommendedEpisodes\": <number>, \"analysis\": \"<one paragraph>\"}}\n\n\
Source:\n{content}"
    );
    (ANALYST_SYSTEM.to_string(), user)
}

/// System and user prompts for character and location designs.
pub(crate) fn designs(document: &ScriptDocument) -> (String, String) {
    let mut locations = document
        .episodes
        .iter()
        .flat_map(|e| e.scenes.iter().map(|s| s.location.trim().to_string()))
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>();
    locations.sort();
    locations.dedup();

    let user = format!(
        "Design the recurring characters and locations for \"{}\".\n\
Answer as JSON: {{\"characters\": [{{\"name\": \"\", \"role\": \"\", \"appearance\": \"\", \
\"personality\": \"\"}}], \"sceneDesigns\": [{{\"name\": \"\", \"description\": \"\", \"mood\": \"\"}}]}}\n\n\
Locations used: {}\n\nStory:\n{}",
        document.metadata.title,
        locations.join(", "),
        document.adapted_story
    );
    (DESIGNER_SYSTEM.to_string(), user)
}

/// System and user prompts for one episode's shot list.
pub(crate) fn shots(episode: &Episode) -> (String, String) {
    let mut scenes = String::new();
    for scene in &episode.scenes {
        scenes.push_str(&format!(
            "Scene {} ({}s) at {}: {} | composition: {} | dialogue: {}\n",
            scene.scene_id,
            scene.duration,
            scene.location,
            scene.character_actions,
            scene.composition,
            scene.dialogue
        ));
    }
    let user = format!(
        "Write exactly one shot per scene for episode {} ({} scenes).\n\
Answer as JSON: {{\"shots\": [{{\"shotNumber\": 1, \"sceneId\": 1, \"shotType\": \"\", \
\"description\": \"\", \"dialogue\": \"\", \"duration\": 3}}]}}\n\nScenes:\n{scenes}",
        episode.episode_number,
        episode.scenes.len()
    );
    (DESIGNER_SYSTEM.to_string(), user)
}

/// System and user prompts for re-deriving per-episode summaries.
pub(crate) fn summaries(document: &ScriptDocument) -> (String, String) {
    let mut episodes = String::new();
    for episode in &document.episodes {
        episodes.push_str(&format!("Episode {}:\n", episode.episode_number));
        for scene in &episode.scenes {
            episodes.push_str(&format!(
                "  - {}: {} {}\n",
                scene.location, scene.character_actions, scene.dialogue
            ));
        }
    }
    let user = format!(
        "For each episode below, state its core conflict in one sentence and list two or three \
key events.\n\
Answer as JSON: {{\"episodes\": [{{\"episodeNumber\": 1, \"coreConflict\": \"\", \"keyEvents\": [\"\"]}}]}}\n\n{episodes}"
    );
    (ANALYST_SYSTEM.to_string(), user)
}
