//! Character, location and shot planning for a finished script.

use crate::adapter::ScriptAdapter;
use crate::prompts;
use crate::repair::parse_lenient;
use dramaturg_core::{Episode, Scene, ScriptDocument, Shot, StoryboardPlan};
use dramaturg_error::DramaturgResult;
use dramaturg_interface::DramaturgDriver;
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

const DEFAULT_SHOT_TYPE: &str = "medium";

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ShotsPayload {
    Wrapped { shots: Vec<Shot> },
    Bare(Vec<Shot>),
}

impl ShotsPayload {
    fn into_shots(self) -> Vec<Shot> {
        match self {
            ShotsPayload::Wrapped { shots } | ShotsPayload::Bare(shots) => shots,
        }
    }
}

/// Splits `"[close-up] slow push"` into `("close-up", "slow push")`.
fn split_composition(composition: &str) -> (Option<&str>, &str) {
    let trimmed = composition.trim();
    if let Some(rest) = trimmed.strip_prefix('[')
        && let Some(end) = rest.find(']')
    {
        let tag = rest[..end].trim();
        let tail = rest[end + 1..].trim();
        return ((!tag.is_empty()).then_some(tag), tail);
    }
    (None, trimmed)
}

fn shot_from_scene(position: usize, scene: &Scene) -> Shot {
    let (tag, framing) = split_composition(&scene.composition);
    let description = match (framing.is_empty(), scene.character_actions.trim().is_empty()) {
        (false, false) => format!("{}; {}", framing, scene.character_actions.trim()),
        (false, true) => framing.to_string(),
        (true, _) => scene.character_actions.trim().to_string(),
    };
    Shot {
        shot_number: position as u32 + 1,
        scene_id: scene.scene_id,
        shot_type: tag.unwrap_or(DEFAULT_SHOT_TYPE).to_string(),
        description,
        dialogue: scene.dialogue.clone(),
        duration: scene.duration,
    }
}

/// Shots for `episode`, one per scene.
///
/// Model shots are kept (renumbered by position) when their count matches the
/// episode's scenes; otherwise the list is rebuilt from the scenes with the
/// shot type taken from each composition's `[tag]`.
///
/// # Examples
///
/// ```
/// use dramaturg_adaptation::reconcile_shots;
/// use dramaturg_core::{Episode, Scene};
///
/// let episode = Episode {
///     scenes: vec![Scene {
///         scene_id: 1,
///         composition: "[close-up] her trembling hands".to_string(),
///         duration: 4,
///         ..Default::default()
///     }],
///     ..Default::default()
/// };
/// let shots = reconcile_shots(&episode, Vec::new());
/// assert_eq!(shots.len(), 1);
/// assert_eq!(shots[0].shot_type, "close-up");
/// assert_eq!(shots[0].duration, 4);
/// ```
pub fn reconcile_shots(episode: &Episode, shots: Vec<Shot>) -> Vec<Shot> {
    if shots.len() == episode.scenes.len() {
        return shots
            .into_iter()
            .enumerate()
            .map(|(i, mut shot)| {
                shot.shot_number = i as u32 + 1;
                shot
            })
            .collect();
    }
    warn!(
        episode = episode.episode_number,
        shots = shots.len(),
        scenes = episode.scenes.len(),
        "Shot count mismatch; rebuilding from scenes"
    );
    episode
        .scenes
        .iter()
        .enumerate()
        .map(|(i, scene)| shot_from_scene(i, scene))
        .collect()
}

impl<D: DramaturgDriver> ScriptAdapter<D> {
    /// Character and location designs for a script.
    ///
    /// # Errors
    ///
    /// Driver errors, an empty completion, or `UnparseableStructure` when
    /// nothing in the answer can be salvaged.
    #[instrument(skip(self, document), fields(title = %document.metadata.title))]
    pub async fn plan_designs(&self, document: &ScriptDocument) -> DramaturgResult<StoryboardPlan> {
        let (system, user) = prompts::designs(document);
        let text = self.complete("design planning", system, user).await?;
        let plan = parse_lenient::<StoryboardPlan>(&text)?;
        if plan.is_empty() {
            warn!("Design plan came back empty");
        }
        info!(
            characters = plan.characters.len(),
            scene_designs = plan.scene_designs.len(),
            "Designs planned"
        );
        Ok(plan)
    }

    /// Shot list for one episode, reconciled against its scenes.
    ///
    /// # Errors
    ///
    /// Driver errors or an empty completion. An unparseable answer is not an
    /// error: the shots are rebuilt from the scenes.
    #[instrument(skip(self, episode), fields(episode = episode.episode_number, scenes = episode.scenes.len()))]
    pub async fn plan_shots(&self, episode: &Episode) -> DramaturgResult<Vec<Shot>> {
        let (system, user) = prompts::shots(episode);
        let text = self.complete("shot planning", system, user).await?;
        let shots = match parse_lenient::<ShotsPayload>(&text) {
            Ok(payload) => payload.into_shots(),
            Err(e) => {
                warn!(error = %e, "Shot list unreadable; rebuilding from scenes");
                Vec::new()
            }
        };
        let shots = reconcile_shots(episode, shots);
        debug!(shots = shots.len(), "Shots planned");
        Ok(shots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composition_tag_is_split_off() {
        assert_eq!(split_composition("[wide] skyline"), (Some("wide"), "skyline"));
        assert_eq!(split_composition("handheld"), (None, "handheld"));
        assert_eq!(split_composition("[] x"), (None, "x"));
    }

    #[test]
    fn untagged_scene_gets_default_shot_type() {
        let scene = Scene {
            scene_id: 3,
            character_actions: "She runs".to_string(),
            dialogue: "Wait!".to_string(),
            duration: 5,
            ..Default::default()
        };
        let shot = shot_from_scene(0, &scene);
        assert_eq!(shot.shot_type, DEFAULT_SHOT_TYPE);
        assert_eq!(shot.description, "She runs");
        assert_eq!(shot.scene_id, 3);
        assert_eq!(shot.dialogue, "Wait!");
    }

    #[test]
    fn matching_count_keeps_model_shots() {
        let episode = Episode {
            scenes: vec![Scene::default(), Scene::default()],
            ..Default::default()
        };
        let shots = vec![
            Shot {
                shot_number: 7,
                shot_type: "crane".to_string(),
                ..Default::default()
            },
            Shot::default(),
        ];
        let reconciled = reconcile_shots(&episode, shots);
        assert_eq!(reconciled[0].shot_type, "crane");
        assert_eq!(reconciled[0].shot_number, 1);
        assert_eq!(reconciled[1].shot_number, 2);
    }
}
