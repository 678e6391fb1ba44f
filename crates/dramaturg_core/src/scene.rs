//! Scene records produced by the storyboard parser.

use serde::{Deserialize, Serialize};

/// Audio direction attached to a scene, carried through untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AudioDesign {
    /// Score or music cue
    pub background_music: String,
    /// Foley and sound effects
    pub sound_effects: String,
}

/// Visual direction attached to a scene, carried through untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VisualElements {
    /// Lighting notes
    pub lighting: String,
    /// Color grading / palette
    pub color_tone: String,
    /// Props visible in frame
    pub props: String,
}

/// One beat of story action.
///
/// `duration` is zero straight out of the parser and lies in the estimator's
/// clamp range once timed.
///
/// # Examples
///
/// ```
/// use dramaturg_core::Scene;
///
/// let scene = Scene {
///     scene_id: 1,
///     location: "Rooftop".to_string(),
///     dialogue: "You lied to me.".to_string(),
///     ..Default::default()
/// };
///
/// assert!(scene.has_dialogue());
/// assert!(!scene.has_composition());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Scene {
    /// Position in the script (1-based), renumbered within an episode
    pub scene_id: u32,
    /// Where the beat takes place
    pub location: String,
    /// What the characters do
    pub character_actions: String,
    /// The spoken utterance only, without speaker labels
    pub dialogue: String,
    /// Estimated on-screen seconds
    pub duration: u32,
    /// Shot-type tag plus free composition text
    pub composition: String,
    /// Emotional tone of the beat
    pub emotional_tone: String,
    /// How the beat departs from the source prose
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adaptation_note: Option<String>,
    /// Dramatic tension specific to this beat
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scene_conflict: Option<String>,
    /// Audio direction
    pub audio_design: AudioDesign,
    /// Visual direction
    pub visual_elements: VisualElements,
}

impl Scene {
    /// Whether the scene carries a spoken line.
    pub fn has_dialogue(&self) -> bool {
        !self.dialogue.trim().is_empty()
    }

    /// Whether the scene carries composition direction.
    pub fn has_composition(&self) -> bool {
        !self.composition.trim().is_empty()
    }
}
