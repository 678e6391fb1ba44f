//! Design and shot-list types produced after a script exists.

use serde::{Deserialize, Serialize};

/// Visual design for a recurring character.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CharacterDesign {
    /// Character name
    pub name: String,
    /// Narrative role (protagonist, antagonist, ...)
    pub role: String,
    /// Costume, build, distinguishing features
    pub appearance: String,
    /// Temperament as it should read on screen
    pub personality: String,
}

/// Visual design for a recurring location.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SceneDesign {
    /// Location name
    pub name: String,
    /// Set description
    pub description: String,
    /// Atmosphere
    pub mood: String,
}

/// Character and location designs for a whole script.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoryboardPlan {
    /// Character designs
    pub characters: Vec<CharacterDesign>,
    /// Location designs
    pub scene_designs: Vec<SceneDesign>,
}

impl StoryboardPlan {
    /// True when the plan carries no designs at all.
    pub fn is_empty(&self) -> bool {
        self.characters.is_empty() && self.scene_designs.is_empty()
    }
}

/// One camera shot within an episode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Shot {
    /// 1-based position in the episode's shot list
    pub shot_number: u32,
    /// Scene this shot covers
    pub scene_id: u32,
    /// Shot type (close-up, wide, ...)
    pub shot_type: String,
    /// What the frame shows
    pub description: String,
    /// Line spoken during the shot
    pub dialogue: String,
    /// Seconds on screen
    pub duration: u32,
}
