//! Quality scoring types.

use serde::{Deserialize, Serialize};

/// Verdict derived from the overall score.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Default,
    strum::Display,
    strum::EnumIter,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum QualityStatus {
    /// Overall score at or above 8
    Pass,
    /// Overall score in [6, 8)
    #[default]
    RevisionNeeded,
    /// Overall score below 6
    Fail,
}

impl QualityStatus {
    /// Overall score needed for a pass.
    pub const PASS_THRESHOLD: f64 = 8.0;
    /// Overall score below which the script fails.
    pub const FAIL_THRESHOLD: f64 = 6.0;

    /// Classifies an overall score.
    ///
    /// # Examples
    ///
    /// ```
    /// use dramaturg_core::QualityStatus;
    ///
    /// assert_eq!(QualityStatus::from_score(8.0), QualityStatus::Pass);
    /// assert_eq!(QualityStatus::from_score(7.9), QualityStatus::RevisionNeeded);
    /// assert_eq!(QualityStatus::from_score(5.9), QualityStatus::Fail);
    /// ```
    pub fn from_score(overall: f64) -> Self {
        if overall >= Self::PASS_THRESHOLD {
            QualityStatus::Pass
        } else if overall < Self::FAIL_THRESHOLD {
            QualityStatus::Fail
        } else {
            QualityStatus::RevisionNeeded
        }
    }
}

/// The five scored dimensions.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
)]
#[serde(rename_all = "camelCase")]
pub enum QualityDimension {
    /// Episode completeness and per-episode structure
    #[strum(serialize = "story structure")]
    Structure,
    /// Escalation and payoff of conflict
    #[strum(serialize = "conflict escalation")]
    Conflict,
    /// Hooks, cliffhangers and rhythm
    #[strum(serialize = "pacing")]
    Pacing,
    /// Presence and quality of spoken lines
    #[strum(serialize = "dialogue")]
    Dialogue,
    /// Shot and composition direction
    #[strum(serialize = "visual direction")]
    Visual,
}

/// Scores and diagnostics for a script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityMetrics {
    /// Structure score, 1..=10
    pub structure_score: u8,
    /// Conflict score, 1..=10
    pub conflict_score: u8,
    /// Pacing score, 1..=10
    pub pacing_score: u8,
    /// Dialogue score, 1..=10
    pub dialogue_score: u8,
    /// Visual score, 1..=10
    pub visual_score: u8,
    /// Mean of the five scores, one decimal
    pub overall_score: f64,
    /// Verdict derived from `overall_score`
    pub quality_status: QualityStatus,
    /// Problems found, in check order
    pub issues: Vec<String>,
    /// Suggested fixes, advisory first
    pub suggestions: Vec<String>,
}

impl QualityMetrics {
    /// Score for one dimension.
    pub fn score(&self, dimension: QualityDimension) -> u8 {
        match dimension {
            QualityDimension::Structure => self.structure_score,
            QualityDimension::Conflict => self.conflict_score,
            QualityDimension::Pacing => self.pacing_score,
            QualityDimension::Dialogue => self.dialogue_score,
            QualityDimension::Visual => self.visual_score,
        }
    }

    /// Dimensions scoring below the pass threshold.
    pub fn failing_dimensions(&self) -> Vec<QualityDimension> {
        use strum::IntoEnumIterator;
        QualityDimension::iter()
            .filter(|dimension| f64::from(self.score(*dimension)) < QualityStatus::PASS_THRESHOLD)
            .collect()
    }
}

impl Default for QualityMetrics {
    fn default() -> Self {
        Self {
            structure_score: 1,
            conflict_score: 1,
            pacing_score: 1,
            dialogue_score: 1,
            visual_score: 1,
            overall_score: 1.0,
            quality_status: QualityStatus::Fail,
            issues: Vec::new(),
            suggestions: Vec::new(),
        }
    }
}
