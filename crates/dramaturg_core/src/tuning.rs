//! Tunable constants for duration estimation and episode segmentation.
//!
//! Both structs deserialize from the `[duration]` and `[segmentation]`
//! sections of `dramaturg.toml`; missing keys fall back to the defaults.

use serde::{Deserialize, Serialize};

/// Constants used by the duration estimator.
///
/// # Examples
///
/// ```
/// use dramaturg_core::DurationTuning;
///
/// let tuning = DurationTuning::default().with_chars_per_second(5.0);
/// assert_eq!(*tuning.chars_per_second(), 5.0);
/// assert_eq!(*tuning.max_seconds(), 15);
/// assert!(tuning.validate().is_ok());
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Serialize,
    Deserialize,
    derive_getters::Getters,
    derive_setters::Setters,
)]
#[setters(prefix = "with_")]
#[serde(default)]
pub struct DurationTuning {
    /// Spoken characters per second
    chars_per_second: f64,
    /// Seconds assumed for a scene with no dialogue
    empty_dialogue_seconds: u32,
    /// Seconds assumed for a scene with no action
    empty_action_seconds: u32,
    /// Action length (chars) up to which a beat is short
    short_action_chars: usize,
    /// Seconds for a short action beat
    short_action_seconds: u32,
    /// Action length (chars) up to which a beat is medium
    medium_action_chars: usize,
    /// Seconds for a medium action beat
    medium_action_seconds: u32,
    /// Seconds for a long action beat
    long_action_seconds: u32,
    /// Base seconds for wide or establishing shots
    wide_shot_seconds: u32,
    /// Base seconds for every other shot
    standard_shot_seconds: u32,
    /// Padding added before rounding up
    padding_seconds: f64,
    /// Lower clamp
    min_seconds: u32,
    /// Upper clamp
    max_seconds: u32,
}

impl Default for DurationTuning {
    fn default() -> Self {
        Self {
            chars_per_second: 4.0,
            empty_dialogue_seconds: 2,
            empty_action_seconds: 2,
            short_action_chars: 10,
            short_action_seconds: 2,
            medium_action_chars: 30,
            medium_action_seconds: 3,
            long_action_seconds: 4,
            wide_shot_seconds: 3,
            standard_shot_seconds: 2,
            padding_seconds: 0.5,
            min_seconds: 2,
            max_seconds: 15,
        }
    }
}

impl DurationTuning {
    /// Rejects values that would make the estimator meaningless.
    pub fn validate(&self) -> Result<(), String> {
        if self.chars_per_second.is_nan() || self.chars_per_second <= 0.0 {
            return Err(format!(
                "chars_per_second must be positive, got {}",
                self.chars_per_second
            ));
        }
        if self.padding_seconds < 0.0 {
            return Err(format!(
                "padding_seconds must not be negative, got {}",
                self.padding_seconds
            ));
        }
        if self.min_seconds == 0 || self.min_seconds > self.max_seconds {
            return Err(format!(
                "invalid clamp range [{}, {}]",
                self.min_seconds, self.max_seconds
            ));
        }
        if self.short_action_chars > self.medium_action_chars {
            return Err(format!(
                "short_action_chars ({}) exceeds medium_action_chars ({})",
                self.short_action_chars, self.medium_action_chars
            ));
        }
        Ok(())
    }
}

/// Closing band for the greedy episode segmenter.
///
/// An episode closes before scene `s` when the running duration `d` satisfies
/// `d >= soft_floor * T && d + s > soft_ceiling * T` or
/// `d >= hard_floor * T && d + s > hard_ceiling * T`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Serialize,
    Deserialize,
    derive_getters::Getters,
    derive_setters::Setters,
)]
#[setters(prefix = "with_")]
#[serde(default)]
pub struct SegmentationBand {
    /// Fraction of target reached before a soft close is considered
    soft_floor: f64,
    /// Overshoot fraction that triggers a soft close
    soft_ceiling: f64,
    /// Fraction of target reached before a hard close is considered
    hard_floor: f64,
    /// Overshoot fraction that triggers a hard close
    hard_ceiling: f64,
}

impl Default for SegmentationBand {
    fn default() -> Self {
        Self {
            soft_floor: 0.8,
            soft_ceiling: 1.2,
            hard_floor: 0.9,
            hard_ceiling: 1.3,
        }
    }
}

impl SegmentationBand {
    /// Rejects bands whose floors exceed their ceilings or are not positive.
    pub fn validate(&self) -> Result<(), String> {
        let pairs = [
            ("soft", self.soft_floor, self.soft_ceiling),
            ("hard", self.hard_floor, self.hard_ceiling),
        ];
        for (name, floor, ceiling) in pairs {
            if floor.is_nan() || floor <= 0.0 || floor > ceiling {
                return Err(format!(
                    "{name} band must satisfy 0 < floor <= ceiling, got [{floor}, {ceiling}]"
                ));
            }
        }
        Ok(())
    }
}
