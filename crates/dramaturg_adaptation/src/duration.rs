//! Estimated on-screen seconds for a scene.
//!
//! The model does not emit usable timing, so duration comes from content
//! density: the slowest of speech, action and shot type, plus a transition
//! buffer, clamped to the tuning's range.

use crate::text::{char_len, is_quote};
use dramaturg_core::{DurationTuning, Scene};

const WIDE_SHOT_MARKERS: &[&str] = &[
    "大远景",
    "远景",
    "全景",
    "wide",
    "establishing",
    "long shot",
    "extreme long",
];

fn spoken_chars(dialogue: &str) -> usize {
    dialogue
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_ascii_punctuation() && !is_quote(*c))
        .filter(|c| !is_cjk_punctuation(*c))
        .count()
}

fn is_cjk_punctuation(c: char) -> bool {
    matches!(
        c,
        '，' | '。' | '！' | '？' | '、' | '；' | '：' | '…' | '—' | '～' | '（' | '）' | '·'
    )
}

fn dialogue_seconds(scene: &Scene, tuning: &DurationTuning) -> f64 {
    let chars = spoken_chars(&scene.dialogue);
    if chars == 0 {
        return f64::from(*tuning.empty_dialogue_seconds());
    }
    (chars as f64 / tuning.chars_per_second()).ceil()
}

fn action_seconds(scene: &Scene, tuning: &DurationTuning) -> f64 {
    let len = char_len(scene.character_actions.trim());
    let seconds = if len == 0 {
        *tuning.empty_action_seconds()
    } else if len <= *tuning.short_action_chars() {
        *tuning.short_action_seconds()
    } else if len <= *tuning.medium_action_chars() {
        *tuning.medium_action_seconds()
    } else {
        *tuning.long_action_seconds()
    };
    f64::from(seconds)
}

fn shot_seconds(scene: &Scene, tuning: &DurationTuning) -> f64 {
    let composition = scene.composition.to_lowercase();
    let wide = WIDE_SHOT_MARKERS
        .iter()
        .any(|marker| composition.contains(marker));
    let seconds = if wide {
        *tuning.wide_shot_seconds()
    } else {
        *tuning.standard_shot_seconds()
    };
    f64::from(seconds)
}

/// Estimated duration of one scene, in seconds.
///
/// # Examples
///
/// ```
/// use dramaturg_adaptation::estimate_duration;
/// use dramaturg_core::{DurationTuning, Scene};
///
/// let scene = Scene {
///     dialogue: "你以为我还会回来吗".to_string(),
///     character_actions: "她转身".to_string(),
///     ..Default::default()
/// };
/// // 9 spoken chars / 4 = 3 (rounded up), + 0.5, rounded up
/// assert_eq!(estimate_duration(&scene, &DurationTuning::default()), 4);
/// ```
pub fn estimate_duration(scene: &Scene, tuning: &DurationTuning) -> u32 {
    let longest = dialogue_seconds(scene, tuning)
        .max(action_seconds(scene, tuning))
        .max(shot_seconds(scene, tuning));
    let padded = (longest + tuning.padding_seconds()).ceil();
    let clamped = padded.clamp(
        f64::from(*tuning.min_seconds()),
        f64::from(*tuning.max_seconds()),
    );
    clamped as u32
}

/// Fill in `duration` for every scene.
pub fn apply_durations(scenes: &mut [Scene], tuning: &DurationTuning) {
    for scene in scenes.iter_mut() {
        scene.duration = estimate_duration(scene, tuning);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn scene(dialogue: &str, action: &str, composition: &str) -> Scene {
        Scene {
            dialogue: dialogue.to_string(),
            character_actions: action.to_string(),
            composition: composition.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn empty_scene_gets_floor() {
        // max(2, 2, 2) + 0.5 -> 3
        assert_eq!(estimate_duration(&scene("", "", ""), &DurationTuning::default()), 3);
    }

    #[test]
    fn wide_shot_raises_base() {
        assert_eq!(
            estimate_duration(&scene("", "", "[远景] 城市"), &DurationTuning::default()),
            4
        );
        assert_eq!(
            estimate_duration(&scene("", "", "[Wide] skyline"), &DurationTuning::default()),
            4
        );
    }

    #[test]
    fn action_buckets() {
        let tuning = DurationTuning::default();
        let medium = "a".repeat(20);
        let long = "a".repeat(31);
        assert_eq!(estimate_duration(&scene("", &medium, ""), &tuning), 4);
        assert_eq!(estimate_duration(&scene("", &long, ""), &tuning), 5);
    }

    #[test]
    fn punctuation_and_quotes_are_not_spoken() {
        assert_eq!(spoken_chars("“你好，世界！”"), 4);
        assert_eq!(spoken_chars("Hi, you!"), 5);
    }

    #[test]
    fn long_monologue_is_clamped() {
        let line = "字".repeat(200);
        assert_eq!(estimate_duration(&scene(&line, "", ""), &DurationTuning::default()), 15);
    }

    #[test]
    fn generated_scenes_stay_in_range() {
        const FRAGMENTS: &[&str] = &[
            "",
            " ",
            "字",
            "“",
            "，",
            "word ",
            "!?",
            "远景",
            "Wide",
            "\n",
            "…",
        ];
        let mut rng = StdRng::seed_from_u64(0x2f15);
        let text = |rng: &mut StdRng| {
            let pieces = rng.gen_range(0..=120usize);
            (0..pieces)
                .map(|_| FRAGMENTS[rng.gen_range(0..FRAGMENTS.len())])
                .collect::<String>()
        };
        let tuning = DurationTuning::default();
        for _ in 0..1000 {
            let dialogue = text(&mut rng);
            let action = text(&mut rng);
            let composition = text(&mut rng);
            let seconds = estimate_duration(&scene(&dialogue, &action, &composition), &tuning);
            assert!(
                (2..=15).contains(&seconds),
                "{} seconds for {:?} / {:?} / {:?}",
                seconds,
                dialogue,
                action,
                composition
            );
        }
    }

    #[test]
    fn custom_tuning_is_honored() {
        let tuning = DurationTuning::default().with_chars_per_second(2.0);
        // 8 chars / 2 = 4, + 0.5 -> 5
        assert_eq!(estimate_duration(&scene("12345678", "", ""), &tuning), 5);
    }
}
