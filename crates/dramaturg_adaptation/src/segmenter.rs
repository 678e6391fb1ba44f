//! Greedy packing of scenes into episodes.

use crate::conflict::{conflict_intensity, core_conflict, key_events};
use dramaturg_core::{Episode, Scene, SegmentationBand};
use dramaturg_error::{AdaptationError, AdaptationErrorKind, DramaturgResult};
use tracing::{debug, instrument};

/// Groups a flat scene list into episodes near a target duration.
///
/// Scenes are consumed left to right. With running duration `d`, the
/// current episode closes before a scene of length `s` when
/// `d >= 0.8T && d + s > 1.2T` or `d >= 0.9T && d + s > 1.3T` (default
/// band). Scenes are never split; the remainder forms the last episode.
///
/// # Examples
///
/// ```
/// use dramaturg_adaptation::EpisodeSegmenter;
/// use dramaturg_core::{Scene, SegmentationBand};
///
/// let scenes = (0..12)
///     .map(|_| Scene { duration: 5, ..Default::default() })
///     .collect::<Vec<_>>();
/// let episodes = EpisodeSegmenter::new(20, SegmentationBand::default())
///     .unwrap()
///     .segment(scenes);
/// assert_eq!(episodes.len(), 3);
/// assert!(episodes.iter().all(|e| e.duration == 20));
/// ```
#[derive(Debug, Clone, derive_getters::Getters)]
pub struct EpisodeSegmenter {
    target_seconds: u32,
    band: SegmentationBand,
}

impl EpisodeSegmenter {
    /// Segmenter for a per-episode target in seconds.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRequest` for a zero target or an invalid band.
    pub fn new(target_seconds: u32, band: SegmentationBand) -> DramaturgResult<Self> {
        if target_seconds == 0 {
            return Err(AdaptationError::new(AdaptationErrorKind::InvalidRequest(
                "episode duration must be positive".to_string(),
            ))
            .into());
        }
        band.validate()
            .map_err(|e| AdaptationError::new(AdaptationErrorKind::InvalidRequest(e)))?;
        Ok(Self {
            target_seconds,
            band,
        })
    }

    fn should_close(&self, running: u32, next: u32) -> bool {
        let target = f64::from(self.target_seconds);
        let d = f64::from(running);
        let d_next = f64::from(running + next);
        (d >= self.band.soft_floor() * target && d_next > self.band.soft_ceiling() * target)
            || (d >= self.band.hard_floor() * target && d_next > self.band.hard_ceiling() * target)
    }

    /// Split timed scenes into numbered episodes.
    #[instrument(skip(self, scenes), fields(scenes = scenes.len(), target = self.target_seconds))]
    pub fn segment(&self, scenes: Vec<Scene>) -> Vec<Episode> {
        let mut groups: Vec<Vec<Scene>> = Vec::new();
        let mut buffer: Vec<Scene> = Vec::new();
        let mut running = 0u32;

        for scene in scenes {
            if !buffer.is_empty() && self.should_close(running, scene.duration) {
                groups.push(std::mem::take(&mut buffer));
                running = 0;
            }
            running += scene.duration;
            buffer.push(scene);
        }
        if !buffer.is_empty() {
            groups.push(buffer);
        }

        let total = groups.len();
        let episodes = groups
            .into_iter()
            .enumerate()
            .map(|(index, scenes)| build_episode(index, total, scenes))
            .collect::<Vec<_>>();

        debug!(
            episodes = episodes.len(),
            durations = ?episodes.iter().map(|e| e.duration).collect::<Vec<_>>(),
            "Segmented scenes"
        );
        episodes
    }
}

/// Assemble episode `index` of `total` from its scenes.
pub(crate) fn build_episode(index: usize, total: usize, mut scenes: Vec<Scene>) -> Episode {
    for (i, scene) in scenes.iter_mut().enumerate() {
        scene.scene_id = i as u32 + 1;
    }

    let hook = scenes.first().map(|s| s.dialogue.clone()).unwrap_or_default();
    let cliffhanger = scenes.last().map(|s| s.dialogue.clone()).unwrap_or_default();

    let mut episode = Episode {
        episode_number: index as u32 + 1,
        duration: 0,
        core_conflict: core_conflict(&scenes),
        conflict_intensity: conflict_intensity(index, total),
        key_events: key_events(&scenes),
        hook,
        cliffhanger,
        scenes,
    };
    episode.recompute_duration();
    episode
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::duration::apply_durations;
    use dramaturg_core::DurationTuning;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn timed(durations: &[u32]) -> Vec<Scene> {
        durations
            .iter()
            .map(|d| Scene {
                duration: *d,
                ..Default::default()
            })
            .collect()
    }

    fn segment(durations: &[u32], target: u32) -> Vec<Episode> {
        EpisodeSegmenter::new(target, SegmentationBand::default())
            .unwrap()
            .segment(timed(durations))
    }

    #[test]
    fn trailing_oversized_scene_forms_own_episode() {
        let mut durations = vec![5; 12];
        durations.push(15);
        let episodes = segment(&durations, 20);
        let lengths = episodes.iter().map(|e| e.duration).collect::<Vec<_>>();
        assert_eq!(lengths, vec![20, 20, 20, 15]);
    }

    #[test]
    fn episode_may_overshoot_within_ceiling() {
        // d = 17 (>= 0.8T) and 17 + 6 = 23 <= 24: stay; 23 + 3 = 26 > 24 closes.
        let episodes = segment(&[9, 8, 6, 3], 20);
        let lengths = episodes.iter().map(|e| e.duration).collect::<Vec<_>>();
        assert_eq!(lengths, vec![23, 3]);
    }

    #[test]
    fn single_scene_is_one_episode() {
        let episodes = segment(&[15], 60);
        assert_eq!(episodes.len(), 1);
        assert_eq!(episodes[0].episode_number, 1);
        assert_eq!(episodes[0].conflict_intensity, 5);
    }

    #[test]
    fn scene_ids_restart_per_episode() {
        let episodes = segment(&[5; 8], 20);
        for episode in &episodes {
            let ids = episode.scenes.iter().map(|s| s.scene_id).collect::<Vec<_>>();
            assert_eq!(ids, (1..=episode.scenes.len() as u32).collect::<Vec<_>>());
        }
    }

    #[test]
    fn episode_count_stays_within_floor_bound() {
        let mut rng = StdRng::seed_from_u64(0x5e6);
        for _ in 0..500 {
            let target = rng.gen_range(10..=120u32);
            let len = rng.gen_range(1..=60usize);
            let durations = (0..len)
                .map(|_| rng.gen_range(2..=15u32))
                .collect::<Vec<_>>();
            let total = durations.iter().sum::<u32>();

            let episodes = segment(&durations, target);

            let bound = (5 * total).div_ceil(4 * target) as usize + 1;
            assert!(
                episodes.len() <= bound,
                "{} episodes for {:?} at target {}",
                episodes.len(),
                durations,
                target
            );
            // every episode but the last closed at or above the soft floor
            for episode in &episodes[..episodes.len() - 1] {
                assert!(5 * episode.duration >= 4 * target);
            }
            let numbers = episodes.iter().map(|e| e.episode_number).collect::<Vec<_>>();
            assert_eq!(numbers, (1..=episodes.len() as u32).collect::<Vec<_>>());
            assert_eq!(episodes.iter().map(|e| e.duration).sum::<u32>(), total);
            assert_eq!(episodes.iter().map(|e| e.scenes.len()).sum::<usize>(), len);
        }
    }

    #[test]
    fn estimated_scenes_sum_to_episode_durations() {
        const DIALOGUE: &[&str] = &["", "你好", "“你以为我还会回来吗？”", "Not now.", "……"];
        const ACTION: &[&str] = &[
            "",
            "她转身",
            "He slams the door and walks out into the rain",
        ];
        const COMPOSITION: &[&str] = &["", "[特写] 手", "[远景] 城市", "[Wide] skyline", "中景"];

        let mut rng = StdRng::seed_from_u64(0xd0c);
        let tuning = DurationTuning::default();
        for _ in 0..200 {
            let len = rng.gen_range(1..=40usize);
            let mut scenes = (0..len)
                .map(|_| {
                    let repeat = rng.gen_range(1..=30usize);
                    Scene {
                        dialogue: DIALOGUE[rng.gen_range(0..DIALOGUE.len())].repeat(repeat),
                        character_actions: ACTION[rng.gen_range(0..ACTION.len())].to_string(),
                        composition: COMPOSITION[rng.gen_range(0..COMPOSITION.len())].to_string(),
                        ..Default::default()
                    }
                })
                .collect::<Vec<_>>();
            apply_durations(&mut scenes, &tuning);

            let target = rng.gen_range(15..=90u32);
            let episodes = EpisodeSegmenter::new(target, SegmentationBand::default())
                .unwrap()
                .segment(scenes);

            for episode in &episodes {
                assert!(episode.scenes.iter().all(|s| (2..=15).contains(&s.duration)));
                assert_eq!(
                    episode.duration,
                    episode.scenes.iter().map(|s| s.duration).sum::<u32>()
                );
                let ids = episode.scenes.iter().map(|s| s.scene_id).collect::<Vec<_>>();
                assert_eq!(ids, (1..=episode.scenes.len() as u32).collect::<Vec<_>>());
            }
        }
    }

    #[test]
    fn zero_target_is_rejected() {
        assert!(EpisodeSegmenter::new(0, SegmentationBand::default()).is_err());
    }
}
