//! The adaptation orchestrator.
//!
//! [`ScriptAdapter`] sequences the model calls of a generation or
//! optimization request and feeds each response through the deterministic
//! stages: section extraction, scene parsing, duration estimation, episode
//! segmentation and quality scoring.

use crate::duration::apply_durations;
use crate::episode_count::{heuristic_analysis, parse_recommendation};
use crate::optimize::merge_bookkeeping;
use crate::prompts;
use crate::quality::evaluate_quality;
use crate::scene_parser::parse_scenes;
use crate::sections::extract_sections;
use crate::segmenter::EpisodeSegmenter;
use crate::structure::{derive_story_structure, derive_title};
use chrono::Utc;
use dramaturg_cache::SessionCache;
use dramaturg_core::{
    DurationTuning, Episode, EpisodeCountAnalysis, GenerateRequest, Message, ScriptDocument,
    ScriptMetadata, SegmentationBand,
};
use dramaturg_error::{AdaptationError, AdaptationErrorKind, DramaturgResult};
use dramaturg_interface::DramaturgDriver;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, warn};

/// Fallback per-episode duration when neither the caller nor the document
/// supplies one.
pub const DEFAULT_EPISODE_SECONDS: u32 = 60;

/// Tunables and request defaults for a [`ScriptAdapter`].
///
/// # Examples
///
/// ```
/// use dramaturg_adaptation::AdapterSettings;
///
/// let settings = AdapterSettings::default()
///     .with_temperature(Some(0.4))
///     .with_api_key(Some("sk-caller".to_string()));
/// assert_eq!(*settings.temperature(), Some(0.4));
/// assert_eq!(*settings.max_tokens(), Some(4000));
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
pub struct AdapterSettings {
    /// Duration estimator constants
    duration: DurationTuning,
    /// Segmentation band factors
    segmentation: SegmentationBand,
    /// Sampling temperature passed to every call
    temperature: Option<f32>,
    /// Completion budget passed to every call
    max_tokens: Option<u32>,
    /// Caller credential forwarded on every request
    #[serde(skip)]
    api_key: Option<String>,
}

impl Default for AdapterSettings {
    fn default() -> Self {
        Self {
            duration: DurationTuning::default(),
            segmentation: SegmentationBand::default(),
            temperature: Some(0.7),
            max_tokens: Some(4000),
            api_key: None,
        }
    }
}

/// Turns prose into a timed, segmented, scored [`ScriptDocument`].
///
/// Each public operation is one request-scoped chain of model calls; the
/// adapter holds no per-request state and can be shared behind an `Arc`.
pub struct ScriptAdapter<D: DramaturgDriver> {
    driver: D,
    settings: AdapterSettings,
    analysis_cache: Option<SessionCache<EpisodeCountAnalysis>>,
}

impl<D: DramaturgDriver> ScriptAdapter<D> {
    /// Adapter with default settings.
    pub fn new(driver: D) -> Self {
        Self::with_settings(driver, AdapterSettings::default())
    }

    /// Adapter with explicit settings.
    pub fn with_settings(driver: D, settings: AdapterSettings) -> Self {
        Self {
            driver,
            settings,
            analysis_cache: None,
        }
    }

    /// Memoize episode-count analyses per session in `cache`.
    pub fn with_analysis_cache(mut self, cache: SessionCache<EpisodeCountAnalysis>) -> Self {
        self.analysis_cache = Some(cache);
        self
    }

    /// Settings in effect.
    pub fn settings(&self) -> &AdapterSettings {
        &self.settings
    }

    /// The underlying driver.
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// One completion for `stage`; empty text is an error.
    pub(crate) async fn complete(
        &self,
        stage: &str,
        system: String,
        user: String,
    ) -> DramaturgResult<String> {
        let mut builder = GenerateRequest::builder();
        builder.messages(vec![Message::system(system), Message::user(user)]);
        if let Some(temperature) = self.settings.temperature {
            builder.temperature(temperature);
        }
        if let Some(max_tokens) = self.settings.max_tokens {
            builder.max_tokens(max_tokens);
        }
        if let Some(api_key) = &self.settings.api_key {
            builder.api_key(api_key.clone());
        }
        let request = builder.build().map_err(|e| {
            AdaptationError::new(AdaptationErrorKind::InvalidRequest(format!(
                "Failed to build request: {}",
                e
            )))
        })?;

        debug!(
            stage,
            provider = self.driver.provider_name(),
            model = self.driver.model_name(),
            "Calling model"
        );
        let response = self.driver.generate(&request).await.map_err(|e| {
            error!(stage, error = %e, "Model call failed");
            e
        })?;

        let text = response.text();
        if text.trim().is_empty() {
            error!(stage, "Model returned empty text");
            return Err(
                AdaptationError::new(AdaptationErrorKind::EmptyResponse(stage.to_string())).into(),
            );
        }
        debug!(stage, chars = text.chars().count(), "Model responded");
        Ok(text)
    }

    /// Parse, time and segment a storyboard response.
    fn episodes_from_storyboard(
        &self,
        storyboard: &str,
        target_seconds: u32,
    ) -> DramaturgResult<Vec<Episode>> {
        let segmenter = EpisodeSegmenter::new(target_seconds, self.settings.segmentation)?;
        let mut scenes = parse_scenes(storyboard).map_err(|e| {
            error!(error = %e, "Storyboard yielded no scenes");
            e
        })?;
        apply_durations(&mut scenes, &self.settings.duration);
        Ok(segmenter.segment(scenes))
    }

    /// Recommend an episode count for `content`.
    ///
    /// Asks the model first; a failed call or an unreadable answer falls back
    /// to the source-length table, so this never fails on model trouble.
    #[instrument(skip(self, content), fields(content_chars = content.chars().count()))]
    pub async fn analyze_episode_count(
        &self,
        content: &str,
    ) -> DramaturgResult<EpisodeCountAnalysis> {
        if content.trim().is_empty() {
            return Err(AdaptationError::new(AdaptationErrorKind::InvalidRequest(
                "content must not be empty".to_string(),
            ))
            .into());
        }

        let (system, user) = prompts::episode_count(content);
        let analysis = match self.complete("episode count analysis", system, user).await {
            Ok(text) => match parse_recommendation(&text) {
                Some(analysis) => analysis,
                None => {
                    warn!("Episode count answer unreadable; using length table");
                    heuristic_analysis(content)
                }
            },
            Err(e) => {
                warn!(error = %e, "Episode count call failed; using length table");
                heuristic_analysis(content)
            }
        };

        info!(
            recommended = analysis.recommended_episodes,
            source = %analysis.source,
            "Episode count analyzed"
        );
        Ok(analysis)
    }

    /// [`analyze_episode_count`](Self::analyze_episode_count) memoized per session.
    ///
    /// Without a configured cache this is a plain analysis.
    #[instrument(skip(self, content))]
    pub async fn analyze_episode_count_cached(
        &self,
        session: &str,
        content: &str,
    ) -> DramaturgResult<EpisodeCountAnalysis> {
        if let Some(cache) = &self.analysis_cache
            && let Some(hit) = cache.get(session).await
        {
            debug!("Episode count served from session cache");
            return Ok(hit);
        }
        let analysis = self.analyze_episode_count(content).await?;
        if let Some(cache) = &self.analysis_cache {
            cache.insert(session, analysis.clone()).await;
        }
        Ok(analysis)
    }

    /// Generate a full script document from prose.
    ///
    /// Makes two model calls: story adaptation, then storyboard breakdown.
    ///
    /// # Errors
    ///
    /// - `InvalidRequest` for empty content, an episode count outside 1..=30
    ///   or a zero episode duration
    /// - any driver error, or `EmptyResponse` for a blank completion
    /// - `NoScenesParsed` when the storyboard has no recognizable scenes
    #[instrument(skip(self, content), fields(content_chars = content.chars().count()))]
    pub async fn generate_script(
        &self,
        content: &str,
        episode_count: u32,
        duration_per_episode: u32,
        story_type: &str,
    ) -> DramaturgResult<ScriptDocument> {
        validate_generation(content, episode_count, duration_per_episode)?;

        let (system, user) =
            prompts::adaptation(content, episode_count, duration_per_episode, story_type);
        let adaptation = self.complete("story adaptation", system, user).await?;
        let sections = extract_sections(&adaptation);
        if sections.story_missing() {
            warn!("Adaptation response had no recognizable story; continuing with placeholder");
        }

        let (system, user) = prompts::storyboard(
            &sections.story,
            episode_count,
            duration_per_episode,
            story_type,
        );
        let storyboard = self.complete("storyboard breakdown", system, user).await?;
        let episodes = self.episodes_from_storyboard(&storyboard, duration_per_episode)?;

        let mut document = ScriptDocument {
            metadata: ScriptMetadata {
                title: derive_title(content),
                episode_count: episodes.len() as u32,
                requested_episodes: episode_count,
                total_duration: episodes.iter().map(|e| e.duration).sum(),
                story_type: story_type.to_string(),
                generation_timestamp: Utc::now(),
            },
            adaptation_analysis: sections.analysis,
            adapted_story: sections.story,
            story_structure: derive_story_structure(&episodes),
            episodes,
            quality_metrics: Default::default(),
            raw_content: format!("{}\n\n{}", adaptation.trim_end(), storyboard.trim_end()),
        };
        document.quality_metrics = evaluate_quality(&document, episode_count);

        info!(
            episodes = document.episodes.len(),
            scenes = document.scene_count(),
            total_duration = document.metadata.total_duration,
            overall = document.quality_metrics.overall_score,
            status = %document.quality_metrics.quality_status,
            "Script generated"
        );
        Ok(document)
    }

    /// Regenerate a document's storyboard to address its quality issues.
    ///
    /// The per-episode target is `duration_per_episode`, else the document's
    /// average episode length, else 60 seconds. Regenerated episodes keep the
    /// original core conflict, key events and hook where those are
    /// non-trivial. The result is re-scored against the episode count the
    /// caller originally requested.
    ///
    /// # Errors
    ///
    /// Same as [`generate_script`](Self::generate_script) for the single
    /// storyboard call.
    #[instrument(
        skip(self, document, content),
        fields(
            episodes = document.episodes.len(),
            overall = document.quality_metrics.overall_score
        )
    )]
    pub async fn optimize_script(
        &self,
        document: &ScriptDocument,
        content: &str,
        duration_per_episode: Option<u32>,
    ) -> DramaturgResult<ScriptDocument> {
        if duration_per_episode == Some(0) {
            return Err(AdaptationError::new(AdaptationErrorKind::InvalidRequest(
                "episode duration must be positive".to_string(),
            ))
            .into());
        }
        let target = duration_per_episode
            .or_else(|| document.implied_episode_duration())
            .unwrap_or(DEFAULT_EPISODE_SECONDS);

        let story = if document.adapted_story.trim().is_empty() {
            warn!("Document has no adapted story; restating the source instead");
            content
        } else {
            document.adapted_story.as_str()
        };
        let failing = document.quality_metrics.failing_dimensions();
        debug!(target, failing = ?failing, "Optimizing storyboard");

        let (system, user) = prompts::optimization(document, story, &failing, target);
        let storyboard = self.complete("storyboard optimization", system, user).await?;
        let regenerated = self.episodes_from_storyboard(&storyboard, target)?;
        let episodes = merge_bookkeeping(&document.episodes, regenerated);

        let mut optimized = document.clone();
        optimized.metadata.episode_count = episodes.len() as u32;
        optimized.metadata.total_duration = episodes.iter().map(|e| e.duration).sum();
        optimized.metadata.generation_timestamp = Utc::now();
        optimized.story_structure = derive_story_structure(&episodes);
        optimized.episodes = episodes;
        optimized.raw_content = format!(
            "{}\n\n{}",
            document.raw_content.trim_end(),
            storyboard.trim_end()
        );
        optimized.quality_metrics = evaluate_quality(&optimized, document.completeness_target());

        info!(
            before = document.quality_metrics.overall_score,
            after = optimized.quality_metrics.overall_score,
            episodes = optimized.episodes.len(),
            "Script optimized"
        );
        Ok(optimized)
    }
}

fn validate_generation(
    content: &str,
    episode_count: u32,
    duration_per_episode: u32,
) -> DramaturgResult<()> {
    let problem = if content.trim().is_empty() {
        Some("content must not be empty".to_string())
    } else if !(EpisodeCountAnalysis::MIN_EPISODES..=EpisodeCountAnalysis::MAX_EPISODES)
        .contains(&episode_count)
    {
        Some(format!(
            "episode count must be between {} and {}, got {}",
            EpisodeCountAnalysis::MIN_EPISODES,
            EpisodeCountAnalysis::MAX_EPISODES,
            episode_count
        ))
    } else if duration_per_episode == 0 {
        Some("episode duration must be positive".to_string())
    } else {
        None
    };
    match problem {
        Some(message) => {
            error!(%message, "Rejected generation request");
            Err(AdaptationError::new(AdaptationErrorKind::InvalidRequest(message)).into())
        }
        None => Ok(()),
    }
}
