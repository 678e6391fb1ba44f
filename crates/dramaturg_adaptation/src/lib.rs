//! The Dramaturg script-adaptation pipeline.
//!
//! Turns loosely structured model output into timed, segmented and scored
//! short-drama scripts:
//!
//! 1. [`extract_sections`] splits the adaptation answer into analysis and story
//! 2. [`parse_scenes`] reads the storyboard into [`Scene`](dramaturg_core::Scene)s
//! 3. [`estimate_duration`] times each scene
//! 4. [`EpisodeSegmenter`] packs scenes into episodes
//! 5. [`evaluate_quality`] scores the assembled document
//!
//! [`ScriptAdapter`] drives the model calls around those stages and adds the
//! optimize loop, episode-count analysis, design planning and store-backed
//! refresh.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod adapter;
mod conflict;
mod designs;
mod duration;
mod episode_count;
mod export;
mod labels;
mod optimize;
mod prompts;
mod quality;
mod refresh;
mod repair;
mod scene_parser;
mod sections;
mod segmenter;
mod structure;
mod text;

pub use adapter::{AdapterSettings, DEFAULT_EPISODE_SECONDS, ScriptAdapter};
pub use conflict::{conflict_intensity, core_conflict, key_events};
pub use designs::reconcile_shots;
pub use duration::{apply_durations, estimate_duration};
pub use episode_count::{heuristic_analysis, heuristic_episode_count, parse_recommendation};
pub use export::{ExportFormat, export_document};
pub use optimize::merge_bookkeeping;
pub use quality::evaluate_quality;
pub use refresh::{EpisodeSummary, MAX_REFRESH_ATTEMPTS, apply_summaries, scene_fingerprint};
pub use repair::{extract_json, parse_lenient, repair_json};
pub use scene_parser::{clean_dialogue, parse_scenes};
pub use sections::{ANALYSIS_PLACEHOLDER, STORY_PLACEHOLDER, Sections, extract_sections};
pub use segmenter::EpisodeSegmenter;
pub use structure::{derive_story_structure, derive_title};
