//! Core data types for the Dramaturg script-adaptation pipeline.
//!
//! This crate provides the script document model (scenes, episodes, quality
//! metrics), the message types exchanged with model drivers, and the tunable
//! parameters of the timing heuristics.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod analysis;
mod document;
mod episode;
mod message;
mod output;
mod quality;
mod request;
mod role;
mod scene;
mod storyboard;
mod tuning;

pub use analysis::{AnalysisSource, EpisodeCountAnalysis};
pub use document::{ScriptDocument, ScriptMetadata, StoryStructure};
pub use episode::Episode;
pub use message::{Message, MessageBuilder, MessageBuilderError};
pub use output::Output;
pub use quality::{QualityDimension, QualityMetrics, QualityStatus};
pub use request::{
    GenerateRequest, GenerateRequestBuilder, GenerateRequestBuilderError, GenerateResponse,
};
pub use role::Role;
pub use scene::{AudioDesign, Scene, VisualElements};
pub use storyboard::{CharacterDesign, SceneDesign, Shot, StoryboardPlan};
pub use tuning::{DurationTuning, SegmentationBand};
