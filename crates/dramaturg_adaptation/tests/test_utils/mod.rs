//! Shared fixtures for adaptation integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::Utc;
use dramaturg_core::{
    Episode, GenerateRequest, GenerateResponse, Output, QualityMetrics, Scene, ScriptDocument,
    ScriptMetadata, StoryStructure,
};
use dramaturg_error::{DramaturgResult, ModelError, ModelErrorKind};
use dramaturg_interface::DramaturgDriver;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Driver that replays scripted answers in order and records every request.
#[derive(Default)]
pub struct ScriptedDriver {
    responses: Mutex<VecDeque<Result<String, ModelErrorKind>>>,
    requests: Mutex<Vec<GenerateRequest>>,
}

impl ScriptedDriver {
    pub fn new<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            responses: Mutex::new(responses.into_iter().map(|r| Ok(r.into())).collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(kind: ModelErrorKind) -> Self {
        Self {
            responses: Mutex::new(VecDeque::from([Err(kind)])),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn push(&self, response: impl Into<String>) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(response.into()));
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<GenerateRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// User prompt of the `index`th call.
    pub fn user_prompt(&self, index: usize) -> String {
        self.requests.lock().unwrap()[index]
            .messages
            .last()
            .map(|m| m.content.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl DramaturgDriver for ScriptedDriver {
    async fn generate(&self, req: &GenerateRequest) -> DramaturgResult<GenerateResponse> {
        self.requests.lock().unwrap().push(req.clone());
        let next = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ModelErrorKind::EmptyCompletion));
        match next {
            Ok(text) => Ok(GenerateResponse {
                outputs: vec![Output::Text(text)],
            }),
            Err(kind) => Err(ModelError::new(kind).into()),
        }
    }

    fn provider_name(&self) -> &'static str {
        "scripted"
    }

    fn model_name(&self) -> &str {
        "scripted-model"
    }
}

/// An adaptation answer with explicit section markers.
pub fn adaptation_answer() -> String {
    "===analysis===\n\
【主线】A disowned heiress takes back her family company.\n\
===story===\n\
Lin Wan returns to the boardroom that cast her out and exposes the forged contract.\n"
        .to_string()
}

/// Storyboard of `count` scenes that each estimate to five seconds.
pub fn storyboard(count: usize) -> String {
    (1..=count)
        .map(|i| {
            format!(
                "Scene {i}: Location {i}\n\
- Shot type: medium\n\
- Composition: steady frame on the table\n\
- Character actions: Actor {i} storms across the crowded hall\n\
- Dialogue: Lin Wan: \"Line number {i}!\"\n\
- Emotional tone: tense\n"
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn scene(dialogue: &str, composition: &str, duration: u32) -> Scene {
    Scene {
        character_actions: "She turns away".to_string(),
        dialogue: dialogue.to_string(),
        composition: composition.to_string(),
        duration,
        ..Default::default()
    }
}

pub fn document(episodes: Vec<Episode>) -> ScriptDocument {
    ScriptDocument {
        metadata: ScriptMetadata {
            title: "Fixture".to_string(),
            episode_count: episodes.len() as u32,
            requested_episodes: episodes.len() as u32,
            total_duration: episodes.iter().map(|e| e.duration).sum(),
            story_type: "revenge".to_string(),
            generation_timestamp: Utc::now(),
        },
        adaptation_analysis: "analysis".to_string(),
        adapted_story: "story".to_string(),
        story_structure: StoryStructure::default(),
        episodes,
        quality_metrics: QualityMetrics::default(),
        raw_content: String::new(),
    }
}
