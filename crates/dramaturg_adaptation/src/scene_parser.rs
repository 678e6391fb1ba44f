//! Storyboard text to [`Scene`] records.
//!
//! The primary strategy splits the text at strict `Scene N: location`
//! headers and pulls each labeled field out of the block with its own
//! pattern. When that finds nothing, a line-oriented state machine accepts
//! looser headers (`场景三`, `第3场`, `Scene 3`) and maps bullet lines to
//! fields by label containment.

use crate::labels::{LOOSE_SCENE_HEADER, SCENE_HEADER, SceneField, parse_numeral};
use crate::text::is_quote;
use dramaturg_core::Scene;
use dramaturg_error::{AdaptationError, AdaptationErrorKind, DramaturgResult};
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;
use tracing::{debug, error, instrument, warn};

static FIELD_PATTERNS: LazyLock<HashMap<SceneField, Regex>> = LazyLock::new(|| {
    use strum::IntoEnumIterator;
    SceneField::iter()
        .map(|field| (field, field.pattern()))
        .collect()
});

static QUOTED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"“([^”]*)”|"([^"]*)"|「([^」]*)」|『([^』]*)』|‘([^’]*)’"#)
        .expect("Valid quoted utterance regex")
});

static SPEAKER_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^:：\n]{1,20}[:：][ \t]*(.+)$").expect("Valid speaker prefix regex")
});

static BULLET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[ \t]*(?:[-*•·]|\d+[.)、])[ \t]*").expect("Valid bullet regex"));

const NEGATIONS: &[&str] = &[
    "无",
    "没有",
    "暂无",
    "无对白",
    "无台词",
    "none",
    "no dialogue",
    "n/a",
];

/// Reduce a raw dialogue field to the spoken utterance only.
///
/// Quoted utterances win and are joined with a space; otherwise a leading
/// `speaker:` prefix is dropped. Literal negations ("无", "none", ...) become
/// empty.
///
/// # Examples
///
/// ```
/// use dramaturg_adaptation::clean_dialogue;
///
/// assert_eq!(clean_dialogue("林晚（冷笑）：“你也配？”"), "你也配？");
/// assert_eq!(clean_dialogue("Mark: Get out."), "Get out.");
/// assert_eq!(clean_dialogue("无"), "");
/// ```
pub fn clean_dialogue(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return String::new();
    }

    let quoted = QUOTED
        .captures_iter(raw)
        .filter_map(|caps| caps.iter().skip(1).flatten().next().map(|m| m.as_str().trim()))
        .filter(|utterance| !utterance.is_empty())
        .collect::<Vec<_>>();

    let text = if quoted.is_empty() {
        SPEAKER_PREFIX
            .captures(raw)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
            .unwrap_or(raw)
            .to_string()
    } else {
        quoted.join(" ")
    };

    let bare = text
        .trim_matches(|c: char| c.is_whitespace() || is_quote(c) || matches!(c, '(' | ')' | '（' | '）'))
        .trim_end_matches(['。', '.', '!', '！']);
    if NEGATIONS.contains(&bare.to_lowercase().as_str()) {
        return String::new();
    }

    text.trim_matches(|c: char| c.is_whitespace() || is_quote(c))
        .to_string()
}

/// Raw field values collected for one scene.
#[derive(Debug, Default)]
struct SceneDraft {
    location: String,
    values: HashMap<SceneField, String>,
}

impl SceneDraft {
    fn new(location: &str) -> Self {
        Self {
            location: location.trim().to_string(),
            values: HashMap::new(),
        }
    }

    fn set(&mut self, field: SceneField, value: &str) {
        self.values.insert(field, value.trim().to_string());
    }

    fn append(&mut self, field: SceneField, value: &str) {
        let entry = self.values.entry(field).or_default();
        if !entry.is_empty() {
            entry.push(' ');
        }
        entry.push_str(value.trim());
    }

    fn get(&self, field: SceneField) -> String {
        self.values.get(&field).cloned().unwrap_or_default()
    }

    fn optional(&self, field: SceneField) -> Option<String> {
        self.values
            .get(&field)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn into_scene(self, scene_id: u32) -> Scene {
        let shot = self.get(SceneField::ShotType);
        let composition = self.get(SceneField::Composition);
        let composition = match (shot.is_empty(), composition.is_empty()) {
            (false, false) => format!("[{shot}] {composition}"),
            (false, true) => format!("[{shot}]"),
            (true, _) => composition,
        };

        Scene {
            scene_id,
            location: self.location.clone(),
            character_actions: self.get(SceneField::Action),
            dialogue: clean_dialogue(&self.get(SceneField::Dialogue)),
            duration: 0,
            composition,
            emotional_tone: self.get(SceneField::Tone),
            adaptation_note: self.optional(SceneField::AdaptationNote),
            scene_conflict: self.optional(SceneField::Conflict),
            audio_design: dramaturg_core::AudioDesign {
                background_music: self.get(SceneField::Music),
                sound_effects: self.get(SceneField::SoundEffects),
            },
            visual_elements: dramaturg_core::VisualElements {
                lighting: self.get(SceneField::Lighting),
                color_tone: self.get(SceneField::ColorTone),
                props: self.get(SceneField::Props),
            },
        }
    }
}

fn parse_block(location: &str, body: &str) -> SceneDraft {
    let mut draft = SceneDraft::new(location);
    for (field, pattern) in FIELD_PATTERNS.iter() {
        if let Some(value) = pattern.captures(body).and_then(|caps| caps.get(1)) {
            draft.set(*field, value.as_str());
        }
    }
    draft
}

/// Primary strategy: strict headers, per-field patterns.
fn parse_tagged_blocks(text: &str) -> Vec<SceneDraft> {
    let headers = SCENE_HEADER.captures_iter(text).collect::<Vec<_>>();
    headers
        .iter()
        .enumerate()
        .filter_map(|(i, caps)| {
            let whole = caps.get(0)?;
            let body_end = headers
                .get(i + 1)
                .and_then(|next| next.get(0))
                .map(|m| m.start())
                .unwrap_or(text.len());
            let location = caps.get(2).map(|m| m.as_str()).unwrap_or_default();
            Some(parse_block(location, &text[whole.end()..body_end]))
        })
        .collect()
}

/// States of the line-oriented fallback parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ParseState {
    /// Outside any scene, waiting for a header
    SeekingHeader,
    /// Inside a scene before any labeled field
    InBlock,
    /// Inside a scene after `last` was filled
    SeekingField { last: SceneField },
}

/// Fallback strategy as an explicit state machine.
#[derive(Debug)]
pub(crate) struct LineParser {
    state: ParseState,
    current: Option<SceneDraft>,
    finished: Vec<SceneDraft>,
}

impl LineParser {
    pub(crate) fn new() -> Self {
        Self {
            state: ParseState::SeekingHeader,
            current: None,
            finished: Vec::new(),
        }
    }

    #[cfg(test)]
    pub(crate) fn state(&self) -> ParseState {
        self.state
    }

    fn open(&mut self, location: &str) {
        if let Some(draft) = self.current.take() {
            self.finished.push(draft);
        }
        self.current = Some(SceneDraft::new(location));
        self.state = ParseState::InBlock;
    }

    pub(crate) fn feed(&mut self, line: &str) {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return;
        }

        if let Some(caps) = LOOSE_SCENE_HEADER.captures(trimmed) {
            let number = caps.get(1).or_else(|| caps.get(2)).map(|m| m.as_str());
            let expected = self.finished.len() as u32 + u32::from(self.current.is_some()) + 1;
            if let Some(n) = number.and_then(parse_numeral)
                && n != expected
            {
                debug!(header = n, position = expected, "Scene header number differs from position");
            }
            let location = caps.get(3).map(|m| m.as_str()).unwrap_or_default();
            self.open(location);
            return;
        }

        let Some(draft) = self.current.as_mut() else {
            return;
        };

        let labeled = BULLET
            .find(trimmed)
            .map(|bullet| &trimmed[bullet.end()..])
            .unwrap_or(trimmed)
            .split_once([':', '：'])
            .and_then(|(label, value)| SceneField::classify(label).map(|field| (field, value)));

        match (labeled, self.state) {
            (Some((field, value)), _) => {
                draft.set(field, value);
                self.state = ParseState::SeekingField { last: field };
            }
            (None, ParseState::SeekingField { last }) => draft.append(last, trimmed),
            (None, _) => {
                if draft.location.is_empty() {
                    draft.location = trimmed.to_string();
                } else {
                    draft.append(SceneField::Action, trimmed);
                }
            }
        }
    }

    fn finish(mut self) -> Vec<SceneDraft> {
        if let Some(draft) = self.current.take() {
            self.finished.push(draft);
        }
        self.finished
    }
}

fn parse_lines(text: &str) -> Vec<SceneDraft> {
    let mut parser = LineParser::new();
    for line in text.lines() {
        parser.feed(line);
    }
    parser.finish()
}

/// Parse storyboard text into scenes with `duration = 0`.
///
/// Scene ids follow position (1..N) regardless of the numbers in the headers.
///
/// # Errors
///
/// Returns `NoScenesParsed` when neither strategy finds a scene.
///
/// # Examples
///
/// ```
/// use dramaturg_adaptation::parse_scenes;
///
/// let storyboard = "场景1：天台\n- 镜头类型：远景\n- 构图：城市夜景\n- 人物动作：她走向栏杆\n- 对白：林晚：“结束了。”";
/// let scenes = parse_scenes(storyboard).unwrap();
/// assert_eq!(scenes[0].location, "天台");
/// assert_eq!(scenes[0].composition, "[远景] 城市夜景");
/// assert_eq!(scenes[0].dialogue, "结束了。");
/// ```
#[instrument(skip(text), fields(text_len = text.len()))]
pub fn parse_scenes(text: &str) -> DramaturgResult<Vec<Scene>> {
    let mut drafts = parse_tagged_blocks(text);
    if drafts.is_empty() {
        warn!("No tagged scene blocks; falling back to line parser");
        drafts = parse_lines(text);
    }

    if drafts.is_empty() {
        error!("No scenes parsed from storyboard");
        return Err(AdaptationError::new(AdaptationErrorKind::NoScenesParsed).into());
    }

    let scenes = drafts
        .into_iter()
        .enumerate()
        .map(|(i, draft)| draft.into_scene(i as u32 + 1))
        .collect::<Vec<_>>();
    debug!(count = scenes.len(), "Parsed scenes");
    Ok(scenes)
}
