//! Splits the adaptation response into its analysis and story blocks.
//!
//! Strategies run in decreasing order of confidence:
//!
//! 1. Explicit `===analysis===` / `===story===` markers (any run of two or
//!    more `=`, Chinese or English names, case-insensitive).
//! 2. Bracketed analysis fields: `【主线】`, `【结构】`, `【策略】` or their
//!    English `[Main line]`, `[Structure]`, `[Strategy]` forms.
//! 3. Six `key: value` lines (protagonist, goal, conflict, emotional anchor,
//!    hook, reversal).
//! 4. For the story, a "story starts here" line followed by prose.
//!
//! Whatever is still missing is replaced by a fixed placeholder, so both
//! fields are always non-empty.

use crate::labels::{LABELED_LINE, is_storyboard_line};
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, warn};

/// Stand-in analysis when none of the strategies found one.
pub const ANALYSIS_PLACEHOLDER: &str =
    "改编分析未能从模型输出中提取。(No adaptation analysis could be extracted.)";

/// Stand-in story when none of the strategies found one.
pub const STORY_PLACEHOLDER: &str =
    "改编故事未能从模型输出中提取。(No adapted story could be extracted.)";

/// The two blocks of an adaptation response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sections {
    /// Adaptation analysis
    pub analysis: String,
    /// Adapted narrative prose
    pub story: String,
}

impl Sections {
    /// Whether the story is the placeholder.
    pub fn story_missing(&self) -> bool {
        self.story == STORY_PLACEHOLDER
    }
}

static ANY_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t#*]*={2,}[ \t]*([^=\n]+?)[ \t]*={2,}[ \t*]*$").expect("Valid marker regex")
});

static BRACKET_FIELD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:【[ \t]*(主线|结构|策略)[ \t]*】|\[[ \t]*(main[ \t]*line|structure|strategy)[ \t]*\])[ \t]*[:：]?[ \t]*(.*)")
        .expect("Valid bracket field regex")
});

static KEY_VALUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[ \t]*(?:[-*•·]|\d+[.)、])?[ \t]*\**(主角|目标|冲突|情感锚点|钩子|反转|protagonist|goal|conflict|emotional anchor|hook|reversal)\**[ \t]*[:：][ \t]*(.+?)[ \t]*$")
        .expect("Valid key value regex")
});

static STORY_START: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(故事正文|故事开始|改编故事|adapted story|story begins|story starts)")
        .expect("Valid story start regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MarkerKind {
    Analysis,
    Story,
    Other,
}

fn marker_kind(name: &str) -> MarkerKind {
    let name = name.trim().to_lowercase();
    match name.as_str() {
        "分析" | "改编分析" | "analysis" | "adaptation analysis" => MarkerKind::Analysis,
        "故事" | "改编故事" | "故事正文" | "story" | "adapted story" => MarkerKind::Story,
        _ => MarkerKind::Other,
    }
}

struct Marker {
    kind: MarkerKind,
    start: usize,
    end: usize,
}

fn markers(text: &str) -> Vec<Marker> {
    ANY_MARKER
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let name = caps.get(1)?;
            Some(Marker {
                kind: marker_kind(name.as_str()),
                start: whole.start(),
                end: whole.end(),
            })
        })
        .collect()
}

/// Text after marker `index` up to the next marker of any kind.
fn marker_body<'a>(text: &'a str, markers: &[Marker], index: usize) -> &'a str {
    let start = markers[index].end;
    let end = markers
        .get(index + 1)
        .map(|next| next.start)
        .unwrap_or(text.len());
    text[start..end].trim()
}

/// Drops storyboard formatting that leaked into the story block: everything
/// from the first scene header or time code on, and any labeled field lines.
fn strip_storyboard(story: &str) -> String {
    story
        .lines()
        .take_while(|line| !is_storyboard_line(line))
        .filter(|line| !LABELED_LINE.is_match(line))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

fn analysis_from_brackets(text: &str) -> Option<String> {
    let lines = text.lines().collect::<Vec<_>>();
    let mut parts = Vec::new();
    for (i, line) in lines.iter().enumerate() {
        let Some(caps) = BRACKET_FIELD.captures(line) else {
            continue;
        };
        let label = caps
            .get(1)
            .or_else(|| caps.get(2))
            .map(|m| m.as_str())
            .unwrap_or_default();
        let mut value = caps.get(3).map(|m| m.as_str().trim()).unwrap_or_default();
        if value.is_empty() {
            value = lines[i + 1..]
                .iter()
                .map(|l| l.trim())
                .find(|l| !l.is_empty() && !BRACKET_FIELD.is_match(l))
                .unwrap_or_default();
        }
        if !value.is_empty() {
            let heading = if label.is_ascii() {
                format!("[{label}]")
            } else {
                format!("【{label}】")
            };
            parts.push(format!("{heading} {value}"));
        }
    }
    (!parts.is_empty()).then(|| parts.join("\n"))
}

fn analysis_from_key_values(text: &str) -> Option<String> {
    let parts = text
        .lines()
        .take_while(|line| !is_storyboard_line(line))
        .filter_map(|line| KEY_VALUE.captures(line))
        .map(|caps| format!("{}: {}", &caps[1], &caps[2]))
        .collect::<Vec<_>>();
    (!parts.is_empty()).then(|| parts.join("\n"))
}

fn story_from_start_line(text: &str) -> Option<String> {
    let mut lines = text.lines();
    lines.by_ref().find(|line| {
        let trimmed = line.trim();
        trimmed.chars().count() <= 30 && STORY_START.is_match(trimmed)
    })?;
    let story = lines
        .take_while(|line| !is_storyboard_line(line))
        .filter(|line| !LABELED_LINE.is_match(line))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string();
    (!story.is_empty()).then_some(story)
}

/// Split an adaptation response into analysis and story.
///
/// Never fails; missing blocks come back as [`ANALYSIS_PLACEHOLDER`] or
/// [`STORY_PLACEHOLDER`].
///
/// # Examples
///
/// ```
/// use dramaturg_adaptation::extract_sections;
///
/// let response = "===分析===\n主线：复仇\n===故事===\n她回到了这座城市。\n场景1：机场\n- 镜头类型：远景";
/// let sections = extract_sections(response);
/// assert_eq!(sections.analysis, "主线：复仇");
/// assert_eq!(sections.story, "她回到了这座城市。");
/// ```
pub fn extract_sections(text: &str) -> Sections {
    let found = markers(text);
    let analysis_index = found.iter().position(|m| m.kind == MarkerKind::Analysis);
    let story_index = found.iter().position(|m| m.kind == MarkerKind::Story);

    let mut analysis = analysis_index
        .map(|i| marker_body(text, &found, i).to_string())
        .filter(|body| !body.is_empty());
    let mut story = story_index
        .map(|i| strip_storyboard(marker_body(text, &found, i)))
        .filter(|body| !body.is_empty());

    if analysis.is_some() || story.is_some() {
        debug!(
            analysis = analysis.is_some(),
            story = story.is_some(),
            "Sections located by markers"
        );
    }

    if analysis.is_none() {
        analysis = analysis_from_brackets(text).or_else(|| analysis_from_key_values(text));
    }
    if story.is_none() {
        story = story_from_start_line(text);
    }

    let analysis = analysis.unwrap_or_else(|| {
        warn!("No analysis block found; using placeholder");
        ANALYSIS_PLACEHOLDER.to_string()
    });
    let story = story.unwrap_or_else(|| {
        warn!("No story block found; using placeholder");
        STORY_PLACEHOLDER.to_string()
    });

    Sections { analysis, story }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn english_markers_are_case_insensitive() {
        let text = "==== Analysis ====\nRevenge arc.\n=== STORY ===\nShe came back.\n=== Notes ===\nignored";
        let sections = extract_sections(text);
        assert_eq!(sections.analysis, "Revenge arc.");
        assert_eq!(sections.story, "She came back.");
    }

    #[test]
    fn labeled_lines_are_stripped_from_story() {
        let text = "===故事===\n第一段。\n- 镜头类型：特写\n第二段。";
        let sections = extract_sections(text);
        assert_eq!(sections.story, "第一段。\n第二段。");
    }

    #[test]
    fn story_truncates_at_time_code() {
        let text = "===story===\nOpening prose.\n[00:05] Cut to the hall\nMore";
        assert_eq!(extract_sections(text).story, "Opening prose.");
    }

    #[test]
    fn bracket_fields_rebuild_analysis() {
        let text = "【主线】女主复仇\n【结构】三幕\n闲话\n【策略】\n强化反转";
        let sections = extract_sections(text);
        assert_eq!(sections.analysis, "【主线】 女主复仇\n【结构】 三幕\n【策略】 强化反转");
        assert_eq!(sections.story, STORY_PLACEHOLDER);
    }

    #[test]
    fn key_values_rebuild_analysis() {
        let text = "主角：林晚\n目标：夺回公司\n钩子：婚礼上的一巴掌\n\n故事正文\n林晚推开宴会厅的门。\n- 对白：你们好啊\n她笑了。\n场景1：宴会厅";
        let sections = extract_sections(text);
        assert_eq!(sections.analysis, "主角: 林晚\n目标: 夺回公司\n钩子: 婚礼上的一巴掌");
        assert_eq!(sections.story, "林晚推开宴会厅的门。\n她笑了。");
    }

    #[test]
    fn generated_replies_never_yield_empty_fields() {
        const LINES: &[&str] = &[
            "===分析===",
            "=== Story ===",
            "==== STORY ====",
            "=== Notes ===",
            "==故事==",
            "====",
            "== ==",
            "【主线】",
            "【结构】三幕",
            "[Strategy]:",
            "主角：",
            "goal: ",
            "hook:\t\t",
            "Conflict: revenge",
            "故事正文",
            "Story begins:",
            "场景1：宴会厅",
            "- 镜头类型：特写",
            "[00:05] Cut",
            "她笑了。",
            "She came back.",
            "",
            "   ",
            "\t",
        ];
        let mut rng = StdRng::seed_from_u64(0x5ec);
        for _ in 0..1000 {
            let count = rng.gen_range(1..=12usize);
            let text = (0..count)
                .map(|_| LINES[rng.gen_range(0..LINES.len())])
                .collect::<Vec<_>>()
                .join("\n");

            let sections = extract_sections(&text);

            assert!(!sections.analysis.trim().is_empty(), "empty analysis for {:?}", text);
            assert!(!sections.story.trim().is_empty(), "empty story for {:?}", text);
        }
    }

    #[test]
    fn nothing_found_yields_placeholders() {
        let sections = extract_sections("just some words");
        assert_eq!(sections.analysis, ANALYSIS_PLACEHOLDER);
        assert!(sections.story_missing());
    }
}
