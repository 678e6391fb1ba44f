//! Field labels the storyboard format uses, in Chinese and English.

use regex::Regex;
use std::sync::LazyLock;

/// A labeled storyboard field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::EnumIter)]
pub(crate) enum SceneField {
    ShotType,
    Composition,
    Action,
    Dialogue,
    Tone,
    Music,
    SoundEffects,
    Lighting,
    ColorTone,
    Props,
    AdaptationNote,
    Conflict,
}

impl SceneField {
    /// Label spellings, most specific first.
    pub(crate) fn labels(self) -> &'static [&'static str] {
        match self {
            SceneField::ShotType => &["镜头类型", "景别", "镜头", "shot type", "shot"],
            SceneField::Composition => &["画面构图", "构图", "composition", "framing"],
            SceneField::Action => &[
                "人物动作",
                "角色动作",
                "动作",
                "character actions",
                "character action",
                "actions",
                "action",
            ],
            SceneField::Dialogue => &["对白", "台词", "对话", "dialogue", "lines"],
            SceneField::Tone => &[
                "情感基调",
                "情绪基调",
                "情绪",
                "情感",
                "emotional tone",
                "tone",
                "mood",
            ],
            SceneField::Music => &["背景音乐", "配乐", "音乐", "background music", "music"],
            SceneField::SoundEffects => &["音效", "sound effects", "sound effect", "sfx"],
            SceneField::Lighting => &["灯光", "光线", "光影", "lighting"],
            SceneField::ColorTone => &["色调", "色彩", "color tone", "colour tone", "color"],
            SceneField::Props => &["道具", "props"],
            SceneField::AdaptationNote => &["改编说明", "改编备注", "改编", "adaptation note", "adaptation"],
            SceneField::Conflict => &[
                "本场冲突",
                "场景冲突",
                "核心冲突",
                "冲突",
                "scene conflict",
                "core conflict",
                "conflict",
            ],
        }
    }

    /// Line pattern `- <label>: value`, capturing the value.
    pub(crate) fn pattern(self) -> Regex {
        let alternatives = self
            .labels()
            .iter()
            .map(|label| regex::escape(label))
            .collect::<Vec<_>>()
            .join("|");
        Regex::new(&format!(
            r"(?mi)^[ \t]*(?:[-*•·]|\d+[.)、])?[ \t]*\**(?:{alternatives})\**[ \t]*[:：][ \t]*(.*)$"
        ))
        .expect("Valid scene field regex")
    }

    /// Field whose label the given text contains; the longest matching
    /// label wins so "color tone" is not read as "tone".
    pub(crate) fn classify(label: &str) -> Option<SceneField> {
        use strum::IntoEnumIterator;
        let label = label.trim().trim_matches('*').to_lowercase();
        if label.is_empty() {
            return None;
        }
        SceneField::iter()
            .filter_map(|field| {
                field
                    .labels()
                    .iter()
                    .filter(|l| label.contains(*l))
                    .map(|l| l.chars().count())
                    .max()
                    .map(|len| (len, field))
            })
            .max_by_key(|(len, _)| *len)
            .map(|(_, field)| field)
    }
}

/// Any `- label: value` line whose label belongs to the storyboard format.
pub(crate) static LABELED_LINE: LazyLock<Regex> = LazyLock::new(|| {
    use strum::IntoEnumIterator;
    let alternatives = SceneField::iter()
        .flat_map(|field| field.labels().iter())
        .map(|label| regex::escape(label))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(
        r"(?i)^[ \t]*[-*•·][ \t]*\**(?:{alternatives}|时长|duration|时间|time)\**[ \t]*[:：]"
    ))
    .expect("Valid labeled line regex")
});

/// Strict scene header: `Scene 3: Rooftop` / `场景3：天台`.
pub(crate) static SCENE_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?mi)^[ \t#*]*(?:场景|scene)[ \t]*(\d+)[ \t]*\**[ \t]*[:：][ \t]*(.*?)[ \t*]*$")
        .expect("Valid scene header regex")
});

/// Loose scene header: `Scene 3`, `场景三`, `第3场`, `第十二幕 天台`.
pub(crate) static LOOSE_SCENE_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^[ \t#*]*(?:(?:场景|scene)[ \t]*([0-9]+|[零〇一二两三四五六七八九十百]+)|第[ \t]*([0-9]+|[零〇一二两三四五六七八九十百]+)[ \t]*[场幕])[ \t]*\**[ \t]*[:：.、\-—]?[ \t]*(.*?)[ \t*]*$",
    )
    .expect("Valid loose scene header regex")
});

/// Time-code lines such as `[00:15]`, `0:05-0:12` or `3-5秒`.
pub(crate) static TIME_CODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[ \t]*[\[(（]?[ \t]*(?:\d{1,2}:\d{2}|\d+[ \t]*[-~–][ \t]*\d+[ \t]*(?:秒|seconds|sec|s))")
        .expect("Valid time code regex")
});

/// Whether a line starts storyboard formatting (scene header or time code).
pub(crate) fn is_storyboard_line(line: &str) -> bool {
    SCENE_HEADER.is_match(line) || LOOSE_SCENE_HEADER.is_match(line) || TIME_CODE.is_match(line)
}

/// Parses Arabic or Chinese numerals up to 999.
pub(crate) fn parse_numeral(s: &str) -> Option<u32> {
    if let Ok(n) = s.parse::<u32>() {
        return Some(n);
    }
    let digit = |c: char| match c {
        '零' | '〇' => Some(0),
        '一' => Some(1),
        '二' | '两' => Some(2),
        '三' => Some(3),
        '四' => Some(4),
        '五' => Some(5),
        '六' => Some(6),
        '七' => Some(7),
        '八' => Some(8),
        '九' => Some(9),
        _ => None,
    };

    let mut total = 0;
    let mut current = 0;
    let mut seen = false;
    for c in s.chars() {
        match c {
            '百' => {
                total += current.max(1) * 100;
                current = 0;
            }
            '十' => {
                total += current.max(1) * 10;
                current = 0;
            }
            c => current = digit(c)?,
        }
        seen = true;
    }
    seen.then_some(total + current)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chinese_numerals() {
        assert_eq!(parse_numeral("三"), Some(3));
        assert_eq!(parse_numeral("十"), Some(10));
        assert_eq!(parse_numeral("十二"), Some(12));
        assert_eq!(parse_numeral("二十"), Some(20));
        assert_eq!(parse_numeral("一百零五"), Some(105));
        assert_eq!(parse_numeral("7"), Some(7));
        assert_eq!(parse_numeral("天台"), None);
    }

    #[test]
    fn classify_prefers_specific_labels() {
        assert_eq!(SceneField::classify("镜头类型"), Some(SceneField::ShotType));
        assert_eq!(SceneField::classify("音效"), Some(SceneField::SoundEffects));
        assert_eq!(SceneField::classify("Background Music"), Some(SceneField::Music));
        assert_eq!(SceneField::classify("本场冲突"), Some(SceneField::Conflict));
        assert_eq!(SceneField::classify("Color tone"), Some(SceneField::ColorTone));
        assert_eq!(SceneField::classify("天气"), None);
    }

    #[test]
    fn headers() {
        assert!(SCENE_HEADER.is_match("场景1：天台"));
        assert!(SCENE_HEADER.is_match("**Scene 2: Office lobby**"));
        assert!(!SCENE_HEADER.is_match("- 场景冲突：背叛"));
        assert!(LOOSE_SCENE_HEADER.is_match("第三场 医院走廊"));
        assert!(LOOSE_SCENE_HEADER.is_match("场景十二"));
        assert!(!LOOSE_SCENE_HEADER.is_match("场景冲突：背叛"));
    }

    #[test]
    fn labeled_lines() {
        assert!(LABELED_LINE.is_match("- 镜头类型：特写"));
        assert!(LABELED_LINE.is_match("* Shot type: close-up"));
        assert!(!LABELED_LINE.is_match("她推开门，雨水打湿了她的头发。"));
    }
}
