//! Lenient parsing of JSON-formatted model responses.
//!
//! Responses often wrap JSON in markdown fences or prose, leave trailing
//! commas, forget to quote keys or use single quotes. Parsing goes:
//! locate, parse, repair once, parse again, then salvage whichever
//! top-level `"key": [ ... ]` arrays parse on their own.

use dramaturg_error::{AdaptationError, AdaptationErrorKind, DramaturgResult};
use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::sync::LazyLock;
use tracing::{debug, error, warn};

static TRAILING_COMMA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",(\s*[}\]])").expect("Valid trailing comma regex"));

static BARE_KEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([{,]\s*)([A-Za-z_][A-Za-z0-9_]*)(\s*:)"#).expect("Valid bare key regex")
});

static ARRAY_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""([^"\\]+)"\s*:\s*\["#).expect("Valid array key regex"));

/// Extract the JSON portion of a response.
///
/// Tries a fenced code block first, then whichever of a balanced `{...}` or
/// `[...]` appears first. Returns `None` when the text holds neither.
pub fn extract_json(response: &str) -> Option<String> {
    if let Some(json) = extract_from_code_block(response) {
        return Some(json);
    }

    let bracket_pos = response.find('[');
    let brace_pos = response.find('{');
    match (bracket_pos, brace_pos) {
        (Some(b), Some(c)) if b < c => extract_balanced(response, '[', ']')
            .or_else(|| extract_balanced(response, '{', '}')),
        (Some(_), None) => extract_balanced(response, '[', ']'),
        _ => extract_balanced(response, '{', '}')
            .or_else(|| extract_balanced(response, '[', ']')),
    }
}

/// Content of the first markdown code fence; a missing closing fence
/// (truncated response) runs to the end of the text.
fn extract_from_code_block(response: &str) -> Option<String> {
    let start = response.find("```")?;
    let after_fence = start + 3;
    let content_start = response[after_fence..]
        .find('\n')
        .map(|n| after_fence + n + 1)
        .unwrap_or(after_fence);
    let content = match response[content_start..].find("```") {
        Some(end) => &response[content_start..content_start + end],
        None => &response[content_start..],
    };
    let content = content.trim();
    (!content.is_empty()).then(|| content.to_string())
}

/// Content between balanced delimiters starting at the first `open`,
/// skipping delimiters inside string literals.
fn extract_balanced(response: &str, open: char, close: char) -> Option<String> {
    let start = response.find(open)?;
    balanced_end(&response[start..], open, close).map(|end| response[start..start + end].to_string())
}

/// Byte length of the balanced span at the start of `text`.
fn balanced_end(text: &str, open: char, close: char) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escape_next = false;

    for (i, ch) in text.char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }
        match ch {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            c if c == open && !in_string => depth += 1,
            c if c == close && !in_string => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(i + ch.len_utf8());
                }
            }
            _ => {}
        }
    }
    None
}

/// Convert `'single quoted'` strings to double-quoted ones, escaping inner
/// double quotes. Apostrophes inside double-quoted strings are left alone.
fn convert_single_quotes(json: &str) -> String {
    let mut out = String::with_capacity(json.len());
    let mut in_double = false;
    let mut in_single = false;
    let mut escape_next = false;

    for ch in json.chars() {
        if escape_next {
            out.push(ch);
            escape_next = false;
            continue;
        }
        match ch {
            '\\' if in_double || in_single => {
                out.push(ch);
                escape_next = true;
            }
            '"' if in_single => out.push_str("\\\""),
            '"' => {
                in_double = !in_double;
                out.push(ch);
            }
            '\'' if !in_double => {
                in_single = !in_single;
                out.push('"');
            }
            _ => out.push(ch),
        }
    }
    out
}

/// One repair pass over malformed JSON.
///
/// # Examples
///
/// ```
/// use dramaturg_adaptation::repair_json;
///
/// let fixed = repair_json("```json\n{name: 'Lin', tags: ['heir',],}\n```");
/// assert_eq!(fixed, r#"{"name": "Lin", "tags": ["heir"]}"#);
/// ```
pub fn repair_json(raw: &str) -> String {
    let unfenced = extract_from_code_block(raw).unwrap_or_else(|| raw.trim().to_string());
    let quoted = convert_single_quotes(&unfenced);
    let keyed = BARE_KEY.replace_all(&quoted, r#"$1"$2"$3"#);
    TRAILING_COMMA.replace_all(&keyed, "$1").into_owned()
}

/// Top-level `"key": [ ... ]` arrays that parse on their own.
fn salvage_arrays(text: &str) -> Map<String, Value> {
    let mut salvaged = Map::new();
    for caps in ARRAY_KEY.captures_iter(text) {
        let (Some(whole), Some(key)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let array_start = whole.end() - 1;
        let Some(len) = balanced_end(&text[array_start..], '[', ']') else {
            continue;
        };
        let candidate = &text[array_start..array_start + len];
        let parsed = serde_json::from_str::<Value>(candidate)
            .or_else(|_| serde_json::from_str::<Value>(&repair_json(candidate)));
        match parsed {
            Ok(value) => {
                salvaged.entry(key.as_str().to_string()).or_insert(value);
            }
            Err(e) => debug!(key = key.as_str(), error = %e, "Array not salvageable"),
        }
    }
    salvaged
}

/// Parse a model response into `T`, repairing and salvaging as needed.
///
/// # Errors
///
/// Returns `UnparseableStructure` when neither the repaired text nor any
/// salvaged arrays deserialize into `T`.
pub fn parse_lenient<T>(response: &str) -> DramaturgResult<T>
where
    T: DeserializeOwned,
{
    let located = extract_json(response).unwrap_or_else(|| response.trim().to_string());

    let first_error = match serde_json::from_str::<T>(&located) {
        Ok(value) => return Ok(value),
        Err(e) => e,
    };
    warn!(error = %first_error, "Structured response did not parse; repairing");

    let repaired = repair_json(&located);
    if let Ok(value) = serde_json::from_str::<T>(&repaired) {
        debug!("Structured response parsed after repair");
        return Ok(value);
    }

    let salvaged = salvage_arrays(&repaired);
    let salvaged = if salvaged.is_empty() {
        salvage_arrays(response)
    } else {
        salvaged
    };
    if !salvaged.is_empty() {
        let keys = salvaged.keys().cloned().collect::<Vec<_>>();
        match serde_json::from_value::<T>(Value::Object(salvaged)) {
            Ok(value) => {
                warn!(?keys, "Structured response partially salvaged");
                return Ok(value);
            }
            Err(e) => debug!(error = %e, "Salvaged arrays do not fit the expected shape"),
        }
    }

    let preview = response.chars().take(100).collect::<String>();
    error!(
        response_length = response.len(),
        json_preview = %preview,
        "Structured response could not be parsed"
    );
    Err(AdaptationError::new(AdaptationErrorKind::UnparseableStructure(first_error.to_string())).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Plan {
        #[serde(default)]
        characters: Vec<String>,
        #[serde(default)]
        locations: Vec<String>,
    }

    #[test]
    fn extracts_from_code_block() {
        let response = "Here you go:\n```json\n{\"id\": 1}\n```\nThanks";
        assert_eq!(extract_json(response).as_deref(), Some("{\"id\": 1}"));
    }

    #[test]
    fn extracts_balanced_braces_with_escapes() {
        let response = r#"Sure! {"text": "She said \"}\"", "n": {"v": 1}} trailing"#;
        let json = extract_json(response).unwrap();
        assert!(json.ends_with("}}"));
        assert!(serde_json::from_str::<Value>(&json).is_ok());
    }

    #[test]
    fn array_first_when_it_comes_first() {
        let json = extract_json("[{\"a\": 1}, {\"b\": 2}]").unwrap();
        assert!(json.starts_with('['));
    }

    #[test]
    fn no_json_found() {
        assert_eq!(extract_json("plain words"), None);
    }

    #[test]
    fn apostrophes_inside_strings_survive() {
        let fixed = repair_json(r#"{"line": "it's over",}"#);
        assert_eq!(fixed, r#"{"line": "it's over"}"#);
    }

    #[test]
    fn repaired_response_parses() {
        let plan: Plan = parse_lenient("{characters: ['Lin', 'Zhou',], locations: []}").unwrap();
        assert_eq!(plan.characters, vec!["Lin", "Zhou"]);
    }

    #[test]
    fn salvages_parseable_arrays() {
        let broken = r#"{"characters": ["Lin", "Zhou"], "locations": ["Roof"], "notes": {oops"#;
        let plan: Plan = parse_lenient(broken).unwrap();
        assert_eq!(plan.characters, vec!["Lin", "Zhou"]);
        assert_eq!(plan.locations, vec!["Roof"]);
    }

    #[test]
    fn nothing_salvageable_is_fatal() {
        let err = parse_lenient::<Plan>("the model refused").unwrap_err();
        assert!(err.user_message().contains("structured"));
    }
}
