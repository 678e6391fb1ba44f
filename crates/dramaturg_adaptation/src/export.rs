//! Renderings of a script document.

use dramaturg_core::{Episode, Scene, ScriptDocument};
use dramaturg_error::{AdaptationError, AdaptationErrorKind, DramaturgResult};
use tracing::instrument;

/// Output formats accepted by [`export_document`].
///
/// Parsing is case-insensitive and accepts a few aliases.
///
/// # Examples
///
/// ```
/// use dramaturg_adaptation::ExportFormat;
/// use std::str::FromStr;
///
/// assert_eq!(ExportFormat::from_str("MD").unwrap(), ExportFormat::Markdown);
/// assert_eq!(ExportFormat::from_str("structured").unwrap(), ExportFormat::Json);
/// assert_eq!(ExportFormat::Text.to_string(), "text");
/// assert!(ExportFormat::from_str("pdf").is_err());
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum ExportFormat {
    /// Pretty-printed JSON of the whole document
    #[default]
    #[strum(to_string = "json", serialize = "structured")]
    Json,
    /// Plain text screenplay
    #[strum(to_string = "text", serialize = "txt", serialize = "plain")]
    Text,
    /// Markdown screenplay
    #[strum(to_string = "markdown", serialize = "md")]
    Markdown,
}

/// Render `document` in `format`.
///
/// # Errors
///
/// Returns `Serialization` if JSON encoding fails.
#[instrument(skip(document), fields(title = %document.metadata.title))]
pub fn export_document(document: &ScriptDocument, format: ExportFormat) -> DramaturgResult<String> {
    match format {
        ExportFormat::Json => serde_json::to_string_pretty(document).map_err(|e| {
            AdaptationError::new(AdaptationErrorKind::Serialization(e.to_string())).into()
        }),
        ExportFormat::Text => Ok(render_text(document)),
        ExportFormat::Markdown => Ok(render_markdown(document)),
    }
}

fn or_dash(value: &str) -> &str {
    if value.trim().is_empty() { "-" } else { value.trim() }
}

fn summary_line(document: &ScriptDocument) -> String {
    let metadata = &document.metadata;
    format!(
        "Type: {} | Episodes: {} | Total duration: {}s | Generated: {}",
        metadata.story_type,
        metadata.episode_count,
        metadata.total_duration,
        metadata.generation_timestamp.to_rfc3339()
    )
}

fn quality_line(document: &ScriptDocument) -> String {
    let q = &document.quality_metrics;
    format!(
        "Quality: {:.1} ({}) | structure {} | conflict {} | pacing {} | dialogue {} | visual {}",
        q.overall_score,
        q.quality_status,
        q.structure_score,
        q.conflict_score,
        q.pacing_score,
        q.dialogue_score,
        q.visual_score
    )
}

fn render_text(document: &ScriptDocument) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", document.metadata.title));
    out.push_str(&format!("{}\n", summary_line(document)));
    out.push_str(&format!("{}\n\n", quality_line(document)));
    out.push_str(&format!(
        "== Adaptation analysis ==\n{}\n\n",
        document.adaptation_analysis.trim()
    ));
    out.push_str(&format!("== Adapted story ==\n{}\n\n", document.adapted_story.trim()));
    for episode in &document.episodes {
        text_episode(&mut out, episode);
    }
    out
}

fn text_episode(out: &mut String, episode: &Episode) {
    out.push_str(&format!(
        "== Episode {} ({}s, intensity {}) ==\n",
        episode.episode_number, episode.duration, episode.conflict_intensity
    ));
    out.push_str(&format!("Core conflict: {}\n", or_dash(&episode.core_conflict)));
    out.push_str(&format!("Key events: {}\n", or_dash(&episode.key_events.join("; "))));
    out.push_str(&format!("Hook: {}\n", or_dash(&episode.hook)));
    for scene in &episode.scenes {
        text_scene(out, scene);
    }
    out.push_str(&format!("Cliffhanger: {}\n\n", or_dash(&episode.cliffhanger)));
}

fn text_scene(out: &mut String, scene: &Scene) {
    out.push_str(&format!(
        "  Scene {}: {} ({}s)\n",
        scene.scene_id,
        or_dash(&scene.location),
        scene.duration
    ));
    out.push_str(&format!("    Shot: {}\n", or_dash(&scene.composition)));
    out.push_str(&format!("    Action: {}\n", or_dash(&scene.character_actions)));
    out.push_str(&format!("    Dialogue: {}\n", or_dash(&scene.dialogue)));
    out.push_str(&format!("    Tone: {}\n", or_dash(&scene.emotional_tone)));
}

fn render_markdown(document: &ScriptDocument) -> String {
    let mut out = String::new();
    out.push_str(&format!("# {}\n\n", document.metadata.title));
    out.push_str(&format!("_{}_\n\n", summary_line(document)));
    out.push_str(&format!("**{}**\n\n", quality_line(document)));
    if !document.quality_metrics.suggestions.is_empty() {
        out.push_str("## Suggestions\n\n");
        for suggestion in &document.quality_metrics.suggestions {
            out.push_str(&format!("- {}\n", suggestion));
        }
        out.push('\n');
    }
    out.push_str(&format!("## Adaptation analysis\n\n{}\n\n", document.adaptation_analysis.trim()));
    out.push_str(&format!("## Adapted story\n\n{}\n\n", document.adapted_story.trim()));
    for episode in &document.episodes {
        out.push_str(&format!(
            "## Episode {} ({}s)\n\n",
            episode.episode_number, episode.duration
        ));
        out.push_str(&format!("- **Core conflict:** {}\n", or_dash(&episode.core_conflict)));
        out.push_str(&format!("- **Intensity:** {}/5\n", episode.conflict_intensity));
        out.push_str(&format!("- **Hook:** {}\n", or_dash(&episode.hook)));
        out.push_str(&format!("- **Cliffhanger:** {}\n\n", or_dash(&episode.cliffhanger)));
        out.push_str("| # | Location | Shot | Action | Dialogue | Seconds |\n");
        out.push_str("|---|---|---|---|---|---|\n");
        for scene in &episode.scenes {
            out.push_str(&format!(
                "| {} | {} | {} | {} | {} | {} |\n",
                scene.scene_id,
                cell(&scene.location),
                cell(&scene.composition),
                cell(&scene.character_actions),
                cell(&scene.dialogue),
                scene.duration
            ));
        }
        out.push('\n');
    }
    out
}

/// Table-safe cell text.
fn cell(value: &str) -> String {
    or_dash(value).replace('|', "\\|").replace('\n', " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells_escape_pipes_and_newlines() {
        assert_eq!(cell("a|b\nc"), "a\\|b c");
        assert_eq!(cell("  "), "-");
    }
}
