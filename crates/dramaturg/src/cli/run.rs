//! Command handlers.

use dramaturg::{
    DramaturgConfig, DramaturgResult, ExportFormat, IoError, JsonError, OpenAICompatibleClient,
    ScriptAdapter, ScriptDocument, SessionCache, Shot, StoryboardPlan, export_document,
};
use serde::Serialize;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

/// Everything a command needs: the loaded configuration and the adapter.
pub struct CommandContext {
    config: DramaturgConfig,
    adapter: ScriptAdapter<OpenAICompatibleClient>,
}

impl CommandContext {
    /// Load configuration and build the model client.
    ///
    /// `config_path` replaces the home/current-directory lookup; `api_key`
    /// is forwarded on every request.
    pub fn new(config_path: Option<&Path>, api_key: Option<String>) -> DramaturgResult<Self> {
        let config = match config_path {
            Some(path) => DramaturgConfig::from_file(path)?,
            None => DramaturgConfig::load()?,
        };
        let client = match &api_key {
            Some(key) => {
                OpenAICompatibleClient::with_api_key(config.model().clone(), key.clone())?
            }
            None => OpenAICompatibleClient::from_config(config.model().clone())?,
        };
        let settings = config.adapter_settings().with_api_key(api_key);
        let adapter = ScriptAdapter::with_settings(client, settings)
            .with_analysis_cache(SessionCache::new(config.cache().clone()));
        Ok(Self { config, adapter })
    }
}

/// Read a text file, or stdin for `-`.
fn read_text(path: &Path) -> DramaturgResult<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .map_err(|e| IoError::new(format!("Failed to read stdin: {}", e)))?;
        return Ok(text);
    }
    std::fs::read_to_string(path)
        .map_err(|e| IoError::new(format!("Failed to read {}: {}", path.display(), e)).into())
}

fn read_script(path: &Path) -> DramaturgResult<ScriptDocument> {
    let text = read_text(path)?;
    serde_json::from_str(&text).map_err(|e| {
        JsonError::new(format!("{} is not a script document: {}", path.display(), e)).into()
    })
}

/// Print to stdout or write to `output`.
fn emit(rendered: &str, output: Option<&PathBuf>) -> DramaturgResult<()> {
    match output {
        Some(path) => {
            std::fs::write(path, rendered)
                .map_err(|e| IoError::new(format!("Failed to write {}: {}", path.display(), e)))?;
            info!(path = %path.display(), "Wrote output");
        }
        None => println!("{}", rendered),
    }
    Ok(())
}

fn to_pretty_json<T: Serialize>(value: &T) -> DramaturgResult<String> {
    serde_json::to_string_pretty(value)
        .map_err(|e| JsonError::new(format!("Failed to serialize output: {}", e)).into())
}

/// `analyze`: print the episode-count recommendation.
#[instrument(skip(ctx))]
pub async fn run_analyze(ctx: &CommandContext, input: &Path) -> DramaturgResult<()> {
    let content = read_text(input)?;
    let analysis = ctx.adapter.analyze_episode_count(&content).await?;
    emit(&to_pretty_json(&analysis)?, None)
}

/// Flags of the `generate` command.
#[derive(Debug)]
pub struct GenerateArgs {
    /// Source text file
    pub input: PathBuf,
    /// Episode count override
    pub episodes: Option<u32>,
    /// Seconds per episode override
    pub duration: Option<u32>,
    /// Genre override
    pub story_type: Option<String>,
    /// Output file
    pub output: Option<PathBuf>,
    /// Output format
    pub format: ExportFormat,
}

/// `generate`: adapt a source text into a script.
#[instrument(skip(ctx, args), fields(input = %args.input.display()))]
pub async fn run_generate(ctx: &CommandContext, args: GenerateArgs) -> DramaturgResult<()> {
    let content = read_text(&args.input)?;
    let defaults = ctx.config.generation();

    let episodes = match args.episodes.or(*defaults.episode_count()) {
        Some(count) => count,
        None => {
            let session = args.input.display().to_string();
            let analysis = ctx
                .adapter
                .analyze_episode_count_cached(&session, &content)
                .await?;
            info!(
                recommended = analysis.recommended_episodes,
                source = %analysis.source,
                "Using recommended episode count"
            );
            analysis.recommended_episodes
        }
    };
    let duration = args.duration.unwrap_or(*defaults.duration_per_episode());
    let story_type = args
        .story_type
        .unwrap_or_else(|| defaults.story_type().clone());

    let document = ctx
        .adapter
        .generate_script(&content, episodes, duration, &story_type)
        .await?;
    emit(&export_document(&document, args.format)?, args.output.as_ref())
}

/// `optimize`: regenerate a script's storyboard.
#[instrument(skip(ctx))]
pub async fn run_optimize(
    ctx: &CommandContext,
    script: &Path,
    source: Option<&Path>,
    duration: Option<u32>,
    output: Option<&PathBuf>,
    format: ExportFormat,
) -> DramaturgResult<()> {
    let document = read_script(script)?;
    let content = match source {
        Some(path) => read_text(path)?,
        None => String::new(),
    };
    let optimized = ctx
        .adapter
        .optimize_script(&document, &content, duration)
        .await?;
    emit(&export_document(&optimized, format)?, output)
}

/// `export`: render a stored script in another format.
#[instrument]
pub fn run_export(
    script: &Path,
    format: ExportFormat,
    output: Option<&PathBuf>,
) -> DramaturgResult<()> {
    let document = read_script(script)?;
    emit(&export_document(&document, format)?, output)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DesignOutput {
    #[serde(flatten)]
    plan: StoryboardPlan,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    shots: Vec<EpisodeShots>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EpisodeShots {
    episode_number: u32,
    shots: Vec<Shot>,
}

/// `designs`: plan designs and, optionally, shot lists.
#[instrument(skip(ctx))]
pub async fn run_designs(
    ctx: &CommandContext,
    script: &Path,
    with_shots: bool,
    output: Option<&PathBuf>,
) -> DramaturgResult<()> {
    let document = read_script(script)?;
    let plan = ctx.adapter.plan_designs(&document).await?;

    let mut shots = Vec::new();
    if with_shots {
        for episode in &document.episodes {
            shots.push(EpisodeShots {
                episode_number: episode.episode_number,
                shots: ctx.adapter.plan_shots(episode).await?,
            });
        }
    }
    emit(&to_pretty_json(&DesignOutput { plan, shots })?, output)
}
