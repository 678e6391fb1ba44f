//! Layered configuration for the Dramaturg binary and library users.
//!
//! Sources, later overriding earlier:
//! - Bundled defaults (include_str! from dramaturg.toml)
//! - `~/.config/dramaturg/dramaturg.toml`
//! - `./dramaturg.toml`

use config::{Config, File, FileFormat};
use dramaturg_adaptation::AdapterSettings;
use dramaturg_cache::SessionCacheConfig;
use dramaturg_core::{DurationTuning, SegmentationBand};
use dramaturg_error::{ConfigError, DramaturgError, DramaturgResult};
use dramaturg_models::ModelConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, instrument};

/// Bundled default configuration.
const DEFAULT_CONFIG: &str = include_str!("../../../dramaturg.toml");

/// `[generation]` section: defaults for `generate` when flags are omitted.
///
/// # Examples
///
/// ```
/// use dramaturg::GenerationDefaults;
///
/// let defaults = GenerationDefaults::default();
/// assert_eq!(*defaults.episode_count(), None);
/// assert_eq!(*defaults.duration_per_episode(), 60);
/// assert_eq!(defaults.story_type(), "drama");
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
pub struct GenerationDefaults {
    /// Episode count; unset means ask the model for a recommendation
    episode_count: Option<u32>,
    /// Target seconds per episode
    duration_per_episode: u32,
    /// Genre label passed to the prompts
    story_type: String,
}

impl Default for GenerationDefaults {
    fn default() -> Self {
        Self {
            episode_count: None,
            duration_per_episode: 60,
            story_type: "drama".to_string(),
        }
    }
}

/// Top-level Dramaturg configuration.
///
/// # Example
///
/// ```no_run
/// use dramaturg::DramaturgConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = DramaturgConfig::load()?;
/// println!("Model: {}", config.model().model());
/// # Ok(())
/// # }
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Default,
    Serialize,
    Deserialize,
    derive_getters::Getters,
    derive_setters::Setters,
)]
#[setters(prefix = "with_")]
#[serde(default)]
pub struct DramaturgConfig {
    /// Model endpoint and request defaults
    model: ModelConfig,
    /// Duration estimator constants
    duration: DurationTuning,
    /// Episode segmentation band
    segmentation: SegmentationBand,
    /// Generation defaults
    generation: GenerationDefaults,
    /// Session cache sizing
    cache: SessionCacheConfig,
}

fn config_error(context: &str, e: impl std::fmt::Display) -> DramaturgError {
    ConfigError::new(format!("{}: {}", context, e)).into()
}

impl DramaturgConfig {
    /// The bundled defaults alone.
    ///
    /// # Errors
    ///
    /// Returns an error only if the bundled file is malformed.
    pub fn bundled() -> DramaturgResult<Self> {
        Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .build()
            .map_err(|e| config_error("Failed to build configuration", e))?
            .try_deserialize::<Self>()
            .map_err(|e| config_error("Failed to parse configuration", e))?
            .validated()
    }

    /// Bundled defaults overridden by one file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or holds
    /// out-of-range tunables.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> DramaturgResult<Self> {
        debug!("Loading configuration from file");

        Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .add_source(File::from(path.as_ref()))
            .build()
            .map_err(|e| {
                config_error(
                    &format!(
                        "Failed to read configuration from {}",
                        path.as_ref().display()
                    ),
                    e,
                )
            })?
            .try_deserialize::<Self>()
            .map_err(|e| config_error("Failed to parse configuration", e))?
            .validated()
    }

    /// Load configuration with precedence: current dir > home dir > bundled.
    ///
    /// User config files are optional and skipped when absent.
    ///
    /// # Errors
    ///
    /// Returns an error if a present file cannot be parsed or holds
    /// out-of-range tunables.
    #[instrument]
    pub fn load() -> DramaturgResult<Self> {
        debug!("Loading configuration with precedence: current dir > home dir > bundled defaults");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/dramaturg/dramaturg.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder.add_source(File::with_name("dramaturg").required(false));

        builder
            .build()
            .map_err(|e| config_error("Failed to build configuration", e))?
            .try_deserialize::<Self>()
            .map_err(|e| config_error("Failed to parse configuration", e))?
            .validated()
    }

    fn validated(self) -> DramaturgResult<Self> {
        self.duration
            .validate()
            .map_err(|e| config_error("Invalid [duration] section", e))?;
        self.segmentation
            .validate()
            .map_err(|e| config_error("Invalid [segmentation] section", e))?;
        if self.generation.duration_per_episode == 0 {
            return Err(config_error(
                "Invalid [generation] section",
                "duration_per_episode must be positive",
            ));
        }
        Ok(self)
    }

    /// Pipeline settings derived from this configuration.
    pub fn adapter_settings(&self) -> AdapterSettings {
        AdapterSettings::default()
            .with_duration(self.duration.clone())
            .with_segmentation(self.segmentation)
            .with_temperature(Some(*self.model.temperature()))
            .with_max_tokens(Some(*self.model.max_tokens()))
    }
}
