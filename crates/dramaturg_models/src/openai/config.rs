//! Connection settings for the chat-completions driver.

use serde::{Deserialize, Serialize};

/// `[model]` section of `dramaturg.toml`.
///
/// # Examples
///
/// ```
/// use dramaturg_models::ModelConfig;
///
/// let config = ModelConfig::default().with_model("qwen-plus".to_string());
/// assert_eq!(config.model(), "qwen-plus");
/// assert_eq!(*config.timeout_secs(), 120);
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
pub struct ModelConfig {
    /// Chat-completions URL
    endpoint: String,
    /// Default model identifier
    model: String,
    /// Environment variable holding the API key
    api_key_env: String,
    /// Default sampling temperature
    temperature: f32,
    /// Default completion budget
    max_tokens: u32,
    /// Whole-request timeout
    timeout_secs: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key_env: "DRAMATURG_API_KEY".to_string(),
            temperature: 0.7,
            max_tokens: 4000,
            timeout_secs: 120,
        }
    }
}
