//! HTTP client for OpenAI-compatible chat-completions endpoints.

use super::ModelConfig;
use super::conversions::{RequestDefaults, from_chat_response, to_chat_request};
use super::dto::ChatCompletionResponse;
use async_trait::async_trait;
use dramaturg_core::{GenerateRequest, GenerateResponse};
use dramaturg_error::{DramaturgResult, ModelError, ModelErrorKind};
use dramaturg_interface::DramaturgDriver;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, error, instrument, warn};

/// Driver for any endpoint speaking the chat-completions protocol.
///
/// The API key is read once from the environment variable named in the
/// config; a key carried on the request takes precedence.
#[derive(Debug, Clone)]
pub struct OpenAICompatibleClient {
    client: Client,
    api_key: Option<String>,
    config: ModelConfig,
    provider: &'static str,
}

impl OpenAICompatibleClient {
    /// Build a client from the `[model]` settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    #[instrument(skip_all, fields(endpoint = %config.endpoint(), model = %config.model()))]
    pub fn from_config(config: ModelConfig) -> Result<Self, ModelError> {
        let api_key = std::env::var(config.api_key_env())
            .ok()
            .filter(|key| !key.trim().is_empty());
        if api_key.is_none() {
            warn!(
                env = %config.api_key_env(),
                "No API key in environment; requests must carry one"
            );
        }
        Self::build(config, api_key)
    }

    /// Build a client with an explicit API key.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    #[instrument(skip(api_key), fields(model = %config.model()))]
    pub fn with_api_key(config: ModelConfig, api_key: impl Into<String>) -> Result<Self, ModelError> {
        Self::build(config, Some(api_key.into()))
    }

    fn build(config: ModelConfig, api_key: Option<String>) -> Result<Self, ModelError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(*config.timeout_secs()))
            .build()
            .map_err(|e| {
                error!(error = ?e, "Failed to build HTTP client");
                ModelError::new(ModelErrorKind::Http(e.to_string()))
            })?;

        debug!(endpoint = %config.endpoint(), "Created chat-completions client");

        Ok(Self {
            client,
            api_key,
            provider: provider_for(config.endpoint()),
            config,
        })
    }

    /// Settings this client was built with.
    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    async fn complete(&self, req: &GenerateRequest) -> Result<GenerateResponse, ModelError> {
        let api_key = req
            .api_key
            .as_deref()
            .or(self.api_key.as_deref())
            .ok_or_else(|| {
                error!("No API key available for request");
                ModelError::new(ModelErrorKind::MissingCredential(format!(
                    "set {} or pass an API key",
                    self.config.api_key_env()
                )))
            })?;

        let defaults = RequestDefaults {
            model: self.config.model(),
            temperature: *self.config.temperature(),
            max_tokens: *self.config.max_tokens(),
        };
        let body = to_chat_request(req, &defaults)?;

        debug!(
            model = %body.model,
            messages = body.messages.len(),
            "Sending chat completion request"
        );

        let response = self
            .client
            .post(self.config.endpoint())
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, "HTTP request failed");
                ModelError::new(ModelErrorKind::Http(e.to_string()))
            })?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            error!(status = %status, "Rate limited by provider");
            return Err(ModelError::new(ModelErrorKind::RateLimit));
        }
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!(status = %status, error = %error_text, "API error");
            return Err(ModelError::new(ModelErrorKind::Api {
                status: status.as_u16(),
                message: error_text,
            }));
        }

        let parsed: ChatCompletionResponse = response.json().await.map_err(|e| {
            error!(error = ?e, "Failed to parse completion body");
            ModelError::new(ModelErrorKind::ResponseParsing(e.to_string()))
        })?;

        let output = from_chat_response(parsed)?;
        debug!(response_len = output.text().len(), "Received completion");
        Ok(output)
    }
}

#[async_trait]
impl DramaturgDriver for OpenAICompatibleClient {
    #[instrument(skip(self, req), fields(provider = self.provider, model = %self.config.model()))]
    async fn generate(&self, req: &GenerateRequest) -> DramaturgResult<GenerateResponse> {
        self.complete(req).await.map_err(Into::into)
    }

    fn provider_name(&self) -> &'static str {
        self.provider
    }

    fn model_name(&self) -> &str {
        self.config.model()
    }
}

fn provider_for(endpoint: &str) -> &'static str {
    let endpoint = endpoint.to_ascii_lowercase();
    if endpoint.contains("deepseek") {
        "deepseek"
    } else if endpoint.contains("dashscope") || endpoint.contains("aliyuncs") {
        "qwen"
    } else if endpoint.contains("groq") {
        "groq"
    } else if endpoint.contains("openai.com") {
        "openai"
    } else {
        "openai-compatible"
    }
}

#[cfg(test)]
mod tests {
    use super::provider_for;

    #[test]
    fn provider_inferred_from_endpoint() {
        assert_eq!(provider_for("https://api.deepseek.com/chat/completions"), "deepseek");
        assert_eq!(
            provider_for("https://dashscope.aliyuncs.com/compatible-mode/v1/chat/completions"),
            "qwen"
        );
        assert_eq!(provider_for("http://localhost:8000/v1/chat/completions"), "openai-compatible");
    }
}
