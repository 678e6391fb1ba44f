//! Request and response types for model generation.

use crate::{Message, Output};
use serde::{Deserialize, Serialize};

/// Generation request sent to a model driver.
///
/// # Examples
///
/// ```
/// use dramaturg_core::{GenerateRequest, Message};
///
/// let request = GenerateRequest::builder()
///     .messages(vec![Message::system("You are a screenwriter."), Message::user("Hello")])
///     .temperature(0.7)
///     .build()
///     .unwrap();
///
/// assert_eq!(request.messages.len(), 2);
/// assert_eq!(request.max_tokens, None);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default, derive_builder::Builder)]
#[builder(default)]
pub struct GenerateRequest {
    /// The conversation messages to send, in order
    pub messages: Vec<Message>,
    /// Maximum number of tokens to generate
    #[builder(setter(strip_option))]
    pub max_tokens: Option<u32>,
    /// Sampling temperature (0.0 to 2.0)
    #[builder(setter(strip_option))]
    pub temperature: Option<f32>,
    /// Model identifier override
    #[builder(setter(into, strip_option))]
    pub model: Option<String>,
    /// Caller-supplied credential overriding the driver's configured key
    #[serde(skip)]
    #[builder(setter(into, strip_option))]
    pub api_key: Option<String>,
}

impl GenerateRequest {
    /// Creates a new request builder.
    pub fn builder() -> GenerateRequestBuilder {
        GenerateRequestBuilder::default()
    }
}

/// The unified response object.
///
/// # Examples
///
/// ```
/// use dramaturg_core::{GenerateResponse, Output};
///
/// let response = GenerateResponse {
///     outputs: vec![Output::Text("Scene 1: Rooftop".to_string())],
/// };
///
/// assert_eq!(response.text(), "Scene 1: Rooftop");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateResponse {
    /// The generated outputs from the model
    pub outputs: Vec<Output>,
}

impl GenerateResponse {
    /// All outputs joined as a single text completion.
    pub fn text(&self) -> String {
        self.outputs
            .iter()
            .map(Output::as_text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}
