//! Output types from model responses.

use serde::{Deserialize, Serialize};

/// Output returned by a model driver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Output {
    /// Plain text output.
    Text(String),

    /// Structured JSON output (JSON mode providers).
    Json(serde_json::Value),
}

impl Output {
    /// Text view of the output; JSON is rendered compactly.
    pub fn as_text(&self) -> String {
        match self {
            Output::Text(text) => text.clone(),
            Output::Json(value) => value.to_string(),
        }
    }
}
