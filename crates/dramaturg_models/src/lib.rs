//! Model provider integrations for Dramaturg.
//!
//! Most hosted models (OpenAI, DeepSeek, Qwen via DashScope, Groq, local
//! servers such as vLLM) speak the OpenAI chat-completions protocol, so one
//! client covers them; the endpoint and model come from [`ModelConfig`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod openai;

pub use openai::{ModelConfig, OpenAICompatibleClient};
