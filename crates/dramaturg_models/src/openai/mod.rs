//! OpenAI-compatible chat-completions driver.

mod client;
mod config;
mod conversions;
mod dto;

pub use client::OpenAICompatibleClient;
pub use config::ModelConfig;
