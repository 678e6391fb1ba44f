//! Dramaturg: prose to short-drama scripts.
//!
//! Dramaturg adapts a piece of prose into a multi-episode vertical
//! short-drama script by chaining calls to a language model, then turns the
//! loosely structured answers into timed scenes, episodes and quality scores.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use dramaturg::{DramaturgConfig, OpenAICompatibleClient, ScriptAdapter};
//!
//! # async fn run() -> dramaturg::DramaturgResult<()> {
//! let config = DramaturgConfig::load()?;
//! let client = OpenAICompatibleClient::from_config(config.model().clone())?;
//! let adapter = ScriptAdapter::with_settings(client, config.adapter_settings());
//!
//! let document = adapter
//!     .generate_script("Lin Wan was thrown out of her family's company...", 3, 60, "revenge")
//!     .await?;
//! println!("{} episodes", document.episodes.len());
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - `dramaturg_error` - Error types
//! - `dramaturg_core` - Script document model and message types
//! - `dramaturg_interface` - Driver and document-store traits
//! - `dramaturg_models` - OpenAI-compatible chat-completions client
//! - `dramaturg_storage` - Versioned in-memory document store
//! - `dramaturg_cache` - Session-scoped TTL cache
//! - `dramaturg_adaptation` - The adaptation pipeline
//!
//! This crate re-exports everything for convenience and adds layered
//! configuration.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;

pub use config::{DramaturgConfig, GenerationDefaults};

pub use dramaturg_adaptation::*;
pub use dramaturg_cache::{SessionCache, SessionCacheConfig};
pub use dramaturg_core::*;
pub use dramaturg_error::*;
pub use dramaturg_interface::*;
pub use dramaturg_models::{ModelConfig, OpenAICompatibleClient};
pub use dramaturg_storage::InMemoryDocumentStore;
