//! aureus-providers: generative-AI question backends.
//!
//! Implements the `LlmProvider` trait for Gemini and OpenAI-compatible APIs
//! (plus a mock for offline use and tests), and loads the arcade's
//! configuration file.

pub mod config;
pub mod error;
pub mod gemini;
mod http;
pub mod mock;
pub mod openai;

pub use config::{create_provider, load_config_from, ArcadeConfig, ProviderConfig};
pub use error::ProviderError;
