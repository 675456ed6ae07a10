//! LLM — Gemini structured-output adapter for event generation.
//!
//! DESIGN
//! ======
//! One provider, reached over `generateContent` with a response schema so
//! the model is forced into the event shape. Services depend on the
//! `GenerateJson` trait, never on the concrete client, so every state-machine
//! and prompt test runs against a mock backend.

pub mod config;
pub mod gemini;
pub mod types;

pub use types::{GenerateJson, LlmError, Part};

/// Build the Gemini client from environment variables.
///
/// # Errors
///
/// Returns an error if the API key is missing or the HTTP client fails.
pub fn client_from_env() -> Result<gemini::GeminiClient, LlmError> {
    let config = config::GeminiConfig::from_env()?;
    gemini::GeminiClient::new(config)
}
