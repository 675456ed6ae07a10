//! Reasoning-backend types — request parts, errors, and the client trait.

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by reasoning-backend operations.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// A configuration value could not be parsed.
    #[error("config parse failed: {0}")]
    ConfigParse(String),

    /// The required API key environment variable is not set.
    #[error("missing API key: env var {var} not set")]
    MissingApiKey { var: String },

    /// The HTTP request to the backend failed.
    #[error("API request failed: {0}")]
    ApiRequest(String),

    /// The backend returned a non-success HTTP status.
    #[error("API response error: status {status}")]
    ApiResponse { status: u16, body: String },

    /// The backend response body could not be deserialized.
    #[error("API response parse failed: {0}")]
    ApiParse(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

// =============================================================================
// REQUEST PARTS
// =============================================================================

/// One piece of multimodal user content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Part {
    Text(String),
    /// Raw base64 image bytes, data-URI header already stripped.
    InlineImage { mime_type: String, data: String },
}

// =============================================================================
// CLIENT TRAIT
// =============================================================================

/// Provider-neutral async trait for schema-constrained JSON generation.
/// Enables mocking in tests.
#[async_trait::async_trait]
pub trait GenerateJson: Send + Sync {
    /// Ask the backend for a JSON document matching `response_schema` and
    /// return the raw JSON text of its reply.
    ///
    /// # Errors
    ///
    /// Returns an [`LlmError`] if the request fails, the response is
    /// malformed, or no text candidate is present.
    async fn generate_json(
        &self,
        system: &str,
        parts: &[Part],
        response_schema: &serde_json::Value,
    ) -> Result<String, LlmError>;
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
