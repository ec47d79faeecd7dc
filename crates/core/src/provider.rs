//! CompletionBackend trait — the abstraction over LLM services.
//!
//! A backend knows how to send a rendered prompt to a model and return
//! the completion text. Model selection and fallback policy live above
//! this trait, in the provider crate's `ModelHub`.

use crate::error::ProviderError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A single completion request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// The model to use (e.g., "gpt-4o", "gpt-4o-mini")
    pub model: String,

    /// System preamble sent alongside the prompt
    pub system: String,

    /// The rendered prompt text
    pub prompt: String,

    /// Temperature (0.0 = deterministic)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens to generate
    pub max_tokens: u32,

    /// Stop sequences
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stop: Vec<String>,
}

pub(crate) fn default_temperature() -> f32 {
    0.7
}

/// A complete response from a backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// The generated text
    pub content: String,

    /// Which model actually responded (may differ from requested)
    pub model: String,

    /// Token usage statistics, when the service reports them
    pub usage: Option<Usage>,
}

/// Token usage information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// The core CompletionBackend trait.
///
/// Every LLM service (OpenAI-compatible endpoints, mocks in tests)
/// implements this trait. Callers never know which backend is in use.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// A human-readable name for this backend (e.g., "openai").
    fn name(&self) -> &str;

    /// Send a request and get a complete response.
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> std::result::Result<CompletionResponse, ProviderError>;

    /// Health check — can we reach the service?
    async fn health_check(&self) -> std::result::Result<bool, ProviderError> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serialization_skips_empty_stop() {
        let req = CompletionRequest {
            model: "gpt-4o".into(),
            system: "You are helpful.".into(),
            prompt: "Hello".into(),
            temperature: default_temperature(),
            max_tokens: 2048,
            stop: vec![],
        };
        let json = serde_json::to_string(&req).unwrap();
        assert!(!json.contains("stop"));
        assert!((req.temperature - 0.7).abs() < f32::EPSILON);
    }

    #[test]
    fn response_roundtrip() {
        let resp = CompletionResponse {
            content: "Final Answer: 42".into(),
            model: "gpt-4o".into(),
            usage: Some(Usage {
                prompt_tokens: 10,
                completion_tokens: 5,
                total_tokens: 15,
            }),
        };
        let json = serde_json::to_string(&resp).unwrap();
        let back: CompletionResponse = serde_json::from_str(&json).unwrap();
        assert_eq!(back.content, "Final Answer: 42");
        assert_eq!(back.usage.unwrap().total_tokens, 15);
    }
}
