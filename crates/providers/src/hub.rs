//! ModelHub — tiered model selection with single-shot fallback.
//!
//! Three model tiers are configured: a *complex* model for reasoning,
//! a *lightweight* model for JSON generation, and an optional
//! *fallback* model tried exactly once when a primary call fails.
//!
//! The fallback guard is request-scoped by construction: the fallback
//! attempt calls the backend directly and can never re-enter the
//! fallback logic, so no shared "already falling back" flag exists and
//! concurrent requests cannot observe each other's state.

use cogito_core::error::ProviderError;
use cogito_core::provider::{CompletionBackend, CompletionRequest};
use std::sync::Arc;
use tracing::{debug, error, warn};

const REASONING_SYSTEM: &str =
    "You are a helpful AI assistant that follows instructions precisely.";
const JSON_SYSTEM: &str =
    "You are a precise AI that outputs only valid JSON without any additional text or formatting.";
const JSON_REMINDER: &str = "Remember to respond with ONLY valid JSON, no additional text.";

const REASONING_MAX_TOKENS: u32 = 2048;
const JSON_MAX_TOKENS: u32 = 512;

/// The tiered completion adapter used by the reasoning loop.
pub struct ModelHub {
    backend: Arc<dyn CompletionBackend>,
    complex_model: String,
    lightweight_model: String,
    fallback_model: Option<String>,
    temperature: f32,
}

impl ModelHub {
    pub fn new(
        backend: Arc<dyn CompletionBackend>,
        complex_model: impl Into<String>,
        lightweight_model: impl Into<String>,
    ) -> Self {
        Self {
            backend,
            complex_model: complex_model.into(),
            lightweight_model: lightweight_model.into(),
            fallback_model: None,
            temperature: 0.7,
        }
    }

    /// Configure the fallback model.
    pub fn with_fallback(mut self, model: impl Into<String>) -> Self {
        self.fallback_model = Some(model.into());
        self
    }

    /// Set the reasoning temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Build a hub from the provider section of the app config.
    pub fn from_config(
        backend: Arc<dyn CompletionBackend>,
        config: &cogito_config::ProviderConfig,
    ) -> Self {
        let mut hub = Self::new(
            backend,
            config.complex_model.clone(),
            config.lightweight_model.clone(),
        )
        .with_temperature(config.temperature);
        if let Some(fallback) = &config.fallback_model {
            hub = hub.with_fallback(fallback.clone());
        }
        hub
    }

    /// The configured reasoning model name.
    pub fn complex_model(&self) -> &str {
        &self.complex_model
    }

    /// Call the complex model for reasoning and planning.
    ///
    /// On a primary failure the fallback model is tried exactly once;
    /// if it also fails (or none is configured), the ORIGINAL primary
    /// error propagates.
    pub async fn complete(
        &self,
        prompt: &str,
        stop: &[String],
    ) -> std::result::Result<String, ProviderError> {
        let request = CompletionRequest {
            model: self.complex_model.clone(),
            system: REASONING_SYSTEM.into(),
            prompt: prompt.into(),
            temperature: self.temperature,
            max_tokens: REASONING_MAX_TOKENS,
            stop: stop.to_vec(),
        };
        self.call_with_fallback(request).await
    }

    /// Call the lightweight model for JSON generation.
    pub async fn complete_json(
        &self,
        prompt: &str,
    ) -> std::result::Result<String, ProviderError> {
        let request = CompletionRequest {
            model: self.lightweight_model.clone(),
            system: JSON_SYSTEM.into(),
            prompt: format!("{prompt}\n\n{JSON_REMINDER}"),
            temperature: 0.0,
            max_tokens: JSON_MAX_TOKENS,
            stop: vec![],
        };
        self.call_with_fallback(request).await
    }

    async fn call_with_fallback(
        &self,
        request: CompletionRequest,
    ) -> std::result::Result<String, ProviderError> {
        let primary_model = request.model.clone();

        let primary_error = match self.backend.complete(request.clone()).await {
            Ok(response) => {
                debug!(model = %response.model, "Completion succeeded");
                return Ok(response.content);
            }
            Err(e) => e,
        };

        if let Some(fallback_model) = &self.fallback_model {
            warn!(
                model = %primary_model,
                error = %primary_error,
                fallback = %fallback_model,
                "Primary model error, attempting fallback"
            );

            let mut retry = request;
            retry.model = fallback_model.clone();

            match self.backend.complete(retry).await {
                Ok(response) => return Ok(response.content),
                Err(fallback_error) => {
                    error!(model = %fallback_model, error = %fallback_error, "Fallback model error");
                }
            }
        }

        Err(primary_error)
    }

    /// Information about the configured model tiers.
    pub fn model_info(&self) -> serde_json::Value {
        serde_json::json!({
            "backend": self.backend.name(),
            "complex_model": self.complex_model,
            "lightweight_model": self.lightweight_model,
            "fallback_model": self.fallback_model,
            "temperature": self.temperature,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use cogito_core::provider::CompletionResponse;
    use std::sync::Mutex;

    /// A mock backend that fails for some models and succeeds for others.
    struct SelectiveBackend {
        failing_models: Vec<String>,
        calls: Mutex<Vec<String>>,
    }

    impl SelectiveBackend {
        fn new(failing_models: &[&str]) -> Self {
            Self {
                failing_models: failing_models.iter().map(|s| s.to_string()).collect(),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CompletionBackend for SelectiveBackend {
        fn name(&self) -> &str {
            "selective"
        }

        async fn complete(
            &self,
            request: CompletionRequest,
        ) -> Result<CompletionResponse, ProviderError> {
            self.calls.lock().unwrap().push(request.model.clone());
            if self.failing_models.contains(&request.model) {
                return Err(ProviderError::ApiError {
                    status_code: 500,
                    message: format!("{} unavailable", request.model),
                });
            }
            Ok(CompletionResponse {
                content: format!("completion from {}", request.model),
                model: request.model,
                usage: None,
            })
        }
    }

    #[tokio::test]
    async fn primary_success_never_touches_fallback() {
        let backend = Arc::new(SelectiveBackend::new(&[]));
        let hub = ModelHub::new(backend.clone(), "complex", "light").with_fallback("backup");

        let result = hub.complete("prompt", &[]).await.unwrap();
        assert_eq!(result, "completion from complex");
        assert_eq!(backend.calls(), vec!["complex"]);
    }

    #[tokio::test]
    async fn primary_failure_falls_back_once() {
        let backend = Arc::new(SelectiveBackend::new(&["complex"]));
        let hub = ModelHub::new(backend.clone(), "complex", "light").with_fallback("backup");

        let result = hub.complete("prompt", &[]).await.unwrap();
        assert_eq!(result, "completion from backup");
        assert_eq!(backend.calls(), vec!["complex", "backup"]);
    }

    #[tokio::test]
    async fn both_failing_propagates_primary_error() {
        let backend = Arc::new(SelectiveBackend::new(&["complex", "backup"]));
        let hub = ModelHub::new(backend.clone(), "complex", "light").with_fallback("backup");

        let err = hub.complete("prompt", &[]).await.unwrap_err();
        match err {
            ProviderError::ApiError { message, .. } => {
                assert!(message.contains("complex"), "expected primary error, got: {message}");
            }
            other => panic!("Expected ApiError, got: {other:?}"),
        }
        // Exactly one fallback attempt, never a fallback-of-fallback
        assert_eq!(backend.calls(), vec!["complex", "backup"]);
    }

    #[tokio::test]
    async fn no_fallback_configured_fails_after_one_call() {
        let backend = Arc::new(SelectiveBackend::new(&["complex"]));
        let hub = ModelHub::new(backend.clone(), "complex", "light");

        assert!(hub.complete("prompt", &[]).await.is_err());
        assert_eq!(backend.calls(), vec!["complex"]);
    }

    #[tokio::test]
    async fn complete_json_uses_lightweight_model_and_reminder() {
        struct CapturingBackend {
            last: Mutex<Option<CompletionRequest>>,
        }

        #[async_trait]
        impl CompletionBackend for CapturingBackend {
            fn name(&self) -> &str {
                "capturing"
            }
            async fn complete(
                &self,
                request: CompletionRequest,
            ) -> Result<CompletionResponse, ProviderError> {
                *self.last.lock().unwrap() = Some(request.clone());
                Ok(CompletionResponse {
                    content: "{}".into(),
                    model: request.model,
                    usage: None,
                })
            }
        }

        let backend = Arc::new(CapturingBackend {
            last: Mutex::new(None),
        });
        let hub = ModelHub::new(backend.clone(), "complex", "light");

        hub.complete_json("Describe the tool call").await.unwrap();

        let seen = backend.last.lock().unwrap().clone().unwrap();
        assert_eq!(seen.model, "light");
        assert_eq!(seen.temperature, 0.0);
        assert_eq!(seen.max_tokens, 512);
        assert!(seen.prompt.contains("ONLY valid JSON"));
    }

    #[tokio::test]
    async fn concurrent_failures_each_get_their_own_fallback() {
        let backend = Arc::new(SelectiveBackend::new(&["complex"]));
        let hub = Arc::new(
            ModelHub::new(backend.clone(), "complex", "light").with_fallback("backup"),
        );

        let mut handles = Vec::new();
        for _ in 0..4 {
            let hub = hub.clone();
            handles.push(tokio::spawn(async move { hub.complete("p", &[]).await }));
        }
        for handle in handles {
            assert!(handle.await.unwrap().is_ok());
        }

        // Every request fell back independently: 4 primary + 4 fallback calls
        let calls = backend.calls();
        assert_eq!(calls.iter().filter(|m| *m == "complex").count(), 4);
        assert_eq!(calls.iter().filter(|m| *m == "backup").count(), 4);
    }
}
