//! Trait definitions for generation backends.

use async_trait::async_trait;
use storyloom_core::{GenerateRequest, GenerateResponse};
use storyloom_error::{ServiceError, ServiceErrorKind, StoryloomResult};

/// Core trait that all generation backends must implement.
///
/// One call is one request; retry policy lives above this trait.
#[async_trait]
pub trait StoryDriver: Send + Sync {
    /// Generate model output for a request.
    async fn generate(&self, req: &GenerateRequest) -> StoryloomResult<GenerateResponse>;

    /// Provider name (e.g., "openrouter", "openai").
    fn provider_name(&self) -> &str;

    /// Model identifier (e.g., "meta-llama/llama-3.1-8b-instruct:free").
    fn model_name(&self) -> &str;

    /// Send one prompt as a user message and return the response text.
    ///
    /// Fails with [`ServiceErrorKind::EmptyResponse`] when the service
    /// answers with no visible text.
    #[tracing::instrument(
        skip(self, prompt),
        fields(provider = self.provider_name(), model = self.model_name(), prompt_len = prompt.len())
    )]
    async fn complete(&self, prompt: &str) -> StoryloomResult<String> {
        let request = GenerateRequest::from_prompt(prompt);
        let response = self.generate(&request).await?;
        let text = response.text();
        if text.trim().is_empty() {
            tracing::warn!("Service returned no text");
            return Err(ServiceError::new(ServiceErrorKind::EmptyResponse).into());
        }
        tracing::debug!(response_len = text.len(), "Completion received");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storyloom_core::Output;

    struct Echo {
        reply: String,
    }

    #[async_trait]
    impl StoryDriver for Echo {
        async fn generate(&self, req: &GenerateRequest) -> StoryloomResult<GenerateResponse> {
            assert_eq!(req.messages.len(), 1);
            Ok(GenerateResponse {
                outputs: vec![Output::Text(self.reply.clone())],
            })
        }

        fn provider_name(&self) -> &str {
            "echo"
        }

        fn model_name(&self) -> &str {
            "echo-1"
        }
    }

    #[tokio::test]
    async fn test_complete_returns_text() {
        let driver = Echo {
            reply: "The lamp burned all night.".to_string(),
        };
        let text = driver.complete("Write a line").await.unwrap();
        assert_eq!(text, "The lamp burned all night.");
    }

    #[tokio::test]
    async fn test_complete_rejects_blank_text() {
        let driver = Echo {
            reply: "  \n".to_string(),
        };
        let err = driver.complete("Write a line").await.unwrap_err();
        assert!(matches!(
            err.kind(),
            storyloom_error::StoryloomErrorKind::Service(e) if e.kind == ServiceErrorKind::EmptyResponse
        ));
    }
}
