//! Completion service selection

use async_trait::async_trait;
use std::sync::Arc;
use story_llm::{
    CompletionRequest, CompletionService, GenerationError, LlmConfig, OpenAiClient,
    StructuredRequest,
};
use tracing::debug;

/// Stand-in used when no API key is configured
///
/// Commands that never generate text still work; the rest fail with
/// `GenerationError::NoApiKey` at the first call.
#[derive(Debug, Clone, Copy)]
struct Unconfigured;

#[async_trait]
impl CompletionService for Unconfigured {
    async fn complete(&self, _request: CompletionRequest) -> Result<String, GenerationError> {
        Err(GenerationError::NoApiKey)
    }

    async fn complete_structured(
        &self,
        _request: StructuredRequest,
    ) -> Result<String, GenerationError> {
        Err(GenerationError::NoApiKey)
    }
}

pub(crate) fn from_env() -> Arc<dyn CompletionService> {
    select(&LlmConfig::from_env())
}

fn select(config: &LlmConfig) -> Arc<dyn CompletionService> {
    match OpenAiClient::new(config) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            debug!(error = %e, "completion service unavailable");
            Arc::new(Unconfigured)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_key_fails_on_use() {
        let llm = select(&LlmConfig::default());
        let err = llm
            .complete(CompletionRequest::new("sys", "user"))
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::NoApiKey));
    }
}
