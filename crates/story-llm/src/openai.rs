//! OpenAI-compatible chat completions client

use crate::error::GenerationError;
use crate::request::{CompletionRequest, StructuredRequest};
use crate::service::CompletionService;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, instrument};

/// Default API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Connect timeout
const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Client configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlmConfig {
    /// Bearer token
    pub api_key: Option<String>,
    /// Base URL, without the `/chat/completions` suffix
    pub base_url: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl LlmConfig {
    /// Config with an API key and the default base URL
    #[inline]
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Self::default()
        }
    }

    /// With base URL
    #[inline]
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Read `OPENAI_API_KEY` and `OPENAI_BASE_URL`
    #[must_use]
    pub fn from_env() -> Self {
        let api_key = std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty());
        let base_url = std::env::var("OPENAI_BASE_URL")
            .ok()
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Self { api_key, base_url }
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

/// Chat completions client
#[derive(Clone)]
pub struct OpenAiClient {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
}

impl std::fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl OpenAiClient {
    /// Create client
    ///
    /// # Errors
    /// - `GenerationError::NoApiKey` if the config carries no key
    /// - `GenerationError::InvalidRequest` if the HTTP client cannot be built
    pub fn new(config: &LlmConfig) -> Result<Self, GenerationError> {
        let api_key = config.api_key.clone().ok_or(GenerationError::NoApiKey)?;
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| GenerationError::InvalidRequest(format!("http client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            endpoint: config.endpoint(),
        })
    }

    /// Create client from environment
    ///
    /// # Errors
    /// See [`OpenAiClient::new`]
    pub fn from_env() -> Result<Self, GenerationError> {
        Self::new(&LlmConfig::from_env())
    }

    fn headers(&self) -> Result<HeaderMap, GenerationError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.api_key))
                .map_err(|e| GenerationError::InvalidRequest(format!("invalid API key: {e}")))?,
        );
        Ok(headers)
    }

    #[instrument(skip(self, body), fields(endpoint = %self.endpoint))]
    async fn send(&self, body: Value) -> Result<String, GenerationError> {
        let response = self
            .client
            .post(&self.endpoint)
            .headers(self.headers()?)
            .json(&body)
            .send()
            .await
            .map_err(|e| GenerationError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GenerationError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::Parse(e.to_string()))?;
        let text = extract_text(parsed)?;
        debug!(chars = text.len(), "completion received");
        Ok(text)
    }
}

#[async_trait]
impl CompletionService for OpenAiClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String, GenerationError> {
        self.send(completion_body(&request)).await
    }

    async fn complete_structured(
        &self,
        request: StructuredRequest,
    ) -> Result<String, GenerationError> {
        self.send(structured_body(&request)).await
    }
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

fn messages(request: &CompletionRequest) -> [ChatMessage<'_>; 2] {
    [
        ChatMessage {
            role: "system",
            content: &request.system_instruction,
        },
        ChatMessage {
            role: "user",
            content: &request.user_text,
        },
    ]
}

fn completion_body(request: &CompletionRequest) -> Value {
    json!({
        "model": request.tier.model_name(),
        "messages": messages(request),
    })
}

fn structured_body(request: &StructuredRequest) -> Value {
    let mut body = completion_body(&request.completion);
    body["response_format"] = json!({
        "type": "json_schema",
        "json_schema": {
            "name": request.schema.name,
            "description": request.schema.description,
            "schema": request.schema.schema,
            "strict": true,
        },
    });
    body
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    refusal: Option<String>,
}

fn extract_text(response: ChatResponse) -> Result<String, GenerationError> {
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or(GenerationError::EmptyResponse)?;

    match (choice.message.content, choice.message.refusal) {
        (Some(content), _) => Ok(content),
        (None, Some(refusal)) => Err(GenerationError::Parse(format!("model refused: {refusal}"))),
        (None, None) => Err(GenerationError::EmptyResponse),
    }
}
